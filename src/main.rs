use fir_lib::{app, logger, AppConfig};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = AppConfig::default_path();
    let config = AppConfig::load(&config_path)?;
    logger::init(&config.logging.level);
    info!("[Fir] 使用配置: {}", config_path.display());

    let router = app::build(&config)?;
    fir_server::serve(config.server.addr(), router).await?;
    Ok(())
}
