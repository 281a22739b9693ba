use fir_core::models::SETTINGS_MODEL;
use fir_core::{FirResult, Page, PageOutput, RequestContext, SettingsModel, ViewData};
use serde_json::Value;

pub const WELCOME_KEY: &str = "welcome";
const TEMPLATE: &str = "home/index";

/// 首页
pub struct HomePage;

impl Page for HomePage {
    fn handle(&self, ctx: &RequestContext) -> FirResult<PageOutput> {
        let settings: SettingsModel = ctx.model_as(SETTINGS_MODEL)?;
        let welcome = settings.get(WELCOME_KEY)?.unwrap_or_default();

        let mut data = ViewData::new();
        data.insert("welcome".to_string(), Value::String(welcome));
        data.insert(
            "local_time".to_string(),
            Value::String(ctx.now().format("%Y-%m-%d %H:%M").to_string()),
        );
        data.insert(
            "timezone".to_string(),
            Value::String(
                ctx.timezone()
                    .map(|tz| tz.name().to_string())
                    .unwrap_or_default(),
            ),
        );

        let content = ctx.view().render(&data, TEMPLATE)?;
        Ok(PageOutput::new(content))
    }
}
