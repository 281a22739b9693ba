//! 页面处理
//!
//! 具体页面实现 `Page`，由 `Pipeline` 串起上下文构建、页面逻辑和响应组装。

use std::io::Write;

use crate::compose::{AsyncSignal, ResponseComposer, ResponseEnvelope};
use crate::context::{RequestContext, RequestInput, Services};
use crate::database::DbConnection;
use crate::error::FirResult;
use crate::view::ViewData;

/// 页面逻辑的输出
#[derive(Debug, Clone, Default)]
pub struct PageOutput {
    /// 传给 wrapper 模板的额外数据
    pub data: ViewData,
    /// 已渲染的内容片段
    pub content: String,
}

impl PageOutput {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            data: ViewData::new(),
            content: content.into(),
        }
    }

    pub fn with_data(mut self, data: ViewData) -> Self {
        self.data = data;
        self
    }
}

/// 页面处理器
pub trait Page: Send + Sync {
    fn handle(&self, ctx: &RequestContext) -> FirResult<PageOutput>;
}

/// 请求管线：构建上下文 -> 页面逻辑 -> 组装响应
#[derive(Clone)]
pub struct Pipeline {
    services: Services,
}

impl Pipeline {
    pub fn new(services: Services) -> Self {
        Self { services }
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    /// 执行管线并返回响应
    pub fn respond(
        &self,
        db: DbConnection,
        input: RequestInput,
        page: &dyn Page,
        signal: &dyn AsyncSignal,
    ) -> FirResult<ResponseEnvelope> {
        let ctx = RequestContext::bootstrap(db, input, &self.services)?;
        let output = page.handle(&ctx)?;
        ResponseComposer::compose(&ctx, output.data, &output.content, signal)
    }

    /// 执行管线并写出响应
    pub fn run<W: Write>(
        &self,
        db: DbConnection,
        input: RequestInput,
        page: &dyn Page,
        signal: &dyn AsyncSignal,
        out: &mut W,
    ) -> FirResult<()> {
        self.respond(db, input, page, signal)?.write_to(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::AsyncFlag;
    use crate::database;
    use crate::error::FirError;
    use crate::language::LanguageCatalog;
    use crate::models::{ModelRegistry, SettingsModel, SETTINGS_MODEL};
    use crate::settings::ModelSettingsProvider;
    use crate::view::TemplateViewFactory;
    use std::path::Path;
    use std::sync::Arc;

    struct Greeting;

    impl Page for Greeting {
        fn handle(&self, ctx: &RequestContext) -> FirResult<PageOutput> {
            let settings: SettingsModel = ctx.model_as(SETTINGS_MODEL)?;
            let visits = settings
                .get("visits")?
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(0);
            Ok(PageOutput::new(format!(
                "{} #{}",
                ctx.translate("hello"),
                visits
            )))
        }
    }

    struct Broken;

    impl Page for Broken {
        fn handle(&self, ctx: &RequestContext) -> FirResult<PageOutput> {
            ctx.model("NoSuchModel")?;
            Ok(PageOutput::new("unreachable"))
        }
    }

    fn pipeline(root: &Path) -> Pipeline {
        std::fs::create_dir_all(root.join("shared")).unwrap();
        std::fs::write(root.join("shared/header.html"), "[{{ language }}]").unwrap();
        std::fs::write(root.join("shared/footer.html"), "[end]").unwrap();
        std::fs::write(
            root.join("wrapper.html"),
            "{{{ header_view }}}{{{ content_view }}}{{{ footer_view }}}",
        )
        .unwrap();

        let mut catalog = LanguageCatalog::new("en");
        catalog.add_locale("en", [("hello".to_string(), "Hello".to_string())].into());
        catalog.add_locale("fr", [("hello".to_string(), "Bonjour".to_string())].into());

        let models = Arc::new(ModelRegistry::with_defaults());
        Pipeline::new(Services {
            settings: Arc::new(ModelSettingsProvider::new(Arc::clone(&models))),
            languages: Arc::new(catalog),
            views: Arc::new(TemplateViewFactory::new(root)),
            models,
        })
    }

    #[test]
    fn test_run_document() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = pipeline(dir.path());
        let db = database::open_in_memory().unwrap();
        let settings = SettingsModel::new(db.clone());
        settings.set("language", "fr").unwrap();
        settings.set("visits", "3").unwrap();

        let mut out = Vec::new();
        pipeline
            .run(db, RequestInput::default(), &Greeting, &AsyncFlag(false), &mut out)
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "[fr]Bonjour #3[end]");
    }

    #[test]
    fn test_run_fragment_with_empty_settings() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = pipeline(dir.path());
        let db = database::open_in_memory().unwrap();

        let envelope = pipeline
            .respond(db, RequestInput::default(), &Greeting, &AsyncFlag(true))
            .unwrap();
        let body = envelope.into_body().unwrap();
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["content"], "Hello #0");
        assert_eq!(json["header"], "[en]");
    }

    #[test]
    fn test_unknown_model_aborts_without_output() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = pipeline(dir.path());
        let db = database::open_in_memory().unwrap();

        let mut out = Vec::new();
        let result = pipeline.run(db, RequestInput::default(), &Broken, &AsyncFlag(false), &mut out);
        assert!(matches!(result, Err(FirError::ModelNotFound(name)) if name == "NoSuchModel"));
        assert!(out.is_empty());
    }
}
