use fir_core::{FirResult, Page, PageOutput, RequestContext, ViewData};
use serde_json::Value;

const TEMPLATE: &str = "not_found/index";

/// 未注册路径的页面，宿主以 404 状态返回
pub struct NotFoundPage;

impl Page for NotFoundPage {
    fn handle(&self, ctx: &RequestContext) -> FirResult<PageOutput> {
        let mut data = ViewData::new();
        data.insert(
            "requested".to_string(),
            Value::String(ctx.request_path().join("/")),
        );
        let content = ctx.view().render(&data, TEMPLATE)?;
        Ok(PageOutput::new(content))
    }
}
