//! 响应组装
//!
//! 页面逻辑产出内容片段后，先渲染页头和页脚，
//! 再根据是否为异步请求输出完整文档或 JSON 片段。
//! 所有片段在写出前都已渲染完成，渲染失败时不会有任何输出。

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::Write;

use crate::context::RequestContext;
use crate::error::FirResult;
use crate::view::ViewData;

pub const HEADER_TEMPLATE: &str = "shared/header";
pub const FOOTER_TEMPLATE: &str = "shared/footer";
pub const WRAPPER_TEMPLATE: &str = "wrapper";

pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// 异步请求判定
///
/// 每次组装只求值一次。
pub trait AsyncSignal {
    fn is_async(&self) -> bool;
}

impl<F: Fn() -> bool> AsyncSignal for F {
    fn is_async(&self) -> bool {
        self()
    }
}

/// 预先求值的异步请求标记
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AsyncFlag(pub bool);

impl AsyncSignal for AsyncFlag {
    fn is_async(&self) -> bool {
        self.0
    }
}

/// 异步请求的片段载荷
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FragmentPayload {
    pub title: String,
    pub header: String,
    pub content: String,
    pub footer: String,
}

/// 最终响应
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseEnvelope {
    /// 完整 HTML 文档
    Document(String),
    /// 异步请求的结构化片段
    Fragment(FragmentPayload),
}

impl ResponseEnvelope {
    pub fn content_type(&self) -> &'static str {
        match self {
            ResponseEnvelope::Document(_) => HTML_CONTENT_TYPE,
            ResponseEnvelope::Fragment(_) => JSON_CONTENT_TYPE,
        }
    }

    pub fn is_fragment(&self) -> bool {
        matches!(self, ResponseEnvelope::Fragment(_))
    }

    /// 序列化为响应体
    pub fn into_body(self) -> FirResult<String> {
        match self {
            ResponseEnvelope::Document(html) => Ok(html),
            ResponseEnvelope::Fragment(payload) => Ok(serde_json::to_string(&payload)?),
        }
    }

    /// 一次性写出响应体
    pub fn write_to<W: Write>(self, out: &mut W) -> FirResult<()> {
        let body = self.into_body()?;
        out.write_all(body.as_bytes())?;
        out.flush()?;
        Ok(())
    }
}

/// 响应组装器，调用之间不保留状态
pub struct ResponseComposer;

impl ResponseComposer {
    /// 页头只接收语言列表和当前语言
    pub fn header(ctx: &RequestContext) -> FirResult<String> {
        let mut data = ViewData::new();
        data.insert(
            "languages_list".to_string(),
            Value::from(ctx.supported_locales().to_vec()),
        );
        data.insert("language".to_string(), Value::from(ctx.locale()));
        ctx.view().render(&data, HEADER_TEMPLATE)
    }

    /// 页脚不接收请求数据
    pub fn footer(ctx: &RequestContext) -> FirResult<String> {
        ctx.view().render(&ViewData::new(), FOOTER_TEMPLATE)
    }

    /// 组装响应，不写出
    pub fn compose(
        ctx: &RequestContext,
        mut data: ViewData,
        content: &str,
        signal: &dyn AsyncSignal,
    ) -> FirResult<ResponseEnvelope> {
        let header = Self::header(ctx)?;
        let footer = Self::footer(ctx)?;

        if signal.is_async() {
            return Ok(ResponseEnvelope::Fragment(FragmentPayload {
                title: ctx.view().document_title(),
                header,
                content: content.to_string(),
                footer,
            }));
        }

        data.insert("header_view".to_string(), Value::String(header));
        data.insert("content_view".to_string(), Value::from(content));
        data.insert("footer_view".to_string(), Value::String(footer));
        let document = ctx.view().render(&data, WRAPPER_TEMPLATE)?;
        Ok(ResponseEnvelope::Document(document))
    }

    /// 组装并写出响应
    pub fn finalize<W: Write>(
        ctx: &RequestContext,
        data: ViewData,
        content: &str,
        signal: &dyn AsyncSignal,
        out: &mut W,
    ) -> FirResult<()> {
        Self::compose(ctx, data, content, signal)?.write_to(out)
    }
}
