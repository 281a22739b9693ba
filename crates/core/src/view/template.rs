//! 基于文件的模板视图
//!
//! 模板位于 `<root>/<name>.html`，支持以下语法：
//!
//! | 语法 | 含义 |
//! |------|------|
//! | `{{ key }}` | HTML 转义后输出 |
//! | `{{{ key }}}` | 原样输出（用于已渲染的片段） |
//! | `{{#each key}}...{{/each}}` | 遍历数组，块内用 `this` 引用当前项 |
//!
//! 键支持点号路径。`lang.*`、`settings.*`、`path.N` 分别读取翻译表、
//! 站点设置和请求路径段，`document_title` 输出文档标题；
//! 其余键从模板数据读取。缺失的键输出空字符串。
//! 这些保留名优先于模板数据：数据中同名的键（如 `document_title`）不会被读取，
//! 保证完整文档和异步片段的标题一致。
//! 替换只做一遍，数据中的模板语法不会被再次解析。

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value;
use std::io::ErrorKind;
use std::path::PathBuf;

use super::{ViewData, ViewFactory, ViewRenderer};
use crate::error::{FirError, FirResult};
use crate::language::Translations;
use crate::settings::Settings;

const TEMPLATE_EXTENSION: &str = "html";

static TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?s)\{\{#each\s+([\w.]+)\s*\}\}(.*?)\{\{/each\}\}|\{\{\{\s*([\w.]+)\s*\}\}\}|\{\{\s*([\w.]+)\s*\}\}",
    )
    .expect("模板语法正则无效")
});

static BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{#each\b|\{\{/each\}\}").expect("块语法正则无效"));

/// 单个请求的模板视图
#[derive(Debug, Clone)]
pub struct TemplateView {
    root: PathBuf,
    settings: Settings,
    translations: Translations,
    request_path: Vec<String>,
}

impl TemplateView {
    pub fn new(
        root: impl Into<PathBuf>,
        settings: Settings,
        translations: Translations,
        request_path: Vec<String>,
    ) -> Self {
        Self {
            root: root.into(),
            settings,
            translations,
            request_path,
        }
    }

    /// 渲染模板源码
    pub fn render_source(&self, name: &str, source: &str, data: &ViewData) -> FirResult<String> {
        check_blocks(name, source)?;
        Ok(self.expand(source, data, None))
    }

    fn template_path(&self, name: &str) -> FirResult<PathBuf> {
        if !is_valid_template_name(name) {
            return Err(FirError::TemplateNotFound(name.to_string()));
        }
        Ok(self.root.join(format!("{name}.{TEMPLATE_EXTENSION}")))
    }

    fn expand(&self, source: &str, data: &ViewData, item: Option<&Value>) -> String {
        TOKEN
            .replace_all(source, |caps: &Captures| {
                if let Some(list) = caps.get(1) {
                    let body = caps.get(2).map_or("", |m| m.as_str());
                    match self.lookup(list.as_str(), data, item) {
                        Some(Value::Array(items)) => items
                            .iter()
                            .map(|entry| self.expand(body, data, Some(entry)))
                            .collect(),
                        _ => String::new(),
                    }
                } else if let Some(raw) = caps.get(3) {
                    self.text(raw.as_str(), data, item)
                } else {
                    escape_html(&self.text(&caps[4], data, item))
                }
            })
            .into_owned()
    }

    fn text(&self, name: &str, data: &ViewData, item: Option<&Value>) -> String {
        self.lookup(name, data, item)
            .map(|value| to_text(&value))
            .unwrap_or_default()
    }

    fn lookup(&self, name: &str, data: &ViewData, item: Option<&Value>) -> Option<Value> {
        let (head, rest) = match name.split_once('.') {
            Some((head, rest)) => (head, Some(rest)),
            None => (name, None),
        };

        match head {
            "this" => descend(item?, rest),
            "document_title" if rest.is_none() => Some(Value::String(self.document_title())),
            "lang" => self
                .translations
                .get(rest?)
                .map(|text| Value::String(text.clone())),
            "settings" => self
                .settings
                .get(rest?)
                .map(|value| Value::String(value.to_string())),
            "path" => {
                let index: usize = rest?.parse().ok()?;
                self.request_path
                    .get(index)
                    .map(|segment| Value::String(segment.clone()))
            }
            _ => descend(data.get(head)?, rest),
        }
    }
}

impl ViewRenderer for TemplateView {
    fn render(&self, data: &ViewData, template: &str) -> FirResult<String> {
        let path = self.template_path(template)?;
        let source = std::fs::read_to_string(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => FirError::TemplateNotFound(template.to_string()),
            _ => FirError::Io(e),
        })?;
        self.render_source(template, &source, data)
    }

    /// 页面标题来自翻译表的 `title.<首个路径段>`，站点标题来自 `settings.title`
    fn document_title(&self) -> String {
        let site = self.settings.title().unwrap_or_default();
        let page = self
            .request_path
            .first()
            .filter(|segment| !segment.is_empty())
            .and_then(|segment| self.translations.get(&format!("title.{segment}")));

        match page {
            Some(page) if !site.is_empty() => format!("{page} - {site}"),
            Some(page) => page.clone(),
            None => site.to_string(),
        }
    }
}

/// 模板视图工厂
#[derive(Debug, Clone)]
pub struct TemplateViewFactory {
    root: PathBuf,
}

impl TemplateViewFactory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ViewFactory for TemplateViewFactory {
    fn create(
        &self,
        settings: &Settings,
        translations: &Translations,
        request_path: &[String],
    ) -> Box<dyn ViewRenderer> {
        Box::new(TemplateView::new(
            self.root.clone(),
            settings.clone(),
            translations.clone(),
            request_path.to_vec(),
        ))
    }
}

fn check_blocks(name: &str, source: &str) -> FirResult<()> {
    let render_error = |reason: &str| FirError::Render {
        template: name.to_string(),
        reason: reason.to_string(),
    };

    let mut depth = 0i32;
    for token in BLOCK.find_iter(source) {
        if token.as_str().starts_with("{{#") {
            depth += 1;
            if depth > 1 {
                return Err(render_error("不支持嵌套 each 块"));
            }
        } else {
            depth -= 1;
            if depth < 0 {
                return Err(render_error("多余的 /each"));
            }
        }
    }

    if depth != 0 {
        return Err(render_error("未闭合的 each 块"));
    }
    Ok(())
}

fn descend(value: &Value, rest: Option<&str>) -> Option<Value> {
    let mut current = value;
    if let Some(rest) = rest {
        for key in rest.split('.') {
            current = match current {
                Value::Object(map) => map.get(key)?,
                Value::Array(items) => items.get(key.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
    }
    Some(current.clone())
}

fn to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Bool(_) | Value::Number(_) => value.to_string(),
        Value::Array(items) => items.iter().map(to_text).collect::<Vec<_>>().join(", "),
        Value::Object(_) => value.to_string(),
    }
}

fn is_valid_template_name(name: &str) -> bool {
    !name.is_empty()
        && name.split('/').all(|segment| {
            !segment.is_empty()
                && segment
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        })
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
