//! 请求解析
//!
//! 从 URI 和请求头中提取管线需要的输入：路由段、异步请求标记和用户选择的语言。

use axum::http::{header, HeaderMap, HeaderValue};
use std::collections::HashMap;

pub const REQUESTED_WITH_HEADER: &str = "x-requested-with";
pub const XML_HTTP_REQUEST: &str = "XMLHttpRequest";
pub const LOCALE_PARAM: &str = "lang";

/// 是否为异步请求（`X-Requested-With: XMLHttpRequest`）
pub fn is_async_request(headers: &HeaderMap) -> bool {
    headers
        .get(REQUESTED_WITH_HEADER)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.trim().eq_ignore_ascii_case(XML_HTTP_REQUEST))
}

/// 拆分 URL 路径为路由段，空段会被丢弃
pub fn path_segments(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            urlencoding::decode(segment)
                .map(|decoded| decoded.into_owned())
                .unwrap_or_else(|_| segment.to_string())
        })
        .collect()
}

/// 用户选择的语言：查询参数优先，其次是 cookie
pub fn locale_choice(query: Option<&str>, headers: &HeaderMap) -> Option<String> {
    query_locale(query).or_else(|| {
        cookie(headers, LOCALE_PARAM)
            .map(|code| code.trim().to_string())
            .filter(|code| !code.is_empty())
    })
}

/// 查询参数 `lang` 中的语言
pub fn query_locale(query: Option<&str>) -> Option<String> {
    query
        .and_then(|query| serde_urlencoded::from_str::<HashMap<String, String>>(query).ok())
        .and_then(|mut params| params.remove(LOCALE_PARAM))
        .map(|code| code.trim().to_ascii_lowercase())
        .filter(|code| !code.is_empty())
}

/// 记住用户语言选择的 `Set-Cookie` 值
///
/// 代码含有 cookie 不允许的字符时返回 `None`。
pub fn locale_cookie(code: &str) -> Option<HeaderValue> {
    let valid = !code.is_empty()
        && code
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid {
        return None;
    }
    HeaderValue::from_str(&format!("{LOCALE_PARAM}={code}; Path=/; SameSite=Lax")).ok()
}

fn cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| value.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_is_async_request() {
        let mut headers = HeaderMap::new();
        assert!(!is_async_request(&headers));

        headers.insert(REQUESTED_WITH_HEADER, HeaderValue::from_static("XMLHttpRequest"));
        assert!(is_async_request(&headers));

        headers.insert(REQUESTED_WITH_HEADER, HeaderValue::from_static("xmlhttprequest"));
        assert!(is_async_request(&headers));

        headers.insert(REQUESTED_WITH_HEADER, HeaderValue::from_static("fetch"));
        assert!(!is_async_request(&headers));
    }

    #[test]
    fn test_path_segments() {
        assert!(path_segments("/").is_empty());
        assert_eq!(path_segments("/about//team/"), vec!["about", "team"]);
        assert_eq!(path_segments("/search/caf%C3%A9"), vec!["search", "café"]);
    }

    #[test]
    fn test_locale_choice() {
        let mut headers = HeaderMap::new();
        assert_eq!(locale_choice(None, &headers), None);

        headers.insert(header::COOKIE, HeaderValue::from_static("sid=1; lang=fr"));
        assert_eq!(locale_choice(None, &headers), Some("fr".to_string()));
        assert_eq!(locale_choice(Some("lang=de&x=1"), &headers), Some("de".to_string()));
        assert_eq!(locale_choice(Some("x=1"), &headers), Some("fr".to_string()));
        assert_eq!(locale_choice(Some("lang="), &HeaderMap::new()), None);
    }

    #[test]
    fn test_query_locale() {
        assert_eq!(query_locale(None), None);
        assert_eq!(query_locale(Some("x=1")), None);
        assert_eq!(query_locale(Some("lang=%20FR%20")), Some("fr".to_string()));
    }

    #[test]
    fn test_locale_cookie() {
        assert_eq!(
            locale_cookie("fr").unwrap(),
            "lang=fr; Path=/; SameSite=Lax"
        );
        assert!(locale_cookie("").is_none());
        assert!(locale_cookie("fr; Path=/admin").is_none());
    }
}
