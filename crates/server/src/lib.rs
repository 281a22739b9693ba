//! Fir HTTP 宿主
//!
//! 把 axum 请求转换为管线输入，在阻塞线程上执行管线，
//! 再把组装好的响应写回客户端。
//!
//! ## 模块结构
//!
//! - `request` - 路由段、异步请求标记和语言选择的提取
//! - `pages` - 页面注册表
//! - `middleware` - 请求体限制和超时
//! - `error` - HTTP 错误响应

pub mod error;
pub mod middleware;
pub mod pages;
pub mod request;

pub use error::ServerError;
pub use middleware::SecurityMiddlewareConfig;
pub use pages::{PageRegistry, HOME_PAGE};

use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use fir_core::{AsyncFlag, DbConnection, Pipeline, RequestInput};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, info};

/// 路由共享状态
#[derive(Clone)]
pub struct AppState {
    pub db: DbConnection,
    pub pipeline: Arc<Pipeline>,
    pub pages: Arc<PageRegistry>,
}

/// 构建页面路由
pub fn router(state: AppState, security: &SecurityMiddlewareConfig) -> Router {
    let router: Router<AppState> = Router::new()
        .route("/", get(dispatch).post(dispatch))
        .route("/*path", get(dispatch).post(dispatch));
    security.apply(router).with_state(state)
}

/// 监听地址并提供服务
pub async fn serve(addr: SocketAddr, router: Router) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("[Fir] 服务已启动: http://{}", listener.local_addr()?);
    axum::serve(listener, router).await
}

async fn dispatch(
    State(state): State<AppState>,
    uri: Uri,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    let path = pages::route_path(request::path_segments(uri.path()));
    let is_async = request::is_async_request(&headers);
    let choice = request::locale_choice(uri.query(), &headers);
    // 仅在查询参数选择了可用语言时写回 cookie，供后续请求沿用
    let remembered = request::query_locale(uri.query())
        .filter(|code| state.pipeline.services().languages.supports(code))
        .and_then(|code| request::locale_cookie(&code));
    let (page, status) = state.pages.resolve(&path);

    debug!(
        path = %uri.path(),
        is_async,
        status = status.as_u16(),
        "[Fir] 处理页面请求"
    );

    let db = Arc::clone(&state.db);
    let pipeline = Arc::clone(&state.pipeline);
    let input = RequestInput::new(path).with_locale_choice(choice);

    // rusqlite 是同步的，管线放到阻塞线程执行
    let envelope = tokio::task::spawn_blocking(move || {
        pipeline.respond(db, input, page.as_ref(), &AsyncFlag(is_async))
    })
    .await??;

    let content_type = envelope.content_type();
    let body = envelope.into_body()?;

    let mut response = (status, body).into_response();
    let response_headers = response.headers_mut();
    response_headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    response_headers.insert(
        header::VARY,
        HeaderValue::from_static(request::REQUESTED_WITH_HEADER),
    );
    if let Some(cookie) = remembered {
        response_headers.insert(header::SET_COOKIE, cookie);
    }
    Ok(response)
}
