//! HTTP 中间件

pub mod security;

pub use security::SecurityMiddlewareConfig;
