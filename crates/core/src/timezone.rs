//! 请求时区
//!
//! 时区作为请求上下文的一部分显式传递，不修改进程级状态。
//! 同一进程先后处理不同站点设置的请求时互不影响。

use chrono::{DateTime, FixedOffset, Local, Utc};
use chrono_tz::Tz;

use crate::settings::Settings;

/// 从设置中解析时区
///
/// 未设置或无法识别的时区名都返回 `None`，调用方回退到系统本地时区。
pub fn from_settings(settings: &Settings) -> Option<Tz> {
    settings.timezone().and_then(|name| name.parse::<Tz>().ok())
}

/// 将 UTC 时间转换到请求时区
pub fn localize(instant: DateTime<Utc>, timezone: Option<Tz>) -> DateTime<FixedOffset> {
    match timezone {
        Some(tz) => instant.with_timezone(&tz).fixed_offset(),
        None => instant.with_timezone(&Local).fixed_offset(),
    }
}

/// 请求时区下的当前时间
pub fn now(timezone: Option<Tz>) -> DateTime<FixedOffset> {
    localize(Utc::now(), timezone)
}
