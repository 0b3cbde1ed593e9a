//! API 模块常量定义

/// JSON 请求体上限（64 KiB）
pub const JSON_BODY_LIMIT: usize = 64 * 1024;

pub const SHORTEN_SCOPE: &str = "/shorten";
pub const AUTH_SCOPE: &str = "/auth";
pub const HEALTH_SCOPE: &str = "/health";
