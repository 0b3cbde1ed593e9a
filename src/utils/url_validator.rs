//! Target URL validation
//!
//! The input is parsed with `url::Url` first and then judged by its scheme and host,
//! so `JAVASCRIPT:` and `javascript:` are treated alike.

use url::{ParseError, Url};

#[derive(Debug, PartialEq, Eq)]
pub enum UrlValidationError {
    Empty,
    /// 没有协议部分，例如 `example.com/path`
    MissingScheme,
    UnsupportedScheme(String),
    DangerousScheme(String),
    Malformed(String),
    MissingHost,
}

impl std::fmt::Display for UrlValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "URL is empty"),
            Self::MissingScheme => write!(f, "URL has no scheme"),
            Self::UnsupportedScheme(scheme) => write!(f, "unsupported scheme '{}'", scheme),
            Self::DangerousScheme(scheme) => write!(f, "blocked scheme '{}'", scheme),
            Self::Malformed(reason) => write!(f, "malformed URL: {}", reason),
            Self::MissingHost => write!(f, "URL has no host"),
        }
    }
}

impl std::error::Error for UrlValidationError {}

const ALLOWED_SCHEMES: &[&str] = &["http", "https"];

// 可执行脚本或读取本地资源的协议
const BLOCKED_SCHEMES: &[&str] = &["javascript", "data", "file", "vbscript", "about", "blob"];

/// Accepts only absolute `http`/`https` URLs that name a host
///
/// Other well-formed URLs such as `ftp://..` or `mailto:..` are rejected as
/// [`UrlValidationError::UnsupportedScheme`].
pub fn validate_url(input: &str) -> Result<(), UrlValidationError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(UrlValidationError::Empty);
    }

    let parsed = Url::parse(input).map_err(|e| match e {
        ParseError::RelativeUrlWithoutBase => UrlValidationError::MissingScheme,
        other => UrlValidationError::Malformed(other.to_string()),
    })?;

    // Url 已将 scheme 转为小写
    let scheme = parsed.scheme();
    if BLOCKED_SCHEMES.contains(&scheme) {
        return Err(UrlValidationError::DangerousScheme(scheme.to_string()));
    }
    if !ALLOWED_SCHEMES.contains(&scheme) {
        return Err(UrlValidationError::UnsupportedScheme(scheme.to_string()));
    }

    match parsed.host_str() {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err(UrlValidationError::MissingHost),
    }
}

/// Message shown to API clients
pub fn validation_error_message(error: &UrlValidationError) -> &'static str {
    match error {
        UrlValidationError::Empty => "You should provide a URL",
        UrlValidationError::MissingScheme | UrlValidationError::UnsupportedScheme(_) => {
            "URL must start with http:// or https://"
        }
        UrlValidationError::DangerousScheme(_) => "This URL protocol is not allowed",
        UrlValidationError::Malformed(_) | UrlValidationError::MissingHost => "Invalid URL format",
    }
}
