use std::fmt;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;

/// Message returned to clients for every 5xx error.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Debug, Clone)]
pub enum ShortenerError {
    Validation(String),
    NotFound(String),
    Conflict(String),
    Unauthorized(String),
    Forbidden(String),
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    PasswordHash(String),
    TokenCreation(String),
    Internal(String),
}

impl ShortenerError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            ShortenerError::Validation(_) => "E001",
            ShortenerError::NotFound(_) => "E002",
            ShortenerError::Conflict(_) => "E003",
            ShortenerError::Unauthorized(_) => "E004",
            ShortenerError::Forbidden(_) => "E005",
            ShortenerError::DatabaseConfig(_) => "E006",
            ShortenerError::DatabaseConnection(_) => "E007",
            ShortenerError::DatabaseOperation(_) => "E008",
            ShortenerError::PasswordHash(_) => "E009",
            ShortenerError::TokenCreation(_) => "E010",
            ShortenerError::Internal(_) => "E011",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            ShortenerError::Validation(_) => "Validation Error",
            ShortenerError::NotFound(_) => "Resource Not Found",
            ShortenerError::Conflict(_) => "Conflict",
            ShortenerError::Unauthorized(_) => "Unauthorized",
            ShortenerError::Forbidden(_) => "Forbidden",
            ShortenerError::DatabaseConfig(_) => "Database Configuration Error",
            ShortenerError::DatabaseConnection(_) => "Database Connection Error",
            ShortenerError::DatabaseOperation(_) => "Database Operation Error",
            ShortenerError::PasswordHash(_) => "Password Hash Error",
            ShortenerError::TokenCreation(_) => "Token Creation Error",
            ShortenerError::Internal(_) => "Internal Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            ShortenerError::Validation(msg)
            | ShortenerError::NotFound(msg)
            | ShortenerError::Conflict(msg)
            | ShortenerError::Unauthorized(msg)
            | ShortenerError::Forbidden(msg)
            | ShortenerError::DatabaseConfig(msg)
            | ShortenerError::DatabaseConnection(msg)
            | ShortenerError::DatabaseOperation(msg)
            | ShortenerError::PasswordHash(msg)
            | ShortenerError::TokenCreation(msg)
            | ShortenerError::Internal(msg) => msg,
        }
    }

    /// HTTP status this error maps to
    pub fn http_status(&self) -> StatusCode {
        match self {
            ShortenerError::Validation(_) => StatusCode::BAD_REQUEST,
            ShortenerError::NotFound(_) => StatusCode::NOT_FOUND,
            ShortenerError::Conflict(_) => StatusCode::CONFLICT,
            ShortenerError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ShortenerError::Forbidden(_) => StatusCode::FORBIDDEN,
            ShortenerError::DatabaseConfig(_)
            | ShortenerError::DatabaseConnection(_)
            | ShortenerError::DatabaseOperation(_)
            | ShortenerError::PasswordHash(_)
            | ShortenerError::TokenCreation(_)
            | ShortenerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether the message may be shown to the client
    pub fn is_client_error(&self) -> bool {
        self.http_status().is_client_error()
    }

    /// 格式化为彩色输出（用于启动失败时的终端输出）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for ShortenerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for ShortenerError {}

// 便捷的构造函数
impl ShortenerError {
    pub fn validation<T: Into<String>>(msg: T) -> Self {
        ShortenerError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        ShortenerError::NotFound(msg.into())
    }

    pub fn conflict<T: Into<String>>(msg: T) -> Self {
        ShortenerError::Conflict(msg.into())
    }

    pub fn unauthorized<T: Into<String>>(msg: T) -> Self {
        ShortenerError::Unauthorized(msg.into())
    }

    pub fn forbidden<T: Into<String>>(msg: T) -> Self {
        ShortenerError::Forbidden(msg.into())
    }

    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        ShortenerError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        ShortenerError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        ShortenerError::DatabaseOperation(msg.into())
    }

    pub fn password_hash<T: Into<String>>(msg: T) -> Self {
        ShortenerError::PasswordHash(msg.into())
    }

    pub fn token_creation<T: Into<String>>(msg: T) -> Self {
        ShortenerError::TokenCreation(msg.into())
    }

    pub fn internal<T: Into<String>>(msg: T) -> Self {
        ShortenerError::Internal(msg.into())
    }
}

/// JSON body of every error response
#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub error: &'a str,
    pub code: &'static str,
}

impl ResponseError for ShortenerError {
    fn status_code(&self) -> StatusCode {
        self.http_status()
    }

    fn error_response(&self) -> HttpResponse {
        // 5xx 不向客户端暴露内部细节，只写日志
        let message = if self.is_client_error() {
            self.message()
        } else {
            tracing::error!("{} [{}]", self.format_simple(), self.code());
            INTERNAL_ERROR_MESSAGE
        };

        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: message,
            code: self.code(),
        })
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for ShortenerError {
    fn from(err: sea_orm::DbErr) -> Self {
        ShortenerError::DatabaseOperation(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for ShortenerError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        ShortenerError::TokenCreation(err.to_string())
    }
}

impl From<crate::utils::password::PasswordError> for ShortenerError {
    fn from(err: crate::utils::password::PasswordError) -> Self {
        ShortenerError::PasswordHash(err.to_string())
    }
}

impl From<crate::utils::url_validator::UrlValidationError> for ShortenerError {
    fn from(err: crate::utils::url_validator::UrlValidationError) -> Self {
        ShortenerError::Validation(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ShortenerError>;

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ShortenerError::validation("x").http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ShortenerError::not_found("x").http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ShortenerError::conflict("x").http_status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ShortenerError::unauthorized("x").http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ShortenerError::forbidden("x").http_status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ShortenerError::database_operation("x").http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_display_uses_simple_format() {
        let err = ShortenerError::not_found("Short URL not found");
        assert_eq!(err.to_string(), "Resource Not Found: Short URL not found");
    }

    #[test]
    fn test_db_error_converts_to_database_operation() {
        let err: ShortenerError = sea_orm::DbErr::Custom("boom".to_string()).into();
        assert!(matches!(err, ShortenerError::DatabaseOperation(_)));
        assert!(err.message().contains("boom"));
    }

    #[actix_rt::test]
    async fn test_internal_message_is_withheld() {
        let err = ShortenerError::database_operation("UNIQUE constraint failed: urls.short_code");
        let resp = err.error_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(resp.into_body()).await.unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.contains(INTERNAL_ERROR_MESSAGE));
        assert!(!text.contains("UNIQUE"));
    }

    #[actix_rt::test]
    async fn test_client_error_message_is_returned() {
        let err = ShortenerError::validation("You should provide a URL");
        let resp = err.error_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "You should provide a URL");
        assert_eq!(json["code"], "E001");
    }
}
