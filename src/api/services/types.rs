//! Request and response bodies
//!
//! Request fields are optional so that a missing field yields a 400 with a
//! specific message instead of a generic deserialization error.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::{ShortUrl, UserAccount};

#[derive(Deserialize, Debug, Default)]
pub struct UrlPayload {
    pub url: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub struct CredentialsPayload {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub struct RefreshPayload {
    pub token: Option<String>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UrlResponse {
    pub id: i32,
    pub url: String,
    pub short_code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ShortUrl> for UrlResponse {
    fn from(record: ShortUrl) -> Self {
        Self {
            id: record.id,
            url: record.url,
            short_code: record.short_code,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Full record including the click counter
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UrlStatsResponse {
    pub id: i32,
    pub url: String,
    pub short_code: String,
    pub clicks: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ShortUrl> for UrlStatsResponse {
    fn from(record: ShortUrl) -> Self {
        Self {
            id: record.id,
            url: record.url,
            short_code: record.short_code,
            clicks: record.clicks,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i32,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<UserAccount> for UserResponse {
    fn from(user: UserAccount) -> Self {
        Self {
            id: user.id,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

#[derive(Serialize, Debug)]
pub struct RegisterResponse {
    pub message: String,
    pub user: UserResponse,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub message: String,
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub access_token: String,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub storage: String,
    pub uptime_seconds: u64,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_response_uses_camel_case() {
        let now = Utc::now();
        let record = ShortUrl {
            id: 1,
            url: "https://example.com".to_string(),
            short_code: "abc123".to_string(),
            clicks: 3,
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(UrlResponse::from(record.clone())).unwrap();
        assert_eq!(json["shortCode"], "abc123");
        assert!(json.get("clicks").is_none());
        assert!(json.get("createdAt").is_some());

        let json = serde_json::to_value(UrlStatsResponse::from(record)).unwrap();
        assert_eq!(json["clicks"], 3);
        assert!(json.get("updatedAt").is_some());
    }

    #[test]
    fn test_wrongly_typed_field_is_rejected() {
        assert!(serde_json::from_str::<UrlPayload>(r#"{"url": 5}"#).is_err());
        let payload: UrlPayload = serde_json::from_str("{}").unwrap();
        assert!(payload.url.is_none());
    }
}
