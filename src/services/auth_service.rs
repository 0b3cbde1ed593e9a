//! Account registration, login and access token renewal

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};

use crate::api::jwt::JwtService;
use crate::errors::{Result, ShortenerError};
use crate::storage::{SeaOrmStorage, UserAccount};
use crate::utils::password::{hash_password, verify_password};

/// 与 users.email 列宽一致
const MAX_EMAIL_LENGTH: usize = 320;

const INVALID_CREDENTIALS: &str = "Invalid email or password";
const INVALID_REFRESH_TOKEN: &str = "Invalid or expired refresh token";

/// Tokens issued by a successful login
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Trimmed, lower-cased email; rejects missing or empty values
pub fn normalize_email(email: Option<&str>) -> Result<String> {
    let email = email
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .ok_or_else(|| ShortenerError::validation("Email and password are required"))?;

    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ShortenerError::validation("Email is too long"));
    }

    Ok(email.to_lowercase())
}

fn require_password(password: Option<&str>) -> Result<&str> {
    password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ShortenerError::validation("Email and password are required"))
}

pub struct AuthService {
    storage: Arc<SeaOrmStorage>,
    jwt: Arc<JwtService>,
}

impl AuthService {
    pub fn new(storage: Arc<SeaOrmStorage>, jwt: Arc<JwtService>) -> Self {
        Self { storage, jwt }
    }

    pub fn jwt(&self) -> &Arc<JwtService> {
        &self.jwt
    }

    pub async fn register(&self, email: Option<&str>, password: Option<&str>) -> Result<UserAccount> {
        let email = normalize_email(email)?;
        let password = require_password(password)?.to_string();

        if self.storage.find_user_by_email(&email).await?.is_some() {
            return Err(ShortenerError::conflict("A user with this email already exists"));
        }

        // argon2 计算量大，放到阻塞线程池
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| ShortenerError::internal(format!("Password hashing task failed: {}", e)))??;

        let user = self
            .storage
            .insert_user(&email, &password_hash)
            .await
            .inspect_err(|e| {
                if !matches!(e, ShortenerError::Conflict(_)) {
                    error!("AuthService: failed to create user: {}", e);
                }
            })?;

        info!("AuthService: registered user {}", user.id);
        Ok(user)
    }

    pub async fn login(&self, email: Option<&str>, password: Option<&str>) -> Result<TokenPair> {
        let email = normalize_email(email)?;
        let password = require_password(password)?.to_string();

        let Some(user) = self.storage.find_user_by_email(&email).await? else {
            info!("AuthService: login attempt for unknown email");
            return Err(ShortenerError::unauthorized(INVALID_CREDENTIALS));
        };

        let stored_hash = user.password_hash.clone();
        let matches = tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash))
            .await
            .map_err(|e| ShortenerError::internal(format!("Password verify task failed: {}", e)))??;

        if !matches {
            info!("AuthService: wrong password for user {}", user.id);
            return Err(ShortenerError::unauthorized(INVALID_CREDENTIALS));
        }

        let access_token = self.jwt.generate_access_token(user.id, &user.email)?;
        let refresh_token = self.jwt.generate_refresh_token(user.id)?;
        let expires_at = Utc::now() + self.jwt.refresh_token_ttl();

        self.storage
            .insert_refresh_token(&refresh_token, user.id, expires_at)
            .await
            .inspect_err(|e| error!("AuthService: failed to store refresh token: {}", e))?;

        info!("AuthService: user {} logged in", user.id);
        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// 用 refresh token 换取新的 access token（不轮换 refresh token）
    pub async fn refresh_access_token(&self, token: Option<&str>) -> Result<String> {
        let token = token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ShortenerError::unauthorized("Refresh token is required"))?;

        let Some(record) = self.storage.find_refresh_token(token).await? else {
            info!("AuthService: refresh token not found");
            return Err(ShortenerError::forbidden(INVALID_REFRESH_TOKEN));
        };

        if record.is_expired_at(Utc::now()) {
            warn!(
                "AuthService: expired refresh token used by user {}, deleting",
                record.user_id
            );
            self.storage.delete_refresh_token(token).await?;
            return Err(ShortenerError::forbidden(INVALID_REFRESH_TOKEN));
        }

        let claims = self.jwt.validate_refresh_token(token).map_err(|e| {
            info!("AuthService: refresh token validation failed: {}", e);
            ShortenerError::forbidden(INVALID_REFRESH_TOKEN)
        })?;

        if claims.sub != record.user_id.to_string() {
            warn!(
                "AuthService: refresh token subject {} does not match owner {}",
                claims.sub, record.user_id
            );
            return Err(ShortenerError::forbidden(INVALID_REFRESH_TOKEN));
        }

        let user = self
            .storage
            .find_user_by_id(record.user_id)
            .await?
            .ok_or_else(|| ShortenerError::forbidden(INVALID_REFRESH_TOKEN))?;

        Ok(self.jwt.generate_access_token(user.id, &user.email)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(
            normalize_email(Some("  Alice@Example.COM ")).unwrap(),
            "alice@example.com"
        );
        assert!(matches!(
            normalize_email(None),
            Err(ShortenerError::Validation(_))
        ));
        assert!(matches!(
            normalize_email(Some("   ")),
            Err(ShortenerError::Validation(_))
        ));
        assert!(normalize_email(Some(&format!("{}@x.io", "a".repeat(320)))).is_err());
    }

    #[test]
    fn test_require_password() {
        assert_eq!(require_password(Some(" pw ")).unwrap(), " pw ");
        assert!(require_password(Some("")).is_err());
        assert!(require_password(None).is_err());
    }
}
