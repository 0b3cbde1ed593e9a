use crate::storage::{RefreshTokenRecord, ShortUrl, UserAccount};
use migration::entities::{refresh_token, url, user};

pub fn model_to_short_url(model: url::Model) -> ShortUrl {
    ShortUrl {
        id: model.id,
        url: model.url,
        short_code: model.short_code,
        clicks: model.clicks.max(0) as u64,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

pub fn model_to_user(model: user::Model) -> UserAccount {
    UserAccount {
        id: model.id,
        email: model.email,
        password_hash: model.password,
        created_at: model.created_at,
    }
}

pub fn model_to_refresh_token(model: refresh_token::Model) -> RefreshTokenRecord {
    RefreshTokenRecord {
        id: model.id,
        token: model.token,
        user_id: model.user_id,
        created_at: model.created_at,
        expires_at: model.expires_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_model_to_short_url() {
        let now = Utc::now();
        let model = url::Model {
            id: 7,
            url: "https://example.com/a".to_string(),
            short_code: "ab12cd".to_string(),
            clicks: 42,
            created_at: now,
            updated_at: now,
        };

        let link = model_to_short_url(model);
        assert_eq!(link.id, 7);
        assert_eq!(link.short_code, "ab12cd");
        assert_eq!(link.clicks, 42);
    }

    #[test]
    fn test_negative_clicks_clamped_to_zero() {
        let now = Utc::now();
        let model = url::Model {
            id: 1,
            url: "https://example.com".to_string(),
            short_code: "x".to_string(),
            clicks: -3,
            created_at: now,
            updated_at: now,
        };

        assert_eq!(model_to_short_url(model).clicks, 0);
    }

    #[test]
    fn test_model_to_user_keeps_hash() {
        let model = user::Model {
            id: 3,
            email: "a@b.com".to_string(),
            password: "$argon2id$v=19$...".to_string(),
            created_at: Utc::now(),
        };

        let account = model_to_user(model);
        assert_eq!(account.email, "a@b.com");
        assert!(account.password_hash.starts_with("$argon2id"));
    }
}
