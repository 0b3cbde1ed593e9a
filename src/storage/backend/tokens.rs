use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};

use super::SeaOrmStorage;
use super::converters::model_to_refresh_token;
use crate::errors::Result;
use crate::storage::RefreshTokenRecord;

use migration::entities::refresh_token;

impl SeaOrmStorage {
    pub async fn insert_refresh_token(
        &self,
        token: &str,
        user_id: i32,
        expires_at: DateTime<Utc>,
    ) -> Result<RefreshTokenRecord> {
        let model = refresh_token::ActiveModel {
            token: Set(token.to_string()),
            user_id: Set(user_id),
            created_at: Set(Utc::now()),
            expires_at: Set(expires_at),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        Ok(model_to_refresh_token(model))
    }

    pub async fn find_refresh_token(&self, token: &str) -> Result<Option<RefreshTokenRecord>> {
        let model = refresh_token::Entity::find()
            .filter(refresh_token::Column::Token.eq(token))
            .one(&self.db)
            .await?;

        Ok(model.map(model_to_refresh_token))
    }

    /// Returns false when the token was not stored
    pub async fn delete_refresh_token(&self, token: &str) -> Result<bool> {
        let result = refresh_token::Entity::delete_many()
            .filter(refresh_token::Column::Token.eq(token))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }
}
