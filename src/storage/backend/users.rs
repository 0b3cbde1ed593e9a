use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};

use super::converters::model_to_user;
use super::{SeaOrmStorage, is_unique_violation};
use crate::errors::{Result, ShortenerError};
use crate::storage::UserAccount;

use migration::entities::user;

impl SeaOrmStorage {
    /// 创建用户，邮箱唯一约束冲突时返回 Conflict
    pub async fn insert_user(&self, email: &str, password_hash: &str) -> Result<UserAccount> {
        let result = user::ActiveModel {
            email: Set(email.to_string()),
            password: Set(password_hash.to_string()),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await;

        match result {
            Ok(model) => Ok(model_to_user(model)),
            Err(e) if is_unique_violation(&e) => Err(ShortenerError::conflict(
                "A user with this email already exists",
            )),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<UserAccount>> {
        let model = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?;

        Ok(model.map(model_to_user))
    }

    pub async fn find_user_by_id(&self, id: i32) -> Result<Option<UserAccount>> {
        let model = user::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(model_to_user))
    }
}
