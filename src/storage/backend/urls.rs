//! URL record operations for SeaOrmStorage

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, sea_query::Expr};
use tracing::debug;

use super::SeaOrmStorage;
use super::converters::model_to_short_url;
use crate::errors::Result;
use crate::storage::ShortUrl;

use migration::entities::url;

impl SeaOrmStorage {
    /// 插入新的短链接记录
    ///
    /// `short_code` 重复时由数据库唯一约束拒绝，错误原样返回。
    pub async fn insert_url(&self, target: &str, short_code: &str) -> Result<ShortUrl> {
        let now = Utc::now();
        let model = url::ActiveModel {
            url: Set(target.to_string()),
            short_code: Set(short_code.to_string()),
            clicks: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        debug!("URL record inserted: {} -> {}", model.short_code, model.url);
        Ok(model_to_short_url(model))
    }

    pub async fn find_url_by_code(&self, short_code: &str) -> Result<Option<ShortUrl>> {
        let model = url::Entity::find()
            .filter(url::Column::ShortCode.eq(short_code))
            .one(&self.db)
            .await?;

        Ok(model.map(model_to_short_url))
    }

    /// 原子地 `clicks = clicks + 1`，记录不存在时返回 None
    pub async fn increment_clicks(&self, short_code: &str) -> Result<Option<ShortUrl>> {
        use sea_orm::ExprTrait;

        let result = url::Entity::update_many()
            .col_expr(url::Column::Clicks, Expr::col(url::Column::Clicks).add(1i64))
            .filter(url::Column::ShortCode.eq(short_code))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        self.find_url_by_code(short_code).await
    }

    /// 更新目标 URL 并刷新 `updated_at`，记录不存在时返回 None
    pub async fn update_url(&self, short_code: &str, target: &str) -> Result<Option<ShortUrl>> {
        let result = url::Entity::update_many()
            .col_expr(url::Column::Url, Expr::value(target.to_string()))
            .col_expr(url::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(url::Column::ShortCode.eq(short_code))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        self.find_url_by_code(short_code).await
    }

    /// Returns false when nothing matched
    pub async fn delete_url(&self, short_code: &str) -> Result<bool> {
        let result = url::Entity::delete_many()
            .filter(url::Column::ShortCode.eq(short_code))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }
}
