//! URL management service
//!
//! Create, resolve, update, delete and inspect short URLs.

use std::sync::Arc;

use tracing::{error, info};

use crate::errors::{Result, ShortenerError};
use crate::storage::{SeaOrmStorage, ShortUrl};
use crate::utils::url_validator::{validate_url, validation_error_message};
use crate::utils::{generate_random_code, is_valid_short_code};

/// Returns the trimmed target URL if present and acceptable
pub fn require_target_url(url: Option<&str>) -> Result<&str> {
    let url = url
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ShortenerError::validation("You should provide a URL"))?;

    validate_url(url).map_err(|e| ShortenerError::validation(validation_error_message(&e)))?;
    Ok(url)
}

pub fn require_short_code(code: &str) -> Result<&str> {
    if is_valid_short_code(code) {
        Ok(code)
    } else {
        Err(ShortenerError::validation("Invalid short code"))
    }
}

fn not_found(code: &str) -> ShortenerError {
    ShortenerError::not_found(format!("Short URL not found: {}", code))
}

/// 记录存储层错误详情后原样返回（响应中不暴露细节）
fn log_store_error(operation: &str, code: &str, e: ShortenerError) -> ShortenerError {
    error!("UrlService: {} '{}' failed: {}", operation, code, e);
    e
}

pub struct UrlService {
    storage: Arc<SeaOrmStorage>,
    code_length: usize,
}

impl UrlService {
    pub fn new(storage: Arc<SeaOrmStorage>, code_length: usize) -> Self {
        Self {
            storage,
            code_length,
        }
    }

    /// 生成短码并保存
    ///
    /// 不预先检查短码冲突，唯一约束冲突直接作为 500 返回。
    pub async fn create(&self, url: Option<&str>) -> Result<ShortUrl> {
        let target = require_target_url(url)?;
        let code = generate_random_code(self.code_length);

        let record = self
            .storage
            .insert_url(target, &code)
            .await
            .map_err(|e| log_store_error("create", &code, e))?;

        info!("UrlService: created '{}' -> {}", record.short_code, record.url);
        Ok(record)
    }

    /// 解析短码，点击数原子加一
    pub async fn resolve(&self, code: &str) -> Result<ShortUrl> {
        let code = require_short_code(code)?;

        self.storage
            .increment_clicks(code)
            .await
            .map_err(|e| log_store_error("resolve", code, e))?
            .ok_or_else(|| not_found(code))
    }

    pub async fn update(&self, code: &str, url: Option<&str>) -> Result<ShortUrl> {
        let target = require_target_url(url)?;
        let code = require_short_code(code)?;

        let record = self
            .storage
            .update_url(code, target)
            .await
            .map_err(|e| log_store_error("update", code, e))?
            .ok_or_else(|| not_found(code))?;

        info!("UrlService: updated '{}' -> {}", code, record.url);
        Ok(record)
    }

    pub async fn delete(&self, code: &str) -> Result<()> {
        let code = require_short_code(code)?;

        let deleted = self
            .storage
            .delete_url(code)
            .await
            .map_err(|e| log_store_error("delete", code, e))?;

        if !deleted {
            return Err(not_found(code));
        }

        info!("UrlService: deleted '{}'", code);
        Ok(())
    }

    /// 读取完整记录（含点击数），不计入点击
    pub async fn stats(&self, code: &str) -> Result<ShortUrl> {
        let code = require_short_code(code)?;

        self.storage
            .find_url_by_code(code)
            .await
            .map_err(|e| log_store_error("stats", code, e))?
            .ok_or_else(|| not_found(code))
    }
}
