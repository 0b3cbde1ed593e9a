use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info};

use crate::api::jwt::JwtService;
use crate::config::AppConfig;
use crate::services::{AuthService, UrlService};
use crate::storage::{SeaOrmStorage, StorageFactory};

/// Shared components built once and injected into every worker
pub struct StartupContext {
    pub storage: Arc<SeaOrmStorage>,
    pub jwt: Arc<JwtService>,
    pub url_service: Arc<UrlService>,
    pub auth_service: Arc<AuthService>,
}

/// 准备服务器启动的上下文：连接数据库、执行迁移、构建服务
pub async fn prepare_server_startup(config: &AppConfig) -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let storage = StorageFactory::create(&config.database)
        .await
        .context("Failed to create storage backend")?;
    info!(
        "Using storage backend: {}",
        storage.get_backend_config().storage_type
    );

    let context = build_context(storage, config);

    debug!(
        "Pre-startup processing completed in {} ms",
        start_time.elapsed().as_millis()
    );
    Ok(context)
}

/// Wire services on top of an existing store
pub fn build_context(storage: Arc<SeaOrmStorage>, config: &AppConfig) -> StartupContext {
    let jwt = Arc::new(JwtService::from_config(&config.auth));
    let url_service = Arc::new(UrlService::new(
        storage.clone(),
        config.features.code_length(),
    ));
    let auth_service = Arc::new(AuthService::new(storage.clone(), jwt.clone()));

    StartupContext {
        storage,
        jwt,
        url_service,
        auth_service,
    }
}
