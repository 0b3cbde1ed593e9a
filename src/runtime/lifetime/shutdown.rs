use actix_web::dev::ServerHandle;
use std::time::Duration;
use tokio::signal;
use tokio::time::timeout;
use tracing::{error, info, warn};

use crate::storage::SeaOrmStorage;

/// 关闭超时时间（秒）
const SHUTDOWN_TIMEOUT_SECS: u64 = 30;

/// 等待 Ctrl+C，然后优雅停止 HTTP 服务
pub async fn listen_for_shutdown(handle: ServerHandle) {
    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Shutdown signal received, stopping server...");
        }
        Err(e) => {
            warn!(
                "Failed to listen for Ctrl+C: {}. Proceeding with shutdown anyway.",
                e
            );
        }
    }

    if timeout(Duration::from_secs(SHUTDOWN_TIMEOUT_SECS), handle.stop(true))
        .await
        .is_err()
    {
        error!(
            "Graceful stop timed out after {} seconds, forcing stop",
            SHUTDOWN_TIMEOUT_SECS
        );
        handle.stop(false).await;
    }
}

/// 服务停止后关闭连接池
pub async fn close_storage(storage: &SeaOrmStorage) {
    match storage.close().await {
        Ok(()) => info!("Database connections closed"),
        Err(e) => error!("Failed to close database: {}", e),
    }
}
