use actix_web::{HttpResponse, web};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, trace};

use crate::storage::SeaOrmStorage;

use super::types::HealthResponse;

// 应用启动时间
#[derive(Clone, Debug)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// 存储连通性检查，数据库不可用时返回 503
pub async fn health_check(
    storage: web::Data<Arc<SeaOrmStorage>>,
    app_start_time: web::Data<AppStartTime>,
) -> HttpResponse {
    trace!("Received health check request");

    let healthy = match tokio::time::timeout(Duration::from_secs(5), storage.ping()).await {
        Ok(Ok(())) => true,
        Ok(Err(e)) => {
            error!("Storage health check failed: {}", e);
            false
        }
        Err(_) => {
            error!("Storage health check timeout");
            false
        }
    };

    let now = chrono::Utc::now();
    let body = HealthResponse {
        status: if healthy { "healthy" } else { "unhealthy" },
        storage: storage.get_backend_config().storage_type,
        uptime_seconds: (now - app_start_time.start_datetime).num_seconds().max(0) as u64,
        timestamp: now,
    };

    if healthy {
        HttpResponse::Ok().json(body)
    } else {
        HttpResponse::ServiceUnavailable().json(body)
    }
}

// 活跃性检查
pub async fn liveness_check() -> HttpResponse {
    HttpResponse::NoContent().finish()
}
