//! Server mode
//!
//! Builds the shared services once and starts the HTTP server.

use actix_web::middleware::{Compress, DefaultHeaders};
use actix_web::{App, HttpServer, web};
use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::api::middleware::RequestIdMiddleware;
use crate::api::services::{AppStartTime, configure_routes, route_not_found};
use crate::config::AppConfig;
use crate::runtime::lifetime;

/// Run the HTTP server until Ctrl+C
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server(config: AppConfig) -> Result<()> {
    let app_start_time = AppStartTime {
        start_datetime: chrono::Utc::now(),
    };

    let startup = lifetime::startup::prepare_server_startup(&config)
        .await
        .inspect_err(|e| tracing::error!("Server startup failed: {:#}", e))?;

    let storage = startup.storage.clone();
    let jwt = startup.jwt.clone();
    let url_service = startup.url_service.clone();
    let auth_service = startup.auth_service.clone();

    let workers = config.server.workers.clamp(1, 64);
    info!("Using {} workers for the server", workers);

    let storage_for_app = storage.clone();
    let server = HttpServer::new(move || {
        let jwt = jwt.clone();
        App::new()
            .wrap(Compress::default())
            .wrap(RequestIdMiddleware)
            .wrap(DefaultHeaders::new().add(("Cache-Control", "no-store")))
            .app_data(web::Data::new(storage_for_app.clone()))
            .app_data(web::Data::new(url_service.clone()))
            .app_data(web::Data::new(auth_service.clone()))
            .app_data(web::Data::new(app_start_time.clone()))
            .configure(move |cfg| configure_routes(cfg, jwt))
            .default_service(web::to(route_not_found))
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .client_request_timeout(std::time::Duration::from_millis(5000))
    .workers(workers)
    .disable_signals();

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    let server = server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run();
    warn!("Server listening at http://{}", bind_address);

    actix_web::rt::spawn(lifetime::shutdown::listen_for_shutdown(server.handle()));

    server.await.context("HTTP server error")?;
    lifetime::shutdown::close_storage(&storage).await;
    warn!("Graceful shutdown completed");

    Ok(())
}
