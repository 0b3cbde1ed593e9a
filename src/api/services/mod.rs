pub mod auth;
pub mod health;
pub mod types;
pub mod urls;

use actix_web::{
    HttpRequest,
    body::{BoxBody, EitherBody},
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    error::JsonPayloadError,
    web,
};
use std::sync::Arc;
use tracing::debug;

use crate::api::constants::{AUTH_SCOPE, HEALTH_SCOPE, JSON_BODY_LIMIT, SHORTEN_SCOPE};
use crate::api::jwt::JwtService;
use crate::api::middleware::{AccessAuth, RequestId};
use crate::errors::ShortenerError;

pub use health::AppStartTime;

/// 请求体解析失败（格式错误、类型不符、超出大小）一律返回 400
fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!("[{}] Rejected JSON body: {}", RequestId::of(req), err);
    ShortenerError::validation(format!("Invalid request body: {}", err)).into()
}

pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_BODY_LIMIT)
        .error_handler(json_error_handler)
}

/// `/auth/refresh` 读不到 token 时按缺少 token 处理（401）
fn refresh_json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!("[{}] Rejected refresh body: {}", RequestId::of(req), err);
    ShortenerError::unauthorized("Refresh token is required").into()
}

fn refresh_json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_BODY_LIMIT)
        .error_handler(refresh_json_error_handler)
}

/// `/shorten` 路由，需要 access token
pub fn shorten_routes(
    jwt: Arc<JwtService>,
) -> actix_web::Scope<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<EitherBody<BoxBody>>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    web::scope(SHORTEN_SCOPE)
        .wrap(AccessAuth::new(jwt))
        .route("", web::post().to(urls::create_short_url))
        .route("/{code}/stats", web::get().to(urls::short_url_stats))
        .route("/{code}", web::get().to(urls::resolve_short_url))
        .route("/{code}", web::put().to(urls::update_short_url))
        .route("/{code}", web::delete().to(urls::delete_short_url))
}

/// `/auth` 路由，无需认证
pub fn auth_routes() -> actix_web::Scope {
    web::scope(AUTH_SCOPE)
        .route("/register", web::post().to(auth::register))
        .route("/login", web::post().to(auth::login))
        .service(
            web::resource("/refresh")
                .app_data(refresh_json_config())
                .route(web::post().to(auth::refresh)),
        )
}

pub fn health_routes() -> actix_web::Scope {
    web::scope(HEALTH_SCOPE)
        .route("", web::get().to(health::health_check))
        .route("/live", web::get().to(health::liveness_check))
}

/// Registers every route and the JSON extractor config
///
/// Services must be registered as `web::Data<Arc<_>>` by the caller.
pub fn configure_routes(cfg: &mut web::ServiceConfig, jwt: Arc<JwtService>) {
    cfg.app_data(json_config())
        .service(health_routes())
        .service(auth_routes())
        .service(shorten_routes(jwt));
}

pub async fn route_not_found() -> Result<actix_web::HttpResponse, ShortenerError> {
    Err(ShortenerError::not_found("Route not found"))
}
