//! `/shorten` handlers

use actix_web::{HttpResponse, web};
use std::sync::Arc;
use tracing::trace;

use crate::api::middleware::AuthenticatedUser;
use crate::errors::ShortenerError;
use crate::services::UrlService;

use super::types::{UrlPayload, UrlResponse, UrlStatsResponse};

pub async fn create_short_url(
    user: AuthenticatedUser,
    body: web::Json<UrlPayload>,
    service: web::Data<Arc<UrlService>>,
) -> Result<HttpResponse, ShortenerError> {
    trace!("User {} creating short URL", user.user_id);
    let record = service.create(body.url.as_deref()).await?;
    Ok(HttpResponse::Created().json(UrlResponse::from(record)))
}

pub async fn resolve_short_url(
    code: web::Path<String>,
    service: web::Data<Arc<UrlService>>,
) -> Result<HttpResponse, ShortenerError> {
    let record = service.resolve(&code).await?;
    Ok(HttpResponse::Ok().json(UrlResponse::from(record)))
}

pub async fn update_short_url(
    code: web::Path<String>,
    body: web::Json<UrlPayload>,
    service: web::Data<Arc<UrlService>>,
) -> Result<HttpResponse, ShortenerError> {
    let record = service.update(&code, body.url.as_deref()).await?;
    Ok(HttpResponse::Ok().json(UrlResponse::from(record)))
}

pub async fn delete_short_url(
    code: web::Path<String>,
    service: web::Data<Arc<UrlService>>,
) -> Result<HttpResponse, ShortenerError> {
    service.delete(&code).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn short_url_stats(
    code: web::Path<String>,
    service: web::Data<Arc<UrlService>>,
) -> Result<HttpResponse, ShortenerError> {
    let record = service.stats(&code).await?;
    Ok(HttpResponse::Ok().json(UrlStatsResponse::from(record)))
}
