//! `/auth` handlers

use actix_web::{HttpResponse, web};
use std::sync::Arc;

use crate::errors::ShortenerError;
use crate::services::AuthService;

use super::types::{
    CredentialsPayload, LoginResponse, RefreshPayload, RefreshResponse, RegisterResponse,
};

pub async fn register(
    body: web::Json<CredentialsPayload>,
    service: web::Data<Arc<AuthService>>,
) -> Result<HttpResponse, ShortenerError> {
    let user = service
        .register(body.email.as_deref(), body.password.as_deref())
        .await?;

    Ok(HttpResponse::Created().json(RegisterResponse {
        message: "User registered successfully".to_string(),
        user: user.into(),
    }))
}

pub async fn login(
    body: web::Json<CredentialsPayload>,
    service: web::Data<Arc<AuthService>>,
) -> Result<HttpResponse, ShortenerError> {
    let tokens = service
        .login(body.email.as_deref(), body.password.as_deref())
        .await?;

    Ok(HttpResponse::Ok().json(LoginResponse {
        message: "Login successful".to_string(),
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
    }))
}

pub async fn refresh(
    body: web::Json<RefreshPayload>,
    service: web::Data<Arc<AuthService>>,
) -> Result<HttpResponse, ShortenerError> {
    let access_token = service.refresh_access_token(body.token.as_deref()).await?;
    Ok(HttpResponse::Ok().json(RefreshResponse { access_token }))
}
