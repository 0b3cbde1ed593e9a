//! Access token guard for the `/shorten` scope

use actix_service::{Service, Transform};
use actix_web::{
    Error, FromRequest, HttpMessage, HttpRequest, ResponseError,
    body::EitherBody,
    dev::{Payload, ServiceRequest, ServiceResponse},
    http::{Method, header::AUTHORIZATION},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use std::sync::Arc;
use tracing::{debug, info, trace};

use crate::api::jwt::JwtService;
use crate::errors::ShortenerError;

/// Identity of the caller, set by [`AccessAuth`] after a valid access token
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: i32,
    pub email: String,
}

impl FromRequest for AuthenticatedUser {
    type Error = ShortenerError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<AuthenticatedUser>()
                .cloned()
                .ok_or_else(|| ShortenerError::unauthorized("Authentication required")),
        )
    }
}

/// Bearer access token 认证中间件
#[derive(Clone)]
pub struct AccessAuth {
    jwt: Arc<JwtService>,
}

impl AccessAuth {
    pub fn new(jwt: Arc<JwtService>) -> Self {
        Self { jwt }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AccessAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AccessAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AccessAuthMiddleware {
            service: Rc::new(service),
            jwt: self.jwt.clone(),
        }))
    }
}

pub struct AccessAuthMiddleware<S> {
    service: Rc<S>,
    jwt: Arc<JwtService>,
}

/// 从 Authorization header 提取 Bearer token
fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

impl<S> AccessAuthMiddleware<S> {
    fn authenticate(&self, token: &str) -> Result<AuthenticatedUser, ShortenerError> {
        let claims = self.jwt.validate_access_token(token).map_err(|e| {
            info!("Access token validation failed: {}", e);
            ShortenerError::forbidden("Invalid or expired token")
        })?;

        let user_id = claims.sub.parse::<i32>().map_err(|_| {
            info!("Access token carries a non-numeric subject: {}", claims.sub);
            ShortenerError::forbidden("Invalid or expired token")
        })?;

        Ok(AuthenticatedUser {
            user_id,
            email: claims.email,
        })
    }
}

fn reject<B>(req: ServiceRequest, err: ShortenerError) -> ServiceResponse<EitherBody<B>> {
    req.into_response(err.error_response().map_into_right_body())
}

impl<S, B> Service<ServiceRequest> for AccessAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();

        // CORS 预检请求直接放行
        if req.method() == Method::OPTIONS {
            return Box::pin(async move { Ok(srv.call(req).await?.map_into_left_body()) });
        }

        let Some(token) = extract_bearer_token(&req) else {
            debug!("Missing or malformed Authorization header");
            return Box::pin(async move {
                Ok(reject(
                    req,
                    ShortenerError::unauthorized("Missing or malformed Authorization header"),
                ))
            });
        };

        match self.authenticate(&token) {
            Ok(user) => {
                trace!("Access token accepted for user {}", user.user_id);
                req.extensions_mut().insert(user);
                Box::pin(async move { Ok(srv.call(req).await?.map_into_left_body()) })
            }
            Err(err) => Box::pin(async move { Ok(reject(req, err)) }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, http::StatusCode, test, web};

    fn jwt() -> Arc<JwtService> {
        Arc::new(JwtService::new(
            "middleware_access_secret",
            "middleware_refresh_secret",
            5,
            1,
        ))
    }

    async fn whoami(user: AuthenticatedUser) -> HttpResponse {
        HttpResponse::Ok().body(format!("{}:{}", user.user_id, user.email))
    }

    #[actix_rt::test]
    async fn test_missing_header_is_unauthorized() {
        let app = test::init_service(
            App::new().service(
                web::scope("/p")
                    .wrap(AccessAuth::new(jwt()))
                    .route("", web::get().to(whoami)),
            ),
        )
        .await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/p").to_request()).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::get()
            .uri("/p")
            .insert_header(("Authorization", "Basic abc"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_rt::test]
    async fn test_invalid_token_is_forbidden() {
        let service = jwt();
        let app = test::init_service(
            App::new().service(
                web::scope("/p")
                    .wrap(AccessAuth::new(service.clone()))
                    .route("", web::get().to(whoami)),
            ),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/p")
            .insert_header(("Authorization", "Bearer not-a-jwt"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        // refresh token 不能当 access token 用
        let refresh = service.generate_refresh_token(1).unwrap();
        let req = test::TestRequest::get()
            .uri("/p")
            .insert_header(("Authorization", format!("Bearer {}", refresh)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[actix_rt::test]
    async fn test_valid_token_exposes_user() {
        let service = jwt();
        let app = test::init_service(
            App::new().service(
                web::scope("/p")
                    .wrap(AccessAuth::new(service.clone()))
                    .route("", web::get().to(whoami)),
            ),
        )
        .await;

        let token = service.generate_access_token(9, "u@example.com").unwrap();
        let req = test::TestRequest::get()
            .uri("/p")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, "9:u@example.com");
    }
}
