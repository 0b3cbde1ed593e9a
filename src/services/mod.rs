//! Service layer for business logic
//!
//! Handlers stay thin: request validation, store access and token handling
//! live here.

mod auth_service;
mod url_service;

pub use auth_service::*;
pub use url_service::*;
