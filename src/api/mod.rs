//! HTTP surface: routes, middleware and token handling

pub mod constants;
pub mod jwt;
pub mod middleware;
pub mod services;
