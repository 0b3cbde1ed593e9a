//! Shortener - URL shortening service
//!
//! Accepts long URLs, hands out short codes, resolves them while counting
//! clicks, and manages user accounts with JWT access/refresh tokens.
//!
//! # Architecture
//! - `api`: HTTP routes, middleware and token handling
//! - `services`: URL and account business logic
//! - `storage`: SeaORM data store gateway (SQLite, MySQL, PostgreSQL)
//! - `config`: Configuration loading and CLI arguments
//! - `runtime`: Server startup and shutdown
//! - `system`: Logging setup

pub mod api;
pub mod config;
pub mod errors;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
