//! Mode routing
//!
//! - Server mode (HTTP server, default)
//! - `generate-config` (write a sample configuration file and exit)

pub mod config_gen;
pub mod server;

pub use config_gen::generate_config;
pub use server::run_server;
