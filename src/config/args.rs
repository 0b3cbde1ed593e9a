//! Command-line interface definitions using clap

use clap::{Parser, Subcommand};

/// Shortener - URL shortening service with JWT sessions
#[derive(Parser, Debug)]
#[command(name = "shortener")]
#[command(version)]
#[command(about = "URL shortening service with account registration and JWT sessions", long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file (default: config.toml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Generate example configuration file
    GenerateConfig {
        /// Output path (default: config.example.toml)
        output_path: Option<String>,

        /// Overwrite the file if it exists
        #[arg(long)]
        force: bool,
    },
}
