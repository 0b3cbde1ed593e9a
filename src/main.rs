use anyhow::Context;
use clap::Parser;

use shortener::config::{AppConfig, Cli, Commands};
use shortener::runtime::modes::{generate_config, run_server};
use shortener::system::logging::init_logging;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if let Some(Commands::GenerateConfig { output_path, force }) = &cli.command {
        return generate_config(output_path.as_deref(), *force);
    }

    let mut config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    let _guard = init_logging(&config.logging)?;

    config.ensure_secrets();
    if let Err(e) = config.validate() {
        eprintln!("{}", e.format_colored());
        std::process::exit(1);
    }

    run_server(config).await
}
