//! Scopebind command-line front end.
//!
//! Drives the resource editor engine over a snapshot file: inspect the
//! scope at an instance, evaluate expressions, save resources and change
//! the selected instance.

mod cli;
mod commands;
mod error;

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use scopebind_infrastructure::SettingsLoader;

use cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let settings = match SettingsLoader::from_env().load(cli.settings.as_deref()).await {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(2);
        }
    };

    // Initialize tracing; RUST_LOG wins over the configured filter
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!("scopebind v{}", env!("CARGO_PKG_VERSION"));

    match commands::run(cli, settings).await {
        Ok(output) => println!("{output}"),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
