//! Volt - Entry Point
//!
//! Loads configuration, registers every configured HTTP service and
//! database, and keeps them alive until Ctrl-C.
//!
//! | Command | Description |
//! |---------|-------------|
//! | `volt` | Run with the discovered `volt.toml` |
//! | `volt --config path.toml` | Run with an explicit configuration file |
//! | `volt --check` | Validate the configuration, print it and exit |

use clap::Parser;
use std::sync::Arc;
use volt_infrastructure::logging::init_logging;
use volt_infrastructure::{ConfigLoader, Host, shutdown_signal};
use volt_providers::TracingObservability;

/// Command line interface for Volt
#[derive(Parser, Debug)]
#[command(name = "volt")]
#[command(about = "Volt - Service registry host")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<std::path::PathBuf>,

    /// Validate the merged configuration, print it as TOML and exit
    #[arg(long)]
    pub check: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut loader = ConfigLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_config_path(path);
    }
    let config = loader.load()?;

    if cli.check {
        print!("{}", toml::to_string_pretty(&config)?);
        return Ok(());
    }

    init_logging(&config.logging)?;

    let host = Host::new(config).with_observability(Arc::new(TracingObservability::new()));
    host.register_configured_services()?;
    host.run_until(shutdown_signal()).await?;
    Ok(())
}
