//! SARI CLI - Terminal client for the SARI database access portal
//!
//! Browses the RDS instances the current user may access, fetches
//! connection parameters, and tracks the expiry of the ephemeral IAM
//! auth-token password.

mod api;
mod config;
mod expiry;
mod models;
mod session;
mod tui;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::Config;

#[derive(Parser)]
#[command(name = "sari-cli")]
#[command(about = "Terminal client for the SARI database access portal", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Portal base URL (overrides the config file)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Portal session cookie value (overrides the config file)
    #[arg(long, global = true)]
    session_token: Option<String>,

    /// Session deadline as Unix epoch seconds (overrides the config file)
    #[arg(long, global = true)]
    session_deadline: Option<i64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Store the portal URL and session credentials in the config file
    Login,

    /// List accessible RDS instances, grouped by region
    Databases,

    /// Fetch the connection parameters for one database
    Config {
        /// AWS region name (from `databases` output)
        region: String,

        /// RDS instance identifier
        db_id: String,

        /// Database name
        db_name: String,
    },

    /// Track the expiry of a raw auth token, printing the remaining
    /// validity until it runs out
    Watch {
        /// Token string containing X-Amz-Date / X-Amz-Expires parameters
        token: String,
    },

    /// Launch the terminal user interface
    Tui,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let config = Config::load()?.with_overrides(
        cli.base_url,
        cli.session_token,
        cli.session_deadline,
    );

    match cli.command {
        Commands::Login => {
            config.save()?;
            tracing::info!("Configuration saved");
        }
        Commands::Databases => {
            tracing::info!("Fetching database list...");
            api::show_databases(&config).await?;
        }
        Commands::Config {
            region,
            db_id,
            db_name,
        } => {
            tracing::info!("Fetching connection parameters...");
            api::show_config(&config, &region, &db_id, &db_name).await?;
        }
        Commands::Watch { token } => {
            expiry::watch(&token).await?;
        }
        Commands::Tui => {
            tui::run(config).await?;
        }
    }

    Ok(())
}
