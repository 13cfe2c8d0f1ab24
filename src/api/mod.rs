//! API client module for the SARI portal

pub mod client;

use anyhow::Result;
use chrono::Utc;

use crate::config::Config;
use crate::expiry::TokenExpiry;

pub use client::SariClient;

/// List accessible databases, grouped by region.
pub async fn show_databases(config: &Config) -> Result<()> {
    let client = SariClient::from_config(config)?;
    let databases = client.list_databases().await?;

    if databases.is_empty() {
        println!("No RDS instance you are allowed to access was found on this AWS account.");
        return Ok(());
    }

    for (region, region_dbs) in &databases {
        println!("{} ({})", region, region_dbs.location);
        for (db_id, names) in &region_dbs.instances {
            println!("  {}", db_id);
            for name in names {
                println!("    {}", name);
            }
        }
    }

    Ok(())
}

/// Fetch and print the connection parameters for one database.
pub async fn show_config(config: &Config, region: &str, db_id: &str, db_name: &str) -> Result<()> {
    let client = SariClient::from_config(config)?;
    let db_config = client.db_config(region, db_id, db_name).await?;

    for (name, value) in db_config.rows() {
        println!("{}={}", name, value);
    }

    if let Some(expiry) = TokenExpiry::parse(&db_config.rds_password) {
        let remaining_secs = (expiry.expires_at_millis - Utc::now().timestamp_millis()) / 1000;
        if remaining_secs > 0 {
            println!("# password valid for another {}s", remaining_secs);
        } else {
            println!("# password already expired");
        }
    }

    Ok(())
}
