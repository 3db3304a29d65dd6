//! CLI module for tenant governance
//!
//! Operational subcommands for a deployed backend:
//! - `migrate`: apply the PostgreSQL schema
//! - `teams`: list stored teams
//! - `quota`: show the quota of one item

pub mod inspect;
pub mod migrate;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// Tenant governance - teams and quotas for a multi-tenant platform
#[derive(Parser)]
#[command(name = "tenant-governance")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file, used instead of config/local
    #[arg(long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Apply pending PostgreSQL migrations
    Migrate,

    /// List all teams
    Teams,

    /// Show the quota of an item
    Quota(inspect::QuotaArgs),
}

/// Load `.env`, the configuration and the global subscriber
pub fn bootstrap(config_file: Option<&str>) -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load(config_file)?;
    logging::init_logging(&config.logging)?;

    Ok(config)
}
