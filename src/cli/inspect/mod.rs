//! Read-only inspection commands

use clap::Args;

use crate::config::AppConfig;

/// Arguments for the quota command
#[derive(Args, Clone)]
pub struct QuotaArgs {
    /// Name of the item owning the quota (a user email, an app name)
    pub item: String,
}

/// Print every team as JSON
pub async fn teams(config: &AppConfig) -> anyhow::Result<()> {
    let governance = crate::create_governance(config).await?;
    let teams = governance.teams.list().await?;

    println!("{}", serde_json::to_string_pretty(&teams)?);
    Ok(())
}

/// Print the quota of one item as JSON
pub async fn quota(config: &AppConfig, args: QuotaArgs) -> anyhow::Result<()> {
    let governance = crate::create_governance(config).await?;
    let quota = governance.quotas.get(args.item.as_str()).await?;

    println!("{}", serde_json::to_string_pretty(&quota)?);
    Ok(())
}
