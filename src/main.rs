use clap::Parser;
use tenant_governance::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli::bootstrap(cli.config.as_deref())?;

    match cli.command {
        Command::Migrate => cli::migrate::run(&config).await,
        Command::Teams => cli::inspect::teams(&config).await,
        Command::Quota(args) => cli::inspect::quota(&config, args).await,
    }
}
