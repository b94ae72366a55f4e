use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use homefeeds::app::AppContext;
use homefeeds::cli::{commands, Cli, Commands};
use homefeeds::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if cli.profile.is_some() {
        config.profile_dir = cli.profile;
    }
    if cli.package.is_some() {
        config.package_path = cli.package;
    }
    if cli.history.is_some() {
        config.history_db = cli.history;
    }

    let ctx = AppContext::new(&config);

    match cli.command {
        Commands::Show { landscape } => {
            commands::show(&ctx, landscape).await?;
        }
        Commands::Rotate => {
            commands::rotate(&ctx).await?;
        }
    }

    Ok(())
}
