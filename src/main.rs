use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use panreel::app::AppContext;
use panreel::cli::{commands, Cli, Commands};
use panreel::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);

    match cli.command {
        Commands::Report(_) => {
            let ctx = AppContext::new(config)?;
            commands::report(&ctx).await?;
        }
        Commands::List(_) => {
            commands::list(&config)?;
        }
        Commands::Sweep { .. } => {
            commands::sweep(&config)?;
        }
    }

    Ok(())
}
