mod notifier;
mod prompts;
mod wizard;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use presta_core::session::SessionStore;
use presta_infrastructure::FileSessionStore;

use crate::wizard::Route;

#[derive(Parser)]
#[command(name = "presta")]
#[command(about = "Terminal wizard for personal loan applications", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the application wizard (the default)
    Wizard {
        /// Screen to open first: landing, simulate, approval or documents
        route: Option<String>,
    },
    /// Forget the locally stored session
    Reset,
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_env("PRESTA_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command.unwrap_or(Commands::Wizard { route: None }) {
        Commands::Wizard { route } => {
            let start = route.as_deref().map(Route::parse).unwrap_or(Route::Landing);
            wizard::run(start).await
        }
        Commands::Reset => reset_session().await,
    }
}

/// Clears the stored session without touching the remote record.
async fn reset_session() -> Result<()> {
    let store = FileSessionStore::new()?;
    store.clear().await?;
    println!("{}", "Session cleared.".bright_green());
    Ok(())
}
