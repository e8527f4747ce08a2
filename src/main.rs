//! Ding - named countdown timers that fire from detached processes
//!
//! This is the main entry point for the ding command.

use tracing::debug;

use ding::{commands::dispatch, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Detached countdowns write into a log file, so no colour codes there
    tracing_subscriber::fmt()
        .with_env_filter(format!("ding={}", config.log_level()))
        .with_ansi(!config.is_detached())
        .with_writer(std::io::stderr)
        .init();

    let settings = config.settings()?;
    debug!("Using data directory {}", settings.data_dir.display());

    if let Some(output) = dispatch(&settings, config.command).await? {
        println!("{}", output);
    }

    Ok(())
}
