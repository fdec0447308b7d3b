use clap::Parser;
use color_eyre::Result;
use dotenvy::dotenv;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use solana_token_manager::{
    cli::{self, Cli},
    logging::setup_logging,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;
    // Load environment variables from .env file
    dotenv().ok();

    let cli = Cli::parse();
    setup_logging()?;

    // Ctrl-C stops polling and skips any submission that has not happened yet
    let cancel = CancellationToken::new();
    let signal_token = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("interrupt received, cancelling");
                signal_token.cancel();
            }
            Err(e) => warn!(error = %e, "unable to listen for interrupt"),
        }
    });

    cli::run(cli, cancel).await
}
