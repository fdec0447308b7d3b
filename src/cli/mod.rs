//! Command line surface.
//!
//! Each subcommand maps onto one `TokenManager` operation. Transfers ask for
//! an explicit typed "yes" before anything touches the network.
use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
    sync::Arc,
};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr};
use solana_sdk::{native_token::LAMPORTS_PER_SOL, signature::Signer};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::{
    config::SolanaConfig,
    constants::DEFAULT_MINT_KEY_FILE,
    domain::{DefaultTokenManager, TokenManager},
    models::{
        AccountInfoRequest, CreateAccountRequest, CreateTokenRequest, TransferNativeRequest,
        TransferTokenRequest,
    },
    services::{
        keystore::{FileKeyStore, KeyStoreTrait},
        provider::{SolanaProvider, SolanaProviderTrait},
    },
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Solana token management CLI", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Create a new account key pair, funded from the faucet on the sandbox cluster
    #[command(name = "create_account")]
    CreateAccount {
        /// File the new account key pair is written to
        #[arg(long)]
        output_key_file: PathBuf,
    },

    /// Create a token with metadata and mint its initial supply to the owner
    #[command(name = "create_token")]
    CreateToken {
        /// File with the owner account key pair
        #[arg(long)]
        owner_key_file: PathBuf,

        /// File the new mint key pair is written to
        #[arg(long, default_value = DEFAULT_MINT_KEY_FILE)]
        output_key_file: PathBuf,

        #[arg(long, default_value_t = 0)]
        initial_supply: u64,

        /// Token metadata name
        #[arg(long)]
        name: String,

        /// Token metadata symbol
        #[arg(long)]
        symbol: String,

        /// Token metadata URI
        #[arg(long)]
        uri: String,
    },

    /// Print account details and owned tokens as JSON
    #[command(name = "account_info")]
    AccountInfo {
        /// File with the owner account key pair
        #[arg(long)]
        owner_key_file: PathBuf,
    },

    /// Transfer SOL to an account
    #[command(name = "transfer_sol")]
    TransferSol {
        /// File with the owner account key pair
        #[arg(long)]
        owner_key_file: PathBuf,

        #[arg(long)]
        amount_lamports: u64,

        /// Recipient address
        #[arg(long)]
        to_address: String,
    },

    /// Transfer SPL tokens to an account
    #[command(name = "transfer_spl")]
    TransferSpl {
        /// File with the owner account key pair
        #[arg(long)]
        owner_key_file: PathBuf,

        #[arg(long)]
        amount_tokens: u64,

        /// Recipient address
        #[arg(long)]
        to_address: String,

        /// Token mint address
        #[arg(long)]
        token_mint: String,
    },
}

/// Prints `prompt` and reads one line. Only the exact answer "yes" confirms.
pub fn confirm_transfer<R: BufRead, W: Write>(
    prompt: &str,
    input: &mut R,
    output: &mut W,
) -> io::Result<bool> {
    writeln!(output, "{prompt}")?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(answer.trim_end_matches(['\r', '\n']) == "yes")
}

fn lamports_to_sol(lamports: u64) -> f64 {
    lamports as f64 / LAMPORTS_PER_SOL as f64
}

/// Builds the production manager from the environment and runs `cli`.
pub async fn run(cli: Cli, cancel: CancellationToken) -> Result<()> {
    let config = SolanaConfig::from_env();
    info!(
        endpoint = %config.rpc_url(),
        sandbox = config.use_sandbox,
        "connecting to solana"
    );

    let provider = SolanaProvider::new(&config).wrap_err("Failed to create Solana provider")?;
    let manager: DefaultTokenManager =
        TokenManager::new(Arc::new(provider), Arc::new(FileKeyStore::new()), config);

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();
    execute(&manager, cli.command, &mut input, &mut output, &cancel).await
}

/// Runs one command against `manager`, reading confirmations from `input`
/// and writing results to `output`.
pub async fn execute<P, K, R, W>(
    manager: &TokenManager<P, K>,
    command: Command,
    input: &mut R,
    output: &mut W,
    cancel: &CancellationToken,
) -> Result<()>
where
    P: SolanaProviderTrait + 'static,
    K: KeyStoreTrait + 'static,
    R: BufRead,
    W: Write,
{
    match command {
        Command::CreateAccount { output_key_file } => {
            let keypair = manager
                .create_account(&CreateAccountRequest { output_key_file }, cancel)
                .await?;
            writeln!(output, "Account created: {}", keypair.pubkey())?;
        }
        Command::CreateToken {
            owner_key_file,
            output_key_file,
            initial_supply,
            name,
            symbol,
            uri,
        } => {
            let created = manager
                .create_token(
                    &CreateTokenRequest {
                        owner_key_file,
                        mint_key_file: output_key_file,
                        initial_supply,
                        name,
                        symbol,
                        uri,
                    },
                    cancel,
                )
                .await?;
            writeln!(output, "Token created: {}", created.mint)?;
            writeln!(output, "Signature: {}", created.receipt.signature)?;
        }
        Command::AccountInfo { owner_key_file } => {
            let snapshot = manager
                .account_info(&AccountInfoRequest { owner_key_file }, cancel)
                .await?;
            let json = serde_json::to_string_pretty(&snapshot)
                .wrap_err("Failed to serialize account info")?;
            writeln!(output, "{json}")?;
        }
        Command::TransferSol {
            owner_key_file,
            amount_lamports,
            to_address,
        } => {
            let prompt = format!(
                "Transfer {} SOL to {to_address} ARE YOU SURE? (type \"yes\")",
                lamports_to_sol(amount_lamports)
            );
            if !confirm_transfer(&prompt, input, output)? {
                writeln!(output, "Exiting...")?;
                return Ok(());
            }

            let receipt = manager
                .transfer_sol(
                    &TransferNativeRequest {
                        owner_key_file,
                        target_address: to_address,
                        amount_lamports,
                    },
                    cancel,
                )
                .await?;
            writeln!(output, "Transfer confirmed: {}", receipt.signature)?;
        }
        Command::TransferSpl {
            owner_key_file,
            amount_tokens,
            to_address,
            token_mint,
        } => {
            let prompt =
                format!("Transfer {amount_tokens} SPL to {to_address} ARE YOU SURE? (type \"yes\")");
            if !confirm_transfer(&prompt, input, output)? {
                writeln!(output, "Exiting...")?;
                return Ok(());
            }

            let receipt = manager
                .transfer_spl_token(
                    &TransferTokenRequest {
                        owner_key_file,
                        target_address: to_address,
                        amount: amount_tokens,
                        token_mint,
                    },
                    cancel,
                )
                .await?;
            writeln!(output, "Transfer confirmed: {}", receipt.signature)?;
        }
    }

    Ok(())
}
