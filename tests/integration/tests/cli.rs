//! Command dispatch with typed confirmation

use std::io::Cursor;

use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signer},
};
use solana_token_manager::cli::{execute, Command};
use tokio_util::sync::CancellationToken;

use super::{setup, write_key};
use crate::integration::common::fake_provider::FakeSolanaProvider;

#[tokio::test]
async fn confirmed_transfer_is_submitted() {
    let owner = Keypair::new();
    let target = Pubkey::new_unique();
    let provider = FakeSolanaProvider::new().with_balance(owner.pubkey(), 3_000_000_000);
    let (manager, provider, dir) = setup(provider, false);
    let owner_key_file = write_key(&dir, "owner.json", &owner);
    let mut output = Vec::new();

    execute(
        &manager,
        Command::TransferSol {
            owner_key_file,
            amount_lamports: 1_500_000_000,
            to_address: target.to_string(),
        },
        &mut Cursor::new("yes\n"),
        &mut output,
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    let printed = String::from_utf8(output).unwrap();
    assert!(printed.starts_with(&format!(
        "Transfer 1.5 SOL to {target} ARE YOU SURE? (type \"yes\")\n"
    )));
    let sent = provider.sent_transactions();
    assert_eq!(sent.len(), 1);
    assert!(printed.contains(&sent[0].signatures[0].to_string()));
}

#[tokio::test]
async fn declined_spl_transfer_exits_without_submitting() {
    let owner = Keypair::new();
    let (manager, provider, dir) = setup(FakeSolanaProvider::new(), false);
    let owner_key_file = write_key(&dir, "owner.json", &owner);
    let mut output = Vec::new();

    execute(
        &manager,
        Command::TransferSpl {
            owner_key_file,
            amount_tokens: 10,
            to_address: Pubkey::new_unique().to_string(),
            token_mint: Pubkey::new_unique().to_string(),
        },
        &mut Cursor::new("nope\n"),
        &mut output,
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    assert!(String::from_utf8(output).unwrap().ends_with("Exiting...\n"));
    assert!(provider.sent_transactions().is_empty());
}

#[tokio::test]
async fn account_info_prints_json() {
    let owner = Keypair::new();
    let provider = FakeSolanaProvider::new().with_balance(owner.pubkey(), 7);
    let (manager, _provider, dir) = setup(provider, false);
    let owner_key_file = write_key(&dir, "owner.json", &owner);
    let mut output = Vec::new();

    execute(
        &manager,
        Command::AccountInfo { owner_key_file },
        &mut Cursor::new(""),
        &mut output,
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["public_key"], owner.pubkey().to_string());
    assert_eq!(json["balance"], 7);
    assert_eq!(json["exists"], false);
}
