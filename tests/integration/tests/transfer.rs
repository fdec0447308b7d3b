//! Native and SPL token transfers

use solana_sdk::{
    account::Account,
    pubkey::Pubkey,
    signature::{Keypair, Signer},
};
use solana_token_manager::{
    domain::address::derive_associated_token_address,
    models::{
        ConfirmationStatus, TokenManagerError, TransactionState, TransferNativeRequest,
        TransferTokenRequest,
    },
};
use tokio_util::sync::CancellationToken;

use super::{setup, write_key};
use crate::integration::common::fake_provider::FakeSolanaProvider;

const ONE_SOL: u64 = 1_000_000_000;
const FEE: u64 = 5_000;

fn native_request(owner_key_file: std::path::PathBuf, target: &Pubkey) -> TransferNativeRequest {
    TransferNativeRequest {
        owner_key_file,
        target_address: target.to_string(),
        amount_lamports: ONE_SOL,
    }
}

#[tokio::test]
async fn transfer_sol_succeeds_when_balance_covers_amount_and_fee() {
    let owner = Keypair::new();
    let target = Pubkey::new_unique();
    let provider = FakeSolanaProvider::new()
        .with_balance(owner.pubkey(), ONE_SOL + FEE)
        .with_fee(FEE);
    let (manager, provider, dir) = setup(provider, false);
    let owner_key_file = write_key(&dir, "owner.json", &owner);

    let receipt = manager
        .transfer_sol(&native_request(owner_key_file, &target), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(receipt.state, TransactionState::Confirmed);
    let sent = provider.sent_transactions();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].message.instructions.len(), 1);
    assert_eq!(sent[0].message.account_keys[0], owner.pubkey());
    assert!(sent[0].message.account_keys.contains(&target));
}

#[tokio::test]
async fn transfer_sol_one_lamport_short_is_never_submitted() {
    let owner = Keypair::new();
    let provider = FakeSolanaProvider::new()
        .with_balance(owner.pubkey(), ONE_SOL + FEE - 1)
        .with_fee(FEE);
    let (manager, provider, dir) = setup(provider, false);
    let owner_key_file = write_key(&dir, "owner.json", &owner);

    let result = manager
        .transfer_sol(
            &native_request(owner_key_file, &Pubkey::new_unique()),
            &CancellationToken::new(),
        )
        .await;

    assert!(matches!(
        result,
        Err(TokenManagerError::InsufficientBalance {
            required,
            available,
        }) if required == ONE_SOL + FEE && available == ONE_SOL + FEE - 1
    ));
    assert!(provider.sent_transactions().is_empty());
}

#[tokio::test]
async fn transfer_sol_resigns_after_unknown_blockhash() {
    let owner = Keypair::new();
    let provider = FakeSolanaProvider::new()
        .with_balance(owner.pubkey(), 10 * ONE_SOL)
        .rejecting_blockhash(1);
    let (manager, provider, dir) = setup(provider, false);
    let owner_key_file = write_key(&dir, "owner.json", &owner);

    let receipt = manager
        .transfer_sol(
            &native_request(owner_key_file, &Pubkey::new_unique()),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    let sent = provider.sent_transactions();
    assert_eq!(sent.len(), 1);
    assert_eq!(receipt.signature, sent[0].signatures[0].to_string());
}

#[tokio::test]
async fn transfer_sol_on_chain_failure_is_rejection() {
    let owner = Keypair::new();
    let provider = FakeSolanaProvider::new()
        .with_balance(owner.pubkey(), 10 * ONE_SOL)
        .with_status(ConfirmationStatus::Failed(
            "InstructionError(0, Custom(1))".to_string(),
        ));
    let (manager, _provider, dir) = setup(provider, false);
    let owner_key_file = write_key(&dir, "owner.json", &owner);

    let result = manager
        .transfer_sol(
            &native_request(owner_key_file, &Pubkey::new_unique()),
            &CancellationToken::new(),
        )
        .await;

    match result {
        Err(TokenManagerError::TransactionRejected { reason, .. }) => {
            assert!(reason.contains("Custom(1)"))
        }
        other => panic!("expected rejection, got {other:?}"),
    }
}

fn token_request(
    owner_key_file: std::path::PathBuf,
    recipient: &Pubkey,
    mint: &Pubkey,
) -> TransferTokenRequest {
    TransferTokenRequest {
        owner_key_file,
        target_address: recipient.to_string(),
        amount: 25,
        token_mint: mint.to_string(),
    }
}

#[tokio::test]
async fn transfer_spl_creates_recipient_account_when_missing() {
    let owner = Keypair::new();
    let recipient = Pubkey::new_unique();
    let mint = Pubkey::new_unique();
    let (manager, provider, dir) = setup(FakeSolanaProvider::new(), false);
    let owner_key_file = write_key(&dir, "owner.json", &owner);

    let receipt = manager
        .transfer_spl_token(
            &token_request(owner_key_file, &recipient, &mint),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(receipt.instruction_count, 2);
    let sent = provider.sent_transactions();
    let message = &sent[0].message;
    let programs: Vec<Pubkey> = message
        .instructions
        .iter()
        .map(|ix| *ix.program_id(&message.account_keys))
        .collect();
    assert_eq!(
        programs,
        vec![spl_associated_token_account::id(), spl_token::id()]
    );
}

#[tokio::test]
async fn transfer_spl_to_existing_recipient_account() {
    let owner = Keypair::new();
    let recipient = Pubkey::new_unique();
    let mint = Pubkey::new_unique();
    let destination = derive_associated_token_address(&recipient, &mint).unwrap();
    let provider = FakeSolanaProvider::new().with_account(
        destination,
        Account {
            lamports: 2_039_280,
            data: vec![0; 165],
            owner: spl_token::id(),
            executable: false,
            rent_epoch: 0,
        },
    );
    let (manager, provider, dir) = setup(provider, false);
    let owner_key_file = write_key(&dir, "owner.json", &owner);

    let receipt = manager
        .transfer_spl_token(
            &token_request(owner_key_file, &recipient, &mint),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(receipt.instruction_count, 1);
    assert_eq!(provider.sent_transactions()[0].message.instructions.len(), 1);
}

#[tokio::test]
async fn transfer_spl_treats_foreign_owned_destination_as_missing() {
    let owner = Keypair::new();
    let recipient = Pubkey::new_unique();
    let mint = Pubkey::new_unique();
    let destination = derive_associated_token_address(&recipient, &mint).unwrap();
    let provider = FakeSolanaProvider::new().with_account(
        destination,
        Account {
            lamports: 1,
            data: vec![],
            owner: solana_system_interface::program::id(),
            executable: false,
            rent_epoch: 0,
        },
    );
    let (manager, _provider, dir) = setup(provider, false);
    let owner_key_file = write_key(&dir, "owner.json", &owner);

    let receipt = manager
        .transfer_spl_token(
            &token_request(owner_key_file, &recipient, &mint),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(receipt.instruction_count, 2);
}
