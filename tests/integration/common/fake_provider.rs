//! In-memory chain standing in for a Solana RPC node.
//!
//! Balances, accounts and fees are seeded by the test. Every submitted
//! transaction is recorded so tests can inspect exactly what was sent.

use std::{collections::HashMap, sync::Mutex};

use async_trait::async_trait;
use solana_sdk::{
    account::Account, hash::Hash, message::Message, pubkey::Pubkey, signature::Signature,
    transaction::Transaction,
};
use solana_token_manager::{
    models::{ConfirmationStatus, TokenAccountEntry},
    services::provider::{SolanaProviderError, SolanaProviderTrait},
};

pub const MINT_RENT_LAMPORTS: u64 = 1_461_600;

struct FakeChainState {
    balances: HashMap<Pubkey, u64>,
    accounts: HashMap<Pubkey, Account>,
    token_accounts: HashMap<Pubkey, Vec<TokenAccountEntry>>,
    fee: u64,
    status: ConfirmationStatus,
    unknown_blockhash_sends: u32,
    sent: Vec<Transaction>,
    airdrops: Vec<(Pubkey, u64)>,
}

pub struct FakeSolanaProvider {
    state: Mutex<FakeChainState>,
}

impl Default for FakeSolanaProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeSolanaProvider {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(FakeChainState {
                balances: HashMap::new(),
                accounts: HashMap::new(),
                token_accounts: HashMap::new(),
                fee: 5_000,
                status: ConfirmationStatus::Confirmed,
                unknown_blockhash_sends: 0,
                sent: Vec::new(),
                airdrops: Vec::new(),
            }),
        }
    }

    pub fn with_balance(self, address: Pubkey, lamports: u64) -> Self {
        self.state.lock().unwrap().balances.insert(address, lamports);
        self
    }

    pub fn with_account(self, address: Pubkey, account: Account) -> Self {
        self.state.lock().unwrap().accounts.insert(address, account);
        self
    }

    pub fn with_token_accounts(self, owner: Pubkey, entries: Vec<TokenAccountEntry>) -> Self {
        self.state
            .lock()
            .unwrap()
            .token_accounts
            .insert(owner, entries);
        self
    }

    pub fn with_fee(self, fee: u64) -> Self {
        self.state.lock().unwrap().fee = fee;
        self
    }

    pub fn with_status(self, status: ConfirmationStatus) -> Self {
        self.state.lock().unwrap().status = status;
        self
    }

    /// The next `count` submissions fail as if the blockhash had expired.
    pub fn rejecting_blockhash(self, count: u32) -> Self {
        self.state.lock().unwrap().unknown_blockhash_sends = count;
        self
    }

    pub fn balance_of(&self, address: &Pubkey) -> u64 {
        self.state
            .lock()
            .unwrap()
            .balances
            .get(address)
            .copied()
            .unwrap_or(0)
    }

    pub fn sent_transactions(&self) -> Vec<Transaction> {
        self.state.lock().unwrap().sent.clone()
    }

    pub fn airdrops(&self) -> Vec<(Pubkey, u64)> {
        self.state.lock().unwrap().airdrops.clone()
    }
}

#[async_trait]
impl SolanaProviderTrait for FakeSolanaProvider {
    async fn get_balance(&self, address: &Pubkey) -> Result<u64, SolanaProviderError> {
        Ok(self.balance_of(address))
    }

    async fn get_latest_blockhash(&self) -> Result<Hash, SolanaProviderError> {
        Ok(Hash::new_unique())
    }

    async fn get_fee_for_message(&self, _message: &Message) -> Result<u64, SolanaProviderError> {
        Ok(self.state.lock().unwrap().fee)
    }

    async fn get_account(&self, address: &Pubkey) -> Result<Option<Account>, SolanaProviderError> {
        Ok(self.state.lock().unwrap().accounts.get(address).cloned())
    }

    async fn get_token_accounts_by_owner(
        &self,
        owner: &Pubkey,
    ) -> Result<Vec<TokenAccountEntry>, SolanaProviderError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .token_accounts
            .get(owner)
            .cloned()
            .unwrap_or_default())
    }

    async fn send_transaction(
        &self,
        transaction: &Transaction,
    ) -> Result<Signature, SolanaProviderError> {
        let mut state = self.state.lock().unwrap();
        if state.unknown_blockhash_sends > 0 {
            state.unknown_blockhash_sends -= 1;
            return Err(SolanaProviderError::BlockhashNotFound(
                "Blockhash not found".to_string(),
            ));
        }

        transaction
            .verify()
            .map_err(|e| SolanaProviderError::InvalidTransaction(e.to_string()))?;
        state.sent.push(transaction.clone());
        Ok(transaction.signatures[0])
    }

    async fn get_transaction_status(
        &self,
        _signature: &Signature,
    ) -> Result<ConfirmationStatus, SolanaProviderError> {
        Ok(self.state.lock().unwrap().status.clone())
    }

    async fn request_airdrop(
        &self,
        address: &Pubkey,
        lamports: u64,
    ) -> Result<Signature, SolanaProviderError> {
        let mut state = self.state.lock().unwrap();
        *state.balances.entry(*address).or_insert(0) += lamports;
        state.airdrops.push((*address, lamports));
        Ok(Signature::from([7u8; 64]))
    }

    async fn get_minimum_balance_for_rent_exemption(
        &self,
        _data_size: usize,
    ) -> Result<u64, SolanaProviderError> {
        Ok(MINT_RENT_LAMPORTS)
    }
}
