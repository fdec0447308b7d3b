//! Bounded confirmation polling for submitted transactions.
use std::time::Duration;

use solana_sdk::signature::Signature;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::{
    models::{ConfirmationStatus, TokenManagerError, TransactionState},
    services::provider::SolanaProviderTrait,
    utils::{poll_until, PollOutcome},
};

use super::lifecycle::TransactionLifecycle;

/// How often to ask the node about a transaction and for how long.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmationPolicy {
    pub poll_interval: Duration,
    pub max_wait: Duration,
}

impl ConfirmationPolicy {
    pub fn new(poll_interval: Duration, max_wait: Duration) -> Self {
        Self {
            poll_interval,
            max_wait,
        }
    }
}

enum Settled {
    Confirmed,
    Failed(String),
}

/// Polls the node until `signature` is confirmed or fails.
///
/// `lifecycle` must be in `Submitted`. A failed status query counts as another
/// pending tick. On-chain failure surfaces as `TransactionRejected`, an
/// exhausted wait as `ConfirmationTimeout`.
pub async fn wait_for_confirmation<P>(
    provider: &P,
    signature: &Signature,
    lifecycle: &mut TransactionLifecycle,
    policy: ConfirmationPolicy,
    cancel: &CancellationToken,
) -> Result<(), TokenManagerError>
where
    P: SolanaProviderTrait + ?Sized,
{
    lifecycle.advance(TransactionState::Pending)?;
    debug!(
        signature = %signature,
        poll_interval_ms = policy.poll_interval.as_millis() as u64,
        max_wait_ms = policy.max_wait.as_millis() as u64,
        "waiting for confirmation"
    );

    let outcome = poll_until(
        move || async move {
            provider
                .get_transaction_status(signature)
                .await
                .map(|status| match status {
                    ConfirmationStatus::Pending => None,
                    ConfirmationStatus::Confirmed => Some(Settled::Confirmed),
                    ConfirmationStatus::Failed(reason) => Some(Settled::Failed(reason)),
                })
        },
        policy.max_wait,
        policy.poll_interval,
        cancel,
        "transaction confirmation",
    )
    .await;

    match outcome {
        PollOutcome::Ready(Settled::Confirmed) => {
            lifecycle.advance(TransactionState::Confirmed)?;
            info!(signature = %signature, "transaction confirmed");
            Ok(())
        }
        PollOutcome::Ready(Settled::Failed(reason)) => {
            lifecycle.advance(TransactionState::Failed(reason.clone()))?;
            Err(TokenManagerError::TransactionRejected {
                signature: signature.to_string(),
                reason,
            })
        }
        PollOutcome::TimedOut { waited } => Err(TokenManagerError::ConfirmationTimeout {
            signature: signature.to_string(),
            waited,
        }),
        PollOutcome::Cancelled => Err(TokenManagerError::Cancelled),
    }
}
