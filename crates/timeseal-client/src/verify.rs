//! Verifying anchored attestations against blockchain block headers.
//!
//! Every (attestation, verifier) pair runs concurrently; results are
//! aggregated after all calls join. A verifier that declines (wrong chain)
//! contributes nothing; a verifier that fails contributes an error entry
//! keyed by its name.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use tokio::time::timeout;
use tracing::debug;

use timeseal_core::{apply_ops, Attestation, OverflowError, Timestamp};

use crate::error::VerifierError;

/// Default per-verifier-call deadline.
pub const DEFAULT_VERIFIER_TIMEOUT: Duration = Duration::from_secs(10);

/// A named blockchain block-header lookup.
///
/// Implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait Verifier: Send + Sync {
    /// Returns the UNIX time (seconds) of the block whose Merkle root
    /// equals `message` at the attestation's height, `None` when this
    /// verifier does not cover the attestation's chain.
    async fn block_time(
        &self,
        message: &[u8],
        attestation: &Attestation,
    ) -> Result<Option<u64>, VerifierError>;
}

/// Verifiers keyed by name. The ordered map keeps aggregation output
/// deterministic.
pub type VerifierSet = BTreeMap<String, Arc<dyn Verifier>>;

/// Aggregated verification result.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct VerifyOutcome {
    /// Block times grouped over the verifiers that reported them. Two
    /// verifiers disagreeing on a time produce one entry each.
    pub attestations: BTreeMap<u64, Vec<String>>,
    /// Failure messages keyed by verifier name.
    pub errors: BTreeMap<String, Vec<String>>,
}

/// Run every verifier against every anchored attestation.
///
/// The tree walk itself is pure and fails fast on message overflow; network
/// failures never do more than add error entries.
pub async fn verify(
    timestamp: &Timestamp,
    verifiers: &VerifierSet,
) -> Result<VerifyOutcome, OverflowError> {
    verify_with_timeout(timestamp, verifiers, DEFAULT_VERIFIER_TIMEOUT).await
}

/// [`verify`] with an explicit per-call deadline.
pub async fn verify_with_timeout(
    timestamp: &Timestamp,
    verifiers: &VerifierSet,
    per_call: Duration,
) -> Result<VerifyOutcome, OverflowError> {
    // 1. Enumerate anchored attestations with their final messages.
    let mut targets: Vec<(Vec<u8>, Attestation)> = Vec::new();
    for (ops, attestation) in timestamp.tree.paths() {
        if attestation.is_pending() {
            continue;
        }
        let message = apply_ops(&timestamp.file_hash.value, &ops)?;
        targets.push((message, attestation.clone()));
    }
    debug!(
        attestations = targets.len(),
        verifiers = verifiers.len(),
        "verifying"
    );

    // 2. Fan out every (attestation, verifier) pair.
    let calls: Vec<_> = targets
        .iter()
        .flat_map(|(message, attestation)| {
            verifiers.iter().map(move |(name, verifier)| {
                let name = name.clone();
                let verifier = Arc::clone(verifier);
                async move {
                    let result = match timeout(per_call, verifier.block_time(message, attestation))
                        .await
                    {
                        Ok(result) => result,
                        Err(_) => Err(VerifierError::Timeout),
                    };
                    (name, result)
                }
            })
        })
        .collect();
    let results = join_all(calls).await;

    // 3. Aggregate after all join.
    let mut outcome = VerifyOutcome::default();
    for (name, result) in results {
        match result {
            Ok(Some(time)) => outcome.attestations.entry(time).or_default().push(name),
            Ok(None) => {}
            Err(error) => outcome
                .errors
                .entry(name)
                .or_default()
                .push(error.to_string()),
        }
    }
    for names in outcome.attestations.values_mut() {
        names.sort();
        names.dedup();
    }

    Ok(outcome)
}
