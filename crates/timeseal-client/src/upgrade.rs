//! Upgrading pending attestations into anchored sub-trees.
//!
//! For every pending attestation the calendar is asked for the sub-tree it
//! promised; a received sub-tree replaces the pending attestation at the
//! same position. Fetches run concurrently and failures leave the pending
//! attestation in place, so the proof only ever gains information.

use std::collections::HashSet;

use futures::future::join_all;
use tracing::{debug, warn};

use timeseal_core::{apply_ops, read_tree, Attestation, Op, Timestamp};

use crate::calendar::Calendar;
use crate::error::{CalendarFailure, ClientError};

/// Result of an upgrade batch.
#[derive(Debug)]
pub struct UpgradeOutcome {
    /// The proof with every successfully fetched sub-tree grafted in.
    pub timestamp: Timestamp,
    /// Number of pending attestations replaced.
    pub upgraded: usize,
    /// Per-calendar failures; the corresponding attestations stay pending.
    pub errors: Vec<CalendarFailure>,
}

/// Ask the calendars behind every pending attestation for their sub-trees.
///
/// Idempotent on proofs with nothing pending.
pub async fn upgrade<C>(calendar: &C, timestamp: &Timestamp) -> UpgradeOutcome
where
    C: Calendar + ?Sized,
{
    // 1. Collect pending attestations with their commitment messages.
    let mut targets: Vec<(Vec<Op>, String, Vec<u8>)> = Vec::new();
    let mut errors = Vec::new();
    let mut seen: HashSet<(Vec<Op>, String)> = HashSet::new();
    for (ops, attestation) in timestamp.tree.paths() {
        let Attestation::Pending { url } = attestation else {
            continue;
        };
        if !seen.insert((ops.clone(), url.clone())) {
            continue;
        }
        match apply_ops(&timestamp.file_hash.value, &ops) {
            Ok(commitment) => targets.push((ops, url.clone(), commitment)),
            Err(overflow) => errors.push(CalendarFailure {
                url: url.clone(),
                error: ClientError::Overflow(overflow),
            }),
        }
    }
    debug!(pending = targets.len(), "fetching upgrades");

    // 2. Fetch all sub-trees concurrently.
    let fetches = targets
        .iter()
        .map(|(_, url, commitment)| calendar.fetch_timestamp(url, commitment));
    let bodies = join_all(fetches).await;

    // 3. Graft each received sub-tree where its pending attestation sat.
    let mut tree = timestamp.tree.clone();
    let mut upgraded = 0usize;
    for ((ops, url, _), body) in targets.iter().zip(bodies) {
        let parsed = body.and_then(|bytes| {
            read_tree(&bytes).map_err(|source| ClientError::BadResponse {
                url: url.clone(),
                source,
            })
        });
        match parsed {
            Ok(subtree) => {
                if let Some(node) = tree.node_at_path_mut(ops) {
                    node.remove_attestation(&Attestation::Pending { url: url.clone() });
                    node.merge(subtree);
                    upgraded += 1;
                }
            }
            Err(error) => {
                warn!(%url, %error, "upgrade fetch failed");
                errors.push(CalendarFailure {
                    url: url.clone(),
                    error,
                });
            }
        }
    }

    UpgradeOutcome {
        timestamp: Timestamp {
            version: timestamp.version,
            file_hash: timestamp.file_hash.clone(),
            tree,
        },
        upgraded,
        errors,
    }
}
