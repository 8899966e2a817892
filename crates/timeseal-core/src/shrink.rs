//! Pruning a proof to the single oldest attestation on one chain.

use crate::attestation::{Attestation, Chain};
use crate::op::Op;
use crate::timestamp::Timestamp;
use crate::tree::Tree;

/// Keep only the path ending at the lowest-height attestation on `chain`;
/// every other path and attestation is discarded. Height ties break on the
/// op-lexicographic order of the path. If the proof has no attestation on
/// `chain` it is returned unchanged. Idempotent.
pub fn shrink(timestamp: &Timestamp, chain: Chain) -> Timestamp {
    let mut best: Option<(u64, Vec<Op>)> = None;
    for (ops, attestation) in timestamp.tree.paths() {
        if attestation.chain() != Some(chain) {
            continue;
        }
        let Some(height) = attestation.height() else {
            continue;
        };
        let candidate = (height, ops);
        let better = match &best {
            None => true,
            Some(current) => candidate < *current,
        };
        if better {
            best = Some(candidate);
        }
    }

    let Some((height, ops)) = best else {
        return timestamp.clone();
    };

    let mut tree = Tree::new();
    tree.attest(Attestation::block(chain, height));
    for op in ops.into_iter().rev() {
        let mut parent = Tree::new();
        parent.incorporate(op, tree);
        tree = parent;
    }

    Timestamp {
        version: timestamp.version,
        file_hash: timestamp.file_hash.clone(),
        tree,
    }
}
