//! Proptest generators for property-based testing.
//!
//! Every generated value is well-formed for the encoder: concat payloads
//! stay within the writable bounds and every sub-tree carries at least one
//! record.

use proptest::prelude::*;

use timeseal_core::{Attestation, FileHash, HashAlgorithm, Op, Timestamp, Tree};

/// Generate a hash algorithm.
pub fn hash_algorithm() -> impl Strategy<Value = HashAlgorithm> {
    prop_oneof![
        Just(HashAlgorithm::Sha1),
        Just(HashAlgorithm::Ripemd160),
        Just(HashAlgorithm::Sha256),
        Just(HashAlgorithm::Keccak256),
    ]
}

/// Generate a concat payload within the encoder's bounds.
pub fn payload() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 1..=32)
}

/// Generate an op.
pub fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        payload().prop_map(Op::Append),
        payload().prop_map(Op::Prepend),
        Just(Op::Reverse),
        Just(Op::Hexlify),
        hash_algorithm().prop_map(Op::Hash),
    ]
}

/// Generate a calendar URL.
pub fn calendar_url() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9]{0,11}".prop_map(|host| format!("https://{host}.calendar.example"))
}

/// Generate an attestation of any kind.
pub fn attestation() -> impl Strategy<Value = Attestation> {
    let known_tags = [
        Attestation::PENDING_TAG,
        Attestation::BITCOIN_TAG,
        Attestation::LITECOIN_TAG,
        Attestation::ETHEREUM_TAG,
    ];
    prop_oneof![
        calendar_url().prop_map(|url| Attestation::Pending { url }),
        (0u64..=10_000_000).prop_map(|height| Attestation::Bitcoin { height }),
        (0u64..=10_000_000).prop_map(|height| Attestation::Litecoin { height }),
        (0u64..=10_000_000).prop_map(|height| Attestation::Ethereum { height }),
        (
            any::<[u8; 8]>().prop_filter("reserved tag", move |tag| !known_tags.contains(tag)),
            prop::collection::vec(any::<u8>(), 0..=16),
        )
            .prop_map(|(tag, payload)| Attestation::Unknown { tag, payload }),
    ]
}

/// Generate a non-empty proof tree up to four levels deep.
pub fn tree() -> impl Strategy<Value = Tree> {
    let leaf = prop::collection::btree_set(attestation(), 1..=3).prop_map(|attestations| {
        let mut t = Tree::new();
        for a in attestations {
            t.attest(a);
        }
        t
    });

    leaf.prop_recursive(4, 24, 3, |inner| {
        (
            prop::collection::vec((op(), inner), 1..=3),
            prop::collection::btree_set(attestation(), 0..=2),
        )
            .prop_map(|(edges, attestations)| {
                let mut t = Tree::new();
                for (op, subtree) in edges {
                    t.incorporate(op, subtree);
                }
                for a in attestations {
                    t.attest(a);
                }
                t
            })
    })
}

/// Generate a digest of the right length for its algorithm.
pub fn file_hash() -> impl Strategy<Value = FileHash> {
    hash_algorithm().prop_flat_map(|algorithm| {
        prop::collection::vec(any::<u8>(), algorithm.digest_len())
            .prop_map(move |value| FileHash { algorithm, value })
    })
}

/// Generate a well-formed proof.
pub fn timestamp() -> impl Strategy<Value = Timestamp> {
    (file_hash(), tree()).prop_map(|(file_hash, tree)| Timestamp::new(file_hash, tree))
}
