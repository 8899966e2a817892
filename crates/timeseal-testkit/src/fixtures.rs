//! Canned proofs and calendar bodies for integration tests.

use timeseal_core::{
    write_tree, Attestation, FileHash, HashAlgorithm, Op, Timestamp, Tree,
};

/// The 20-byte digest `01 02 .. 14` used throughout the fixtures.
pub fn sha1_digest() -> Vec<u8> {
    (1..=20).collect()
}

/// A sha1 file hash over the fixture digest.
pub fn sha1_file_hash() -> FileHash {
    FileHash::new(HashAlgorithm::Sha1, sha1_digest()).expect("fixture digest length")
}

/// A tree holding exactly one attestation.
pub fn leaf_tree(attestation: Attestation) -> Tree {
    let mut tree = Tree::new();
    tree.attest(attestation);
    tree
}

/// A proof with a single Bitcoin attestation at the root.
pub fn single_bitcoin(height: u64) -> Timestamp {
    Timestamp::new(sha1_file_hash(), leaf_tree(Attestation::Bitcoin { height }))
}

/// A proof with two Bitcoin attestations (heights 123 and 456) at the root.
pub fn two_bitcoin() -> Timestamp {
    let mut tree = leaf_tree(Attestation::Bitcoin { height: 123 });
    tree.attest(Attestation::Bitcoin { height: 456 });
    Timestamp::new(sha1_file_hash(), tree)
}

/// A proof with two pending attestations and nothing anchored.
pub fn two_pending() -> Timestamp {
    let mut tree = leaf_tree(Attestation::Pending {
        url: "https://www.example.com/1".into(),
    });
    tree.attest(Attestation::Pending {
        url: "https://www.example.com/2".into(),
    });
    Timestamp::new(sha1_file_hash(), tree)
}

/// A bare-tree calendar body: a single pending attestation for `url`.
pub fn pending_body(url: &str) -> Vec<u8> {
    write_tree(&leaf_tree(Attestation::Pending { url: url.into() }))
        .expect("fixture tree is encodable")
}

/// A bare-tree calendar body: an op edge down to a Bitcoin attestation.
pub fn anchored_body(salt: u8, height: u64) -> Vec<u8> {
    let mut tree = Tree::new();
    tree.incorporate(
        Op::Append(vec![salt]),
        leaf_tree(Attestation::Bitcoin { height }),
    );
    write_tree(&tree).expect("fixture tree is encodable")
}

#[cfg(test)]
mod tests {
    use super::*;
    use timeseal_core::{read_tree, Chain};

    #[test]
    fn test_fixture_predicates() {
        assert!(single_bitcoin(123).can_verify());
        assert!(!single_bitcoin(123).can_upgrade());
        assert!(!single_bitcoin(123).can_shrink(Chain::Bitcoin));

        assert!(!two_pending().can_verify());
        assert!(two_pending().can_upgrade());

        assert!(two_bitcoin().can_shrink(Chain::Bitcoin));
    }

    #[test]
    fn test_bodies_parse() {
        assert_eq!(
            read_tree(&pending_body("https://cal.example"))
                .unwrap()
                .leaf_count(),
            1
        );
        assert_eq!(read_tree(&anchored_body(7, 99)).unwrap().leaf_count(), 1);
    }
}
