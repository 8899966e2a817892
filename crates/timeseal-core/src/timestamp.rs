//! The top-level proof: a file digest plus a proof tree.

use serde::{Deserialize, Serialize};

use crate::attestation::{Attestation, Chain};
use crate::error::ValidationError;
use crate::hash::HashAlgorithm;
use crate::op::MAX_OP_PAYLOAD;
use crate::tree::Tree;

/// The current proof format version.
pub const VERSION: u64 = 1;

/// A hashed representation of the original file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileHash {
    pub algorithm: HashAlgorithm,
    pub value: Vec<u8>,
}

impl FileHash {
    /// Wrap an existing digest. Fails if the length does not match the
    /// algorithm.
    pub fn new(algorithm: HashAlgorithm, value: Vec<u8>) -> Result<Self, ValidationError> {
        let file_hash = Self { algorithm, value };
        file_hash.validate()?;
        Ok(file_hash)
    }

    /// Hash raw file bytes.
    pub fn from_data(algorithm: HashAlgorithm, data: &[u8]) -> Self {
        Self {
            algorithm,
            value: algorithm.digest(data),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let expected = self.algorithm.digest_len();
        if self.value.len() != expected {
            return Err(ValidationError::DigestLength {
                algorithm: self.algorithm,
                expected,
                actual: self.value.len(),
            });
        }
        Ok(())
    }
}

/// A timestamp proof. Transforms never mutate their input; they return new
/// values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamp {
    pub version: u64,
    pub file_hash: FileHash,
    pub tree: Tree,
}

impl Timestamp {
    /// Build a proof at the current version.
    pub fn new(file_hash: FileHash, tree: Tree) -> Self {
        Self {
            version: VERSION,
            file_hash,
            tree,
        }
    }

    /// Structural well-formedness check.
    pub fn validate(&self) -> Result<(), ValidationError> {
        // 1. Check version
        if self.version != VERSION {
            return Err(ValidationError::UnsupportedVersion(self.version));
        }

        // 2. Digest length must match the algorithm
        self.file_hash.validate()?;

        // 3. A complete proof carries at least one attestation
        if self.tree.is_empty() {
            return Err(ValidationError::EmptyTree);
        }

        // 4. Concat payloads must be encodable
        check_payloads(&self.tree)
    }

    /// At least one anchored (non-pending) attestation exists.
    pub fn can_verify(&self) -> bool {
        self.tree.any_attestation(&|a: &Attestation| !a.is_pending())
    }

    /// At least one pending attestation exists.
    pub fn can_upgrade(&self) -> bool {
        self.tree.any_attestation(&Attestation::is_pending)
    }

    /// At least one attestation on `chain` exists alongside at least one
    /// other attestation of any kind.
    pub fn can_shrink(&self, chain: Chain) -> bool {
        let mut total = 0usize;
        let mut on_chain = 0usize;
        for (_, attestation) in self.tree.paths() {
            total += 1;
            if attestation.chain() == Some(chain) {
                on_chain += 1;
            }
        }
        on_chain >= 1 && total >= 2
    }
}

fn check_payloads(tree: &Tree) -> Result<(), ValidationError> {
    for (op, subtree) in tree.edges() {
        if let Some(payload) = op.payload() {
            if payload.is_empty() || payload.len() > MAX_OP_PAYLOAD {
                return Err(ValidationError::PayloadLength(payload.len()));
            }
        }
        check_payloads(subtree)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::op::Op;

    fn sha1_hash() -> FileHash {
        FileHash::new(HashAlgorithm::Sha1, (1..=20).collect()).unwrap()
    }

    fn leaf_tree(attestation: Attestation) -> Tree {
        let mut t = Tree::new();
        t.attest(attestation);
        t
    }

    #[test]
    fn test_file_hash_length_check() {
        assert!(FileHash::new(HashAlgorithm::Sha1, vec![0; 20]).is_ok());
        assert!(matches!(
            FileHash::new(HashAlgorithm::Sha256, vec![0; 20]),
            Err(ValidationError::DigestLength {
                expected: 32,
                actual: 20,
                ..
            })
        ));
    }

    #[test]
    fn test_file_hash_from_data() {
        let fh = FileHash::from_data(HashAlgorithm::Sha256, b"hello");
        assert_eq!(fh.value, HashAlgorithm::Sha256.digest(b"hello"));
        assert!(fh.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_tree() {
        let ts = Timestamp::new(sha1_hash(), Tree::new());
        assert_eq!(ts.validate(), Err(ValidationError::EmptyTree));
    }

    #[test]
    fn test_validate_rejects_bad_version() {
        let mut ts = Timestamp::new(sha1_hash(), leaf_tree(Attestation::Bitcoin { height: 1 }));
        ts.version = 2;
        assert_eq!(ts.validate(), Err(ValidationError::UnsupportedVersion(2)));
    }

    #[test]
    fn test_validate_rejects_oversized_payload() {
        let mut tree = Tree::new();
        tree.incorporate(
            Op::Append(vec![0; 4097]),
            leaf_tree(Attestation::Bitcoin { height: 1 }),
        );
        let ts = Timestamp::new(sha1_hash(), tree);
        assert_eq!(ts.validate(), Err(ValidationError::PayloadLength(4097)));
    }

    #[test]
    fn test_predicates() {
        let pending = Attestation::Pending {
            url: "https://cal.example".into(),
        };

        let only_pending = Timestamp::new(sha1_hash(), leaf_tree(pending.clone()));
        assert!(!only_pending.can_verify());
        assert!(only_pending.can_upgrade());

        let only_bitcoin = Timestamp::new(sha1_hash(), leaf_tree(Attestation::Bitcoin { height: 123 }));
        assert!(only_bitcoin.can_verify());
        assert!(!only_bitcoin.can_upgrade());
        // A single leaf on the chain cannot shrink further.
        assert!(!only_bitcoin.can_shrink(Chain::Bitcoin));

        let mut both = leaf_tree(Attestation::Bitcoin { height: 123 });
        both.attest(pending);
        let both = Timestamp::new(sha1_hash(), both);
        assert!(both.can_shrink(Chain::Bitcoin));
        assert!(!both.can_shrink(Chain::Litecoin));
    }
}
