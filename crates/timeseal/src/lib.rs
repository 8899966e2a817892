//! # Timeseal
//!
//! A client-side engine for blockchain timestamp proofs: create them
//! against remote calendar servers, serialize them, prune them, and verify
//! them against blockchain block headers.
//!
//! The pure engine lives in [`timeseal-core`](timeseal_core); the remote
//! transforms (submit, upgrade, verify) live in
//! [`timeseal-client`](timeseal_client). This crate re-exports both.
//!
//! ## Core Invariants
//!
//! 1. **Roundtrip**: decoding an encoded proof yields a structurally equal
//!    proof
//! 2. **Totality**: the decoder never panics; malformed input is a
//!    [`CodecError`] with a byte offset
//! 3. **Union is commutative**: merging calendar sub-trees is
//!    order-independent
//! 4. **Transforms only add or prune**: upgrades never drop anchored
//!    attestations, shrink keeps exactly the oldest one on a chain
//!
//! ## Example
//!
//! ```
//! use timeseal::{Attestation, FileHash, HashAlgorithm, Timestamp, Tree};
//!
//! let file_hash = FileHash::from_data(HashAlgorithm::Sha256, b"hello world");
//! let mut tree = Tree::new();
//! tree.attest(Attestation::Bitcoin { height: 830_000 });
//! let timestamp = Timestamp::new(file_hash, tree);
//!
//! let bytes = timeseal::write_timestamp(&timestamp).unwrap();
//! let decoded = timeseal::read_timestamp(&bytes).unwrap();
//! assert_eq!(timestamp, decoded);
//! assert!(decoded.can_verify());
//! ```

pub use timeseal_core::{
    apply_ops, info, info_verbose, read_timestamp, read_tree, shrink, write_timestamp, write_tree,
    Attestation, Chain, CodecError, FileHash, HashAlgorithm, Op, OverflowError, Timestamp, Tree,
    ValidationError, HEADER_MAGIC, MAX_MSG_LENGTH, MAX_OP_PAYLOAD, VERSION,
};

pub use timeseal_client::{
    default_verifiers, stamp, stamp_with, upgrade, verify, verify_with_timeout, Calendar,
    CalendarConfig, CalendarFailure, ClientError, HttpCalendar, StampOutcome, UpgradeOutcome,
    Verifier, VerifierError, VerifierSet, VerifyOutcome, DEFAULT_CALENDARS, FUDGE_LEN,
};

/// Calendar transport module, including the in-memory test implementation.
pub use timeseal_client::calendar;
