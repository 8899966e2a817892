//! # Timeseal Core
//!
//! Pure engine for blockchain timestamp proofs: the data model, the binary
//! codec, and the structural transforms. A proof attests that a byte string
//! existed at or before a point in time, using a blockchain as a notary.
//!
//! This crate contains no I/O and no networking. It is pure computation over
//! proof trees.
//!
//! ## Key Types
//!
//! - [`Timestamp`] - The top-level proof: a file digest plus a proof tree
//! - [`Tree`] - A node with op-labelled edges and terminal attestations
//! - [`Op`] - A byte-string transform applied along a tree edge
//! - [`Attestation`] - A terminal claim anchored on a chain, or pending at
//!   a calendar
//!
//! ## Codec
//!
//! [`write_timestamp`]/[`read_timestamp`] handle detached proof files;
//! [`write_tree`]/[`read_tree`] handle the bare-tree bodies exchanged with
//! calendar servers. See the [`codec`] module.

pub mod attestation;
pub mod codec;
pub mod error;
pub mod hash;
pub mod info;
pub mod op;
pub mod shrink;
pub mod timestamp;
pub mod tree;
pub mod wire;

pub use attestation::{Attestation, Chain};
pub use codec::{read_timestamp, read_tree, write_timestamp, write_tree, HEADER_MAGIC};
pub use error::{CodecError, OverflowError, ValidationError};
pub use hash::HashAlgorithm;
pub use info::{info, info_verbose};
pub use op::{apply_ops, Op, MAX_MSG_LENGTH, MAX_OP_PAYLOAD};
pub use shrink::shrink;
pub use timestamp::{FileHash, Timestamp, VERSION};
pub use tree::Tree;
