//! Error types for the proof engine.

use thiserror::Error;

use crate::hash::HashAlgorithm;

/// Errors from the binary codec.
///
/// Decode errors carry the byte offset at which the problem was noticed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("unexpected end of input at offset {offset}")]
    Truncated { offset: usize },

    #[error("garbage at EOF: {trailing} trailing byte(s) at offset {offset}")]
    TrailingBytes { offset: usize, trailing: usize },

    #[error("bad header magic")]
    BadMagic,

    #[error("unsupported proof version {0}")]
    UnsupportedVersion(u64),

    #[error("unknown tag 0x{tag:02x} at offset {offset}")]
    UnknownTag { tag: u8, offset: usize },

    #[error("varint does not fit in 64 bits at offset {offset}")]
    VarintOverflow { offset: usize },

    #[error("calendar url is not valid utf-8 at offset {offset}")]
    InvalidUtf8 { offset: usize },

    #[error("op payload length {0} outside 1..=4096")]
    PayloadLength(usize),

    #[error("cannot serialize an empty subtree")]
    EmptySubtree,

    #[error("tree nesting exceeds {max} levels at offset {offset}", max = crate::codec::MAX_DEPTH)]
    NestingTooDeep { offset: usize },
}

/// Structural validation errors for in-memory proof values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("digest length {actual} does not match {algorithm} (expected {expected})")]
    DigestLength {
        algorithm: HashAlgorithm,
        expected: usize,
        actual: usize,
    },

    #[error("unsupported proof version {0}")]
    UnsupportedVersion(u64),

    #[error("proof tree is empty")]
    EmptyTree,

    #[error("op payload length {0} outside 1..=4096")]
    PayloadLength(usize),
}

/// Raised when applying ops would grow a message past [`crate::op::MAX_MSG_LENGTH`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("message length {len} exceeds the 4096-byte bound")]
pub struct OverflowError {
    /// The length the message would have reached.
    pub len: usize,
}
