//! Message-transforming operations carried on tree edges.
//!
//! Every edge in a proof tree is labelled with an op; the sub-tree behind it
//! continues from the transformed message.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::OverflowError;
use crate::hash::HashAlgorithm;

/// Upper bound on the length of any intermediate message.
pub const MAX_MSG_LENGTH: usize = 4096;

/// Bounds on an append/prepend payload accepted by the encoder.
pub const MAX_OP_PAYLOAD: usize = 4096;

/// A byte-string-to-byte-string transform.
///
/// Two ops are equal iff they have the same tag and, for the unary ops,
/// byte-identical payloads. The total order is tag ascending, then payload
/// lexicographic; it fixes the serialization order of sibling edges.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Op {
    /// `m ‖ payload`
    Append(Vec<u8>),
    /// `payload ‖ m`
    Prepend(Vec<u8>),
    /// `reverse(m)`
    Reverse,
    /// Lowercase hex of `m`.
    Hexlify,
    /// Digest of `m`.
    Hash(HashAlgorithm),
}

impl Op {
    /// The wire tag byte.
    pub fn tag(&self) -> u8 {
        match self {
            Self::Append(_) => 0xf0,
            Self::Prepend(_) => 0xf1,
            Self::Reverse => 0xf2,
            Self::Hexlify => 0xf3,
            Self::Hash(alg) => alg.tag(),
        }
    }

    /// Payload bytes for the unary ops, `None` for the nullary ones.
    pub fn payload(&self) -> Option<&[u8]> {
        match self {
            Self::Append(p) | Self::Prepend(p) => Some(p),
            _ => None,
        }
    }

    /// Name as rendered in proof listings.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Append(_) => "append",
            Self::Prepend(_) => "prepend",
            Self::Reverse => "reverse",
            Self::Hexlify => "hexlify",
            Self::Hash(alg) => alg.name(),
        }
    }

    /// Apply this op to a message.
    pub fn apply(&self, msg: &[u8]) -> Result<Vec<u8>, OverflowError> {
        match self {
            Self::Append(tail) => concat(msg, tail),
            Self::Prepend(head) => concat(head, msg),
            Self::Reverse => Ok(msg.iter().rev().copied().collect()),
            Self::Hexlify => hexlify(msg),
            Self::Hash(alg) => Ok(alg.digest(msg)),
        }
    }
}

impl Ord for Op {
    fn cmp(&self, other: &Self) -> Ordering {
        self.tag()
            .cmp(&other.tag())
            .then_with(|| self.payload().unwrap_or(&[]).cmp(other.payload().unwrap_or(&[])))
    }
}

impl PartialOrd for Op {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Fold a sequence of ops over a message, left to right.
pub fn apply_ops(message: &[u8], ops: &[Op]) -> Result<Vec<u8>, OverflowError> {
    let mut msg = message.to_vec();
    for op in ops {
        msg = op.apply(&msg)?;
    }
    Ok(msg)
}

fn concat(left: &[u8], right: &[u8]) -> Result<Vec<u8>, OverflowError> {
    let len = left.len() + right.len();
    if len > MAX_MSG_LENGTH {
        return Err(OverflowError { len });
    }
    let mut out = Vec::with_capacity(len);
    out.extend_from_slice(left);
    out.extend_from_slice(right);
    Ok(out)
}

fn hexlify(msg: &[u8]) -> Result<Vec<u8>, OverflowError> {
    let len = msg.len() * 2;
    if len > MAX_MSG_LENGTH {
        return Err(OverflowError { len });
    }
    Ok(hex::encode(msg).into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hexlify() {
        #[track_caller]
        fn t(input: &[u8], expected: &[u8]) {
            assert_eq!(Op::Hexlify.apply(input).unwrap(), expected);
        }

        t(&[], b"");
        t(&[0], b"00");
        t(&[0xab], b"ab");
        t(&[0xab, 0xcd], b"abcd");

        t(&[0; 2048], &[b'0'; 4096]);
        assert_eq!(
            Op::Hexlify.apply(&[0; 2049]),
            Err(OverflowError { len: 4098 })
        );
    }

    #[test]
    fn test_concat_ops() {
        assert_eq!(Op::Append(vec![3, 4]).apply(&[1, 2]).unwrap(), vec![1, 2, 3, 4]);
        assert_eq!(Op::Prepend(vec![3, 4]).apply(&[1, 2]).unwrap(), vec![3, 4, 1, 2]);

        let big = vec![0u8; MAX_MSG_LENGTH];
        assert_eq!(
            Op::Append(vec![0]).apply(&big),
            Err(OverflowError { len: 4097 })
        );
    }

    #[test]
    fn test_reverse() {
        assert_eq!(Op::Reverse.apply(&[1, 2, 3]).unwrap(), vec![3, 2, 1]);
        assert_eq!(Op::Reverse.apply(&[]).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_hash_ops_match_primitives() {
        let msg = b"timestamp proof";
        for alg in [
            HashAlgorithm::Sha1,
            HashAlgorithm::Ripemd160,
            HashAlgorithm::Sha256,
            HashAlgorithm::Keccak256,
        ] {
            assert_eq!(Op::Hash(alg).apply(msg).unwrap(), alg.digest(msg));
        }
    }

    #[test]
    fn test_total_order() {
        // Tag ascending: hashes (0x02..0x67) before the 0xf0-range ops.
        let mut ops = vec![
            Op::Hexlify,
            Op::Append(vec![2]),
            Op::Hash(HashAlgorithm::Sha1),
            Op::Append(vec![1]),
            Op::Hash(HashAlgorithm::Keccak256),
        ];
        ops.sort();
        assert_eq!(
            ops,
            vec![
                Op::Hash(HashAlgorithm::Sha1),
                Op::Hash(HashAlgorithm::Keccak256),
                Op::Append(vec![1]),
                Op::Append(vec![2]),
                Op::Hexlify,
            ]
        );
    }

    #[test]
    fn test_apply_ops_folds() {
        let ops = vec![Op::Append(vec![0xcd]), Op::Hexlify];
        assert_eq!(apply_ops(&[0xab], &ops).unwrap(), b"abcd".to_vec());
    }
}
