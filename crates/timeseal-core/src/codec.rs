//! Binary codec for timestamp proofs.
//!
//! A detached proof is the fixed header magic, a varint version, the file
//! digest (one algorithm tag byte plus the raw digest), and the proof tree.
//! A tree level is a run of records: a `0xff` marker precedes every record
//! except the last at that level. An attestation record starts with `0x00`
//! followed by the 8-byte attestation magic and a kind-specific body; an
//! edge record starts with the op tag (plus a VARBYTES payload for the
//! concat ops) followed by the sub-tree it leads to.
//!
//! Decoding is total: any input either parses or yields a [`CodecError`]
//! carrying the byte offset.

use crate::attestation::Attestation;
use crate::error::CodecError;
use crate::hash::HashAlgorithm;
use crate::op::{Op, MAX_OP_PAYLOAD};
use crate::timestamp::{FileHash, Timestamp, VERSION};
use crate::tree::Tree;
use crate::wire::{Reader, Writer};

/// The fixed 31-byte header every detached proof starts with.
///
/// Starts with a null byte so the file is clearly binary, and contains the
/// strings "OpenTimestamps" and "Proof" so it is recognizable in hex dumps.
pub const HEADER_MAGIC: &[u8; 31] =
    b"\x00OpenTimestamps\x00\x00Proof\x00\xbf\x89\xe2\xe8\x84\xe8\x92\x94";

/// Marker emitted before every sibling record except the last at a level.
const SIBLING_MARKER: u8 = 0xff;

/// Record tag introducing an attestation.
const ATTESTATION_TAG: u8 = 0x00;

/// Nesting bound for decoding untrusted input.
pub(crate) const MAX_DEPTH: usize = 256;

/// Serialize a detached proof.
///
/// An empty top-level tree serializes to zero records (the result is not
/// readable back; see [`read_timestamp`]). Empty sub-trees cannot be
/// represented and are an error.
pub fn write_timestamp(timestamp: &Timestamp) -> Result<Vec<u8>, CodecError> {
    let mut w = Writer::new();
    w.write_bytes(HEADER_MAGIC);
    w.write_uint(timestamp.version);
    w.write_u8(timestamp.file_hash.algorithm.tag());
    w.write_bytes(&timestamp.file_hash.value);
    write_level(&mut w, &timestamp.tree, true)?;
    Ok(w.into_bytes())
}

/// Serialize a bare tree (the body format of calendar responses).
pub fn write_tree(tree: &Tree) -> Result<Vec<u8>, CodecError> {
    let mut w = Writer::new();
    write_level(&mut w, tree, true)?;
    Ok(w.into_bytes())
}

/// Parse a detached proof. The input must be consumed exactly; trailing
/// bytes are garbage at EOF.
pub fn read_timestamp(bytes: &[u8]) -> Result<Timestamp, CodecError> {
    let mut r = Reader::new(bytes);

    let magic = r.read_bytes(HEADER_MAGIC.len())?;
    if magic != HEADER_MAGIC {
        return Err(CodecError::BadMagic);
    }

    let version = r.read_uint()?;
    if version != VERSION {
        return Err(CodecError::UnsupportedVersion(version));
    }

    let tag_offset = r.position();
    let tag = r.read_u8()?;
    let algorithm = HashAlgorithm::from_tag(tag).ok_or(CodecError::UnknownTag {
        tag,
        offset: tag_offset,
    })?;
    let value = r.read_bytes(algorithm.digest_len())?.to_vec();

    let tree = read_level(&mut r, 0)?;
    r.expect_eof()?;

    Ok(Timestamp {
        version,
        file_hash: FileHash { algorithm, value },
        tree,
    })
}

/// Parse a complete bare-tree body, e.g. a calendar response. The body must
/// contain exactly one tree; an empty body is an error.
pub fn read_tree(bytes: &[u8]) -> Result<Tree, CodecError> {
    let mut r = Reader::new(bytes);
    let tree = read_level(&mut r, 0)?;
    r.expect_eof()?;
    Ok(tree)
}

fn write_level(w: &mut Writer, tree: &Tree, allow_empty: bool) -> Result<(), CodecError> {
    let total = tree.attestation_count() + tree.edge_count();
    if total == 0 {
        if allow_empty {
            return Ok(());
        }
        return Err(CodecError::EmptySubtree);
    }

    let mut index = 0usize;
    for attestation in tree.attestations() {
        index += 1;
        if index < total {
            w.write_u8(SIBLING_MARKER);
        }
        write_attestation(w, attestation);
    }
    for (op, subtree) in tree.edges() {
        index += 1;
        if index < total {
            w.write_u8(SIBLING_MARKER);
        }
        write_edge(w, op, subtree)?;
    }
    Ok(())
}

fn write_attestation(w: &mut Writer, attestation: &Attestation) {
    w.write_u8(ATTESTATION_TAG);
    w.write_bytes(&attestation.tag());
    match attestation {
        Attestation::Pending { url } => w.write_varbytes(url.as_bytes()),
        Attestation::Bitcoin { height }
        | Attestation::Litecoin { height }
        | Attestation::Ethereum { height } => w.write_uint(*height),
        Attestation::Unknown { payload, .. } => w.write_varbytes(payload),
    }
}

fn write_edge(w: &mut Writer, op: &Op, subtree: &Tree) -> Result<(), CodecError> {
    w.write_u8(op.tag());
    if let Some(payload) = op.payload() {
        if payload.is_empty() || payload.len() > MAX_OP_PAYLOAD {
            return Err(CodecError::PayloadLength(payload.len()));
        }
        w.write_varbytes(payload);
    }
    write_level(w, subtree, false)
}

fn read_level(r: &mut Reader<'_>, depth: usize) -> Result<Tree, CodecError> {
    if depth > MAX_DEPTH {
        return Err(CodecError::NestingTooDeep {
            offset: r.position(),
        });
    }

    let mut tree = Tree::new();
    loop {
        let offset = r.position();
        let tag = r.read_u8()?;
        if tag == SIBLING_MARKER {
            let offset = r.position();
            let tag = r.read_u8()?;
            read_record(r, &mut tree, tag, offset, depth)?;
        } else {
            read_record(r, &mut tree, tag, offset, depth)?;
            return Ok(tree);
        }
    }
}

fn read_record(
    r: &mut Reader<'_>,
    tree: &mut Tree,
    tag: u8,
    tag_offset: usize,
    depth: usize,
) -> Result<(), CodecError> {
    if tag == ATTESTATION_TAG {
        tree.attest(read_attestation(r)?);
        return Ok(());
    }

    let op = match tag {
        0xf0 => Op::Append(r.read_varbytes()?.to_vec()),
        0xf1 => Op::Prepend(r.read_varbytes()?.to_vec()),
        0xf2 => Op::Reverse,
        0xf3 => Op::Hexlify,
        other => Op::Hash(HashAlgorithm::from_tag(other).ok_or(CodecError::UnknownTag {
            tag: other,
            offset: tag_offset,
        })?),
    };

    let subtree = read_level(r, depth + 1)?;
    tree.incorporate(op, subtree);
    Ok(())
}

fn read_attestation(r: &mut Reader<'_>) -> Result<Attestation, CodecError> {
    let mut tag = [0u8; 8];
    tag.copy_from_slice(r.read_bytes(8)?);

    match tag {
        Attestation::PENDING_TAG => {
            let offset = r.position();
            let bytes = r.read_varbytes()?;
            let url = std::str::from_utf8(bytes)
                .map_err(|_| CodecError::InvalidUtf8 { offset })?
                .to_owned();
            Ok(Attestation::Pending { url })
        }
        Attestation::BITCOIN_TAG => Ok(Attestation::Bitcoin {
            height: r.read_uint()?,
        }),
        Attestation::LITECOIN_TAG => Ok(Attestation::Litecoin {
            height: r.read_uint()?,
        }),
        Attestation::ETHEREUM_TAG => Ok(Attestation::Ethereum {
            height: r.read_uint()?,
        }),
        _ => Ok(Attestation::Unknown {
            tag,
            payload: r.read_varbytes()?.to_vec(),
        }),
    }
}
