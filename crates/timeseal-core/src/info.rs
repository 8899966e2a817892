//! Deterministic human-readable rendering of a proof.
//!
//! One line per op or attestation. A node with a single record continues at
//! the same indent; when siblings branch, each branch is indented one level
//! and its first line is prefixed with `" -> "`. Payload bytes render as
//! lowercase hex with no separators — the output is a format contract for
//! golden tests.

use crate::attestation::Attestation;
use crate::op::Op;
use crate::timestamp::Timestamp;
use crate::tree::Tree;

/// Render a proof listing.
pub fn info(timestamp: &Timestamp) -> String {
    render(timestamp, false)
}

/// Render a proof listing with intermediate messages and a version header.
pub fn info_verbose(timestamp: &Timestamp) -> String {
    render(timestamp, true)
}

fn render(timestamp: &Timestamp, verbose: bool) -> String {
    let mut lines = Vec::new();
    if verbose {
        lines.push(format!("# version: {}", timestamp.version));
    }
    lines.push(format!("msg = {}(FILE)", timestamp.file_hash.algorithm));

    let msg = verbose.then(|| timestamp.file_hash.value.clone());
    if let Some(value) = &msg {
        lines.push(continuation(0, value));
    }

    render_node(&mut lines, &timestamp.tree, 0, msg, verbose);
    lines.join("\n")
}

fn render_node(lines: &mut Vec<String>, tree: &Tree, depth: usize, msg: Option<Vec<u8>>, verbose: bool) {
    let total = tree.attestation_count() + tree.edge_count();
    let (child_depth, branch) = if total > 1 {
        (depth + 1, true)
    } else {
        (depth, false)
    };

    for attestation in tree.attestations() {
        lines.push(line(child_depth, branch, &attestation_text(attestation)));
    }
    for (op, subtree) in tree.edges() {
        lines.push(line(child_depth, branch, &op_text(op)));
        let next = match (&msg, verbose) {
            (Some(current), true) => op.apply(current).ok(),
            _ => None,
        };
        if let Some(value) = &next {
            lines.push(continuation(child_depth, value));
        }
        render_node(lines, subtree, child_depth, next, verbose);
    }
}

fn line(depth: usize, branch: bool, text: &str) -> String {
    let indent = "    ".repeat(depth.saturating_sub(usize::from(branch)));
    if branch {
        format!("{indent} -> {text}")
    } else {
        format!("{indent}{text}")
    }
}

fn continuation(depth: usize, msg: &[u8]) -> String {
    format!("{}  = {}", "    ".repeat(depth), hex::encode(msg))
}

fn op_text(op: &Op) -> String {
    match op.payload() {
        Some(payload) => format!("msg = {}(msg, {})", op.name(), hex::encode(payload)),
        None => format!("msg = {}(msg)", op.name()),
    }
}

fn attestation_text(attestation: &Attestation) -> String {
    match attestation {
        Attestation::Pending { url } => format!("pendingVerify(msg, {url})"),
        Attestation::Bitcoin { height } => format!("bitcoinVerify(msg, {height})"),
        Attestation::Litecoin { height } => format!("litecoinVerify(msg, {height})"),
        Attestation::Ethereum { height } => format!("ethereumVerify(msg, {height})"),
        Attestation::Unknown { tag, .. } => format!("unknownVerify(msg, {})", hex::encode(tag)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::HashAlgorithm;
    use crate::timestamp::FileHash;

    fn sha1_proof(tree: Tree) -> Timestamp {
        Timestamp::new(
            FileHash::new(HashAlgorithm::Sha1, (1..=20).collect()).unwrap(),
            tree,
        )
    }

    fn leaf_tree(attestation: Attestation) -> Tree {
        let mut t = Tree::new();
        t.attest(attestation);
        t
    }

    #[test]
    fn test_single_path() {
        let ts = sha1_proof(leaf_tree(Attestation::Bitcoin { height: 123 }));
        assert_eq!(info(&ts), "msg = sha1(FILE)\nbitcoinVerify(msg, 123)");
    }

    #[test]
    fn test_branching_renders_arrows() {
        let mut tree = leaf_tree(Attestation::Bitcoin { height: 1 });
        tree.incorporate(
            Op::Append(vec![0xab]),
            leaf_tree(Attestation::Pending {
                url: "https://cal.example".into(),
            }),
        );

        let ts = sha1_proof(tree);
        assert_eq!(
            info(&ts),
            "msg = sha1(FILE)\n\
             \x20-> bitcoinVerify(msg, 1)\n\
             \x20-> msg = append(msg, ab)\n\
             \x20   pendingVerify(msg, https://cal.example)"
        );
    }

    #[test]
    fn test_verbose_tracks_messages() {
        let mut tree = Tree::new();
        tree.incorporate(
            Op::Hexlify,
            leaf_tree(Attestation::Bitcoin { height: 9 }),
        );
        let mut ts = sha1_proof(tree);
        ts.file_hash.value = vec![0xab; 20];

        let out = info_verbose(&ts);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "# version: 1");
        assert_eq!(lines[1], "msg = sha1(FILE)");
        assert_eq!(lines[2], format!("  = {}", "ab".repeat(20)));
        assert_eq!(lines[3], "msg = hexlify(msg)");
        assert_eq!(
            lines[4],
            format!("  = {}", hex::encode("ab".repeat(20).as_bytes()))
        );
        assert_eq!(lines[5], "bitcoinVerify(msg, 9)");
    }

    #[test]
    fn test_deterministic() {
        let mut tree = leaf_tree(Attestation::Litecoin { height: 4 });
        tree.incorporate(
            Op::Hash(HashAlgorithm::Sha256),
            leaf_tree(Attestation::Bitcoin { height: 2 }),
        );
        let ts = sha1_proof(tree);
        assert_eq!(info(&ts), info(&ts));
    }
}
