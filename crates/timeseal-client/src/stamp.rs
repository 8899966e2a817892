//! Submitting a digest to remote calendars.
//!
//! The digest sent to the calendars is `sha256(value ‖ fudge)` so a
//! calendar never learns the file's own digest. The resulting proof commits
//! to the fudge with an append edge, so the path from the file digest to
//! each calendar's sub-tree replays exactly.

use futures::future::join_all;
use rand::RngCore;
use tracing::{debug, warn};

use timeseal_core::{read_tree, FileHash, HashAlgorithm, Op, Timestamp, Tree};

use crate::calendar::{Calendar, CalendarConfig};
use crate::error::{CalendarFailure, ClientError};

/// Length of the random fudge mixed into the submitted digest.
pub const FUDGE_LEN: usize = 16;

/// Result of a submission batch.
#[derive(Debug)]
pub struct StampOutcome {
    /// The assembled proof; `None` when every calendar failed.
    pub timestamp: Option<Timestamp>,
    /// Per-calendar failures. A failing calendar never prevents another
    /// from contributing.
    pub errors: Vec<CalendarFailure>,
}

/// Submit `file_hash` to the configured calendars with a random fudge.
pub async fn stamp<C>(calendar: &C, config: &CalendarConfig, file_hash: FileHash) -> StampOutcome
where
    C: Calendar + ?Sized,
{
    let mut fudge = [0u8; FUDGE_LEN];
    rand::thread_rng().fill_bytes(&mut fudge);
    stamp_with(calendar, config, file_hash, fudge.to_vec()).await
}

/// Submit `file_hash` with a caller-chosen fudge.
pub async fn stamp_with<C>(
    calendar: &C,
    config: &CalendarConfig,
    file_hash: FileHash,
    fudge: Vec<u8>,
) -> StampOutcome
where
    C: Calendar + ?Sized,
{
    // The seed is what every calendar receives and what their sub-trees
    // continue from.
    let mut seed_input = file_hash.value.clone();
    seed_input.extend_from_slice(&fudge);
    let seed = HashAlgorithm::Sha256.digest(&seed_input);

    debug!(calendars = config.calendars.len(), "submitting digest");
    let requests = config.calendars.iter().map(|url| {
        let seed = seed.clone();
        async move {
            let result = calendar.submit_digest(url, &seed).await;
            (url.clone(), result)
        }
    });
    let responses = join_all(requests).await;

    let mut merged = Tree::new();
    let mut errors = Vec::new();
    let mut succeeded = 0usize;
    for (url, result) in responses {
        let parsed = result.and_then(|body| {
            read_tree(&body).map_err(|source| ClientError::BadResponse {
                url: url.clone(),
                source,
            })
        });
        match parsed {
            Ok(subtree) => {
                merged.merge(subtree);
                succeeded += 1;
            }
            Err(error) => {
                warn!(%url, %error, "calendar submission failed");
                errors.push(CalendarFailure { url, error });
            }
        }
    }

    if succeeded == 0 {
        return StampOutcome {
            timestamp: None,
            errors,
        };
    }
    debug!(succeeded, failed = errors.len(), "submission complete");

    let mut hashed = Tree::new();
    hashed.incorporate(Op::Hash(HashAlgorithm::Sha256), merged);
    let mut root = Tree::new();
    root.incorporate(Op::Append(fudge), hashed);

    StampOutcome {
        timestamp: Some(Timestamp::new(file_hash, root)),
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use timeseal_core::{apply_ops, write_tree, Attestation};

    use crate::calendar::memory::MemoryCalendar;

    fn config(urls: &[&str]) -> CalendarConfig {
        CalendarConfig {
            calendars: urls.iter().map(|s| s.to_string()).collect(),
            ..CalendarConfig::default()
        }
    }

    fn pending_tree(url: &str) -> Vec<u8> {
        let mut tree = Tree::new();
        tree.attest(Attestation::Pending { url: url.into() });
        write_tree(&tree).unwrap()
    }

    fn sha1_hash() -> FileHash {
        FileHash::new(HashAlgorithm::Sha1, (1..=20).collect()).unwrap()
    }

    #[tokio::test]
    async fn test_stamp_assembles_fudge_then_sha256() {
        let urls = ["https://a.example", "https://b.example"];
        let calendar = MemoryCalendar::new();
        for url in urls {
            calendar.stage_submit(url, pending_tree(url));
        }

        let fudge = vec![0x01, 0x02, 0x03, 0x0c, 0x17, 0x7b];
        let outcome = stamp_with(&calendar, &config(&urls), sha1_hash(), fudge.clone()).await;
        assert!(outcome.errors.is_empty());

        let ts = outcome.timestamp.unwrap();
        let paths: Vec<_> = ts.tree.paths().collect();
        assert_eq!(paths.len(), 2);
        for (ops, attestation) in &paths {
            assert_eq!(
                ops[..2],
                [Op::Append(fudge.clone()), Op::Hash(HashAlgorithm::Sha256)]
            );
            assert!(attestation.is_pending());
        }

        // Every calendar received sha256(value ‖ fudge).
        let expected_seed = {
            let mut input: Vec<u8> = (1..=20).collect();
            input.extend_from_slice(&fudge);
            HashAlgorithm::Sha256.digest(&input)
        };
        for (_, digest) in calendar.submissions() {
            assert_eq!(digest, expected_seed);
        }

        // The seed is also what the proof path replays to.
        let (ops, _) = &paths[0];
        assert_eq!(apply_ops(&ts.file_hash.value, ops).unwrap(), expected_seed);
    }

    #[tokio::test]
    async fn test_stamp_partial_failure_keeps_result() {
        let calendar = MemoryCalendar::new();
        calendar.stage_submit("https://ok.example", pending_tree("https://ok.example"));
        calendar.fail("https://down.example");

        let outcome = stamp_with(
            &calendar,
            &config(&["https://ok.example", "https://down.example"]),
            sha1_hash(),
            vec![0xaa],
        )
        .await;

        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].url, "https://down.example");
        let ts = outcome.timestamp.unwrap();
        assert_eq!(ts.tree.leaf_count(), 1);
        assert!(ts.can_upgrade());
    }

    #[tokio::test]
    async fn test_stamp_all_failed() {
        let calendar = MemoryCalendar::new();
        calendar.fail("https://down.example");

        let outcome = stamp_with(
            &calendar,
            &config(&["https://down.example"]),
            sha1_hash(),
            vec![0xaa],
        )
        .await;

        assert!(outcome.timestamp.is_none());
        assert_eq!(outcome.errors.len(), 1);
    }

    #[tokio::test]
    async fn test_stamp_undecodable_body_is_error() {
        let calendar = MemoryCalendar::new();
        calendar.stage_submit("https://bad.example", vec![0x42]);

        let outcome = stamp_with(
            &calendar,
            &config(&["https://bad.example"]),
            sha1_hash(),
            vec![0xaa],
        )
        .await;

        assert!(outcome.timestamp.is_none());
        assert!(matches!(
            outcome.errors[0].error,
            ClientError::BadResponse { .. }
        ));
    }

    #[tokio::test]
    async fn test_stamp_random_fudge_length() {
        let calendar = MemoryCalendar::new();
        calendar.stage_submit("https://a.example", pending_tree("https://a.example"));

        let outcome = stamp(&calendar, &config(&["https://a.example"]), sha1_hash()).await;
        let ts = outcome.timestamp.unwrap();
        let (ops, _) = ts.tree.paths().next().unwrap();
        let Op::Append(fudge) = &ops[0] else {
            panic!("expected append edge first");
        };
        assert_eq!(fudge.len(), FUDGE_LEN);
    }
}
