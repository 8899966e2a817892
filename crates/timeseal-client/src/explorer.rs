//! Block-explorer backed verifiers for Bitcoin attestations.
//!
//! These are thin clients over public explorer APIs. Each one answers only
//! for Bitcoin attestations and declines everything else; a Merkle-root
//! mismatch is a hard failure, not a decline.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use timeseal_core::Attestation;

use crate::error::{ClientError, VerifierError};
use crate::verify::{Verifier, VerifierSet, DEFAULT_VERIFIER_TIMEOUT};

/// Explorers render Merkle roots byte-reversed relative to the proof's
/// message bytes.
fn display_root(message: &[u8]) -> String {
    let mut bytes = message.to_vec();
    bytes.reverse();
    hex::encode(bytes)
}

fn bitcoin_height(attestation: &Attestation) -> Option<u64> {
    match attestation {
        Attestation::Bitcoin { height } => Some(*height),
        _ => None,
    }
}

/// Verifier backed by blockstream.info's Esplora API.
pub struct BlockstreamVerifier {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct EsploraBlock {
    timestamp: u64,
    merkle_root: String,
}

impl BlockstreamVerifier {
    pub fn new() -> Self {
        Self::with_base_url("https://blockstream.info/api")
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            timeout: DEFAULT_VERIFIER_TIMEOUT,
        }
    }
}

impl Default for BlockstreamVerifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Verifier for BlockstreamVerifier {
    async fn block_time(
        &self,
        message: &[u8],
        attestation: &Attestation,
    ) -> Result<Option<u64>, VerifierError> {
        let Some(height) = bitcoin_height(attestation) else {
            return Ok(None);
        };

        let hash_url = format!("{}/block-height/{}", self.base_url, height);
        let response = self
            .client
            .get(&hash_url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ClientError::from_reqwest(&hash_url, e))?;
        if response.status().as_u16() == 404 {
            return Err(VerifierError::MissingBlock(height));
        }
        if !response.status().is_success() {
            return Err(ClientError::Http {
                url: hash_url,
                status: response.status().as_u16(),
                body: response.text().await.unwrap_or_default(),
            }
            .into());
        }
        let block_hash = response
            .text()
            .await
            .map_err(|e| ClientError::from_reqwest(&hash_url, e))?;

        let block_url = format!("{}/block/{}", self.base_url, block_hash.trim());
        let block: EsploraBlock = self
            .client
            .get(&block_url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ClientError::from_reqwest(&block_url, e))?
            .json()
            .await
            .map_err(|e| ClientError::from_reqwest(&block_url, e))?;

        let expected = display_root(message);
        if block.merkle_root != expected {
            return Err(VerifierError::RootMismatch {
                height,
                expected,
                actual: block.merkle_root,
            });
        }
        Ok(Some(block.timestamp))
    }
}

/// Verifier backed by blockchain.info.
pub struct BlockchainInfoVerifier {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct BlockchainInfoBlocks {
    blocks: Vec<BlockchainInfoBlock>,
}

#[derive(Debug, Deserialize)]
struct BlockchainInfoBlock {
    time: u64,
    mrkl_root: String,
    #[serde(default)]
    main_chain: bool,
}

impl BlockchainInfoVerifier {
    pub fn new() -> Self {
        Self::with_base_url("https://blockchain.info")
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            timeout: DEFAULT_VERIFIER_TIMEOUT,
        }
    }
}

impl Default for BlockchainInfoVerifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Verifier for BlockchainInfoVerifier {
    async fn block_time(
        &self,
        message: &[u8],
        attestation: &Attestation,
    ) -> Result<Option<u64>, VerifierError> {
        let Some(height) = bitcoin_height(attestation) else {
            return Ok(None);
        };

        let url = format!("{}/block-height/{}?format=json", self.base_url, height);
        let response = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ClientError::from_reqwest(&url, e))?;
        if !response.status().is_success() {
            return Err(ClientError::Http {
                url,
                status: response.status().as_u16(),
                body: response.text().await.unwrap_or_default(),
            }
            .into());
        }
        let payload: BlockchainInfoBlocks = response
            .json()
            .await
            .map_err(|e| ClientError::from_reqwest(&url, e))?;

        let block = payload
            .blocks
            .iter()
            .find(|b| b.main_chain)
            .or_else(|| payload.blocks.first())
            .ok_or(VerifierError::MissingBlock(height))?;

        let expected = display_root(message);
        if block.mrkl_root != expected {
            return Err(VerifierError::RootMismatch {
                height,
                expected,
                actual: block.mrkl_root.clone(),
            });
        }
        Ok(Some(block.time))
    }
}

/// The verifier set shipped by default.
pub fn default_verifiers() -> VerifierSet {
    let mut set = VerifierSet::new();
    set.insert(
        "blockchain-info".to_string(),
        Arc::new(BlockchainInfoVerifier::new()) as Arc<dyn Verifier>,
    );
    set.insert(
        "blockstream".to_string(),
        Arc::new(BlockstreamVerifier::new()) as Arc<dyn Verifier>,
    );
    set
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_root_reverses_bytes() {
        assert_eq!(display_root(&[0x01, 0x02, 0xff]), "ff0201");
    }

    #[test]
    fn test_default_set_names() {
        let set = default_verifiers();
        let names: Vec<_> = set.keys().cloned().collect();
        assert_eq!(names, vec!["blockchain-info", "blockstream"]);
    }

    #[tokio::test]
    async fn test_explorers_decline_other_chains() {
        let litecoin = Attestation::Litecoin { height: 10 };
        let pending = Attestation::Pending {
            url: "https://cal.example".into(),
        };

        let blockstream = BlockstreamVerifier::new();
        assert_eq!(blockstream.block_time(&[], &litecoin).await.unwrap(), None);
        assert_eq!(blockstream.block_time(&[], &pending).await.unwrap(), None);

        let blockchain_info = BlockchainInfoVerifier::new();
        assert_eq!(
            blockchain_info.block_time(&[], &litecoin).await.unwrap(),
            None
        );
    }
}
