//! # Timeseal Testkit
//!
//! Testing utilities for the timestamp proof engine.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Generators**: Proptest strategies for ops, attestations, trees, and
//!   whole proofs
//! - **Fixtures**: Canned proofs and calendar bodies for integration tests
//!
//! ## Property Testing
//!
//! Use the generators with proptest:
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use timeseal_testkit::generators;
//!
//! proptest! {
//!     #[test]
//!     fn roundtrip(ts in generators::timestamp()) {
//!         let bytes = timeseal_core::write_timestamp(&ts).unwrap();
//!         prop_assert_eq!(timeseal_core::read_timestamp(&bytes).unwrap(), ts);
//!     }
//! }
//! ```
//!
//! ## Fixtures
//!
//! ```rust
//! let ts = timeseal_testkit::fixtures::two_bitcoin();
//! assert!(ts.can_verify());
//! assert!(ts.can_shrink(timeseal_core::Chain::Bitcoin));
//! ```

pub mod fixtures;
pub mod generators;
