//! # Timeseal Client
//!
//! Remote half of the timestamp proof engine: submitting digests to
//! calendar servers, upgrading pending attestations, and verifying
//! anchored attestations against blockchain block headers.
//!
//! Every batched operation fans its remote calls out concurrently and
//! never fails the batch for a single calendar or verifier: failures are
//! collected into the returned outcome next to the best-effort result.
//!
//! ## Seams
//!
//! - [`Calendar`] abstracts the calendar HTTP protocol; [`HttpCalendar`]
//!   speaks it for real, [`calendar::memory::MemoryCalendar`] stages
//!   responses for tests.
//! - [`Verifier`] abstracts blockchain block-header lookup;
//!   [`default_verifiers`] ships explorer-backed implementations.

pub mod calendar;
pub mod error;
pub mod explorer;
pub mod stamp;
pub mod upgrade;
pub mod verify;

pub use calendar::{Calendar, CalendarConfig, HttpCalendar, DEFAULT_CALENDARS};
pub use error::{CalendarFailure, ClientError, VerifierError};
pub use explorer::{default_verifiers, BlockchainInfoVerifier, BlockstreamVerifier};
pub use stamp::{stamp, stamp_with, StampOutcome, FUDGE_LEN};
pub use upgrade::{upgrade, UpgradeOutcome};
pub use verify::{verify, verify_with_timeout, Verifier, VerifierSet, VerifyOutcome};
