//! # Request Gate Feature
//!
//! Validation, per-user rate limiting and result caching in front of an expensive
//! upstream call.
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.2.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.2.0: Abandoned requests still populate the cache
//! - 1.1.0: Search-style validation and outcome counters
//! - 1.0.0: Initial release extracted from the translate command

pub mod error;
pub mod fingerprint;
pub mod pipeline;
pub mod stats;
pub mod upstream;
pub mod validation;

pub use error::{GateError, ValidationError};
pub use fingerprint::Fingerprint;
pub use pipeline::{GateReply, Provenance, RequestGate};
pub use stats::{GateStats, StatsSnapshot};
pub use upstream::{BlockingUpstream, Payload, Upstream};
pub use validation::{GateRequest, NormalizedRequest, TextLimits};
