//! # Features
//!
//! Caching, rate limiting and the request gate that combines them, plus the upstream
//! providers the bot puts behind gates.

pub mod cache;
pub mod gate;
pub mod rate_limiting;
pub mod translation;
pub mod wiki;

pub use cache::ExpiringCache;
pub use gate::{GateError, GateReply, GateRequest, Provenance, RequestGate, TextLimits, Upstream};
pub use rate_limiting::{Identity, RateLimiter};
pub use translation::GoogleTranslator;
pub use wiki::{LookupResult, WikipediaClient};
