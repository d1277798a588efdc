//! # Rate Limiting Feature
//!
//! Sliding window request quotas per user.
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

pub mod limiter;

pub use limiter::{Identity, RateLimiter};
