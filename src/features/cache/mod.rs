//! # Result Cache Feature
//!
//! In-memory, time-expiring LRU store for upstream results.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.2.0
//! - **Toggleable**: false

pub mod expiring;

pub use expiring::ExpiringCache;
