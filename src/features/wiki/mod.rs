//! # Wiki Lookup Feature
//!
//! Wikipedia article summaries, served through the lookup gate.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.3.0
//! - **Toggleable**: false

pub mod client;

pub use client::{wiki_edition, LookupResult, WikipediaClient};
