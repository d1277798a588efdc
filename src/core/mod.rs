//! # Core Module
//!
//! Configuration and shared Discord reply helpers.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Add lookup embeds
//! - 1.0.0: Initial creation with config and embeds modules

pub mod config;
pub mod embeds;

pub use config::{Config, GateSettings};
pub use embeds::{lookup_embed, provenance_footer, translation_embed, truncate_chars};
