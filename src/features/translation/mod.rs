//! # Translation Feature
//!
//! Text translation provider used behind the translate gate.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

pub mod google;

pub use google::GoogleTranslator;
