// Core layer - configuration and reply helpers
pub mod core;

// Features layer - cache, rate limiter, request gate and upstream providers
pub mod features;

// Application layer - Discord slash commands
pub mod commands;

pub use crate::core::Config;

pub use features::{
    // Cache
    ExpiringCache,
    // Gate
    GateError, GateReply, GateRequest, Provenance, RequestGate, TextLimits, Upstream,
    // Rate limiting
    Identity, RateLimiter,
    // Providers
    GoogleTranslator, LookupResult, WikipediaClient,
};
