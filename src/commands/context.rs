//! Shared context for command handlers
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.2.0
//!
//! ## Changelog
//! - 2.0.0: Hold one request gate per upstream instead of raw clients
//! - 1.0.0: Initial implementation with core shared state

use anyhow::Result;
use log::info;
use std::sync::Arc;

use crate::core::{Config, GateSettings};
use crate::features::cache::ExpiringCache;
use crate::features::gate::{RequestGate, TextLimits, Upstream};
use crate::features::rate_limiting::RateLimiter;
use crate::features::translation::GoogleTranslator;
use crate::features::wiki::WikipediaClient;

pub type TranslateGate = RequestGate<GoogleTranslator>;
pub type WikiGate = RequestGate<WikipediaClient>;

/// Shared context for all command handlers
///
/// Each gate owns its own cache and rate limiter, so translation and lookup quotas are
/// independent.
#[derive(Clone)]
pub struct CommandContext {
    pub translate: Arc<TranslateGate>,
    pub wiki: Arc<WikiGate>,
}

impl CommandContext {
    pub fn new(translate: TranslateGate, wiki: WikiGate) -> Self {
        Self {
            translate: Arc::new(translate),
            wiki: Arc::new(wiki),
        }
    }

    /// Build both gates and their upstream clients from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let translator = GoogleTranslator::new()?;
        let wikipedia = WikipediaClient::new()?;

        let translate = build_gate(
            "translate",
            translator,
            &config.translate,
            TextLimits::DISCORD_TRANSLATION,
        );
        let wiki = build_gate("wiki", wikipedia, &config.wiki, TextLimits::SEARCH);

        Ok(Self::new(translate, wiki))
    }

    /// Drop idle identities from every gate's rate limiter
    pub fn compact_rate_limiters(&self) -> usize {
        self.translate.limiter().compact() + self.wiki.limiter().compact()
    }

    /// Log outcome counters and cache occupancy for every gate
    pub fn log_stats(&self) {
        log_gate_stats(&self.translate);
        log_gate_stats(&self.wiki);
    }
}

fn log_gate_stats<U: Upstream>(gate: &RequestGate<U>) {
    let stats = gate.stats().snapshot();
    let cache = gate.cache();
    info!(
        "📊 /{}: {} fresh, {} cached ({:.0}% hit), {} rate limited, {} invalid, {} upstream failures | cache {}/{} entries, {}s TTL",
        gate.name(),
        stats.fresh,
        stats.cache_hits,
        stats.hit_ratio() * 100.0,
        stats.rate_limited,
        stats.invalid,
        stats.upstream_failures,
        cache.len(),
        cache.capacity(),
        cache.ttl().as_secs()
    );
}

fn build_gate<U: Upstream>(
    name: &'static str,
    upstream: U,
    settings: &GateSettings,
    limits: TextLimits,
) -> RequestGate<U> {
    info!(
        "🚦 /{name} gate: cache {} entries / {}s TTL, {} requests per {}s, {}s timeout",
        settings.cache_capacity,
        settings.cache_ttl.as_secs(),
        settings.max_requests,
        settings.rate_window.as_secs(),
        settings.upstream_timeout.as_secs()
    );
    RequestGate::new(
        name,
        upstream,
        RateLimiter::new(settings.max_requests, settings.rate_window),
        ExpiringCache::new(settings.cache_capacity, settings.cache_ttl),
        limits,
        settings.upstream_timeout,
    )
}
