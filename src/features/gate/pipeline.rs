//! # Request Gate
//!
//! Runs a keyed upstream call behind validation, a per-user rate limit and a result
//! cache. Steps, short-circuiting on the first failure:
//!
//! 1. validate and normalize the request
//! 2. rate check (`is_allowed`), before the cache is consulted
//! 3. cache lookup; hits are returned without recording a request
//! 4. record the request against the user's quota
//! 5. upstream call on a spawned worker task, bounded by the timeout
//! 6. store non-empty results
//!
//! Nothing is retried. Two concurrent misses for the same key both reach the upstream.
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.2.0
//!
//! ## Changelog
//! - 1.2.0: Worker task stores its own result so abandoned requests still warm the cache
//! - 1.1.0: Outcome counters
//! - 1.0.0: Initial release

use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{timeout, Instant};

use super::error::GateError;
use super::fingerprint::Fingerprint;
use super::stats::GateStats;
use super::upstream::{Payload, Upstream};
use super::validation::{validate, GateRequest, NormalizedRequest, TextLimits};
use crate::features::cache::ExpiringCache;
use crate::features::rate_limiting::{Identity, RateLimiter};

/// Where a reply's value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    Fresh { latency: Duration },
    Cached,
}

#[derive(Debug, Clone)]
pub struct GateReply<T> {
    pub value: T,
    pub provenance: Provenance,
    pub request: NormalizedRequest,
}

pub struct RequestGate<U: Upstream> {
    name: &'static str,
    limits: TextLimits,
    timeout: Duration,
    limiter: RateLimiter,
    cache: Arc<ExpiringCache<Fingerprint, U::Output>>,
    upstream: Arc<U>,
    stats: GateStats,
}

impl<U: Upstream> RequestGate<U> {
    pub fn new(
        name: &'static str,
        upstream: U,
        limiter: RateLimiter,
        cache: ExpiringCache<Fingerprint, U::Output>,
        limits: TextLimits,
        timeout: Duration,
    ) -> Self {
        Self {
            name,
            limits,
            timeout,
            limiter,
            cache: Arc::new(cache),
            upstream: Arc::new(upstream),
            stats: GateStats::default(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    pub fn cache(&self) -> &ExpiringCache<Fingerprint, U::Output> {
        &self.cache
    }

    pub fn stats(&self) -> &GateStats {
        &self.stats
    }

    /// Run `request` on behalf of `identity`
    pub async fn execute(
        &self,
        identity: Identity,
        request: &GateRequest,
    ) -> Result<GateReply<U::Output>, GateError> {
        let normalized = validate(request, &self.limits).map_err(|e| {
            self.stats.invalid();
            GateError::from(e)
        })?;

        if !self.limiter.is_allowed(identity) {
            self.stats.rate_limited();
            warn!("[{}] Rate limit exceeded for user {identity}", self.name);
            return Err(GateError::RateLimited);
        }

        let key = Fingerprint::of(&normalized);
        if let Some(value) = self.cache.get(&key) {
            self.stats.cache_hit();
            debug!("[{}] Cache hit for user {identity}", self.name);
            return Ok(GateReply {
                value,
                provenance: Provenance::Cached,
                request: normalized,
            });
        }

        self.limiter.record_request(identity);

        let start = Instant::now();
        let worker = tokio::spawn(call_and_store(
            Arc::clone(&self.upstream),
            Arc::clone(&self.cache),
            key,
            normalized.clone(),
            self.timeout,
        ));
        let outcome = match worker.await {
            Ok(outcome) => outcome,
            Err(e) => Err(GateError::UpstreamError(format!("upstream task failed: {e}"))),
        };
        let latency = start.elapsed();

        match outcome {
            Ok(value) => {
                self.stats.fresh();
                info!(
                    "[{}] Upstream answered for user {identity} in {}ms",
                    self.name,
                    latency.as_millis()
                );
                Ok(GateReply {
                    value,
                    provenance: Provenance::Fresh { latency },
                    request: normalized,
                })
            }
            Err(e) => {
                self.stats.upstream_failure();
                warn!(
                    "[{}] Upstream failed for user {identity} after {}ms: {e}",
                    self.name,
                    latency.as_millis()
                );
                Err(e)
            }
        }
    }
}

/// Worker body: owns everything it touches so it can finish after the caller is gone.
async fn call_and_store<U: Upstream>(
    upstream: Arc<U>,
    cache: Arc<ExpiringCache<Fingerprint, U::Output>>,
    key: Fingerprint,
    request: NormalizedRequest,
    limit: Duration,
) -> Result<U::Output, GateError> {
    match timeout(limit, upstream.call(request)).await {
        Err(_) => Err(GateError::UpstreamTimeout(limit)),
        Ok(Err(e)) => Err(GateError::UpstreamError(format!("{e:#}"))),
        Ok(Ok(value)) if value.is_blank() => Err(GateError::UpstreamEmpty),
        Ok(Ok(value)) => {
            cache.set(key, value.clone());
            Ok(value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::gate::upstream::BlockingUpstream;
    use anyhow::Result;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::sleep;

    struct StubUpstream {
        calls: Arc<AtomicUsize>,
        reply: Result<&'static str, &'static str>,
        delay: Duration,
    }

    impl StubUpstream {
        fn replying(reply: &'static str) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            let stub = StubUpstream {
                calls: Arc::clone(&calls),
                reply: Ok(reply),
                delay: Duration::ZERO,
            };
            (stub, calls)
        }

        fn failing(message: &'static str) -> (Self, Arc<AtomicUsize>) {
            let (mut stub, calls) = Self::replying("");
            stub.reply = Err(message);
            (stub, calls)
        }

        fn delayed(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }
    }

    #[async_trait]
    impl Upstream for StubUpstream {
        type Output = String;

        async fn call(&self, _request: NormalizedRequest) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                sleep(self.delay).await;
            }
            match self.reply {
                Ok(text) => Ok(text.to_string()),
                Err(message) => Err(anyhow::anyhow!(message)),
            }
        }
    }

    fn gate<U: Upstream<Output = String>>(upstream: U, max_requests: usize) -> RequestGate<U> {
        RequestGate::new(
            "translate",
            upstream,
            RateLimiter::new(max_requests, Duration::from_secs(60)),
            ExpiringCache::new(1000, Duration::from_secs(3600)),
            TextLimits::DISCORD_TRANSLATION,
            Duration::from_secs(10),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_fresh_then_cached() {
        let (stub, calls) = StubUpstream::replying("Bonjour le monde");
        let gate = gate(stub, 15);
        let request = GateRequest::new("Hello world", "fr");

        let first = gate.execute(42, &request).await.unwrap();
        assert_eq!(first.value, "Bonjour le monde");
        assert!(matches!(first.provenance, Provenance::Fresh { .. }));

        let second = gate.execute(42, &request).await.unwrap();
        assert_eq!(second.value, "Bonjour le monde");
        assert_eq!(second.provenance, Provenance::Cached);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let stats = gate.stats().snapshot();
        assert_eq!(stats.fresh, 1);
        assert_eq!(stats.cache_hits, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_check_precedes_cache_lookup() {
        let (stub, calls) = StubUpstream::replying("Bonjour le monde");
        let gate = gate(stub, 1);
        let request = GateRequest::new("Hello world", "fr");

        gate.execute(42, &request).await.unwrap();

        // Would be a cache hit, but the quota is already spent
        let err = gate.execute(42, &request).await.unwrap_err();
        assert!(matches!(err, GateError::RateLimited));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // Another user is served from cache without touching the upstream
        let reply = gate.execute(7, &request).await.unwrap();
        assert_eq!(reply.provenance, Provenance::Cached);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cache_hits_do_not_consume_quota() {
        let (stub, calls) = StubUpstream::replying("translated");
        let gate = gate(stub, 2);
        let hello = GateRequest::new("Hello", "fr");

        gate.execute(42, &hello).await.unwrap();
        for _ in 0..5 {
            let reply = gate.execute(42, &hello).await.unwrap();
            assert_eq!(reply.provenance, Provenance::Cached);
        }

        // Second quota slot is still free
        gate.execute(42, &GateRequest::new("Goodbye", "fr")).await.unwrap();
        let err = gate
            .execute(42, &GateRequest::new("Thanks", "fr"))
            .await
            .unwrap_err();
        assert!(matches!(err, GateError::RateLimited));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_input_touches_nothing() {
        let (stub, calls) = StubUpstream::replying("x");
        let gate = gate(stub, 15);

        let err = gate
            .execute(42, &GateRequest::new("Hello", "../etc"))
            .await
            .unwrap_err();
        assert!(matches!(err, GateError::InvalidInput(_)));

        let err = gate.execute(42, &GateRequest::new("   ", "fr")).await.unwrap_err();
        assert!(matches!(err, GateError::InvalidInput(_)));

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(gate.limiter().tracked_identities(), 0);
        assert!(gate.cache().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_creates_no_entry() {
        let (stub, _calls) = StubUpstream::replying("late");
        let gate = gate(stub.delayed(Duration::from_secs(60)), 15);

        let err = gate
            .execute(42, &GateRequest::new("Hello", "fr"))
            .await
            .unwrap_err();
        assert!(matches!(err, GateError::UpstreamTimeout(d) if d == Duration::from_secs(10)));
        assert!(gate.cache().is_empty());
        assert_eq!(gate.stats().snapshot().upstream_failures, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_upstream_error_is_reported_not_cached() {
        let (stub, calls) = StubUpstream::failing("unsupported language");
        let gate = gate(stub, 15);
        let request = GateRequest::new("Hello", "xx");

        match gate.execute(42, &request).await {
            Err(GateError::UpstreamError(msg)) => assert!(msg.contains("unsupported language")),
            other => panic!("expected upstream error, got {other:?}"),
        }
        assert!(gate.cache().is_empty());

        // No retry inside the gate, and the failed attempt still counted
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(gate.limiter().tracked_identities(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_result_is_an_error() {
        let (stub, calls) = StubUpstream::replying("   ");
        let gate = gate(stub, 15);
        let request = GateRequest::new("Hello", "fr");

        assert!(matches!(
            gate.execute(42, &request).await,
            Err(GateError::UpstreamEmpty)
        ));
        assert!(matches!(
            gate.execute(42, &request).await,
            Err(GateError::UpstreamEmpty)
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_abandoned_request_still_populates_cache() {
        let (stub, calls) = StubUpstream::replying("Hallo");
        let gate = gate(stub.delayed(Duration::from_secs(2)), 15);
        let request = GateRequest::new("Hello", "de");

        // Caller gives up before the upstream answers
        let abandoned = timeout(Duration::from_millis(100), gate.execute(42, &request)).await;
        assert!(abandoned.is_err());

        sleep(Duration::from_secs(3)).await;
        let reply = gate.execute(42, &request).await.unwrap();
        assert_eq!(reply.provenance, Provenance::Cached);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cached_value_expires_with_ttl() {
        let (stub, calls) = StubUpstream::replying("Hola");
        let gate = gate(stub, 15);
        let request = GateRequest::new("Hello", "es");

        gate.execute(42, &request).await.unwrap();
        tokio::time::advance(Duration::from_secs(3601)).await;

        let reply = gate.execute(42, &request).await.unwrap();
        assert!(matches!(reply.provenance, Provenance::Fresh { .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    /// Answers immediately except for one text, which takes `delay`
    struct SlowOnText {
        slow_text: &'static str,
        delay: Duration,
    }

    #[async_trait]
    impl Upstream for SlowOnText {
        type Output = String;

        async fn call(&self, request: NormalizedRequest) -> Result<String> {
            if request.text == self.slow_text {
                sleep(self.delay).await;
            }
            Ok(format!("done: {}", request.text))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_upstream_call_does_not_block_other_users() {
        let gate = Arc::new(gate(
            SlowOnText {
                slow_text: "slow",
                delay: Duration::from_secs(5),
            },
            15,
        ));

        let slow_gate = Arc::clone(&gate);
        let slow = tokio::spawn(async move {
            slow_gate.execute(1, &GateRequest::new("slow", "fr")).await
        });
        // Let user 1's upstream call start sleeping
        tokio::task::yield_now().await;

        let started = Instant::now();
        let fast = gate.execute(2, &GateRequest::new("fast", "fr")).await.unwrap();
        assert_eq!(fast.value, "done: fast");
        assert!(started.elapsed() < Duration::from_secs(5));
        assert!(!slow.is_finished());

        let slow = slow.await.unwrap().unwrap();
        assert_eq!(slow.value, "done: slow");
        assert!(matches!(slow.provenance, Provenance::Fresh { latency } if latency >= Duration::from_secs(5)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_users_share_cache_safely() {
        let (stub, calls) = StubUpstream::replying("Bonjour");
        let gate = Arc::new(gate(stub.delayed(Duration::from_millis(20)), 15));
        let request = GateRequest::new("Hello", "fr");

        // Warm the cache, then let many users hit it at once
        gate.execute(0, &request).await.unwrap();
        let callers: Vec<_> = (1..=32u64)
            .map(|identity| {
                let gate = Arc::clone(&gate);
                let request = request.clone();
                tokio::spawn(async move { gate.execute(identity, &request).await })
            })
            .collect();
        for caller in callers {
            let reply = caller.await.unwrap().unwrap();
            assert_eq!(reply.provenance, Provenance::Cached);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(gate.stats().snapshot().cache_hits, 32);
        assert_eq!(gate.limiter().tracked_identities(), 1);
    }

    #[tokio::test]
    async fn test_blocking_upstream_through_gate() {
        let upstream = BlockingUpstream::new(|req: &NormalizedRequest| {
            std::thread::sleep(Duration::from_millis(10));
            Ok(format!("[{}] {}", req.lang, req.text))
        });
        let gate = gate(upstream, 15);

        let reply = gate
            .execute(1, &GateRequest::new("Hello world", "EN-us"))
            .await
            .unwrap();
        assert_eq!(reply.value, "[en-us] Hello world");
        assert_eq!(reply.request.lang, "en-us");
    }
}
