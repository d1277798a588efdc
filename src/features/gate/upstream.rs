//! Upstream collaborator traits
//!
//! The gate treats the provider (translation engine, encyclopedia API) as opaque: it
//! hands over a normalized request and gets back a payload or an error.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0

use anyhow::Result;
use async_trait::async_trait;
use std::marker::PhantomData;
use std::sync::Arc;

use super::validation::NormalizedRequest;

/// Result payload that can be cached and checked for emptiness
pub trait Payload: Clone + Send + Sync + 'static {
    /// Whether the upstream answered without usable data
    fn is_blank(&self) -> bool;
}

impl Payload for String {
    fn is_blank(&self) -> bool {
        self.trim().is_empty()
    }
}

/// An expensive, keyed, idempotent external call
#[async_trait]
pub trait Upstream: Send + Sync + 'static {
    type Output: Payload;

    async fn call(&self, request: NormalizedRequest) -> Result<Self::Output>;
}

/// Adapter for a synchronous provider function.
///
/// Each call runs on tokio's blocking pool so a slow provider never stalls the
/// event-handling tasks.
pub struct BlockingUpstream<F, T> {
    func: Arc<F>,
    _output: PhantomData<fn() -> T>,
}

impl<F, T> BlockingUpstream<F, T>
where
    F: Fn(&NormalizedRequest) -> Result<T> + Send + Sync + 'static,
    T: Payload,
{
    pub fn new(func: F) -> Self {
        Self {
            func: Arc::new(func),
            _output: PhantomData,
        }
    }
}

#[async_trait]
impl<F, T> Upstream for BlockingUpstream<F, T>
where
    F: Fn(&NormalizedRequest) -> Result<T> + Send + Sync + 'static,
    T: Payload,
{
    type Output = T;

    async fn call(&self, request: NormalizedRequest) -> Result<T> {
        let func = Arc::clone(&self.func);
        tokio::task::spawn_blocking(move || func(&request))
            .await
            .map_err(|e| anyhow::anyhow!("Blocking upstream task failed: {e}"))?
    }
}
