// Path: crates/api/src/persist/mod.rs

//! Defines the `CacheSink` persistence callback.

use crate::error::IdentityError;
use async_trait::async_trait;
use idkeys_types::app::CacheSnapshot;
use std::sync::Arc;

/// Receives the full cache state after every mutation.
///
/// Failures are not swallowed: they propagate to the caller of the query that
/// mutated the cache.
#[async_trait]
pub trait CacheSink: Send + Sync {
    /// Persists `snapshot`.
    async fn save(&self, snapshot: &CacheSnapshot) -> Result<(), IdentityError>;
}

#[async_trait]
impl<T: CacheSink + ?Sized> CacheSink for Arc<T> {
    async fn save(&self, snapshot: &CacheSnapshot) -> Result<(), IdentityError> {
        (**self).save(snapshot).await
    }
}

/// A sink that discards every snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

#[async_trait]
impl CacheSink for NoopSink {
    async fn save(&self, _snapshot: &CacheSnapshot) -> Result<(), IdentityError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_noop_sink_accepts_anything() {
        let sink: Arc<dyn CacheSink> = Arc::new(NoopSink);
        assert!(sink.save(&CacheSnapshot::default()).await.is_ok());
    }
}
