//! Collaborator doubles for the persistence callback.

use async_trait::async_trait;
use idkeys_api::persist::CacheSink;
use idkeys_types::app::CacheSnapshot;
use idkeys_types::error::IdentityError;
use std::sync::Mutex;

/// Records every snapshot it is asked to save.
#[derive(Debug, Default)]
pub struct RecordingSink {
    saved: Mutex<Vec<CacheSnapshot>>,
}

impl RecordingSink {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `save` calls so far.
    pub fn save_count(&self) -> usize {
        self.saved.lock().map(|s| s.len()).unwrap_or(0)
    }

    /// The most recently saved snapshot.
    pub fn last(&self) -> Option<CacheSnapshot> {
        self.saved.lock().ok().and_then(|s| s.last().cloned())
    }
}

#[async_trait]
impl CacheSink for RecordingSink {
    async fn save(&self, snapshot: &CacheSnapshot) -> Result<(), IdentityError> {
        self.saved
            .lock()
            .map_err(|e| IdentityError::Persistence(e.to_string()))?
            .push(snapshot.clone());
        Ok(())
    }
}

/// A sink whose every `save` fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingSink;

#[async_trait]
impl CacheSink for FailingSink {
    async fn save(&self, _snapshot: &CacheSnapshot) -> Result<(), IdentityError> {
        Err(IdentityError::Persistence("disk full".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_recording_sink_keeps_order() {
        let sink = RecordingSink::new();
        assert_eq!(sink.save_count(), 0);
        assert!(sink.last().is_none());

        let mut snapshot = CacheSnapshot::default();
        sink.save(&snapshot).await.unwrap();
        snapshot.names.insert("c".into(), vec!["00".into()]);
        sink.save(&snapshot).await.unwrap();

        assert_eq!(sink.save_count(), 2);
        assert_eq!(sink.last(), Some(snapshot));
    }

    #[tokio::test]
    async fn test_failing_sink_reports_persistence_error() {
        let err = FailingSink.save(&CacheSnapshot::default()).await.unwrap_err();
        assert!(matches!(err, IdentityError::Persistence(_)));
    }
}
