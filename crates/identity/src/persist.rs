// Path: crates/identity/src/persist.rs
//! Cache persistence: a JSON file sink and the matching loader.

use async_trait::async_trait;
pub use idkeys_api::persist::{CacheSink, NoopSink};
use idkeys_api::error::IdentityError;
use idkeys_types::app::CacheSnapshot;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Writes the full cache snapshot to a JSON file after every mutation.
///
/// The snapshot is written to a sibling temporary file and renamed over the
/// target, so readers never observe a partially written cache.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    /// A sink writing to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The target file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "cache.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn write(&self, snapshot: &CacheSnapshot) -> Result<(), IdentityError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp_path = self.tmp_path();
        let mut tmp_file = fs::File::create(&tmp_path)?;
        serde_json::to_writer_pretty(&mut tmp_file, snapshot)?;
        tmp_file.flush()?;
        tmp_file.sync_data()?;

        fs::rename(&tmp_path, &self.path)?;
        tracing::debug!(
            target: "identity::persist",
            path = %self.path.display(),
            identities = snapshot.keys.len(),
            "cache snapshot written"
        );
        Ok(())
    }
}

#[async_trait]
impl CacheSink for JsonFileSink {
    async fn save(&self, snapshot: &CacheSnapshot) -> Result<(), IdentityError> {
        self.write(snapshot)
    }
}

/// Reads a snapshot written by [`JsonFileSink`]. A missing file yields `None`.
pub fn load_snapshot(path: impl AsRef<Path>) -> Result<Option<CacheSnapshot>, IdentityError> {
    let path = path.as_ref();
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    serde_json::from_str(&text)
        .map(Some)
        .map_err(|e| IdentityError::InvalidCache(format!("{}: {}", path.display(), e)))
}
