//! Merge-output caching.
//!
//! The merge is deterministic, so its output can be persisted as an opaque
//! serialized blob and reused until the source extracts change. Validity is
//! purely time-based here (24 hours by default); the core itself stays
//! cache-free and the orchestration layer owns this object explicitly.

use crate::error::{JournalScopeError, Result};
use crate::model::UnifiedJournal;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Default cache file path: `~/.journalscope_cache.json`
fn default_cache_path() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|p| p.join(".journalscope_cache.json"))
        .ok_or_else(|| JournalScopeError::Config("Cannot determine home directory".to_string()))
}

/// Default validity window for cached merge output
pub const DEFAULT_MAX_AGE_HOURS: i64 = 24;

/// Serialized cache payload with its save timestamp
#[derive(Debug, Serialize, Deserialize)]
struct CacheEnvelope {
    saved_at: DateTime<Utc>,
    journals: Vec<UnifiedJournal>,
}

/// Cache manager for loading and saving merged journal records
pub struct CacheManager {
    path: PathBuf,
}

impl CacheManager {
    /// Create a new CacheManager with default path
    pub fn new() -> Result<Self> {
        Ok(Self {
            path: default_cache_path()?,
        })
    }

    /// Create a new CacheManager with custom path
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Get the cache file path
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Load cached records no older than `max_age`.
    ///
    /// Returns None if the file is missing, unreadable, unparseable or stale -
    /// the caller then rebuilds from the source extracts.
    pub fn load(&self, max_age: Duration) -> Option<Vec<UnifiedJournal>> {
        if !self.path.exists() {
            debug!("Cache file not found: {:?}", self.path);
            return None;
        }

        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Failed to read cache file: {}", e);
                return None;
            }
        };

        let envelope: CacheEnvelope = match serde_json::from_str(&content) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!("Failed to parse cache: {}", e);
                return None;
            }
        };

        let age = Utc::now() - envelope.saved_at;
        if age > max_age {
            info!(
                saved_at = %envelope.saved_at,
                "Cache expired, rebuilding from sources"
            );
            return None;
        }

        info!(
            count = envelope.journals.len(),
            saved_at = %envelope.saved_at,
            "Loaded journals from cache"
        );
        Some(envelope.journals)
    }

    /// Save merged records to the cache file
    pub fn save(&self, journals: &[UnifiedJournal]) -> Result<()> {
        let envelope = CacheEnvelope {
            saved_at: Utc::now(),
            journals: journals.to_vec(),
        };
        let content = serde_json::to_string(&envelope)?;
        std::fs::write(&self.path, content)?;
        info!("Saved {} journals to {:?}", journals.len(), self.path);
        Ok(())
    }

    /// Clear the cached merge output
    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
            info!("Cleared cache at {:?}", self.path);
        }
        Ok(())
    }
}

impl Default for CacheManager {
    fn default() -> Self {
        Self::new().unwrap_or_else(|_| Self {
            path: PathBuf::from(".journalscope_cache.json"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UnifiedJournal;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_missing_file() {
        let manager = CacheManager::with_path(PathBuf::from("/nonexistent/path"));
        assert!(manager.load(Duration::hours(24)).is_none());
    }

    #[test]
    fn test_save_and_load() -> Result<()> {
        let temp = NamedTempFile::new()?;
        let manager = CacheManager::with_path(temp.path().to_path_buf());

        let journals = vec![UnifiedJournal::new(
            "journal of finance".into(),
            "Journal OF Finance".into(),
        )];

        manager.save(&journals)?;
        let loaded = manager.load(Duration::hours(24)).expect("fresh cache");
        assert_eq!(loaded, journals);
        Ok(())
    }

    #[test]
    fn test_stale_cache_rejected() -> Result<()> {
        let temp = NamedTempFile::new()?;
        let manager = CacheManager::with_path(temp.path().to_path_buf());
        manager.save(&[])?;

        // A zero-length validity window makes anything saved stale
        assert!(manager.load(Duration::seconds(-1)).is_none());
        Ok(())
    }

    #[test]
    fn test_clear() -> Result<()> {
        let temp = NamedTempFile::new()?;
        let manager = CacheManager::with_path(temp.path().to_path_buf());
        manager.save(&[])?;
        manager.clear()?;
        assert!(manager.load(Duration::hours(24)).is_none());
        Ok(())
    }
}
