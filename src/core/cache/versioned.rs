//! Memoized point-in-time lookups for one versioned record kind

use crate::adapters::traits::VersionedStore;
use crate::domain::{DumpError, Result};
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

/// Read-through cache over a [`VersionedStore`]
///
/// Each `(id, version)` pair is resolved against the store at most once, and
/// the live record of each id is loaded at most once no matter how many
/// versions fall back to it.
pub struct VersionedLayer<T, I> {
    store: Arc<dyn VersionedStore<T, Id = I>>,
    live: HashMap<I, Arc<T>>,
    resolved: HashMap<(I, u32), Arc<T>>,
    hits: usize,
    misses: usize,
}

impl<T, I> VersionedLayer<T, I>
where
    T: Send + Sync + 'static,
    I: Copy + Eq + Hash + fmt::Display + Send + Sync + 'static,
{
    pub fn new(store: Arc<dyn VersionedStore<T, Id = I>>) -> Self {
        Self {
            store,
            live: HashMap::new(),
            resolved: HashMap::new(),
            hits: 0,
            misses: 0,
        }
    }

    /// The record as it stood at `version`, or its live state when that
    /// version was never recorded
    ///
    /// # Errors
    ///
    /// Fails only when the live record itself cannot be loaded. A broken
    /// change log is treated like a missing version.
    pub async fn resolve(&mut self, id: I, version: u32) -> Result<Arc<T>> {
        if let Some(hit) = self.resolved.get(&(id, version)) {
            self.hits += 1;
            return Ok(Arc::clone(hit));
        }
        self.misses += 1;

        let past = self.store.version(id, version).await;
        let value = match past {
            Ok(Some(past)) => Arc::new(past),
            Ok(None) => self.live(id).await?,
            Err(DumpError::VersionReconstruction(reason)) => {
                tracing::warn!(
                    id = %id,
                    version,
                    reason = %reason,
                    "Version reconstruction failed, using live record"
                );
                self.live(id).await?
            }
            Err(e) => return Err(e),
        };

        self.resolved.insert((id, version), Arc::clone(&value));
        Ok(value)
    }

    async fn live(&mut self, id: I) -> Result<Arc<T>> {
        if let Some(record) = self.live.get(&id) {
            return Ok(Arc::clone(record));
        }
        let record = Arc::new(self.store.find(id).await?);
        self.live.insert(id, Arc::clone(&record));
        Ok(record)
    }

    /// Lookups served from memory
    pub fn hits(&self) -> usize {
        self.hits
    }

    /// Lookups that went to the store
    pub fn misses(&self) -> usize {
        self.misses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    /// Store of string records keyed by u32; version 1 of id 2 is corrupt
    struct Notes;

    #[async_trait]
    impl VersionedStore<String> for Notes {
        type Id = u32;

        async fn find(&self, id: u32) -> Result<String> {
            match id {
                9 => Err(DumpError::Storage("connection reset".to_string())),
                _ => Ok(format!("note {id} live")),
            }
        }

        async fn version(&self, id: u32, version: u32) -> Result<Option<String>> {
            match (id, version) {
                (2, 1) => Err(DumpError::VersionReconstruction("bad diff".to_string())),
                (9, _) => Err(DumpError::Storage("connection reset".to_string())),
                (_, 1) => Ok(Some(format!("note {id} v1"))),
                _ => Ok(None),
            }
        }
    }

    fn layer() -> VersionedLayer<String, u32> {
        VersionedLayer::new(Arc::new(Notes))
    }

    #[tokio::test]
    async fn test_resolve_recorded_and_unrecorded_versions() {
        let mut layer = layer();
        assert_eq!(*layer.resolve(1, 1).await.unwrap(), "note 1 v1");
        assert_eq!(*layer.resolve(1, 3).await.unwrap(), "note 1 live");
        assert_eq!(*layer.resolve(1, 3).await.unwrap(), "note 1 live");
        assert_eq!(layer.misses(), 2);
        assert_eq!(layer.hits(), 1);
    }

    #[tokio::test]
    async fn test_reconstruction_error_falls_back() {
        let mut layer = layer();
        assert_eq!(*layer.resolve(2, 1).await.unwrap(), "note 2 live");
    }

    #[tokio::test]
    async fn test_other_errors_propagate() {
        let mut layer = layer();
        let err = layer.resolve(9, 1).await.unwrap_err();
        assert!(matches!(err, DumpError::Storage(_)));

        // failures are not memoized
        assert!(layer.resolve(9, 1).await.is_err());
        assert_eq!(layer.misses(), 2);
    }
}
