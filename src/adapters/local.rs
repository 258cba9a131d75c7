//! Filesystem-backed adapters used by the command-line tool
//!
//! [`LocalArtifactStore`] publishes artifacts by copying them below a storage
//! root. [`JsonMediumStore`] keeps artifact records in a single JSON document
//! that is rewritten after every change.

use super::traits::{ArtifactStore, MediumStore, PutOptions};
use crate::domain::{DumpError, Medium, MediumAttributes, MediumId, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};
use tokio::sync::Mutex;

/// Suffix appended to compressed artifacts
const COMPRESSED_SUFFIX: &str = ".gz";

/// Artifact store writing into a local directory
#[derive(Debug, Clone)]
pub struct LocalArtifactStore {
    root: PathBuf,
}

impl LocalArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Where an artifact with this logical path ends up on disk
    pub fn resolve(&self, logical_path: &str, options: PutOptions) -> PathBuf {
        let mut name = logical_path.to_string();
        if options.compressed {
            name.push_str(COMPRESSED_SUFFIX);
        }
        self.root.join(name)
    }
}

#[async_trait]
impl ArtifactStore for LocalArtifactStore {
    async fn put_file(
        &self,
        logical_path: &str,
        local_file: &Path,
        options: PutOptions,
    ) -> Result<()> {
        let escapes = Path::new(logical_path).components().any(|c| {
            matches!(
                c,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        });
        if logical_path.is_empty() || escapes {
            return Err(DumpError::Publish(format!(
                "refusing to store artifact at '{logical_path}'"
            )));
        }

        tokio::fs::create_dir_all(&self.root).await.map_err(|e| {
            DumpError::Publish(format!(
                "storage root {} unavailable: {}",
                self.root.display(),
                e
            ))
        })?;

        let target = self.resolve(logical_path, options);
        let staging = target.with_extension("partial");
        tokio::fs::copy(local_file, &staging)
            .await
            .map_err(|e| DumpError::Publish(format!("upload to {} failed: {}", target.display(), e)))?;
        tokio::fs::rename(&staging, &target)
            .await
            .map_err(|e| DumpError::Publish(format!("upload to {} failed: {}", target.display(), e)))?;

        tracing::debug!(
            logical_path = %logical_path,
            target = %target.display(),
            compressed = options.compressed,
            "Stored artifact"
        );
        Ok(())
    }
}

/// Medium store persisted to a JSON file
#[derive(Debug)]
pub struct JsonMediumStore {
    path: PathBuf,
    media: Mutex<BTreeMap<MediumId, Medium>>,
}

impl JsonMediumStore {
    /// Open the store, reading existing media if the file exists
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let media = match tokio::fs::read_to_string(&path).await {
            Ok(contents) if contents.trim().is_empty() => BTreeMap::new(),
            Ok(contents) => {
                let list: Vec<Medium> = serde_json::from_str(&contents)?;
                list.into_iter().map(|m| (m.id, m)).collect()
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(DumpError::Storage(format!(
                    "Failed to read media file {}: {}",
                    path.display(),
                    e
                )))
            }
        };
        Ok(Self {
            path,
            media: Mutex::new(media),
        })
    }

    async fn persist(&self, media: &BTreeMap<MediumId, Medium>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let list: Vec<&Medium> = media.values().collect();
        let json = serde_json::to_string_pretty(&list)?;
        tokio::fs::write(&self.path, json).await.map_err(|e| {
            DumpError::Storage(format!(
                "Failed to write media file {}: {}",
                self.path.display(),
                e
            ))
        })
    }
}

#[async_trait]
impl MediumStore for JsonMediumStore {
    async fn find(&self, id: MediumId) -> Result<Medium> {
        self.media
            .lock()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| DumpError::not_found(MediumId::kind(), id.get()))
    }

    async fn create(&self, attributes: MediumAttributes) -> Result<Medium> {
        let mut media = self.media.lock().await;
        let next = media.keys().next_back().map_or(1, |id| id.get() + 1);
        let medium = Medium::new(MediumId::new(next), attributes);
        media.insert(medium.id, medium.clone());
        self.persist(&media).await?;
        Ok(medium)
    }

    async fn save(&self, medium: &Medium) -> Result<()> {
        let mut media = self.media.lock().await;
        if !media.contains_key(&medium.id) {
            return Err(DumpError::not_found(MediumId::kind(), medium.id.get()));
        }
        media.insert(medium.id, medium.clone());
        self.persist(&media).await
    }

    async fn list(&self) -> Result<Vec<Medium>> {
        Ok(self.media.lock().await.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LinkedResource, ProjectId, CSV_CONTENT_TYPE};
    use tempfile::TempDir;

    fn attributes() -> MediumAttributes {
        MediumAttributes {
            medium_type: "project_subjects_export".to_string(),
            content_type: CSV_CONTENT_TYPE.to_string(),
            path_opts: vec!["project_subjects_export".to_string(), "owner".to_string()],
            private: true,
            linked: LinkedResource::project(ProjectId::new(4)),
        }
    }

    #[tokio::test]
    async fn test_local_store_copies_payload() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("source.gz");
        std::fs::write(&source, b"payload").unwrap();

        let store = LocalArtifactStore::new(dir.path().join("dumps"));
        store
            .put_file("project_x", &source, PutOptions { compressed: true })
            .await
            .unwrap();

        let stored = dir.path().join("dumps").join("project_x.gz");
        assert_eq!(std::fs::read(stored).unwrap(), b"payload");
    }

    #[tokio::test]
    async fn test_local_store_rejects_escaping_paths() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("source.gz");
        std::fs::write(&source, b"payload").unwrap();

        let store = LocalArtifactStore::new(dir.path());
        let result = store
            .put_file("../outside", &source, PutOptions::default())
            .await;
        assert!(matches!(result, Err(DumpError::Publish(_))));
    }

    #[tokio::test]
    async fn test_local_store_rejects_absolute_paths() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("source.gz");
        std::fs::write(&source, b"payload").unwrap();

        let store = LocalArtifactStore::new(dir.path().join("dumps"));
        let result = store
            .put_file("/etc/outside", &source, PutOptions::default())
            .await;
        assert!(matches!(result, Err(DumpError::Publish(_))));
    }

    #[tokio::test]
    async fn test_local_store_accepts_dots_inside_a_name() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("source.gz");
        std::fs::write(&source, b"payload").unwrap();

        let store = LocalArtifactStore::new(dir.path().join("dumps"));
        store
            .put_file(
                "project_subjects_export_sci_org_stars...",
                &source,
                PutOptions { compressed: true },
            )
            .await
            .unwrap();

        let stored = dir
            .path()
            .join("dumps")
            .join("project_subjects_export_sci_org_stars....gz");
        assert_eq!(std::fs::read(stored).unwrap(), b"payload");
    }

    #[tokio::test]
    async fn test_local_store_missing_source_is_publish_error() {
        let dir = TempDir::new().unwrap();
        let store = LocalArtifactStore::new(dir.path());
        let result = store
            .put_file("x", &dir.path().join("absent.gz"), PutOptions::default())
            .await;
        assert!(matches!(result, Err(DumpError::Publish(_))));
    }

    #[tokio::test]
    async fn test_json_store_persists_across_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("media.json");

        let store = JsonMediumStore::open(&path).await.unwrap();
        let mut medium = store.create(attributes()).await.unwrap();
        assert_eq!(medium.id, MediumId::new(1));
        medium.mark_ready().unwrap();
        store.save(&medium).await.unwrap();

        let reopened = JsonMediumStore::open(&path).await.unwrap();
        let loaded = reopened.find(MediumId::new(1)).await.unwrap();
        assert!(loaded.is_ready());

        let second = reopened.create(attributes()).await.unwrap();
        assert_eq!(second.id, MediumId::new(2));
        assert_eq!(reopened.list().await.unwrap().len(), 2);
    }
}
