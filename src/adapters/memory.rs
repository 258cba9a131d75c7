//! In-memory adapters
//!
//! [`MemoryCatalog`] serves projects, versioned records and bulk feeds from a
//! [`CatalogData`] snapshot (usually loaded from a JSON fixture). It counts
//! every lookup so callers can check how often the system of record would
//! have been hit. [`MemoryMediumStore`] and [`MemoryArtifactStore`] keep
//! artifact records and uploaded payloads in process.

use super::traits::{ArtifactStore, ExportFeed, MediumStore, ProjectStore, PutOptions, VersionedStore};
use crate::domain::{
    Classification, ClassificationId, DumpError, Medium, MediumAttributes, MediumId, Project,
    ProjectId, Result, Subject, SubjectId, SubjectWorkflowStatus, VersionHistory, Workflow,
    WorkflowContent, WorkflowContentId, WorkflowId,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use tokio::sync::Mutex;

/// A live record together with its change log
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Versioned<T> {
    pub record: T,

    #[serde(default)]
    pub history: VersionHistory<T>,
}

/// Serializable contents of a [`MemoryCatalog`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogData {
    #[serde(default)]
    pub projects: Vec<Project>,

    #[serde(default)]
    pub workflows: Vec<Versioned<Workflow>>,

    #[serde(default)]
    pub workflow_contents: Vec<Versioned<WorkflowContent>>,

    #[serde(default)]
    pub subjects: Vec<Subject>,

    #[serde(default)]
    pub subject_workflow_statuses: Vec<SubjectWorkflowStatus>,

    #[serde(default)]
    pub classifications: Vec<Classification>,

    /// `[classification_id, subject_id]` pairs
    #[serde(default)]
    pub classification_subjects: Vec<(ClassificationId, SubjectId)>,
}

/// Lookup counters of a [`MemoryCatalog`]
#[derive(Debug, Default)]
pub struct FetchCounters {
    project_finds: AtomicUsize,
    workflow_finds: AtomicUsize,
    workflow_version_reads: AtomicUsize,
    content_finds: AtomicUsize,
    content_version_reads: AtomicUsize,
    feed_reads: AtomicUsize,
}

impl FetchCounters {
    pub fn project_finds(&self) -> usize {
        self.project_finds.load(Ordering::SeqCst)
    }

    pub fn workflow_finds(&self) -> usize {
        self.workflow_finds.load(Ordering::SeqCst)
    }

    pub fn workflow_version_reads(&self) -> usize {
        self.workflow_version_reads.load(Ordering::SeqCst)
    }

    pub fn content_finds(&self) -> usize {
        self.content_finds.load(Ordering::SeqCst)
    }

    pub fn content_version_reads(&self) -> usize {
        self.content_version_reads.load(Ordering::SeqCst)
    }

    pub fn feed_reads(&self) -> usize {
        self.feed_reads.load(Ordering::SeqCst)
    }
}

fn bump(counter: &AtomicUsize) {
    counter.fetch_add(1, Ordering::SeqCst);
}

/// Read-only system of record held in memory
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    projects: HashMap<ProjectId, Project>,
    workflows: HashMap<WorkflowId, Versioned<Workflow>>,
    workflow_contents: HashMap<WorkflowContentId, Versioned<WorkflowContent>>,
    subjects: Vec<Subject>,
    statuses: Vec<SubjectWorkflowStatus>,
    classifications: Vec<Classification>,
    classification_subjects: Vec<(ClassificationId, SubjectId)>,
    fail_version_reads: AtomicBool,
    counters: FetchCounters,
}

impl MemoryCatalog {
    pub fn new(data: CatalogData) -> Self {
        Self {
            projects: data.projects.into_iter().map(|p| (p.id, p)).collect(),
            workflows: data
                .workflows
                .into_iter()
                .map(|w| (w.record.id, w))
                .collect(),
            workflow_contents: data
                .workflow_contents
                .into_iter()
                .map(|c| (c.record.id, c))
                .collect(),
            subjects: data.subjects,
            statuses: data.subject_workflow_statuses,
            classifications: data.classifications,
            classification_subjects: data.classification_subjects,
            fail_version_reads: AtomicBool::new(false),
            counters: FetchCounters::default(),
        }
    }

    /// Load a catalog from a JSON fixture
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            DumpError::Configuration(format!(
                "Failed to read catalog {}: {}",
                path.display(),
                e
            ))
        })?;
        let data: CatalogData = serde_json::from_str(&contents)?;
        Ok(Self::new(data))
    }

    pub fn counters(&self) -> &FetchCounters {
        &self.counters
    }

    /// Make every history read fail, simulating a broken change log
    pub fn set_fail_version_reads(&self, fail: bool) {
        self.fail_version_reads.store(fail, Ordering::SeqCst);
    }

    fn check_history_available(&self) -> Result<()> {
        if self.fail_version_reads.load(Ordering::SeqCst) {
            return Err(DumpError::VersionReconstruction(
                "change log unavailable".to_string(),
            ));
        }
        Ok(())
    }

    fn project_rows<'a, T>(
        rows: &'a [T],
        project: ProjectId,
        project_of: impl Fn(&T) -> ProjectId + 'a,
    ) -> impl Iterator<Item = &'a T> + 'a {
        rows.iter().filter(move |row| project_of(row) == project)
    }
}

#[async_trait]
impl ProjectStore for MemoryCatalog {
    async fn find_project(&self, id: ProjectId) -> Result<Option<Project>> {
        bump(&self.counters.project_finds);
        Ok(self.projects.get(&id).cloned())
    }
}

#[async_trait]
impl VersionedStore<Workflow> for MemoryCatalog {
    type Id = WorkflowId;

    async fn find(&self, id: WorkflowId) -> Result<Workflow> {
        bump(&self.counters.workflow_finds);
        self.workflows
            .get(&id)
            .map(|w| w.record.clone())
            .ok_or_else(|| DumpError::not_found(WorkflowId::kind(), id.get()))
    }

    async fn version(&self, id: WorkflowId, version: u32) -> Result<Option<Workflow>> {
        bump(&self.counters.workflow_version_reads);
        self.check_history_available()?;
        Ok(self
            .workflows
            .get(&id)
            .and_then(|w| w.history.reify(version)))
    }
}

#[async_trait]
impl VersionedStore<WorkflowContent> for MemoryCatalog {
    type Id = WorkflowContentId;

    async fn find(&self, id: WorkflowContentId) -> Result<WorkflowContent> {
        bump(&self.counters.content_finds);
        self.workflow_contents
            .get(&id)
            .map(|c| c.record.clone())
            .ok_or_else(|| DumpError::not_found(WorkflowContentId::kind(), id.get()))
    }

    async fn version(
        &self,
        id: WorkflowContentId,
        version: u32,
    ) -> Result<Option<WorkflowContent>> {
        bump(&self.counters.content_version_reads);
        self.check_history_available()?;
        Ok(self
            .workflow_contents
            .get(&id)
            .and_then(|c| c.history.reify(version)))
    }
}

#[async_trait]
impl ExportFeed for MemoryCatalog {
    async fn classifications(&self, project: ProjectId) -> Result<Vec<Classification>> {
        bump(&self.counters.feed_reads);
        Ok(Self::project_rows(&self.classifications, project, |c| c.project_id)
            .cloned()
            .collect())
    }

    async fn subjects(&self, project: ProjectId) -> Result<Vec<Subject>> {
        bump(&self.counters.feed_reads);
        Ok(Self::project_rows(&self.subjects, project, |s| s.project_id)
            .cloned()
            .collect())
    }

    async fn subject_workflow_statuses(
        &self,
        project: ProjectId,
    ) -> Result<Vec<SubjectWorkflowStatus>> {
        bump(&self.counters.feed_reads);
        let project_workflows: Vec<WorkflowId> = self
            .workflows
            .values()
            .filter(|w| w.record.project_id == project)
            .map(|w| w.record.id)
            .collect();
        Ok(self
            .statuses
            .iter()
            .filter(|s| project_workflows.contains(&s.workflow_id))
            .cloned()
            .collect())
    }

    async fn classification_subjects(
        &self,
        project: ProjectId,
    ) -> Result<Vec<(ClassificationId, SubjectId)>> {
        bump(&self.counters.feed_reads);
        let project_classifications: Vec<ClassificationId> =
            Self::project_rows(&self.classifications, project, |c| c.project_id)
                .map(|c| c.id)
                .collect();
        Ok(self
            .classification_subjects
            .iter()
            .filter(|(classification, _)| project_classifications.contains(classification))
            .copied()
            .collect())
    }
}

/// Artifact records held in process
#[derive(Debug)]
pub struct MemoryMediumStore {
    media: Mutex<BTreeMap<MediumId, Medium>>,
    next_id: AtomicU64,
    saves: AtomicUsize,
}

impl Default for MemoryMediumStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryMediumStore {
    pub fn new() -> Self {
        Self {
            media: Mutex::new(BTreeMap::new()),
            next_id: AtomicU64::new(1),
            saves: AtomicUsize::new(0),
        }
    }

    /// Seed an existing medium, e.g. one left over from a previous run
    pub async fn insert(&self, medium: Medium) {
        self.next_id
            .fetch_max(medium.id.get() + 1, Ordering::SeqCst);
        self.media.lock().await.insert(medium.id, medium);
    }

    /// Number of media currently stored
    pub async fn len(&self) -> usize {
        self.media.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.media.lock().await.is_empty()
    }

    /// Number of `save` calls so far
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediumStore for MemoryMediumStore {
    async fn find(&self, id: MediumId) -> Result<Medium> {
        self.media
            .lock()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| DumpError::not_found(MediumId::kind(), id.get()))
    }

    async fn create(&self, attributes: MediumAttributes) -> Result<Medium> {
        let id = MediumId::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        let medium = Medium::new(id, attributes);
        self.media.lock().await.insert(id, medium.clone());
        Ok(medium)
    }

    async fn save(&self, medium: &Medium) -> Result<()> {
        let mut media = self.media.lock().await;
        if !media.contains_key(&medium.id) {
            return Err(DumpError::not_found(MediumId::kind(), medium.id.get()));
        }
        media.insert(medium.id, medium.clone());
        bump(&self.saves);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Medium>> {
        Ok(self.media.lock().await.values().cloned().collect())
    }
}

/// A payload accepted by [`MemoryArtifactStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredArtifact {
    pub bytes: Vec<u8>,
    pub compressed: bool,
}

/// Blob store held in process
#[derive(Debug, Default)]
pub struct MemoryArtifactStore {
    objects: Mutex<BTreeMap<String, StoredArtifact>>,
    reject_uploads: AtomicBool,
}

impl MemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every subsequent upload
    pub fn set_reject_uploads(&self, reject: bool) {
        self.reject_uploads.store(reject, Ordering::SeqCst);
    }

    pub async fn get(&self, logical_path: &str) -> Option<StoredArtifact> {
        self.objects.lock().await.get(logical_path).cloned()
    }

    pub async fn paths(&self) -> Vec<String> {
        self.objects.lock().await.keys().cloned().collect()
    }
}

#[async_trait]
impl ArtifactStore for MemoryArtifactStore {
    async fn put_file(
        &self,
        logical_path: &str,
        local_file: &Path,
        options: PutOptions,
    ) -> Result<()> {
        if self.reject_uploads.load(Ordering::SeqCst) {
            return Err(DumpError::Publish(format!(
                "upload of {logical_path} rejected"
            )));
        }
        let bytes = tokio::fs::read(local_file).await.map_err(|e| {
            DumpError::Publish(format!(
                "failed to read {}: {}",
                local_file.display(),
                e
            ))
        })?;
        self.objects.lock().await.insert(
            logical_path.to_string(),
            StoredArtifact {
                bytes,
                compressed: options.compressed,
            },
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LinkedResource, Owner, CSV_CONTENT_TYPE};
    use chrono::Utc;

    fn workflow(version: u32, name: &str) -> Workflow {
        Workflow {
            id: WorkflowId::new(5),
            project_id: ProjectId::new(1),
            display_name: name.to_string(),
            tasks: serde_json::Value::Null,
            version,
        }
    }

    fn catalog() -> MemoryCatalog {
        let mut history = VersionHistory::created(Utc::now());
        history.record_update(workflow(0, "Draft"), Utc::now());
        MemoryCatalog::new(CatalogData {
            projects: vec![Project::new(
                ProjectId::new(1),
                "Galaxy Hunt",
                Owner::new("sci_org"),
            )],
            workflows: vec![Versioned {
                record: workflow(1, "Live"),
                history,
            }],
            ..CatalogData::default()
        })
    }

    #[tokio::test]
    async fn test_find_project_counts_lookups() {
        let catalog = catalog();
        assert!(catalog.find_project(ProjectId::new(1)).await.unwrap().is_some());
        assert!(catalog.find_project(ProjectId::new(2)).await.unwrap().is_none());
        assert_eq!(catalog.counters().project_finds(), 2);
    }

    #[tokio::test]
    async fn test_workflow_versions() {
        let catalog = catalog();
        let live = VersionedStore::<Workflow>::find(&catalog, WorkflowId::new(5))
            .await
            .unwrap();
        assert_eq!(live.display_name, "Live");

        let old = VersionedStore::<Workflow>::version(&catalog, WorkflowId::new(5), 1)
            .await
            .unwrap();
        assert_eq!(old.unwrap().display_name, "Draft");

        let none = VersionedStore::<Workflow>::version(&catalog, WorkflowId::new(5), 0)
            .await
            .unwrap();
        assert!(none.is_none());

        let missing = VersionedStore::<Workflow>::find(&catalog, WorkflowId::new(6)).await;
        assert!(matches!(missing, Err(DumpError::RecordNotFound { .. })));
    }

    #[tokio::test]
    async fn test_failing_history_reads() {
        let catalog = catalog();
        catalog.set_fail_version_reads(true);
        let result = VersionedStore::<Workflow>::version(&catalog, WorkflowId::new(5), 1).await;
        assert!(matches!(result, Err(DumpError::VersionReconstruction(_))));
    }

    #[tokio::test]
    async fn test_medium_store_assigns_ids_after_seeded_media() {
        let store = MemoryMediumStore::new();
        let attributes = MediumAttributes {
            medium_type: "project_subjects_export".to_string(),
            content_type: CSV_CONTENT_TYPE.to_string(),
            path_opts: vec!["a".to_string()],
            private: true,
            linked: LinkedResource::project(ProjectId::new(1)),
        };
        store
            .insert(Medium::new(MediumId::new(10), attributes.clone()))
            .await;

        let created = store.create(attributes).await.unwrap();
        assert_eq!(created.id, MediumId::new(11));
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_save_unknown_medium_fails() {
        let store = MemoryMediumStore::new();
        let medium = Medium::new(
            MediumId::new(3),
            MediumAttributes {
                medium_type: "t".to_string(),
                content_type: CSV_CONTENT_TYPE.to_string(),
                path_opts: vec![],
                private: true,
                linked: LinkedResource::project(ProjectId::new(1)),
            },
        );
        assert!(store.save(&medium).await.is_err());
        assert_eq!(store.save_count(), 0);
    }

    #[tokio::test]
    async fn test_artifact_store_rejects_when_asked() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("payload.gz");
        std::fs::write(&file, b"abc").unwrap();

        let store = MemoryArtifactStore::new();
        store
            .put_file("one", &file, PutOptions { compressed: true })
            .await
            .unwrap();
        assert_eq!(store.get("one").await.unwrap().bytes, b"abc");

        store.set_reject_uploads(true);
        let result = store.put_file("two", &file, PutOptions::default()).await;
        assert!(matches!(result, Err(DumpError::Publish(_))));
        assert_eq!(store.paths().await, vec!["one".to_string()]);
    }
}
