//! Per-run snapshot cache
//!
//! A [`SnapshotCache`] lives for exactly one dump run. Producers consult it
//! for every output row, so it resolves each distinct key at most once:
//!
//! - historical workflows and workflow contents, by `(id, version)`
//! - subjects, retirement statuses and classification→subject links, seeded
//!   in bulk through the `reset_*` methods
//! - anonymization tokens for raw sensitive values
//!
//! The cache is owned by the run and handed out by `&mut` reference; it is
//! never shared between runs and needs no locking.
//!
//! # Example
//!
//! ```rust,no_run
//! use dumpkit::adapters::MemoryCatalog;
//! use dumpkit::core::cache::SnapshotCache;
//! use dumpkit::domain::{Workflow, WorkflowId};
//! use std::sync::Arc;
//!
//! # async fn example(catalog: Arc<MemoryCatalog>) -> dumpkit::domain::Result<()> {
//! let mut cache = SnapshotCache::new(catalog.clone(), catalog);
//! let workflow = cache.resolve_versioned::<Workflow>(WorkflowId::new(3), 2).await?;
//! let token = cache.tokenize("203.0.113.9");
//! # Ok(())
//! # }
//! ```

pub mod tokens;
pub mod versioned;

use crate::adapters::traits::{SharedWorkflowContentStore, SharedWorkflowStore};
use crate::domain::{
    ClassificationId, Result, Subject, SubjectId, SubjectWorkflowStatus, Workflow,
    WorkflowContent, WorkflowContentId, WorkflowId,
};
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

pub use tokens::TokenVault;
pub use versioned::VersionedLayer;

/// A record kind the cache can reconstruct at a past version
pub trait VersionedKind: Sized + Send + Sync + 'static {
    type Id: Copy + Eq + Hash + fmt::Display + Send + Sync + 'static;

    /// The cache layer holding this kind
    fn layer(cache: &mut SnapshotCache) -> &mut VersionedLayer<Self, Self::Id>;
}

impl VersionedKind for Workflow {
    type Id = WorkflowId;

    fn layer(cache: &mut SnapshotCache) -> &mut VersionedLayer<Self, Self::Id> {
        &mut cache.workflows
    }
}

impl VersionedKind for WorkflowContent {
    type Id = WorkflowContentId;

    fn layer(cache: &mut SnapshotCache) -> &mut VersionedLayer<Self, Self::Id> {
        &mut cache.workflow_contents
    }
}

/// Counters reported when a run finishes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub version_hits: usize,
    pub version_misses: usize,
    pub subjects: usize,
    pub tokens_issued: usize,
}

/// Memoizing lookup layer scoped to one dump run
pub struct SnapshotCache {
    workflows: VersionedLayer<Workflow, WorkflowId>,
    workflow_contents: VersionedLayer<WorkflowContent, WorkflowContentId>,
    subjects: HashMap<SubjectId, Subject>,
    subject_workflow_statuses: HashMap<SubjectId, Vec<SubjectWorkflowStatus>>,
    classification_subjects: HashMap<ClassificationId, Vec<SubjectId>>,
    tokens: TokenVault,
}

impl SnapshotCache {
    pub fn new(workflows: SharedWorkflowStore, workflow_contents: SharedWorkflowContentStore) -> Self {
        Self {
            workflows: VersionedLayer::new(workflows),
            workflow_contents: VersionedLayer::new(workflow_contents),
            subjects: HashMap::new(),
            subject_workflow_statuses: HashMap::new(),
            classification_subjects: HashMap::new(),
            tokens: TokenVault::new(),
        }
    }

    /// Record of kind `T` as of `version`, falling back to its live state
    /// when that version was never recorded
    pub async fn resolve_versioned<T: VersionedKind>(
        &mut self,
        id: T::Id,
        version: u32,
    ) -> Result<Arc<T>> {
        T::layer(self).resolve(id, version).await
    }

    pub async fn workflow_at_version(
        &mut self,
        id: WorkflowId,
        version: u32,
    ) -> Result<Arc<Workflow>> {
        self.resolve_versioned::<Workflow>(id, version).await
    }

    pub async fn workflow_content_at_version(
        &mut self,
        id: WorkflowContentId,
        version: u32,
    ) -> Result<Arc<WorkflowContent>> {
        self.resolve_versioned::<WorkflowContent>(id, version).await
    }

    /// Replace the subject key space
    pub fn reset_subjects(&mut self, subjects: impl IntoIterator<Item = Subject>) {
        self.subjects = subjects.into_iter().map(|s| (s.id, s)).collect();
    }

    /// Replace the retirement status key space, grouping by subject
    pub fn reset_subject_workflow_statuses(
        &mut self,
        statuses: impl IntoIterator<Item = SubjectWorkflowStatus>,
    ) {
        let mut grouped: HashMap<SubjectId, Vec<SubjectWorkflowStatus>> = HashMap::new();
        for status in statuses {
            grouped.entry(status.subject_id).or_default().push(status);
        }
        self.subject_workflow_statuses = grouped;
    }

    /// Replace the classification→subjects key space from
    /// `(classification, subject)` pairs
    pub fn reset_classification_subjects(
        &mut self,
        pairs: impl IntoIterator<Item = (ClassificationId, SubjectId)>,
    ) {
        let mut grouped: HashMap<ClassificationId, Vec<SubjectId>> = HashMap::new();
        for (classification, subject) in pairs {
            grouped.entry(classification).or_default().push(subject);
        }
        self.classification_subjects = grouped;
    }

    pub fn lookup_subject(&self, id: SubjectId) -> Option<&Subject> {
        self.subjects.get(&id)
    }

    /// Statuses of a subject across workflows; empty when unknown
    pub fn lookup_retirement_statuses(&self, subject: SubjectId) -> &[SubjectWorkflowStatus] {
        self.subject_workflow_statuses
            .get(&subject)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Subjects linked to a classification; empty when unknown
    pub fn lookup_subject_ids_for_classification(
        &self,
        classification: ClassificationId,
    ) -> &[SubjectId] {
        self.classification_subjects
            .get(&classification)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Status record of a subject in one workflow
    pub fn workflow_status(
        &self,
        subject: SubjectId,
        workflow: WorkflowId,
    ) -> Option<&SubjectWorkflowStatus> {
        self.lookup_retirement_statuses(subject)
            .iter()
            .find(|status| status.workflow_id == workflow)
    }

    /// Whether a subject has been retired from a workflow
    pub fn is_retired(&self, subject: SubjectId, workflow: WorkflowId) -> bool {
        self.workflow_status(subject, workflow)
            .is_some_and(SubjectWorkflowStatus::is_retired)
    }

    /// Run-scoped opaque token for a raw sensitive value
    pub fn tokenize(&mut self, raw: &str) -> String {
        self.tokens.tokenize(raw)
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            version_hits: self.workflows.hits() + self.workflow_contents.hits(),
            version_misses: self.workflows.misses() + self.workflow_contents.misses(),
            subjects: self.subjects.len(),
            tokens_issued: self.tokens.len(),
        }
    }
}
