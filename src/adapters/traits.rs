//! Capability traits for the systems a dump run talks to
//!
//! The pipeline never reaches a database or blob store directly. Each
//! collaborator is expressed as a trait so that runs can be driven against
//! the system of record in production and against in-memory stores in tests.

use crate::domain::{
    Classification, ClassificationId, Medium, MediumAttributes, MediumId, Project, ProjectId,
    Result, Subject, SubjectId, SubjectWorkflowStatus, Workflow, WorkflowContent,
    WorkflowContentId, WorkflowId,
};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

/// Read access to dump targets
#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// Load a project by id
    ///
    /// Returns `Ok(None)` when the project does not exist.
    async fn find_project(&self, id: ProjectId) -> Result<Option<Project>>;
}

/// Read access to a versioned record kind and its change history
#[async_trait]
pub trait VersionedStore<T>: Send + Sync {
    /// Identifier type of the record kind
    type Id: Copy + Send + Sync + 'static;

    /// Load the live record
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::DumpError::RecordNotFound`] if the record does
    /// not exist.
    async fn find(&self, id: Self::Id) -> Result<T>;

    /// Reconstruct the record as of `version`
    ///
    /// Returns `Ok(None)` when no state was recorded for that version.
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::DumpError::VersionReconstruction`] if the
    /// history could not be read.
    async fn version(&self, id: Self::Id, version: u32) -> Result<Option<T>>;
}

/// Shared handle to the workflow history store
pub type SharedWorkflowStore = Arc<dyn VersionedStore<Workflow, Id = WorkflowId>>;

/// Shared handle to the workflow content history store
pub type SharedWorkflowContentStore =
    Arc<dyn VersionedStore<WorkflowContent, Id = WorkflowContentId>>;

/// Persistence of artifact records
#[async_trait]
pub trait MediumStore: Send + Sync {
    /// Load a medium by id
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::DumpError::RecordNotFound`] if it does not exist.
    async fn find(&self, id: MediumId) -> Result<Medium>;

    /// Create and persist a new medium in the `creating` state
    async fn create(&self, attributes: MediumAttributes) -> Result<Medium>;

    /// Persist all fields of an existing medium
    async fn save(&self, medium: &Medium) -> Result<()>;

    /// All known media, ordered by id
    async fn list(&self) -> Result<Vec<Medium>>;
}

/// Options for [`ArtifactStore::put_file`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PutOptions {
    /// The payload is gzip-compressed
    pub compressed: bool,
}

/// Durable blob storage for published artifacts
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Store the local file under `logical_path`
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::DumpError::Publish`] if the upload is rejected
    /// or storage is unreachable. No partial-upload resume is attempted.
    async fn put_file(&self, logical_path: &str, local_file: &Path, options: PutOptions)
        -> Result<()>;
}

/// Bulk feeds a producer uses to seed the per-run cache
///
/// Selecting which rows belong in an export is the feed's concern; the
/// pipeline only consumes the collections it returns.
#[async_trait]
pub trait ExportFeed: Send + Sync {
    async fn classifications(&self, project: ProjectId) -> Result<Vec<Classification>>;

    async fn subjects(&self, project: ProjectId) -> Result<Vec<Subject>>;

    async fn subject_workflow_statuses(
        &self,
        project: ProjectId,
    ) -> Result<Vec<SubjectWorkflowStatus>>;

    /// `(classification id, subject id)` pairs, one per classified subject
    async fn classification_subjects(
        &self,
        project: ProjectId,
    ) -> Result<Vec<(ClassificationId, SubjectId)>>;
}
