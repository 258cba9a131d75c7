//! Domain models and types for dumpkit.
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`ProjectId`], [`MediumId`], [`WorkflowId`], ...)
//! - **Records** consulted by export producers ([`Workflow`], [`Subject`], [`Classification`], ...)
//! - **Change history** for versioned records ([`VersionHistory`])
//! - **The artifact record** ([`Medium`]) and its readiness state
//! - **Error types** ([`DumpError`]) and the [`Result`] alias
//!
//! # Example
//!
//! ```rust
//! use dumpkit::domain::{Medium, MediumAttributes, MediumId, MediumState, LinkedResource, ProjectId};
//!
//! let medium = Medium::new(
//!     MediumId::new(1),
//!     MediumAttributes {
//!         medium_type: "project_subjects_export".to_string(),
//!         content_type: "text/csv".to_string(),
//!         path_opts: vec!["project_subjects_export".to_string()],
//!         private: true,
//!         linked: LinkedResource::project(ProjectId::new(7)),
//!     },
//! );
//! assert_eq!(medium.state(), MediumState::Creating);
//! ```

pub mod errors;
pub mod history;
pub mod ids;
pub mod medium;
pub mod project;
pub mod records;
pub mod result;

pub use errors::DumpError;
pub use history::{ChangeEvent, VersionEntry, VersionHistory};
pub use ids::{
    ClassificationId, MediumId, ProjectId, SubjectId, UserId, WorkflowContentId, WorkflowId,
};
pub use medium::{LinkedResource, Medium, MediumAttributes, MediumState, CSV_CONTENT_TYPE};
pub use project::{Owner, Project};
pub use records::{Classification, Subject, SubjectWorkflowStatus, Workflow, WorkflowContent};
pub use result::Result;
