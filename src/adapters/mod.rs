//! External integrations
//!
//! - [`traits`] - capability traits for projects, versioned records, media,
//!   artifact storage and bulk export feeds
//! - [`memory`] - in-memory implementations with lookup counters
//! - [`local`] - filesystem-backed artifact and medium stores

pub mod local;
pub mod memory;
pub mod traits;

pub use local::{JsonMediumStore, LocalArtifactStore};
pub use memory::{
    CatalogData, MemoryArtifactStore, MemoryCatalog, MemoryMediumStore, StoredArtifact, Versioned,
};
pub use traits::{
    ArtifactStore, ExportFeed, MediumStore, ProjectStore, PutOptions, SharedWorkflowContentStore,
    SharedWorkflowStore, VersionedStore,
};
