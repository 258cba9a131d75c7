//! Dump lifecycle
//!
//! One run of a [`DumpOrchestrator`] turns a [`DumpRequest`] into a published,
//! gzip-compressed CSV artifact:
//!
//! 1. **Resolve**: load the project (a missing project skips the run) and
//!    create or reset its medium, which stays `creating` until publishing
//!    succeeds
//! 2. **Produce**: run the [`HookChain`] around the row producer, which writes
//!    the staging CSV
//! 3. **Publish**: gzip the CSV, store it under the medium's storage path and
//!    mark the medium `ready`
//! 4. **Clean up**: delete both staging files, whatever happened before
//!
//! # Example
//!
//! ```rust,no_run
//! use dumpkit::adapters::{MemoryArtifactStore, MemoryCatalog, MemoryMediumStore};
//! use dumpkit::core::dump::{DumpOrchestrator, DumpRequest, DumpSettings, DumpStores};
//! use dumpkit::core::producers::SubjectsProducer;
//! use dumpkit::domain::ProjectId;
//! use std::sync::Arc;
//!
//! # async fn example(catalog: Arc<MemoryCatalog>) -> dumpkit::domain::Result<()> {
//! let stores = DumpStores {
//!     projects: catalog.clone(),
//!     media: Arc::new(MemoryMediumStore::new()),
//!     artifacts: Arc::new(MemoryArtifactStore::new()),
//!     workflows: catalog.clone(),
//!     workflow_contents: catalog.clone(),
//! };
//! let settings = DumpSettings {
//!     scratch_dir: std::env::temp_dir(),
//!     compression: Default::default(),
//! };
//! let orchestrator =
//!     DumpOrchestrator::new(stores, Arc::new(SubjectsProducer::new(catalog)), settings);
//!
//! let outcome = orchestrator.run(DumpRequest::new(ProjectId::new(7))).await?;
//! println!("published: {}", outcome.is_published());
//! # Ok(())
//! # }
//! ```

pub mod compress;
pub mod context;
pub mod hooks;
pub mod orchestrator;
pub mod paths;
pub mod staging;
pub mod summary;

pub use compress::{gzip_file, CompressionOptions, CompressionReport};
pub use context::{DumpContext, DumpPhase, DumpRequest, ProducerArgs};
pub use hooks::{ChainOutcome, HookChain, HookFlow};
pub use orchestrator::{DumpOrchestrator, DumpSettings, DumpStores};
pub use paths::{dump_type, DumpPaths};
pub use staging::{CleanupReport, StagingFiles};
pub use summary::{DumpOutcome, DumpSummary};
