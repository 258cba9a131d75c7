//! Core business logic for dumpkit.
//!
//! # Modules
//!
//! - [`cache`] - Per-run memoization of versioned records, bulk-seeded lookups and anonymization tokens
//! - [`dump`] - The dump lifecycle: resolve, produce, publish, clean up
//! - [`producers`] - Row producers writing the CSV of each dump kind
//!
//! # Dump Workflow
//!
//! 1. **Resolve**: Load the project and create or reset its medium (`creating`)
//! 2. **Produce**: Run before hooks, the row producer and after hooks
//! 3. **Compress**: Gzip the staging CSV in fixed-size chunks
//! 4. **Publish**: Store the archive and mark the medium `ready`
//! 5. **Clean up**: Delete the staging files, on success and on failure
//!
//! # Example
//!
//! ```rust,no_run
//! use dumpkit::adapters::{LocalArtifactStore, JsonMediumStore, MemoryCatalog};
//! use dumpkit::core::dump::{DumpOrchestrator, DumpRequest, DumpSettings, DumpStores};
//! use dumpkit::core::producers;
//! use dumpkit::domain::ProjectId;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let catalog = Arc::new(MemoryCatalog::from_json_file("catalog.json")?);
//! let stores = DumpStores {
//!     projects: catalog.clone(),
//!     media: Arc::new(JsonMediumStore::open("media.json").await?),
//!     artifacts: Arc::new(LocalArtifactStore::new("./storage")),
//!     workflows: catalog.clone(),
//!     workflow_contents: catalog.clone(),
//! };
//! let producer = producers::for_target("classifications", catalog)?;
//! let settings = DumpSettings {
//!     scratch_dir: "./tmp".into(),
//!     compression: Default::default(),
//! };
//!
//! let outcome = DumpOrchestrator::new(stores, producer, settings)
//!     .run(DumpRequest::new(ProjectId::new(7)))
//!     .await?;
//! if let Some(summary) = outcome.summary() {
//!     println!("Stored {} ({} bytes)", summary.storage_path, summary.compressed_bytes);
//! }
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod dump;
pub mod producers;
