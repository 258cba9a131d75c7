// dumpkit - Versioned project data-export pipeline
// Copyright (c) 2025 Dumpkit Contributors
// Licensed under the MIT License

//! # dumpkit - Versioned project data export
//!
//! dumpkit materializes a consistent snapshot of a project's mutable,
//! historically versioned records into a gzip-compressed CSV artifact and
//! publishes it to durable storage with an observable readiness state.
//!
//! ## Overview
//!
//! This library provides:
//! - **Reconstructing** workflows and workflow contents as they stood at the
//!   version a classification recorded, falling back to the live record
//! - **Memoizing** every versioned lookup, bulk-seeded subject and retirement
//!   data, and anonymization tokens for the lifetime of one run
//! - **Publishing** the produced CSV as a gzip archive and flipping its
//!   medium from `creating` to `ready`
//! - **Cleaning up** scratch files on every exit path
//!
//! ## Architecture
//!
//! dumpkit follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (snapshot cache, dump lifecycle, row producers)
//! - [`adapters`] - Capability traits and their in-memory and local implementations
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dumpkit::adapters::{MemoryArtifactStore, MemoryCatalog, MemoryMediumStore};
//! use dumpkit::core::dump::{DumpOrchestrator, DumpRequest, DumpSettings, DumpStores};
//! use dumpkit::core::producers::ClassificationsProducer;
//! use dumpkit::domain::ProjectId;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let catalog = Arc::new(MemoryCatalog::from_json_file("catalog.json")?);
//!     let stores = DumpStores {
//!         projects: catalog.clone(),
//!         media: Arc::new(MemoryMediumStore::new()),
//!         artifacts: Arc::new(MemoryArtifactStore::new()),
//!         workflows: catalog.clone(),
//!         workflow_contents: catalog.clone(),
//!     };
//!     let settings = DumpSettings {
//!         scratch_dir: std::env::temp_dir(),
//!         compression: Default::default(),
//!     };
//!     let producer = Arc::new(ClassificationsProducer::new(catalog));
//!
//!     let outcome = DumpOrchestrator::new(stores, producer, settings)
//!         .run(DumpRequest::new(ProjectId::new(7)))
//!         .await?;
//!
//!     if let Some(summary) = outcome.summary() {
//!         println!("Published {}", summary.storage_path);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Hooks
//!
//! Hooks run around row production and may stop a run before any rows are
//! written:
//!
//! ```rust
//! use dumpkit::core::dump::{DumpContext, HookChain, HookFlow};
//!
//! let hooks = HookChain::new()
//!     .before("require_requester", |ctx: &mut DumpContext| {
//!         Ok(if ctx.request.requester_id.is_some() {
//!             HookFlow::Continue
//!         } else {
//!             HookFlow::Halt
//!         })
//!     })
//!     .after("audit", |ctx: &mut DumpContext| {
//!         tracing::info!(rows = ?ctx.rows_written(), "Rows produced");
//!         Ok(HookFlow::Continue)
//!     });
//! assert_eq!(hooks.len(), 2);
//! ```
//!
//! ## Error Handling
//!
//! dumpkit uses the [`domain::DumpError`] type for all errors. A missing
//! project is not an error: the run ends as
//! [`core::dump::DumpOutcome::Skipped`]. A version that cannot be
//! reconstructed falls back to the live record. Everything else is returned
//! to the caller after scratch files have been removed.
//!
//! ## Logging
//!
//! dumpkit uses structured logging with the `tracing` crate:
//!
//! ```rust,no_run
//! tracing::info!(project_id = 7, dump_type = "project_subjects_export", "Starting dump");
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
