//! Dump orchestrator - drives one export run end to end
//!
//! A run resolves the project, creates or resets its medium, runs the hook
//! chain around the row producer, compresses and stores the staging file,
//! flips the medium to `ready`, and finally deletes its scratch files. Only a
//! missing project is absorbed; every other failure is returned to the
//! caller after cleanup so the scheduler can retry the whole run.

use super::compress::{gzip_file, CompressionOptions, CompressionReport};
use super::context::{DumpContext, DumpPhase, DumpRequest};
use super::hooks::{ChainOutcome, HookChain};
use super::paths::{dump_type, DumpPaths};
use super::staging::StagingFiles;
use super::summary::{DumpOutcome, DumpSummary};
use crate::adapters::traits::{
    ArtifactStore, MediumStore, ProjectStore, PutOptions, SharedWorkflowContentStore,
    SharedWorkflowStore,
};
use crate::core::cache::SnapshotCache;
use crate::core::producers::RowProducer;
use crate::domain::{
    DumpError, LinkedResource, Medium, MediumAttributes, Project, Result, CSV_CONTENT_TYPE,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// Collaborators of a run
#[derive(Clone)]
pub struct DumpStores {
    pub projects: Arc<dyn ProjectStore>,
    pub media: Arc<dyn MediumStore>,
    pub artifacts: Arc<dyn ArtifactStore>,
    pub workflows: SharedWorkflowStore,
    pub workflow_contents: SharedWorkflowContentStore,
}

/// Local settings of a run
#[derive(Debug, Clone)]
pub struct DumpSettings {
    /// Directory holding staging files
    pub scratch_dir: PathBuf,
    pub compression: CompressionOptions,
}

/// Runs dumps of one target kind
pub struct DumpOrchestrator {
    stores: DumpStores,
    producer: Arc<dyn RowProducer>,
    hooks: HookChain,
    settings: DumpSettings,
}

impl DumpOrchestrator {
    pub fn new(stores: DumpStores, producer: Arc<dyn RowProducer>, settings: DumpSettings) -> Self {
        Self {
            stores,
            producer,
            hooks: HookChain::new(),
            settings,
        }
    }

    /// Replace the hook chain run around row production
    pub fn with_hooks(mut self, hooks: HookChain) -> Self {
        self.hooks = hooks;
        self
    }

    /// Medium type produced by this orchestrator
    pub fn dump_type(&self) -> String {
        dump_type(self.producer.dump_target())
    }

    /// Execute one run
    ///
    /// # Errors
    ///
    /// Returns any failure of medium resolution, production or publishing.
    /// Staging files are removed before the error is returned, and the
    /// medium keeps its `creating` state.
    pub async fn run(&self, request: DumpRequest) -> Result<DumpOutcome> {
        let start = Instant::now();
        let dump_type = self.dump_type();

        tracing::info!(
            project_id = %request.project_id,
            medium_id = ?request.medium_id.map(|id| id.get()),
            requester_id = ?request.requester_id.map(|id| id.get()),
            dump_type = %dump_type,
            "Starting dump"
        );

        let project = match self.stores.projects.find_project(request.project_id).await {
            Ok(Some(project)) => project,
            Ok(None) | Err(DumpError::TargetNotFound(_)) => {
                tracing::info!(
                    project_id = %request.project_id,
                    dump_type = %dump_type,
                    phase = %DumpPhase::Skipped,
                    "Project not found, skipping dump"
                );
                return Ok(DumpOutcome::Skipped {
                    project_id: request.project_id,
                });
            }
            Err(e) => return Err(e),
        };

        let paths = DumpPaths::new(
            &self.settings.scratch_dir,
            self.producer.dump_target(),
            &project,
        );
        let staging = StagingFiles::new([
            paths.csv_path().to_path_buf(),
            paths.gzip_path().to_path_buf(),
        ]);
        tokio::fs::create_dir_all(&self.settings.scratch_dir).await?;

        let medium = self.resolve_medium(&request, &project, &paths).await?;
        let cache = SnapshotCache::new(
            Arc::clone(&self.stores.workflows),
            Arc::clone(&self.stores.workflow_contents),
        );
        let mut ctx = DumpContext::new(request, project, medium, paths, cache);

        let result = self.produce_and_publish(&mut ctx).await;
        let last_phase = ctx.phase();

        ctx.enter(DumpPhase::CleaningUp);
        let cleanup = staging.release();

        let compression = match result {
            Ok(Stage::Published(report)) => report,
            Ok(Stage::Halted(hook)) => {
                ctx.enter(DumpPhase::Done);
                return Ok(DumpOutcome::Halted {
                    medium_id: ctx.medium.id,
                    hook,
                });
            }
            Err(e) => {
                tracing::error!(
                    project_id = %ctx.project.id,
                    medium_id = %ctx.medium.id,
                    dump_type = %dump_type,
                    phase = %last_phase,
                    retryable = e.is_retryable(),
                    error = %e,
                    "Dump failed"
                );
                return Err(e);
            }
        };

        ctx.enter(DumpPhase::Done);
        let summary = DumpSummary {
            project_id: ctx.project.id,
            medium_id: ctx.medium.id,
            dump_type,
            storage_path: ctx.medium.storage_path(),
            rows: ctx.rows_written(),
            uncompressed_bytes: compression.input_bytes,
            compressed_bytes: compression.output_bytes,
            cache: ctx.cache.stats(),
            cleanup,
            duration: start.elapsed(),
        };
        summary.log_summary();
        Ok(DumpOutcome::Published(summary))
    }

    /// Reload and reset the requested medium, or create a new one
    async fn resolve_medium(
        &self,
        request: &DumpRequest,
        project: &Project,
        paths: &DumpPaths,
    ) -> Result<Medium> {
        let attributes = MediumAttributes {
            medium_type: self.dump_type(),
            content_type: CSV_CONTENT_TYPE.to_string(),
            path_opts: paths.segments().to_vec(),
            private: true,
            linked: LinkedResource::project(project.id),
        };

        match request.medium_id {
            Some(id) => {
                let mut medium = self.stores.media.find(id).await?;
                medium.reset_for_run(&attributes);
                self.stores.media.save(&medium).await?;
                tracing::debug!(medium_id = %medium.id, "Reusing medium");
                Ok(medium)
            }
            None => {
                let medium = self.stores.media.create(attributes).await?;
                tracing::debug!(medium_id = %medium.id, "Created medium");
                Ok(medium)
            }
        }
    }

    async fn produce_and_publish(&self, ctx: &mut DumpContext) -> Result<Stage> {
        ctx.enter(DumpPhase::Producing);
        if let ChainOutcome::Halted { hook } = self.hooks.around(ctx, self.producer.as_ref()).await? {
            return Ok(Stage::Halted(hook));
        }

        ctx.enter(DumpPhase::Publishing);
        self.publish(ctx).await.map(Stage::Published)
    }

    /// Compress, store, and mark the medium ready
    async fn publish(&self, ctx: &mut DumpContext) -> Result<CompressionReport> {
        let csv_path = ctx.paths.csv_path().to_path_buf();
        let gzip_path = ctx.paths.gzip_path().to_path_buf();

        if !tokio::fs::try_exists(&csv_path).await.unwrap_or(false) {
            return Err(DumpError::Production(format!(
                "producer did not write {}",
                csv_path.display()
            )));
        }

        let options = self.settings.compression;
        let report = {
            let gzip_path = gzip_path.clone();
            tokio::task::spawn_blocking(move || gzip_file(&csv_path, &gzip_path, options))
                .await
                .map_err(|e| DumpError::Publish(format!("compression task failed: {e}")))??
        };

        let storage_path = ctx.medium.storage_path();
        self.stores
            .artifacts
            .put_file(&storage_path, &gzip_path, PutOptions { compressed: true })
            .await?;

        ctx.medium.mark_ready()?;
        self.stores.media.save(&ctx.medium).await?;
        tracing::debug!(
            medium_id = %ctx.medium.id,
            storage_path = %storage_path,
            "Medium ready"
        );
        Ok(report)
    }
}

/// Where production and publishing stopped
enum Stage {
    Published(CompressionReport),
    Halted(String),
}
