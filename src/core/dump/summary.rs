//! Run outcome and reporting

use super::staging::CleanupReport;
use crate::core::cache::CacheStats;
use crate::domain::{MediumId, ProjectId};
use std::time::Duration;

/// Summary of a published dump
#[derive(Debug, Clone, PartialEq)]
pub struct DumpSummary {
    pub project_id: ProjectId,
    pub medium_id: MediumId,
    pub dump_type: String,

    /// Logical path the artifact was stored under
    pub storage_path: String,

    /// Rows reported by the producer, if it counted them
    pub rows: Option<u64>,

    pub uncompressed_bytes: u64,
    pub compressed_bytes: u64,
    pub cache: CacheStats,
    pub cleanup: CleanupReport,
    pub duration: Duration,
}

impl DumpSummary {
    /// Compressed size as a fraction of the uncompressed size
    pub fn compression_ratio(&self) -> f64 {
        if self.uncompressed_bytes == 0 {
            return 1.0;
        }
        self.compressed_bytes as f64 / self.uncompressed_bytes as f64
    }

    pub fn log_summary(&self) {
        tracing::info!(
            project_id = %self.project_id,
            medium_id = %self.medium_id,
            dump_type = %self.dump_type,
            storage_path = %self.storage_path,
            rows = ?self.rows,
            uncompressed_bytes = self.uncompressed_bytes,
            compressed_bytes = self.compressed_bytes,
            ratio = format!("{:.3}", self.compression_ratio()),
            version_hits = self.cache.version_hits,
            version_misses = self.cache.version_misses,
            tokens_issued = self.cache.tokens_issued,
            duration_ms = self.duration.as_millis() as u64,
            "Dump published"
        );
    }
}

/// How a run ended
#[derive(Debug, Clone, PartialEq)]
pub enum DumpOutcome {
    /// The project no longer exists; nothing was created or changed
    Skipped { project_id: ProjectId },

    /// A before hook stopped the run; the medium stays `creating`
    Halted { medium_id: MediumId, hook: String },

    /// The artifact was stored and the medium marked `ready`
    Published(DumpSummary),
}

impl DumpOutcome {
    pub fn is_published(&self) -> bool {
        matches!(self, DumpOutcome::Published(_))
    }

    pub fn summary(&self) -> Option<&DumpSummary> {
        match self {
            DumpOutcome::Published(summary) => Some(summary),
            _ => None,
        }
    }
}
