//! Row producers
//!
//! A producer knows how to turn one project into rows of one dump kind. It
//! writes a CSV file to the run's staging path and may consult the run's
//! [`SnapshotCache`](crate::core::cache::SnapshotCache) as often as it likes.
//! The orchestrator never looks inside the file; it only compresses and
//! publishes it.

pub mod classifications;
pub mod csv;
pub mod subjects;

use crate::adapters::traits::ExportFeed;
use crate::core::dump::DumpContext;
use crate::domain::{DumpError, Result};
use async_trait::async_trait;
use std::sync::Arc;

pub use classifications::ClassificationsProducer;
pub use csv::{quote_field, CsvWriter};
pub use subjects::SubjectsProducer;

/// Dump targets known to [`for_target`]
pub const TARGETS: &[&str] = &[
    ClassificationsProducer::TARGET,
    SubjectsProducer::TARGET,
];

/// Writes the rows of one dump kind
#[async_trait]
pub trait RowProducer: Send + Sync {
    /// Dump kind, e.g. `classifications`
    fn dump_target(&self) -> &str;

    /// Write the staging CSV at `ctx.paths.csv_path()`
    ///
    /// Producer arguments are available as `ctx.request.args`.
    ///
    /// # Errors
    ///
    /// Returns [`DumpError::Production`] if the file cannot be written, or
    /// any error raised while reading the feed or the cache.
    async fn generate_rows(&self, ctx: &mut DumpContext) -> Result<()>;
}

/// Producer registered for a dump target
///
/// # Errors
///
/// Returns [`DumpError::Validation`] for an unknown target.
pub fn for_target(target: &str, feed: Arc<dyn ExportFeed>) -> Result<Arc<dyn RowProducer>> {
    match target {
        ClassificationsProducer::TARGET => Ok(Arc::new(ClassificationsProducer::new(feed))),
        SubjectsProducer::TARGET => Ok(Arc::new(SubjectsProducer::new(feed))),
        other => Err(DumpError::Validation(format!(
            "Unknown dump target '{}', expected one of: {}",
            other,
            TARGETS.join(", ")
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{CatalogData, MemoryCatalog};

    #[test]
    fn test_for_target() {
        let feed: Arc<dyn ExportFeed> = Arc::new(MemoryCatalog::new(CatalogData::default()));

        let producer = for_target("subjects", feed.clone()).unwrap();
        assert_eq!(producer.dump_target(), "subjects");

        let producer = for_target("classifications", feed.clone()).unwrap();
        assert_eq!(producer.dump_target(), "classifications");

        assert!(matches!(
            for_target("collections", feed),
            Err(DumpError::Validation(_))
        ));
    }
}
