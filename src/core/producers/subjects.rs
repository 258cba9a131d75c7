//! Subject export
//!
//! One row per subject and workflow it has a status in; subjects no workflow
//! has seen yet get a single row with empty workflow columns.

use super::csv::CsvWriter;
use super::RowProducer;
use crate::adapters::traits::ExportFeed;
use crate::core::dump::DumpContext;
use crate::domain::{Result, Subject, SubjectWorkflowStatus};
use async_trait::async_trait;
use std::sync::Arc;

const HEADER: &[&str] = &[
    "subject_id",
    "project_id",
    "workflow_id",
    "classifications_count",
    "retired_at",
    "retirement_reason",
    "locations",
    "metadata",
    "created_at",
];

/// Writes `project_subjects_export` rows
pub struct SubjectsProducer {
    feed: Arc<dyn ExportFeed>,
}

impl SubjectsProducer {
    pub const TARGET: &'static str = "subjects";

    pub fn new(feed: Arc<dyn ExportFeed>) -> Self {
        Self { feed }
    }
}

fn row(subject: &Subject, status: Option<&SubjectWorkflowStatus>) -> Result<Vec<String>> {
    let (workflow_id, count, retired_at, reason) = match status {
        Some(status) => (
            status.workflow_id.to_string(),
            status.classifications_count.to_string(),
            status
                .retired_at
                .map(|at| at.to_rfc3339())
                .unwrap_or_default(),
            status.retirement_reason.clone().unwrap_or_default(),
        ),
        None => Default::default(),
    };

    Ok(vec![
        subject.id.to_string(),
        subject.project_id.to_string(),
        workflow_id,
        count,
        retired_at,
        reason,
        serde_json::to_string(&subject.locations)?,
        serde_json::to_string(&subject.metadata)?,
        subject.created_at.to_rfc3339(),
    ])
}

#[async_trait]
impl RowProducer for SubjectsProducer {
    fn dump_target(&self) -> &str {
        Self::TARGET
    }

    async fn generate_rows(&self, ctx: &mut DumpContext) -> Result<()> {
        let project_id = ctx.project.id;

        let mut subjects = self.feed.subjects(project_id).await?;
        subjects.sort_by_key(|s| s.id);
        ctx.cache
            .reset_subject_workflow_statuses(self.feed.subject_workflow_statuses(project_id).await?);

        let mut writer = CsvWriter::create(ctx.paths.csv_path(), HEADER)?;
        for subject in &subjects {
            let mut statuses: Vec<&SubjectWorkflowStatus> =
                ctx.cache.lookup_retirement_statuses(subject.id).iter().collect();
            statuses.sort_by_key(|s| s.workflow_id);

            if statuses.is_empty() {
                writer.write_row(&row(subject, None)?)?;
            }
            for status in statuses {
                writer.write_row(&row(subject, Some(status))?)?;
            }
        }
        let rows = writer.finish()?;

        ctx.cache.reset_subjects(subjects);
        ctx.record_rows(rows);
        tracing::debug!(project_id = %project_id, rows, "Subject rows written");
        Ok(())
    }
}
