//! Classification export
//!
//! One row per classification. Workflow names and task labels are taken from
//! the workflow and its content as they stood when the classification was
//! made, not as they are now. The classifier's address is replaced by a
//! run-scoped token, which also names anonymous classifiers.

use super::csv::CsvWriter;
use super::RowProducer;
use crate::adapters::traits::ExportFeed;
use crate::core::cache::SnapshotCache;
use crate::core::dump::{DumpContext, ProducerArgs};
use crate::domain::{
    Classification, DumpError, Result, SubjectId, Workflow, WorkflowContent, WorkflowId,
};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;

const HEADER: &[&str] = &[
    "classification_id",
    "user_name",
    "user_id",
    "user_ip",
    "workflow_id",
    "workflow_name",
    "workflow_version",
    "created_at",
    "gold_standard",
    "expert",
    "metadata",
    "annotations",
    "subject_data",
    "subject_ids",
];

/// Timestamp format of the `created_at` column
pub const CREATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Prefix of the user name written for anonymous classifications
pub const ANONYMOUS_PREFIX: &str = "not-logged-in-";

/// Writes `project_classifications_export` rows
pub struct ClassificationsProducer {
    feed: Arc<dyn ExportFeed>,
}

impl ClassificationsProducer {
    pub const TARGET: &'static str = "classifications";

    pub fn new(feed: Arc<dyn ExportFeed>) -> Self {
        Self { feed }
    }

    async fn row(cache: &mut SnapshotCache, classification: &Classification) -> Result<Vec<String>> {
        let workflow = cache
            .workflow_at_version(classification.workflow_id, classification.workflow_version)
            .await?;
        let content = cache
            .workflow_content_at_version(
                classification.workflow_content_id,
                classification.workflow_content_version,
            )
            .await?;

        let ip_token = cache.tokenize(&classification.user_ip);
        let user_name = match &classification.user_name {
            Some(login) => login.clone(),
            None => format!("{ANONYMOUS_PREFIX}{ip_token}"),
        };

        let subject_ids = cache
            .lookup_subject_ids_for_classification(classification.id)
            .to_vec();
        let subject_data = subject_data(cache, &subject_ids, classification.workflow_id)?;
        let annotations = label_annotations(&classification.annotations, &workflow, &content);

        Ok(vec![
            classification.id.to_string(),
            user_name,
            classification
                .user_id
                .map(|id| id.to_string())
                .unwrap_or_default(),
            ip_token,
            classification.workflow_id.to_string(),
            workflow.display_name.clone(),
            classification.workflow_version_label(),
            classification
                .created_at
                .format(CREATED_AT_FORMAT)
                .to_string(),
            classification
                .gold_standard
                .map(|gold| gold.to_string())
                .unwrap_or_default(),
            classification.expert.clone().unwrap_or_default(),
            serde_json::to_string(&classification.metadata)?,
            serde_json::to_string(&annotations)?,
            serde_json::to_string(&subject_data)?,
            subject_ids
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(";"),
        ])
    }
}

/// Optional `workflow_id=N` argument
fn workflow_filter(args: &ProducerArgs) -> Result<Option<WorkflowId>> {
    args.value("workflow_id")
        .map(|raw| raw.parse::<WorkflowId>().map_err(DumpError::Validation))
        .transpose()
}

/// Per-subject metadata with the subject's retirement in this workflow
///
/// Keys are subject ids. Each value is the subject's metadata object plus a
/// `retired` key holding the status record, or `null` while not retired.
fn subject_data(
    cache: &SnapshotCache,
    subject_ids: &[SubjectId],
    workflow: WorkflowId,
) -> Result<Value> {
    let mut data = Map::new();
    for &subject_id in subject_ids {
        let mut entry = cache
            .lookup_subject(subject_id)
            .and_then(|subject| subject.metadata.as_object().cloned())
            .unwrap_or_default();

        let retired = match cache.workflow_status(subject_id, workflow) {
            Some(status) if status.is_retired() => serde_json::to_value(status)?,
            _ => Value::Null,
        };
        entry.insert("retired".to_string(), retired);
        data.insert(subject_id.to_string(), Value::Object(entry));
    }
    Ok(Value::Object(data))
}

/// Attach the translated task label to each annotation
///
/// An annotation's `task` key names a task of the workflow; that task's
/// `question` or `instruction` names a string of the workflow content.
/// Annotations whose label cannot be resolved are written unchanged.
fn label_annotations(annotations: &Value, workflow: &Workflow, content: &WorkflowContent) -> Value {
    let Some(items) = annotations.as_array() else {
        return annotations.clone();
    };

    let labelled = items
        .iter()
        .map(|annotation| {
            let label = annotation
                .get("task")
                .and_then(Value::as_str)
                .and_then(|task| workflow.tasks.get(task))
                .and_then(|task| task.get("question").or_else(|| task.get("instruction")))
                .and_then(Value::as_str)
                .and_then(|key| content.strings.get(key))
                .cloned();

            match (annotation, label) {
                (Value::Object(fields), Some(label)) => {
                    let mut fields = fields.clone();
                    fields.insert("task_label".to_string(), label);
                    Value::Object(fields)
                }
                _ => annotation.clone(),
            }
        })
        .collect();
    Value::Array(labelled)
}

#[async_trait]
impl RowProducer for ClassificationsProducer {
    fn dump_target(&self) -> &str {
        Self::TARGET
    }

    async fn generate_rows(&self, ctx: &mut DumpContext) -> Result<()> {
        let project_id = ctx.project.id;
        let filter = workflow_filter(&ctx.request.args)?;

        let mut classifications = self.feed.classifications(project_id).await?;
        if let Some(workflow_id) = filter {
            classifications.retain(|c| c.workflow_id == workflow_id);
        }
        classifications.sort_by_key(|c| c.id);

        ctx.cache.reset_subjects(self.feed.subjects(project_id).await?);
        ctx.cache
            .reset_subject_workflow_statuses(self.feed.subject_workflow_statuses(project_id).await?);
        ctx.cache
            .reset_classification_subjects(self.feed.classification_subjects(project_id).await?);

        let mut writer = CsvWriter::create(ctx.paths.csv_path(), HEADER)?;
        for classification in &classifications {
            let row = Self::row(&mut ctx.cache, classification).await?;
            writer.write_row(&row)?;
        }
        let rows = writer.finish()?;
        ctx.record_rows(rows);

        tracing::debug!(
            project_id = %project_id,
            workflow_filter = ?filter.map(|id| id.get()),
            rows,
            "Classification rows written"
        );
        Ok(())
    }
}
