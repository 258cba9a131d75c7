//! Records read while producing dump rows
//!
//! These mirror the rows of the system of record that export producers
//! consult. Workflows and workflow contents are versioned; the rest are
//! supplied to a run in bulk.

use super::ids::{ClassificationId, ProjectId, SubjectId, UserId, WorkflowContentId, WorkflowId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Workflow definition (versioned)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    pub id: WorkflowId,
    pub project_id: ProjectId,
    pub display_name: String,

    /// Task tree as configured by the project builder
    #[serde(default)]
    pub tasks: serde_json::Value,

    /// Number of recorded changes; the live record is at this version
    #[serde(default)]
    pub version: u32,
}

/// Translatable strings of a workflow (versioned, dependent of [`Workflow`])
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowContent {
    pub id: WorkflowContentId,
    pub workflow_id: WorkflowId,

    #[serde(default = "default_language")]
    pub language: String,

    #[serde(default)]
    pub strings: serde_json::Value,

    #[serde(default)]
    pub version: u32,
}

fn default_language() -> String {
    "en".to_string()
}

/// Subject (the thing being classified)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub id: SubjectId,
    pub project_id: ProjectId,

    /// Media locations, one map per frame
    #[serde(default)]
    pub locations: Vec<serde_json::Value>,

    #[serde(default)]
    pub metadata: serde_json::Value,

    pub created_at: DateTime<Utc>,
}

/// Per-workflow status of a subject, including retirement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectWorkflowStatus {
    pub subject_id: SubjectId,
    pub workflow_id: WorkflowId,

    #[serde(default)]
    pub classifications_count: u64,

    #[serde(default)]
    pub retired_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub retirement_reason: Option<String>,
}

impl SubjectWorkflowStatus {
    /// Whether the subject has been retired from the workflow
    pub fn is_retired(&self) -> bool {
        self.retired_at.is_some()
    }
}

/// A volunteer's classification of one or more subjects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub id: ClassificationId,
    pub project_id: ProjectId,

    #[serde(default)]
    pub user_id: Option<UserId>,

    /// Login of the classifier, absent for anonymous classifications
    #[serde(default)]
    pub user_name: Option<String>,

    /// Raw source address; never written to a dump verbatim
    pub user_ip: String,

    pub workflow_id: WorkflowId,
    pub workflow_version: u32,
    pub workflow_content_id: WorkflowContentId,
    pub workflow_content_version: u32,

    #[serde(default)]
    pub annotations: serde_json::Value,

    #[serde(default)]
    pub metadata: serde_json::Value,

    #[serde(default)]
    pub gold_standard: Option<bool>,

    #[serde(default)]
    pub expert: Option<String>,

    pub created_at: DateTime<Utc>,
}

impl Classification {
    /// Combined `major.minor` workflow version label written to dumps
    pub fn workflow_version_label(&self) -> String {
        format!("{}.{}", self.workflow_version, self.workflow_content_version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retired_status() {
        let mut status = SubjectWorkflowStatus {
            subject_id: SubjectId::new(1),
            workflow_id: WorkflowId::new(2),
            classifications_count: 4,
            retired_at: None,
            retirement_reason: None,
        };
        assert!(!status.is_retired());

        status.retired_at = Some(Utc::now());
        assert!(status.is_retired());
    }

    #[test]
    fn test_workflow_content_defaults_language() {
        let json = r#"{"id": 3, "workflow_id": 2}"#;
        let content: WorkflowContent = serde_json::from_str(json).unwrap();
        assert_eq!(content.language, "en");
        assert_eq!(content.version, 0);
    }
}
