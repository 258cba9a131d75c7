//! Shared fixtures for integration tests
#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use dumpkit::adapters::{
    CatalogData, MemoryArtifactStore, MemoryCatalog, MemoryMediumStore, Versioned,
};
use dumpkit::core::dump::{CompressionOptions, DumpSettings, DumpStores};
use dumpkit::domain::{
    Classification, ClassificationId, Owner, Project, ProjectId, Subject, SubjectId,
    SubjectWorkflowStatus, UserId, VersionHistory, Workflow, WorkflowContent,
    WorkflowContentId, WorkflowId,
};
use serde_json::json;
use std::path::Path;
use std::sync::Arc;

pub const GALAXY_HUNT: ProjectId = ProjectId::new(1);
pub const MOON_ZOO: ProjectId = ProjectId::new(2);
pub const SLASHED_PROJECT: ProjectId = ProjectId::new(3);
pub const MISSING_PROJECT: ProjectId = ProjectId::new(404);

pub const SPIRAL_WORKFLOW: WorkflowId = WorkflowId::new(10);
pub const SPIRAL_CONTENT: WorkflowContentId = WorkflowContentId::new(20);
pub const CRATER_WORKFLOW: WorkflowId = WorkflowId::new(11);
pub const CRATER_CONTENT: WorkflowContentId = WorkflowContentId::new(21);

pub const RETIRED_SUBJECT: SubjectId = SubjectId::new(100);
pub const ACTIVE_SUBJECT: SubjectId = SubjectId::new(101);

pub const ANONYMOUS_IP: &str = "198.51.100.4";

pub fn at(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, day, 9, 30, 0).unwrap()
}

fn spiral_workflow(display_name: &str, version: u32) -> Workflow {
    Workflow {
        id: SPIRAL_WORKFLOW,
        project_id: GALAXY_HUNT,
        display_name: display_name.to_string(),
        tasks: json!({"T0": {"question": "T0.question"}}),
        version,
    }
}

fn spiral_content(question: &str, version: u32) -> WorkflowContent {
    WorkflowContent {
        id: SPIRAL_CONTENT,
        workflow_id: SPIRAL_WORKFLOW,
        language: "en".to_string(),
        strings: json!({"T0.question": question}),
        version,
    }
}

/// Workflow 10 was renamed once; version 1 is "Spiral arms v1" and the live
/// record (version 2) is "Spiral arms v3". Its content was reworded once.
fn versioned_records() -> (Vec<Versioned<Workflow>>, Vec<Versioned<WorkflowContent>>) {
    let mut workflow_history = VersionHistory::created(at(1));
    workflow_history.record_update(spiral_workflow("Spiral arms v1", 1), at(2));

    let mut content_history = VersionHistory::created(at(1));
    content_history.record_update(spiral_content("Spiral?", 1), at(2));

    let crater = Workflow {
        id: CRATER_WORKFLOW,
        project_id: MOON_ZOO,
        display_name: "Crater counting".to_string(),
        tasks: json!({}),
        version: 0,
    };
    let crater_content = WorkflowContent {
        id: CRATER_CONTENT,
        workflow_id: CRATER_WORKFLOW,
        language: "en".to_string(),
        strings: json!({}),
        version: 0,
    };

    (
        vec![
            Versioned {
                record: spiral_workflow("Spiral arms v3", 2),
                history: workflow_history,
            },
            Versioned {
                record: crater,
                history: VersionHistory::created(at(1)),
            },
        ],
        vec![
            Versioned {
                record: spiral_content("Is it a spiral?", 2),
                history: content_history,
            },
            Versioned {
                record: crater_content,
                history: VersionHistory::default(),
            },
        ],
    )
}

fn classification(
    id: u64,
    user: Option<(u64, &str)>,
    ip: &str,
    workflow_version: u32,
) -> Classification {
    Classification {
        id: ClassificationId::new(id),
        project_id: GALAXY_HUNT,
        user_id: user.map(|(id, _)| UserId::new(id)),
        user_name: user.map(|(_, login)| login.to_string()),
        user_ip: ip.to_string(),
        workflow_id: SPIRAL_WORKFLOW,
        workflow_version,
        workflow_content_id: SPIRAL_CONTENT,
        workflow_content_version: 1,
        annotations: json!([{"task": "T0", "value": 0}]),
        metadata: json!({"user_agent": "Mozilla/5.0", "started_at": "2024-05-03T09:00:00Z"}),
        gold_standard: None,
        expert: None,
        created_at: at(3),
    }
}

pub fn catalog_data() -> CatalogData {
    let (workflows, workflow_contents) = versioned_records();
    CatalogData {
        projects: vec![
            Project::new(GALAXY_HUNT, "Galaxy Hunt", Owner::new("sci_org")),
            Project::new(MOON_ZOO, "Moon Zoo", Owner::new("Lunar Team")),
            Project::new(SLASHED_PROJECT, "A/B Test", Owner::new("sci_org")),
        ],
        workflows,
        workflow_contents,
        subjects: vec![
            Subject {
                id: RETIRED_SUBJECT,
                project_id: GALAXY_HUNT,
                locations: vec![json!({"image/jpeg": "https://example.org/100.jpg"})],
                metadata: json!({"ra": 150.1, "dec": 2.2}),
                created_at: at(1),
            },
            Subject {
                id: ACTIVE_SUBJECT,
                project_id: GALAXY_HUNT,
                locations: vec![json!({"image/jpeg": "https://example.org/101.jpg"})],
                metadata: json!({"ra": 150.4}),
                created_at: at(1),
            },
        ],
        subject_workflow_statuses: vec![
            SubjectWorkflowStatus {
                subject_id: RETIRED_SUBJECT,
                workflow_id: SPIRAL_WORKFLOW,
                classifications_count: 5,
                retired_at: Some(at(4)),
                retirement_reason: Some("classification_count".to_string()),
            },
            SubjectWorkflowStatus {
                subject_id: ACTIVE_SUBJECT,
                workflow_id: SPIRAL_WORKFLOW,
                classifications_count: 2,
                retired_at: None,
                retirement_reason: None,
            },
        ],
        classifications: vec![
            classification(1000, Some((7, "alice")), "203.0.113.9", 1),
            classification(1001, None, ANONYMOUS_IP, 1),
            classification(1002, None, ANONYMOUS_IP, 2),
        ],
        classification_subjects: vec![
            (ClassificationId::new(1000), RETIRED_SUBJECT),
            (ClassificationId::new(1001), ACTIVE_SUBJECT),
            (ClassificationId::new(1002), RETIRED_SUBJECT),
            (ClassificationId::new(1002), ACTIVE_SUBJECT),
        ],
    }
}

pub fn catalog() -> Arc<MemoryCatalog> {
    Arc::new(MemoryCatalog::new(catalog_data()))
}

pub fn stores(
    catalog: &Arc<MemoryCatalog>,
    media: &Arc<MemoryMediumStore>,
    artifacts: &Arc<MemoryArtifactStore>,
) -> DumpStores {
    DumpStores {
        projects: catalog.clone(),
        media: media.clone(),
        artifacts: artifacts.clone(),
        workflows: catalog.clone(),
        workflow_contents: catalog.clone(),
    }
}

pub fn settings(scratch_dir: &Path) -> DumpSettings {
    DumpSettings {
        scratch_dir: scratch_dir.to_path_buf(),
        compression: CompressionOptions {
            chunk_size: 64,
            level: 6,
        },
    }
}

/// Files left in a directory
pub fn leftover_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .map(|e| e.file_name().to_string_lossy().to_string())
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}
