//! Medium (artifact record) domain model
//!
//! A medium describes one dump's output file: where it is stored, who may see
//! it, and whether it is ready to be downloaded. Readiness lives in the
//! free-form metadata map under the `state` key so that other metadata set by
//! callers survives a rerun.

use super::errors::DumpError;
use super::ids::{MediumId, ProjectId};
use super::result::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Content type of every dump artifact
pub const CSV_CONTENT_TYPE: &str = "text/csv";

/// Metadata key holding the readiness state
pub const STATE_KEY: &str = "state";

/// Readiness state of a medium
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediumState {
    /// A run is (re)generating the artifact
    Creating,
    /// The compressed artifact has been published
    Ready,
}

impl MediumState {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediumState::Creating => "creating",
            MediumState::Ready => "ready",
        }
    }
}

impl fmt::Display for MediumState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediumState {
    type Err = DumpError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "creating" => Ok(MediumState::Creating),
            "ready" => Ok(MediumState::Ready),
            other => Err(DumpError::Validation(format!(
                "Unknown medium state '{other}'"
            ))),
        }
    }
}

/// Record a medium is attached to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedResource {
    /// Record kind, e.g. `Project`
    #[serde(rename = "type")]
    pub kind: String,
    pub id: u64,
}

impl LinkedResource {
    pub fn project(id: ProjectId) -> Self {
        Self {
            kind: "Project".to_string(),
            id: id.get(),
        }
    }
}

/// Values every run writes onto its medium
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediumAttributes {
    /// Dump type, e.g. `project_classifications_export`
    pub medium_type: String,
    pub content_type: String,
    pub path_opts: Vec<String>,
    pub private: bool,
    pub linked: LinkedResource,
}

/// Durable artifact record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Medium {
    pub id: MediumId,

    #[serde(rename = "type")]
    pub medium_type: String,

    pub content_type: String,

    /// Ordered path segments; joined with `_` to form the storage path
    pub path_opts: Vec<String>,

    pub private: bool,

    pub linked: LinkedResource,

    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl Medium {
    /// Builds a fresh medium in the `creating` state
    pub fn new(id: MediumId, attributes: MediumAttributes) -> Self {
        let mut metadata = serde_json::Map::new();
        metadata.insert(
            STATE_KEY.to_string(),
            serde_json::Value::String(MediumState::Creating.as_str().to_string()),
        );
        Self {
            id,
            medium_type: attributes.medium_type,
            content_type: attributes.content_type,
            path_opts: attributes.path_opts,
            private: attributes.private,
            linked: attributes.linked,
            metadata,
        }
    }

    /// Current readiness state
    ///
    /// A missing or unrecognized state is reported as `creating`, since the
    /// record cannot be trusted as published.
    pub fn state(&self) -> MediumState {
        self.metadata
            .get(STATE_KEY)
            .and_then(|v| v.as_str())
            .and_then(|s| s.parse().ok())
            .unwrap_or(MediumState::Creating)
    }

    pub fn is_ready(&self) -> bool {
        self.state() == MediumState::Ready
    }

    /// Prepares a reused medium for a new run
    ///
    /// Forces the state back to `creating` and overwrites the path,
    /// visibility and content type with this run's values. The medium type
    /// and unrelated metadata keys are kept.
    pub fn reset_for_run(&mut self, attributes: &MediumAttributes) {
        self.content_type = attributes.content_type.clone();
        self.path_opts = attributes.path_opts.clone();
        self.private = attributes.private;
        self.metadata.insert(
            STATE_KEY.to_string(),
            serde_json::Value::String(MediumState::Creating.as_str().to_string()),
        );
    }

    /// Flips the medium to `ready`
    ///
    /// Only valid from `creating`; a ready medium is never rewritten by this
    /// call.
    pub fn mark_ready(&mut self) -> Result<()> {
        if self.state() != MediumState::Creating {
            return Err(DumpError::Validation(format!(
                "Medium {} is already {}",
                self.id,
                self.state()
            )));
        }
        self.metadata.insert(
            STATE_KEY.to_string(),
            serde_json::Value::String(MediumState::Ready.as_str().to_string()),
        );
        Ok(())
    }

    /// Logical location of the artifact in durable storage
    pub fn storage_path(&self) -> String {
        self.path_opts.join("_")
    }
}
