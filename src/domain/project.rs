//! Project domain model
//!
//! A project is the target entity of every dump run.

use super::ids::ProjectId;
use serde::{Deserialize, Serialize};

/// Display identity of the user or organization owning a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    /// Login name, used as the second path segment of dump artifacts
    pub login: String,

    /// Optional display name of the owner
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl Owner {
    /// Creates an owner with just a login
    pub fn new(login: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            display_name: None,
        }
    }
}

/// Project record as read from the system of record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Project identifier
    pub id: ProjectId,

    /// Display name shown to volunteers
    pub display_name: String,

    /// Owning user or organization
    pub owner: Owner,
}

impl Project {
    /// Creates a new project record
    pub fn new(id: ProjectId, display_name: impl Into<String>, owner: Owner) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            owner,
        }
    }
}
