//! Run request and mutable run context

use super::paths::DumpPaths;
use crate::core::cache::SnapshotCache;
use crate::domain::{Medium, MediumId, Project, ProjectId, UserId};
use std::fmt;

/// Producer-specific arguments, passed through untouched
///
/// Arguments of the form `key=value` can be read with [`ProducerArgs::value`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProducerArgs(Vec<String>);

impl ProducerArgs {
    pub fn new(args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self(args.into_iter().map(Into::into).collect())
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    /// Value of the first `key=value` argument with this key
    pub fn value(&self, key: &str) -> Option<&str> {
        self.0.iter().find_map(|arg| {
            arg.split_once('=')
                .filter(|(k, _)| *k == key)
                .map(|(_, v)| v)
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One export job as submitted by the scheduler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpRequest {
    pub project_id: ProjectId,
    /// Medium to reuse; a new one is created when absent
    pub medium_id: Option<MediumId>,
    pub requester_id: Option<UserId>,
    pub args: ProducerArgs,
}

impl DumpRequest {
    pub fn new(project_id: ProjectId) -> Self {
        Self {
            project_id,
            medium_id: None,
            requester_id: None,
            args: ProducerArgs::default(),
        }
    }

    pub fn with_medium(mut self, medium_id: MediumId) -> Self {
        self.medium_id = Some(medium_id);
        self
    }

    pub fn with_requester(mut self, requester_id: UserId) -> Self {
        self.requester_id = Some(requester_id);
        self
    }

    pub fn with_args(mut self, args: ProducerArgs) -> Self {
        self.args = args;
        self
    }
}

/// Lifecycle phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DumpPhase {
    Idle,
    Resolving,
    Producing,
    Publishing,
    CleaningUp,
    Done,
    Skipped,
}

impl fmt::Display for DumpPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DumpPhase::Idle => "idle",
            DumpPhase::Resolving => "resolving",
            DumpPhase::Producing => "producing",
            DumpPhase::Publishing => "publishing",
            DumpPhase::CleaningUp => "cleaning_up",
            DumpPhase::Done => "done",
            DumpPhase::Skipped => "skipped",
        };
        f.write_str(name)
    }
}

/// State shared by hooks and the row producer during one run
pub struct DumpContext {
    pub request: DumpRequest,
    pub project: Project,
    pub medium: Medium,
    pub paths: DumpPaths,
    pub cache: SnapshotCache,
    phase: DumpPhase,
    rows_written: Option<u64>,
}

impl DumpContext {
    pub fn new(
        request: DumpRequest,
        project: Project,
        medium: Medium,
        paths: DumpPaths,
        cache: SnapshotCache,
    ) -> Self {
        Self {
            request,
            project,
            medium,
            paths,
            cache,
            phase: DumpPhase::Resolving,
            rows_written: None,
        }
    }

    pub fn phase(&self) -> DumpPhase {
        self.phase
    }

    pub(crate) fn enter(&mut self, phase: DumpPhase) {
        tracing::debug!(
            project_id = %self.project.id,
            medium_id = %self.medium.id,
            from = %self.phase,
            to = %phase,
            "Dump phase transition"
        );
        self.phase = phase;
    }

    /// Called by producers once the staging file is complete
    pub fn record_rows(&mut self, rows: u64) {
        self.rows_written = Some(rows);
    }

    pub fn rows_written(&self) -> Option<u64> {
        self.rows_written
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_producer_args_lookup() {
        let args = ProducerArgs::new(["workflow_id=12", "verbose", "workflow_id=13"]);
        assert_eq!(args.value("workflow_id"), Some("12"));
        assert_eq!(args.value("verbose"), None);
        assert_eq!(args.get(1), Some("verbose"));
        assert_eq!(args.len(), 3);
    }

    #[test]
    fn test_request_builder() {
        let request = DumpRequest::new(ProjectId::new(1))
            .with_medium(MediumId::new(2))
            .with_requester(UserId::new(3));
        assert_eq!(request.medium_id, Some(MediumId::new(2)));
        assert_eq!(request.requester_id, Some(UserId::new(3)));
        assert!(request.args.is_empty());
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(DumpPhase::CleaningUp.to_string(), "cleaning_up");
    }
}
