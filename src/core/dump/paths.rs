//! Deterministic naming of dump artifacts
//!
//! A run's path segments are `[dump_type, owner_login, project_display_name]`,
//! each lowercased with every whitespace character and path separator
//! replaced by `_`, so a segment always names a single file. Joined
//! with `_` they name both the scratch files and the published artifact.
//! Two runs of the same dump target for the same project therefore share
//! staging files; keeping them apart is the scheduler's job.

use crate::domain::Project;
use std::path::{Path, PathBuf};

/// Suffix of the uncompressed staging file
pub const CSV_SUFFIX: &str = ".csv";

/// Suffix of the compressed staging file
pub const GZIP_SUFFIX: &str = ".gz";

/// Lowercase a path segment and replace whitespace and path separators with
/// underscores
pub fn normalize_segment(segment: &str) -> String {
    segment
        .to_lowercase()
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            c if c.is_whitespace() => '_',
            c => c,
        })
        .collect()
}

/// Medium type for a dump target, e.g. `project_classifications_export`
pub fn dump_type(dump_target: &str) -> String {
    format!("project_{dump_target}_export")
}

/// Path segments and staging files of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpPaths {
    segments: Vec<String>,
    csv_path: PathBuf,
    gzip_path: PathBuf,
}

impl DumpPaths {
    pub fn new(scratch_dir: &Path, dump_target: &str, project: &Project) -> Self {
        let segments: Vec<String> = [
            dump_type(dump_target).as_str(),
            project.owner.login.as_str(),
            project.display_name.as_str(),
        ]
        .iter()
        .map(|segment| normalize_segment(segment))
        .collect();

        let stem = segments.join("_");
        Self {
            csv_path: scratch_dir.join(format!("{stem}{CSV_SUFFIX}")),
            gzip_path: scratch_dir.join(format!("{stem}{GZIP_SUFFIX}")),
            segments,
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Segments joined with `_`
    pub fn stem(&self) -> String {
        self.segments.join("_")
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }

    pub fn gzip_path(&self) -> &Path {
        &self.gzip_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Owner, ProjectId};
    use test_case::test_case;

    #[test_case("Galaxy Hunt", "galaxy_hunt" ; "single space")]
    #[test_case("Sci_Org", "sci_org" ; "already underscored")]
    #[test_case("Penguin  Watch", "penguin__watch" ; "each whitespace replaced")]
    #[test_case("Snapshot\tSerengeti", "snapshot_serengeti" ; "tab")]
    #[test_case("ÉTOILES", "étoiles" ; "unicode lowercase")]
    #[test_case("A/B Test", "a_b_test" ; "forward slash")]
    #[test_case("Lab\\Team", "lab_team" ; "backslash")]
    #[test_case("nul\0byte", "nul_byte" ; "nul")]
    #[test_case("Stars...", "stars..." ; "dots kept")]
    fn test_normalize_segment(input: &str, expected: &str) {
        assert_eq!(normalize_segment(input), expected);
    }

    #[test]
    fn test_dump_paths_for_project() {
        let project = Project::new(ProjectId::new(1), "Galaxy Hunt", Owner::new("sci_org"));
        let paths = DumpPaths::new(Path::new("/tmp"), "classifications", &project);

        assert_eq!(
            paths.segments(),
            ["project_classifications_export", "sci_org", "galaxy_hunt"]
        );
        assert_eq!(
            paths.csv_path(),
            Path::new("/tmp/project_classifications_export_sci_org_galaxy_hunt.csv")
        );
        assert_eq!(
            paths.gzip_path(),
            Path::new("/tmp/project_classifications_export_sci_org_galaxy_hunt.gz")
        );
    }

    #[test]
    fn test_separators_stay_inside_the_scratch_dir() {
        let project = Project::new(ProjectId::new(1), "A/B Test", Owner::new("team/ops"));
        let paths = DumpPaths::new(Path::new("/tmp"), "subjects", &project);

        assert_eq!(paths.segments(), ["project_subjects_export", "team_ops", "a_b_test"]);
        assert_eq!(paths.csv_path().parent(), Some(Path::new("/tmp")));
        assert_eq!(
            paths.csv_path(),
            Path::new("/tmp/project_subjects_export_team_ops_a_b_test.csv")
        );
    }

    #[test]
    fn test_dump_targets_do_not_share_paths() {
        let project = Project::new(ProjectId::new(1), "Galaxy Hunt", Owner::new("sci_org"));
        let a = DumpPaths::new(Path::new("/tmp"), "classifications", &project);
        let b = DumpPaths::new(Path::new("/tmp"), "subjects", &project);
        assert_ne!(a.csv_path(), b.csv_path());
        assert_ne!(a.gzip_path(), b.gzip_path());
    }
}
