//! Domain identifier types
//!
//! Newtype wrappers around the numeric primary keys of the system of record.
//! Each type keeps ids of different record kinds from being mixed up.
//!
//! # Examples
//!
//! ```
//! use dumpkit::domain::ids::ProjectId;
//! use std::str::FromStr;
//!
//! let id = ProjectId::from_str("42").unwrap();
//! assert_eq!(id.get(), 42);
//! assert_eq!(id.to_string(), "42");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Wraps a raw primary key
            pub const fn new(id: u64) -> Self {
                Self(id)
            }

            /// Returns the raw primary key
            pub const fn get(self) -> u64 {
                self.0
            }

            /// Human readable record kind, used in error messages
            pub const fn kind() -> &'static str {
                $label
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim()
                    .parse::<u64>()
                    .map(Self)
                    .map_err(|_| format!("Invalid {} id: '{}'", $label, s))
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }
    };
}

record_id!(
    /// Project (dump target) identifier
    ProjectId,
    "Project"
);
record_id!(
    /// Medium (artifact record) identifier
    MediumId,
    "Medium"
);
record_id!(
    /// User identifier, used for requesters and classifiers
    UserId,
    "User"
);
record_id!(
    /// Workflow identifier
    WorkflowId,
    "Workflow"
);
record_id!(
    /// Workflow content identifier
    WorkflowContentId,
    "WorkflowContent"
);
record_id!(
    /// Subject identifier
    SubjectId,
    "Subject"
);
record_id!(
    /// Classification identifier
    ClassificationId,
    "Classification"
);
