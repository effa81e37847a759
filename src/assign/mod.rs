//! Tag assignment sessions
//!
//! A session is a transient editor over one file (single mode) or over the
//! current selection (bulk mode). It moves tag ids between two disjoint
//! sets, `assigned` and `available`, and is consumed by `commit()` or
//! `cancel()`.
//!
//! # Modes
//!
//! - **Single**: `assigned` starts as the file's tags and becomes its new tag
//!   set on commit
//! - **Bulk add**: `assigned` starts empty and is unioned into every target
//! - **Bulk remove**: `assigned` starts as the full catalog; the tags moved
//!   out of it into `available` are subtracted from every target

mod commit;
mod session;

pub use commit::{CommitReport, TargetOutcome};
pub use session::{TagAssignmentSession, TagSets};

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Session lifecycle errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AssignError {
    #[error("No files to edit")]
    EmptyTargets,

    #[error("Single-file editing needs exactly one file, got {0}")]
    SingleTargetRequired(usize),

    #[error("File not in current listing: {0}")]
    UnknownFile(String),

    #[error("No tag editing session is open")]
    NoActiveSession,

    #[error("A tag editing session is already open")]
    SessionAlreadyOpen,
}

/// What a bulk session does with its assigned tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BulkMode {
    Add,
    Remove,
}

impl fmt::Display for BulkMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add => f.write_str("add"),
            Self::Remove => f.write_str("remove"),
        }
    }
}

/// Session flavor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    Single,
    Bulk(BulkMode),
}

/// Direction of a tag move between the two sets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    /// `available` to `assigned`
    Assign,
    /// `assigned` to `available`
    Unassign,
}
