//! Sending a session's result to the server

use super::session::TagAssignmentSession;
use super::{BulkMode, EditMode};
use crate::api::{FileApi, FileUpdate};
use crate::model::TagId;
use crate::notify::NotificationLog;
use std::collections::BTreeSet;

/// Result of one target's update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetOutcome {
    pub filename: String,
    pub tags: BTreeSet<TagId>,
    pub error: Option<String>,
}

impl TargetOutcome {
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Per-target results of a commit, in target order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitReport {
    pub outcomes: Vec<TargetOutcome>,
}

impl CommitReport {
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_ok()).count()
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(TargetOutcome::is_ok)
    }
}

impl TagAssignmentSession {
    /// Send one tag update per target, one request at a time
    ///
    /// A failed target logs one error entry and does not stop the others.
    /// Successes are summarized in a single info entry.
    pub fn commit(self, api: &dyn FileApi, log: &mut NotificationLog) -> CommitReport {
        let mut report = CommitReport::default();

        for target in self.targets() {
            let tags = self.planned_tags(target);
            let update = FileUpdate::Tags(tags.clone());
            let error = match api.update_file(&target.filename, &update) {
                Ok(()) => None,
                Err(e) => {
                    log.error(format!("{}: {e}", target.filename));
                    Some(e.to_string())
                }
            };
            report.outcomes.push(TargetOutcome {
                filename: target.filename.clone(),
                tags,
                error,
            });
        }

        let succeeded = report.succeeded();
        if succeeded > 0 {
            log.info(self.summary(succeeded));
        }
        tracing::debug!(
            succeeded,
            failed = report.failed(),
            mode = ?self.mode(),
            "tag session committed"
        );
        report
    }

    fn summary(&self, succeeded: usize) -> String {
        let files = if succeeded == 1 { "file" } else { "files" };
        match self.mode() {
            EditMode::Single => format!("Tags of {} were updated", self.targets()[0].filename),
            EditMode::Bulk(BulkMode::Add) => format!("Tags were added to {succeeded} {files}"),
            EditMode::Bulk(BulkMode::Remove) => {
                format!("Tags were removed from {succeeded} {files}")
            }
        }
    }
}
