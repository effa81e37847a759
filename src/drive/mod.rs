//! State owner for a drive session
//!
//! `Drive` holds every piece of client state (catalogs, query, selection,
//! the open tag session, the notification log and the drop layer) and is
//! the only place that talks to the server. Frontends call its methods for
//! each user event and read state back through the accessors.
//!
//! Server failures never escape as errors. They become entries in the
//! notification log, except for catalog refresh failures, which only reach
//! the developer log and leave the previous data in place.

use crate::api::{BatchItemResult, FileApi, FileUpdate, UploadItem};
use crate::assign::{
    AssignError, BulkMode, CommitReport, EditMode, MoveDirection, TagAssignmentSession,
};
use crate::catalog::{FileCatalog, RefreshPolicy, TagCatalog};
use crate::dropzone::DropZone;
use crate::model::{File, NewTag, TagId, validate_filename};
use crate::notify::{NotificationLog, NotificationSettings};
use crate::query::{MatchMode, QueryState, SortDir, SortKey};
use crate::selection::{SelectionError, SelectionState};
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;

/// Client state bound to one server
#[derive(Debug)]
pub struct Drive<A: FileApi> {
    api: A,
    tags: TagCatalog,
    files: FileCatalog,
    query: QueryState,
    selection: SelectionState,
    session: Option<TagAssignmentSession>,
    log: NotificationLog,
    drop_zone: DropZone,
}

impl<A: FileApi> Drive<A> {
    /// Empty state; call `refresh()` to load the catalogs
    #[must_use]
    pub fn new(api: A, policy: RefreshPolicy, settings: NotificationSettings) -> Self {
        Self {
            api,
            tags: TagCatalog::new(policy),
            files: FileCatalog::new(policy),
            query: QueryState::new(),
            selection: SelectionState::new(),
            session: None,
            log: NotificationLog::new(settings),
            drop_zone: DropZone::new(),
        }
    }

    #[must_use]
    pub const fn api(&self) -> &A {
        &self.api
    }

    #[must_use]
    pub const fn tags(&self) -> &TagCatalog {
        &self.tags
    }

    #[must_use]
    pub const fn files(&self) -> &FileCatalog {
        &self.files
    }

    #[must_use]
    pub const fn query(&self) -> &QueryState {
        &self.query
    }

    #[must_use]
    pub const fn selection(&self) -> &SelectionState {
        &self.selection
    }

    #[must_use]
    pub const fn session(&self) -> Option<&TagAssignmentSession> {
        self.session.as_ref()
    }

    #[must_use]
    pub const fn log(&self) -> &NotificationLog {
        &self.log
    }

    pub const fn log_mut(&mut self) -> &mut NotificationLog {
        &mut self.log
    }

    #[must_use]
    pub const fn drop_zone(&self) -> &DropZone {
        &self.drop_zone
    }

    pub const fn drop_zone_mut(&mut self) -> &mut DropZone {
        &mut self.drop_zone
    }

    // Refresh

    /// Reload both catalogs
    pub fn refresh(&mut self) {
        self.fetch_tags();
        self.query.retain_known(&self.tags);
        self.refresh_files();
    }

    /// Reload the tag catalog. Picked filters that no longer exist are
    /// dropped, which reloads the listing.
    pub fn refresh_tags(&mut self) {
        if self.fetch_tags() && self.query.retain_known(&self.tags) {
            self.refresh_files();
        }
    }

    fn fetch_tags(&mut self) -> bool {
        let ticket = self.tags.begin_refresh();
        match self.api.list_tags() {
            Ok(tags) => self.tags.apply_refresh(ticket, tags),
            Err(e) => {
                tracing::warn!(error = %e, "tag refresh failed, keeping previous tags");
                false
            }
        }
    }

    /// Reload the listing for the current query
    ///
    /// The selection is cleared whenever a new listing lands.
    pub fn refresh_files(&mut self) {
        let query = self.query.build_query();
        let ticket = self.files.begin_refresh();
        match self.api.list_files(&query) {
            Ok(files) => {
                if self.files.apply_refresh(ticket, files) {
                    self.selection.unselect_all();
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, %query, "file refresh failed, keeping previous listing");
            }
        }
    }

    /// Most recently added files, outside the current listing
    pub fn recent_files(&mut self, number: usize) -> Vec<File> {
        self.api.recent_files(number).unwrap_or_else(|e| {
            self.log.error(e.to_string());
            Vec::new()
        })
    }

    // Search

    pub fn add_tag_filter(&mut self, id: TagId) -> bool {
        let changed = self.query.add_tag_filter(id, &self.tags);
        if changed {
            self.refresh_files();
        }
        changed
    }

    pub fn remove_tag_filter(&mut self, id: TagId) -> bool {
        let changed = self.query.remove_tag_filter(id);
        if changed {
            self.refresh_files();
        }
        changed
    }

    pub fn set_free_text(&mut self, text: impl Into<String>) -> bool {
        let changed = self.query.set_free_text(text);
        if changed {
            self.refresh_files();
        }
        changed
    }

    pub fn set_match_mode(&mut self, mode: MatchMode) -> bool {
        let changed = self.query.set_match_mode(mode);
        if changed {
            self.refresh_files();
        }
        changed
    }

    /// Replace the whole query and reload the listing once
    ///
    /// Filters the catalog does not know are dropped first.
    pub fn apply_query(&mut self, query: QueryState) {
        self.query = query;
        self.query.retain_known(&self.tags);
        self.refresh_files();
    }

    pub fn toggle_sort(&mut self, key: SortKey) {
        self.query.toggle_sort(key);
        self.refresh_files();
    }

    pub fn set_sort(&mut self, key: SortKey, dir: SortDir) {
        self.query.set_sort(key, dir);
        self.refresh_files();
    }

    // Selection

    pub fn select_all(&mut self) {
        self.selection.select_all(&self.files);
    }

    pub fn unselect_all(&mut self) {
        self.selection.unselect_all();
    }

    /// # Errors
    ///
    /// Returns `SelectionError::UnknownFile` if `filename` is not listed.
    pub fn toggle_selection(&mut self, filename: &str) -> Result<bool, SelectionError> {
        self.selection.toggle(filename, &self.files)
    }

    // Files

    fn update_file(&mut self, filename: &str, update: FileUpdate, done: String) -> bool {
        match self.api.update_file(filename, &update) {
            Ok(()) => {
                self.log.info(done);
                self.refresh_files();
                true
            }
            Err(e) => {
                self.log.error(e.to_string());
                false
            }
        }
    }

    /// Rename a file; a blank new name is rejected without a request
    pub fn rename_file(&mut self, filename: &str, new_name: &str) -> bool {
        if let Err(e) = validate_filename(new_name) {
            self.log.error(e.to_string());
            return false;
        }
        let done = format!("{filename} was renamed to {new_name}");
        self.update_file(filename, FileUpdate::Rename(new_name.to_string()), done)
    }

    pub fn set_description(&mut self, filename: &str, description: &str) -> bool {
        let done = format!("Description of {filename} was changed");
        self.update_file(filename, FileUpdate::Description(description.to_string()), done)
    }

    fn log_batch(&mut self, results: &[BatchItemResult]) {
        for result in results {
            if result.is_error {
                self.log.error(result.message());
            } else {
                self.log.info(result.message());
            }
        }
    }

    /// Delete files, logging one entry per file
    pub fn delete_files(&mut self, filenames: &[String]) -> Vec<BatchItemResult> {
        if filenames.is_empty() {
            return Vec::new();
        }
        match self.api.delete_files(filenames) {
            Ok(results) => {
                self.log_batch(&results);
                self.selection.unselect_all();
                self.refresh_files();
                results
            }
            Err(e) => {
                self.log.error(e.to_string());
                Vec::new()
            }
        }
    }

    pub fn delete_selected(&mut self) -> Vec<BatchItemResult> {
        let filenames: Vec<String> = self.selection.keys().map(ToString::to_string).collect();
        self.delete_files(&filenames)
    }

    /// Upload files with initial tags; tags unknown to the catalog are
    /// dropped
    pub fn upload(&mut self, items: &[UploadItem], tags: &BTreeSet<TagId>) -> Vec<BatchItemResult> {
        if items.is_empty() {
            return Vec::new();
        }
        let tags: BTreeSet<TagId> = tags
            .iter()
            .copied()
            .filter(|id| self.tags.contains(*id))
            .collect();
        match self.api.upload_files(items, &tags) {
            Ok(results) => {
                self.log_batch(&results);
                self.selection.unselect_all();
                self.refresh_files();
                results
            }
            Err(e) => {
                self.log.error(e.to_string());
                Vec::new()
            }
        }
    }

    /// Files dropped on the window: close the drop layer and upload untagged
    pub fn drop_upload(&mut self, items: &[UploadItem]) -> Vec<BatchItemResult> {
        if !self.drop_zone.is_enabled() {
            return Vec::new();
        }
        self.drop_zone.drop_files();
        self.upload(items, &BTreeSet::new())
    }

    /// Archive of the named files, or `None` after logging the failure
    pub fn download(&mut self, filenames: &[String]) -> Option<Vec<u8>> {
        if filenames.is_empty() {
            return None;
        }
        match self.api.download_files(filenames) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                self.log.error(e.to_string());
                None
            }
        }
    }

    pub fn download_selected(&mut self) -> Option<Vec<u8>> {
        let filenames: Vec<String> = self.selection.keys().map(ToString::to_string).collect();
        self.download(&filenames)
    }

    // Tags

    fn parse_tag(&mut self, name: &str, color: &str) -> Option<NewTag> {
        NewTag::parse(name, color)
            .map_err(|e| self.log.error(e.to_string()))
            .ok()
    }

    /// Create a tag; invalid name or color is rejected without a request
    pub fn create_tag(&mut self, name: &str, color: &str) -> bool {
        let Some(tag) = self.parse_tag(name, color) else {
            return false;
        };
        match self.api.create_tag(&tag) {
            Ok(()) => {
                self.log.info(format!("Tag '{}' was created", tag.name()));
                self.refresh_tags();
                true
            }
            Err(e) => {
                self.log.error(e.to_string());
                false
            }
        }
    }

    pub fn update_tag(&mut self, id: TagId, name: &str, color: &str) -> bool {
        let Some(tag) = self.parse_tag(name, color) else {
            return false;
        };
        match self.api.update_tag(id, &tag) {
            Ok(()) => {
                self.log.info(format!("Tag '{}' was updated", tag.name()));
                self.refresh_tags();
                true
            }
            Err(e) => {
                self.log.error(e.to_string());
                false
            }
        }
    }

    /// Delete a tag; it disappears from the filter and from every file
    pub fn delete_tag(&mut self, id: TagId) -> bool {
        let name = self
            .tags
            .get(id)
            .map_or_else(|| id.to_string(), |t| t.name.clone());
        match self.api.delete_tag(id) {
            Ok(()) => {
                self.log.info(format!("Tag '{name}' was deleted"));
                self.refresh();
                true
            }
            Err(e) => {
                self.log.error(e.to_string());
                false
            }
        }
    }

    // Tag sessions

    fn open_session(&mut self, targets: Vec<File>, mode: EditMode) -> Result<(), AssignError> {
        if self.session.is_some() {
            return Err(AssignError::SessionAlreadyOpen);
        }
        let session = TagAssignmentSession::start(targets, mode, &self.tags)?;
        self.session = Some(session);
        self.drop_zone.set_enabled(false);
        Ok(())
    }

    /// Open a single-file tag editor
    ///
    /// # Errors
    ///
    /// Returns `AssignError::UnknownFile` if the file is not listed, or
    /// `AssignError::SessionAlreadyOpen`.
    pub fn begin_tag_edit(&mut self, filename: &str) -> Result<(), AssignError> {
        let target = self
            .files
            .get(filename)
            .cloned()
            .ok_or_else(|| AssignError::UnknownFile(filename.to_string()))?;
        self.open_session(vec![target], EditMode::Single)
    }

    /// Open a bulk tag editor over the selection
    ///
    /// # Errors
    ///
    /// Returns `AssignError::EmptyTargets` with nothing selected, or
    /// `AssignError::SessionAlreadyOpen`.
    pub fn begin_bulk_tag_edit(&mut self, mode: BulkMode) -> Result<(), AssignError> {
        let targets: Vec<File> = self
            .selection
            .selected_files(&self.files)
            .into_iter()
            .cloned()
            .collect();
        self.open_session(targets, EditMode::Bulk(mode))
    }

    /// # Errors
    ///
    /// Returns `AssignError::NoActiveSession` if no editor is open.
    pub fn move_tag(&mut self, id: TagId, direction: MoveDirection) -> Result<bool, AssignError> {
        let session = self.session.as_mut().ok_or(AssignError::NoActiveSession)?;
        Ok(session.move_tag(id, direction))
    }

    fn close_session(&mut self) -> Result<TagAssignmentSession, AssignError> {
        let session = self.session.take().ok_or(AssignError::NoActiveSession)?;
        self.drop_zone.set_enabled(true);
        Ok(session)
    }

    /// # Errors
    ///
    /// Returns `AssignError::NoActiveSession` if no editor is open.
    pub fn cancel_tag_edit(&mut self) -> Result<(), AssignError> {
        self.close_session()?.cancel();
        Ok(())
    }

    /// Send the open session, then clear the selection and reload
    ///
    /// # Errors
    ///
    /// Returns `AssignError::NoActiveSession` if no editor is open.
    pub fn commit_tag_edit(&mut self) -> Result<CommitReport, AssignError> {
        let session = self.close_session()?;
        let report = session.commit(&self.api, &mut self.log);
        self.selection.unselect_all();
        self.refresh();
        Ok(report)
    }

    // Timers

    pub fn tick(&mut self) {
        self.log.tick();
    }

    pub fn tick_at(&mut self, now: DateTime<Utc>) {
        self.log.tick_at(now);
    }
}
