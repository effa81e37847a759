//! In-memory drive server
//!
//! Behaves like the real server closely enough for the state core: tag
//! filters, search, sort, batch results and error statuses. Every call is
//! recorded so tests can assert on request order and payloads.

use super::error::{ApiError, ApiResult};
use super::{BatchItemResult, FileApi, FileUpdate, UploadItem};
use crate::model::{Color, File, NewTag, Tag, TagId};
use crate::query::{MatchMode, QueryDescriptor, SortDir, SortKey};
use chrono::{DateTime, TimeZone, Utc};
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// One call made against a `MockApi`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    ListFiles(QueryDescriptor),
    RecentFiles(usize),
    ListTags,
    UpdateFile { filename: String, update: FileUpdate },
    DeleteFiles(Vec<String>),
    UploadFiles { filenames: Vec<String>, tags: BTreeSet<TagId> },
    CreateTag(NewTag),
    UpdateTag(TagId, NewTag),
    DeleteTag(TagId),
    DownloadFiles(Vec<String>),
}

#[derive(Debug, Default)]
struct MockState {
    files: BTreeMap<String, File>,
    contents: BTreeMap<String, Vec<u8>>,
    tags: BTreeMap<TagId, Tag>,
    next_tag_id: TagId,
    failing: HashSet<String>,
    unavailable: bool,
    calls: Vec<RecordedCall>,
}

/// In-memory `FileApi`
#[derive(Debug, Default)]
pub struct MockApi {
    state: RefCell<MockState>,
}

fn not_found(what: &str) -> ApiError {
    ApiError::Status {
        status: 404,
        body: format!("{what} doesn't exist"),
    }
}

fn bad_request(body: impl Into<String>) -> ApiError {
    ApiError::Status {
        status: 400,
        body: body.into(),
    }
}

impl MockApi {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the tag table; new tags get ids above the highest seeded one
    #[must_use]
    pub fn with_tags(self, tags: impl IntoIterator<Item = Tag>) -> Self {
        {
            let mut state = self.state.borrow_mut();
            for tag in tags {
                state.next_tag_id = state.next_tag_id.max(tag.id);
                state.tags.insert(tag.id, tag);
            }
        }
        self
    }

    #[must_use]
    pub fn with_files(self, files: impl IntoIterator<Item = File>) -> Self {
        {
            let mut state = self.state.borrow_mut();
            for file in files {
                state.files.insert(file.filename.clone(), file);
            }
        }
        self
    }

    /// Make every per-file operation on `filename` fail with status 500
    #[must_use]
    pub fn failing_on(self, filename: impl Into<String>) -> Self {
        self.state.borrow_mut().failing.insert(filename.into());
        self
    }

    /// Simulate a server that answers every request with status 503
    pub fn set_unavailable(&self, unavailable: bool) {
        self.state.borrow_mut().unavailable = unavailable;
    }

    /// Small drive used by the CLI's offline mode
    #[must_use]
    pub fn demo() -> Self {
        let at = |d: u32, h: u32| -> DateTime<Utc> {
            Utc.with_ymd_and_hms(2024, 3, d, h, 0, 0)
                .single()
                .unwrap_or_default()
        };
        Self::new()
            .with_tags([
                Tag::new(1, "work", Color::rgb(0x4a, 0x90, 0xe2)),
                Tag::new(2, "personal", Color::rgb(0x7e, 0xd3, 0x21)),
                Tag::new(3, "tax", Color::rgb(0xd0, 0x02, 0x1b)),
                Tag::new(4, "photos", Color::rgb(0xf5, 0xa6, 0x23)),
            ])
            .with_files([
                File::new("budget.xlsx", 48_213, at(2, 9)).with_tags([1, 3]),
                File::new("holiday.jpg", 2_481_904, at(5, 18)).with_tags([2, 4]),
                File::new("invoice-0193.pdf", 91_337, at(7, 11))
                    .with_tags([1, 3])
                    .with_description("March invoice"),
                File::new("notes.txt", 1_024, at(9, 20)).with_tags([2]),
                File::new("readme.md", 3_512, at(12, 8)),
            ])
    }

    /// Calls received so far, oldest first
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.borrow().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    /// Stored files in name order
    #[must_use]
    pub fn files(&self) -> Vec<File> {
        self.state.borrow().files.values().cloned().collect()
    }

    #[must_use]
    pub fn file(&self, filename: &str) -> Option<File> {
        self.state.borrow().files.get(filename).cloned()
    }

    #[must_use]
    pub fn tags(&self) -> Vec<Tag> {
        self.state.borrow().tags.values().cloned().collect()
    }

    /// Record `call`, then fail if the server is marked unavailable
    fn record(&self, call: RecordedCall) -> ApiResult<()> {
        let mut state = self.state.borrow_mut();
        state.calls.push(call);
        if state.unavailable {
            return Err(ApiError::Status {
                status: 503,
                body: "service unavailable".to_string(),
            });
        }
        Ok(())
    }
}

fn matches_query(file: &File, query: &QueryDescriptor) -> bool {
    let tags_match = query.tag_filter.is_empty()
        || match query.match_mode {
            MatchMode::And => query.tag_filter.iter().all(|id| file.has_tag(*id)),
            MatchMode::Or => query.tag_filter.iter().any(|id| file.has_tag(*id)),
        };
    let text_match = query.free_text.is_empty()
        || file
            .filename
            .to_lowercase()
            .contains(&query.free_text.to_lowercase());
    tags_match && text_match
}

fn sort_files(files: &mut [File], key: SortKey, dir: SortDir) {
    match key {
        SortKey::Name => files.sort_by(|a, b| a.filename.cmp(&b.filename)),
        SortKey::Size => {
            files.sort_by(|a, b| a.size.cmp(&b.size).then(a.filename.cmp(&b.filename)));
        }
        SortKey::Time => {
            files.sort_by(|a, b| a.added_at.cmp(&b.added_at).then(a.filename.cmp(&b.filename)));
        }
    }
    if dir == SortDir::Desc {
        files.reverse();
    }
}

impl FileApi for MockApi {
    fn list_files(&self, query: &QueryDescriptor) -> ApiResult<Vec<File>> {
        self.record(RecordedCall::ListFiles(query.clone()))?;
        let state = self.state.borrow();
        let mut files: Vec<File> = state
            .files
            .values()
            .filter(|f| matches_query(f, query))
            .cloned()
            .collect();
        sort_files(&mut files, query.sort_key, query.sort_dir);
        Ok(files)
    }

    fn recent_files(&self, number: usize) -> ApiResult<Vec<File>> {
        self.record(RecordedCall::RecentFiles(number))?;
        let mut files = self.files();
        sort_files(&mut files, SortKey::Time, SortDir::Desc);
        files.truncate(number);
        Ok(files)
    }

    fn list_tags(&self) -> ApiResult<Vec<Tag>> {
        self.record(RecordedCall::ListTags)?;
        Ok(self.tags())
    }

    fn update_file(&self, filename: &str, update: &FileUpdate) -> ApiResult<()> {
        self.record(RecordedCall::UpdateFile {
            filename: filename.to_string(),
            update: update.clone(),
        })?;
        let mut state = self.state.borrow_mut();
        if state.failing.contains(filename) {
            return Err(ApiError::Status {
                status: 500,
                body: format!("can't update {filename}"),
            });
        }
        if !state.files.contains_key(filename) {
            return Err(not_found("file"));
        }

        match update {
            FileUpdate::Rename(new_name) => {
                if state.files.contains_key(new_name) {
                    return Err(bad_request("file with new name already exists"));
                }
                if let Some(mut file) = state.files.remove(filename) {
                    file.filename.clone_from(new_name);
                    state.files.insert(new_name.clone(), file);
                }
                if let Some(content) = state.contents.remove(filename) {
                    state.contents.insert(new_name.clone(), content);
                }
            }
            FileUpdate::Tags(tags) => {
                if let Some(unknown) = tags.iter().find(|id| !state.tags.contains_key(*id)) {
                    return Err(bad_request(format!("tag {unknown} doesn't exist")));
                }
                if let Some(file) = state.files.get_mut(filename) {
                    file.tags.clone_from(tags);
                }
            }
            FileUpdate::Description(text) => {
                if let Some(file) = state.files.get_mut(filename) {
                    file.description.clone_from(text);
                }
            }
        }
        Ok(())
    }

    fn delete_files(&self, filenames: &[String]) -> ApiResult<Vec<BatchItemResult>> {
        self.record(RecordedCall::DeleteFiles(filenames.to_vec()))?;
        let mut state = self.state.borrow_mut();
        let results = filenames
            .iter()
            .map(|name| {
                if state.failing.contains(name) {
                    BatchItemResult::failed(name, "can't delete file")
                } else if state.files.remove(name).is_some() {
                    state.contents.remove(name);
                    BatchItemResult::ok(name, "was deleted")
                } else {
                    BatchItemResult::failed(name, "file doesn't exist")
                }
            })
            .collect();
        Ok(results)
    }

    fn upload_files(
        &self,
        items: &[UploadItem],
        tags: &BTreeSet<TagId>,
    ) -> ApiResult<Vec<BatchItemResult>> {
        self.record(RecordedCall::UploadFiles {
            filenames: items.iter().map(|i| i.filename.clone()).collect(),
            tags: tags.clone(),
        })?;
        let mut state = self.state.borrow_mut();
        let known: BTreeSet<TagId> = tags
            .iter()
            .copied()
            .filter(|id| state.tags.contains_key(id))
            .collect();
        let results = items
            .iter()
            .map(|item| {
                if state.failing.contains(&item.filename) {
                    BatchItemResult::failed(&item.filename, "can't save file")
                } else if state.files.contains_key(&item.filename) {
                    BatchItemResult::failed(&item.filename, "file already exists")
                } else {
                    let file = File::new(&item.filename, item.content.len() as u64, Utc::now())
                        .with_tags(known.iter().copied());
                    state.files.insert(item.filename.clone(), file);
                    state
                        .contents
                        .insert(item.filename.clone(), item.content.clone());
                    BatchItemResult::ok(&item.filename, "uploaded")
                }
            })
            .collect();
        Ok(results)
    }

    fn create_tag(&self, tag: &NewTag) -> ApiResult<()> {
        self.record(RecordedCall::CreateTag(tag.clone()))?;
        let mut state = self.state.borrow_mut();
        state.next_tag_id += 1;
        let id = state.next_tag_id;
        state.tags.insert(id, Tag::new(id, tag.name(), tag.color()));
        Ok(())
    }

    fn update_tag(&self, id: TagId, tag: &NewTag) -> ApiResult<()> {
        self.record(RecordedCall::UpdateTag(id, tag.clone()))?;
        let mut state = self.state.borrow_mut();
        let existing = state.tags.get_mut(&id).ok_or_else(|| not_found("tag"))?;
        existing.name = tag.name().to_string();
        existing.color = tag.color();
        Ok(())
    }

    fn delete_tag(&self, id: TagId) -> ApiResult<()> {
        self.record(RecordedCall::DeleteTag(id))?;
        let mut state = self.state.borrow_mut();
        if state.tags.remove(&id).is_none() {
            return Err(not_found("tag"));
        }
        for file in state.files.values_mut() {
            file.tags.remove(&id);
        }
        Ok(())
    }

    fn download_files(&self, filenames: &[String]) -> ApiResult<Vec<u8>> {
        self.record(RecordedCall::DownloadFiles(filenames.to_vec()))?;
        let state = self.state.borrow();
        let mut archive = Vec::new();
        for name in filenames {
            if !state.files.contains_key(name) {
                return Err(not_found("file"));
            }
            if let Some(content) = state.contents.get(name) {
                archive.extend_from_slice(content);
            }
        }
        Ok(archive)
    }
}
