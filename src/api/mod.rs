//! Server boundary
//!
//! `FileApi` is the only way the state core talks to the drive server. Two
//! implementations ship with the crate:
//!
//! - **`HttpApi`**: blocking `reqwest` client for a real server
//! - **`MockApi`**: in-memory server for tests and offline demos
//!
//! # Endpoints
//!
//! ```text
//! GET    /api/files?tags=&search=&sort=&order=&mode=   -> [File]
//! GET    /api/files/recent?number=                     -> [File]
//! PUT    /api/files      file + new-name|tags|description
//! DELETE /api/files?file=a,b                           -> [BatchItemResult]
//! POST   /api/files?tags=   multipart "files"          -> [BatchItemResult]
//! GET    /api/files/download?file=a,b                  -> archive bytes
//! GET    /api/tags                                     -> [Tag] | {id: Tag}
//! POST   /api/tags   name, color
//! PUT    /api/tags   id, name, color
//! DELETE /api/tags?id=
//! ```

pub mod error;
pub mod http;
pub mod mock;

pub use error::{ApiError, ApiResult};
pub use http::HttpApi;
pub use mock::{MockApi, RecordedCall};

use crate::model::{File, NewTag, Tag, TagId};
use crate::query::QueryDescriptor;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Literal sent in place of an empty tag list, so that "clear all tags" is
/// distinguishable from "no change"
pub const EMPTY_TAGS_SENTINEL: &str = "empty";

/// Per-file result of a batch delete or upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchItemResult {
    pub filename: String,
    pub is_error: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub error: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub status: String,
}

impl BatchItemResult {
    #[must_use]
    pub fn ok(filename: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            is_error: false,
            error: String::new(),
            status: status.into(),
        }
    }

    #[must_use]
    pub fn failed(filename: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            is_error: true,
            error: error.into(),
            status: String::new(),
        }
    }

    /// `"<filename> <status>"` or `"<filename> <error>"`
    #[must_use]
    pub fn message(&self) -> String {
        let detail = if self.is_error { &self.error } else { &self.status };
        format!("{} {}", self.filename, detail)
    }
}

/// One change to a file, sent as the form body of `PUT /api/files`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileUpdate {
    Rename(String),
    Tags(BTreeSet<TagId>),
    Description(String),
}

impl FileUpdate {
    /// Form fields for `filename`, `file` first
    #[must_use]
    pub fn form_fields(&self, filename: &str) -> Vec<(&'static str, String)> {
        let field = match self {
            Self::Rename(new_name) => ("new-name", new_name.clone()),
            Self::Tags(tags) => ("tags", encode_tag_list(tags)),
            Self::Description(text) => ("description", text.clone()),
        };
        vec![("file", filename.to_string()), field]
    }
}

impl fmt::Display for FileUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rename(new_name) => write!(f, "rename to '{new_name}'"),
            Self::Tags(tags) => write!(f, "set tags [{}]", encode_tag_list(tags)),
            Self::Description(_) => f.write_str("change description"),
        }
    }
}

/// Comma-separated ids, or the `empty` sentinel
#[must_use]
pub fn encode_tag_list(tags: &BTreeSet<TagId>) -> String {
    if tags.is_empty() {
        return EMPTY_TAGS_SENTINEL.to_string();
    }
    tags.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Inverse of `encode_tag_list`; unparsable ids are skipped
#[must_use]
pub fn decode_tag_list(raw: &str) -> BTreeSet<TagId> {
    if raw == EMPTY_TAGS_SENTINEL {
        return BTreeSet::new();
    }
    raw.split(',')
        .filter_map(|s| s.trim().parse().ok())
        .collect()
}

/// A local file to upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadItem {
    pub filename: String,
    pub content: Vec<u8>,
}

impl UploadItem {
    #[must_use]
    pub fn new(filename: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content,
        }
    }
}

/// Operations offered by the drive server
///
/// Implementations are synchronous: each call returns once the server has
/// answered. Callers that need non-blocking behavior run calls elsewhere and
/// apply results through the catalog ticket API.
pub trait FileApi {
    /// Listing for a query
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure, error status or bad JSON.
    fn list_files(&self, query: &QueryDescriptor) -> ApiResult<Vec<File>>;

    /// Most recently added files
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure, error status or bad JSON.
    fn recent_files(&self, number: usize) -> ApiResult<Vec<File>>;

    /// All tags
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure, error status or bad JSON.
    fn list_tags(&self) -> ApiResult<Vec<Tag>>;

    /// Apply one change to a file
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the server rejects it.
    fn update_file(&self, filename: &str, update: &FileUpdate) -> ApiResult<()>;

    /// Delete files; per-file outcomes are in the result
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the whole request fails.
    fn delete_files(&self, filenames: &[String]) -> ApiResult<Vec<BatchItemResult>>;

    /// Upload files with initial tags; per-file outcomes are in the result
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the whole request fails.
    fn upload_files(
        &self,
        items: &[UploadItem],
        tags: &BTreeSet<TagId>,
    ) -> ApiResult<Vec<BatchItemResult>>;

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the server rejects it.
    fn create_tag(&self, tag: &NewTag) -> ApiResult<()>;

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the server rejects it.
    fn update_tag(&self, id: TagId, tag: &NewTag) -> ApiResult<()>;

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the server rejects it.
    fn delete_tag(&self, id: TagId) -> ApiResult<()>;

    /// Archive of the named files
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the server rejects it.
    fn download_files(&self, filenames: &[String]) -> ApiResult<Vec<u8>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_tag_set_uses_sentinel() {
        let update = FileUpdate::Tags(BTreeSet::new());
        assert_eq!(
            update.form_fields("a.txt"),
            vec![("file", "a.txt".to_string()), ("tags", "empty".to_string())]
        );
    }

    #[test]
    fn test_tag_list_is_sorted_csv() {
        let tags = BTreeSet::from([9, 2, 5]);
        assert_eq!(encode_tag_list(&tags), "2,5,9");
        assert_eq!(decode_tag_list("2,5,9"), tags);
        assert!(decode_tag_list("empty").is_empty());
    }

    #[test]
    fn test_rename_and_description_fields() {
        let rename = FileUpdate::Rename("b.txt".into());
        assert_eq!(rename.form_fields("a.txt")[1], ("new-name", "b.txt".to_string()));

        let describe = FileUpdate::Description("draft".into());
        assert_eq!(describe.form_fields("a.txt")[1], ("description", "draft".to_string()));
    }

    #[test]
    fn test_batch_result_message() {
        assert_eq!(BatchItemResult::ok("a.txt", "deleted").message(), "a.txt deleted");
        assert_eq!(
            BatchItemResult::failed("b.txt", "permission denied").message(),
            "b.txt permission denied"
        );
    }

    #[test]
    fn test_batch_result_wire_format() {
        let json = r#"[{"filename":"a.txt","isError":true,"error":"not found","status":""}]"#;
        let results: Vec<BatchItemResult> = serde_json::from_str(json).unwrap();
        assert!(results[0].is_error);
        assert_eq!(results[0].error, "not found");
    }
}
