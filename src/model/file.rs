//! Files as returned by the listing endpoints

use super::error::ValidationError;
use super::tag::TagId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;

/// A stored file. `filename` is the unique key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct File {
    pub filename: String,

    #[serde(default)]
    pub size: u64,

    #[serde(rename = "addTime")]
    pub added_at: DateTime<Utc>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: BTreeSet<TagId>,

    #[serde(default)]
    pub description: String,

    #[serde(rename = "preview", default, skip_serializing_if = "Option::is_none")]
    pub preview_ref: Option<String>,
}

impl File {
    #[must_use]
    pub fn new(filename: impl Into<String>, size: u64, added_at: DateTime<Utc>) -> Self {
        Self {
            filename: filename.into(),
            size,
            added_at,
            tags: BTreeSet::new(),
            description: String::new(),
            preview_ref: None,
        }
    }

    /// Builder-style tag assignment, handy for fixtures
    #[must_use]
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = TagId>) -> Self {
        self.tags = tags.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn has_tag(&self, id: TagId) -> bool {
        self.tags.contains(&id)
    }
}

/// Go servers encode an empty slice as `null`
fn null_as_empty<'de, D>(deserializer: D) -> Result<BTreeSet<TagId>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<BTreeSet<TagId>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Reject empty or whitespace-only filenames
///
/// # Errors
///
/// Returns `ValidationError::EmptyFilename` for blank input.
pub fn validate_filename(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyFilename);
    }
    Ok(())
}
