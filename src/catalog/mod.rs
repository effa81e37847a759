//! Authoritative caches of server data
//!
//! `TagCatalog` holds every known tag, `FileCatalog` holds the listing for the
//! active query. Both are replaced wholesale on each accepted refresh; there
//! is no partial patching.
//!
//! # Refresh ordering
//!
//! A refresh is a two-step exchange: `begin_refresh()` hands out a
//! `RefreshTicket` before the request goes out, and `apply_refresh()` takes
//! the ticket back with the response. The catalog's `RefreshPolicy` decides
//! whether a response that was overtaken by a newer request still lands.

use crate::model::{File, Tag, TagId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Which of several overlapping refresh responses is authoritative
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RefreshPolicy {
    /// Only the most recently issued request may apply its result
    #[default]
    LastInitiated,
    /// Every response is applied in the order it completes
    LastCompleted,
}

/// Handle for one in-flight refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RefreshTicket(u64);

#[derive(Debug, Clone, Default)]
struct RefreshTracker {
    policy: RefreshPolicy,
    issued: u64,
}

impl RefreshTracker {
    const fn new(policy: RefreshPolicy) -> Self {
        Self {
            policy,
            issued: 0,
        }
    }

    const fn begin(&mut self) -> RefreshTicket {
        self.issued += 1;
        RefreshTicket(self.issued)
    }

    const fn accept(&self, ticket: RefreshTicket) -> bool {
        match self.policy {
            RefreshPolicy::LastInitiated => ticket.0 == self.issued,
            RefreshPolicy::LastCompleted => true,
        }
    }
}

/// Cache of all tags, keyed by id
#[derive(Debug, Clone, Default)]
pub struct TagCatalog {
    tags: BTreeMap<TagId, Tag>,
    tracker: RefreshTracker,
}

impl TagCatalog {
    #[must_use]
    pub fn new(policy: RefreshPolicy) -> Self {
        Self {
            tags: BTreeMap::new(),
            tracker: RefreshTracker::new(policy),
        }
    }

    /// Build a catalog that already holds `tags`
    #[must_use]
    pub fn with_tags(tags: impl IntoIterator<Item = Tag>) -> Self {
        let mut catalog = Self::default();
        catalog.replace(tags);
        catalog
    }

    pub const fn begin_refresh(&mut self) -> RefreshTicket {
        self.tracker.begin()
    }

    /// Apply a refresh response. Returns `false` if the ticket was overtaken
    /// and the data was discarded.
    pub fn apply_refresh(&mut self, ticket: RefreshTicket, tags: Vec<Tag>) -> bool {
        if !self.tracker.accept(ticket) {
            tracing::debug!(?ticket, "discarding stale tag refresh");
            return false;
        }
        self.replace(tags);
        true
    }

    fn replace(&mut self, tags: impl IntoIterator<Item = Tag>) {
        self.tags = tags.into_iter().map(|t| (t.id, t)).collect();
    }

    #[must_use]
    pub fn get(&self, id: TagId) -> Option<&Tag> {
        self.tags.get(&id)
    }

    #[must_use]
    pub fn contains(&self, id: TagId) -> bool {
        self.tags.contains_key(&id)
    }

    /// Linear lookup by name; the lowest id wins when names collide
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&Tag> {
        self.tags.values().find(|t| t.name == name)
    }

    #[must_use]
    pub fn ids(&self) -> BTreeSet<TagId> {
        self.tags.keys().copied().collect()
    }

    /// Tags in id order
    pub fn iter(&self) -> impl Iterator<Item = &Tag> {
        self.tags.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

/// Cache of the current file listing, in server order
#[derive(Debug, Clone, Default)]
pub struct FileCatalog {
    files: Vec<File>,
    tracker: RefreshTracker,
}

impl FileCatalog {
    #[must_use]
    pub fn new(policy: RefreshPolicy) -> Self {
        Self {
            files: Vec::new(),
            tracker: RefreshTracker::new(policy),
        }
    }

    #[must_use]
    pub fn with_files(files: Vec<File>) -> Self {
        let mut catalog = Self::default();
        catalog.replace(files);
        catalog
    }

    pub const fn begin_refresh(&mut self) -> RefreshTicket {
        self.tracker.begin()
    }

    /// Apply a refresh response. Returns `false` if the ticket was overtaken
    /// and the data was discarded.
    pub fn apply_refresh(&mut self, ticket: RefreshTicket, files: Vec<File>) -> bool {
        if !self.tracker.accept(ticket) {
            tracing::debug!(?ticket, "discarding stale file refresh");
            return false;
        }
        self.replace(files);
        true
    }

    fn replace(&mut self, files: Vec<File>) {
        let mut seen = HashSet::with_capacity(files.len());
        self.files = files
            .into_iter()
            .filter(|f| {
                let fresh = seen.insert(f.filename.clone());
                if !fresh {
                    tracing::warn!(filename = %f.filename, "duplicate filename in listing");
                }
                fresh
            })
            .collect();
    }

    #[must_use]
    pub fn files(&self) -> &[File] {
        &self.files
    }

    #[must_use]
    pub fn get(&self, filename: &str) -> Option<&File> {
        self.files.iter().find(|f| f.filename == filename)
    }

    #[must_use]
    pub fn contains(&self, filename: &str) -> bool {
        self.get(filename).is_some()
    }

    #[must_use]
    pub fn keys(&self) -> BTreeSet<String> {
        self.files.iter().map(|f| f.filename.clone()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_files, sample_tags};

    #[test]
    fn test_tag_catalog_replaces_wholesale() {
        let mut catalog = TagCatalog::new(RefreshPolicy::LastInitiated);
        let ticket = catalog.begin_refresh();
        assert!(catalog.apply_refresh(ticket, sample_tags()));
        assert_eq!(catalog.len(), 4);

        let ticket = catalog.begin_refresh();
        assert!(catalog.apply_refresh(ticket, vec![sample_tags().remove(0)]));
        assert_eq!(catalog.ids(), BTreeSet::from([1]));
    }

    #[test]
    fn test_stale_ticket_dropped_under_last_initiated() {
        let mut catalog = FileCatalog::new(RefreshPolicy::LastInitiated);
        let old = catalog.begin_refresh();
        let new = catalog.begin_refresh();

        assert!(catalog.apply_refresh(new, sample_files()));
        assert!(!catalog.apply_refresh(old, Vec::new()));
        assert_eq!(catalog.len(), sample_files().len());
    }

    #[test]
    fn test_stale_ticket_applied_under_last_completed() {
        let mut catalog = FileCatalog::new(RefreshPolicy::LastCompleted);
        let old = catalog.begin_refresh();
        let new = catalog.begin_refresh();

        assert!(catalog.apply_refresh(new, sample_files()));
        assert!(catalog.apply_refresh(old, Vec::new()));
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_duplicate_filenames_first_wins() {
        let mut files = sample_files();
        let mut dup = files[0].clone();
        dup.size = 1;
        files.push(dup);

        let catalog = FileCatalog::with_files(files);
        assert_eq!(catalog.len(), sample_files().len());
        assert_ne!(catalog.get(&sample_files()[0].filename).unwrap().size, 1);
    }

    #[test]
    fn test_find_by_name_lowest_id_wins() {
        let mut tags = sample_tags();
        tags.push(Tag::new(99, tags[0].name.clone(), tags[0].color));
        let catalog = TagCatalog::with_tags(tags);
        assert_eq!(catalog.find_by_name("rust").unwrap().id, 1);
    }
}
