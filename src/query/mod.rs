//! Search query state
//!
//! `QueryState` holds what the top bar shows: picked tag filters, free text,
//! match mode and the current sort column. `build_query()` snapshots it into
//! an immutable `QueryDescriptor` that the listing request consumes.
//!
//! # Sort reset rule
//!
//! Sort order is relative to the current result set. Any change to the
//! filter (tags, text, match mode) resets sorting to `name, asc`; only a
//! pure sort change leaves the filter untouched.

use crate::catalog::TagCatalog;
use crate::model::{Tag, TagId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Column the listing is sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Name,
    Size,
    Time,
}

impl SortKey {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Size => "size",
            Self::Time => "time",
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

impl SortDir {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// How multiple tag filters combine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Files must carry every picked tag
    #[default]
    And,
    /// Files must carry at least one picked tag
    Or,
}

impl MatchMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
        }
    }

    /// Phrase for listing headers
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::And => "all of",
            Self::Or => "any of",
        }
    }
}

/// Immutable snapshot of a search, ready to be sent
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryDescriptor {
    pub free_text: String,
    pub tag_filter: BTreeSet<TagId>,
    pub match_mode: MatchMode,
    pub sort_key: SortKey,
    pub sort_dir: SortDir,
}

impl QueryDescriptor {
    /// Query parameters in canonical order. Empty `tags` and `search` are
    /// omitted.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(5);
        if !self.tag_filter.is_empty() {
            let ids: Vec<String> = self.tag_filter.iter().map(ToString::to_string).collect();
            pairs.push(("tags", ids.join(",")));
        }
        if !self.free_text.is_empty() {
            pairs.push(("search", self.free_text.clone()));
        }
        pairs.push(("sort", self.sort_key.as_str().to_string()));
        pairs.push(("order", self.sort_dir.as_str().to_string()));
        pairs.push(("mode", self.match_mode.as_str().to_string()));
        pairs
    }

    /// URL query string, e.g. `tags=5&sort=size&order=desc&mode=and`
    #[must_use]
    pub fn to_query_string(&self) -> String {
        self.query_pairs()
            .into_iter()
            .map(|(key, value)| match key {
                // Comma-joined integers need no escaping
                "tags" => format!("{key}={value}"),
                _ => format!("{key}={}", urlencoding::encode(&value)),
            })
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl fmt::Display for QueryDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_string())
    }
}

/// Mutable search state behind the top bar
#[derive(Debug, Clone, Default)]
pub struct QueryState {
    free_text: String,
    /// Picked tags, in pick order, without duplicates
    tag_filter: Vec<TagId>,
    match_mode: MatchMode,
    sort_key: SortKey,
    sort_dir: SortDir,
}

impl QueryState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pick a tag as a filter
    ///
    /// No-op returning `false` if the tag is already picked or unknown to
    /// `catalog`.
    pub fn add_tag_filter(&mut self, id: TagId, catalog: &TagCatalog) -> bool {
        if self.tag_filter.contains(&id) || !catalog.contains(id) {
            return false;
        }
        self.tag_filter.push(id);
        self.reset_sort();
        true
    }

    /// Drop a picked tag. No-op returning `false` if it was not picked.
    pub fn remove_tag_filter(&mut self, id: TagId) -> bool {
        let Some(index) = self.tag_filter.iter().position(|&t| t == id) else {
            return false;
        };
        self.tag_filter.remove(index);
        self.reset_sort();
        true
    }

    /// Returns `true` if the text changed
    pub fn set_free_text(&mut self, text: impl Into<String>) -> bool {
        let text = text.into();
        if text == self.free_text {
            return false;
        }
        self.free_text = text;
        self.reset_sort();
        true
    }

    /// Returns `true` if the mode changed
    pub fn set_match_mode(&mut self, mode: MatchMode) -> bool {
        if mode == self.match_mode {
            return false;
        }
        self.match_mode = mode;
        self.reset_sort();
        true
    }

    /// Explicit sort; leaves the filter untouched
    pub const fn set_sort(&mut self, key: SortKey, dir: SortDir) {
        self.sort_key = key;
        self.sort_dir = dir;
    }

    /// Column-header click: same key flips direction, a new key starts
    /// ascending
    pub fn toggle_sort(&mut self, key: SortKey) {
        if self.sort_key == key {
            self.sort_dir = self.sort_dir.flipped();
        } else {
            self.sort_key = key;
            self.sort_dir = SortDir::Asc;
        }
    }

    pub const fn reset_sort(&mut self) {
        self.sort_key = SortKey::Name;
        self.sort_dir = SortDir::Asc;
    }

    /// Drop picked tags that are no longer in `catalog`
    ///
    /// Counts as a filter change: resets the sort when anything was dropped.
    pub fn retain_known(&mut self, catalog: &TagCatalog) -> bool {
        let before = self.tag_filter.len();
        self.tag_filter.retain(|&id| catalog.contains(id));
        let changed = self.tag_filter.len() != before;
        if changed {
            self.reset_sort();
        }
        changed
    }

    /// Picked tags in pick order
    #[must_use]
    pub fn picked_tags<'a>(&self, catalog: &'a TagCatalog) -> Vec<&'a Tag> {
        self.tag_filter
            .iter()
            .filter_map(|&id| catalog.get(id))
            .collect()
    }

    /// Catalog tags that are not picked, in id order
    #[must_use]
    pub fn unused_tags<'a>(&self, catalog: &'a TagCatalog) -> Vec<&'a Tag> {
        catalog
            .iter()
            .filter(|t| !self.tag_filter.contains(&t.id))
            .collect()
    }

    /// Snapshot the current state
    #[must_use]
    pub fn build_query(&self) -> QueryDescriptor {
        QueryDescriptor {
            free_text: self.free_text.clone(),
            tag_filter: self.tag_filter.iter().copied().collect(),
            match_mode: self.match_mode,
            sort_key: self.sort_key,
            sort_dir: self.sort_dir,
        }
    }

    #[must_use]
    pub fn free_text(&self) -> &str {
        &self.free_text
    }

    #[must_use]
    pub fn tag_filter(&self) -> &[TagId] {
        &self.tag_filter
    }

    #[must_use]
    pub const fn match_mode(&self) -> MatchMode {
        self.match_mode
    }

    #[must_use]
    pub const fn sort(&self) -> (SortKey, SortDir) {
        (self.sort_key, self.sort_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_tags;

    fn catalog() -> TagCatalog {
        TagCatalog::with_tags(sample_tags())
    }

    #[test]
    fn test_add_tag_filter_rejects_duplicates_and_unknown() {
        let catalog = catalog();
        let mut query = QueryState::new();

        assert!(query.add_tag_filter(1, &catalog));
        assert!(!query.add_tag_filter(1, &catalog));
        assert!(!query.add_tag_filter(42, &catalog));
        assert_eq!(query.tag_filter(), &[1]);
    }

    #[test]
    fn test_filter_sequence_keeps_set_semantics() {
        let catalog = catalog();
        let mut query = QueryState::new();
        let ops: [(bool, TagId); 9] = [
            (true, 2),
            (true, 3),
            (true, 2),
            (false, 3),
            (true, 99),
            (false, 7),
            (true, 3),
            (true, 1),
            (false, 2),
        ];
        for (add, id) in ops {
            if add {
                query.add_tag_filter(id, &catalog);
            } else {
                query.remove_tag_filter(id);
            }
            let unique: BTreeSet<_> = query.tag_filter().iter().collect();
            assert_eq!(unique.len(), query.tag_filter().len());
            assert!(query.tag_filter().iter().all(|&id| catalog.contains(id)));
        }
        assert_eq!(query.tag_filter(), &[3, 1]);
    }

    #[test]
    fn test_filter_changes_reset_sort() {
        let catalog = catalog();
        let mut query = QueryState::new();

        query.set_sort(SortKey::Size, SortDir::Desc);
        query.add_tag_filter(2, &catalog);
        assert_eq!(query.sort(), (SortKey::Name, SortDir::Asc));

        query.set_sort(SortKey::Time, SortDir::Desc);
        query.set_free_text("invoice");
        assert_eq!(query.sort(), (SortKey::Name, SortDir::Asc));

        query.set_sort(SortKey::Time, SortDir::Desc);
        query.remove_tag_filter(2);
        assert_eq!(query.sort(), (SortKey::Name, SortDir::Asc));

        query.set_sort(SortKey::Size, SortDir::Asc);
        query.set_match_mode(MatchMode::Or);
        assert_eq!(query.sort(), (SortKey::Name, SortDir::Asc));
    }

    #[test]
    fn test_noop_mutation_keeps_sort() {
        let catalog = catalog();
        let mut query = QueryState::new();
        query.set_sort(SortKey::Size, SortDir::Desc);

        assert!(!query.add_tag_filter(42, &catalog));
        assert!(!query.set_free_text(""));
        assert!(!query.set_match_mode(MatchMode::And));
        assert_eq!(query.sort(), (SortKey::Size, SortDir::Desc));
    }

    #[test]
    fn test_toggle_sort_same_key_flips_without_touching_filter() {
        let catalog = catalog();
        let mut query = QueryState::new();
        query.add_tag_filter(4, &catalog);
        query.set_free_text("cat");

        query.toggle_sort(SortKey::Name);
        assert_eq!(query.sort(), (SortKey::Name, SortDir::Desc));
        query.toggle_sort(SortKey::Name);
        assert_eq!(query.sort(), (SortKey::Name, SortDir::Asc));

        assert_eq!(query.tag_filter(), &[4]);
        assert_eq!(query.free_text(), "cat");
    }

    #[test]
    fn test_toggle_sort_new_key_starts_ascending() {
        let mut query = QueryState::new();
        query.toggle_sort(SortKey::Name);
        assert_eq!(query.sort(), (SortKey::Name, SortDir::Desc));

        query.toggle_sort(SortKey::Size);
        assert_eq!(query.sort(), (SortKey::Size, SortDir::Asc));
    }

    #[test]
    fn test_descriptor_query_string() {
        let descriptor = QueryDescriptor {
            free_text: String::new(),
            tag_filter: BTreeSet::from([5]),
            match_mode: MatchMode::And,
            sort_key: SortKey::Size,
            sort_dir: SortDir::Desc,
        };
        assert_eq!(
            descriptor.to_query_string(),
            "tags=5&sort=size&order=desc&mode=and"
        );
    }

    #[test]
    fn test_build_query_snapshots_state() {
        let catalog = catalog();
        let mut query = QueryState::new();
        query.add_tag_filter(4, &catalog);
        query.add_tag_filter(2, &catalog);
        query.set_sort(SortKey::Time, SortDir::Desc);

        let descriptor = query.build_query();
        query.remove_tag_filter(4);

        assert_eq!(descriptor.tag_filter, BTreeSet::from([2, 4]));
        assert_eq!(descriptor.sort_key, SortKey::Time);
        assert_eq!(
            descriptor.to_query_string(),
            "tags=2,4&sort=time&order=desc&mode=and"
        );
    }

    #[test]
    fn test_descriptor_encodes_search_text() {
        let descriptor = QueryDescriptor {
            free_text: "tax 2019&co".to_string(),
            tag_filter: BTreeSet::from([3, 1]),
            match_mode: MatchMode::Or,
            ..QueryDescriptor::default()
        };
        assert_eq!(
            descriptor.to_query_string(),
            "tags=1,3&search=tax%202019%26co&sort=name&order=asc&mode=or"
        );
    }

    #[test]
    fn test_retain_known_drops_deleted_tags() {
        let mut query = QueryState::new();
        query.add_tag_filter(1, &catalog());
        query.add_tag_filter(2, &catalog());
        query.set_sort(SortKey::Time, SortDir::Desc);

        let shrunk = TagCatalog::with_tags(sample_tags().into_iter().filter(|t| t.id != 2));
        assert!(query.retain_known(&shrunk));
        assert_eq!(query.tag_filter(), &[1]);
        assert_eq!(query.sort(), (SortKey::Name, SortDir::Asc));
        assert!(!query.retain_known(&shrunk));
    }

    #[test]
    fn test_picked_and_unused_partition_catalog() {
        let catalog = catalog();
        let mut query = QueryState::new();
        query.add_tag_filter(3, &catalog);
        query.add_tag_filter(1, &catalog);

        let picked: Vec<_> = query.picked_tags(&catalog).iter().map(|t| t.id).collect();
        let unused: Vec<_> = query.unused_tags(&catalog).iter().map(|t| t.id).collect();
        assert_eq!(picked, vec![3, 1]);
        assert_eq!(unused, vec![2, 4]);
    }
}
