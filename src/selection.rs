//! Multi-select state over the current file listing
//!
//! The selection never re-validates itself against the listing. Whoever
//! refreshes or mutates the `FileCatalog` is responsible for calling
//! `unselect_all()` afterwards, so stale keys cannot survive a refresh.

use crate::catalog::FileCatalog;
use crate::model::File;
use std::collections::BTreeSet;
use thiserror::Error;

/// Selection errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SelectionError {
    /// The key is not part of the current listing
    #[error("File not in current listing: {0}")]
    UnknownFile(String),
}

/// Set of selected filenames
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    selected: BTreeSet<String>,
}

impl SelectionState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Select every file in the listing
    pub fn select_all(&mut self, catalog: &FileCatalog) {
        self.selected = catalog.keys();
    }

    pub fn unselect_all(&mut self) {
        self.selected.clear();
    }

    /// Flip one file. Returns its new state.
    ///
    /// # Errors
    ///
    /// Returns `SelectionError::UnknownFile` if `key` is not in `catalog`.
    pub fn toggle(&mut self, key: &str, catalog: &FileCatalog) -> Result<bool, SelectionError> {
        if self.selected.remove(key) {
            return Ok(false);
        }
        if !catalog.contains(key) {
            return Err(SelectionError::UnknownFile(key.to_string()));
        }
        self.selected.insert(key.to_string());
        Ok(true)
    }

    /// True iff the listing is non-empty and every file in it is selected
    #[must_use]
    pub fn is_all_selected(&self, catalog: &FileCatalog) -> bool {
        !catalog.is_empty() && self.selected == catalog.keys()
    }

    /// Some, but not all, files are selected
    #[must_use]
    pub fn is_partial(&self, catalog: &FileCatalog) -> bool {
        !self.selected.is_empty() && !self.is_all_selected(catalog)
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.selected.len()
    }

    /// Whether bulk actions apply (anything selected)
    #[must_use]
    pub fn is_select_mode(&self) -> bool {
        !self.selected.is_empty()
    }

    #[must_use]
    pub fn is_selected(&self, key: &str) -> bool {
        self.selected.contains(key)
    }

    /// Selected keys in name order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.selected.iter().map(String::as_str)
    }

    /// Selected files in listing order
    #[must_use]
    pub fn selected_files<'a>(&self, catalog: &'a FileCatalog) -> Vec<&'a File> {
        catalog
            .files()
            .iter()
            .filter(|f| self.selected.contains(&f.filename))
            .collect()
    }
}
