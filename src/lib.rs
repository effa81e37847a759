//! Tagdrive - client for a tag-based file drive
//!
//! The library keeps a local picture of a remote drive (the tag catalog and
//! the current file listing) and turns user actions into server requests:
//! searching by tags and text, selecting files, editing tags on one file or
//! many, and managing the tag catalog itself.
//!
//! [`drive::Drive`] owns all state and is generic over the [`api::FileApi`]
//! transport, so the same logic runs against the HTTP server or the
//! in-memory [`api::MockApi`].

use thiserror::Error;

pub mod api;
pub mod assign;
pub mod catalog;
pub mod cli;
pub mod commands;
pub mod config;
pub mod drive;
pub mod dropzone;
pub mod logging;
pub mod model;
pub mod notify;
pub mod output;
pub mod query;
pub mod selection;

#[cfg(test)]
pub mod testing;

/// Error enum, contains all failure states of the program
#[derive(Debug, Error)]
pub enum TagdriveError {
    /// Tag name, color or filename rejected before any request
    #[error("Validation error: {0}")]
    Validation(#[from] model::ValidationError),
    /// Server or transport error
    #[error("Server error: {0}")]
    Api(#[from] api::ApiError),
    #[error("Selection error: {0}")]
    Selection(#[from] selection::SelectionError),
    #[error("Tag editing error: {0}")]
    Assign(#[from] assign::AssignError),
    /// Represents a configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] ::config::ConfigError),
    /// Represents an I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    /// Invalid input error
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// Operations reported to the user as failed
    #[error("{0} operation(s) failed")]
    OperationsFailed(usize),
}
