//! Command-line interface definitions and parsing
//!
//! This module defines the CLI structure for tagdrive using the `clap` crate.
//!
//! # Commands
//!
//! - **files**: list files, optionally filtered by tags and text
//! - **recent**: most recently uploaded files
//! - **tags** / **tag-add** / **tag-edit** / **tag-rm**: manage tags
//! - **rename** / **describe** / **retag**: edit one file
//! - **bulk add|remove**: change tags on several files at once
//! - **rm** / **upload** / **download**: move files in and out of the drive
//!
//! Tags can be named by id or by name wherever a `TAG` is expected.
//!
//! # Examples
//!
//! ```
//! use clap::Parser;
//! use tagdrive::cli::{Cli, Commands};
//!
//! let cli = Cli::parse_from(["tagdrive", "files", "-t", "tax", "--any"]);
//! assert!(matches!(cli.command, Commands::Files { any: true, .. }));
//! ```

use crate::assign::BulkMode;
use crate::query::{MatchMode, SortDir, SortKey};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Sort column accepted on the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortArg {
    Name,
    Size,
    Time,
}

impl From<SortArg> for SortKey {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Name => Self::Name,
            SortArg::Size => Self::Size,
            SortArg::Time => Self::Time,
        }
    }
}

/// Direction of a bulk tag change
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum BulkCommands {
    /// Add tags to every listed file
    Add {
        /// Files to change
        #[arg(required = true, value_name = "FILE")]
        files: Vec<String>,

        /// Tags to add
        #[arg(short = 't', long = "tag", value_name = "TAG", required = true, num_args = 1..)]
        tags: Vec<String>,
    },

    /// Remove tags from every listed file
    #[command(visible_alias = "rm")]
    Remove {
        /// Files to change
        #[arg(required = true, value_name = "FILE")]
        files: Vec<String>,

        /// Tags to remove
        #[arg(short = 't', long = "tag", value_name = "TAG", required = true, num_args = 1..)]
        tags: Vec<String>,
    },
}

impl BulkCommands {
    #[must_use]
    pub const fn mode(&self) -> BulkMode {
        match self {
            Self::Add { .. } => BulkMode::Add,
            Self::Remove { .. } => BulkMode::Remove,
        }
    }

    #[must_use]
    pub fn files(&self) -> &[String] {
        match self {
            Self::Add { files, .. } | Self::Remove { files, .. } => files,
        }
    }

    #[must_use]
    pub fn tags(&self) -> &[String] {
        match self {
            Self::Add { tags, .. } | Self::Remove { tags, .. } => tags,
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// List files
    #[command(visible_alias = "ls")]
    Files {
        /// Only files carrying these tags
        #[arg(short = 't', long = "tag", value_name = "TAG", num_args = 0..)]
        tags: Vec<String>,

        /// Match files with ANY of the tags (default is ALL)
        #[arg(long = "any")]
        any: bool,

        /// Only files whose name contains this text
        #[arg(short = 's', long = "search", value_name = "TEXT")]
        search: Option<String>,

        /// Sort column
        #[arg(long = "sort", value_enum, default_value = "name")]
        sort: SortArg,

        /// Sort descending
        #[arg(long = "desc")]
        desc: bool,
    },

    /// Most recently uploaded files
    Recent {
        /// How many files to show
        #[arg(short = 'n', long = "number", default_value_t = 5)]
        number: usize,
    },

    /// List all tags
    Tags,

    /// Create a tag
    #[command(name = "tag-add")]
    TagAdd {
        name: String,

        /// Color as #rrggbb
        #[arg(default_value = "#ffffff")]
        color: String,
    },

    /// Change a tag's name or color
    #[command(name = "tag-edit")]
    TagEdit {
        tag: String,

        /// New name (keeps the current one if omitted)
        #[arg(short = 'n', long = "name")]
        name: Option<String>,

        /// New color as #rrggbb (keeps the current one if omitted)
        #[arg(short = 'c', long = "color")]
        color: Option<String>,
    },

    /// Delete a tag and detach it from every file
    #[command(name = "tag-rm")]
    TagRemove {
        tag: String,

        /// Skip confirmation prompt
        #[arg(short = 'f', long = "force")]
        force: bool,
    },

    /// Rename a file
    #[command(visible_alias = "mv")]
    Rename { file: String, new_name: String },

    /// Set a file's description
    Describe { file: String, description: String },

    /// Edit one file's tags
    Retag {
        file: String,

        /// Tags to add
        #[arg(short = 'a', long = "add", value_name = "TAG", num_args = 1..)]
        add: Vec<String>,

        /// Tags to remove
        #[arg(short = 'r', long = "remove", value_name = "TAG", num_args = 1..)]
        remove: Vec<String>,
    },

    /// Add or remove tags on several files
    Bulk {
        #[command(subcommand)]
        command: BulkCommands,
    },

    /// Delete files
    Rm {
        #[arg(required = true, value_name = "FILE")]
        files: Vec<String>,

        /// Skip confirmation prompt
        #[arg(short = 'f', long = "force")]
        force: bool,
    },

    /// Upload local files
    Upload {
        #[arg(required = true, value_name = "PATH")]
        paths: Vec<PathBuf>,

        /// Tags for the uploaded files
        #[arg(short = 't', long = "tag", value_name = "TAG", num_args = 1..)]
        tags: Vec<String>,
    },

    /// Download files as an archive
    Download {
        #[arg(required = true, value_name = "FILE")]
        files: Vec<String>,

        /// Where to write the archive
        #[arg(short = 'o', long = "output", default_value = "files.zip")]
        output: PathBuf,
    },
}

impl Commands {
    /// Match mode and sort for `files`
    #[must_use]
    pub fn listing_order(&self) -> Option<(MatchMode, SortKey, SortDir)> {
        match self {
            Self::Files {
                any, sort, desc, ..
            } => {
                let mode = if *any { MatchMode::Or } else { MatchMode::And };
                let dir = if *desc { SortDir::Desc } else { SortDir::Asc };
                Some((mode, (*sort).into(), dir))
            }
            _ => None,
        }
    }
}

/// Main CLI structure for parsing command-line arguments
#[derive(Parser, Debug)]
#[command(name = "tagdrive")]
#[command(about = "Client for a tag-based file drive", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Server URL (overrides config)
    #[arg(long = "server", global = true, value_name = "URL")]
    pub server: Option<String>,

    /// Work against built-in demo data instead of a server
    #[arg(long = "offline", global = true, conflicts_with = "server")]
    pub offline: bool,

    /// Suppress informational output (only print results)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,

    /// Developer log verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Parse command line arguments
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
