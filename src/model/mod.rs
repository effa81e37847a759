//! Core data types shared by every component
//!
//! - **`Tag`** / **`Color`**: globally defined, colored labels
//! - **`File`**: one entry of a file listing, keyed by filename
//! - **`NewTag`**: validated name and color for tag create/update requests
//!
//! Wire names follow the server's JSON (`addTime`, `preview`, `#rrggbb`
//! colors). Validation happens here so that bad input is rejected before a
//! request is built.

pub mod error;
pub mod file;
pub mod tag;

pub use error::ValidationError;
pub use file::{File, validate_filename};
pub use tag::{Color, MAX_TAG_NAME_LEN, NewTag, Tag, TagId, TagsPayload, validate_tag_name};

#[cfg(test)]
#[path = "types_tests.rs"]
mod types_tests;
