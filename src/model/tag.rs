//! Tags and tag colors

use super::error::ValidationError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Server-assigned tag identifier
pub type TagId = u32;

/// Maximum number of characters in a tag name
pub const MAX_TAG_NAME_LEN: usize = 20;

static TAG_NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_\- ]+$").expect("tag name pattern is valid"));

/// 24-bit RGB color, serialized as `#rrggbb`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(u32);

impl Color {
    /// Build a color from its components
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    /// Red, green and blue components
    #[must_use]
    pub const fn components(self) -> (u8, u8, u8) {
        (
            ((self.0 >> 16) & 0xff) as u8,
            ((self.0 >> 8) & 0xff) as u8,
            (self.0 & 0xff) as u8,
        )
    }

    /// Hex form used on the wire
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:06x}", self.0)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::rgb(0xff, 0xff, 0xff)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0)
    }
}

impl FromStr for Color {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidColor(s.to_string());
        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        u32::from_str_radix(hex, 16).map(Self).map_err(|_| invalid())
    }
}

impl TryFrom<String> for Color {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

/// A named, colored label that can be attached to files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    pub color: Color,
}

impl Tag {
    #[must_use]
    pub fn new(id: TagId, name: impl Into<String>, color: Color) -> Self {
        Self {
            id,
            name: name.into(),
            color,
        }
    }
}

/// Validate a tag name: 1 to 20 characters from `[A-Za-z0-9_- ]`
///
/// # Errors
///
/// Returns the matching `ValidationError` variant for empty, overlong or
/// malformed names.
pub fn validate_tag_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::EmptyTagName);
    }
    let len = name.chars().count();
    if len > MAX_TAG_NAME_LEN {
        return Err(ValidationError::TagNameTooLong {
            len,
            max: MAX_TAG_NAME_LEN,
        });
    }
    if !TAG_NAME_PATTERN.is_match(name) {
        return Err(ValidationError::InvalidTagName(name.to_string()));
    }
    Ok(())
}

/// Validated name and color for a tag that is about to be created or changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTag {
    name: String,
    color: Color,
}

impl NewTag {
    /// Validate raw user input
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the name or the color is malformed.
    pub fn parse(name: &str, color: &str) -> Result<Self, ValidationError> {
        validate_tag_name(name)?;
        let color = color.parse()?;
        Ok(Self {
            name: name.to_string(),
            color,
        })
    }

    /// # Errors
    ///
    /// Returns `ValidationError` if the name is malformed.
    pub fn new(name: &str, color: Color) -> Result<Self, ValidationError> {
        validate_tag_name(name)?;
        Ok(Self {
            name: name.to_string(),
            color,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn color(&self) -> Color {
        self.color
    }
}

/// `GET /api/tags` body: either a list or an object keyed by id
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TagsPayload {
    List(Vec<Tag>),
    Map(HashMap<String, Tag>),
}

impl TagsPayload {
    /// Flatten into a list sorted by id
    #[must_use]
    pub fn into_tags(self) -> Vec<Tag> {
        let mut tags = match self {
            Self::List(tags) => tags,
            Self::Map(map) => map.into_values().collect(),
        };
        tags.sort_by_key(|t| t.id);
        tags
    }
}
