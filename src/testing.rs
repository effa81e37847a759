//! Testing utilities for tagdrive
//!
//! Fixture tags and files plus a ready-made `Drive` over a `MockApi`
//! seeded with them.
//!
//! Only available when compiled with `cfg(test)`.

use crate::api::MockApi;
use crate::catalog::RefreshPolicy;
use crate::drive::Drive;
use crate::model::{Color, File, Tag};
use crate::notify::NotificationSettings;
use chrono::{DateTime, TimeZone, Utc};

/// Fixed instant so fixtures sort by time deterministically
///
/// # Panics
/// Never for the hard-coded date.
#[must_use]
pub fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, day, hour, 0, 0).unwrap()
}

/// Four tags: 1 rust, 2 docs, 3 music, 4 photos
#[must_use]
pub fn sample_tags() -> Vec<Tag> {
    vec![
        Tag::new(1, "rust", Color::rgb(0xde, 0xa5, 0x84)),
        Tag::new(2, "docs", Color::rgb(0x42, 0x87, 0xf5)),
        Tag::new(3, "music", Color::rgb(0x9b, 0x59, 0xb6)),
        Tag::new(4, "photos", Color::rgb(0x2e, 0xcc, 0x71)),
    ]
}

/// Five files in name order
///
/// | file       | tags   |
/// |------------|--------|
/// | cat.jpg    | 4      |
/// | main.rs    | 1      |
/// | notes.md   | 1, 2   |
/// | report.pdf | 2      |
/// | song.mp3   | 3      |
#[must_use]
pub fn sample_files() -> Vec<File> {
    vec![
        File::new("cat.jpg", 524_288, at(3, 10)).with_tags([4]),
        File::new("main.rs", 2_048, at(1, 9)).with_tags([1]),
        File::new("notes.md", 4_096, at(2, 14))
            .with_tags([1, 2])
            .with_description("meeting notes"),
        File::new("report.pdf", 131_072, at(5, 16)).with_tags([2]),
        File::new("song.mp3", 3_145_728, at(4, 20)).with_tags([3]),
    ]
}

/// `MockApi` seeded with the sample tags and files
#[must_use]
pub fn sample_api() -> MockApi {
    MockApi::new()
        .with_tags(sample_tags())
        .with_files(sample_files())
}

/// Loaded `Drive` over `api` with default settings and the call log cleared
#[must_use]
pub fn drive_with(api: MockApi) -> Drive<MockApi> {
    let mut drive = Drive::new(api, RefreshPolicy::default(), NotificationSettings::default());
    drive.refresh();
    drive.api().clear_calls();
    drive
}

/// Loaded `Drive` over the sample data
#[must_use]
pub fn sample_drive() -> Drive<MockApi> {
    drive_with(sample_api())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_drive_is_loaded() {
        let drive = sample_drive();
        assert_eq!(drive.tags().len(), 4);
        assert_eq!(drive.files().len(), 5);
        assert!(drive.api().calls().is_empty());
        assert!(drive.log().is_empty());
    }

    #[test]
    fn test_sample_files_are_name_ordered() {
        let names: Vec<_> = sample_files().into_iter().map(|f| f.filename).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }
}
