//! Bulk tag operations for multiple files
//!
//! The listed files are selected and a bulk session is opened over them.
//! `add` assigns the named tags and `remove` unassigns them.

use super::{Result, resolve_tags};
use crate::api::FileApi;
use crate::assign::{BulkMode, MoveDirection};
use crate::cli::BulkCommands;
use crate::drive::Drive;
use std::collections::BTreeSet;

/// Execute a bulk tag change
///
/// # Errors
/// Returns an error if a tag or file cannot be resolved
pub fn execute<A: FileApi>(drive: &mut Drive<A>, command: &BulkCommands) -> Result<()> {
    let tags = resolve_tags(drive.tags(), command.tags())?;
    let files: BTreeSet<&str> = command.files().iter().map(String::as_str).collect();

    drive.unselect_all();
    for file in files {
        drive.toggle_selection(file)?;
    }

    let mode = command.mode();
    drive.begin_bulk_tag_edit(mode)?;
    match mode {
        BulkMode::Add => {
            for id in &tags {
                drive.move_tag(*id, MoveDirection::Assign)?;
            }
        }
        BulkMode::Remove => {
            for id in &tags {
                drive.move_tag(*id, MoveDirection::Unassign)?;
            }
        }
    }

    drive.commit_tag_edit()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_drive;

    fn bulk(mode: &str, files: &[&str], tags: &[&str]) -> BulkCommands {
        let files = files.iter().map(ToString::to_string).collect();
        let tags = tags.iter().map(ToString::to_string).collect();
        match mode {
            "add" => BulkCommands::Add { files, tags },
            _ => BulkCommands::Remove { files, tags },
        }
    }

    #[test]
    fn test_bulk_add_keeps_existing_tags() {
        let mut drive = sample_drive();
        execute(&mut drive, &bulk("add", &["main.rs", "cat.jpg"], &["docs"])).unwrap();

        assert_eq!(drive.api().file("main.rs").unwrap().tags, BTreeSet::from([1, 2]));
        assert_eq!(drive.api().file("cat.jpg").unwrap().tags, BTreeSet::from([2, 4]));
        assert_eq!(drive.selection().count(), 0);
        assert!(drive.session().is_none());
    }

    #[test]
    fn test_bulk_remove_only_named_tags() {
        let mut drive = sample_drive();
        execute(&mut drive, &bulk("remove", &["notes.md", "report.pdf"], &["docs"])).unwrap();

        assert_eq!(drive.api().file("notes.md").unwrap().tags, BTreeSet::from([1]));
        assert!(drive.api().file("report.pdf").unwrap().tags.is_empty());
    }

    #[test]
    fn test_duplicate_file_arguments_count_once() {
        let mut drive = sample_drive();
        execute(&mut drive, &bulk("add", &["main.rs", "main.rs"], &["music"])).unwrap();
        assert_eq!(drive.api().file("main.rs").unwrap().tags, BTreeSet::from([1, 3]));
    }

    #[test]
    fn test_unknown_file_is_rejected() {
        let mut drive = sample_drive();
        let result = execute(&mut drive, &bulk("add", &["ghost.txt"], &["music"]));
        assert!(result.is_err());
        assert!(drive.session().is_none());
    }
}
