//! File commands - listing, editing, upload and download

use super::{Result, confirm, resolve_tags};
use crate::TagdriveError;
use crate::api::{FileApi, UploadItem};
use crate::assign::MoveDirection;
use crate::drive::Drive;
use crate::output;
use crate::query::{MatchMode, QueryState, SortDir, SortKey};
use std::fs;
use std::path::{Path, PathBuf};

/// Arguments of `files`
pub struct Listing<'a> {
    pub tags: &'a [String],
    pub mode: MatchMode,
    pub search: Option<&'a str>,
    pub key: SortKey,
    pub dir: SortDir,
}

/// List files for a query
///
/// # Errors
/// Returns an error if a tag cannot be resolved
pub fn list<A: FileApi>(drive: &mut Drive<A>, listing: &Listing<'_>, quiet: bool) -> Result<()> {
    let mut query = QueryState::new();
    for id in resolve_tags(drive.tags(), listing.tags)? {
        query.add_tag_filter(id, drive.tags());
    }
    query.set_match_mode(listing.mode);
    if let Some(text) = listing.search {
        query.set_free_text(text);
    }
    query.set_sort(listing.key, listing.dir);
    drive.apply_query(query);

    let files = drive.files().files();
    if files.is_empty() {
        if !quiet {
            println!("No files found.");
        }
        return Ok(());
    }

    if !quiet {
        let picked: Vec<&str> = drive
            .query()
            .picked_tags(drive.tags())
            .iter()
            .map(|t| t.name.as_str())
            .collect();
        println!("{}", listing_header(files.len(), listing.mode, &picked));
    }
    for file in files {
        println!("{}", output::file_line(file, drive.tags(), quiet));
    }
    Ok(())
}

fn listing_header(count: usize, mode: MatchMode, picked: &[&str]) -> String {
    if picked.is_empty() {
        format!("{count} file(s):")
    } else {
        format!(
            "{count} file(s) tagged with {} {}:",
            mode.description(),
            picked.join(", ")
        )
    }
}

/// Show the most recently uploaded files
///
/// # Errors
/// Never fails; server errors end up in the notification log
pub fn recent<A: FileApi>(drive: &mut Drive<A>, number: usize, quiet: bool) -> Result<()> {
    let files = drive.recent_files(number);
    if files.is_empty() && !quiet {
        println!("No recent files.");
    }
    for file in &files {
        println!("{}", output::file_line(file, drive.tags(), quiet));
    }
    Ok(())
}

/// # Errors
/// Never fails; server errors end up in the notification log
pub fn rename<A: FileApi>(drive: &mut Drive<A>, file: &str, new_name: &str) -> Result<()> {
    drive.rename_file(file, new_name);
    Ok(())
}

/// # Errors
/// Never fails; server errors end up in the notification log
pub fn describe<A: FileApi>(drive: &mut Drive<A>, file: &str, description: &str) -> Result<()> {
    drive.set_description(file, description);
    Ok(())
}

/// Edit one file's tags through a single-file session
///
/// Nothing is sent when the requested moves leave the tags unchanged.
///
/// # Errors
/// Returns an error if a tag cannot be resolved or the file is not listed
pub fn retag<A: FileApi>(
    drive: &mut Drive<A>,
    file: &str,
    add: &[String],
    remove: &[String],
    quiet: bool,
) -> Result<()> {
    let add = resolve_tags(drive.tags(), add)?;
    let remove = resolve_tags(drive.tags(), remove)?;
    if let Some(id) = add.intersection(&remove).next() {
        return Err(TagdriveError::InvalidInput(format!(
            "Tag {id} cannot be both added and removed"
        )));
    }

    drive.begin_tag_edit(file)?;
    for id in &add {
        drive.move_tag(*id, MoveDirection::Assign)?;
    }
    for id in &remove {
        drive.move_tag(*id, MoveDirection::Unassign)?;
    }

    let unchanged = drive.session().is_some_and(|s| !s.has_changes());
    if unchanged {
        drive.cancel_tag_edit()?;
        if !quiet {
            println!("Tags of {file} are already up to date.");
        }
        return Ok(());
    }

    drive.commit_tag_edit()?;
    Ok(())
}

/// Delete files after confirmation
///
/// # Errors
/// Returns an error if the confirmation prompt fails
pub fn remove<A: FileApi>(
    drive: &mut Drive<A>,
    files: &[String],
    force: bool,
    quiet: bool,
) -> Result<()> {
    if !quiet {
        println!("About to delete {} file(s):", files.len());
        for file in files {
            println!("  - {file}");
        }
    }

    if !confirm("Delete these files?", force || quiet)? {
        if !quiet {
            println!("Cancelled.");
        }
        return Ok(());
    }

    drive.delete_files(files);
    Ok(())
}

fn read_upload(path: &Path) -> Result<UploadItem> {
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| TagdriveError::InvalidInput(format!("Not a file: {}", path.display())))?;
    let content = fs::read(path)?;
    Ok(UploadItem::new(filename, content))
}

/// Upload local files with initial tags
///
/// # Errors
/// Returns an error if a tag cannot be resolved or a file cannot be read
pub fn upload<A: FileApi>(
    drive: &mut Drive<A>,
    paths: &[PathBuf],
    tags: &[String],
) -> Result<()> {
    let tags = resolve_tags(drive.tags(), tags)?;
    let items = paths
        .iter()
        .map(|p| read_upload(p))
        .collect::<Result<Vec<_>>>()?;
    drive.upload(&items, &tags);
    Ok(())
}

/// Download files into one archive
///
/// # Errors
/// Returns an error if the archive cannot be written
pub fn download<A: FileApi>(
    drive: &mut Drive<A>,
    files: &[String],
    target: &Path,
    quiet: bool,
) -> Result<()> {
    let Some(bytes) = drive.download(files) else {
        return Ok(());
    };
    fs::write(target, &bytes)?;
    if !quiet {
        println!("Saved {} to {}", output::format_size(bytes.len() as u64), target.display());
    }
    Ok(())
}
