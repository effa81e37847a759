//! Tags command - catalog management

use super::{Result, confirm, resolve_tag};
use crate::TagdriveError;
use crate::api::FileApi;
use crate::drive::Drive;
use crate::output;

/// # Errors
/// Never fails; an unreachable server leaves the catalog empty
pub fn list<A: FileApi>(drive: &mut Drive<A>, quiet: bool) -> Result<()> {
    if drive.tags().is_empty() {
        if !quiet {
            println!("No tags found.");
        }
        return Ok(());
    }

    if !quiet {
        println!("Tags:");
    }
    for tag in drive.tags().iter() {
        println!("{}", output::tag_line(tag, quiet));
    }
    Ok(())
}

/// # Errors
/// Never fails; validation and server errors end up in the notification log
pub fn add<A: FileApi>(drive: &mut Drive<A>, name: &str, color: &str) -> Result<()> {
    drive.create_tag(name, color);
    Ok(())
}

/// Change a tag, keeping the current name or color where none is given
///
/// # Errors
/// Returns an error if the tag cannot be resolved
pub fn edit<A: FileApi>(
    drive: &mut Drive<A>,
    tag: &str,
    name: Option<&str>,
    color: Option<&str>,
) -> Result<()> {
    let id = resolve_tag(drive.tags(), tag)?;
    let current = drive
        .tags()
        .get(id)
        .cloned()
        .ok_or_else(|| TagdriveError::InvalidInput(format!("Unknown tag: {tag}")))?;

    let name = name.unwrap_or(&current.name);
    let color = color.map_or_else(|| current.color.to_hex(), str::to_string);
    drive.update_tag(id, name, &color);
    Ok(())
}

/// Delete a tag after confirmation
///
/// # Errors
/// Returns an error if the tag cannot be resolved or the prompt fails
pub fn remove<A: FileApi>(drive: &mut Drive<A>, tag: &str, force: bool, quiet: bool) -> Result<()> {
    let id = resolve_tag(drive.tags(), tag)?;
    let tagged = drive.files().files().iter().filter(|f| f.has_tag(id)).count();

    if !quiet {
        println!("Tag '{tag}' is on {tagged} file(s).");
    }

    if !confirm("Delete the tag and remove it from every file?", force || quiet)? {
        if !quiet {
            println!("Cancelled.");
        }
        return Ok(());
    }

    drive.delete_tag(id);
    Ok(())
}
