//! Command implementations
//!
//! Each command runs against a `Drive`, so the same code drives the HTTP
//! client and the offline demo. Commands do their work through the drive's
//! operations and print whatever the notification log collected afterwards.

pub mod bulk;
pub mod files;
pub mod tags;

use crate::TagdriveError;
use crate::api::FileApi;
use crate::catalog::TagCatalog;
use crate::cli::Commands;
use crate::drive::Drive;
use crate::model::TagId;
use crate::output;
use dialoguer::Confirm;
use std::collections::BTreeSet;

type Result<T> = std::result::Result<T, TagdriveError>;

/// Run one command, then flush the notification log to the terminal
///
/// # Errors
///
/// Returns `TagdriveError` if an argument cannot be resolved, local I/O
/// fails, or any server operation logged an error.
pub fn execute<A: FileApi>(drive: &mut Drive<A>, command: &Commands, quiet: bool) -> Result<()> {
    drive.refresh();

    let result = match command {
        Commands::Files {
            tags: names, search, ..
        } => {
            let (mode, key, dir) = command
                .listing_order()
                .ok_or_else(|| TagdriveError::InvalidInput("Not a listing command".into()))?;
            let listing = files::Listing {
                tags: names,
                mode,
                search: search.as_deref(),
                key,
                dir,
            };
            files::list(drive, &listing, quiet)
        }
        Commands::Recent { number } => files::recent(drive, *number, quiet),
        Commands::Tags => tags::list(drive, quiet),
        Commands::TagAdd { name, color } => tags::add(drive, name, color),
        Commands::TagEdit { tag, name, color } => {
            tags::edit(drive, tag, name.as_deref(), color.as_deref())
        }
        Commands::TagRemove { tag, force } => tags::remove(drive, tag, *force, quiet),
        Commands::Rename { file, new_name } => files::rename(drive, file, new_name),
        Commands::Describe { file, description } => files::describe(drive, file, description),
        Commands::Retag { file, add, remove } => files::retag(drive, file, add, remove, quiet),
        Commands::Bulk { command } => bulk::execute(drive, command),
        Commands::Rm { files: names, force } => files::remove(drive, names, *force, quiet),
        Commands::Upload { paths, tags: names } => files::upload(drive, paths, names),
        Commands::Download { files: names, output: target } => {
            files::download(drive, names, target, quiet)
        }
    };

    let failures = flush_notifications(drive, quiet);
    result?;
    if failures > 0 {
        return Err(TagdriveError::OperationsFailed(failures));
    }
    Ok(())
}

/// Print and clear the notification log; returns the number of errors
fn flush_notifications<A: FileApi>(drive: &mut Drive<A>, quiet: bool) -> usize {
    let entries = drive.log_mut().drain();
    let mut failures = 0;
    for entry in &entries {
        if entry.is_error() {
            failures += 1;
            eprintln!("{}", output::notification_line(entry));
        } else if !quiet {
            println!("{}", output::notification_line(entry));
        }
    }
    failures
}

/// Look up a tag by id or by name
pub(crate) fn resolve_tag(catalog: &TagCatalog, raw: &str) -> Result<TagId> {
    let name = raw.trim();
    if let Some(id) = name.parse::<TagId>().ok().filter(|id| catalog.contains(*id)) {
        return Ok(id);
    }
    catalog
        .find_by_name(name)
        .map(|tag| tag.id)
        .ok_or_else(|| TagdriveError::InvalidInput(format!("Unknown tag: {raw}")))
}

pub(crate) fn resolve_tags(catalog: &TagCatalog, raw: &[String]) -> Result<BTreeSet<TagId>> {
    raw.iter().map(|r| resolve_tag(catalog, r)).collect()
}

/// Prompt user for yes/no confirmation using dialoguer
fn confirm(prompt: &str, skip: bool) -> Result<bool> {
    if skip {
        return Ok(true);
    }

    Confirm::new()
        .with_prompt(prompt)
        .interact()
        .map_err(|e| TagdriveError::InvalidInput(format!("Confirmation failed: {e}")))
}
