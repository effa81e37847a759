//! Output formatting for CLI display
//!
//! Tag chips are printed in the tag's own color, file sizes in binary
//! units and timestamps in local time as `dd-mm-YYYY HH:MM`.

use crate::catalog::TagCatalog;
use crate::model::{File, Tag};
use crate::notify::{NotificationEntry, NotificationKind};
use byte_unit::{Byte, UnitType};
use chrono::{DateTime, Local, Utc};
use colored::Colorize;

/// Human-readable size, e.g. `2.0 KiB`
#[must_use]
pub fn format_size(bytes: u64) -> String {
    let adjusted = Byte::from_u64(bytes).get_appropriate_unit(UnitType::Binary);
    format!("{adjusted:.1}")
}

/// Local time as `dd-mm-YYYY HH:MM`
#[must_use]
pub fn format_time(time: DateTime<Utc>) -> String {
    time.with_timezone(&Local).format("%d-%m-%Y %H:%M").to_string()
}

/// Tag name on its own color, with black or white text for contrast
#[must_use]
pub fn tag_chip(tag: &Tag) -> String {
    let (r, g, b) = tag.color.components();
    let luma = 299 * u32::from(r) + 587 * u32::from(g) + 114 * u32::from(b);
    let label = format!(" {} ", tag.name);
    let label = if luma > 128_000 {
        label.truecolor(0, 0, 0)
    } else {
        label.truecolor(255, 255, 255)
    };
    label.on_truecolor(r, g, b).to_string()
}

/// One line per tag: id, chip, hex color
#[must_use]
pub fn tag_line(tag: &Tag, quiet: bool) -> String {
    if quiet {
        tag.name.clone()
    } else {
        format!("{:>4}  {}  {}", tag.id, tag_chip(tag), tag.color.to_hex().dimmed())
    }
}

/// File row with size, time and tag chips
///
/// Tag ids the catalog does not know are skipped.
#[must_use]
pub fn file_line(file: &File, catalog: &TagCatalog, quiet: bool) -> String {
    if quiet {
        return file.filename.clone();
    }
    let chips: Vec<String> = file
        .tags
        .iter()
        .filter_map(|id| catalog.get(*id))
        .map(tag_chip)
        .collect();
    let mut line = format!(
        "  {:<32} {:>12}  {}  {}",
        file.filename.bold(),
        format_size(file.size),
        format_time(file.added_at).dimmed(),
        chips.join(" ")
    );
    if !file.description.is_empty() {
        line.push_str(&format!("\n      {}", file.description.italic()));
    }
    line
}

/// Notification entry, red for errors
#[must_use]
pub fn notification_line(entry: &NotificationEntry) -> String {
    let time = entry.created_at.with_timezone(&Local).format("%H:%M");
    match entry.kind {
        NotificationKind::Info => format!("{} {}", time.to_string().dimmed(), entry.message),
        NotificationKind::Error => format!("{} {}", time.to_string().dimmed(), entry.message.red()),
    }
}
