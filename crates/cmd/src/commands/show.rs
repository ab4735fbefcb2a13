use std::io::Write;

use anyhow::Result;
use steward::{JournalEntry, Steward};

use crate::common::{format_timestamp, truncate_string};

/// Longest parameter value shown before it is cut short
const MAX_VALUE_CHARS: usize = 40;

/// Print every journal record, oldest first
pub fn show_command<W: Write>(steward: &Steward, out: &mut W) -> Result<()> {
    let entries = steward.journal_entries()?;
    if entries.is_empty() {
        writeln!(out, "journal is empty")?;
        return Ok(());
    }
    for entry in &entries {
        writeln!(out, "{}", format_entry(entry))?;
    }
    Ok(())
}

fn format_entry(entry: &JournalEntry) -> String {
    let params = entry
        .params
        .iter()
        .map(|(k, v)| format!("{k}={:?}", truncate_string(v, MAX_VALUE_CHARS)))
        .collect::<Vec<_>>()
        .join(" ");
    format!(
        "{}  {:<9}  {:<5}  {}",
        format_timestamp(entry.timestamp),
        entry.status.as_str(),
        entry.op.as_str(),
        params
    )
}
