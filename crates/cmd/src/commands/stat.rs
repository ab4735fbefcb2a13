use std::io::Write;

use anyhow::Result;
use steward::{EntryType, Steward};

use crate::common::format_timestamp;

pub fn stat_command<W: Write>(steward: &Steward, path: &str, out: &mut W) -> Result<()> {
    let info = steward.stat(path)?;
    let size_label = match info.kind {
        EntryType::File => "bytes",
        EntryType::Directory => "entries",
    };
    writeln!(out, "name:     {}", info.name)?;
    writeln!(out, "kind:     {}", info.kind)?;
    writeln!(out, "size:     {} {size_label}", info.size)?;
    writeln!(out, "created:  {}", format_timestamp(info.created_at))?;
    writeln!(out, "modified: {}", format_timestamp(info.modified_at))?;
    Ok(())
}
