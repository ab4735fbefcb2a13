use std::io::Write;

use anyhow::Result;
use steward::Steward;

/// Print the children of a directory, one per line
pub fn list_command<W: Write>(steward: &Steward, path: &str, out: &mut W) -> Result<()> {
    for name in steward.list(path)? {
        writeln!(out, "{name}")?;
    }
    Ok(())
}
