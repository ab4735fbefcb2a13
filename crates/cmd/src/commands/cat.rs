use std::io::Write;

use anyhow::Result;
use steward::Steward;

pub fn cat_command<W: Write>(steward: &Steward, path: &str, out: &mut W) -> Result<()> {
    let content = steward.read(path)?;
    writeln!(out, "{content}")?;
    Ok(())
}
