use std::io::Write;

use anyhow::Result;
use diagnostics::*;
use steward::Steward;

use super::Command;

/// Run a mutating command and acknowledge it with `ok`
pub fn modify_command<W: Write>(steward: &Steward, cmd: &Command, out: &mut W) -> Result<()> {
    let shown = format!("{cmd:?}");
    log_debug!("shell command {command}", command: shown.as_str());
    match cmd {
        Command::Mkdir(path) => steward.mkdir(path)?,
        Command::Rmdir(path) => steward.rmdir(path)?,
        Command::Touch(path) => steward.touch(path)?,
        Command::Write { path, content } => steward.write(path, content)?,
        Command::Rm(path) => steward.remove(path)?,
        Command::Mv { src, dst } => steward.move_node(src, dst)?,
        Command::Cp { src, dst } => steward.copy_node(src, dst)?,
        other => anyhow::bail!("not a mutating command: {other:?}"),
    }
    writeln!(out, "ok")?;
    Ok(())
}
