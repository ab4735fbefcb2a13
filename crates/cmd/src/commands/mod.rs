//! Shell commands: parsing a line and running it against a steward.

use std::io::Write;

use anyhow::Result;
use steward::Steward;
use thiserror::Error;

mod cat;
mod list;
mod modify;
mod show;
mod stat;

pub const HELP: &str = "\
commands:
  ls [path]            list a directory (default /)
  mkdir <path>         create a directory
  rmdir <path>         remove an empty directory
  touch <path>         create an empty file if missing
  write <path> [text]  replace a file's content
  cat <path>           print a file
  rm <path>            remove a file or directory
  mv <src> <dst>       move or rename
  cp <src> <dst>       copy (directories one level deep)
  stat <path>          show node details
  log                  show the journal
  exit                 leave the shell";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Ls(String),
    Mkdir(String),
    Rmdir(String),
    Touch(String),
    Write { path: String, content: String },
    Cat(String),
    Rm(String),
    Mv { src: String, dst: String },
    Cp { src: String, dst: String },
    Stat(String),
    Log,
    Exit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown command: {0}")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),
}

impl Command {
    /// Parse one input line. The line is split on single spaces into at
    /// most three parts, so the last argument of `write` keeps its spaces.
    /// Returns `None` for a blank line.
    pub fn parse(line: &str) -> Option<Result<Command, ParseError>> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        let parts: Vec<&str> = line.splitn(3, ' ').collect();
        let name = parts[0];
        let arg = |i: usize, usage: &'static str| {
            parts
                .get(i)
                .map(|s| s.to_string())
                .ok_or(ParseError::Usage(usage))
        };

        let cmd = match name {
            "help" => Ok(Command::Help),
            "ls" => Ok(Command::Ls(arg(1, "").unwrap_or_else(|_| "/".to_string()))),
            "mkdir" => arg(1, "mkdir <path>").map(Command::Mkdir),
            "rmdir" => arg(1, "rmdir <path>").map(Command::Rmdir),
            "touch" => arg(1, "touch <path>").map(Command::Touch),
            "write" => arg(1, "write <path> [text]").map(|path| Command::Write {
                path,
                content: arg(2, "").unwrap_or_default(),
            }),
            "cat" => arg(1, "cat <path>").map(Command::Cat),
            "rm" => arg(1, "rm <path>").map(Command::Rm),
            "mv" => arg(1, "mv <src> <dst>")
                .and_then(|src| Ok(Command::Mv { src, dst: arg(2, "mv <src> <dst>")? })),
            "cp" => arg(1, "cp <src> <dst>")
                .and_then(|src| Ok(Command::Cp { src, dst: arg(2, "cp <src> <dst>")? })),
            "stat" => arg(1, "stat <path>").map(Command::Stat),
            "log" => Ok(Command::Log),
            "exit" | "quit" => Ok(Command::Exit),
            other => Err(ParseError::Unknown(other.to_string())),
        };
        Some(cmd)
    }
}

/// Run a parsed command, writing its output to `out`
pub fn run_command<W: Write>(steward: &Steward, cmd: &Command, out: &mut W) -> Result<()> {
    match cmd {
        Command::Help => writeln!(out, "{HELP}")?,
        Command::Ls(path) => list::list_command(steward, path, out)?,
        Command::Cat(path) => cat::cat_command(steward, path, out)?,
        Command::Stat(path) => stat::stat_command(steward, path, out)?,
        Command::Log => show::show_command(steward, out)?,
        Command::Exit => {}
        Command::Mkdir(_)
        | Command::Rmdir(_)
        | Command::Touch(_)
        | Command::Write { .. }
        | Command::Rm(_)
        | Command::Mv { .. }
        | Command::Cp { .. } => modify::modify_command(steward, cmd, out)?,
    }
    Ok(())
}
