//! Line-oriented shell over a steward.

use std::io::{self, BufRead, Write};

use diagnostics::*;
use steward::Steward;

use crate::commands::{Command, run_command};

/// Greeting printed when the shell starts interactively
pub const BANNER: &str = "simfs shell. Type 'help' for commands.";
const PROMPT: &str = "> ";

/// What happened to one line of input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing to do, or the command succeeded
    Done,
    /// The command failed; the error was printed
    Failed,
    /// The user asked to leave
    Exit,
}

pub struct Shell<'a> {
    steward: &'a Steward,
    interactive: bool,
}

impl<'a> Shell<'a> {
    pub fn new(steward: &'a Steward) -> Self {
        Self {
            steward,
            interactive: false,
        }
    }

    /// Print the banner and a prompt before every line
    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    /// Run one line. Errors from the filesystem are printed to `out`; only
    /// failures to write `out` itself are returned.
    pub fn execute_line<W: Write>(&self, line: &str, out: &mut W) -> io::Result<Outcome> {
        let cmd = match Command::parse(line) {
            None => return Ok(Outcome::Done),
            Some(Ok(cmd)) => cmd,
            Some(Err(e)) => {
                writeln!(out, "{e}")?;
                return Ok(Outcome::Failed);
            }
        };
        if cmd == Command::Exit {
            return Ok(Outcome::Exit);
        }

        match run_command(self.steward, &cmd, out) {
            Ok(()) => Ok(Outcome::Done),
            Err(e) => {
                if let Some(io_err) = e.downcast_ref::<io::Error>() {
                    return Err(io::Error::new(io_err.kind(), e.to_string()));
                }
                let message = e.to_string();
                log_debug!("command failed: {message}", message: message);
                writeln!(out, "ERROR: {message}")?;
                Ok(Outcome::Failed)
            }
        }
    }

    /// Read lines until end of input or `exit`
    pub fn run<R: BufRead, W: Write>(&self, input: R, out: &mut W) -> io::Result<()> {
        if self.interactive {
            writeln!(out, "{BANNER}")?;
        }
        let mut lines = input.lines();
        loop {
            if self.interactive {
                write!(out, "{PROMPT}")?;
                out.flush()?;
            }
            let Some(line) = lines.next() else {
                break;
            };
            if self.execute_line(&line?, out)? == Outcome::Exit {
                if self.interactive {
                    writeln!(out, "bye")?;
                }
                break;
            }
        }
        out.flush()
    }
}
