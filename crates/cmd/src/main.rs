// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use cmd::common::config_with_overrides;
use cmd::{Outcome, Shell};
use diagnostics::*;
use steward::Steward;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "simfs")]
struct Cli {
    /// Directory holding fs.img and fs.journal (default: $SIMFS_HOME, then the current directory)
    #[arg(long)]
    dir: Option<PathBuf>,

    /// Image file, overriding the one in --dir
    #[arg(long)]
    image: Option<PathBuf>,

    /// Journal file, overriding the one in --dir
    #[arg(long)]
    journal: Option<PathBuf>,

    /// Run a single shell command and exit, e.g. `simfs write /a.txt hello`
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    command: Vec<String>,
}

fn main() -> ExitCode {
    diagnostics::init_diagnostics();
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            let message = format!("{e:#}");
            log_error!("simfs failed: {message}", message: message);
            _ = writeln!(io::stderr(), "Error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = config_with_overrides(cli.dir, cli.image, cli.journal);
    let steward = Steward::open(config)?;

    let recovery = steward.last_recovery();
    if recovery.failed_count > 0 {
        let failed = recovery.failed_count;
        log_warn!("{failed} journal records could not be replayed", failed: failed);
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let shell = Shell::new(&steward);

    if !cli.command.is_empty() {
        let line = cli.command.join(" ");
        let outcome = shell.execute_line(&line, &mut out)?;
        out.flush()?;
        return Ok(match outcome {
            Outcome::Failed => ExitCode::FAILURE,
            Outcome::Done | Outcome::Exit => ExitCode::SUCCESS,
        });
    }

    let stdin = io::stdin();
    let interactive = stdin.is_terminal();
    shell.interactive(interactive).run(stdin.lock(), &mut out)?;
    Ok(ExitCode::SUCCESS)
}
