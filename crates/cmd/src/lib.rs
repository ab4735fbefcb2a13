// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! The `simfs` command line: option handling and the interactive shell.

pub mod commands;
pub mod common;
pub mod shell;

pub use commands::{Command, ParseError};
pub use shell::{Outcome, Shell};
