// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Logging setup shared by every simfs crate.
//!
//! The level comes from the `SIMFS_LOG` environment variable:
//! - `off` (default) - nothing is emitted
//! - `error`, `warn` - failures and recoverable problems only
//! - `info` - startup, recovery and replay progress
//! - `debug` - every journal record and tree mutation

use std::sync::Once;

// Re-export emit so the macros below resolve from any crate
pub use emit;

/// Environment variable consulted by [`init_diagnostics`]
pub const LOG_ENV: &str = "SIMFS_LOG";

static INIT: Once = Once::new();

/// Verbosity selected through [`LOG_ENV`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelChoice {
    Off,
    Error,
    Warn,
    Info,
    Debug,
}

impl LevelChoice {
    fn min_level(self) -> Option<emit::Level> {
        match self {
            LevelChoice::Off => None,
            LevelChoice::Error => Some(emit::Level::Error),
            LevelChoice::Warn => Some(emit::Level::Warn),
            LevelChoice::Info => Some(emit::Level::Info),
            LevelChoice::Debug => Some(emit::Level::Debug),
        }
    }
}

/// Parse a `SIMFS_LOG` value. Matching is case-insensitive.
pub fn parse_level(value: &str) -> Option<LevelChoice> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "off" | "none" => Some(LevelChoice::Off),
        "error" => Some(LevelChoice::Error),
        "warn" | "warning" => Some(LevelChoice::Warn),
        "info" => Some(LevelChoice::Info),
        "debug" | "trace" => Some(LevelChoice::Debug),
        _ => None,
    }
}

/// Initialize logging from `SIMFS_LOG`.
///
/// Call once at startup; later calls are ignored.
pub fn init_diagnostics() {
    INIT.call_once(|| {
        let raw = std::env::var(LOG_ENV).unwrap_or_else(|_| "off".to_string());

        let choice = match parse_level(&raw) {
            Some(choice) => choice,
            None => {
                // Bootstrap warning, the emitter isn't running yet
                eprintln!("Warning: unknown {LOG_ENV} value '{raw}', using 'info'");
                LevelChoice::Info
            }
        };

        let Some(level) = choice.min_level() else {
            return;
        };

        let rt = emit::setup()
            .emit_to(emit_term::stderr())
            .emit_when(emit::level::min_filter(level))
            .init();

        // The runtime lives for the rest of the process
        std::mem::forget(rt);
    });
}

/// Log an operation the user would care about (open, recover, replay)
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::emit::info!($($arg)*)
    };
}

/// Log internal detail (journal records, tree mutations, snapshot sizes)
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        $crate::emit::debug!($($arg)*)
    };
}

/// Log a recoverable problem (skipped record, fresh image fallback)
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::emit::warn!($($arg)*)
    };
}

/// Log a failure that the caller will also see as an error
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        $crate::emit::error!($($arg)*)
    };
}

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::emit::info!($($arg)*)
    };
}

#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        $crate::emit::debug!($($arg)*)
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::emit::warn!($($arg)*)
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::emit::error!($($arg)*)
    };
}

pub use init_diagnostics as init;
