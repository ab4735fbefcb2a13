// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Steward - durable filesystem engine
//!
//! The steward owns the in-memory tree, the journal and the image file.
//! Every mutation is journaled as pending, applied to the tree, written
//! to the image and then marked committed. On open, pending journal
//! records left behind by an interrupted run are replayed.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod config;
mod image;
mod operation;
mod recovery;
mod steward;

pub use config::{HOME_ENV, IMAGE_FILE, JOURNAL_FILE, StewardConfig};
pub use image::{FORMAT_VERSION, ImageError, ImageStore};
pub use operation::Operation;
pub use steward::Steward;

pub use oplog::{EntryStatus, JournalEntry, OperationType};
pub use tinyfs::{EntryType, NodeInfo};

/// Outcome of the replay performed when a steward is opened
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveryResult {
    /// Pending records found in the journal
    pub pending_count: usize,
    /// Records replayed and marked committed
    pub recovered_count: usize,
    /// Records that could not be replayed; they stay pending
    pub failed_count: usize,
}

impl RecoveryResult {
    pub fn was_needed(&self) -> bool {
        self.pending_count > 0
    }
}

/// Coarse classification of a [`StewardError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidPath,
    AlreadyExists,
    NotFound,
    NotADirectory,
    IsADirectory,
    NotEmpty,
    DurabilityFailure,
    CorruptRecord,
    Internal,
}

#[derive(Debug, Error)]
pub enum StewardError {
    #[error(transparent)]
    Fs(#[from] tinyfs::Error),

    #[error("Durability failure: {0}")]
    Journal(#[from] oplog::Error),

    #[error("Durability failure: image {}: {source}", .path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: ImageError,
    },

    #[error("Durability failure: cannot prepare {}: {source}", .path.display())]
    Setup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid journal record {id}: {reason}")]
    InvalidRecord { id: String, reason: String },

    #[error("Filesystem state lock poisoned")]
    LockPoisoned,
}

impl StewardError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StewardError::Fs(e) => match e {
                tinyfs::Error::InvalidPath(_) => ErrorKind::InvalidPath,
                tinyfs::Error::AlreadyExists(_) => ErrorKind::AlreadyExists,
                tinyfs::Error::NotFound(_) => ErrorKind::NotFound,
                tinyfs::Error::NotADirectory(_) => ErrorKind::NotADirectory,
                tinyfs::Error::IsADirectory(_) => ErrorKind::IsADirectory,
                tinyfs::Error::NotEmpty(_) => ErrorKind::NotEmpty,
            },
            StewardError::Journal(oplog::Error::CorruptRecord(_)) => ErrorKind::CorruptRecord,
            StewardError::Journal(oplog::Error::Io { .. })
            | StewardError::Image { .. }
            | StewardError::Setup { .. } => ErrorKind::DurabilityFailure,
            StewardError::InvalidRecord { .. } => ErrorKind::CorruptRecord,
            StewardError::LockPoisoned => ErrorKind::Internal,
        }
    }

    pub(crate) fn image(path: &std::path::Path, source: ImageError) -> Self {
        StewardError::Image {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn invalid_record<S: Into<String>>(id: &str, reason: S) -> Self {
        StewardError::InvalidRecord {
            id: id.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        let e: StewardError = tinyfs::Error::not_empty("/d").into();
        assert_eq!(e.kind(), ErrorKind::NotEmpty);
        assert_eq!(e.to_string(), "Directory not empty: /d");

        let e: StewardError = oplog::Error::corrupt("bad line").into();
        assert_eq!(e.kind(), ErrorKind::CorruptRecord);

        let e = StewardError::invalid_record("id1", "missing path");
        assert_eq!(e.kind(), ErrorKind::CorruptRecord);
        assert!(e.to_string().contains("id1"));

        assert_eq!(StewardError::LockPoisoned.kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_io_is_durability_failure() {
        let io = std::io::Error::other("disk full");
        let e: StewardError = oplog::Error::io("/j", io).into();
        assert_eq!(e.kind(), ErrorKind::DurabilityFailure);
        assert!(e.to_string().starts_with("Durability failure"));
    }

    #[test]
    fn test_recovery_result_default() {
        let r = RecoveryResult::default();
        assert!(!r.was_needed());
    }
}
