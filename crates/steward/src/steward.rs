// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Steward - coordinator of the tree, the journal and the image

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use diagnostics::*;
use oplog::{Journal, JournalEntry};
use tinyfs::{Directory, NodeInfo};

use crate::image::ImageStore;
use crate::operation::Operation;
use crate::{RecoveryResult, StewardConfig, StewardError};

/// Everything guarded by the steward's single lock
pub(crate) struct State {
    pub(crate) root: Directory,
    pub(crate) journal: Journal,
    pub(crate) image: ImageStore,
}

impl State {
    /// Write the whole tree to the image file
    pub(crate) fn snapshot(&self) -> Result<(), StewardError> {
        self.image
            .save(&self.root)
            .map_err(|e| StewardError::image(self.image.path(), e))
    }
}

/// Steward owns a filesystem tree and keeps it durable.
///
/// Each mutation follows the same protocol under one lock: append a
/// pending journal record, validate and apply the change in memory,
/// save the image, then mark that record committed. A validation failure
/// leaves its record pending.
pub struct Steward {
    state: Mutex<State>,
    last_recovery: RecoveryResult,
}

impl Steward {
    /// Load the image (or start from an empty root), then replay any
    /// pending journal records.
    pub fn open(config: StewardConfig) -> Result<Self, StewardError> {
        config.prepare()?;

        let image = ImageStore::new(&config.image_path);
        let journal = Journal::new(&config.journal_path);

        let mut state = match image.load() {
            Some(root) => {
                let entries = root.len();
                info!("loaded image with {entries} top-level entries", entries: entries);
                State {
                    root,
                    journal,
                    image,
                }
            }
            None => {
                info!("starting from an empty root");
                let state = State {
                    root: Directory::root(),
                    journal,
                    image,
                };
                state.snapshot()?;
                state
            }
        };

        let last_recovery = crate::recovery::recover(&mut state)?;

        let image_path = config.image_path.display().to_string();
        info!("filesystem open at {image_path}", image_path: image_path);

        Ok(Self {
            state: Mutex::new(state),
            last_recovery,
        })
    }

    /// Open with the image and journal in `dir`
    pub fn open_in<P: AsRef<Path>>(dir: P) -> Result<Self, StewardError> {
        Self::open(StewardConfig::in_dir(dir))
    }

    /// What the replay at open time did
    pub fn last_recovery(&self) -> RecoveryResult {
        self.last_recovery
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, StewardError> {
        self.state.lock().map_err(|_| StewardError::LockPoisoned)
    }

    /// Run one mutation through the journal protocol
    pub fn execute(&self, op: Operation) -> Result<(), StewardError> {
        let mut state = self.lock()?;

        let id = state.journal.append_pending(op.op_type(), op.params())?;
        debug!("{op} pending as {id}", op: op.op_type().as_str(), id: id.as_str());

        op.apply(&mut state.root)?;
        state.snapshot()?;
        _ = state.journal.mark_committed(&id)?;
        Ok(())
    }

    pub fn mkdir(&self, path: &str) -> Result<(), StewardError> {
        self.execute(Operation::Mkdir { path: path.into() })
    }

    pub fn rmdir(&self, path: &str) -> Result<(), StewardError> {
        self.execute(Operation::Rmdir { path: path.into() })
    }

    /// Create an empty file unless the name is already taken
    pub fn touch(&self, path: &str) -> Result<(), StewardError> {
        self.execute(Operation::Touch { path: path.into() })
    }

    /// Replace a file's content, creating the file if needed
    pub fn write(&self, path: &str, content: &str) -> Result<(), StewardError> {
        self.execute(Operation::Write {
            path: path.into(),
            content: content.into(),
        })
    }

    /// Remove a file or a directory. Directories need not be empty.
    pub fn remove(&self, path: &str) -> Result<(), StewardError> {
        self.execute(Operation::Remove { path: path.into() })
    }

    /// Move `src` to `dst`, replacing whatever `dst` named
    pub fn move_node(&self, src: &str, dst: &str) -> Result<(), StewardError> {
        self.execute(Operation::Move {
            src: src.into(),
            dst: dst.into(),
        })
    }

    /// Copy `src` to `dst`. Directories are copied one level deep:
    /// subdirectories of the copy are empty.
    pub fn copy_node(&self, src: &str, dst: &str) -> Result<(), StewardError> {
        self.execute(Operation::Copy {
            src: src.into(),
            dst: dst.into(),
        })
    }

    pub fn read(&self, path: &str) -> Result<String, StewardError> {
        let state = self.lock()?;
        let node = state.root.resolve(path)?;
        let file = node
            .as_file()
            .ok_or_else(|| tinyfs::Error::is_a_directory(path))?;
        Ok(file.read().to_string())
    }

    /// Child names of a directory in insertion order
    pub fn list(&self, path: &str) -> Result<Vec<String>, StewardError> {
        let state = self.lock()?;
        Ok(state.root.resolve_dir(path)?.names())
    }

    pub fn stat(&self, path: &str) -> Result<NodeInfo, StewardError> {
        let state = self.lock()?;
        Ok(state.root.resolve(path)?.info())
    }

    pub fn exists(&self, path: &str) -> Result<bool, StewardError> {
        let state = self.lock()?;
        Ok(state.root.exists(path))
    }

    /// Every journal record in file order
    pub fn journal_entries(&self) -> Result<Vec<JournalEntry>, StewardError> {
        let state = self.lock()?;
        Ok(state.journal.read_all()?)
    }

    pub fn pending_entries(&self) -> Result<Vec<JournalEntry>, StewardError> {
        let state = self.lock()?;
        Ok(state.journal.pending_entries()?)
    }
}
