//! Write-ahead operation journal.
//!
//! Each mutating filesystem call is recorded here as `PENDING` before the
//! tree changes and flipped to `COMMITTED` once the new image is on disk.
//! Whatever is still pending at startup was interrupted and gets replayed.

pub mod codec;
mod entry;
mod error;
mod journal;

pub use entry::{
    EntryStatus, JournalEntry, OperationType, PARAM_CONTENT, PARAM_DST, PARAM_PATH, PARAM_SRC,
    Params, params,
};
pub use error::{Error, Result};
pub use journal::Journal;
