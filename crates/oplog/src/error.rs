use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Reading or writing the journal file failed. Callers treat this as
    /// a durability failure.
    #[error("journal I/O failed on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A single line could not be decoded. Never escapes `Journal::read_all`.
    #[error("corrupt journal record: {0}")]
    CorruptRecord(String),
}

impl Error {
    pub fn io<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub fn corrupt<S: Into<String>>(reason: S) -> Self {
        Error::CorruptRecord(reason.into())
    }
}
