use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Represents errors that can occur in tree operations.
///
/// Every variant carries the path exactly as the caller supplied it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Entry already exists: {0}")]
    AlreadyExists(String),

    #[error("Path not found: {0}")]
    NotFound(String),

    #[error("Not a directory: {0}")]
    NotADirectory(String),

    #[error("Is a directory: {0}")]
    IsADirectory(String),

    #[error("Directory not empty: {0}")]
    NotEmpty(String),
}

impl Error {
    pub fn invalid_path<S: AsRef<str>>(path: S) -> Self {
        Error::InvalidPath(path.as_ref().to_string())
    }

    pub fn already_exists<S: AsRef<str>>(path: S) -> Self {
        Error::AlreadyExists(path.as_ref().to_string())
    }

    pub fn not_found<S: AsRef<str>>(path: S) -> Self {
        Error::NotFound(path.as_ref().to_string())
    }

    pub fn not_a_directory<S: AsRef<str>>(path: S) -> Self {
        Error::NotADirectory(path.as_ref().to_string())
    }

    pub fn is_a_directory<S: AsRef<str>>(path: S) -> Self {
        Error::IsADirectory(path.as_ref().to_string())
    }

    pub fn not_empty<S: AsRef<str>>(path: S) -> Self {
        Error::NotEmpty(path.as_ref().to_string())
    }

    /// The path the failing call was given
    pub fn path(&self) -> &str {
        match self {
            Error::InvalidPath(p)
            | Error::AlreadyExists(p)
            | Error::NotFound(p)
            | Error::NotADirectory(p)
            | Error::IsADirectory(p)
            | Error::NotEmpty(p) => p,
        }
    }
}
