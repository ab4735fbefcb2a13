use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::StewardError;

/// Image file name inside a filesystem home directory
pub const IMAGE_FILE: &str = "fs.img";
/// Journal file name inside a filesystem home directory
pub const JOURNAL_FILE: &str = "fs.journal";
/// Environment variable naming the default home directory
pub const HOME_ENV: &str = "SIMFS_HOME";

/// Where a steward keeps its durable state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StewardConfig {
    pub image_path: PathBuf,
    pub journal_path: PathBuf,
}

impl StewardConfig {
    pub fn new<I: Into<PathBuf>, J: Into<PathBuf>>(image_path: I, journal_path: J) -> Self {
        Self {
            image_path: image_path.into(),
            journal_path: journal_path.into(),
        }
    }

    /// Image and journal side by side in `dir`
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self::new(dir.join(IMAGE_FILE), dir.join(JOURNAL_FILE))
    }

    /// Use the override directory if given, else `SIMFS_HOME`, else the
    /// current directory
    pub fn from_env_or(override_dir: Option<PathBuf>) -> Self {
        Self::in_dir(home_dir(override_dir, env::var(HOME_ENV).ok()))
    }

    pub fn with_image<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.image_path = path.into();
        self
    }

    pub fn with_journal<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.journal_path = path.into();
        self
    }

    /// Create the parent directories of both files
    pub(crate) fn prepare(&self) -> Result<(), StewardError> {
        for path in [&self.image_path, &self.journal_path] {
            let Some(parent) = path.parent() else {
                continue;
            };
            if parent.as_os_str().is_empty() {
                continue;
            }
            fs::create_dir_all(parent).map_err(|source| StewardError::Setup {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        Ok(())
    }
}

fn home_dir(override_dir: Option<PathBuf>, env_value: Option<String>) -> PathBuf {
    if let Some(dir) = override_dir {
        return dir;
    }
    match env_value {
        Some(v) if !v.trim().is_empty() => PathBuf::from(v),
        _ => PathBuf::from("."),
    }
}
