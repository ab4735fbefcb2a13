use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Operation parameters keyed by name (`path`, `content`, `src`, `dst`)
pub type Params = BTreeMap<String, String>;

pub const PARAM_PATH: &str = "path";
pub const PARAM_CONTENT: &str = "content";
pub const PARAM_SRC: &str = "src";
pub const PARAM_DST: &str = "dst";

/// Kind of mutation a journal record describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationType {
    Mkdir,
    Rmdir,
    Touch,
    Write,
    Remove,
    Move,
    Copy,
}

impl OperationType {
    pub const ALL: [OperationType; 7] = [
        OperationType::Mkdir,
        OperationType::Rmdir,
        OperationType::Touch,
        OperationType::Write,
        OperationType::Remove,
        OperationType::Move,
        OperationType::Copy,
    ];

    /// Name written to the journal file
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationType::Mkdir => "MKDIR",
            OperationType::Rmdir => "RMDIR",
            OperationType::Touch => "TOUCH",
            OperationType::Write => "WRITE",
            OperationType::Remove => "RM",
            OperationType::Move => "MV",
            OperationType::Copy => "CP",
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OperationType::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| Error::corrupt(format!("unknown operation type '{s}'")))
    }
}

/// Lifecycle of a journal record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryStatus {
    /// Written before the mutation; not yet known to be durable
    Pending,
    /// The mutation's effects reached the image
    Committed,
}

impl EntryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryStatus::Pending => "PENDING",
            EntryStatus::Committed => "COMMITTED",
        }
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(EntryStatus::Pending),
            // Older journals spell it COMMIT
            "COMMITTED" | "COMMIT" => Ok(EntryStatus::Committed),
            other => Err(Error::corrupt(format!("unknown status '{other}'"))),
        }
    }
}

/// One record of the journal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalEntry {
    pub id: String,
    pub op: OperationType,
    pub params: Params,
    pub status: EntryStatus,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
}

impl JournalEntry {
    /// A fresh pending record with a time-ordered unique id
    pub fn pending(op: OperationType, params: Params) -> Self {
        Self {
            id: uuid7::uuid7().to_string(),
            op,
            params,
            status: EntryStatus::Pending,
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn is_pending(&self) -> bool {
        self.status == EntryStatus::Pending
    }
}

/// Build a parameter map from key/value pairs
pub fn params<const N: usize>(pairs: [(&str, &str); N]) -> Params {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_names_round_trip() {
        for op in OperationType::ALL {
            assert_eq!(op.as_str().parse::<OperationType>().unwrap(), op);
        }
        assert!("CHMOD".parse::<OperationType>().is_err());
        assert!("mkdir".parse::<OperationType>().is_err());
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("PENDING".parse::<EntryStatus>().unwrap(), EntryStatus::Pending);
        assert_eq!("COMMITTED".parse::<EntryStatus>().unwrap(), EntryStatus::Committed);
        assert_eq!("COMMIT".parse::<EntryStatus>().unwrap(), EntryStatus::Committed);
        assert!("DONE".parse::<EntryStatus>().is_err());
    }

    #[test]
    fn test_pending_ids_are_unique() {
        let a = JournalEntry::pending(OperationType::Touch, Params::new());
        let b = JournalEntry::pending(OperationType::Touch, Params::new());
        assert_ne!(a.id, b.id);
        assert!(a.is_pending());
    }

    #[test]
    fn test_params_helper() {
        let p = params([(PARAM_SRC, "/a"), (PARAM_DST, "/b")]);
        let entry = JournalEntry::pending(OperationType::Move, p);
        assert_eq!(entry.param(PARAM_SRC), Some("/a"));
        assert_eq!(entry.param(PARAM_DST), Some("/b"));
        assert_eq!(entry.param(PARAM_PATH), None);
    }
}
