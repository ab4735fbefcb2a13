use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use diagnostics::*;

use crate::codec::{decode_line, encode_line};
use crate::entry::{EntryStatus, JournalEntry, OperationType, Params};
use crate::error::{Error, Result};

/// Durable, line-oriented log of operation records.
///
/// Appends never touch earlier lines. Marking a record committed rewrites
/// the whole file. File handles live only for the duration of one call.
/// The journal does no locking of its own: callers serialize access.
#[derive(Debug, Clone)]
pub struct Journal {
    path: PathBuf,
}

/// A line of the journal file as read from disk
enum Line {
    Entry(JournalEntry),
    /// Undecodable line, preserved byte-for-byte on rewrite
    Raw(Vec<u8>),
}

impl Journal {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a new pending record and return its id
    pub fn append_pending(&self, op: OperationType, params: Params) -> Result<String> {
        let entry = JournalEntry::pending(op, params);
        self.append(&entry)?;
        debug!("journal append {id} {op}", id: entry.id.as_str(), op: op.as_str());
        Ok(entry.id)
    }

    fn append(&self, entry: &JournalEntry) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| Error::io(&self.path, e))?;

        let mut line = String::new();
        // A torn last line must not absorb this record
        if !ends_with_newline(&mut file).map_err(|e| Error::io(&self.path, e))? {
            line.push('\n');
        }
        line.push_str(&encode_line(entry));
        line.push('\n');

        file.write_all(line.as_bytes())
            .and_then(|_| file.sync_data())
            .map_err(|e| Error::io(&self.path, e))
    }

    /// Mark every record with this id committed. Returns whether anything
    /// changed; the file is only rewritten when it did.
    pub fn mark_committed(&self, id: &str) -> Result<bool> {
        let mut lines = self.scan()?;
        let mut changed = false;
        for line in &mut lines {
            if let Line::Entry(entry) = line {
                if entry.id == id && entry.status != EntryStatus::Committed {
                    entry.status = EntryStatus::Committed;
                    changed = true;
                }
            }
        }

        if changed {
            self.rewrite(&lines)?;
            debug!("journal commit {id}", id: id);
        }
        Ok(changed)
    }

    /// Every decodable record in file order. Corrupt lines are logged and
    /// skipped.
    pub fn read_all(&self) -> Result<Vec<JournalEntry>> {
        Ok(self
            .scan()?
            .into_iter()
            .filter_map(|line| match line {
                Line::Entry(entry) => Some(entry),
                Line::Raw(_) => None,
            })
            .collect())
    }

    /// Records still pending, in file order
    pub fn pending_entries(&self) -> Result<Vec<JournalEntry>> {
        Ok(self
            .read_all()?
            .into_iter()
            .filter(JournalEntry::is_pending)
            .collect())
    }

    fn scan(&self) -> Result<Vec<Line>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(Error::io(&self.path, e)),
        };

        let mut lines = Vec::new();
        for (idx, raw) in bytes.split(|b| *b == b'\n').enumerate() {
            let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
            if raw.is_empty() {
                continue;
            }
            let decoded = std::str::from_utf8(raw)
                .map_err(|e| Error::corrupt(format!("invalid UTF-8: {e}")))
                .and_then(decode_line);
            match decoded {
                Ok(entry) => lines.push(Line::Entry(entry)),
                Err(e) => {
                    let line_no = idx + 1;
                    let reason = e.to_string();
                    warn!(
                        "skipping journal line {line_no}: {reason}",
                        line_no: line_no,
                        reason: reason
                    );
                    lines.push(Line::Raw(raw.to_vec()));
                }
            }
        }
        Ok(lines)
    }

    /// Replace the file contents. The new contents are written to a
    /// sibling temporary file which is then renamed over the journal.
    fn rewrite(&self, lines: &[Line]) -> Result<()> {
        let mut buf = Vec::new();
        for line in lines {
            match line {
                Line::Entry(entry) => buf.extend_from_slice(encode_line(entry).as_bytes()),
                Line::Raw(raw) => buf.extend_from_slice(raw),
            }
            buf.push(b'\n');
        }

        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let mut tmp =
            tempfile::NamedTempFile::new_in(&dir).map_err(|e| Error::io(&self.path, e))?;
        tmp.write_all(&buf)
            .and_then(|_| tmp.as_file().sync_data())
            .map_err(|e| Error::io(&self.path, e))?;
        _ = tmp
            .persist(&self.path)
            .map_err(|e| Error::io(&self.path, e.error))?;
        Ok(())
    }
}

/// True for an empty file or one whose last byte is a newline
fn ends_with_newline(file: &mut fs::File) -> std::io::Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(true);
    }
    let mut last = [0u8; 1];
    _ = file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}
