//! Typed tree mutations and their journal form.

use oplog::{
    JournalEntry, OperationType, PARAM_CONTENT, PARAM_DST, PARAM_PATH, PARAM_SRC, Params, params,
};
use tinyfs::{Directory, Error, File, Result, path};

use crate::StewardError;

/// One mutation of the tree, as journaled and replayed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Mkdir { path: String },
    Rmdir { path: String },
    Touch { path: String },
    Write { path: String, content: String },
    Remove { path: String },
    Move { src: String, dst: String },
    Copy { src: String, dst: String },
}

impl Operation {
    pub fn op_type(&self) -> OperationType {
        match self {
            Operation::Mkdir { .. } => OperationType::Mkdir,
            Operation::Rmdir { .. } => OperationType::Rmdir,
            Operation::Touch { .. } => OperationType::Touch,
            Operation::Write { .. } => OperationType::Write,
            Operation::Remove { .. } => OperationType::Remove,
            Operation::Move { .. } => OperationType::Move,
            Operation::Copy { .. } => OperationType::Copy,
        }
    }

    /// Parameters as written to the journal
    pub fn params(&self) -> Params {
        match self {
            Operation::Mkdir { path }
            | Operation::Rmdir { path }
            | Operation::Touch { path }
            | Operation::Remove { path } => params([(PARAM_PATH, path.as_str())]),
            Operation::Write { path, content } => {
                params([(PARAM_PATH, path.as_str()), (PARAM_CONTENT, content.as_str())])
            }
            Operation::Move { src, dst } | Operation::Copy { src, dst } => {
                params([(PARAM_SRC, src.as_str()), (PARAM_DST, dst.as_str())])
            }
        }
    }

    /// Rebuild an operation from a journal record
    pub fn from_entry(entry: &JournalEntry) -> std::result::Result<Self, StewardError> {
        let get = |key: &str| {
            entry
                .param(key)
                .map(str::to_string)
                .ok_or_else(|| StewardError::invalid_record(&entry.id, format!("missing '{key}'")))
        };
        Ok(match entry.op {
            OperationType::Mkdir => Operation::Mkdir {
                path: get(PARAM_PATH)?,
            },
            OperationType::Rmdir => Operation::Rmdir {
                path: get(PARAM_PATH)?,
            },
            OperationType::Touch => Operation::Touch {
                path: get(PARAM_PATH)?,
            },
            OperationType::Write => Operation::Write {
                path: get(PARAM_PATH)?,
                content: get(PARAM_CONTENT)?,
            },
            OperationType::Remove => Operation::Remove {
                path: get(PARAM_PATH)?,
            },
            OperationType::Move => Operation::Move {
                src: get(PARAM_SRC)?,
                dst: get(PARAM_DST)?,
            },
            OperationType::Copy => Operation::Copy {
                src: get(PARAM_SRC)?,
                dst: get(PARAM_DST)?,
            },
        })
    }

    /// Validate against `root` and apply. On error the tree is unchanged.
    pub fn apply(&self, root: &mut Directory) -> Result<()> {
        match self {
            Operation::Mkdir { path } => mkdir(root, path),
            Operation::Rmdir { path } => rmdir(root, path),
            Operation::Touch { path } => touch(root, path),
            Operation::Write { path, content } => write(root, path, content),
            Operation::Remove { path } => remove(root, path),
            Operation::Move { src, dst } => move_node(root, src, dst),
            Operation::Copy { src, dst } => copy(root, src, dst),
        }
    }
}

fn mkdir(root: &mut Directory, p: &str) -> Result<()> {
    let (parent, name) = root.resolve_parent_mut(p)?;
    if parent.contains(name) {
        return Err(Error::already_exists(p));
    }
    _ = parent.put(Directory::new(name).into());
    Ok(())
}

fn rmdir(root: &mut Directory, p: &str) -> Result<()> {
    if path::is_root(p) {
        return Err(Error::invalid_path(p));
    }
    let dir = root.resolve_dir(p)?;
    if !dir.is_empty() {
        return Err(Error::not_empty(p));
    }
    let (parent, name) = root.resolve_parent_mut(p)?;
    _ = parent.remove(name);
    Ok(())
}

fn touch(root: &mut Directory, p: &str) -> Result<()> {
    let (parent, name) = root.resolve_parent_mut(p)?;
    if !parent.contains(name) {
        _ = parent.put(File::new(name).into());
    }
    Ok(())
}

fn write(root: &mut Directory, p: &str, content: &str) -> Result<()> {
    if path::is_root(p) {
        return Err(Error::is_a_directory(p));
    }
    let (parent, name) = root.resolve_parent_mut(p)?;
    if !parent.contains(name) {
        _ = parent.put(File::new(name).into());
    }
    let file = parent
        .get_mut(name)
        .ok_or_else(|| Error::not_found(p))?
        .as_file_mut()
        .ok_or_else(|| Error::is_a_directory(p))?;
    file.write(content);
    Ok(())
}

fn remove(root: &mut Directory, p: &str) -> Result<()> {
    let (parent, name) = root.resolve_parent_mut(p)?;
    parent.remove(name).map(|_| ()).ok_or_else(|| Error::not_found(p))
}

fn move_node(root: &mut Directory, src: &str, dst: &str) -> Result<()> {
    {
        let (parent, name) = root.resolve_parent(src)?;
        _ = root.resolve_parent(dst)?;
        if !parent.contains(name) {
            return Err(Error::not_found(src));
        }
    }
    if path::is_strictly_within(dst, src) {
        return Err(Error::invalid_path(dst));
    }

    let (src_parent, src_name) = root.resolve_parent_mut(src)?;
    let mut node = src_parent
        .remove(src_name)
        .ok_or_else(|| Error::not_found(src))?;

    // dst is not inside src, so its parent still resolves after the detach
    let (dst_parent, dst_name) = root.resolve_parent_mut(dst)?;
    node.rename(dst_name);
    _ = dst_parent.put(node);
    Ok(())
}

fn copy(root: &mut Directory, src: &str, dst: &str) -> Result<()> {
    let source = root.resolve(src)?;
    let (_, dst_name) = root.resolve_parent(dst)?;
    let dup = source.shallow_copy(dst_name);
    let (dst_parent, _) = root.resolve_parent_mut(dst)?;
    _ = dst_parent.put(dup);
    Ok(())
}
