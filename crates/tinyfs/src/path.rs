//! Path splitting and resolution against a root directory.
//!
//! Paths are plain strings. Surrounding whitespace and a single leading
//! `/` are dropped, the rest is split on `/`, and trailing empty segments
//! are ignored. There is no `.` or `..` handling: every segment is a
//! literal child name.

use crate::dir::Directory;
use crate::error::{Error, Result};
use crate::node::{FsNode, NodeRef};

/// Split a path into its name segments. The root yields no segments.
pub fn segments(path: &str) -> Vec<&str> {
    let trimmed = path.trim();
    let relative = trimmed.strip_prefix('/').unwrap_or(trimmed);
    if relative.is_empty() {
        return Vec::new();
    }
    let mut parts: Vec<&str> = relative.split('/').collect();
    while parts.last().is_some_and(|s| s.is_empty()) {
        _ = parts.pop();
    }
    parts
}

pub fn is_root(path: &str) -> bool {
    segments(path).is_empty()
}

/// True when `inner` names a node strictly below `outer`
pub fn is_strictly_within(inner: &str, outer: &str) -> bool {
    let inner = segments(inner);
    let outer = segments(outer);
    inner.len() > outer.len() && inner.starts_with(&outer)
}

impl Directory {
    /// Walk all but the last segment of `path`. Every intermediate segment
    /// must exist and be a directory. Returns the parent and the final name.
    pub fn resolve_parent<'a, 'p>(&'a self, path: &'p str) -> Result<(&'a Directory, &'p str)> {
        let parts = segments(path);
        let Some((name, dirs)) = parts.split_last() else {
            return Err(Error::invalid_path(path));
        };
        let mut cur = self;
        for seg in dirs {
            cur = cur
                .get(seg)
                .and_then(FsNode::as_dir)
                .ok_or_else(|| Error::invalid_path(path))?;
        }
        Ok((cur, *name))
    }

    pub fn resolve_parent_mut<'a, 'p>(
        &'a mut self,
        path: &'p str,
    ) -> Result<(&'a mut Directory, &'p str)> {
        let parts = segments(path);
        let Some((name, dirs)) = parts.split_last() else {
            return Err(Error::invalid_path(path));
        };
        let mut cur = self;
        for seg in dirs {
            cur = cur
                .get_mut(seg)
                .and_then(FsNode::as_dir_mut)
                .ok_or_else(|| Error::invalid_path(path))?;
        }
        Ok((cur, *name))
    }

    /// Resolve `path` to a node. The root path resolves to `self`.
    pub fn resolve<'a>(&'a self, path: &str) -> Result<NodeRef<'a>> {
        if is_root(path) {
            return Ok(NodeRef::Directory(self));
        }
        let (parent, name) = self
            .resolve_parent(path)
            .map_err(|_| Error::not_found(path))?;
        parent
            .get(name)
            .map(FsNode::as_node_ref)
            .ok_or_else(|| Error::not_found(path))
    }

    /// Resolve `path` to a directory
    pub fn resolve_dir<'a>(&'a self, path: &str) -> Result<&'a Directory> {
        self.resolve(path)?
            .as_dir()
            .ok_or_else(|| Error::not_a_directory(path))
    }

    pub fn exists(&self, path: &str) -> bool {
        self.resolve(path).is_ok()
    }
}
