use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::node::{FsNode, NodeMeta};

/// Name of the root directory
pub const ROOT_NAME: &str = "/";

/// Represents a directory owning its named children.
///
/// Children are kept in insertion order, which is the order `names()`
/// lists them in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Directory {
    name: String,
    meta: NodeMeta,
    children: IndexMap<String, FsNode>,
}

impl Directory {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            meta: NodeMeta::now(),
            children: IndexMap::new(),
        }
    }

    /// An empty directory carrying previously stored times
    pub fn with_meta(name: &str, meta: NodeMeta) -> Self {
        Self {
            name: name.to_string(),
            meta,
            children: IndexMap::new(),
        }
    }

    /// A fresh, empty root directory
    pub fn root() -> Self {
        Self::new(ROOT_NAME)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
        self.meta.touch();
    }

    pub fn meta(&self) -> &NodeMeta {
        &self.meta
    }

    pub fn get(&self, name: &str) -> Option<&FsNode> {
        self.children.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut FsNode> {
        self.children.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.children.contains_key(name)
    }

    /// Insert a new child, refusing to replace an existing one
    pub fn add(&mut self, node: FsNode) -> Result<()> {
        if self.contains(node.name()) {
            return Err(Error::already_exists(node.name()));
        }
        self.put(node);
        Ok(())
    }

    /// Insert a child under its own name. An existing entry with that name
    /// is replaced in place and returned.
    pub fn put(&mut self, node: FsNode) -> Option<FsNode> {
        let prev = self.children.insert(node.name().to_string(), node);
        self.meta.touch();
        prev
    }

    /// Insert a child while rebuilding a stored tree. Unlike `add`, the
    /// directory's own modification time is left alone.
    pub fn restore(&mut self, node: FsNode) -> Result<()> {
        if self.contains(node.name()) {
            return Err(Error::already_exists(node.name()));
        }
        _ = self.children.insert(node.name().to_string(), node);
        Ok(())
    }

    /// Detach a child. Returns `None` when no such child exists.
    pub fn remove(&mut self, name: &str) -> Option<FsNode> {
        let removed = self.children.shift_remove(name);
        if removed.is_some() {
            self.meta.touch();
        }
        removed
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Child names in insertion order
    pub fn names(&self) -> Vec<String> {
        self.children.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &FsNode> {
        self.children.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::File;

    #[test]
    fn test_names_keep_insertion_order() {
        let mut dir = Directory::root();
        dir.add(File::new("zeta").into()).unwrap();
        dir.add(Directory::new("alpha").into()).unwrap();
        dir.add(File::new("mid").into()).unwrap();

        assert_eq!(dir.names(), vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_add_refuses_duplicate() {
        let mut dir = Directory::root();
        dir.add(File::new("a").into()).unwrap();

        assert_eq!(
            dir.add(Directory::new("a").into()),
            Err(Error::already_exists("a"))
        );
        assert!(!dir.get("a").unwrap().is_dir());
    }

    #[test]
    fn test_put_replaces_in_place() {
        let mut dir = Directory::root();
        dir.add(File::new("a").into()).unwrap();
        dir.add(File::new("b").into()).unwrap();

        let prev = dir.put(Directory::new("a").into());
        assert!(prev.is_some_and(|n| !n.is_dir()));
        assert_eq!(dir.names(), vec!["a", "b"]);
        assert!(dir.get("a").unwrap().is_dir());
    }

    #[test]
    fn test_remove_absent_is_none() {
        let mut dir = Directory::root();
        let before = *dir.meta();
        assert!(dir.remove("ghost").is_none());
        assert_eq!(*dir.meta(), before);
    }

    #[test]
    fn test_remove_keeps_order_of_rest() {
        let mut dir = Directory::root();
        for name in ["a", "b", "c"] {
            dir.add(File::new(name).into()).unwrap();
        }
        assert!(dir.remove("b").is_some());
        assert_eq!(dir.names(), vec!["a", "c"]);
        assert_eq!(dir.len(), 2);
    }

    #[test]
    fn test_restore_keeps_stored_times() {
        let meta = NodeMeta {
            created_at: 10,
            modified_at: 20,
        };
        let mut dir = Directory::with_meta("d", meta);
        dir.restore(File::new("f").into()).unwrap();
        assert_eq!(*dir.meta(), meta);
        assert_eq!(
            dir.restore(File::new("f").into()),
            Err(Error::already_exists("f"))
        );
    }
}
