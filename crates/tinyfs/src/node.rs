use serde::{Deserialize, Serialize};

use crate::dir::Directory;
use crate::entry_type::EntryType;
use crate::file::File;

/// Milliseconds since the Unix epoch
pub type Timestamp = i64;

pub fn now_millis() -> Timestamp {
    chrono::Utc::now().timestamp_millis()
}

/// Creation and modification times shared by every node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeMeta {
    pub created_at: Timestamp,
    pub modified_at: Timestamp,
}

impl NodeMeta {
    pub fn now() -> Self {
        let ts = now_millis();
        Self {
            created_at: ts,
            modified_at: ts,
        }
    }

    pub fn touch(&mut self) {
        self.modified_at = now_millis();
    }
}

/// A node in the tree. Each node is owned by exactly one parent
/// directory; the root directory is owned by the filesystem itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FsNode {
    Directory(Directory),
    File(File),
}

/// Borrowed view of a resolved node. The root resolves to a directory
/// that is not stored inside any `FsNode`, hence the separate type.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Directory(&'a Directory),
    File(&'a File),
}

/// Read-only summary of a node
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeInfo {
    pub name: String,
    pub kind: EntryType,
    /// Content length in bytes for files, child count for directories
    pub size: usize,
    pub created_at: Timestamp,
    pub modified_at: Timestamp,
}

impl FsNode {
    pub fn name(&self) -> &str {
        match self {
            FsNode::Directory(d) => d.name(),
            FsNode::File(f) => f.name(),
        }
    }

    pub fn meta(&self) -> &NodeMeta {
        match self {
            FsNode::Directory(d) => d.meta(),
            FsNode::File(f) => f.meta(),
        }
    }

    pub fn entry_type(&self) -> EntryType {
        match self {
            FsNode::Directory(_) => EntryType::Directory,
            FsNode::File(_) => EntryType::File,
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, FsNode::Directory(_))
    }

    /// Rename the node and bump its modification time
    pub fn rename(&mut self, name: &str) {
        match self {
            FsNode::Directory(d) => d.set_name(name),
            FsNode::File(f) => f.set_name(name),
        }
    }

    pub fn as_dir(&self) -> Option<&Directory> {
        match self {
            FsNode::Directory(d) => Some(d),
            FsNode::File(_) => None,
        }
    }

    pub fn as_dir_mut(&mut self) -> Option<&mut Directory> {
        match self {
            FsNode::Directory(d) => Some(d),
            FsNode::File(_) => None,
        }
    }

    pub fn as_file(&self) -> Option<&File> {
        match self {
            FsNode::File(f) => Some(f),
            FsNode::Directory(_) => None,
        }
    }

    pub fn as_file_mut(&mut self) -> Option<&mut File> {
        match self {
            FsNode::File(f) => Some(f),
            FsNode::Directory(_) => None,
        }
    }

    pub fn as_node_ref(&self) -> NodeRef<'_> {
        match self {
            FsNode::Directory(d) => NodeRef::Directory(d),
            FsNode::File(f) => NodeRef::File(f),
        }
    }
}

impl<'a> NodeRef<'a> {
    pub fn name(&self) -> &'a str {
        match self {
            NodeRef::Directory(d) => d.name(),
            NodeRef::File(f) => f.name(),
        }
    }

    pub fn as_dir(&self) -> Option<&'a Directory> {
        match self {
            NodeRef::Directory(d) => Some(d),
            NodeRef::File(_) => None,
        }
    }

    pub fn as_file(&self) -> Option<&'a File> {
        match self {
            NodeRef::File(f) => Some(f),
            NodeRef::Directory(_) => None,
        }
    }

    pub fn info(&self) -> NodeInfo {
        match self {
            NodeRef::Directory(d) => NodeInfo {
                name: d.name().to_string(),
                kind: EntryType::Directory,
                size: d.len(),
                created_at: d.meta().created_at,
                modified_at: d.meta().modified_at,
            },
            NodeRef::File(f) => NodeInfo {
                name: f.name().to_string(),
                kind: EntryType::File,
                size: f.len(),
                created_at: f.meta().created_at,
                modified_at: f.meta().modified_at,
            },
        }
    }

    /// Duplicate this node under a new name.
    ///
    /// A file copies its content. A directory copies only its immediate
    /// children: files keep their content, subdirectories come out empty.
    pub fn shallow_copy(&self, name: &str) -> FsNode {
        match self {
            NodeRef::File(f) => FsNode::File(File::with_content(name, f.read())),
            NodeRef::Directory(d) => {
                let mut copy = Directory::new(name);
                for child in d.iter() {
                    let dup = match child {
                        FsNode::Directory(sub) => FsNode::Directory(Directory::new(sub.name())),
                        FsNode::File(f) => FsNode::File(File::with_content(f.name(), f.read())),
                    };
                    _ = copy.put(dup);
                }
                FsNode::Directory(copy)
            }
        }
    }
}

impl From<Directory> for FsNode {
    fn from(d: Directory) -> Self {
        FsNode::Directory(d)
    }
}

impl From<File> for FsNode {
    fn from(f: File) -> Self {
        FsNode::File(f)
    }
}
