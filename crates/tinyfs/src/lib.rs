//! In-memory tree of directories and files.
//!
//! A [`Directory`] owns its children outright, so the tree is acyclic and
//! single-rooted by construction: moving a node means detaching it from
//! one parent and attaching it to another, copying means building a new
//! node.

mod dir;
mod entry_type;
mod error;
mod file;
mod node;
pub mod path;

pub use dir::{Directory, ROOT_NAME};
pub use entry_type::EntryType;
pub use error::{Error, Result};
pub use file::File;
pub use node::{FsNode, NodeInfo, NodeMeta, NodeRef, Timestamp, now_millis};
