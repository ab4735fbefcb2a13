//! The image file: a JSON document holding the whole tree.
//!
//! Nodes are stored as a flat list in pre-order, each record carrying its
//! depth below the root, so the document nests no deeper however deep the
//! tree is. Loading rebuilds the tree without recursion.
//!
//! The image is overwritten in place on every save. A crash mid-write can
//! leave it truncated, which the next load treats as "no prior state".

use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use diagnostics::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tinyfs::{Directory, EntryType, FsNode, NodeMeta, ROOT_NAME, Timestamp, now_millis};

/// Version written into every image
pub const FORMAT_VERSION: u32 = 2;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("encoding error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported format version {0}")]
    Version(u32),

    #[error("inconsistent tree: {0}")]
    Structure(String),
}

#[derive(Serialize)]
struct ImageOut<'a> {
    format_version: u32,
    saved_at: Timestamp,
    nodes: Vec<RecordOut<'a>>,
}

/// One node of the tree. The root is the first record, at depth 0.
#[derive(Serialize)]
struct RecordOut<'a> {
    depth: usize,
    kind: EntryType,
    name: &'a str,
    created_at: Timestamp,
    modified_at: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<&'a str>,
}

#[derive(Deserialize)]
struct ImageIn {
    format_version: u32,
    #[serde(default)]
    nodes: Vec<RecordIn>,
}

#[derive(Deserialize)]
struct RecordIn {
    depth: usize,
    kind: EntryType,
    name: String,
    created_at: Timestamp,
    modified_at: Timestamp,
    #[serde(default)]
    content: Option<String>,
}

impl<'a> RecordOut<'a> {
    fn new(depth: usize, node: &'a FsNode) -> Self {
        let meta = node.meta();
        Self {
            depth,
            kind: node.entry_type(),
            name: node.name(),
            created_at: meta.created_at,
            modified_at: meta.modified_at,
            content: node.as_file().map(|f| f.read()),
        }
    }

    fn root(root: &'a Directory) -> Self {
        Self {
            depth: 0,
            kind: EntryType::Directory,
            name: root.name(),
            created_at: root.meta().created_at,
            modified_at: root.meta().modified_at,
            content: None,
        }
    }
}

impl RecordIn {
    fn meta(&self) -> NodeMeta {
        NodeMeta {
            created_at: self.created_at,
            modified_at: self.modified_at,
        }
    }

    fn into_node(self) -> FsNode {
        let meta = self.meta();
        match self.kind {
            EntryType::Directory => Directory::with_meta(&self.name, meta).into(),
            EntryType::File => {
                let content = self.content.unwrap_or_default();
                tinyfs::File::with_meta(&self.name, meta, &content).into()
            }
        }
    }
}

/// List every node in pre-order, children in insertion order
fn flatten(root: &Directory) -> Vec<RecordOut<'_>> {
    let mut records = vec![RecordOut::root(root)];
    let mut stack: Vec<(usize, &FsNode)> = root.iter().rev().map(|n| (1, n)).collect();
    while let Some((depth, node)) = stack.pop() {
        records.push(RecordOut::new(depth, node));
        if let Some(dir) = node.as_dir() {
            stack.extend(dir.iter().rev().map(|n| (depth + 1, n)));
        }
    }
    records
}

/// Rebuild the tree from pre-order records
fn rebuild(records: Vec<RecordIn>) -> Result<Directory, ImageError> {
    let mut records = records.into_iter();
    let root = match records.next() {
        Some(r) if r.depth == 0 && r.kind == EntryType::Directory && r.name == ROOT_NAME => {
            Directory::with_meta(ROOT_NAME, r.meta())
        }
        Some(r) => {
            return Err(ImageError::Structure(format!(
                "root is a {} named '{}' at depth {}",
                r.kind, r.name, r.depth
            )));
        }
        None => return Err(ImageError::Structure("no root record".to_string())),
    };

    // Directories on the branch being rebuilt, root first
    let mut open = vec![root];
    for record in records {
        if record.depth == 0 || record.depth > open.len() {
            return Err(ImageError::Structure(format!(
                "'{}' at depth {} has no parent",
                record.name, record.depth
            )));
        }
        if record.name.is_empty() || record.name.contains('/') {
            return Err(ImageError::Structure(format!(
                "invalid name '{}'",
                record.name
            )));
        }
        close_to(&mut open, record.depth)?;
        match record.into_node() {
            FsNode::Directory(dir) => open.push(dir),
            file => attach(&mut open, file)?,
        }
    }
    close_to(&mut open, 1)?;
    open.pop()
        .ok_or_else(|| ImageError::Structure("no root record".to_string()))
}

/// Attach open directories deeper than `depth` to their parents
fn close_to(open: &mut Vec<Directory>, depth: usize) -> Result<(), ImageError> {
    while open.len() > depth {
        if let Some(dir) = open.pop() {
            attach(open, dir.into())?;
        }
    }
    Ok(())
}

fn attach(open: &mut [Directory], node: FsNode) -> Result<(), ImageError> {
    let parent = open
        .last_mut()
        .ok_or_else(|| ImageError::Structure("no root record".to_string()))?;
    let parent_name = parent.name().to_string();
    parent
        .restore(node)
        .map_err(|e| ImageError::Structure(format!("{e} in '{parent_name}'")))
}

/// Reads and writes the image file at a fixed path
#[derive(Debug, Clone)]
pub struct ImageStore {
    path: PathBuf,
}

impl ImageStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored tree. `Ok(None)` when no image exists yet.
    pub fn try_load(&self) -> Result<Option<Directory>, ImageError> {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let image: ImageIn = serde_json::from_reader(BufReader::new(file))?;
        if image.format_version != FORMAT_VERSION {
            return Err(ImageError::Version(image.format_version));
        }
        Ok(Some(rebuild(image.nodes)?))
    }

    /// Load the stored tree, falling back to `None` on any failure
    pub fn load(&self) -> Option<Directory> {
        match self.try_load() {
            Ok(root) => root,
            Err(e) => {
                let path = self.path.display().to_string();
                let reason = e.to_string();
                warn!("ignoring unreadable image {path}: {reason}", path: path, reason: reason);
                None
            }
        }
    }

    /// Overwrite the image with `root`
    pub fn save(&self, root: &Directory) -> Result<(), ImageError> {
        let file = File::create(&self.path)?;
        let mut writer = BufWriter::new(file);
        let image = ImageOut {
            format_version: FORMAT_VERSION,
            saved_at: now_millis(),
            nodes: flatten(root),
        };
        serde_json::to_writer(&mut writer, &image)?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
        debug!("image saved, {entries} nodes", entries: image.nodes.len());
        Ok(())
    }
}
