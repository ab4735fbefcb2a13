use serde::{Deserialize, Serialize};

use crate::node::NodeMeta;

/// Represents a file with text content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct File {
    name: String,
    meta: NodeMeta,
    content: String,
}

impl File {
    pub fn new(name: &str) -> Self {
        Self::with_content(name, "")
    }

    pub fn with_content(name: &str, content: &str) -> Self {
        Self {
            name: name.to_string(),
            meta: NodeMeta::now(),
            content: content.to_string(),
        }
    }

    /// A file carrying previously stored times
    pub fn with_meta(name: &str, meta: NodeMeta, content: &str) -> Self {
        Self {
            name: name.to_string(),
            meta,
            content: content.to_string(),
        }
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

    pub fn read(&self) -> &str {
        &self.content
    }

    /// Replace the whole content
    pub fn write(&mut self, data: &str) {
        self.content.clear();
        self.content.push_str(data);
        self.meta.touch();
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}
