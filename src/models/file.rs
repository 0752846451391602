use serde::{Deserialize, Serialize};

use crate::models::item::ItemSection;
use crate::resolve::Identified;

/// A binary attachment on an item.
///
/// The bytes are never part of the wire representation. Use
/// [`files::content`](crate::files::content) to fetch them and
/// [`File::with_content`] to keep them next to the record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct File {
    /// The UUID of the file.
    pub id: String,
    /// File name.
    #[serde(default)]
    pub name: String,
    /// Section of the item the file is attached to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<ItemSection>,
    /// Size of the content in bytes.
    #[serde(default)]
    pub size: u64,
    /// Server path the content is served from.
    #[serde(default)]
    pub content_path: String,
    #[serde(skip)]
    content: Option<Vec<u8>>,
}

impl File {
    #[cfg(test)]
    pub(crate) fn new(id: &str, name: &str, size: u64, content_path: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            section: None,
            size,
            content_path: content_path.to_string(),
            content: None,
        }
    }

    /// Returns a copy of this record carrying `content`.
    pub fn with_content(mut self, content: Vec<u8>) -> Self {
        self.content = Some(content);
        self
    }

    /// The cached content, if it was attached with [`with_content`](Self::with_content).
    pub fn content(&self) -> Option<&[u8]> {
        self.content.as_deref()
    }

    /// True once content has been attached.
    pub fn is_fetched(&self) -> bool {
        self.content.is_some()
    }
}

impl Identified for File {
    fn id(&self) -> &str {
        &self.id
    }
}
