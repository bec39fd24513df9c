use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

use crate::models::block::{Block, BlockRecord};
use crate::models::profile::Profile;

#[derive(Debug)]
pub struct ContentError(pub String);

impl std::fmt::Display for ContentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Deserialize)]
struct Document {
    profile: Profile,
    #[serde(default)]
    blocks: Vec<BlockRecord>,
}

/// The loaded page: one profile and its blocks in document order.
/// Immutable after startup.
#[derive(Debug, Clone)]
pub struct Page {
    pub profile: Profile,
    pub blocks: Vec<Block>,
}

impl Page {
    /// Load a content document. `.toml` files are read as TOML, anything
    /// else as JSON.
    pub fn load(path: &Path) -> Result<Self, ContentError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ContentError(format!("cannot read {}: {}", path.display(), e)))?;
        let is_toml = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("toml"))
            .unwrap_or(false);
        if is_toml {
            Self::from_toml(&raw)
        } else {
            Self::from_json(&raw)
        }
    }

    pub fn from_json(raw: &str) -> Result<Self, ContentError> {
        let doc: Document = serde_json::from_str(raw)
            .map_err(|e| ContentError(format!("invalid content JSON: {}", e)))?;
        Self::from_document(doc)
    }

    pub fn from_toml(raw: &str) -> Result<Self, ContentError> {
        let doc: Document = toml::from_str(raw)
            .map_err(|e| ContentError(format!("invalid content TOML: {}", e)))?;
        Self::from_document(doc)
    }

    fn from_document(doc: Document) -> Result<Self, ContentError> {
        let mut seen = HashSet::new();
        let mut blocks = Vec::with_capacity(doc.blocks.len());
        for record in doc.blocks {
            if !seen.insert(record.id.clone()) {
                return Err(ContentError(format!("duplicate block id {:?}", record.id)));
            }
            blocks.push(Block::try_from(record).map_err(ContentError)?);
        }
        Ok(Page { profile: doc.profile, blocks })
    }

    pub fn block(&self, id: &str) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == id)
    }
}
