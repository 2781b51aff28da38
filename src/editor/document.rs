use std::collections::BTreeMap;
use std::fmt;

pub const PARAGRAPH_BLOCK: &str = "core/paragraph";
pub const IMAGE_BLOCK: &str = "core/image";

/// Client-side identifier of a block in the open document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(String);

impl BlockId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A block to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBlock {
    pub name: String,
    pub attributes: BTreeMap<String, String>,
}

impl NewBlock {
    pub fn paragraph(content: impl Into<String>) -> Self {
        Self {
            name: PARAGRAPH_BLOCK.to_string(),
            attributes: BTreeMap::from([("content".to_string(), content.into())]),
        }
    }
}

/// The slice of the host editor the panel is allowed to touch.
pub trait EditorDocument {
    fn attribute(&self, block: &BlockId, name: &str) -> Option<String>;

    fn set_attribute(
        &mut self,
        block: &BlockId,
        name: &str,
        value: String,
    ) -> Result<(), DocumentError>;

    /// Insert `block` directly after `anchor` and return its id.
    ///
    /// When `replacing` names the block that currently directly follows
    /// `anchor`, that block is removed first. A `replacing` block found
    /// anywhere else is left alone.
    fn insert_sibling_after(
        &mut self,
        anchor: &BlockId,
        block: NewBlock,
        replacing: Option<&BlockId>,
    ) -> Result<BlockId, DocumentError>;

    fn set_title_and_save(&mut self, title: &str) -> Result<(), DocumentError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("Block {0} not found")]
    BlockNotFound(BlockId),

    #[error("Failed to save document: {0}")]
    SaveFailed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub id: BlockId,
    pub name: String,
    pub attributes: BTreeMap<String, String>,
}

/// Flat, ordered in-memory document.
#[derive(Debug, Default)]
pub struct BlockList {
    blocks: Vec<Block>,
    title: String,
    saved_title: Option<String>,
    next_id: u64,
}

impl BlockList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, block: NewBlock) -> BlockId {
        let id = self.allocate_id();
        self.blocks.push(Block {
            id: id.clone(),
            name: block.name,
            attributes: block.attributes,
        });
        id
    }

    /// Append an image block referencing the media item `image_id`.
    pub fn push_image(&mut self, image_id: &str, url: &str) -> BlockId {
        self.push(NewBlock {
            name: IMAGE_BLOCK.to_string(),
            attributes: BTreeMap::from([
                ("id".to_string(), image_id.to_string()),
                ("url".to_string(), url.to_string()),
            ]),
        })
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Title as of the last save.
    pub fn saved_title(&self) -> Option<&str> {
        self.saved_title.as_deref()
    }

    fn allocate_id(&mut self) -> BlockId {
        self.next_id += 1;
        BlockId::new(format!("block-{}", self.next_id))
    }

    fn position(&self, id: &BlockId) -> Result<usize, DocumentError> {
        self.blocks
            .iter()
            .position(|b| &b.id == id)
            .ok_or_else(|| DocumentError::BlockNotFound(id.clone()))
    }
}

impl EditorDocument for BlockList {
    fn attribute(&self, block: &BlockId, name: &str) -> Option<String> {
        self.blocks
            .iter()
            .find(|b| &b.id == block)
            .and_then(|b| b.attributes.get(name).cloned())
    }

    fn set_attribute(
        &mut self,
        block: &BlockId,
        name: &str,
        value: String,
    ) -> Result<(), DocumentError> {
        let index = self.position(block)?;
        self.blocks[index].attributes.insert(name.to_string(), value);
        Ok(())
    }

    fn insert_sibling_after(
        &mut self,
        anchor: &BlockId,
        block: NewBlock,
        replacing: Option<&BlockId>,
    ) -> Result<BlockId, DocumentError> {
        let index = self.position(anchor)?;

        if let Some(previous) = replacing {
            if self.blocks.get(index + 1).map(|b| &b.id) == Some(previous) {
                self.blocks.remove(index + 1);
            }
        }

        let id = self.allocate_id();
        self.blocks.insert(
            index + 1,
            Block {
                id: id.clone(),
                name: block.name,
                attributes: block.attributes,
            },
        );
        Ok(id)
    }

    fn set_title_and_save(&mut self, title: &str) -> Result<(), DocumentError> {
        self.title = title.to_string();
        self.saved_title = Some(self.title.clone());
        Ok(())
    }
}
