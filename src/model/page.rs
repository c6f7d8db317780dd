//! Page-level types.

use super::{BlockKind, ContentBlock};
use serde::{Deserialize, Serialize};

/// One fixed-size page container in the laid-out document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// Layout node id
    pub id: String,

    /// Ordinal position in the document (0-indexed)
    pub index: usize,

    /// Page label (the `data-page-number` attribute, or `index + 1`)
    pub page_number: String,

    /// Rendered height in px (0 when unmeasured)
    pub height: f32,

    /// Maximum allowed height in px
    pub max_height: f32,

    /// Whether the layout engine produced a height for this page
    pub measured: bool,

    /// Content blocks in document order
    pub blocks: Vec<ContentBlock>,
}

impl Page {
    /// Create a new measured page without blocks.
    pub fn new(index: usize, height: f32, max_height: f32) -> Self {
        Self {
            id: format!("page-{}", index + 1),
            index,
            page_number: (index + 1).to_string(),
            height,
            max_height,
            measured: true,
            blocks: Vec::new(),
        }
    }

    /// Create a page whose height could not be measured.
    pub fn unmeasured(index: usize, max_height: f32) -> Self {
        Self {
            measured: false,
            ..Self::new(index, 0.0, max_height)
        }
    }

    /// Set the layout node id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Set the page label.
    pub fn with_page_number(mut self, label: impl Into<String>) -> Self {
        self.page_number = label.into();
        self
    }

    /// Add a block to the page.
    pub fn add_block(&mut self, block: ContentBlock) {
        self.blocks.push(block);
    }

    /// Count blocks by kind.
    pub fn block_counts(&self) -> BlockCounts {
        let mut counts = BlockCounts::default();
        for block in &self.blocks {
            match block.kind {
                BlockKind::Heading { .. } => counts.headings += 1,
                BlockKind::Paragraph => counts.paragraphs += 1,
                BlockKind::Image => counts.images += 1,
                BlockKind::Table => counts.tables += 1,
                BlockKind::List => counts.lists += 1,
                BlockKind::Other { .. } => counts.other += 1,
            }
        }
        counts
    }
}

/// Per-page count of blocks by kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockCounts {
    pub headings: u32,
    pub paragraphs: u32,
    pub images: u32,
    pub tables: u32,
    pub lists: u32,
    pub other: u32,
}

impl BlockCounts {
    /// Total number of blocks.
    pub fn total(&self) -> u32 {
        self.headings + self.paragraphs + self.images + self.tables + self.lists + self.other
    }
}
