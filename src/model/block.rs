//! Content block types.

use serde::{Deserialize, Serialize};

/// Kind of a content block nested inside a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BlockKind {
    /// A heading (`h1`..`h6`)
    Heading {
        /// Heading level (1-6)
        level: u8,
    },

    /// A paragraph of text
    Paragraph,

    /// An image
    Image,

    /// A table
    Table,

    /// An ordered or unordered list
    List,

    /// Any other element, identified by its tag name
    Other {
        /// Lowercase tag name
        tag: String,
    },
}

impl BlockKind {
    /// Create a heading kind, clamping the level to 1-6.
    pub fn heading(level: u8) -> Self {
        BlockKind::Heading {
            level: level.clamp(1, 6),
        }
    }

    /// Map an HTML tag name to a block kind.
    pub fn from_tag(tag: &str) -> Self {
        let tag = tag.trim().to_ascii_lowercase();
        match tag.as_str() {
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                let level = tag[1..].parse().unwrap_or(1);
                BlockKind::heading(level)
            }
            "p" => BlockKind::Paragraph,
            "img" => BlockKind::Image,
            "table" => BlockKind::Table,
            "ul" | "ol" => BlockKind::List,
            _ => BlockKind::Other { tag },
        }
    }

    /// HTML tag name for this kind.
    pub fn tag(&self) -> String {
        match self {
            BlockKind::Heading { level } => format!("h{}", level),
            BlockKind::Paragraph => "p".to_string(),
            BlockKind::Image => "img".to_string(),
            BlockKind::Table => "table".to_string(),
            BlockKind::List => "ul".to_string(),
            BlockKind::Other { tag } => tag.clone(),
        }
    }

    /// Check if this is a heading.
    pub fn is_heading(&self) -> bool {
        matches!(self, BlockKind::Heading { .. })
    }
}

/// Rendered geometry of a block.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockMetrics {
    /// Rendered height in px
    pub height: f32,

    /// Distance from the block's bottom edge to its page's bottom edge, in px.
    /// Negative when the block extends past the page.
    pub bottom_offset: f32,
}

impl BlockMetrics {
    /// Create new block metrics.
    pub fn new(height: f32, bottom_offset: f32) -> Self {
        Self {
            height,
            bottom_offset,
        }
    }
}

/// A heading, paragraph, image, table or other element inside a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentBlock {
    /// Layout node id
    pub id: String,

    /// Block kind
    #[serde(flatten)]
    pub kind: BlockKind,

    /// Text content (alt text for images)
    pub text: String,

    /// Row count for tables
    pub rows: Option<u32>,

    /// Rendered geometry, `None` when the block could not be measured
    pub metrics: Option<BlockMetrics>,
}

impl ContentBlock {
    /// Create a new block without text or metrics.
    pub fn new(id: impl Into<String>, kind: BlockKind) -> Self {
        Self {
            id: id.into(),
            kind,
            text: String::new(),
            rows: None,
            metrics: None,
        }
    }

    /// Set the text content.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set the table row count.
    pub fn with_rows(mut self, rows: u32) -> Self {
        self.rows = Some(rows);
        self
    }

    /// Set rendered geometry.
    pub fn with_metrics(mut self, height: f32, bottom_offset: f32) -> Self {
        self.metrics = Some(BlockMetrics::new(height, bottom_offset));
        self
    }

    /// Rendered height, 0 when unmeasured.
    pub fn height(&self) -> f32 {
        self.metrics.map(|m| m.height).unwrap_or(0.0)
    }

    /// Number of characters of trimmed text.
    pub fn text_len(&self) -> usize {
        self.text.trim().chars().count()
    }

    /// Text truncated to `limit` characters, with an ellipsis when cut.
    pub fn summary(&self, limit: usize) -> String {
        let text = self.text.trim();
        if text.is_empty() {
            return format!("{} element", self.kind.tag());
        }
        if text.chars().count() > limit {
            let cut: String = text.chars().take(limit).collect();
            format!("{}...", cut)
        } else {
            text.to_string()
        }
    }
}
