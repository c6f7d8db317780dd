//! Layout measurement abstraction.
//!
//! The analyzer never talks to a rendering engine directly. It reads
//! geometry through [`LayoutProvider`] and applies mitigations through
//! [`LayoutMutator`], so analysis runs headless against any source of
//! measurements: a browser bridge, a print engine, or a recorded
//! [`LayoutSnapshot`].
//!
//! # Example
//!
//! ```
//! use pagefit::layout::{LayoutProvider, LayoutSnapshot, SnapshotBlock, SnapshotPage};
//!
//! let mut snapshot = LayoutSnapshot::new();
//! snapshot.add_page(
//!     SnapshotPage::new("page-1", 850.0)
//!         .with_block(SnapshotBlock::new("h-1", "h2", "Fire Safety").with_metrics(28.0, 50.0)),
//! );
//!
//! assert_eq!(snapshot.page_height("page-1"), Some(850.0));
//! assert_eq!(snapshot.blocks("page-1").len(), 1);
//! ```

mod snapshot;

pub use snapshot::{LayoutSnapshot, SnapshotBlock, SnapshotPage};

use crate::error::Result;
use crate::model::{BlockKind, BlockMetrics};
use serde::{Deserialize, Serialize};

/// A page container as seen by the layout engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRef {
    /// Layout node id
    pub id: String,
    /// Optional `data-page-number` attribute
    pub page_number: Option<String>,
}

impl PageRef {
    /// Create a page reference.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            page_number: None,
        }
    }

    /// Set the page label.
    pub fn with_page_number(mut self, label: impl Into<String>) -> Self {
        self.page_number = Some(label.into());
        self
    }
}

/// Structural description of a block, without geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockRef {
    /// Layout node id
    pub id: String,
    /// Block kind
    pub kind: BlockKind,
    /// Text content (alt text for images)
    pub text: String,
    /// Row count for tables
    pub rows: Option<u32>,
}

/// Spacing reduction applied to dense pages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpacingAdjustment {
    /// Unitless line height
    pub line_height: f32,
    /// Paragraph bottom margin in rem
    pub paragraph_margin_rem: f32,
}

impl Default for SpacingAdjustment {
    fn default() -> Self {
        Self {
            line_height: 1.3,
            paragraph_margin_rem: 0.5,
        }
    }
}

/// Read access to a laid-out, paginated document.
///
/// A `None` measurement means the node exists but has not been rendered
/// yet. Callers treat it as zero height rather than an error.
pub trait LayoutProvider {
    /// Page containers in document order.
    fn pages(&self) -> Vec<PageRef>;

    /// Rendered height of a page in px.
    fn page_height(&self, page_id: &str) -> Option<f32>;

    /// Blocks nested in a page, in document order.
    fn blocks(&self, page_id: &str) -> Vec<BlockRef>;

    /// Rendered geometry of a block.
    fn block_metrics(&self, block_id: &str) -> Option<BlockMetrics>;
}

/// Write access used by fix strategies.
///
/// Every mutation may fail (for example on a detached node); failures are
/// reported per page and never abort a batch.
pub trait LayoutMutator: LayoutProvider {
    /// Clamp a page to `max_height` and hide vertical overflow, marking the
    /// page with a "content continues" indicator.
    fn clamp_page_height(&mut self, page_id: &str, max_height: f32) -> Result<()>;

    /// Force a page break immediately before a block.
    fn break_before(&mut self, block_id: &str) -> Result<()>;

    /// Reduce line height and paragraph spacing on a page.
    fn tighten_spacing(&mut self, page_id: &str, adjustment: SpacingAdjustment) -> Result<()>;

    /// Prevent a block from being split across a page boundary.
    fn keep_together(&mut self, block_id: &str) -> Result<()>;
}
