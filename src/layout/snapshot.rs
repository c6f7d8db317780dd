//! Recorded layout snapshots.

use super::{BlockRef, LayoutMutator, LayoutProvider, PageRef, SpacingAdjustment};
use crate::error::{Error, Result};
use crate::model::{BlockKind, BlockMetrics};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// In-memory layout recorded from a rendering engine.
///
/// Serialized as camelCase JSON:
///
/// ```json
/// { "pages": [ { "id": "p1", "pageNumber": "1", "height": 850.0,
///   "blocks": [ { "id": "b1", "tag": "h2", "text": "Lodge",
///                 "height": 28.0, "bottomOffset": 50.0 } ] } ] }
/// ```
///
/// Pages and blocks without an `id` get positional ones on decode
/// (`page-3`, `page-3-block-2`). Ids must be unique across the snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    /// Pages in document order
    pub pages: Vec<SnapshotPage>,
}

/// A recorded page container.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SnapshotPage {
    pub id: String,
    pub page_number: Option<String>,
    /// Rendered height, absent when the page was not laid out
    pub height: Option<f32>,
    pub blocks: Vec<SnapshotBlock>,
    /// Node is no longer attached to the document
    pub detached: bool,
    pub overflow_hidden: bool,
    pub continues_marker: bool,
    pub spacing: Option<SpacingAdjustment>,
}

/// A recorded block.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SnapshotBlock {
    pub id: String,
    pub tag: String,
    pub text: String,
    pub rows: Option<u32>,
    pub height: Option<f32>,
    pub bottom_offset: Option<f32>,
    pub detached: bool,
    pub break_before: bool,
    pub keep_together: bool,
}

impl SnapshotPage {
    /// Create a measured page.
    pub fn new(id: impl Into<String>, height: f32) -> Self {
        Self {
            id: id.into(),
            height: Some(height),
            ..Self::default()
        }
    }

    /// Create a page without a measured height.
    pub fn unmeasured(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Set the page label.
    pub fn with_page_number(mut self, label: impl Into<String>) -> Self {
        self.page_number = Some(label.into());
        self
    }

    /// Append a block.
    pub fn with_block(mut self, block: SnapshotBlock) -> Self {
        self.blocks.push(block);
        self
    }

    /// Mark the page as detached.
    pub fn detached(mut self) -> Self {
        self.detached = true;
        self
    }
}

impl SnapshotBlock {
    /// Create an unmeasured block.
    pub fn new(id: impl Into<String>, tag: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tag: tag.into(),
            text: text.into(),
            ..Self::default()
        }
    }

    /// Set rendered geometry.
    pub fn with_metrics(mut self, height: f32, bottom_offset: f32) -> Self {
        self.height = Some(height);
        self.bottom_offset = Some(bottom_offset);
        self
    }

    /// Set the table row count.
    pub fn with_rows(mut self, rows: u32) -> Self {
        self.rows = Some(rows);
        self
    }

    /// Mark the block as detached.
    pub fn detached(mut self) -> Self {
        self.detached = true;
        self
    }
}

impl LayoutSnapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a page.
    pub fn add_page(&mut self, page: SnapshotPage) {
        self.pages.push(page);
    }

    /// Decode a snapshot from JSON.
    ///
    /// Missing ids are filled in by position; duplicate ids are rejected.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut snapshot: LayoutSnapshot =
            serde_json::from_str(json).map_err(|e| Error::Snapshot(e.to_string()))?;
        snapshot.assign_missing_ids();
        snapshot.check_ids()?;
        Ok(snapshot)
    }

    /// Read a snapshot from a JSON file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Encode the snapshot, including applied mutations, as pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
    }

    /// Give every page and block without an id a positional one.
    pub fn assign_missing_ids(&mut self) {
        for (i, page) in self.pages.iter_mut().enumerate() {
            if page.id.trim().is_empty() {
                page.id = format!("page-{}", i + 1);
            }
            for (j, block) in page.blocks.iter_mut().enumerate() {
                if block.id.trim().is_empty() {
                    block.id = format!("{}-block-{}", page.id, j + 1);
                }
            }
        }
    }

    /// Check that every page and block has a non-empty id, unique across
    /// the snapshot.
    pub fn check_ids(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for (i, page) in self.pages.iter().enumerate() {
            if page.id.trim().is_empty() {
                return Err(Error::Snapshot(format!("page {} has no id", i + 1)));
            }
            if !seen.insert(page.id.as_str()) {
                return Err(Error::Snapshot(format!("duplicate id '{}'", page.id)));
            }
            for (j, block) in page.blocks.iter().enumerate() {
                if block.id.trim().is_empty() {
                    return Err(Error::Snapshot(format!(
                        "block {} on page {} has no id",
                        j + 1,
                        page.id
                    )));
                }
                if !seen.insert(block.id.as_str()) {
                    return Err(Error::Snapshot(format!("duplicate id '{}'", block.id)));
                }
            }
        }
        Ok(())
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Find a page by id.
    pub fn page(&self, id: &str) -> Option<&SnapshotPage> {
        self.pages.iter().find(|p| p.id == id)
    }

    /// Find a block by id.
    pub fn block(&self, id: &str) -> Option<&SnapshotBlock> {
        self.pages
            .iter()
            .flat_map(|p| p.blocks.iter())
            .find(|b| b.id == id)
    }

    fn attached_page_mut(&mut self, id: &str) -> Result<&mut SnapshotPage> {
        let page = self
            .pages
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| Error::UnknownNode(id.to_string()))?;
        if page.detached {
            return Err(Error::DetachedNode(id.to_string()));
        }
        Ok(page)
    }

    fn attached_block_mut(&mut self, id: &str) -> Result<&mut SnapshotBlock> {
        for page in &mut self.pages {
            if let Some(block) = page.blocks.iter_mut().find(|b| b.id == id) {
                if page.detached || block.detached {
                    return Err(Error::DetachedNode(id.to_string()));
                }
                return Ok(block);
            }
        }
        Err(Error::UnknownNode(id.to_string()))
    }
}

impl LayoutProvider for LayoutSnapshot {
    fn pages(&self) -> Vec<PageRef> {
        self.pages
            .iter()
            .map(|p| PageRef {
                id: p.id.clone(),
                page_number: p.page_number.clone(),
            })
            .collect()
    }

    fn page_height(&self, page_id: &str) -> Option<f32> {
        self.page(page_id).and_then(|p| p.height)
    }

    fn blocks(&self, page_id: &str) -> Vec<BlockRef> {
        self.page(page_id)
            .map(|p| {
                p.blocks
                    .iter()
                    .map(|b| BlockRef {
                        id: b.id.clone(),
                        kind: BlockKind::from_tag(&b.tag),
                        text: b.text.clone(),
                        rows: b.rows,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn block_metrics(&self, block_id: &str) -> Option<BlockMetrics> {
        let block = self.block(block_id)?;
        Some(BlockMetrics::new(block.height?, block.bottom_offset?))
    }
}

impl LayoutMutator for LayoutSnapshot {
    fn clamp_page_height(&mut self, page_id: &str, max_height: f32) -> Result<()> {
        let page = self.attached_page_mut(page_id)?;
        if let Some(height) = page.height {
            page.height = Some(height.min(max_height));
        }
        page.overflow_hidden = true;
        page.continues_marker = true;
        Ok(())
    }

    fn break_before(&mut self, block_id: &str) -> Result<()> {
        self.attached_block_mut(block_id)?.break_before = true;
        Ok(())
    }

    fn tighten_spacing(&mut self, page_id: &str, adjustment: SpacingAdjustment) -> Result<()> {
        self.attached_page_mut(page_id)?.spacing = Some(adjustment);
        Ok(())
    }

    fn keep_together(&mut self, block_id: &str) -> Result<()> {
        self.attached_block_mut(block_id)?.keep_together = true;
        Ok(())
    }
}
