//! Analyzer options and configuration.

use super::classify::DEFAULT_WARNING_THRESHOLD;
use crate::error::{Error, Result};
use crate::layout::SpacingAdjustment;
use crate::model::inches_to_px;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::path::Path;

/// Printable height of a US Letter page with 0.75in top and bottom margins.
pub const DEFAULT_MAX_PAGE_HEIGHT_INCHES: f32 = 9.5;

/// Options for page overflow analysis.
///
/// Deserializes from camelCase JSON, e.g.
/// `{ "maxPageHeightPx": 912, "warningThreshold": 0.9, "autoFix": false }`.
/// Missing fields take their defaults. Values are checked by
/// [`AnalyzerOptions::validate`] when an analyzer is constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalyzerOptions {
    /// Maximum page height in px
    pub max_page_height_px: f32,

    /// Utilization above which a page is a warning, in (0, 1]
    pub warning_threshold: f32,

    /// Apply fixes automatically during [`Analyzer::run`](super::Analyzer::run)
    pub auto_fix: bool,

    /// Headings whose bottom edge is closer than this to the page bottom are orphaned
    pub orphan_distance_px: f32,

    /// Share of the page height above which a block is large
    pub large_block_ratio: f32,

    /// Tables with more rows than this should be split
    pub table_split_rows: u32,

    /// Characters of heading text quoted in issue messages
    pub heading_text_limit: usize,

    /// Paragraphs shorter than this are never flagged for overflow
    pub paragraph_min_chars: usize,

    /// Paragraphs ending closer than this to the page bottom may be cut off
    pub paragraph_bottom_margin_px: f32,

    /// Utilization above which a non-overflowing page is densely packed
    pub high_density_ratio: f32,

    /// Run text and image density checks on warning and overflow pages
    pub content_analysis: bool,

    /// Paragraphs and lists longer than this are flagged by the density checks
    pub long_paragraph_chars: usize,

    /// Total characters above which a page is text-dense
    pub dense_text_chars: usize,

    /// Pages with more images than this are flagged
    pub max_images_per_page: u32,

    /// Flag measured pages shorter than this
    pub min_page_height_px: Option<f32>,

    /// Spacing applied by the density fix
    pub spacing: SpacingAdjustment,

    /// Which pages to analyze (1-indexed ordinals)
    #[serde(skip)]
    pub pages: PageSelection,
}

impl AnalyzerOptions {
    /// Create new analyzer options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode options from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::InvalidConfig(e.to_string()))
    }

    /// Read options from a JSON file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Set the maximum page height in px.
    pub fn with_max_page_height(mut self, px: f32) -> Self {
        self.max_page_height_px = px;
        self
    }

    /// Set the maximum page height in inches at 96 dpi.
    pub fn with_max_page_height_inches(mut self, inches: f32) -> Self {
        self.max_page_height_px = inches_to_px(inches);
        self
    }

    /// Set the warning threshold.
    pub fn with_warning_threshold(mut self, threshold: f32) -> Self {
        self.warning_threshold = threshold;
        self
    }

    /// Enable or disable automatic fixes.
    pub fn with_auto_fix(mut self, auto_fix: bool) -> Self {
        self.auto_fix = auto_fix;
        self
    }

    /// Set the orphaned heading distance in px.
    pub fn with_orphan_distance(mut self, px: f32) -> Self {
        self.orphan_distance_px = px;
        self
    }

    /// Set the large block ratio.
    pub fn with_large_block_ratio(mut self, ratio: f32) -> Self {
        self.large_block_ratio = ratio;
        self
    }

    /// Set the table row limit.
    pub fn with_table_split_rows(mut self, rows: u32) -> Self {
        self.table_split_rows = rows;
        self
    }

    /// Enable or disable content density checks.
    pub fn with_content_analysis(mut self, enabled: bool) -> Self {
        self.content_analysis = enabled;
        self
    }

    /// Set the density check limits: long paragraph length, total text and image count.
    pub fn with_density_limits(mut self, long_paragraph: usize, dense_text: usize, images: u32) -> Self {
        self.long_paragraph_chars = long_paragraph;
        self.dense_text_chars = dense_text;
        self.max_images_per_page = images;
        self
    }

    /// Flag pages shorter than `px`.
    pub fn with_min_page_height(mut self, px: f32) -> Self {
        self.min_page_height_px = Some(px);
        self
    }

    /// Set the spacing used by the density fix.
    pub fn with_spacing(mut self, spacing: SpacingAdjustment) -> Self {
        self.spacing = spacing;
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, selection: PageSelection) -> Self {
        self.pages = selection;
        self
    }

    /// Check that all values are usable.
    pub fn validate(&self) -> Result<()> {
        if !(self.max_page_height_px.is_finite() && self.max_page_height_px > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "maxPageHeightPx must be a positive number, got {}",
                self.max_page_height_px
            )));
        }
        if !(self.warning_threshold > 0.0 && self.warning_threshold <= 1.0) {
            return Err(Error::InvalidConfig(format!(
                "warningThreshold must be in (0, 1], got {}",
                self.warning_threshold
            )));
        }
        if !(self.high_density_ratio > 0.0 && self.high_density_ratio <= 1.0) {
            return Err(Error::InvalidConfig(format!(
                "highDensityRatio must be in (0, 1], got {}",
                self.high_density_ratio
            )));
        }
        if !(self.large_block_ratio > 0.0 && self.large_block_ratio <= 1.0) {
            return Err(Error::InvalidConfig(format!(
                "largeBlockRatio must be in (0, 1], got {}",
                self.large_block_ratio
            )));
        }
        for (name, value) in [
            ("orphanDistancePx", self.orphan_distance_px),
            ("paragraphBottomMarginPx", self.paragraph_bottom_margin_px),
            ("minPageHeightPx", self.min_page_height_px.unwrap_or(0.0)),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(Error::InvalidConfig(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        if self.long_paragraph_chars == 0 || self.dense_text_chars == 0 {
            return Err(Error::InvalidConfig(
                "longParagraphChars and denseTextChars must be positive".to_string(),
            ));
        }
        if !(self.spacing.line_height > 0.0 && self.spacing.paragraph_margin_rem >= 0.0) {
            return Err(Error::InvalidConfig(
                "spacing must have a positive line height and a non-negative margin".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self {
            max_page_height_px: inches_to_px(DEFAULT_MAX_PAGE_HEIGHT_INCHES),
            warning_threshold: DEFAULT_WARNING_THRESHOLD,
            auto_fix: false,
            orphan_distance_px: 100.0,
            large_block_ratio: 0.30,
            table_split_rows: 20,
            heading_text_limit: 30,
            paragraph_min_chars: 100,
            paragraph_bottom_margin_px: 20.0,
            high_density_ratio: 0.95,
            content_analysis: true,
            long_paragraph_chars: 500,
            dense_text_chars: 3000,
            max_images_per_page: 3,
            min_page_height_px: None,
            spacing: SpacingAdjustment::default(),
            pages: PageSelection::All,
        }
    }
}

/// Page selection for analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PageSelection {
    /// Analyze all pages
    #[default]
    All,
    /// Analyze a range of pages (inclusive, 1-indexed)
    Range(RangeInclusive<u32>),
    /// Analyze a list of pages and ranges (1-indexed, sorted, non-overlapping)
    Pages(Vec<RangeInclusive<u32>>),
}

impl PageSelection {
    /// Check if a page ordinal should be included.
    pub fn includes(&self, page: u32) -> bool {
        match self {
            PageSelection::All => true,
            PageSelection::Range(range) => range.contains(&page),
            PageSelection::Pages(ranges) => ranges.iter().any(|r| r.contains(&page)),
        }
    }

    /// Parse a page selection string (e.g., "1-10", "1,3,5,7-10").
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();

        if s.is_empty() || s == "all" {
            return Ok(PageSelection::All);
        }

        if !s.contains(',') {
            return parse_range(s).map(PageSelection::Range);
        }

        let mut ranges = s.split(',').map(parse_range).collect::<Result<Vec<_>>>()?;
        ranges.sort_unstable_by_key(|r| *r.start());

        // Merge overlapping and adjacent ranges.
        let mut merged: Vec<RangeInclusive<u32>> = Vec::with_capacity(ranges.len());
        for range in ranges {
            match merged.last_mut() {
                Some(last) if *range.start() <= last.end().saturating_add(1) => {
                    let end = (*last.end()).max(*range.end());
                    *last = *last.start()..=end;
                }
                _ => merged.push(range),
            }
        }
        Ok(PageSelection::Pages(merged))
    }
}

fn parse_range(part: &str) -> Result<RangeInclusive<u32>> {
    let (start, end) = match part.split_once('-') {
        Some((start, end)) => (parse_page(start)?, parse_page(end)?),
        None => {
            let page = parse_page(part)?;
            (page, page)
        }
    };
    if start > end {
        return Err(Error::InvalidPageRange(format!(
            "range '{}' runs backwards",
            part.trim()
        )));
    }
    Ok(start..=end)
}

fn parse_page(s: &str) -> Result<u32> {
    let page: u32 = s
        .trim()
        .parse()
        .map_err(|_| Error::InvalidPageRange(format!("invalid page number '{}'", s.trim())))?;
    if page == 0 {
        return Err(Error::InvalidPageRange(
            "page numbers start at 1".to_string(),
        ));
    }
    Ok(page)
}
