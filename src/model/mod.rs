//! Document model types for paginated layout analysis.
//!
//! Pages and blocks are view-time constructs: they are rebuilt from a
//! [`LayoutProvider`](crate::layout::LayoutProvider) on every analysis pass
//! and never persisted. Assessments are the immutable output of one pass.

mod assessment;
mod block;
mod page;

pub use assessment::{FixKind, Issue, IssueKind, PageAssessment, PageStatus, Severity};
pub use block::{BlockKind, BlockMetrics, ContentBlock};
pub use page::{BlockCounts, Page};

/// CSS reference pixels per inch.
pub const PX_PER_INCH: f32 = 96.0;

/// Convert inches to CSS pixels at 96 dpi.
pub fn inches_to_px(inches: f32) -> f32 {
    inches * PX_PER_INCH
}
