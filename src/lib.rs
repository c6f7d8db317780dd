//! # pagefit
//!
//! Page overflow analysis for paginated HTML documents.
//!
//! A paginated document is a sequence of fixed-height pages. When content
//! outgrows a page it spills past the printable area and the printed copy
//! breaks. This library measures every page through a pluggable layout
//! provider, classifies its height utilization, flags content blocks that
//! put the layout at risk and optionally applies mitigations.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pagefit::{analyze_file, report, AnalyzerOptions};
//!
//! fn main() -> pagefit::Result<()> {
//!     let outcome = analyze_file("layout.json", AnalyzerOptions::default())?;
//!     let report = report::AnalysisReport::new(outcome.latest(), outcome.fixes.as_ref());
//!     println!("{}", report::to_text(&report));
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Classification**: `ok`, `warning` and `overflow` by height utilization
//! - **Risk scanning**: orphaned headings, oversized elements, long tables
//! - **Fixes**: clamping, forced breaks, spacing and keep-together hints
//! - **Reports**: plain text, JSON and standalone HTML
//! - **Build**: assembles section fragments into the final document
//! - **Validation**: checks the US Letter print rules of the stylesheet

pub mod analyze;
pub mod build;
pub mod error;
pub mod layout;
pub mod model;
pub mod report;
pub mod validate;

// Re-export commonly used types
pub use analyze::{
    classify, Analyzer, AnalyzerOptions, AnalyzerState, FixReport, FixStatus, PageSelection,
    RescanScheduler, RunOutcome,
};
pub use build::{BuildOptions, DocumentBuilder};
pub use error::{Error, Result};
pub use layout::{LayoutMutator, LayoutProvider, LayoutSnapshot};
pub use model::{
    BlockKind, BlockMetrics, ContentBlock, FixKind, Issue, IssueKind, Page, PageAssessment,
    PageStatus, Severity,
};
pub use report::{AnalysisReport, JsonFormat};
pub use validate::{validate_file, PaginationValidator, ValidationReport};

use std::path::Path;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Analyze a layout snapshot file.
///
/// With `auto_fix` enabled the fixes are applied to the in-memory snapshot
/// and the outcome carries the verification pass. The file is not modified.
///
/// # Example
///
/// ```no_run
/// use pagefit::{analyze_file, AnalyzerOptions};
///
/// let outcome = analyze_file("layout.json", AnalyzerOptions::default()).unwrap();
/// println!("{} pages need attention", outcome.remaining_issue_pages());
/// ```
pub fn analyze_file<P: AsRef<Path>>(path: P, options: AnalyzerOptions) -> Result<RunOutcome> {
    let mut snapshot = LayoutSnapshot::from_path(path)?;
    analyze_snapshot(&mut snapshot, options)
}

/// Analyze an in-memory layout snapshot.
///
/// Fails with [`Error::Snapshot`] when page or block ids are empty or repeated.
pub fn analyze_snapshot(snapshot: &mut LayoutSnapshot, options: AnalyzerOptions) -> Result<RunOutcome> {
    snapshot.check_ids()?;
    let mut analyzer = Analyzer::new(options)?;
    Ok(analyzer.run(snapshot))
}

/// Builder for analyzing layout snapshots.
///
/// # Example
///
/// ```no_run
/// use pagefit::Pagefit;
///
/// let text = Pagefit::new()
///     .with_max_height(900.0)
///     .with_auto_fix(true)
///     .analyze_file("layout.json")?
///     .to_text();
/// # Ok::<(), pagefit::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Pagefit {
    options: AnalyzerOptions,
}

impl Pagefit {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing options.
    pub fn with_options(mut self, options: AnalyzerOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the maximum page height in px.
    pub fn with_max_height(mut self, px: f32) -> Self {
        self.options = self.options.with_max_page_height(px);
        self
    }

    /// Set the warning threshold ratio.
    pub fn with_warning_threshold(mut self, ratio: f32) -> Self {
        self.options = self.options.with_warning_threshold(ratio);
        self
    }

    /// Enable or disable automatic fixing.
    pub fn with_auto_fix(mut self, enabled: bool) -> Self {
        self.options = self.options.with_auto_fix(enabled);
        self
    }

    /// Restrict analysis to some pages.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.options = self.options.with_pages(pages);
        self
    }

    /// Analyze a snapshot file.
    pub fn analyze_file<P: AsRef<Path>>(self, path: P) -> Result<PagefitResult> {
        let snapshot = LayoutSnapshot::from_path(path)?;
        self.analyze(snapshot)
    }

    /// Analyze a snapshot, taking ownership of it.
    pub fn analyze(self, mut snapshot: LayoutSnapshot) -> Result<PagefitResult> {
        let outcome = analyze_snapshot(&mut snapshot, self.options)?;
        let report = AnalysisReport::new(outcome.latest(), outcome.fixes.as_ref());
        Ok(PagefitResult {
            snapshot,
            outcome,
            report,
        })
    }
}

/// Result of [`Pagefit::analyze`].
#[derive(Debug, Clone)]
pub struct PagefitResult {
    /// The snapshot, with fixes applied if auto-fix was enabled
    pub snapshot: LayoutSnapshot,
    pub outcome: RunOutcome,
    pub report: AnalysisReport,
}

impl PagefitResult {
    /// Render as plain text.
    pub fn to_text(&self) -> String {
        report::to_text(&self.report)
    }

    /// Render as JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        report::to_json(&self.report, format)
    }

    /// Render as a standalone HTML page.
    pub fn to_html(&self) -> String {
        report::to_html(&self.report)
    }

    /// Check if any page still overflows.
    pub fn has_overflow(&self) -> bool {
        self.report.summary.overflow_pages > 0
    }
}
