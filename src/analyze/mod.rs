//! Page overflow analysis.
//!
//! A pass measures every page through a [`LayoutProvider`](crate::layout::LayoutProvider),
//! classifies its height utilization, scans its blocks for risk patterns
//! and produces one immutable [`PageAssessment`](crate::model::PageAssessment)
//! per page. Fixes are a separate, explicit step.
//!
//! | Utilization      | Status     |
//! |------------------|------------|
//! | `<= threshold`   | `ok`       |
//! | `(threshold, 1]` | `warning`  |
//! | `> 1`            | `overflow` |

mod classify;
mod driver;
mod fixes;
mod options;
mod scanner;
mod scheduler;

pub use classify::{
    classify, classify_with_threshold, Classification, DEFAULT_WARNING_THRESHOLD, OVERFLOW_LIMIT,
};
pub use driver::{assess_page, measure_page, Analyzer, AnalyzerState, RunOutcome};
pub use fixes::{fix_page, FixRecord, FixReport, FixStatus, PageFixResult};
pub use options::{AnalyzerOptions, PageSelection, DEFAULT_MAX_PAGE_HEIGHT_INCHES};
pub use scanner::{scan_blocks, scan_density, scan_height};
pub use scheduler::{RescanScheduler, DEFAULT_DEBOUNCE, DEFAULT_INTERVAL};
