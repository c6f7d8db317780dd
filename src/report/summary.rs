//! Analysis report with per-page entries and summary statistics.

use crate::analyze::FixReport;
use crate::model::{PageAssessment, PageStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Report of one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    /// When the report was generated
    pub generated_at: DateTime<Utc>,

    /// Aggregate statistics
    pub summary: ReportSummary,

    /// Per-page entries in page order
    pub pages: Vec<PageReport>,
}

/// One page in the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageReport {
    pub index: usize,
    pub page_number: String,
    pub utilization_percent: u32,
    pub status: PageStatus,
    /// Rendered height in px
    pub height: f32,
    pub measured: bool,
    pub issues: Vec<String>,
    pub fixes_applied: Vec<String>,
    /// Set when fixing this page failed
    pub fix_error: Option<String>,
}

/// Aggregate statistics over all pages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub total_pages: usize,
    pub ok_pages: usize,
    pub warning_pages: usize,
    pub overflow_pages: usize,
    pub unmeasured_pages: usize,
    pub average_utilization_percent: u32,
    pub issues_found: usize,
    pub fixes_applied: usize,
    pub fixes_failed: usize,
}

impl AnalysisReport {
    /// Build a report from assessments and optional fix results.
    pub fn new(assessments: &[PageAssessment], fixes: Option<&FixReport>) -> Self {
        let pages: Vec<PageReport> = assessments
            .iter()
            .map(|a| {
                let fix = fixes.and_then(|f| f.page(a.index));
                PageReport {
                    index: a.index,
                    page_number: a.page_number.clone(),
                    utilization_percent: a.utilization_percent(),
                    status: a.status,
                    height: a.height,
                    measured: a.measured,
                    issues: a.issues.iter().map(|i| i.message.clone()).collect(),
                    fixes_applied: fix
                        .map(|f| f.applied.iter().map(|r| r.description.clone()).collect())
                        .unwrap_or_default(),
                    fix_error: fix.and_then(|f| f.error.clone()),
                }
            })
            .collect();

        let summary = ReportSummary::from_assessments(assessments, fixes);

        Self {
            generated_at: Utc::now(),
            summary,
            pages,
        }
    }

    /// Pages with the given status.
    pub fn pages_with(&self, status: PageStatus) -> impl Iterator<Item = &PageReport> {
        self.pages.iter().filter(move |p| p.status == status)
    }

    /// Check if every page is `ok` and no issue was found.
    pub fn is_clean(&self) -> bool {
        self.summary.issues_found == 0 && self.summary.ok_pages == self.summary.total_pages
    }
}

impl ReportSummary {
    /// Compute statistics.
    pub fn from_assessments(assessments: &[PageAssessment], fixes: Option<&FixReport>) -> Self {
        let count = |status: PageStatus| assessments.iter().filter(|a| a.status == status).count();
        let total_pages = assessments.len();

        let average_utilization_percent = if total_pages == 0 {
            0
        } else {
            let sum: f32 = assessments.iter().map(|a| a.utilization).sum();
            (sum / total_pages as f32 * 100.0).round() as u32
        };

        Self {
            total_pages,
            ok_pages: count(PageStatus::Ok),
            warning_pages: count(PageStatus::Warning),
            overflow_pages: count(PageStatus::Overflow),
            unmeasured_pages: assessments.iter().filter(|a| !a.measured).count(),
            average_utilization_percent,
            issues_found: assessments.iter().map(|a| a.issues.len()).sum(),
            fixes_applied: fixes.map(FixReport::applied_count).unwrap_or(0),
            fixes_failed: fixes.map(|f| f.failed_pages().count()).unwrap_or(0),
        }
    }
}
