//! Overflow mitigation strategies.
//!
//! Fixes are heuristics. [`FixKind::ClampOverflow`] is lossy: it hides the
//! content past the page limit instead of moving it to a new page. Callers
//! should re-run the analysis after applying fixes to see what improved.

use super::options::AnalyzerOptions;
use crate::error::{Error, Result};
use crate::layout::LayoutMutator;
use crate::model::{FixKind, Issue, PageAssessment};
use serde::{Deserialize, Serialize};

/// One mitigation applied to the layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixRecord {
    /// Strategy used
    pub kind: FixKind,
    /// Layout node the fix was applied to
    pub target: String,
    /// Human-readable description
    pub description: String,
}

/// Outcome of fixing one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixStatus {
    /// The page had nothing to fix
    NotNeeded,
    /// All recommended fixes were applied
    Applied,
    /// A fix failed; remaining fixes for the page were skipped
    Failed,
}

/// Fix results for one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageFixResult {
    /// Page index (0-indexed)
    pub index: usize,
    /// Page label
    pub page_number: String,
    /// Overall outcome
    pub status: FixStatus,
    /// Fixes applied before any failure
    pub applied: Vec<FixRecord>,
    /// Failure reason
    pub error: Option<String>,
}

impl PageFixResult {
    /// Check if fixing this page failed.
    pub fn is_failed(&self) -> bool {
        self.status == FixStatus::Failed
    }
}

/// Fix results for every assessed page, in page order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FixReport {
    pub pages: Vec<PageFixResult>,
}

impl FixReport {
    /// Total number of applied fixes.
    pub fn applied_count(&self) -> usize {
        self.pages.iter().map(|p| p.applied.len()).sum()
    }

    /// Pages where fixing failed.
    pub fn failed_pages(&self) -> impl Iterator<Item = &PageFixResult> {
        self.pages.iter().filter(|p| p.is_failed())
    }

    /// Results for a page index.
    pub fn page(&self, index: usize) -> Option<&PageFixResult> {
        self.pages.iter().find(|p| p.index == index)
    }
}

/// Apply every recommended fix of one assessment, in issue order.
///
/// The first failing mutation stops the page and is reported as
/// [`FixStatus::Failed`]; it is not retried.
pub fn fix_page<L: LayoutMutator + ?Sized>(
    layout: &mut L,
    assessment: &PageAssessment,
    options: &AnalyzerOptions,
) -> PageFixResult {
    let mut applied = Vec::new();
    let outcome = apply_all(layout, assessment, options, &mut applied);

    let (status, error) = match outcome {
        Ok(()) if applied.is_empty() => (FixStatus::NotNeeded, None),
        Ok(()) => (FixStatus::Applied, None),
        Err(e) => {
            log::warn!(
                "Fix failed on page {}: {}",
                assessment.page_number,
                e
            );
            (FixStatus::Failed, Some(format!("fix failed: {}", e)))
        }
    };

    PageFixResult {
        index: assessment.index,
        page_number: assessment.page_number.clone(),
        status,
        applied,
        error,
    }
}

fn apply_all<L: LayoutMutator + ?Sized>(
    layout: &mut L,
    assessment: &PageAssessment,
    options: &AnalyzerOptions,
    applied: &mut Vec<FixRecord>,
) -> Result<()> {
    for (kind, issue) in assessment.recommended_fixes() {
        // Page-level fixes are applied once per page.
        let page_level = matches!(kind, FixKind::ClampOverflow | FixKind::TightenSpacing);
        if page_level && applied.iter().any(|r| r.kind == kind) {
            continue;
        }
        let record = apply_fix(layout, kind, issue, assessment, options)?;
        log::debug!("Page {}: {}", assessment.page_number, record.description);
        applied.push(record);
    }
    Ok(())
}

fn apply_fix<L: LayoutMutator + ?Sized>(
    layout: &mut L,
    kind: FixKind,
    issue: &Issue,
    assessment: &PageAssessment,
    options: &AnalyzerOptions,
) -> Result<FixRecord> {
    let page_id = assessment.page_id.as_str();
    let block_target = || {
        issue
            .block
            .clone()
            .ok_or_else(|| Error::Other(format!("{} issue has no target block", kind)))
    };

    let (target, description) = match kind {
        FixKind::ClampOverflow => {
            layout.clamp_page_height(page_id, assessment.max_height)?;
            (
                page_id.to_string(),
                format!(
                    "Applied strict height limit to page {}; content past {}px is hidden",
                    assessment.page_number,
                    assessment.max_height.round()
                ),
            )
        }
        FixKind::BreakBeforeHeading => {
            let block = block_target()?;
            layout.break_before(&block)?;
            (block, "Forced page break before orphaned heading".to_string())
        }
        FixKind::TightenSpacing => {
            layout.tighten_spacing(page_id, options.spacing)?;
            (
                page_id.to_string(),
                format!(
                    "Optimized spacing for high-density page {} (line-height {}, paragraph margin {}rem)",
                    assessment.page_number,
                    options.spacing.line_height,
                    options.spacing.paragraph_margin_rem
                ),
            )
        }
        FixKind::KeepTogether => {
            let block = block_target()?;
            layout.keep_together(&block)?;
            (
                block,
                "Applied keep-together to prevent paragraph splitting".to_string(),
            )
        }
    };

    Ok(FixRecord {
        kind,
        target,
        description,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{LayoutSnapshot, SnapshotBlock, SnapshotPage};
    use crate::model::{IssueKind, PageStatus};

    fn assessment(page_id: &str, issues: Vec<Issue>) -> PageAssessment {
        PageAssessment {
            page_id: page_id.to_string(),
            index: 0,
            page_number: "1".to_string(),
            height: 1094.4,
            max_height: 912.0,
            utilization: 1.2,
            status: PageStatus::Overflow,
            measured: true,
            issues,
        }
    }

    fn snapshot() -> LayoutSnapshot {
        let mut snapshot = LayoutSnapshot::new();
        snapshot.add_page(
            SnapshotPage::new("p1", 1094.4)
                .with_block(SnapshotBlock::new("h1", "h2", "Contacts").with_metrics(30.0, 40.0))
                .with_block(SnapshotBlock::new("para", "p", "text").with_metrics(80.0, 2.0)),
        );
        snapshot
    }

    #[test]
    fn test_applies_fixes_in_issue_order() {
        let mut layout = snapshot();
        let a = assessment(
            "p1",
            vec![
                Issue::new(IssueKind::Overflow, "overflow"),
                Issue::for_block(IssueKind::OrphanedHeading, "h1", "orphan"),
                Issue::for_block(IssueKind::ConsiderSplitting, "t", "split"),
                Issue::for_block(IssueKind::ParagraphOverflow, "para", "cut"),
            ],
        );

        let result = fix_page(&mut layout, &a, &AnalyzerOptions::default());
        assert_eq!(result.status, FixStatus::Applied);
        let kinds: Vec<_> = result.applied.iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![
                FixKind::ClampOverflow,
                FixKind::BreakBeforeHeading,
                FixKind::KeepTogether
            ]
        );

        let page = layout.page("p1").unwrap();
        assert_eq!(page.height, Some(912.0));
        assert!(page.continues_marker);
        assert!(layout.block("h1").unwrap().break_before);
        assert!(layout.block("para").unwrap().keep_together);
    }

    #[test]
    fn test_page_level_fix_applied_once() {
        let mut layout = snapshot();
        let a = assessment(
            "p1",
            vec![
                Issue::new(IssueKind::HighDensity, "dense"),
                Issue::new(IssueKind::HighDensity, "dense again"),
            ],
        );

        let result = fix_page(&mut layout, &a, &AnalyzerOptions::default());
        assert_eq!(result.applied.len(), 1);
        assert_eq!(
            layout.page("p1").unwrap().spacing.map(|s| s.line_height),
            Some(1.3)
        );
    }

    #[test]
    fn test_nothing_to_fix() {
        let mut layout = snapshot();
        let a = assessment(
            "p1",
            vec![Issue::for_block(IssueKind::LargeElement, "x", "large")],
        );
        let result = fix_page(&mut layout, &a, &AnalyzerOptions::default());
        assert_eq!(result.status, FixStatus::NotNeeded);
        assert!(result.error.is_none());
    }

    #[test]
    fn test_failure_stops_page() {
        let mut layout = snapshot();
        let a = assessment(
            "p1",
            vec![
                Issue::for_block(IssueKind::OrphanedHeading, "h1", "orphan"),
                Issue::for_block(IssueKind::OrphanedHeading, "gone", "orphan"),
                Issue::for_block(IssueKind::ParagraphOverflow, "para", "cut"),
            ],
        );

        let result = fix_page(&mut layout, &a, &AnalyzerOptions::default());
        assert!(result.is_failed());
        assert_eq!(result.applied.len(), 1);
        assert!(result.error.unwrap().starts_with("fix failed"));
        assert!(!layout.block("para").unwrap().keep_together);
    }
}
