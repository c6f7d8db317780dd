//! Analysis driver.

use super::classify::classify_with_threshold;
use super::fixes::{fix_page, FixReport};
use super::options::AnalyzerOptions;
use super::scanner::{scan_blocks, scan_density, scan_height};
use crate::error::Result;
use crate::layout::{LayoutMutator, LayoutProvider, PageRef};
use crate::model::{ContentBlock, Page, PageAssessment, PageStatus};

/// Phase of the analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalyzerState {
    /// No pass has run yet
    Idle,
    /// Classifier and scanner are running over the pages
    Scanning,
    /// Assessments are available
    Reporting,
    /// Mitigations are being applied
    Fixing,
}

/// Page overflow analyzer.
///
/// An analyzer holds no document state between passes: every call to
/// [`analyze`](Analyzer::analyze) re-measures the live layout.
///
/// # Example
///
/// ```
/// use pagefit::analyze::{Analyzer, AnalyzerOptions};
/// use pagefit::layout::{LayoutSnapshot, SnapshotPage};
/// use pagefit::PageStatus;
///
/// let mut layout = LayoutSnapshot::new();
/// layout.add_page(SnapshotPage::new("p1", 960.0));
///
/// let mut analyzer = Analyzer::new(AnalyzerOptions::default())?;
/// let assessments = analyzer.analyze(&layout);
/// assert_eq!(assessments[0].status, PageStatus::Overflow);
///
/// let fixes = analyzer.apply_fixes(&mut layout, &assessments);
/// assert_eq!(fixes.applied_count(), 1);
///
/// let verified = analyzer.analyze(&layout);
/// assert!(verified[0].utilization <= 1.0);
/// # Ok::<(), pagefit::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Analyzer {
    options: AnalyzerOptions,
    state: AnalyzerState,
    passes: u64,
}

/// Result of [`Analyzer::run`].
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// Assessments of the first pass
    pub assessments: Vec<PageAssessment>,
    /// Fixes applied when auto-fix is enabled
    pub fixes: Option<FixReport>,
    /// Assessments of the verification pass after fixing
    pub verification: Option<Vec<PageAssessment>>,
}

impl RunOutcome {
    /// The most recent assessments (verification pass if one ran).
    pub fn latest(&self) -> &[PageAssessment] {
        self.verification.as_deref().unwrap_or(&self.assessments)
    }

    /// Number of pages that still have issues after the run.
    pub fn remaining_issue_pages(&self) -> usize {
        self.latest().iter().filter(|a| a.has_issues()).count()
    }
}

impl Analyzer {
    /// Create an analyzer, rejecting malformed options.
    pub fn new(options: AnalyzerOptions) -> Result<Self> {
        options.validate()?;
        log::debug!(
            "Analyzer configured: max page height {}px, warning threshold {}%",
            options.max_page_height_px,
            (options.warning_threshold * 100.0).round()
        );
        Ok(Self {
            options,
            state: AnalyzerState::Idle,
            passes: 0,
        })
    }

    /// Analyzer options.
    pub fn options(&self) -> &AnalyzerOptions {
        &self.options
    }

    /// Current phase.
    pub fn state(&self) -> AnalyzerState {
        self.state
    }

    /// Number of completed analysis passes.
    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Classify and scan every selected page of the layout.
    pub fn analyze<L: LayoutProvider + ?Sized>(&mut self, layout: &L) -> Vec<PageAssessment> {
        self.state = AnalyzerState::Scanning;

        let assessments: Vec<PageAssessment> = layout
            .pages()
            .into_iter()
            .enumerate()
            .filter(|(index, _)| self.options.pages.includes(*index as u32 + 1))
            .map(|(index, page_ref)| {
                let page = measure_page(layout, &page_ref, index, &self.options);
                assess_page(&page, &self.options)
            })
            .collect();

        self.passes += 1;
        self.state = AnalyzerState::Reporting;

        let overflow = count_status(&assessments, PageStatus::Overflow);
        let warning = count_status(&assessments, PageStatus::Warning);
        log::info!(
            "Analyzed {} pages: {} overflow, {} warning, {} ok",
            assessments.len(),
            overflow,
            warning,
            assessments.len() - overflow - warning
        );

        assessments
    }

    /// Apply recommended fixes page by page.
    ///
    /// Returns one result per assessment. A failure on one page is recorded
    /// and the remaining pages are still processed. The assessments are not
    /// updated; call [`analyze`](Analyzer::analyze) again to verify.
    pub fn apply_fixes<L: LayoutMutator + ?Sized>(
        &mut self,
        layout: &mut L,
        assessments: &[PageAssessment],
    ) -> FixReport {
        self.state = AnalyzerState::Fixing;

        let pages = assessments
            .iter()
            .map(|assessment| fix_page(layout, assessment, &self.options))
            .collect();
        let report = FixReport { pages };

        self.state = AnalyzerState::Reporting;
        log::info!(
            "Applied {} fixes ({} pages failed)",
            report.applied_count(),
            report.failed_pages().count()
        );

        report
    }

    /// Analyze, then fix and re-analyze when auto-fix is enabled.
    pub fn run<L: LayoutMutator + ?Sized>(&mut self, layout: &mut L) -> RunOutcome {
        let assessments = self.analyze(layout);
        if !self.options.auto_fix {
            return RunOutcome {
                assessments,
                fixes: None,
                verification: None,
            };
        }

        let fixes = self.apply_fixes(layout, &assessments);
        let verification = self.analyze(layout);

        let remaining = verification.iter().filter(|a| a.has_issues()).count();
        if remaining == 0 {
            log::info!("All pagination issues resolved");
        } else {
            log::warn!("{} pages still have issues after fixes", remaining);
        }

        RunOutcome {
            assessments,
            fixes: Some(fixes),
            verification: Some(verification),
        }
    }
}

/// Build a view-time page from the layout.
///
/// A page without a measured height is treated as empty and `Ok`.
pub fn measure_page<L: LayoutProvider + ?Sized>(
    layout: &L,
    page_ref: &PageRef,
    index: usize,
    options: &AnalyzerOptions,
) -> Page {
    let max_height = options.max_page_height_px;
    let mut page = match layout.page_height(&page_ref.id) {
        Some(height) if height.is_finite() && height >= 0.0 => {
            Page::new(index, height, max_height)
        }
        _ => {
            log::warn!(
                "Page {} has no layout measurement; treating it as empty",
                page_ref.id
            );
            Page::unmeasured(index, max_height)
        }
    }
    .with_id(page_ref.id.clone());

    if let Some(label) = &page_ref.page_number {
        page.page_number = label.clone();
    }

    for block in layout.blocks(&page_ref.id) {
        let metrics = layout.block_metrics(&block.id);
        page.add_block(ContentBlock {
            id: block.id,
            kind: block.kind,
            text: block.text,
            rows: block.rows,
            metrics,
        });
    }

    page
}

/// Classify and scan one page.
///
/// Height issues come first, then block issues in document order, then
/// density advisories.
pub fn assess_page(page: &Page, options: &AnalyzerOptions) -> PageAssessment {
    let classification =
        classify_with_threshold(page.height, page.max_height, options.warning_threshold);

    let mut issues = scan_height(page, &classification, options);
    issues.extend(scan_blocks(page, options));
    issues.extend(scan_density(page, classification.status, options));

    PageAssessment {
        page_id: page.id.clone(),
        index: page.index,
        page_number: page.page_number.clone(),
        height: page.height,
        max_height: page.max_height,
        utilization: classification.utilization,
        status: classification.status,
        measured: page.measured,
        issues,
    }
}

fn count_status(assessments: &[PageAssessment], status: PageStatus) -> usize {
    assessments.iter().filter(|a| a.status == status).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::fixes::FixStatus;
    use crate::analyze::options::PageSelection;
    use crate::layout::{LayoutSnapshot, SnapshotBlock, SnapshotPage};
    use crate::model::IssueKind;

    #[test]
    fn test_state_transitions() {
        let mut layout = LayoutSnapshot::new();
        layout.add_page(SnapshotPage::new("p1", 960.0));

        let mut analyzer = Analyzer::new(AnalyzerOptions::default()).unwrap();
        assert_eq!(analyzer.state(), AnalyzerState::Idle);

        let assessments = analyzer.analyze(&layout);
        assert_eq!(analyzer.state(), AnalyzerState::Reporting);

        analyzer.apply_fixes(&mut layout, &assessments);
        assert_eq!(analyzer.state(), AnalyzerState::Reporting);
        assert_eq!(analyzer.passes(), 1);
    }

    #[test]
    fn test_rejects_bad_config() {
        let options = AnalyzerOptions::default().with_max_page_height(-1.0);
        assert!(Analyzer::new(options).is_err());
    }

    #[test]
    fn test_unmeasured_page_is_ok() {
        let mut layout = LayoutSnapshot::new();
        layout.add_page(SnapshotPage::unmeasured("p1"));

        let mut analyzer = Analyzer::new(AnalyzerOptions::default()).unwrap();
        let assessments = analyzer.analyze(&layout);
        assert_eq!(assessments[0].status, PageStatus::Ok);
        assert_eq!(assessments[0].utilization, 0.0);
        assert!(!assessments[0].measured);
    }

    #[test]
    fn test_page_labels_and_selection() {
        let mut layout = LayoutSnapshot::new();
        layout.add_page(SnapshotPage::new("cover", 700.0));
        layout.add_page(SnapshotPage::new("div", 700.0).with_page_number("divider"));
        layout.add_page(SnapshotPage::new("gov", 700.0));

        let options = AnalyzerOptions::default().with_pages(PageSelection::Range(2..=3));
        let mut analyzer = Analyzer::new(options).unwrap();
        let assessments = analyzer.analyze(&layout);

        assert_eq!(assessments.len(), 2);
        assert_eq!(assessments[0].page_number, "divider");
        assert_eq!(assessments[0].index, 1);
        assert_eq!(assessments[1].page_number, "3");
        assert_eq!(assessments[1].page_id, "gov");
    }

    #[test]
    fn test_run_without_auto_fix_does_not_mutate() {
        let mut layout = LayoutSnapshot::new();
        layout.add_page(SnapshotPage::new("p1", 1000.0));

        let mut analyzer = Analyzer::new(AnalyzerOptions::default()).unwrap();
        let outcome = analyzer.run(&mut layout);
        assert!(outcome.fixes.is_none());
        assert_eq!(layout.page("p1").unwrap().height, Some(1000.0));
        assert_eq!(outcome.remaining_issue_pages(), 1);
    }

    #[test]
    fn test_run_with_auto_fix_verifies() {
        let mut layout = LayoutSnapshot::new();
        layout.add_page(
            SnapshotPage::new("p1", 1094.4)
                .with_block(SnapshotBlock::new("h", "h3", "Roads").with_metrics(24.0, 30.0)),
        );

        let options = AnalyzerOptions::default().with_auto_fix(true);
        let mut analyzer = Analyzer::new(options).unwrap();
        let outcome = analyzer.run(&mut layout);

        let fixes = outcome.fixes.as_ref().unwrap();
        assert_eq!(fixes.pages[0].status, FixStatus::Applied);
        assert_eq!(fixes.applied_count(), 2);

        let verified = &outcome.latest()[0];
        assert_eq!(verified.utilization, 1.0);
        assert_eq!(verified.status, PageStatus::Warning);
        // Snapshot geometry is not re-laid out, so the heading is still reported.
        assert_eq!(verified.issues_of(IssueKind::OrphanedHeading).count(), 1);
        assert_eq!(verified.issues_of(IssueKind::Overflow).count(), 0);
        assert_eq!(analyzer.passes(), 2);
    }
}
