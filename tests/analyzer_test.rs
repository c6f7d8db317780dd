//! Integration tests for the analyzer.

use pagefit::analyze::{classify, Analyzer, AnalyzerOptions, FixStatus, RescanScheduler};
use pagefit::error::{Error, Result};
use pagefit::layout::{
    BlockRef, LayoutMutator, LayoutProvider, LayoutSnapshot, PageRef, SnapshotBlock, SnapshotPage,
    SpacingAdjustment,
};
use pagefit::model::{BlockKind, BlockMetrics, IssueKind, PageStatus};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Layout backed by plain maps, failing every mutation of one page.
#[derive(Default)]
struct MockLayout {
    order: Vec<String>,
    heights: HashMap<String, f32>,
    blocks: HashMap<String, Vec<BlockRef>>,
    metrics: HashMap<String, BlockMetrics>,
    broken_page: Option<String>,
    clamped: Vec<String>,
}

impl MockLayout {
    fn with_pages(heights: &[f32]) -> Self {
        let mut layout = MockLayout::default();
        for (i, &h) in heights.iter().enumerate() {
            let id = format!("page-{}", i + 1);
            layout.order.push(id.clone());
            layout.heights.insert(id, h);
        }
        layout
    }

    fn check(&self, page_id: &str) -> Result<()> {
        if self.broken_page.as_deref() == Some(page_id) {
            return Err(Error::DetachedNode(page_id.to_string()));
        }
        Ok(())
    }
}

impl LayoutProvider for MockLayout {
    fn pages(&self) -> Vec<PageRef> {
        self.order.iter().map(PageRef::new).collect()
    }

    fn page_height(&self, page_id: &str) -> Option<f32> {
        self.heights.get(page_id).copied()
    }

    fn blocks(&self, page_id: &str) -> Vec<BlockRef> {
        self.blocks.get(page_id).cloned().unwrap_or_default()
    }

    fn block_metrics(&self, block_id: &str) -> Option<BlockMetrics> {
        self.metrics.get(block_id).copied()
    }
}

impl LayoutMutator for MockLayout {
    fn clamp_page_height(&mut self, page_id: &str, max_height: f32) -> Result<()> {
        self.check(page_id)?;
        if let Some(h) = self.heights.get_mut(page_id) {
            *h = h.min(max_height);
        }
        self.clamped.push(page_id.to_string());
        Ok(())
    }

    fn break_before(&mut self, _block_id: &str) -> Result<()> {
        Ok(())
    }

    fn tighten_spacing(&mut self, page_id: &str, _adjustment: SpacingAdjustment) -> Result<()> {
        self.check(page_id)
    }

    fn keep_together(&mut self, _block_id: &str) -> Result<()> {
        Ok(())
    }
}

#[test]
fn test_classification_scenarios() {
    let cases = [
        (960.0, PageStatus::Overflow),
        (850.0, PageStatus::Warning),
        (700.0, PageStatus::Ok),
    ];
    for (height, expected) in cases {
        let c = classify(height, 912.0);
        assert_eq!(c.status, expected, "height {}", height);
        assert_eq!(c.utilization, height / 912.0);
    }
}

#[test]
fn test_batch_continues_after_fix_failure() {
    let mut layout = MockLayout::with_pages(&[1000.0; 10]);
    layout.broken_page = Some("page-4".to_string());

    let mut analyzer = Analyzer::new(AnalyzerOptions::default()).unwrap();
    let assessments = analyzer.analyze(&layout);
    assert_eq!(assessments.len(), 10);

    let fixes = analyzer.apply_fixes(&mut layout, &assessments);
    assert_eq!(fixes.pages.len(), 10);

    for result in &fixes.pages {
        if result.index == 3 {
            assert_eq!(result.status, FixStatus::Failed);
            assert!(result.applied.is_empty());
            let error = result.error.as_deref().unwrap();
            assert!(error.starts_with("fix failed:"), "{}", error);
        } else {
            assert_eq!(result.status, FixStatus::Applied, "page {}", result.page_number);
            assert_eq!(result.applied.len(), 1);
        }
    }
    assert_eq!(layout.clamped.len(), 9);
    assert!(!layout.clamped.contains(&"page-4".to_string()));

    let verified = analyzer.analyze(&layout);
    assert_eq!(verified.len(), 10);
    assert_eq!(verified[3].status, PageStatus::Overflow);
    assert!(verified
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != 3)
        .all(|(_, a)| a.status == PageStatus::Warning && a.utilization == 1.0));
}

#[test]
fn test_detached_snapshot_page_fails_alone() {
    let mut layout = LayoutSnapshot::new();
    for i in 1..=10 {
        let page = SnapshotPage::new(format!("p{}", i), 1000.0);
        layout.add_page(if i == 4 { page.detached() } else { page });
    }

    let mut analyzer = Analyzer::new(AnalyzerOptions::default().with_auto_fix(true)).unwrap();
    let outcome = analyzer.run(&mut layout);

    let fixes = outcome.fixes.as_ref().unwrap();
    assert_eq!(fixes.failed_pages().count(), 1);
    assert_eq!(fixes.failed_pages().next().unwrap().page_number, "4");
    assert_eq!(outcome.latest().len(), 10);
    assert_eq!(outcome.remaining_issue_pages(), 10);
    assert_eq!(layout.page("p4").unwrap().height, Some(1000.0));
    assert_eq!(layout.page("p5").unwrap().height, Some(912.0));
}

#[test]
fn test_fix_then_reclassify() {
    let mut layout = MockLayout::with_pages(&[912.0 * 1.2]);
    let mut analyzer = Analyzer::new(AnalyzerOptions::default()).unwrap();

    let before = analyzer.analyze(&layout);
    assert_eq!(before[0].status, PageStatus::Overflow);

    analyzer.apply_fixes(&mut layout, &before);
    let after = analyzer.analyze(&layout);
    assert_eq!(after[0].utilization, 1.0);
    assert_eq!(after[0].status, PageStatus::Warning);
}

#[test]
fn test_analysis_is_idempotent() {
    let mut layout = MockLayout::with_pages(&[960.0, 850.0, 700.0]);
    layout.blocks.insert(
        "page-1".to_string(),
        vec![BlockRef {
            id: "h".to_string(),
            kind: BlockKind::heading(3),
            text: "Refuse Collection".to_string(),
            rows: None,
        }],
    );
    layout.metrics.insert("h".to_string(), BlockMetrics::new(24.0, 40.0));

    let mut analyzer = Analyzer::new(AnalyzerOptions::default()).unwrap();
    let first = analyzer.analyze(&layout);
    let second = analyzer.analyze(&layout);
    assert_eq!(first, second);
    assert_eq!(analyzer.passes(), 2);
}

#[test]
fn test_orphaned_heading_distance() {
    // Page bottom at 1000px; heading bottoms at 950px and 800px.
    let mut layout = LayoutSnapshot::new();
    layout.add_page(
        SnapshotPage::new("p1", 1000.0)
            .with_block(SnapshotBlock::new("near", "h2", "Deer Lake Rules").with_metrics(30.0, 50.0))
            .with_block(SnapshotBlock::new("far", "h2", "Lodge Rental").with_metrics(30.0, 200.0)),
    );

    let options = AnalyzerOptions::default().with_max_page_height(1200.0);
    let mut analyzer = Analyzer::new(options).unwrap();
    let assessment = &analyzer.analyze(&layout)[0];

    let orphans: Vec<_> = assessment.issues_of(IssueKind::OrphanedHeading).collect();
    assert_eq!(orphans.len(), 1);
    assert_eq!(orphans[0].block.as_deref(), Some("near"));
    assert!(orphans[0].message.contains("Deer Lake Rules"));
}

#[test]
fn test_snapshot_without_ids_measures_each_page() {
    let json = r#"{"pages":[
        {"height":700},
        {"height":1000,"blocks":[
            {"tag":"h2","text":"Lodge Rental","height":30,"bottomOffset":400},
            {"tag":"h2","text":"Deer Lake Rules","height":30,"bottomOffset":20}
        ]}
    ]}"#;
    let mut layout = LayoutSnapshot::from_json(json).unwrap();

    let outcome =
        pagefit::analyze_snapshot(&mut layout, AnalyzerOptions::default().with_auto_fix(true))
            .unwrap();
    let first = &outcome.assessments;
    assert_eq!(first[0].status, PageStatus::Ok);
    assert_eq!(first[1].status, PageStatus::Overflow);
    assert_eq!(first[1].height, 1000.0);

    let orphans: Vec<_> = first[1].issues_of(IssueKind::OrphanedHeading).collect();
    assert_eq!(orphans.len(), 1);
    assert!(orphans[0].message.contains("Deer Lake Rules"));

    // The clamp lands on the overflowing page only.
    assert!(!layout.page("page-1").unwrap().overflow_hidden);
    assert_eq!(layout.page("page-2").unwrap().height, Some(912.0));
}

#[test]
fn test_duplicate_snapshot_ids_rejected() {
    let json = r#"{"pages":[{"id":"x","height":700},{"id":"x","height":1000}]}"#;
    assert!(matches!(
        LayoutSnapshot::from_json(json),
        Err(Error::Snapshot(_))
    ));

    let mut built = LayoutSnapshot::new();
    built.add_page(SnapshotPage::new("x", 700.0));
    built.add_page(SnapshotPage::new("x", 1000.0));
    let result = pagefit::analyze_snapshot(&mut built, AnalyzerOptions::default());
    assert!(matches!(result, Err(Error::Snapshot(_))));
}

#[test]
fn test_long_table_does_not_change_status() {
    let mut layout = LayoutSnapshot::new();
    layout.add_page(
        SnapshotPage::new("p1", 700.0)
            .with_block(SnapshotBlock::new("fees", "table", "").with_rows(25)),
    );

    let mut analyzer = Analyzer::new(AnalyzerOptions::default()).unwrap();
    let assessment = &analyzer.analyze(&layout)[0];

    assert_eq!(assessment.status, PageStatus::Ok);
    assert_eq!(assessment.issues.len(), 1);
    assert_eq!(assessment.issues[0].kind, IssueKind::ConsiderSplitting);
}

#[test]
fn test_unmeasured_page_is_not_fatal() {
    let mut layout = MockLayout::with_pages(&[700.0, 960.0]);
    layout.order.insert(1, "ghost".to_string());

    let mut analyzer = Analyzer::new(AnalyzerOptions::default()).unwrap();
    let assessments = analyzer.analyze(&layout);
    assert_eq!(assessments.len(), 3);
    assert_eq!(assessments[1].status, PageStatus::Ok);
    assert!(!assessments[1].measured);
    assert_eq!(assessments[2].status, PageStatus::Overflow);
}

#[test]
fn test_malformed_config_fails_fast() {
    let json = r#"{"maxPageHeightPx": -912}"#;
    let options = AnalyzerOptions::from_json(json).unwrap();
    let err = Analyzer::new(options).unwrap_err();
    assert!(matches!(err, Error::InvalidConfig(_)));
    assert!(err.to_string().contains("maxPageHeightPx"));
}

#[test]
fn test_rescan_burst_collapses() {
    let t0 = Instant::now();
    let mut scheduler = RescanScheduler::new();
    for i in 0..5 {
        scheduler.schedule_at(t0 + Duration::from_millis(i * 100), Duration::from_secs(1));
    }

    let mut fired = 0;
    for ms in (0..3000).step_by(50) {
        if scheduler.poll(t0 + Duration::from_millis(ms)) {
            fired += 1;
        }
    }
    assert_eq!(fired, 1);
}
