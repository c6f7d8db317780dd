//! Risk scanning of pages and their content blocks.

use super::classify::Classification;
use super::options::AnalyzerOptions;
use crate::model::{BlockKind, ContentBlock, Issue, IssueKind, Page, PageStatus};

/// Scan a page's blocks for risk patterns, in document order.
///
/// Unmeasured blocks are skipped by the geometric checks; the table row
/// check only needs structure and always runs.
pub fn scan_blocks(page: &Page, options: &AnalyzerOptions) -> Vec<Issue> {
    let mut issues = Vec::new();
    for block in &page.blocks {
        scan_block(page, block, options, &mut issues);
    }
    issues
}

fn scan_block(page: &Page, block: &ContentBlock, options: &AnalyzerOptions, out: &mut Vec<Issue>) {
    if let Some(metrics) = block.metrics {
        if block.kind.is_heading() {
            if metrics.bottom_offset < options.orphan_distance_px {
                out.push(Issue::for_block(
                    IssueKind::OrphanedHeading,
                    &block.id,
                    format!(
                        "Heading \"{}\" may be orphaned ({}px from page bottom)",
                        block.summary(options.heading_text_limit),
                        metrics.bottom_offset.round()
                    ),
                ));
            }
        } else if page.height > 0.0 && metrics.height > page.height * options.large_block_ratio {
            out.push(Issue::for_block(
                IssueKind::LargeElement,
                &block.id,
                format!(
                    "Large {} element ({}px, {}% of page) could be split or resized",
                    block.kind.tag(),
                    metrics.height.round(),
                    (metrics.height / page.height * 100.0).round()
                ),
            ));
        }

        if block.kind == BlockKind::Paragraph
            && block.text_len() > options.paragraph_min_chars
            && metrics.bottom_offset < options.paragraph_bottom_margin_px
        {
            out.push(Issue::for_block(
                IssueKind::ParagraphOverflow,
                &block.id,
                "Paragraph may be cut off at page bottom",
            ));
        }
    }

    if block.kind == BlockKind::Table {
        if let Some(rows) = block.rows.filter(|&r| r > options.table_split_rows) {
            out.push(Issue::for_block(
                IssueKind::ConsiderSplitting,
                &block.id,
                format!(
                    "Table has {} rows; consider splitting it across pages",
                    rows
                ),
            ));
        }
    }
}

/// Issues derived from the page's height: overflow, high density and
/// suspiciously small pages.
pub fn scan_height(page: &Page, classification: &Classification, options: &AnalyzerOptions) -> Vec<Issue> {
    let mut issues = Vec::new();
    let utilization = classification.utilization;

    if classification.status == PageStatus::Overflow {
        issues.push(Issue::new(
            IssueKind::Overflow,
            format!(
                "Page exceeds maximum height by {}px ({}px of {}px)",
                (page.height - page.max_height).round(),
                page.height.round(),
                page.max_height.round()
            ),
        ));
    } else if utilization > options.high_density_ratio {
        issues.push(Issue::new(
            IssueKind::HighDensity,
            format!(
                "Page is {}% full and may cause printing issues",
                (utilization * 100.0).round()
            ),
        ));
    }

    if let Some(min) = options.min_page_height_px {
        if page.measured && page.height < min {
            issues.push(Issue::new(
                IssueKind::SuspiciouslySmall,
                format!(
                    "Page is only {}px tall; content may be missing",
                    page.height.round()
                ),
            ));
        }
    }

    issues
}

/// Density advisories for pages that are already tight.
///
/// Only runs on warning and overflow pages.
pub fn scan_density(page: &Page, status: PageStatus, options: &AnalyzerOptions) -> Vec<Issue> {
    let mut issues = Vec::new();
    if !options.content_analysis || status == PageStatus::Ok {
        return issues;
    }

    let long_paragraphs = page
        .blocks
        .iter()
        .filter(|b| matches!(b.kind, BlockKind::Paragraph | BlockKind::List))
        .filter(|b| b.text_len() > options.long_paragraph_chars)
        .count();
    if long_paragraphs > 0 {
        issues.push(Issue::new(
            IssueKind::LongParagraphs,
            format!(
                "{} long paragraphs detected; consider breaking into smaller sections",
                long_paragraphs
            ),
        ));
    }

    let total_text: usize = page
        .blocks
        .iter()
        .filter(|b| b.kind != BlockKind::Image)
        .map(ContentBlock::text_len)
        .sum();
    if total_text > options.dense_text_chars {
        issues.push(Issue::new(
            IssueKind::TextDensity,
            format!(
                "High text density ({} characters); consider redistributing content",
                total_text
            ),
        ));
    }

    let images = page.block_counts().images;
    if images > options.max_images_per_page {
        issues.push(Issue::new(
            IssueKind::ManyImages,
            format!(
                "Multiple images ({}); consider moving some to other pages",
                images
            ),
        ));
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::classify::classify;

    fn page_with(blocks: Vec<ContentBlock>) -> Page {
        let mut page = Page::new(0, 1000.0, 1200.0);
        for block in blocks {
            page.add_block(block);
        }
        page
    }

    #[test]
    fn test_orphaned_heading_thresholds() {
        let options = AnalyzerOptions::default();
        // Page bottom at 1000px: heading bottom at 950px is 50px away, at 800px is 200px away
        let page = page_with(vec![
            ContentBlock::new("near", BlockKind::heading(2))
                .with_text("Deer Lake Recreation Area")
                .with_metrics(30.0, 50.0),
            ContentBlock::new("far", BlockKind::heading(2))
                .with_text("The Lodge")
                .with_metrics(30.0, 200.0),
        ]);

        let issues = scan_blocks(&page, &options);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::OrphanedHeading);
        assert_eq!(issues[0].block.as_deref(), Some("near"));
        assert!(issues[0].message.contains("Deer Lake Recreation Area"));
    }

    #[test]
    fn test_orphaned_heading_text_truncated() {
        let options = AnalyzerOptions::default();
        let page = page_with(vec![ContentBlock::new("h", BlockKind::heading(3))
            .with_text("Community Services & Amenities for Every Season")
            .with_metrics(30.0, 10.0)]);

        let issues = scan_blocks(&page, &options);
        assert!(issues[0]
            .message
            .contains("\"Community Services & Amenities...\""));
    }

    #[test]
    fn test_large_element_excludes_headings() {
        let options = AnalyzerOptions::default();
        let page = page_with(vec![
            ContentBlock::new("big-h", BlockKind::heading(1)).with_metrics(400.0, 500.0),
            ContentBlock::new("img", BlockKind::Image).with_metrics(350.0, 120.0),
            ContentBlock::new("small", BlockKind::Paragraph).with_metrics(100.0, 300.0),
        ]);

        let issues = scan_blocks(&page, &options);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::LargeElement);
        assert!(issues[0].message.contains("img"));
        assert!(issues[0].message.contains("350px"));
    }

    #[test]
    fn test_table_rows_single_issue() {
        let options = AnalyzerOptions::default();
        let page = page_with(vec![
            ContentBlock::new("t", BlockKind::Table)
                .with_rows(25)
                .with_metrics(200.0, 400.0),
            ContentBlock::new("t2", BlockKind::Table).with_rows(20),
        ]);

        let issues = scan_blocks(&page, &options);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::ConsiderSplitting);
        assert_eq!(issues[0].block.as_deref(), Some("t"));
    }

    #[test]
    fn test_issues_in_document_order() {
        let options = AnalyzerOptions::default();
        let page = page_with(vec![
            ContentBlock::new("t", BlockKind::Table).with_rows(30),
            ContentBlock::new("h", BlockKind::heading(2)).with_metrics(20.0, 5.0),
        ]);

        let kinds: Vec<_> = scan_blocks(&page, &options)
            .into_iter()
            .map(|i| i.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![IssueKind::ConsiderSplitting, IssueKind::OrphanedHeading]
        );
    }

    #[test]
    fn test_paragraph_overflow() {
        let options = AnalyzerOptions::default();
        let long_text = "The wood-chipping program runs every spring. ".repeat(4);
        let page = page_with(vec![
            ContentBlock::new("long", BlockKind::Paragraph)
                .with_text(long_text.clone())
                .with_metrics(80.0, 5.0),
            ContentBlock::new("short", BlockKind::Paragraph)
                .with_text("Short.")
                .with_metrics(20.0, 5.0),
            ContentBlock::new("high", BlockKind::Paragraph)
                .with_text(long_text)
                .with_metrics(80.0, 300.0),
        ]);

        let issues = scan_blocks(&page, &options);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::ParagraphOverflow);
        assert_eq!(issues[0].block.as_deref(), Some("long"));
    }

    #[test]
    fn test_scan_height() {
        let options = AnalyzerOptions::default();

        let page = Page::new(0, 960.0, 912.0);
        let issues = scan_height(&page, &classify(960.0, 912.0), &options);
        assert_eq!(issues[0].kind, IssueKind::Overflow);
        assert!(issues[0].message.contains("48px"));

        let page = Page::new(0, 890.0, 912.0);
        let issues = scan_height(&page, &classify(890.0, 912.0), &options);
        assert_eq!(issues[0].kind, IssueKind::HighDensity);

        let page = Page::new(0, 850.0, 912.0);
        assert!(scan_height(&page, &classify(850.0, 912.0), &options).is_empty());
    }

    #[test]
    fn test_small_page_only_when_configured() {
        let page = Page::new(0, 40.0, 912.0);
        let c = classify(40.0, 912.0);
        assert!(scan_height(&page, &c, &AnalyzerOptions::default()).is_empty());

        let options = AnalyzerOptions::default().with_min_page_height(100.0);
        let issues = scan_height(&page, &c, &options);
        assert_eq!(issues[0].kind, IssueKind::SuspiciouslySmall);

        let unmeasured = Page::unmeasured(0, 912.0);
        assert!(scan_height(&unmeasured, &classify(0.0, 912.0), &options).is_empty());
    }

    #[test]
    fn test_density_only_on_tight_pages() {
        let options = AnalyzerOptions::default();
        let mut blocks: Vec<ContentBlock> = (0..4)
            .map(|i| ContentBlock::new(format!("img-{}", i), BlockKind::Image))
            .collect();
        blocks.push(ContentBlock::new("p", BlockKind::Paragraph).with_text("x".repeat(600)));
        let page = page_with(blocks);

        assert!(scan_density(&page, PageStatus::Ok, &options).is_empty());

        let kinds: Vec<_> = scan_density(&page, PageStatus::Warning, &options)
            .into_iter()
            .map(|i| i.kind)
            .collect();
        assert_eq!(kinds, vec![IssueKind::LongParagraphs, IssueKind::ManyImages]);

        let disabled = AnalyzerOptions::default().with_content_analysis(false);
        assert!(scan_density(&page, PageStatus::Overflow, &disabled).is_empty());
    }

    #[test]
    fn test_density_limits_configurable() {
        let blocks = vec![
            ContentBlock::new("p1", BlockKind::Paragraph).with_text("x".repeat(300)),
            ContentBlock::new("p2", BlockKind::Paragraph).with_text("y".repeat(300)),
            ContentBlock::new("img", BlockKind::Image),
        ];
        let page = page_with(blocks);

        assert!(scan_density(&page, PageStatus::Warning, &AnalyzerOptions::default()).is_empty());

        let strict = AnalyzerOptions::default().with_density_limits(250, 500, 0);
        let kinds: Vec<_> = scan_density(&page, PageStatus::Warning, &strict)
            .into_iter()
            .map(|i| i.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![IssueKind::LongParagraphs, IssueKind::TextDensity, IssueKind::ManyImages]
        );
    }
}
