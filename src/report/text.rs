//! Plain-text console rendering for analysis reports.

use super::AnalysisReport;
use crate::model::PageStatus;
use std::fmt::Write;

/// Render a report as plain text.
pub fn to_text(report: &AnalysisReport) -> String {
    let mut out = String::new();
    let s = &report.summary;

    let _ = writeln!(out, "Pagination Analysis Results");
    let _ = writeln!(out, "  Total pages analyzed: {}", s.total_pages);
    let _ = writeln!(
        out,
        "  Overflow: {}  Warnings: {}  Valid: {}",
        s.overflow_pages, s.warning_pages, s.ok_pages
    );
    let _ = writeln!(
        out,
        "  Average utilization: {}%",
        s.average_utilization_percent
    );
    if s.unmeasured_pages > 0 {
        let _ = writeln!(out, "  Unmeasured pages: {}", s.unmeasured_pages);
    }
    if s.fixes_applied > 0 || s.fixes_failed > 0 {
        let _ = writeln!(
            out,
            "  Fixes applied: {}  Pages with failed fixes: {}",
            s.fixes_applied, s.fixes_failed
        );
    }

    let flagged: Vec<_> = report
        .pages
        .iter()
        .filter(|p| p.status != PageStatus::Ok || !p.issues.is_empty() || p.fix_error.is_some())
        .collect();

    if flagged.is_empty() {
        let _ = writeln!(out, "\nNo pagination issues found.");
        return out;
    }

    for page in flagged {
        let _ = writeln!(
            out,
            "\n[{}] Page {} ({}%, {}px)",
            page.status,
            page.page_number,
            page.utilization_percent,
            page.height.round()
        );
        for issue in &page.issues {
            let _ = writeln!(out, "    - {}", issue);
        }
        for fix in &page.fixes_applied {
            let _ = writeln!(out, "    + {}", fix);
        }
        if let Some(err) = &page.fix_error {
            let _ = writeln!(out, "    ! {}", err);
        }
    }

    out
}
