//! Standalone HTML rendering for analysis reports.

use super::{AnalysisReport, PageReport};
use crate::model::PageStatus;
use std::fmt::Write;

const STYLE: &str = "body{font-family:-apple-system,'Segoe UI',Roboto,sans-serif;color:#2c3e50;margin:2rem}\
table{border-collapse:collapse;width:100%}th,td{border:1px solid #ddd;padding:6px 8px;text-align:left;vertical-align:top}\
.ok{border-left:4px solid #27ae60}.warning{border-left:4px solid #f39c12}.overflow{border-left:4px solid #e74c3c}\
.metrics{display:flex;gap:12px;margin-bottom:1rem}.metric{background:#f4f6f8;padding:12px;border-radius:8px;text-align:center}\
.metric b{display:block;font-size:18px}.failed{color:#e74c3c}";

/// Render a report as a self-contained HTML document.
pub fn to_html(report: &AnalysisReport) -> String {
    let s = &report.summary;
    let mut out = String::new();

    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str("<title>Pagination Report</title>\n");
    let _ = writeln!(out, "<style>{}</style>", STYLE);
    out.push_str("</head>\n<body>\n<h1>Pagination Report</h1>\n");
    let _ = writeln!(
        out,
        "<p>Generated {}</p>",
        escape(&report.generated_at.to_rfc3339())
    );

    out.push_str("<div class=\"metrics\">\n");
    for (label, value) in [
        ("Pages", s.total_pages.to_string()),
        ("Overflow", s.overflow_pages.to_string()),
        ("Warnings", s.warning_pages.to_string()),
        ("Valid", s.ok_pages.to_string()),
        ("Avg. utilization", format!("{}%", s.average_utilization_percent)),
        ("Fixes", s.fixes_applied.to_string()),
    ] {
        let _ = writeln!(
            out,
            "<div class=\"metric\"><b>{}</b>{}</div>",
            escape(&value),
            label
        );
    }
    out.push_str("</div>\n");

    out.push_str("<table>\n<thead><tr><th>Page</th><th>Utilization</th><th>Status</th>");
    out.push_str("<th>Issues</th><th>Fixes</th></tr></thead>\n<tbody>\n");
    for page in &report.pages {
        write_row(&mut out, page);
    }
    out.push_str("</tbody>\n</table>\n</body>\n</html>\n");

    out
}

fn write_row(out: &mut String, page: &PageReport) {
    let class = match page.status {
        PageStatus::Ok => "ok",
        PageStatus::Warning => "warning",
        PageStatus::Overflow => "overflow",
    };
    let _ = write!(
        out,
        "<tr class=\"{}\"><td>{}</td><td>{}%</td><td>{}</td>",
        class,
        escape(&page.page_number),
        page.utilization_percent,
        page.status
    );
    let _ = write!(out, "<td>{}</td>", list(&page.issues));

    let mut fixes = list(&page.fixes_applied);
    if let Some(err) = &page.fix_error {
        let _ = write!(fixes, "<span class=\"failed\">{}</span>", escape(err));
    }
    let _ = writeln!(out, "<td>{}</td></tr>", fixes);
}

fn list(items: &[String]) -> String {
    if items.is_empty() {
        return String::new();
    }
    let mut out = String::from("<ul>");
    for item in items {
        let _ = write!(out, "<li>{}</li>", escape(item));
    }
    out.push_str("</ul>");
    out
}

/// Escape text for HTML element content and attribute values.
pub(crate) fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
