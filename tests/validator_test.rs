//! Integration tests for US Letter print-rule validation.

use pagefit::validate::{validate_file, PaginationValidator, REQUIRED_RULES, US_LETTER};
use pagefit::AnalyzerOptions;
use std::fs;
use tempfile::TempDir;

const DOCUMENT: &str = r#"<!DOCTYPE html>
<html>
<head>
<style>
    @page {
        size: 8.5in 11in;
        margin: 0.75in 0.5in 0.75in 0.5in;
    }
    .paper-page {
        width: 7.5in;
        height: 9.5in !important;
        overflow: hidden;
        page-break-before: always;
        break-before: page;
    }
    .section-divider {
        page-break-before: always;
        break-before: page;
    }
    .section-divider .section-title { font-size: 28pt; }
</style>
</head>
<body>
<div class="paper-page section-divider" data-page-number="divider"></div>
</body>
</html>
"#;

#[test]
fn test_printable_height_matches_default_max() {
    assert_eq!(
        US_LETTER.printable_height_px(),
        AnalyzerOptions::default().max_page_height_px
    );
}

#[test]
fn test_valid_document() {
    let report = PaginationValidator::new(DOCUMENT).validate();
    assert!(report.is_valid(), "{:?}", report.errors);
    assert!(report.warnings.is_empty());
}

#[test]
fn test_every_required_rule_is_reported() {
    let report = PaginationValidator::new("<html></html>").validate();
    for rule in REQUIRED_RULES {
        let expected = format!("MISSING REQUIRED RULE: {}", rule);
        assert!(report.errors.contains(&expected), "missing {:?}", expected);
    }
}

#[test]
fn test_override_in_print_media() {
    let broken = DOCUMENT.replace(
        "</style>",
        "@media print { .section-divider { page-break-before: auto; overflow: scroll; } }\n</style>",
    );
    let report = PaginationValidator::new(broken).validate();

    assert!(!report.is_valid());
    let overrides: Vec<_> = report
        .errors
        .iter()
        .filter(|e| e.starts_with("FORBIDDEN OVERRIDE"))
        .collect();
    assert_eq!(overrides.len(), 2);
    assert!(report
        .errors
        .iter()
        .any(|e| e.starts_with("MISSING MANDATORY PAGE BREAK")));
}

#[test]
fn test_a4_page_size_rejected() {
    let a4 = DOCUMENT.replace("size: 8.5in 11in;", "size: A4;");
    let report = PaginationValidator::new(a4).validate();
    assert!(report
        .errors
        .iter()
        .any(|e| e == "FORBIDDEN: Non-US Letter @page size detected: size: A4"));
    assert!(report
        .errors
        .iter()
        .any(|e| e.starts_with("CRITICAL: Missing mandatory US Letter page size")));
}

#[test]
fn test_validate_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("index.html");
    fs::write(&path, DOCUMENT).unwrap();
    assert!(validate_file(&path).is_valid());

    let missing = validate_file(dir.path().join("missing.html"));
    assert_eq!(missing.errors.len(), 1);
    assert!(missing.errors[0].starts_with("Failed to read file"));
}
