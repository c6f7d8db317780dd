//! US Letter print-rule validation.
//!
//! The assembled document must print on US Letter paper with fixed margins,
//! one `.paper-page` per sheet and a forced break before every section
//! divider. [`PaginationValidator`] checks the document's CSS for those
//! rules and for overrides that would break them.
//!
//! ```
//! use pagefit::validate::PaginationValidator;
//!
//! let css = "<style>.paper-page { overflow: visible; }</style>";
//! let report = PaginationValidator::new(css).validate();
//! assert!(!report.is_valid());
//! ```

use crate::model::PX_PER_INCH;
use regex::Regex;
use serde::Serialize;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

/// Physical page geometry in inches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin_top: f32,
    pub margin_right: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,
}

impl PageGeometry {
    /// Printable width in inches.
    pub fn printable_width(&self) -> f32 {
        self.width - self.margin_left - self.margin_right
    }

    /// Printable height in inches.
    pub fn printable_height(&self) -> f32 {
        self.height - self.margin_top - self.margin_bottom
    }

    /// Printable height in CSS pixels.
    pub fn printable_height_px(&self) -> f32 {
        self.printable_height() * PX_PER_INCH
    }
}

/// US Letter with the guide's margins.
pub const US_LETTER: PageGeometry = PageGeometry {
    width: 8.5,
    height: 11.0,
    margin_top: 0.75,
    margin_right: 0.5,
    margin_bottom: 0.75,
    margin_left: 0.5,
};

const PAGE_SIZE_RULE: &str = "size: 8.5in 11in";
const PAGE_SIZE_VALUE: &str = "8.5in 11in";
const MARGIN_RULE: &str = "margin: 0.75in 0.5in 0.75in 0.5in";
const PAGE_HEIGHT_VALUE: &str = "9.5in !important";

/// Literal rules every document must contain.
pub const REQUIRED_RULES: [&str; 6] = [
    "@page",
    PAGE_SIZE_RULE,
    MARGIN_RULE,
    ".paper-page",
    "page-break-before: always",
    "break-before: page",
];

const PAPER_PAGE: &str = "paper-page";
const SECTION_DIVIDER: &str = "section-divider";

/// Outcome of validating one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// Violations that block a build
    pub errors: Vec<String>,
    /// Advisories
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// Check if no errors were found.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A CSS rule: selector list and declaration body.
#[derive(Debug, Clone, Copy)]
struct CssRule<'a> {
    selector: &'a str,
    body: &'a str,
}

impl<'a> CssRule<'a> {
    /// Check if any selector in the list styles elements with `class`.
    ///
    /// Only the final compound of each selector counts, so
    /// `.paper-page .content` does not target `paper-page`.
    fn targets(&self, class: &str) -> bool {
        self.selector.split(',').any(|selector| {
            let compound = selector
                .rsplit(|c: char| c.is_whitespace() || matches!(c, '>' | '+' | '~'))
                .find(|part| !part.is_empty())
                .unwrap_or("");
            has_class(compound, class)
        })
    }

    /// Check if any selector in the list is exactly `.class` on its final compound.
    fn ends_with_class(&self, class: &str) -> bool {
        let suffix = format!(".{}", class);
        self.selector
            .split(',')
            .any(|selector| selector.trim_end().ends_with(&suffix))
    }

    /// Declarations as lowercased `(name, value)` pairs.
    fn declarations(&self) -> impl Iterator<Item = (String, &'a str)> + 'a {
        self.body.split(';').filter_map(|decl| {
            let (name, value) = decl.split_once(':')?;
            Some((name.trim().to_ascii_lowercase(), value.trim()))
        })
    }

    fn excerpt(&self) -> String {
        format!("{} {{{}}}", self.selector.trim(), self.body.trim_end())
    }
}

fn has_class(compound: &str, class: &str) -> bool {
    compound.match_indices('.').any(|(i, _)| {
        let rest = &compound[i + 1..];
        rest.strip_prefix(class).is_some_and(|after| {
            !after.starts_with(|c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        })
    })
}

fn normalize(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn rule_pattern() -> &'static Regex {
    static RULE: OnceLock<Regex> = OnceLock::new();
    RULE.get_or_init(|| Regex::new(r"([^{}]+)\{([^{}]*)\}").expect("CSS rule pattern is valid"))
}

fn comment_pattern() -> &'static Regex {
    static COMMENT: OnceLock<Regex> = OnceLock::new();
    COMMENT.get_or_init(|| Regex::new(r"(?s)/\*.*?\*/").expect("CSS comment pattern is valid"))
}

/// Validates a document against the US Letter print rules.
#[derive(Debug, Clone)]
pub struct PaginationValidator {
    content: String,
}

impl PaginationValidator {
    /// Create a validator for document text (HTML or CSS).
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    /// Run every rule.
    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::default();
        let css = comment_pattern().replace_all(&self.content, "");
        let rules: Vec<CssRule<'_>> = rule_pattern()
            .captures_iter(&css)
            .filter_map(|caps| {
                Some(CssRule {
                    selector: caps.get(1)?.as_str(),
                    body: caps.get(2)?.as_str(),
                })
            })
            .collect();

        self.check_page_size(&rules, &mut report);
        self.check_margins(&mut report);
        check_overrides(&rules, &mut report);
        self.check_required_rules(&mut report);
        check_paper_pages(&rules, &mut report);
        check_section_breaks(&rules, &mut report);

        log::debug!(
            "Validated {} CSS rules: {} errors, {} warnings",
            rules.len(),
            report.errors.len(),
            report.warnings.len()
        );
        report
    }

    fn check_page_size(&self, rules: &[CssRule<'_>], report: &mut ValidationReport) {
        if !self.content.contains(PAGE_SIZE_RULE) {
            report
                .errors
                .push("CRITICAL: Missing mandatory US Letter page size (8.5in 11in)".to_string());
        }

        let page_rules = rules
            .iter()
            .filter(|rule| rule.selector.contains("@page"));
        for rule in page_rules {
            for (name, value) in rule.declarations() {
                if name == "size" && !normalize(value).starts_with(PAGE_SIZE_VALUE) {
                    report.errors.push(format!(
                        "FORBIDDEN: Non-US Letter @page size detected: size: {}",
                        value
                    ));
                }
            }
        }
    }

    fn check_margins(&self, report: &mut ValidationReport) {
        if !self.content.contains(MARGIN_RULE) {
            report.errors.push(format!(
                "CRITICAL: Missing mandatory US Letter margins ({})",
                MARGIN_RULE
            ));
        }
    }

    fn check_required_rules(&self, report: &mut ValidationReport) {
        for rule in REQUIRED_RULES {
            if !self.content.contains(rule) {
                report.errors.push(format!("MISSING REQUIRED RULE: {}", rule));
            }
        }
    }
}

fn check_overrides(rules: &[CssRule<'_>], report: &mut ValidationReport) {
    for rule in rules {
        let paper_page = rule.targets(PAPER_PAGE);
        let divider = rule.targets(SECTION_DIVIDER);
        if !paper_page && !divider {
            continue;
        }

        for (name, value) in rule.declarations() {
            let value_norm = normalize(value);
            let forbidden = match name.as_str() {
                "page-break-before" => !value_norm.starts_with("always"),
                "overflow" => !value_norm.starts_with("hidden"),
                "height" => paper_page && !value_norm.starts_with(PAGE_HEIGHT_VALUE),
                _ => false,
            };
            if forbidden {
                report.errors.push(format!(
                    "FORBIDDEN OVERRIDE: {} {{ {}: {} }} - This breaks US Letter compliance",
                    rule.selector.trim(),
                    name,
                    value
                ));
            }
        }
    }
}

fn check_paper_pages(rules: &[CssRule<'_>], report: &mut ValidationReport) {
    for rule in rules.iter().filter(|r| r.ends_with_class(PAPER_PAGE)) {
        if !rule.body.contains("height: 9.5in") {
            let excerpt: String = rule.excerpt().chars().take(50).collect();
            report.warnings.push(format!(
                "Paper page block may be missing height constraint: {}...",
                excerpt
            ));
        }
    }
}

fn check_section_breaks(rules: &[CssRule<'_>], report: &mut ValidationReport) {
    for rule in rules.iter().filter(|r| r.targets(SECTION_DIVIDER)) {
        if !rule.body.contains("page-break-before: always")
            && !rule.body.contains("break-before: page")
        {
            report.errors.push(
                "MISSING MANDATORY PAGE BREAK: Section divider must have page-break-before: always"
                    .to_string(),
            );
        }
    }
}

/// Validate a document on disk. An unreadable file yields an error entry.
pub fn validate_file(path: impl AsRef<Path>) -> ValidationReport {
    let path = path.as_ref();
    match fs::read_to_string(path) {
        Ok(content) => PaginationValidator::new(content).validate(),
        Err(e) => ValidationReport {
            errors: vec![format!("Failed to read file: {}: {}", path.display(), e)],
            warnings: Vec::new(),
        },
    }
}
