//! Page assessment types produced by one analysis pass.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of a page's height utilization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageStatus {
    /// Utilization at or below the warning threshold
    Ok,
    /// Utilization above the warning threshold, at most 100%
    Warning,
    /// Utilization above 100%
    Overflow,
}

impl PageStatus {
    /// Lowercase label.
    pub fn as_str(&self) -> &'static str {
        match self {
            PageStatus::Ok => "ok",
            PageStatus::Warning => "warning",
            PageStatus::Overflow => "overflow",
        }
    }
}

impl fmt::Display for PageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Issue severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// Kind of a detected pagination issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueKind {
    /// Page is taller than the maximum height
    Overflow,
    /// Page is almost exactly full
    HighDensity,
    /// Heading sits too close to the page bottom
    OrphanedHeading,
    /// Block takes a large share of the page
    LargeElement,
    /// Table has too many rows for one page
    ConsiderSplitting,
    /// Substantial paragraph ends at the page bottom
    ParagraphOverflow,
    /// Page contains very long paragraphs
    LongParagraphs,
    /// Page carries a lot of text
    TextDensity,
    /// Page carries many images
    ManyImages,
    /// Page is shorter than the configured minimum
    SuspiciouslySmall,
}

impl IssueKind {
    /// Default severity for this kind.
    pub fn severity(&self) -> Severity {
        match self {
            IssueKind::Overflow => Severity::High,
            IssueKind::HighDensity | IssueKind::OrphanedHeading | IssueKind::LargeElement => {
                Severity::Medium
            }
            _ => Severity::Low,
        }
    }

    /// Mitigation that addresses this kind, if any.
    pub fn fix(&self) -> Option<FixKind> {
        match self {
            IssueKind::Overflow => Some(FixKind::ClampOverflow),
            IssueKind::OrphanedHeading => Some(FixKind::BreakBeforeHeading),
            IssueKind::HighDensity => Some(FixKind::TightenSpacing),
            IssueKind::ParagraphOverflow => Some(FixKind::KeepTogether),
            _ => None,
        }
    }
}

/// A single issue found on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// Issue kind
    pub kind: IssueKind,
    /// Severity
    pub severity: Severity,
    /// Human-readable description
    pub message: String,
    /// Block the issue refers to, if it is block-level
    pub block: Option<String>,
}

impl Issue {
    /// Create a page-level issue.
    pub fn new(kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: kind.severity(),
            message: message.into(),
            block: None,
        }
    }

    /// Create an issue attached to a block.
    pub fn for_block(kind: IssueKind, block: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            block: Some(block.into()),
            ..Self::new(kind, message)
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Layout mitigation strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FixKind {
    /// Clamp the page to its maximum height and hide the excess.
    ///
    /// Lossy: content past the limit is hidden, not moved to another page.
    ClampOverflow,
    /// Force a page break before an orphaned heading
    BreakBeforeHeading,
    /// Reduce line height and paragraph spacing
    TightenSpacing,
    /// Keep a paragraph from splitting across pages
    KeepTogether,
}

impl FixKind {
    /// Short label.
    pub fn as_str(&self) -> &'static str {
        match self {
            FixKind::ClampOverflow => "overflow-fix",
            FixKind::BreakBeforeHeading => "orphan-fix",
            FixKind::TightenSpacing => "density-fix",
            FixKind::KeepTogether => "paragraph-fix",
        }
    }
}

impl fmt::Display for FixKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of classifying and scanning one page.
///
/// Assessments are immutable: a new pass produces new assessments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageAssessment {
    /// Layout node id of the page
    pub page_id: String,
    /// Page index (0-indexed)
    pub index: usize,
    /// Page label
    pub page_number: String,
    /// Rendered height in px
    pub height: f32,
    /// Maximum allowed height in px
    pub max_height: f32,
    /// height / max_height
    pub utilization: f32,
    /// Classification
    pub status: PageStatus,
    /// Whether the page height was measured
    pub measured: bool,
    /// Issues in document order
    pub issues: Vec<Issue>,
}

impl PageAssessment {
    /// Utilization as a rounded percentage.
    pub fn utilization_percent(&self) -> u32 {
        (self.utilization * 100.0).round().max(0.0) as u32
    }

    /// Remaining space in px (negative on overflow).
    pub fn available_space(&self) -> f32 {
        self.max_height - self.height
    }

    /// Check if any issue was found.
    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }

    /// Issues of the given kind.
    pub fn issues_of(&self, kind: IssueKind) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(move |i| i.kind == kind)
    }

    /// Recommended fixes, one per fixable issue, in issue order.
    pub fn recommended_fixes(&self) -> Vec<(FixKind, &Issue)> {
        self.issues
            .iter()
            .filter_map(|issue| issue.kind.fix().map(|fix| (fix, issue)))
            .collect()
    }

    /// Highest severity among issues.
    pub fn max_severity(&self) -> Option<Severity> {
        self.issues.iter().map(|i| i.severity).max()
    }
}
