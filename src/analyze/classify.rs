//! Page classification by height utilization.

use crate::model::PageStatus;

/// Utilization above which a page overflows.
pub const OVERFLOW_LIMIT: f32 = 1.0;

/// Default utilization above which a page is a warning.
pub const DEFAULT_WARNING_THRESHOLD: f32 = 0.9;

/// Utilization and status of one page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    /// height / max height (may exceed 1.0)
    pub utilization: f32,
    /// Status derived from utilization
    pub status: PageStatus,
}

/// Classify a page with the default warning threshold.
///
/// # Example
///
/// ```
/// use pagefit::analyze::classify;
/// use pagefit::PageStatus;
///
/// assert_eq!(classify(960.0, 912.0).status, PageStatus::Overflow);
/// assert_eq!(classify(850.0, 912.0).status, PageStatus::Warning);
/// assert_eq!(classify(700.0, 912.0).status, PageStatus::Ok);
/// ```
pub fn classify(height: f32, max_height: f32) -> Classification {
    classify_with_threshold(height, max_height, DEFAULT_WARNING_THRESHOLD)
}

/// Classify a page against `max_height` and a warning threshold.
///
/// `max_height` must be positive; [`AnalyzerOptions::validate`](super::AnalyzerOptions::validate)
/// guarantees this for analyzer callers. An empty page (height 0) is `Ok`.
pub fn classify_with_threshold(
    height: f32,
    max_height: f32,
    warning_threshold: f32,
) -> Classification {
    let utilization = height / max_height;
    let status = if utilization > OVERFLOW_LIMIT {
        PageStatus::Overflow
    } else if utilization > warning_threshold {
        PageStatus::Warning
    } else {
        PageStatus::Ok
    };

    Classification {
        utilization,
        status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenarios() {
        let c = classify(960.0, 912.0);
        assert_eq!(c.status, PageStatus::Overflow);
        assert!((c.utilization - 1.053).abs() < 0.001);

        let c = classify(850.0, 912.0);
        assert_eq!(c.status, PageStatus::Warning);
        assert!((c.utilization - 0.932).abs() < 0.001);

        let c = classify(700.0, 912.0);
        assert_eq!(c.status, PageStatus::Ok);
        assert!((c.utilization - 0.768).abs() < 0.001);
    }

    #[test]
    fn test_boundaries() {
        // Exactly full is a warning, not an overflow
        assert_eq!(classify(912.0, 912.0).status, PageStatus::Warning);
        // Exactly at the threshold is still ok
        assert_eq!(classify(90.0, 100.0).status, PageStatus::Ok);
        assert_eq!(classify(90.5, 100.0).status, PageStatus::Warning);
        assert_eq!(classify(100.5, 100.0).status, PageStatus::Overflow);
    }

    #[test]
    fn test_empty_page_is_ok() {
        let c = classify(0.0, 912.0);
        assert_eq!(c.utilization, 0.0);
        assert_eq!(c.status, PageStatus::Ok);
    }

    #[test]
    fn test_utilization_is_ratio_and_status_matches() {
        let max = 912.0_f32;
        for step in 0..=300 {
            let height = step as f32 * 5.0;
            let c = classify(height, max);
            assert_eq!(c.utilization, height / max);

            let expected = if c.utilization > 1.0 {
                PageStatus::Overflow
            } else if c.utilization > 0.9 {
                PageStatus::Warning
            } else {
                PageStatus::Ok
            };
            assert_eq!(c.status, expected);
        }
    }

    #[test]
    fn test_idempotent() {
        assert_eq!(classify(850.0, 912.0), classify(850.0, 912.0));
    }

    #[test]
    fn test_custom_threshold() {
        assert_eq!(
            classify_with_threshold(800.0, 1000.0, 0.75).status,
            PageStatus::Warning
        );
        assert_eq!(
            classify_with_threshold(800.0, 1000.0, 0.85).status,
            PageStatus::Ok
        );
    }
}
