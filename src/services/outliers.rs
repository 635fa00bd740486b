//! IQR outlier filter for lap-time samples.
//!
//! Bounds are the standard 1.5×IQR fence: `[Q1 − 1.5·IQR, Q3 + 1.5·IQR]`
//! with quartiles computed by linear interpolation. Pace aggregation computes
//! the fence once over the whole session's lap times and then applies it
//! before any grouping; display traces (telemetry channels) are never
//! filtered.

use crate::helpers::quantile_sorted;

/// Inclusive lower/upper fence for outlier rejection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IqrBounds {
    pub lower: f64,
    pub upper: f64,
}

impl IqrBounds {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

/// Compute the 1.5×IQR fence for a sample set.
///
/// Non-finite values are ignored. Returns `None` when no finite samples
/// remain, so an empty distribution is distinguishable from a degenerate
/// one (all values equal → IQR 0 → the fence collapses to that value and
/// everything passes).
pub fn iqr_bounds(values: &[f64]) -> Option<IqrBounds> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(|a, b| a.total_cmp(b));

    let q1 = quantile_sorted(&sorted, 0.25)?;
    let q3 = quantile_sorted(&sorted, 0.75)?;
    let iqr = q3 - q1;
    Some(IqrBounds {
        lower: q1 - 1.5 * iqr,
        upper: q3 + 1.5 * iqr,
    })
}

/// Retain the rows whose extracted value falls inside `bounds`, preserving
/// input order and the full row context.
pub fn retain_within<T, F>(rows: Vec<T>, bounds: &IqrBounds, value: F) -> Vec<T>
where
    F: Fn(&T) -> f64,
{
    rows.into_iter()
        .filter(|row| bounds.contains(value(row)))
        .collect()
}

/// Convenience for plain scalar samples: fence + retain in one step.
/// An empty input comes back empty.
pub fn filter_outliers(values: &[f64]) -> Vec<f64> {
    match iqr_bounds(values) {
        Some(bounds) => values
            .iter()
            .copied()
            .filter(|v| bounds.contains(*v))
            .collect(),
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_iqr_passes_everything() {
        let values = [90_000.0; 8];
        let filtered = filter_outliers(&values);
        assert_eq!(filtered, values.to_vec());
    }

    #[test]
    fn test_single_extreme_value_excluded() {
        // One value 10× the others gets fenced out.
        let mut values = vec![90.0, 91.0, 89.5, 90.5, 90.2, 89.8, 90.7];
        values.push(900.0);
        let filtered = filter_outliers(&values);
        assert_eq!(filtered.len(), 7);
        assert!(!filtered.contains(&900.0));
    }

    #[test]
    fn test_order_preserved() {
        let values = [91.0, 89.0, 500.0, 90.0];
        let filtered = filter_outliers(&values);
        assert_eq!(filtered, vec![91.0, 89.0, 90.0]);
    }

    #[test]
    fn test_empty_input() {
        assert!(filter_outliers(&[]).is_empty());
        assert_eq!(iqr_bounds(&[]), None);
    }

    #[test]
    fn test_non_finite_ignored_for_bounds() {
        let values = [90.0, 91.0, f64::NAN, 89.0, 90.5];
        let bounds = iqr_bounds(&values).unwrap();
        assert!(bounds.contains(90.0));
        assert!(!bounds.contains(f64::NAN));
    }

    #[test]
    fn test_retain_within_keeps_row_context() {
        #[derive(Debug, PartialEq)]
        struct Row {
            driver: i64,
            time: f64,
        }
        let rows = vec![
            Row { driver: 1, time: 90.0 },
            Row { driver: 2, time: 900.0 },
            Row { driver: 3, time: 91.0 },
        ];
        let bounds = IqrBounds { lower: 80.0, upper: 100.0 };
        let kept = retain_within(rows, &bounds, |r| r.time);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].driver, 1);
        assert_eq!(kept[1].driver, 3);
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let bounds = IqrBounds { lower: 1.0, upper: 2.0 };
        assert!(bounds.contains(1.0));
        assert!(bounds.contains(2.0));
        assert!(!bounds.contains(0.999_999));
    }
}
