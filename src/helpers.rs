//! Shared numeric helpers used across the aggregation services.

/// Format a lap time in milliseconds as `m:ss:mmm`.
///
/// Used for axis tick labels and caption text, e.g. `90500` → `"1:30:500"`.
pub fn format_lap_time(ms: i64) -> String {
    let minutes = ms / 60_000;
    let seconds = (ms % 60_000) / 1_000;
    let millis = ms % 1_000;
    format!("{}:{:02}:{:03}", minutes, seconds, millis)
}

/// Round to 2 decimal places. Percentage columns in output tables are
/// rounded this way before comparison and display.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Linear-interpolation quantile over a sorted slice: the value at fractional
/// rank `q * (n - 1)`, interpolating between the two closest ranks.
///
/// `q` must be in `[0, 1]`. Returns `None` for an empty slice.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        return Some(sorted[lo]);
    }
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64))
}

/// Median via [`quantile_sorted`]. Returns `None` for an empty slice.
pub fn median_sorted(sorted: &[f64]) -> Option<f64> {
    quantile_sorted(sorted, 0.5)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_lap_time() {
        assert_eq!(format_lap_time(90_500), "1:30:500");
        assert_eq!(format_lap_time(59_999), "0:59:999");
        assert_eq!(format_lap_time(60_000), "1:00:000");
        assert_eq!(format_lap_time(0), "0:00:000");
    }

    #[test]
    fn test_round2() {
        assert!((round2(1.566) - 1.57).abs() < 1e-10);
        assert!((round2(3.14159) - 3.14).abs() < 1e-10);
        assert_eq!(round2(2.0), 2.0);
    }

    #[test]
    fn test_quantile_interpolates() {
        let values = [1.0, 2.0, 3.0, 4.0];
        // pos = 0.25 * 3 = 0.75 → 1.0 + 0.75 * (2.0 - 1.0)
        assert!((quantile_sorted(&values, 0.25).unwrap() - 1.75).abs() < 1e-10);
        assert!((quantile_sorted(&values, 0.75).unwrap() - 3.25).abs() < 1e-10);
    }

    #[test]
    fn test_quantile_empty() {
        assert_eq!(quantile_sorted(&[], 0.5), None);
    }

    #[test]
    fn test_quantile_single() {
        assert_eq!(quantile_sorted(&[7.0], 0.25), Some(7.0));
        assert_eq!(quantile_sorted(&[7.0], 0.75), Some(7.0));
    }

    #[test]
    fn test_median_even_count() {
        let values = [89_000.0, 90_000.0, 91_000.0, 95_000.0];
        assert!((median_sorted(&values).unwrap() - 90_500.0).abs() < 1e-10);
    }

    #[test]
    fn test_median_odd_count() {
        let values = [1.0, 2.0, 9.0];
        assert_eq!(median_sorted(&values), Some(2.0));
    }
}
