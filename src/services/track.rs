//! Geometric track transform: rotate position traces to the canonical
//! circuit orientation and build band-annotated line segments for gear and
//! speed visuals.
//!
//! Rotation is by `−rotation_deg` (the circuit reference stores how far the
//! track is rotated away from upright, so the correction is counter-clockwise
//! by that amount). Coordinates are passed through unclamped.

use serde::Serialize;

use crate::models::PositionDataRow;

/// A position sample with the channel value to band on (gear or speed).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TracePoint {
    pub x: f64,
    pub y: f64,
    pub value: f64,
}

/// One drawable line segment with the band index used for coloring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrackSegment {
    pub start: (f64, f64),
    pub end: (f64, f64),
    pub band: usize,
}

/// Rotate points by `−angle_deg` with the standard 2×2 rotation matrix,
/// preserving order.
pub fn rotate_points(points: &[(f64, f64)], angle_deg: f64) -> Vec<(f64, f64)> {
    let theta = -angle_deg.to_radians();
    let (sin, cos) = theta.sin_cos();
    points
        .iter()
        .map(|&(x, y)| (x * cos - y * sin, x * sin + y * cos))
        .collect()
}

/// Consecutive point pairs. Fewer than 2 points yield zero segments.
pub fn build_segments(points: &[(f64, f64)]) -> Vec<((f64, f64), (f64, f64))> {
    points.windows(2).map(|w| (w[0], w[1])).collect()
}

/// Map channel values into `bands` equal-width buckets between the sample
/// min and max. All-equal values (or a single band) map to band 0.
pub fn band_values(values: &[f64], bands: usize) -> Vec<usize> {
    if values.is_empty() || bands == 0 {
        return Vec::new();
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;
    values
        .iter()
        .map(|&v| {
            if span == 0.0 {
                0
            } else {
                (((v - min) / span) * bands as f64).floor().min(bands as f64 - 1.0) as usize
            }
        })
        .collect()
}

/// Gear trace for one lap: rotate, segment, band by the gear value itself.
/// Each segment takes the gear at its starting sample.
pub fn gear_trace(points: &[TracePoint], angle_deg: f64) -> Vec<TrackSegment> {
    trace_segments(points, angle_deg, |values, i| values[i].max(0.0) as usize)
}

/// Speed trace for one lap: rotate, segment, band by min/max-scaled speed.
pub fn speed_trace(points: &[TracePoint], angle_deg: f64, bands: usize) -> Vec<TrackSegment> {
    if bands == 0 {
        return Vec::new();
    }
    let values: Vec<f64> = points.iter().map(|p| p.value).collect();
    let banded = band_values(&values, bands);
    trace_segments(points, angle_deg, |_, i| banded[i])
}

/// Plain racing-line outline from position samples: order by date, rotate,
/// segment. No banding; the outline is drawn in a single color.
pub fn position_outline(rows: &[PositionDataRow], angle_deg: f64) -> Vec<((f64, f64), (f64, f64))> {
    let mut ordered: Vec<&PositionDataRow> = rows.iter().collect();
    ordered.sort_by_key(|row| row.date);
    let xy: Vec<(f64, f64)> = ordered.iter().map(|row| (row.x, row.y)).collect();
    build_segments(&rotate_points(&xy, angle_deg))
}

fn trace_segments<F>(points: &[TracePoint], angle_deg: f64, band_at: F) -> Vec<TrackSegment>
where
    F: Fn(&[f64], usize) -> usize,
{
    if points.len() < 2 {
        return Vec::new();
    }
    let xy: Vec<(f64, f64)> = points.iter().map(|p| (p.x, p.y)).collect();
    let rotated = rotate_points(&xy, angle_deg);
    let values: Vec<f64> = points.iter().map(|p| p.value).collect();

    build_segments(&rotated)
        .into_iter()
        .enumerate()
        .map(|(i, (start, end))| TrackSegment {
            start,
            end,
            band: band_at(&values, i),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn close(a: (f64, f64), b: (f64, f64)) -> bool {
        (a.0 - b.0).abs() < EPS && (a.1 - b.1).abs() < EPS
    }

    #[test]
    fn test_zero_rotation_is_identity() {
        let points = vec![(1.0, 2.0), (-3.5, 0.25)];
        let rotated = rotate_points(&points, 0.0);
        assert!(close(rotated[0], points[0]));
        assert!(close(rotated[1], points[1]));
    }

    #[test]
    fn test_full_turn_equals_identity() {
        let points = vec![(10.0, -4.0), (0.0, 7.5)];
        let rotated = rotate_points(&points, 360.0);
        assert!(close(rotated[0], points[0]));
        assert!(close(rotated[1], points[1]));
    }

    #[test]
    fn test_rotation_by_90_degrees() {
        // Rotating by −90° (the correction for rotation_deg = 90) maps
        // (1, 0) → (0, −1).
        let rotated = rotate_points(&[(1.0, 0.0)], 90.0);
        assert!(close(rotated[0], (0.0, -1.0)));
    }

    #[test]
    fn test_rotation_preserves_order_and_length() {
        let points = vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)];
        let rotated = rotate_points(&points, 78.0);
        assert_eq!(rotated.len(), 3);
        // Pairwise distances are invariant under rotation.
        let d = |a: (f64, f64), b: (f64, f64)| ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt();
        assert!((d(rotated[0], rotated[1]) - 1.0).abs() < EPS);
        assert!((d(rotated[1], rotated[2]) - 1.0).abs() < EPS);
    }

    #[test]
    fn test_fewer_than_two_points_zero_segments() {
        assert!(build_segments(&[]).is_empty());
        assert!(build_segments(&[(1.0, 1.0)]).is_empty());
        assert!(gear_trace(&[TracePoint { x: 1.0, y: 1.0, value: 3.0 }], 45.0).is_empty());
    }

    #[test]
    fn test_band_values_scaling() {
        let bands = band_values(&[0.0, 50.0, 100.0], 4);
        assert_eq!(bands, vec![0, 2, 3]);
    }

    #[test]
    fn test_band_values_all_equal() {
        assert_eq!(band_values(&[5.0, 5.0, 5.0], 4), vec![0, 0, 0]);
    }

    #[test]
    fn test_gear_trace_bands_from_start_sample() {
        let points = vec![
            TracePoint { x: 0.0, y: 0.0, value: 3.0 },
            TracePoint { x: 1.0, y: 0.0, value: 4.0 },
            TracePoint { x: 2.0, y: 0.0, value: 5.0 },
        ];
        let segments = gear_trace(&points, 0.0);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].band, 3);
        assert_eq!(segments[1].band, 4);
    }

    #[test]
    fn test_position_outline_ordered_by_date() {
        use chrono::{TimeZone, Utc};
        let row = |secs: i64, x: f64| PositionDataRow {
            lap: 1,
            date: Utc.timestamp_opt(1_716_730_000 + secs, 0).unwrap(),
            x,
            y: 0.0,
            z: 0.0,
        };
        let segments = position_outline(&[row(2, 2.0), row(0, 0.0), row(1, 1.0)], 0.0);
        assert_eq!(segments.len(), 2);
        assert!(close(segments[0].0, (0.0, 0.0)));
        assert!(close(segments[1].1, (2.0, 0.0)));
    }

    #[test]
    fn test_speed_trace_band_count_bounded() {
        let points: Vec<TracePoint> = (0..10)
            .map(|i| TracePoint {
                x: i as f64,
                y: 0.0,
                value: (i * 30) as f64,
            })
            .collect();
        let segments = speed_trace(&points, 30.0, 5);
        assert_eq!(segments.len(), 9);
        assert!(segments.iter().all(|s| s.band < 5));
    }
}
