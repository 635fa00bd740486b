//! Result/pace comparator: broadcast a team's aggregate pace onto every
//! classified result row.
//!
//! Output keeps exactly one row per result row; both drivers of a team carry
//! the same team metrics. Rows are ordered ascending by the chosen percentage
//! column (best team first); rows whose team has no pace group sort last.

use serde::Serialize;

use crate::models::{DriverId, ResultRow};
use crate::services::pace::PaceTable;
use crate::services::resolver::{EntityResolver, NEUTRAL_COLOR};

/// Which pace statistic drives the comparison ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaceColumn {
    Median,
    Fastest,
}

/// One result row annotated with its constructor's aggregate pace.
#[derive(Debug, Clone, Serialize)]
pub struct ResultPaceRow {
    pub driver: DriverId,
    pub abbreviation: Option<String>,
    pub position: Option<i32>,
    pub classified_position: Option<String>,
    /// None when the constructor id has no reference row.
    pub team: Option<String>,
    pub color: String,
    /// Team pace metrics; None when the team produced no post-filter laps.
    pub median_ms: Option<f64>,
    pub min_ms: Option<f64>,
    pub pct_diff_median: Option<f64>,
    pub pct_diff_min: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ComparisonTable {
    pub rows: Vec<ResultPaceRow>,
    /// Result rows that carry no pace metrics (team missing from the pace
    /// table or unresolvable constructor).
    pub unpaced_rows: usize,
}

/// Join aggregated pace back onto classification rows and order by the
/// chosen percentage column.
pub fn annotate_results(
    results: &[ResultRow],
    pace: &PaceTable,
    resolver: &EntityResolver,
    order_by: PaceColumn,
) -> ComparisonTable {
    let mut unpaced = 0usize;
    let mut rows: Vec<ResultPaceRow> = results
        .iter()
        .map(|result| {
            let team = resolver
                .constructor_name(result.constructor)
                .map(str::to_string);
            let group = team.as_deref().and_then(|name| pace.group(name));
            if group.is_none() {
                tracing::debug!(
                    constructor = result.constructor,
                    "result row without pace metrics"
                );
                unpaced += 1;
            }
            ResultPaceRow {
                driver: result.driver,
                abbreviation: resolver.abbreviation(result.driver).map(str::to_string),
                position: result.position,
                classified_position: result.classified_position.clone(),
                color: team
                    .as_deref()
                    .map(|name| resolver.team_color_or_neutral(name).to_string())
                    .unwrap_or_else(|| NEUTRAL_COLOR.to_string()),
                team,
                median_ms: group.map(|g| g.median_ms),
                min_ms: group.map(|g| g.min_ms),
                pct_diff_median: group.map(|g| g.pct_diff_median),
                pct_diff_min: group.map(|g| g.pct_diff_min),
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        let key = |row: &ResultPaceRow| match order_by {
            PaceColumn::Median => row.pct_diff_median,
            PaceColumn::Fastest => row.pct_diff_min,
        };
        match (key(a), key(b)) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        }
        .then_with(|| a.position.unwrap_or(i32::MAX).cmp(&b.position.unwrap_or(i32::MAX)))
    });

    ComparisonTable {
        rows,
        unpaced_rows: unpaced,
    }
}
