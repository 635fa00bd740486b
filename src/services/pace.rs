//! Lap-time pace aggregation, grouped by team, driver, or tyre compound.
//!
//! All three aggregations share the same shape: exclude laps without a time,
//! resolve the grouping key, compute the 1.5×IQR fence once over the whole
//! retained sample, reject outliers, then group and summarise. Groups are
//! ordered by median ascending, which is the canonical display order.
//!
//! The percentage columns use `((value − global_min) / value) * 100`. Note
//! the denominator is the entity's own value, not the global minimum, so the
//! deltas are not symmetric around the leader. Downstream consumers depend on
//! these exact figures; see DESIGN.md before changing the formula.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::helpers::{median_sorted, round2};
use crate::models::LapRow;
use crate::services::outliers::{iqr_bounds, retain_within};
use crate::services::resolver::EntityResolver;

/// Summary statistics for one group (team, driver, or compound).
#[derive(Debug, Clone, Serialize)]
pub struct PaceGroup {
    pub label: String,
    pub color: String,
    pub median_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
    /// Median percentage delta vs the best group's median, 2 decimals.
    pub pct_diff_median: f64,
    /// Fastest-lap percentage delta vs the best group's fastest, 2 decimals.
    pub pct_diff_min: f64,
    /// Post-filter lap times in input order, for distribution plots.
    pub samples_ms: Vec<f64>,
}

/// Ordered pace table: groups sorted by median ascending.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PaceTable {
    pub groups: Vec<PaceGroup>,
    /// Laps excluded because their driver resolved to no constructor (or,
    /// for driver grouping, no abbreviation).
    pub dropped_laps: usize,
    /// Laps rejected by the outlier fence.
    pub filtered_laps: usize,
    /// Fence rejections attributed to the group label they came from. A
    /// label present here but absent from `groups` had every lap fenced
    /// out, which is not the same as a group that never ran.
    pub filtered_by_group: BTreeMap<String, usize>,
}

impl PaceTable {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn group(&self, label: &str) -> Option<&PaceGroup> {
        self.groups.iter().find(|g| g.label == label)
    }
}

/// Median pace per lap number for one compound, for degradation curves.
#[derive(Debug, Clone, Serialize)]
pub struct CompoundLapPoint {
    pub lap_number: i32,
    pub median_ms: f64,
    pub laps: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompoundSeries {
    pub compound: String,
    pub color: String,
    pub points: Vec<CompoundLapPoint>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CompoundPaceTable {
    pub series: Vec<CompoundSeries>,
    pub filtered_laps: usize,
}

/// Pace per constructor. Laps whose driver has no result row in this session
/// are dropped (and counted).
pub fn team_pace(laps: &[LapRow], resolver: &EntityResolver) -> PaceTable {
    let mut dropped = 0usize;
    let mut keyed: Vec<(i64, f64)> = Vec::with_capacity(laps.len());

    for lap in laps {
        let Some(time) = lap.lap_time_ms else { continue };
        match resolver.constructor_of(lap.driver) {
            Some(cid) => keyed.push((cid, time as f64)),
            None => {
                tracing::debug!(driver = lap.driver, "lap without constructor, dropping");
                dropped += 1;
            }
        }
    }

    let (groups, filtered, filtered_by_group) = grouped_stats(keyed, |cid| {
        let label = resolver.constructor_name(*cid)?.to_string();
        let color = resolver.team_color_or_neutral(&label).to_string();
        Some((label, color))
    });

    PaceTable {
        groups,
        dropped_laps: dropped,
        filtered_laps: filtered,
        filtered_by_group,
    }
}

/// Pace per driver, labelled by abbreviation, colored by the driver's team.
/// Laps whose driver lacks a constructor or an abbreviation are dropped.
pub fn driver_pace(laps: &[LapRow], resolver: &EntityResolver) -> PaceTable {
    let mut dropped = 0usize;
    let mut keyed: Vec<(i64, f64)> = Vec::with_capacity(laps.len());

    for lap in laps {
        let Some(time) = lap.lap_time_ms else { continue };
        let resolvable = resolver.constructor_of(lap.driver).is_some()
            && resolver.abbreviation(lap.driver).is_some();
        if resolvable {
            keyed.push((lap.driver, time as f64));
        } else {
            tracing::debug!(driver = lap.driver, "unresolvable driver, dropping lap");
            dropped += 1;
        }
    }

    let (groups, filtered, filtered_by_group) = grouped_stats(keyed, |driver| {
        let label = resolver.abbreviation(*driver)?.to_string();
        let cid = resolver.constructor_of(*driver)?;
        let team = resolver.constructor_name(cid)?;
        Some((label, resolver.team_color_or_neutral(team).to_string()))
    });

    PaceTable {
        groups,
        dropped_laps: dropped,
        filtered_laps: filtered,
        filtered_by_group,
    }
}

/// Median pace per (compound, lap number). No entity join is involved, so
/// nothing is dropped; the session-wide outlier fence still applies.
pub fn compound_pace_by_lap(laps: &[LapRow], resolver: &EntityResolver) -> CompoundPaceTable {
    let timed: Vec<(&LapRow, f64)> = laps
        .iter()
        .filter_map(|lap| lap.lap_time_ms.map(|t| (lap, t as f64)))
        .collect();

    let Some(bounds) = iqr_bounds(&timed.iter().map(|(_, t)| *t).collect::<Vec<f64>>()) else {
        return CompoundPaceTable::default();
    };
    let before = timed.len();
    let kept = retain_within(timed, &bounds, |(_, t)| *t);
    let filtered = before - kept.len();

    let mut cells: HashMap<(String, i32), Vec<f64>> = HashMap::new();
    for (lap, time) in kept {
        cells
            .entry((lap.compound.clone(), lap.lap_number))
            .or_default()
            .push(time);
    }

    let mut per_compound: HashMap<String, Vec<CompoundLapPoint>> = HashMap::new();
    for ((compound, lap_number), mut times) in cells {
        times.sort_by(|a, b| a.total_cmp(b));
        let median = median_sorted(&times).expect("cell is non-empty");
        per_compound.entry(compound).or_default().push(CompoundLapPoint {
            lap_number,
            median_ms: median,
            laps: times.len(),
        });
    }

    let mut series: Vec<CompoundSeries> = per_compound
        .into_iter()
        .map(|(compound, mut points)| {
            points.sort_by_key(|p| p.lap_number);
            let color = resolver.compound_color_or_neutral(&compound).to_string();
            CompoundSeries { compound, color, points }
        })
        .collect();
    series.sort_by(|a, b| a.compound.cmp(&b.compound));

    CompoundPaceTable {
        series,
        filtered_laps: filtered,
    }
}

/// Shared tail of the pace aggregations: session-wide fence, group, summarise,
/// order, percentage columns. `describe` turns a group key into (label, color);
/// a key it cannot describe is skipped, which cannot happen for keys that
/// passed resolution above. Fence rejections are attributed to their group
/// label, so a group fenced to zero samples stays visible to the caller.
fn grouped_stats<K, F>(
    keyed: Vec<(K, f64)>,
    describe: F,
) -> (Vec<PaceGroup>, usize, BTreeMap<String, usize>)
where
    K: std::hash::Hash + Eq,
    F: Fn(&K) -> Option<(String, String)>,
{
    let Some(bounds) = iqr_bounds(&keyed.iter().map(|(_, t)| *t).collect::<Vec<f64>>()) else {
        return (Vec::new(), 0, BTreeMap::new());
    };

    let mut filtered = 0usize;
    let mut filtered_by_group: BTreeMap<String, usize> = BTreeMap::new();
    let mut by_key: HashMap<K, Vec<f64>> = HashMap::new();
    for (key, time) in keyed {
        if bounds.contains(time) {
            by_key.entry(key).or_default().push(time);
        } else {
            filtered += 1;
            if let Some((label, _)) = describe(&key) {
                *filtered_by_group.entry(label).or_default() += 1;
            }
        }
    }

    let mut groups: Vec<PaceGroup> = Vec::with_capacity(by_key.len());
    for (key, samples) in by_key {
        let Some((label, color)) = describe(&key) else { continue };
        let mut sorted = samples.clone();
        sorted.sort_by(|a, b| a.total_cmp(b));
        let median = median_sorted(&sorted).expect("group is non-empty");
        groups.push(PaceGroup {
            label,
            color,
            median_ms: median,
            min_ms: sorted[0],
            max_ms: *sorted.last().expect("group is non-empty"),
            pct_diff_median: 0.0,
            pct_diff_min: 0.0,
            samples_ms: samples,
        });
    }

    groups.sort_by(|a, b| {
        a.median_ms
            .total_cmp(&b.median_ms)
            .then_with(|| a.label.cmp(&b.label))
    });

    if let Some(best_median) = groups.first().map(|g| g.median_ms) {
        let best_min = groups
            .iter()
            .map(|g| g.min_ms)
            .fold(f64::INFINITY, f64::min);
        for group in &mut groups {
            group.pct_diff_median = pct_diff(group.median_ms, best_median);
            group.pct_diff_min = pct_diff(group.min_ms, best_min);
        }
    }

    (groups, filtered, filtered_by_group)
}

/// `((value − best) / value) * 100`, rounded to 2 decimals. The best entity
/// always comes out at exactly 0, and a zero value never divides.
fn pct_diff(value: f64, best: f64) -> f64 {
    if value == 0.0 {
        return 0.0;
    }
    round2(((value - best) / value) * 100.0)
}
