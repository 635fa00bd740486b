//! Static metric registry.
//!
//! The original system discovered plot methods at class-definition time by
//! attribute tagging; here the registry is an explicit, statically-declared
//! ordered list of (id, label, function). The ids double as the names the
//! rendering layer uses to file the generated images.

use serde::Serialize;

use crate::errors::CoreError;
use crate::models::SessionDataset;
use crate::services::comparison::{annotate_results, ComparisonTable, PaceColumn};
use crate::services::pace::{compound_pace_by_lap, driver_pace, team_pace, CompoundPaceTable, PaceTable};
use crate::services::resolver::EntityResolver;
use crate::services::speed::{team_speed_summary, TeamSpeedSummary};
use crate::services::timeseries::{car_data_series, weather_series, CarSample, WeatherSample};
use crate::services::track::{gear_trace, position_outline, speed_trace, TracePoint, TrackSegment};

/// Number of color bands for the speed trace visual.
const SPEED_TRACE_BANDS: usize = 12;

/// Structured numeric result of one metric, ready for the rendering layer.
#[derive(Debug, Clone, Serialize)]
pub enum MetricOutput {
    Pace(PaceTable),
    CompoundPace(CompoundPaceTable),
    Comparison(ComparisonTable),
    Weather(Vec<WeatherSample>),
    CarTrace(Vec<CarSample>),
    TeamSpeed(TeamSpeedSummary),
    Track(Vec<TrackSegment>),
    Outline(Vec<((f64, f64), (f64, f64))>),
}

/// One registered metric.
#[derive(Debug)]
pub struct MetricDescriptor {
    pub id: &'static str,
    pub label: &'static str,
    pub compute: fn(&SessionDataset) -> Result<MetricOutput, CoreError>,
}

/// All session metrics, in display order.
pub const METRICS: &[MetricDescriptor] = &[
    MetricDescriptor {
        id: "team_lap_times_distribution",
        label: "Teams Lap Time Distribution",
        compute: |ds| Ok(MetricOutput::Pace(team_pace(&ds.laps, &resolver(ds)))),
    },
    MetricDescriptor {
        id: "team_avg_pace_comparison",
        label: "Team Avg Pace Comparison",
        compute: |ds| {
            let r = resolver(ds);
            let pace = team_pace(&ds.laps, &r);
            Ok(MetricOutput::Comparison(annotate_results(
                &ds.results,
                &pace,
                &r,
                PaceColumn::Median,
            )))
        },
    },
    MetricDescriptor {
        id: "team_fast_pace_comparison",
        label: "Team Fast Pace Comparison",
        compute: |ds| {
            let r = resolver(ds);
            let pace = team_pace(&ds.laps, &r);
            Ok(MetricOutput::Comparison(annotate_results(
                &ds.results,
                &pace,
                &r,
                PaceColumn::Fastest,
            )))
        },
    },
    MetricDescriptor {
        id: "driver_lap_time_distribution",
        label: "Drivers Lap Time Distribution",
        compute: |ds| Ok(MetricOutput::Pace(driver_pace(&ds.laps, &resolver(ds)))),
    },
    MetricDescriptor {
        id: "track_tyre_evolution",
        label: "Tyre Compound Avg Pace Per Lap",
        compute: |ds| {
            Ok(MetricOutput::CompoundPace(compound_pace_by_lap(
                &ds.laps,
                &resolver(ds),
            )))
        },
    },
    MetricDescriptor {
        id: "weather_data",
        label: "Weather Data",
        compute: |ds| Ok(MetricOutput::Weather(weather_series(&ds.weather))),
    },
    MetricDescriptor {
        id: "team_speed_comparison",
        label: "Max vs Mean Speed - Team",
        compute: |ds| {
            Ok(MetricOutput::TeamSpeed(team_speed_summary(
                &ds.telemetry,
                &ds.laps,
                &resolver(ds),
            )))
        },
    },
    MetricDescriptor {
        id: "lap_car_trace",
        label: "Lap Telemetry Channels",
        compute: |ds| Ok(MetricOutput::CarTrace(car_data_series(&ds.car_data))),
    },
    MetricDescriptor {
        id: "lap_gear_trace",
        label: "Gear Shifts On Track",
        compute: |ds| {
            Ok(MetricOutput::Track(gear_trace(
                &gear_points(ds),
                rotation(ds)?,
            )))
        },
    },
    MetricDescriptor {
        id: "lap_speed_trace",
        label: "Speed On Track",
        compute: |ds| {
            Ok(MetricOutput::Track(speed_trace(
                &speed_points(ds),
                rotation(ds)?,
                SPEED_TRACE_BANDS,
            )))
        },
    },
    MetricDescriptor {
        id: "lap_track_outline",
        label: "Racing Line",
        compute: |ds| {
            Ok(MetricOutput::Outline(position_outline(
                &ds.position_data,
                rotation(ds)?,
            )))
        },
    },
];

/// Look up a metric by id.
pub fn metric(id: &str) -> Result<&'static MetricDescriptor, CoreError> {
    METRICS
        .iter()
        .find(|m| m.id == id)
        .ok_or_else(|| CoreError::UnknownMetric(id.to_string()))
}

fn resolver(ds: &SessionDataset) -> EntityResolver {
    EntityResolver::from_rows(
        &ds.constructors,
        &ds.constructor_colors,
        &ds.drivers,
        &ds.results,
        &ds.tyre_compounds,
    )
}

fn rotation(ds: &SessionDataset) -> Result<f64, CoreError> {
    ds.event
        .as_ref()
        .map(|e| e.rotation_deg)
        .ok_or_else(|| CoreError::MissingReference("event".to_string()))
}

/// Telemetry samples that carry position and gear, in date order.
fn gear_points(ds: &SessionDataset) -> Vec<TracePoint> {
    channel_points(ds, |row| row.n_gear.map(|g| g as f64))
}

/// Telemetry samples that carry position and speed, in date order.
fn speed_points(ds: &SessionDataset) -> Vec<TracePoint> {
    channel_points(ds, |row| row.speed)
}

fn channel_points<F>(ds: &SessionDataset, channel: F) -> Vec<TracePoint>
where
    F: Fn(&crate::models::TelemetryRow) -> Option<f64>,
{
    let mut rows: Vec<&crate::models::TelemetryRow> = ds.telemetry.iter().collect();
    rows.sort_by_key(|row| row.date);
    rows.into_iter()
        .filter_map(|row| match (row.x, row.y, channel(row)) {
            (Some(x), Some(y), Some(value)) => Some(TracePoint { x, y, value }),
            _ => None,
        })
        .collect()
}
