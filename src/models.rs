//! Row types consumed from the persistence layer.
//!
//! The core never queries storage itself: the caller fetches these rows
//! (one session's worth at a time) and hands them over as plain values.
//! Field names and units follow the import schema: lap and sector times
//! are integer milliseconds, colors are hex strings, and telemetry samples
//! are keyed by (lap, date).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

pub type SeasonYear = i32;
pub type EventId = i64;
pub type SessionId = i64;
pub type ConstructorId = i64;
pub type DriverId = i64;
pub type LapId = i64;

/// One calendar entry of a season, including the circuit reference used by
/// the track transform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRow {
    pub id: EventId,
    pub season_year: SeasonYear,
    pub round_number: i32,
    pub name: String,
    pub date_utc: NaiveDate,
    /// "conventional" or "sprint".
    pub format: String,
    /// Circuit rotation in degrees; traces are rotated by the negative of
    /// this angle to a canonical upright orientation.
    pub rotation_deg: f64,
}

/// One track activity within an event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRow {
    pub id: SessionId,
    pub event: EventId,
    /// Practice / qualifying / sprint / race.
    pub session_type: String,
    pub actual_start_utc: DateTime<Utc>,
    pub end_utc: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConstructorRow {
    pub id: ConstructorId,
    pub name: String,
}

/// Per-season color branding for a constructor. Two variants exist: the
/// official palette and the community-sourced one used by the visuals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConstructorColorRow {
    pub constructor: ConstructorId,
    pub season_year: SeasonYear,
    pub color_official: String,
    pub color_fastf1: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverRow {
    pub id: DriverId,
    pub first_name: String,
    pub last_name: String,
    /// Official three-letter abbreviation.
    pub abbreviation: String,
}

/// Session classification for one driver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultRow {
    pub id: i64,
    pub session: SessionId,
    pub driver: DriverId,
    pub constructor: ConstructorId,
    pub position: Option<i32>,
    pub classified_position: Option<String>,
    pub grid_position: Option<i32>,
    pub points: Option<f64>,
}

/// One lap by one driver. `lap_time_ms` is None for incomplete laps and is
/// excluded from every aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LapRow {
    pub id: LapId,
    pub session: SessionId,
    pub driver: DriverId,
    pub lap_number: i32,
    pub lap_time_ms: Option<i64>,
    pub sector_1_time_ms: Option<i64>,
    pub sector_2_time_ms: Option<i64>,
    pub sector_3_time_ms: Option<i64>,
    pub compound: String,
    pub tyre_life: Option<i32>,
    pub is_personal_best: bool,
    pub deleted: bool,
    pub is_accurate: bool,
}

/// Merged telemetry sample (car + position channels), unique per (lap, date).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryRow {
    pub lap: LapId,
    pub date: DateTime<Utc>,
    pub speed: Option<f64>,
    pub rpm: Option<f64>,
    pub n_gear: Option<i32>,
    pub throttle: Option<f64>,
    pub brake: Option<bool>,
    /// Raw DRS status code; see [`crate::services::timeseries::drs_is_active`].
    pub drs: Option<i32>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
    /// Cumulative distance since session start, metres.
    pub distance: Option<f64>,
}

/// Car channel sample, unique per (lap, date).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarDataRow {
    pub lap: LapId,
    pub date: DateTime<Utc>,
    pub speed: f64,
    pub rpm: f64,
    pub gear: i32,
    pub throttle: f64,
    pub brake: bool,
    pub drs: i32,
}

/// Position sample, unique per (lap, date).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionDataRow {
    pub lap: LapId,
    pub date: DateTime<Utc>,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Per-session ambient reading, keyed by elapsed time since session start.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherRow {
    pub session: SessionId,
    pub time_delta_ms: i64,
    pub air_temp: f64,
    pub track_temp: f64,
    pub rainfall: bool,
    pub humidity: f64,
    pub air_pressure: f64,
    pub wind_speed: f64,
    pub wind_direction: f64,
}

/// Per-season tyre compound name → color mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TyreCompoundRow {
    pub name: String,
    pub color: String,
    pub season_year: SeasonYear,
}

/// Caption context shown under every visual: "date | event | session type".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionContext {
    pub session_date: NaiveDate,
    pub event_name: String,
    pub session_type: String,
}

impl SessionContext {
    /// Build the caption context from lookup results.
    ///
    /// A missing event or session is a hard failure: without them there is
    /// nothing meaningful to aggregate or label.
    pub fn from_rows(
        event: Option<&EventRow>,
        session: Option<&SessionRow>,
    ) -> Result<Self, CoreError> {
        let event = event.ok_or_else(|| CoreError::MissingReference("event".to_string()))?;
        let session = session.ok_or_else(|| CoreError::MissingReference("session".to_string()))?;
        Ok(Self {
            session_date: session.actual_start_utc.date_naive(),
            event_name: event.name.clone(),
            session_type: session.session_type.clone(),
        })
    }

    pub fn caption(&self) -> String {
        format!(
            "{} | {} | {}",
            self.session_date, self.event_name, self.session_type
        )
    }
}

/// Everything the caller fetched for one session, bundled for the metric
/// registry. Lap-scoped channels (`telemetry`, `car_data`, `position_data`)
/// hold whichever lap(s) the caller selected; session-scoped rows hold the
/// whole session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionDataset {
    pub year: SeasonYear,
    pub event: Option<EventRow>,
    pub session: Option<SessionRow>,
    pub constructors: Vec<ConstructorRow>,
    pub constructor_colors: Vec<ConstructorColorRow>,
    pub drivers: Vec<DriverRow>,
    pub results: Vec<ResultRow>,
    pub laps: Vec<LapRow>,
    pub tyre_compounds: Vec<TyreCompoundRow>,
    pub weather: Vec<WeatherRow>,
    pub telemetry: Vec<TelemetryRow>,
    pub car_data: Vec<CarDataRow>,
    pub position_data: Vec<PositionDataRow>,
}

impl SessionDataset {
    /// Caption context, failing if the event or session lookup came back empty.
    pub fn context(&self) -> Result<SessionContext, CoreError> {
        SessionContext::from_rows(self.event.as_ref(), self.session.as_ref())
    }
}
