//! Session time-series extraction: weather and telemetry/car-data traces.
//!
//! These feed display traces directly, so no outlier rejection happens here:
//! samples come back in time order with derived channels attached (elapsed
//! minutes, decoded DRS state, lap-aligned distance). Everything is a pure
//! function of its input rows.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{CarDataRow, TelemetryRow, WeatherRow};

/// DRS status codes that mean the system is actually open.
pub const DRS_ACTIVE_CODES: [i32; 3] = [10, 12, 14];

/// Decode the raw DRS status code into an active/inactive boolean.
pub fn drs_is_active(code: i32) -> bool {
    DRS_ACTIVE_CODES.contains(&code)
}

/// One weather reading with derived elapsed time.
#[derive(Debug, Clone, Serialize)]
pub struct WeatherSample {
    /// Whole minutes since session start (`time_delta_ms / 60000`).
    pub elapsed_min: i64,
    pub time_delta_ms: i64,
    pub air_temp: f64,
    pub track_temp: f64,
    pub rainfall: bool,
    pub humidity: f64,
    pub air_pressure: f64,
    pub wind_speed: f64,
    pub wind_direction: f64,
}

/// Weather rows for one session, ordered by elapsed time, with derived
/// minutes attached.
pub fn weather_series(rows: &[WeatherRow]) -> Vec<WeatherSample> {
    let mut samples: Vec<WeatherSample> = rows
        .iter()
        .map(|row| WeatherSample {
            elapsed_min: row.time_delta_ms / 60_000,
            time_delta_ms: row.time_delta_ms,
            air_temp: row.air_temp,
            track_temp: row.track_temp,
            rainfall: row.rainfall,
            humidity: row.humidity,
            air_pressure: row.air_pressure,
            wind_speed: row.wind_speed,
            wind_direction: row.wind_direction,
        })
        .collect();
    samples.sort_by_key(|s| s.time_delta_ms);
    samples
}

/// One car channel sample with DRS decoded.
#[derive(Debug, Clone, Serialize)]
pub struct CarSample {
    pub date: DateTime<Utc>,
    pub speed: f64,
    pub rpm: f64,
    pub gear: i32,
    pub throttle: f64,
    pub brake: bool,
    pub drs_active: bool,
}

/// Car-data rows for one lap, ordered by sample date.
pub fn car_data_series(rows: &[CarDataRow]) -> Vec<CarSample> {
    let mut samples: Vec<CarSample> = rows
        .iter()
        .map(|row| CarSample {
            date: row.date,
            speed: row.speed,
            rpm: row.rpm,
            gear: row.gear,
            throttle: row.throttle,
            brake: row.brake,
            drs_active: drs_is_active(row.drs),
        })
        .collect();
    samples.sort_by_key(|s| s.date);
    samples
}

/// One merged telemetry sample with derived channels. Channel values stay
/// optional: a missing reading is rendered as a gap, never invented.
#[derive(Debug, Clone, Serialize)]
pub struct TelemetrySample {
    pub date: DateTime<Utc>,
    pub speed: Option<f64>,
    pub rpm: Option<f64>,
    pub n_gear: Option<i32>,
    pub throttle: Option<f64>,
    pub brake: Option<bool>,
    pub drs_active: Option<bool>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    /// Cumulative session distance, metres.
    pub distance: Option<f64>,
    /// Distance since the first sample of the lap, metres, clamped at 0.
    pub lap_distance: Option<f64>,
}

/// Telemetry rows for one lap, ordered by date, with DRS decoded and the
/// distance channel re-based to the lap start.
pub fn lap_telemetry_series(rows: &[TelemetryRow]) -> Vec<TelemetrySample> {
    let mut ordered: Vec<&TelemetryRow> = rows.iter().collect();
    ordered.sort_by_key(|row| row.date);

    let base_distance = ordered.iter().find_map(|row| row.distance);

    ordered
        .into_iter()
        .map(|row| TelemetrySample {
            date: row.date,
            speed: row.speed,
            rpm: row.rpm,
            n_gear: row.n_gear,
            throttle: row.throttle,
            brake: row.brake,
            drs_active: row.drs.map(drs_is_active),
            x: row.x,
            y: row.y,
            distance: row.distance,
            lap_distance: match (row.distance, base_distance) {
                (Some(d), Some(base)) => Some((d - base).max(0.0)),
                _ => None,
            },
        })
        .collect()
}
