//! Per-team speed summary from telemetry samples.
//!
//! Telemetry rows are keyed by lap, so the join runs lap → driver →
//! constructor: the lap list gives lap → driver, the session's result rows
//! (via the resolver) give driver → constructor. Samples whose lap cannot be
//! joined to a constructor are dropped and counted.

use std::collections::HashMap;

use serde::Serialize;

use crate::models::{ConstructorId, LapId, LapRow, TelemetryRow};
use crate::services::resolver::EntityResolver;

/// Speed summary for one constructor.
#[derive(Debug, Clone, Serialize)]
pub struct TeamSpeed {
    pub constructor: ConstructorId,
    pub team: String,
    pub color: String,
    pub mean_speed: f64,
    pub max_speed: f64,
    pub samples: usize,
}

/// One row per constructor, ordered by constructor id. An empty telemetry
/// input yields an explicitly-empty summary, never an error.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TeamSpeedSummary {
    pub teams: Vec<TeamSpeed>,
    /// Samples whose lap had no resolvable constructor.
    pub dropped_samples: usize,
}

impl TeamSpeedSummary {
    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }
}

pub fn team_speed_summary(
    telemetry: &[TelemetryRow],
    laps: &[LapRow],
    resolver: &EntityResolver,
) -> TeamSpeedSummary {
    // lap → constructor, composed from lap → driver and driver → constructor.
    let lap_constructors: HashMap<LapId, ConstructorId> = laps
        .iter()
        .filter_map(|lap| resolver.constructor_of(lap.driver).map(|cid| (lap.id, cid)))
        .collect();

    struct Acc {
        sum: f64,
        max: f64,
        count: usize,
    }
    let mut by_team: HashMap<ConstructorId, Acc> = HashMap::new();
    let mut dropped = 0usize;

    for sample in telemetry {
        let Some(speed) = sample.speed else { continue };
        match lap_constructors.get(&sample.lap) {
            Some(&cid) => {
                let acc = by_team.entry(cid).or_insert(Acc {
                    sum: 0.0,
                    max: f64::NEG_INFINITY,
                    count: 0,
                });
                acc.sum += speed;
                acc.max = acc.max.max(speed);
                acc.count += 1;
            }
            None => {
                tracing::debug!(lap = sample.lap, "telemetry sample without constructor");
                dropped += 1;
            }
        }
    }

    let mut teams: Vec<TeamSpeed> = by_team
        .into_iter()
        .filter_map(|(cid, acc)| {
            let team = resolver.constructor_name(cid)?.to_string();
            let color = resolver.team_color_or_neutral(&team).to_string();
            Some(TeamSpeed {
                constructor: cid,
                team,
                color,
                mean_speed: acc.sum / acc.count as f64,
                max_speed: acc.max,
                samples: acc.count,
            })
        })
        .collect();
    teams.sort_by_key(|t| t.constructor);

    TeamSpeedSummary {
        teams,
        dropped_samples: dropped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ConstructorRow, DriverRow, ResultRow};
    use chrono::{TimeZone, Utc};

    fn resolver() -> EntityResolver {
        let constructors = vec![
            ConstructorRow { id: 10, name: "A".to_string() },
            ConstructorRow { id: 20, name: "B".to_string() },
        ];
        let drivers = vec![
            DriverRow {
                id: 1,
                first_name: "One".to_string(),
                last_name: "One".to_string(),
                abbreviation: "ONE".to_string(),
            },
            DriverRow {
                id: 2,
                first_name: "Two".to_string(),
                last_name: "Two".to_string(),
                abbreviation: "TWO".to_string(),
            },
        ];
        let results = vec![
            ResultRow {
                id: 100,
                session: 42,
                driver: 1,
                constructor: 10,
                position: Some(1),
                classified_position: Some("1".to_string()),
                grid_position: None,
                points: None,
            },
            ResultRow {
                id: 101,
                session: 42,
                driver: 2,
                constructor: 20,
                position: Some(2),
                classified_position: Some("2".to_string()),
                grid_position: None,
                points: None,
            },
        ];
        EntityResolver::from_rows(&constructors, &[], &drivers, &results, &[])
    }

    fn lap(id: i64, driver: i64) -> LapRow {
        LapRow {
            id,
            session: 42,
            driver,
            lap_number: 1,
            lap_time_ms: Some(90_000),
            sector_1_time_ms: None,
            sector_2_time_ms: None,
            sector_3_time_ms: None,
            compound: "SOFT".to_string(),
            tyre_life: None,
            is_personal_best: false,
            deleted: false,
            is_accurate: true,
        }
    }

    fn sample(lap: i64, speed: Option<f64>) -> TelemetryRow {
        TelemetryRow {
            lap,
            date: Utc.timestamp_opt(1_716_730_000, 0).unwrap(),
            speed,
            rpm: None,
            n_gear: None,
            throttle: None,
            brake: None,
            drs: None,
            x: None,
            y: None,
            z: None,
            distance: None,
        }
    }

    #[test]
    fn test_mean_and_max_per_team() {
        let laps = vec![lap(1, 1), lap(2, 2)];
        let telemetry = vec![
            sample(1, Some(200.0)),
            sample(1, Some(300.0)),
            sample(2, Some(250.0)),
        ];
        let summary = team_speed_summary(&telemetry, &laps, &resolver());
        assert_eq!(summary.teams.len(), 2);
        let a = &summary.teams[0];
        assert_eq!(a.team, "A");
        assert!((a.mean_speed - 250.0).abs() < 1e-10);
        assert!((a.max_speed - 300.0).abs() < 1e-10);
        assert_eq!(a.samples, 2);
    }

    #[test]
    fn test_mean_never_exceeds_max() {
        let laps = vec![lap(1, 1), lap(2, 2)];
        let telemetry = vec![
            sample(1, Some(180.0)),
            sample(1, Some(320.0)),
            sample(2, Some(260.0)),
            sample(2, Some(200.0)),
        ];
        let summary = team_speed_summary(&telemetry, &laps, &resolver());
        for team in &summary.teams {
            assert!(team.mean_speed <= team.max_speed);
        }
    }

    #[test]
    fn test_unjoinable_samples_dropped_and_counted() {
        // Lap 9 doesn't exist; lap 3 belongs to driver 5 who has no result.
        let laps = vec![lap(1, 1), lap(3, 5)];
        let telemetry = vec![
            sample(1, Some(200.0)),
            sample(9, Some(210.0)),
            sample(3, Some(220.0)),
        ];
        let summary = team_speed_summary(&telemetry, &laps, &resolver());
        assert_eq!(summary.teams.len(), 1);
        assert_eq!(summary.dropped_samples, 2);
    }

    #[test]
    fn test_empty_telemetry_gives_empty_summary() {
        let summary = team_speed_summary(&[], &[lap(1, 1)], &resolver());
        assert!(summary.is_empty());
        assert_eq!(summary.dropped_samples, 0);
    }

    #[test]
    fn test_null_speed_channel_skipped() {
        let laps = vec![lap(1, 1)];
        let telemetry = vec![sample(1, None), sample(1, Some(240.0))];
        let summary = team_speed_summary(&telemetry, &laps, &resolver());
        assert_eq!(summary.teams[0].samples, 1);
        // Null channels are excluded, not treated as join failures.
        assert_eq!(summary.dropped_samples, 0);
    }
}
