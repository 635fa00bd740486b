//! Entity resolution: pure lookup maps built from reference rows.
//!
//! Every aggregator uses these maps to translate raw identifiers into
//! display-ready attributes (team name, team color, driver abbreviation).
//! Resolution is read-only; a missing key returns `None` and the caller
//! decides the fallback. For colors a fixed neutral hex is provided so an
//! unresolved entity never leaks a raw id into display output.

use std::collections::HashMap;

use crate::models::{
    ConstructorColorRow, ConstructorId, ConstructorRow, DriverId, DriverRow, ResultRow,
    TyreCompoundRow,
};

/// Fallback hex used wherever a team or compound has no color for the season.
pub const NEUTRAL_COLOR: &str = "#808080";

/// Lookup maps for one session of one season.
///
/// `driver → constructor` comes from the session's result rows, so a driver
/// who set laps but never appears in results resolves to no constructor and
/// is excluded from team-grouped aggregates.
#[derive(Debug, Default, Clone)]
pub struct EntityResolver {
    constructor_names: HashMap<ConstructorId, String>,
    team_colors: HashMap<String, String>,
    driver_constructors: HashMap<DriverId, ConstructorId>,
    driver_abbreviations: HashMap<DriverId, String>,
    compound_colors: HashMap<String, String>,
}

impl EntityResolver {
    pub fn from_rows(
        constructors: &[ConstructorRow],
        colors: &[ConstructorColorRow],
        drivers: &[DriverRow],
        results: &[ResultRow],
        compounds: &[TyreCompoundRow],
    ) -> Self {
        let constructor_names: HashMap<ConstructorId, String> = constructors
            .iter()
            .map(|c| (c.id, c.name.clone()))
            .collect();

        let mut team_colors = HashMap::new();
        for color in colors {
            match constructor_names.get(&color.constructor) {
                Some(name) => {
                    team_colors.insert(name.clone(), color.color_fastf1.clone());
                }
                None => {
                    tracing::debug!(
                        constructor = color.constructor,
                        "color row for unknown constructor, skipping"
                    );
                }
            }
        }

        Self {
            constructor_names,
            team_colors,
            driver_constructors: results.iter().map(|r| (r.driver, r.constructor)).collect(),
            driver_abbreviations: drivers
                .iter()
                .map(|d| (d.id, d.abbreviation.clone()))
                .collect(),
            compound_colors: compounds
                .iter()
                .map(|t| (t.name.clone(), t.color.clone()))
                .collect(),
        }
    }

    pub fn constructor_name(&self, id: ConstructorId) -> Option<&str> {
        self.constructor_names.get(&id).map(String::as_str)
    }

    /// Constructor the driver raced for in this session, via result rows.
    pub fn constructor_of(&self, driver: DriverId) -> Option<ConstructorId> {
        self.driver_constructors.get(&driver).copied()
    }

    pub fn abbreviation(&self, driver: DriverId) -> Option<&str> {
        self.driver_abbreviations.get(&driver).map(String::as_str)
    }

    pub fn team_color(&self, team_name: &str) -> Option<&str> {
        self.team_colors.get(team_name).map(String::as_str)
    }

    pub fn team_color_or_neutral(&self, team_name: &str) -> &str {
        self.team_color(team_name).unwrap_or(NEUTRAL_COLOR)
    }

    pub fn compound_color(&self, compound: &str) -> Option<&str> {
        self.compound_colors.get(compound).map(String::as_str)
    }

    pub fn compound_color_or_neutral(&self, compound: &str) -> &str {
        self.compound_color(compound).unwrap_or(NEUTRAL_COLOR)
    }
}
