//! Aggregation services, one module per concern.
//!
//! Leaf-first: `outliers` and `resolver` have no dependencies between them;
//! `pace`, `timeseries`, `track`, and `speed` consume raw rows plus resolver
//! maps; `comparison` joins pace output back onto classification rows.

pub mod comparison;
pub mod outliers;
pub mod pace;
pub mod resolver;
pub mod speed;
pub mod timeseries;
pub mod track;
