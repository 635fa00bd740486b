//! Aggregation and derived-metrics core for motorsport session statistics.
//!
//! The caller fetches one session's rows from storage, bundles them into a
//! [`models::SessionDataset`], and asks the [`registry`] (or the individual
//! services) for structured numeric tables: lap-time distributions, team and
//! driver pace comparisons, tyre degradation curves, weather trends, and
//! rotated telemetry traces. Rendering those tables to pixels and serving
//! them over HTTP lives outside this crate, as do the schema and the import
//! command that populates it.
//!
//! Every aggregation is a pure, synchronous function of its inputs: no I/O,
//! no shared state, no caching. Empty inputs come back as explicitly-empty
//! tables; only missing event/session references are hard errors.

pub mod config;
pub mod errors;
pub mod helpers;
pub mod models;
pub mod registry;
pub mod services;

pub use config::ChartTheme;
pub use errors::CoreError;
pub use models::{SessionContext, SessionDataset};
pub use registry::{metric, MetricDescriptor, MetricOutput, METRICS};
