/// Errors surfaced by the aggregation core.
///
/// Only genuinely unrecoverable conditions are errors. An aggregation with
/// zero input rows returns an empty table, and a row whose foreign key cannot
/// be resolved is dropped and counted; neither is a `CoreError`.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A required lookup (event, session) does not exist for the given
    /// identifier.
    #[error("Missing reference: {0}")]
    MissingReference(String),

    /// The requested metric id is not in the registry.
    #[error("Unknown metric: {0}")]
    UnknownMetric(String),
}
