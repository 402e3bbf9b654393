use thiserror::Error;

/// Failure of one analysis round-trip.
///
/// Callers collapse every variant into a single retryable "analysis failed"
/// condition; the distinctions exist for logs and tests.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("analysis request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("provider returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("provider response violated the output schema: {0}")]
    Schema(String),
}
