use medcheck_ai::AnalysisError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no active session")]
    NoSession,

    #[error("professional role required")]
    NotProfessional,

    #[error("claim text or image required")]
    EmptyClaim,

    #[error("an identical analysis is already in flight")]
    AlreadyInFlight,

    #[error("question not found: {0}")]
    QuestionNotFound(String),

    #[error("post not found: {0}")]
    PostNotFound(String),

    #[error("history entry not found: {0}")]
    HistoryEntryNotFound(usize),

    #[error("analysis failed: {0}")]
    Analysis(#[from] AnalysisError),
}
