//! State layer: the single in-memory store every view reads from and mutates
//! through action handlers.

mod error;
mod seed;
mod state;

pub use error::StoreError;
pub use state::{ANALYSIS_FAILED_NOTICE, AnalysisTicket, AppState, HISTORY_LIMIT, SignInForm, Tab};
