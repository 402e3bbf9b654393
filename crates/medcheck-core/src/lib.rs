pub mod community;
pub mod markup;
pub mod user;
pub mod verdict;

pub use community::{
    Comment, CommunityPost, PatientQuestion, QuestionStatus, TopicKind, TrendingTopic,
};
pub use markup::{SummarySegment, parse_summary};
pub use user::{Role, User};
pub use verdict::{Source, TermDefinition, Verdict, VerdictStatus};

/// Mint a fresh opaque identifier (UUID v4).
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
