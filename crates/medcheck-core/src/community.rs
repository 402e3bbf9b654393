//! Community feed, trending topics, and the patient question portal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::verdict::Verdict;

/// What a trending entry counts: a named ingredient or a circulating claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TopicKind {
    Ingredient,
    Claim,
}

impl TopicKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ingredient => "INGREDIENT",
            Self::Claim => "CLAIM",
        }
    }
}

/// A label with an analysis count. Seed data, read-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendingTopic {
    pub id: String,
    pub topic: String,
    /// Analyses run against this topic in the current period.
    pub count: u64,
    pub kind: TopicKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub author_name: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// A free-text wellness experience shared to the community feed.
///
/// Comments are appended in order; posts are never edited or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityPost {
    pub id: String,
    pub author_id: String,
    pub author_name: String,
    pub is_professional: bool,
    pub content: String,
    pub likes: u32,
    pub timestamp: DateTime<Utc>,
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum QuestionStatus {
    Open,
    Answered,
}

impl QuestionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Answered => "ANSWERED",
        }
    }
}

/// A claim submitted by a patient, queued for clinician review.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientQuestion {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub verdict: Verdict,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doctor_response: Option<String>,
}

impl PatientQuestion {
    /// ANSWERED exactly when a clinician response is attached, so the
    /// status/response invariant cannot be violated by construction.
    pub fn status(&self) -> QuestionStatus {
        if self.doctor_response.is_some() {
            QuestionStatus::Answered
        } else {
            QuestionStatus::Open
        }
    }
}
