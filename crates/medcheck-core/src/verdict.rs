//! The verdict data contract: the structured outcome of one claim analysis.

use serde::{Deserialize, Serialize};

/// Factual classification assigned to a claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VerdictStatus {
    True,
    False,
    Partial,
    Misleading,
    Unverified,
}

impl VerdictStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::True => "TRUE",
            Self::False => "FALSE",
            Self::Partial => "PARTIAL",
            Self::Misleading => "MISLEADING",
            Self::Unverified => "UNVERIFIED",
        }
    }
}

impl std::fmt::Display for VerdictStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A cited source backing a verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub title: String,
    pub url: String,
}

/// A medical term with its plain-language explanation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermDefinition {
    pub term: String,
    pub explanation: String,
}

/// The result of one claim analysis.
///
/// `claim` always equals the input text that produced the verdict. A verdict
/// is immutable once created, except that a clinician comment may be attached
/// to it at most once.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
    pub claim: String,
    /// Natural-language explanation; may embed `[Term: Definition]` markers
    /// (see [`crate::markup`]).
    pub summary: String,
    /// 0–100.
    pub confidence_score: f32,
    pub status: VerdictStatus,
    /// Supporting studies found during analysis.
    pub evidence_count: u32,
    pub sources: Vec<Source>,
    pub definitions: Vec<TermDefinition>,
    pub related_claims: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doctor_comment: Option<String>,
}
