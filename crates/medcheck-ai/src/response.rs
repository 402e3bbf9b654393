//! Provider response envelope and verdict normalisation.

use medcheck_core::{Source, TermDefinition, Verdict, VerdictStatus};
use serde::Deserialize;

use crate::AnalysisError;

/// Fallback title for grounded sources the provider returns untitled.
const UNTITLED_SOURCE: &str = "Medical Source";
/// How much of an unparseable payload to echo back in schema errors.
const SNIPPET_LEN: usize = 200;

#[derive(Debug, Deserialize)]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Deserialize)]
struct GroundingChunk {
    web: Option<WebSource>,
}

#[derive(Debug, Deserialize)]
struct WebSource {
    uri: String,
    title: Option<String>,
}

/// The schema-constrained payload inside the candidate text. Missing fields
/// or wrong shapes fail deserialisation, which callers surface as a schema
/// violation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VerdictPayload {
    status: VerdictStatus,
    summary: String,
    confidence_score: f32,
    evidence_count: u32,
    sources: Vec<Source>,
    definitions: Vec<TermDefinition>,
    related_claims: Vec<String>,
}

impl GenerateContentResponse {
    /// Normalise the raw response into the verdict contract.
    ///
    /// Grounded search citations, when present, replace the payload's own
    /// source list; otherwise the payload list is used unchanged. The
    /// original claim text is attached so downstream consumers never track
    /// it separately.
    pub(crate) fn into_verdict(self, claim_text: &str) -> Result<Verdict, AnalysisError> {
        let candidate = self
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| AnalysisError::Schema("response contained no candidates".into()))?;

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();
        if text.is_empty() {
            return Err(AnalysisError::Schema(
                "candidate contained no text part".into(),
            ));
        }

        let payload: VerdictPayload = serde_json::from_str(&text).map_err(|e| {
            let snippet: String = text.chars().take(SNIPPET_LEN).collect();
            AnalysisError::Schema(format!("{e}; raw: {snippet}"))
        })?;

        let grounded: Vec<Source> = candidate
            .grounding_metadata
            .map(|m| m.grounding_chunks)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|chunk| chunk.web)
            .map(|web| Source {
                title: web.title.unwrap_or_else(|| UNTITLED_SOURCE.to_string()),
                url: web.uri,
            })
            .collect();
        let sources = if grounded.is_empty() {
            payload.sources
        } else {
            grounded
        };

        Ok(Verdict {
            claim: claim_text.to_string(),
            summary: payload.summary,
            confidence_score: payload.confidence_score,
            status: payload.status,
            evidence_count: payload.evidence_count,
            sources,
            definitions: payload.definitions,
            related_claims: payload.related_claims,
            doctor_comment: None,
        })
    }
}
