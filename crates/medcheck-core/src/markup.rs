//! Inline glossary markup in verdict summaries.
//!
//! Analysis summaries embed term definitions with a bracket syntax:
//! `[Osteoblast: a cell that builds new bone]`. Renderers show the bare term
//! in place and surface the definition out of band.
//!
//! # Rules
//!
//! - A marker is the shortest `[...]` run containing a colon; the term is
//!   everything before the **first** colon, the definition everything after.
//! - A bracketed run without a colon is ordinary text (e.g. `[sic]`).
//! - An unclosed `[` is ordinary text through the end of the summary.
//! - Term and definition are trimmed of surrounding whitespace.

use crate::verdict::TermDefinition;

/// One span of a parsed summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummarySegment {
    Text(String),
    Term { term: String, definition: String },
}

/// Split a summary into text and term spans.
pub fn parse_summary(summary: &str) -> Vec<SummarySegment> {
    let mut segments = Vec::new();
    let mut rest = summary;

    while let Some(open) = rest.find('[') {
        let Some(close) = rest[open..].find(']').map(|i| open + i) else {
            break;
        };
        match rest[open + 1..close].split_once(':') {
            Some((term, definition)) => {
                if open > 0 {
                    segments.push(SummarySegment::Text(rest[..open].to_string()));
                }
                segments.push(SummarySegment::Term {
                    term: term.trim().to_string(),
                    definition: definition.trim().to_string(),
                });
            }
            None => {
                // No colon: keep the bracketed run as text.
                segments.push(SummarySegment::Text(rest[..close + 1].to_string()));
            }
        }
        rest = &rest[close + 1..];
    }

    if !rest.is_empty() {
        segments.push(SummarySegment::Text(rest.to_string()));
    }
    segments
}

/// Render a summary with markers collapsed to their bare terms.
pub fn plain_text(summary: &str) -> String {
    let mut out = String::with_capacity(summary.len());
    for segment in parse_summary(summary) {
        match segment {
            SummarySegment::Text(text) => out.push_str(&text),
            SummarySegment::Term { term, .. } => out.push_str(&term),
        }
    }
    out
}

/// Collect the definitions declared inline in a summary, in order.
pub fn inline_definitions(summary: &str) -> Vec<TermDefinition> {
    parse_summary(summary)
        .into_iter()
        .filter_map(|segment| match segment {
            SummarySegment::Term { term, definition } => Some(TermDefinition {
                term,
                explanation: definition,
            }),
            SummarySegment::Text(_) => None,
        })
        .collect()
}
