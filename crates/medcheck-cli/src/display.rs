//! Terminal card rendering for verdicts, trending topics, and the feed.
//!
//! Verdicts render as a vertical card grouped by section, with inline
//! `[Term: Definition]` markers collapsed to their bare terms and the
//! definitions surfaced in a Terminology section.

use medcheck_core::{CommunityPost, TermDefinition, TrendingTopic, Verdict, markup};

const MAX_LIST_ITEMS: usize = 10;
const MAX_TITLE_LEN: usize = 40;

// ── Verdict card ──

/// Print a verdict as a vertical card grouped by section.
pub fn print_verdict_card(verdict: &Verdict) {
    println!("=== {} ===", verdict.claim);
    println!();

    println!("Verdict");
    println!("  {:<26} {}", "status", verdict.status);
    println!(
        "  {:<26} {:.0}% ({})",
        "confidence",
        verdict.confidence_score,
        confidence_band(verdict.confidence_score)
    );
    println!("  {:<26} {}", "supporting studies", verdict.evidence_count);
    println!();

    println!("Analysis");
    println!("  {}", markup::plain_text(&verdict.summary));
    println!();

    if let Some(comment) = &verdict.doctor_comment {
        println!("Professional Clinical Viewpoint");
        println!("  \"{comment}\"");
        println!();
    }

    let terms = terminology(verdict);
    if !terms.is_empty() {
        println!("Terminology");
        for def in &terms {
            println!("  {:<26} {}", def.term, def.explanation);
        }
        println!();
    }

    if !verdict.related_claims.is_empty() {
        println!("Related Discoveries");
        println!("  {}", verdict.related_claims.join(", "));
        println!();
    }

    if !verdict.sources.is_empty() {
        println!("Grounding Sources");
        let show = verdict.sources.len().min(MAX_LIST_ITEMS);
        for source in &verdict.sources[..show] {
            println!(
                "  {:<42} {}",
                truncate(&source.title, MAX_TITLE_LEN),
                source.url
            );
        }
        if verdict.sources.len() > MAX_LIST_ITEMS {
            println!("  ... and {} more", verdict.sources.len() - MAX_LIST_ITEMS);
        }
        println!();
    }
}

/// Verdict definitions plus any marker-only terms from the summary.
fn terminology(verdict: &Verdict) -> Vec<TermDefinition> {
    let mut terms = verdict.definitions.clone();
    for def in markup::inline_definitions(&verdict.summary) {
        if !terms.iter().any(|t| t.term == def.term) {
            terms.push(def);
        }
    }
    terms
}

/// Bucket a 0–100 confidence score the way the verdict gauge colours it.
fn confidence_band(score: f32) -> &'static str {
    if score > 70.0 {
        "high"
    } else if score > 40.0 {
        "moderate"
    } else {
        "low"
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    } else {
        s.to_string()
    }
}

// ── Trending ──

pub fn print_trending(topics: &[TrendingTopic]) {
    println!("Trending Now");
    for topic in topics {
        println!(
            "  #{:<28} {:>7.1}K analyses this week  [{}]",
            topic.topic,
            topic.count as f64 / 1000.0,
            topic.kind.as_str()
        );
    }
}

// ── Community feed ──

pub fn print_feed(posts: &[CommunityPost]) {
    for post in posts {
        let badge = if post.is_professional {
            " [Professional]"
        } else {
            ""
        };
        println!("=== {}{} ===", post.author_name, badge);
        println!("  {}", post.content);
        println!("  {:<26} {}", "likes", post.likes);
        println!(
            "  {:<26} {}",
            "posted",
            post.timestamp.format("%Y-%m-%d %H:%M UTC")
        );
        if !post.comments.is_empty() {
            println!("  Comments ({}):", post.comments.len());
            for comment in &post.comments {
                println!("    {}: {}", comment.author_name, comment.content);
            }
        }
        println!();
    }
}
