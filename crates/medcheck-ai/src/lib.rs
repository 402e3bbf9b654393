//! Analysis layer: claim verification through an external LLM provider with
//! schema-constrained output and live-search grounding.

mod error;
mod gemini;
mod image;
mod response;

pub use error::AnalysisError;
pub use gemini::{DEFAULT_MODEL, GeminiClient};
pub use image::ImageAttachment;

use async_trait::async_trait;
use medcheck_core::Verdict;

/// Narrow capability interface over the concrete analysis provider.
///
/// The state store and views depend on this trait only, so the provider can
/// be swapped or mocked without touching them.
#[async_trait]
pub trait ClaimAnalyzer: Send + Sync {
    /// Verify a claim, returning the structured verdict.
    ///
    /// `claim_text` may be empty only when `image` is given; callers enforce
    /// the text-or-image rule before invoking.
    async fn analyze(
        &self,
        claim_text: &str,
        image: Option<&ImageAttachment>,
    ) -> Result<Verdict, AnalysisError>;
}
