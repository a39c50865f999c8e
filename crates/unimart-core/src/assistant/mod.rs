//! Listing description assistant.
//!
//! A single stateless request/response helper: given a listing title
//! and category, ask an external generator for a short promotional
//! description. Shares the advisor's fail-open contract: any failure
//! yields a fixed fallback sentence, never an error. No retries, no
//! caching.

use tracing::warn;

use unimart_types::error::GenAiError;

/// Returned when the generator call fails outright.
pub const FALLBACK_DESCRIPTION: &str = "Great item for sale! Contact me for details.";

/// Returned when the generator answers with an empty body.
pub const EMPTY_DESCRIPTION: &str =
    "This item is in great condition and ready for a new owner!";

/// Trait for description-generator backends.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
/// Implementations live in unimart-infra (e.g., `GeminiClient`).
pub trait DescriptionGenerator: Send + Sync {
    fn generate(
        &self,
        title: &str,
        category: &str,
    ) -> impl std::future::Future<Output = Result<String, GenAiError>> + Send;
}

/// Drafts listing copy with a [`DescriptionGenerator`], failing open to
/// fixed fallback text.
pub struct ListingAssistant<G> {
    generator: G,
}

impl<G: DescriptionGenerator> ListingAssistant<G> {
    pub fn new(generator: G) -> Self {
        ListingAssistant { generator }
    }

    /// Draft a promotional description for a listing.
    ///
    /// Never fails: a generator error or an empty answer degrades to
    /// fixed fallback copy.
    pub async fn describe(&self, title: &str, category: &str) -> String {
        match self.generator.generate(title, category).await {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => EMPTY_DESCRIPTION.to_string(),
            Err(err) => {
                warn!(error = %err, title, "Description generator failed, using fallback");
                FALLBACK_DESCRIPTION.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedGenerator(Result<String, ()>);

    impl DescriptionGenerator for FixedGenerator {
        async fn generate(&self, _title: &str, _category: &str) -> Result<String, GenAiError> {
            match &self.0 {
                Ok(text) => Ok(text.clone()),
                Err(()) => Err(GenAiError::Http("timed out".to_string())),
            }
        }
    }

    #[tokio::test]
    async fn test_describe_passes_through_generated_text() {
        let assistant =
            ListingAssistant::new(FixedGenerator(Ok("Sleek laptop, barely used! 🔥".to_string())));
        let description = assistant.describe("HP Pavilion", "Electronics").await;
        assert_eq!(description, "Sleek laptop, barely used! 🔥");
    }

    #[tokio::test]
    async fn test_describe_falls_back_on_error() {
        let assistant = ListingAssistant::new(FixedGenerator(Err(())));
        let description = assistant.describe("HP Pavilion", "Electronics").await;
        assert_eq!(description, FALLBACK_DESCRIPTION);
    }

    #[tokio::test]
    async fn test_describe_falls_back_on_empty_answer() {
        let assistant = ListingAssistant::new(FixedGenerator(Ok("  \n".to_string())));
        let description = assistant.describe("HP Pavilion", "Electronics").await;
        assert_eq!(description, EMPTY_DESCRIPTION);
    }
}
