use crate::aggregator;
use crate::error::ProviderError;
use crate::models::{ExtractedContent, Fragment, RequestRole, SuggestionRequest, SuggestionSet};
use crate::naming::ConventionRules;
use crate::providers::SuggestionProvider;

/// Shape of a file's extracted content, chosen once per file.
#[derive(Debug, Clone)]
pub enum Strategy {
    TextOnly(String),
    SingleImage(crate::models::ImagePayload),
    Composite(ExtractedContent),
}

impl Strategy {
    /// Callers only pass content that holds at least one fragment.
    pub fn select(content: ExtractedContent) -> Strategy {
        match (content.usable_text().is_some(), content.images.len()) {
            (_, 0) => Strategy::TextOnly(content.text.unwrap_or_default()),
            (false, 1) => {
                let mut images = content.images;
                Strategy::SingleImage(images.remove(0))
            }
            _ => Strategy::Composite(content),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::TextOnly(_) => "text-only",
            Strategy::SingleImage(_) => "single-image",
            Strategy::Composite(_) => "composite",
        }
    }

    pub async fn suggest(
        &self,
        rules: &ConventionRules,
        provider: &dyn SuggestionProvider,
    ) -> Result<SuggestionSet, ProviderError> {
        match self {
            Strategy::TextOnly(text) => {
                provider
                    .suggest(&SuggestionRequest {
                        rules,
                        fragment: Fragment::Text(text.clone()),
                        role: RequestRole::Content,
                    })
                    .await
            }
            Strategy::SingleImage(image) => {
                provider
                    .suggest(&SuggestionRequest {
                        rules,
                        fragment: Fragment::Image(image.clone()),
                        role: RequestRole::Page,
                    })
                    .await
            }
            Strategy::Composite(content) => aggregator::aggregate(content, rules, provider).await,
        }
    }
}
