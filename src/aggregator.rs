//! Multi-step suggestion for documents that yield several fragments.
//!
//! One `page` request per image in reading order, one `content` request for
//! the text, then a single `final` request over the union of everything the
//! earlier calls proposed. A document with N images costs at most N + 2
//! provider calls.

use crate::error::ProviderError;
use crate::models::{ExtractedContent, Fragment, RequestRole, SuggestionRequest, SuggestionSet};
use crate::naming::ConventionRules;
use crate::providers::SuggestionProvider;

pub async fn aggregate(
    content: &ExtractedContent,
    rules: &ConventionRules,
    provider: &dyn SuggestionProvider,
) -> Result<SuggestionSet, ProviderError> {
    if content.images.is_empty() {
        let text = content.usable_text().unwrap_or_default().to_string();
        return provider
            .suggest(&SuggestionRequest {
                rules,
                fragment: Fragment::Text(text),
                role: RequestRole::Content,
            })
            .await;
    }

    let mut intermediate: Vec<SuggestionSet> = Vec::new();

    for image in &content.images {
        let request = SuggestionRequest {
            rules,
            fragment: Fragment::Image(image.clone()),
            role: RequestRole::Page,
        };
        match provider.suggest(&request).await {
            Ok(set) => intermediate.push(set),
            Err(e) => tracing::warn!("Page {} produced no suggestions: {}", image.index + 1, e),
        }
    }

    if let Some(text) = content.usable_text() {
        let request = SuggestionRequest {
            rules,
            fragment: Fragment::Text(text.to_string()),
            role: RequestRole::Content,
        };
        match provider.suggest(&request).await {
            Ok(set) => intermediate.push(set),
            Err(e) => tracing::warn!("Content request produced no suggestions: {}", e),
        }
    }

    let candidates = union_of(&intermediate);
    if candidates.is_empty() {
        return Err(ProviderError::NoCandidates);
    }

    provider
        .suggest(&SuggestionRequest {
            rules,
            fragment: Fragment::Text(summarize(&candidates)),
            role: RequestRole::Final,
        })
        .await
}

/// Every distinct candidate, first occurrence wins the position.
fn union_of(sets: &[SuggestionSet]) -> Vec<&str> {
    let mut seen = Vec::new();
    for name in sets.iter().flat_map(|s| s.candidates()) {
        if !seen.contains(&name.as_str()) {
            seen.push(name.as_str());
        }
    }
    seen
}

fn summarize(candidates: &[&str]) -> String {
    candidates
        .iter()
        .map(|c| format!("- {}", c))
        .collect::<Vec<_>>()
        .join("\n")
}
