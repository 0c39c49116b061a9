use crate::error::ValidationError;
use crate::models::SuggestionSet;
use crate::naming::ConventionRules;

/// Keep, in order, the candidates that satisfy the pattern, the length cap
/// and the word bounds. Nothing surviving is an error; there is no fallback
/// to unvalidated names.
pub fn filter_candidates(
    set: &SuggestionSet,
    rules: &ConventionRules,
) -> Result<Vec<String>, ValidationError> {
    let (accepted, rejected): (Vec<&String>, Vec<&String>) =
        set.candidates().iter().partition(|c| rules.accepts(c));

    for name in &rejected {
        tracing::debug!("Dropped candidate {:?} under {}", name, rules.convention);
    }

    if accepted.is_empty() {
        return Err(ValidationError {
            convention: rules.convention.to_string(),
            rejected: rejected.into_iter().cloned().collect(),
        });
    }

    Ok(accepted.into_iter().cloned().collect())
}
