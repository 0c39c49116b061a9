use regex::Regex;
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Longest candidate accepted under any convention.
pub const MAX_NAME_LENGTH: usize = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamingConvention {
    SnakeCase,
    CamelCase,
    KebabCase,
    PascalCase,
    DotNotation,
    NaturalLanguage,
}

/// How a convention separates words.
enum WordBoundary {
    Delimiter(char),
    CaseTransition,
}

impl NamingConvention {
    pub const ALL: [NamingConvention; 6] = [
        NamingConvention::SnakeCase,
        NamingConvention::CamelCase,
        NamingConvention::KebabCase,
        NamingConvention::PascalCase,
        NamingConvention::DotNotation,
        NamingConvention::NaturalLanguage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NamingConvention::SnakeCase => "snake_case",
            NamingConvention::CamelCase => "camelCase",
            NamingConvention::KebabCase => "kebab-case",
            NamingConvention::PascalCase => "PascalCase",
            NamingConvention::DotNotation => "dot.notation",
            NamingConvention::NaturalLanguage => "natural language",
        }
    }

    pub fn example(&self) -> &'static str {
        match self {
            NamingConvention::SnakeCase => "quarterly_sales_report_march_2024",
            NamingConvention::CamelCase => "quarterlySalesReportMarch2024",
            NamingConvention::KebabCase => "quarterly-sales-report-march-2024",
            NamingConvention::PascalCase => "QuarterlySalesReportMarch2024",
            NamingConvention::DotNotation => "quarterly.sales.report.march.2024",
            NamingConvention::NaturalLanguage => "Quarterly Sales Report March 2024",
        }
    }

    /// First word and repeated-word fragments of the grammar. The full
    /// pattern is `^{head}({tail})*$` with the repetition bounded in the
    /// schema handed to providers.
    fn grammar(&self) -> (&'static str, &'static str) {
        match self {
            NamingConvention::SnakeCase => ("[a-z0-9]+", "_[a-z0-9]+"),
            NamingConvention::CamelCase => ("[a-z0-9]+", "[A-Z][a-z0-9]*"),
            NamingConvention::KebabCase => ("[a-z0-9]+", "-[a-z0-9]+"),
            NamingConvention::PascalCase => ("[A-Z][a-z0-9]*", "[A-Z][a-z0-9]*"),
            NamingConvention::DotNotation => ("[a-z0-9]+", r"\.[a-z0-9]+"),
            NamingConvention::NaturalLanguage => ("[A-Za-z0-9]+", " [A-Za-z0-9]+"),
        }
    }

    fn boundary(&self) -> WordBoundary {
        match self {
            NamingConvention::SnakeCase => WordBoundary::Delimiter('_'),
            NamingConvention::KebabCase => WordBoundary::Delimiter('-'),
            NamingConvention::DotNotation => WordBoundary::Delimiter('.'),
            NamingConvention::NaturalLanguage => WordBoundary::Delimiter(' '),
            NamingConvention::CamelCase | NamingConvention::PascalCase => {
                WordBoundary::CaseTransition
            }
        }
    }

    pub fn pattern(&self) -> String {
        let (head, tail) = self.grammar();
        format!("^{}({})*$", head, tail)
    }

    /// Pattern with the tail repetition capped so the whole name has at most
    /// `max_words` words, e.g. `^[a-z0-9]+(_[a-z0-9]+){0,14}$` for 15.
    pub fn bounded_pattern(&self, max_words: usize) -> String {
        let (head, tail) = self.grammar();
        format!("^{}({}){{0,{}}}$", head, tail, max_words.saturating_sub(1))
    }

    /// Delimiter conventions count delimiter-separated tokens; camelCase and
    /// PascalCase count capitalization-boundary segments.
    pub fn word_count(&self, name: &str) -> usize {
        match self.boundary() {
            WordBoundary::Delimiter(d) => name.split(d).filter(|t| !t.is_empty()).count(),
            WordBoundary::CaseTransition => {
                if name.is_empty() {
                    return 0;
                }
                1 + name
                    .chars()
                    .skip(1)
                    .filter(|c| c.is_ascii_uppercase())
                    .count()
            }
        }
    }
}

impl fmt::Display for NamingConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NamingConvention {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "snake_case" => Ok(NamingConvention::SnakeCase),
            "camelCase" => Ok(NamingConvention::CamelCase),
            "kebab-case" => Ok(NamingConvention::KebabCase),
            "PascalCase" => Ok(NamingConvention::PascalCase),
            "dot.notation" => Ok(NamingConvention::DotNotation),
            "natural language" | "natural-language" => Ok(NamingConvention::NaturalLanguage),
            other => Err(ConfigError::UnknownConvention(other.to_string())),
        }
    }
}

/// A convention together with its compiled pattern and the configured word
/// bounds. Pattern and bounds are always checked together.
#[derive(Debug, Clone)]
pub struct ConventionRules {
    pub convention: NamingConvention,
    pattern: Regex,
    pub min_words: usize,
    pub max_words: usize,
}

impl ConventionRules {
    pub fn new(
        convention: NamingConvention,
        min_words: usize,
        max_words: usize,
    ) -> Result<Self, ConfigError> {
        if min_words == 0 || min_words > max_words {
            return Err(ConfigError::WordBounds {
                min: min_words,
                max: max_words,
            });
        }
        let pattern = Regex::new(&convention.pattern())?;
        Ok(Self {
            convention,
            pattern,
            min_words,
            max_words,
        })
    }

    pub fn matches_pattern(&self, name: &str) -> bool {
        self.pattern.is_match(name)
    }

    pub fn accepts(&self, name: &str) -> bool {
        if name.chars().count() > MAX_NAME_LENGTH || !self.matches_pattern(name) {
            return false;
        }
        let words = self.convention.word_count(name);
        words >= self.min_words && words <= self.max_words
    }

    /// JSON-Schema-shaped grammar passed to providers: an object holding
    /// exactly three pattern-constrained strings.
    pub fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "suggestions": {
                    "type": "array",
                    "minItems": 3,
                    "maxItems": 3,
                    "items": {
                        "type": "string",
                        "pattern": self.convention.bounded_pattern(self.max_words),
                        "maxLength": MAX_NAME_LENGTH,
                    }
                }
            },
            "required": ["suggestions"],
            "additionalProperties": false,
        })
    }
}

#[cfg(test)]
mod tests;
