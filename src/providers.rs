use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use rig::client::CompletionClient;
use rig::completion::message::{ContentFormat, ImageMediaType, Message, UserContent};
use rig::providers::openai;
use rig::OneOrMany;
use std::fmt;

use crate::{
    ai_structs::FilenameSuggestions,
    config::Config,
    error::{ConfigError, ProviderError},
    models::{Fragment, ImageMime, SuggestionRequest, SuggestionSet},
    naming::NamingConvention,
    prompts::Prompts,
};

/// Anything that can turn one content fragment into three candidate names.
/// Timeouts, retries and transport concerns belong to the implementation.
#[async_trait]
pub trait SuggestionProvider: Send + Sync {
    async fn suggest(
        &self,
        request: &SuggestionRequest<'_>,
    ) -> Result<SuggestionSet, ProviderError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    OpenAI,
    Mock,
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::OpenAI => write!(f, "OpenAI"),
            Provider::Mock => write!(f, "Mock"),
        }
    }
}

impl Provider {
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        match config.default_provider.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Provider::OpenAI),
            "mock" => Ok(Provider::Mock),
            other => Err(ConfigError::UnsupportedProvider(other.to_string())),
        }
    }
}

/// Build the provider named in the configuration. Fails before any file is
/// touched when the provider is unknown or has no credentials.
pub fn build_provider(config: &Config) -> Result<Box<dyn SuggestionProvider>, ConfigError> {
    match Provider::from_config(config)? {
        Provider::OpenAI => Ok(Box::new(LLMProvider::from_config(config)?)),
        Provider::Mock => Ok(Box::new(MockProvider)),
    }
}

/// OpenAI-compatible chat model driven through rig's structured extractor.
pub struct LLMProvider {
    client: openai::Client,
    model_name: String,
    prompts: Prompts,
}

impl LLMProvider {
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let api_key = config.openai_api_key().ok_or(ConfigError::MissingApiKey)?;
        let client = openai::Client::builder(&api_key)
            .base_url(&config.openai_base_url)
            .build()
            .map_err(|e| ConfigError::Client(e.to_string()))?;

        Ok(Self {
            client,
            model_name: config.llm_model.clone(),
            prompts: Prompts::from_config(config),
        })
    }

    fn media_type(mime: ImageMime) -> ImageMediaType {
        match mime {
            ImageMime::Png => ImageMediaType::PNG,
            ImageMime::Jpeg => ImageMediaType::JPEG,
            ImageMime::Gif => ImageMediaType::GIF,
            ImageMime::Webp => ImageMediaType::WEBP,
        }
    }

    fn build_message(&self, request: &SuggestionRequest<'_>) -> Result<Message, ProviderError> {
        let instruction = self.prompts.render(request);
        tracing::debug!(
            role = %request.role,
            convention = %request.rules.convention,
            "LLM request prompt:\n{}",
            instruction
        );

        match &request.fragment {
            Fragment::Text(_) => Ok(Message::user(instruction)),
            Fragment::Image(payload) => {
                let bytes = payload.read()?;
                tracing::debug!(
                    "LLM request image: {} ({}, {} bytes)",
                    payload.path.display(),
                    payload.mime.as_str(),
                    bytes.len()
                );
                let parts = vec![
                    UserContent::text(instruction),
                    UserContent::image(
                        STANDARD.encode(&bytes),
                        Some(ContentFormat::Base64),
                        Some(Self::media_type(payload.mime)),
                        None,
                    ),
                ];
                let content = OneOrMany::many(parts)
                    .map_err(|e| ProviderError::Transport(e.to_string()))?;
                Ok(Message::User { content })
            }
        }
    }
}

#[async_trait]
impl SuggestionProvider for LLMProvider {
    async fn suggest(
        &self,
        request: &SuggestionRequest<'_>,
    ) -> Result<SuggestionSet, ProviderError> {
        let message = self.build_message(request)?;
        let extractor = self
            .client
            .extractor::<FilenameSuggestions>(&self.model_name)
            .preamble(&self.prompts.preamble(request.rules))
            .build();

        let response = extractor
            .extract(message)
            .await
            .map_err(|e| ProviderError::Transport(format!("Extraction failed: {}", e)))?;
        tracing::debug!(role = %request.role, "LLM response: {:?}", response.suggestions);

        SuggestionSet::try_from(response.suggestions)
    }
}

/// Offline provider returning three fixed names in the active convention.
/// Each name is five words long so the default bounds accept it.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockProvider;

const MOCK_WORDS: [&str; 4] = ["mock", "file", "name", "suggestion"];

impl MockProvider {
    pub fn names(convention: NamingConvention) -> [String; 3] {
        ["one", "two", "three"].map(|last| {
            let mut words: Vec<&str> = MOCK_WORDS.to_vec();
            words.push(last);
            join_words(convention, &words)
        })
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn join_words(convention: NamingConvention, words: &[&str]) -> String {
    match convention {
        NamingConvention::SnakeCase => words.join("_"),
        NamingConvention::KebabCase => words.join("-"),
        NamingConvention::DotNotation => words.join("."),
        NamingConvention::NaturalLanguage => words
            .iter()
            .map(|w| capitalize(w))
            .collect::<Vec<_>>()
            .join(" "),
        NamingConvention::PascalCase => words.iter().map(|w| capitalize(w)).collect(),
        NamingConvention::CamelCase => words
            .iter()
            .enumerate()
            .map(|(i, w)| if i == 0 { w.to_string() } else { capitalize(w) })
            .collect(),
    }
}

#[async_trait]
impl SuggestionProvider for MockProvider {
    async fn suggest(
        &self,
        request: &SuggestionRequest<'_>,
    ) -> Result<SuggestionSet, ProviderError> {
        tracing::debug!(role = %request.role, "Mock provider request");
        SuggestionSet::try_from(Self::names(request.rules.convention).to_vec())
    }
}
