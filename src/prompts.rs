use crate::config::Config;
use crate::models::{Fragment, RequestRole, SuggestionRequest};
use crate::naming::ConventionRules;

/// Roughly 65k tokens of text.
pub const MAX_CONTENT_CHARS: usize = 195_000;

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a file naming suggestion assistant.";

pub const DEFAULT_USER_PROMPT: &str = "You are an expert file naming assistant. Your task is to \
suggest 3 file names for the provided file content, following the {naming_convention} naming \
convention. When providing suggestions consider the who, what, when, where, why, and how of the \
file content and its purpose or intended use. A good file name is concise, descriptive and easy \
to understand. Take note of indicators such as dates, times, locations, chat transcripts, source \
code bundles, file lists or file trees. Content made of multiple files inside markdown triple \
backticks or XML tags is a codebase prepared for an LLM; identify the project name where \
possible. Avoid assumptions unless other indicators are ambiguous or missing.\n\nCONTENT:\n{content}";

pub const DEFAULT_IMAGE_PROMPT: &str = "You are an expert file naming assistant. Suggest 3 file \
names for the provided image following the {naming_convention} naming convention.\n\n\
Examine the primary subjects, the setting, any activity, visible text, logos or signs, the kind \
of image (screenshot, diagram, chart, photo, scanned document) and any dates or places shown. \
Prefer specific identifiers such as brand, application, product or location names when they are \
clearly visible; otherwise describe the visual content. For screenshots include the application \
or interface, for diagrams and charts the subject matter, for documents the document type and \
source. Avoid generic terms when specific details are discernible.";

const FINAL_PROMPT: &str = "You have previously suggested the following file names for the \
pages, slides or images and the text of a single file:\n{content}\n\nReconcile them into 3 final \
file name suggestions, following the {naming_convention} naming convention, that best represent \
the entire file.";

/// Prompt templates, with config overrides applied. `{naming_convention}`
/// and `{content}` are substituted.
#[derive(Debug, Clone)]
pub struct Prompts {
    pub system: String,
    pub user: String,
    pub image: String,
}

impl Default for Prompts {
    fn default() -> Self {
        Self {
            system: DEFAULT_SYSTEM_PROMPT.to_string(),
            user: DEFAULT_USER_PROMPT.to_string(),
            image: DEFAULT_IMAGE_PROMPT.to_string(),
        }
    }
}

fn or_default(value: &str, default: &str) -> String {
    if value.trim().is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}

impl Prompts {
    pub fn from_config(config: &Config) -> Self {
        Self {
            system: or_default(&config.system_prompt, DEFAULT_SYSTEM_PROMPT),
            user: or_default(&config.user_prompt, DEFAULT_USER_PROMPT),
            image: or_default(&config.image_prompt, DEFAULT_IMAGE_PROMPT),
        }
    }

    /// System prompt plus the convention contract every answer must meet.
    pub fn preamble(&self, rules: &ConventionRules) -> String {
        format!(
            "{}\n\nEvery suggestion must follow the {} naming convention (for example \"{}\"), \
             contain between {} and {} words, have no file extension, and fit this JSON schema:\n{}",
            self.system,
            rules.convention,
            rules.convention.example(),
            rules.min_words,
            rules.max_words,
            rules.schema()
        )
    }

    /// Instruction text for a request. Image requests carry the picture
    /// separately; this is only the words around it.
    pub fn render(&self, request: &SuggestionRequest<'_>) -> String {
        let convention = request.rules.convention.as_str();
        match (&request.fragment, request.role) {
            (Fragment::Image(_), _) => self.image.replace("{naming_convention}", convention),
            (Fragment::Text(text), RequestRole::Final) => FINAL_PROMPT
                .replace("{naming_convention}", convention)
                .replace("{content}", text),
            (Fragment::Text(text), _) => self
                .user
                .replace("{naming_convention}", convention)
                .replace("{content}", &truncate(text, MAX_CONTENT_CHARS)),
        }
    }
}

pub fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => text[..end].to_string(),
        None => text.to_string(),
    }
}
