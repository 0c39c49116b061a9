use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("File is not valid UTF-8 text: {0}")]
    InvalidUtf8(PathBuf),
    #[error("Document conversion failed: {0}")]
    Conversion(String),
    #[error("Could not rasterize {path}: {reason}")]
    Rasterize { path: PathBuf, reason: String },
    #[error("Unsupported image type: {0}")]
    UnsupportedImage(String),
    #[error("No text or images could be extracted from {0}")]
    Empty(PathBuf),
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Provider request failed: {0}")]
    Transport(String),
    #[error("Provider returned {0} suggestions, expected exactly 3")]
    WrongCount(usize),
    #[error("Could not read image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("No usable suggestions from any page or content request")]
    NoCandidates,
}

#[derive(Debug, thiserror::Error)]
#[error("No candidate satisfies the {convention} convention (rejected: {})", rejected.join(", "))]
pub struct ValidationError {
    pub convention: String,
    pub rejected: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum RenameError {
    #[error("Target already exists: {0}")]
    TargetExists(PathBuf),
    #[error("Source file has no parent directory: {0}")]
    NoParent(PathBuf),
    #[error("Failed to rename {from} to {to}: {source}")]
    Io {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Everything that can go wrong for a single file. Caught at the per-file
/// boundary and reported as a skip; never aborts the batch.
#[derive(Debug, thiserror::Error)]
pub enum FileError {
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Rename(#[from] RenameError),
    #[error("Failed to list directory {path}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to create temporary directory: {0}")]
    Scratch(#[source] std::io::Error),
}

impl FileError {
    pub fn kind(&self) -> &'static str {
        match self {
            FileError::Extraction(_) | FileError::Scratch(_) => "extraction",
            FileError::Provider(_) => "provider",
            FileError::Validation(_) => "validation",
            FileError::Rename(_) | FileError::Directory { .. } => "rename",
        }
    }
}

/// Failures that stop the batch before it starts.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),
    #[error("Failed to read configuration {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed configuration {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Unknown naming convention: {0}")]
    UnknownConvention(String),
    #[error("Invalid word bounds: min_filename_words={min}, max_filename_words={max}")]
    WordBounds { min: usize, max: usize },
    #[error("Unsupported provider: {0}")]
    UnsupportedProvider(String),
    #[error("OPENAI_API_KEY not set and openai_api_key is empty")]
    MissingApiKey,
    #[error("Failed to build provider client: {0}")]
    Client(String),
    #[error("Could not determine home directory")]
    NoHome,
    #[error("Invalid naming pattern: {0}")]
    Pattern(#[from] regex::Error),
}
