use std::ffi::{OsStr, OsString};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ExtractionError, ProviderError};
use crate::naming::ConventionRules;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatTag {
    Text,
    Markdown,
    Pdf,
    Docx,
    Pptx,
    Image,
    Svg,
    Other,
}

impl FormatTag {
    /// Values accepted by `--format`.
    pub const FORCEABLE: [&'static str; 7] =
        ["text", "markdown", "pdf", "docx", "pptx", "image", "svg"];

    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "txt" => Some(FormatTag::Text),
            "md" | "markdown" => Some(FormatTag::Markdown),
            "pdf" => Some(FormatTag::Pdf),
            "docx" => Some(FormatTag::Docx),
            "pptx" => Some(FormatTag::Pptx),
            "svg" => Some(FormatTag::Svg),
            "png" | "jpg" | "jpeg" | "gif" | "webp" | "bmp" => Some(FormatTag::Image),
            _ => None,
        }
    }

    pub fn from_forced(tag: &str) -> Option<Self> {
        match tag {
            "text" => Some(FormatTag::Text),
            "markdown" => Some(FormatTag::Markdown),
            "pdf" => Some(FormatTag::Pdf),
            "docx" => Some(FormatTag::Docx),
            "pptx" => Some(FormatTag::Pptx),
            "image" => Some(FormatTag::Image),
            "svg" => Some(FormatTag::Svg),
            _ => None,
        }
    }

    /// Extension first, then magic bytes for files named without one.
    pub fn detect(path: &Path) -> Self {
        if let Some(tag) = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
        {
            return tag;
        }

        match infer::get_from_path(path) {
            Ok(Some(kind)) => match kind.mime_type() {
                "application/pdf" => FormatTag::Pdf,
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
                    FormatTag::Docx
                }
                "application/vnd.openxmlformats-officedocument.presentationml.presentation" => {
                    FormatTag::Pptx
                }
                mime if mime == "image/bmp" || ImageMime::from_mime(mime).is_some() => {
                    FormatTag::Image
                }
                _ => FormatTag::Other,
            },
            _ => FormatTag::Other,
        }
    }
}

impl fmt::Display for FormatTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FormatTag::Text => "text",
            FormatTag::Markdown => "markdown",
            FormatTag::Pdf => "pdf",
            FormatTag::Docx => "docx",
            FormatTag::Pptx => "pptx",
            FormatTag::Image => "image",
            FormatTag::Svg => "svg",
            FormatTag::Other => "other",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub format: FormatTag,
    pub size: u64,
}

impl SourceFile {
    pub fn new(path: PathBuf, forced: Option<FormatTag>) -> std::io::Result<Self> {
        let metadata = fs::metadata(&path)?;
        let format = forced.unwrap_or_else(|| FormatTag::detect(&path));
        Ok(Self {
            path,
            format,
            size: metadata.len(),
        })
    }

    /// Extension of the file as it is on disk, without the dot.
    pub fn extension(&self) -> Option<&OsStr> {
        self.path.extension()
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}

/// Raster image types a provider may receive. No vector variant: an SVG has
/// to be rasterized before it can become a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageMime {
    Png,
    Jpeg,
    Gif,
    Webp,
}

impl ImageMime {
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            "image/png" => Some(ImageMime::Png),
            "image/jpeg" => Some(ImageMime::Jpeg),
            "image/gif" => Some(ImageMime::Gif),
            "image/webp" => Some(ImageMime::Webp),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ImageMime::Png => "image/png",
            ImageMime::Jpeg => "image/jpeg",
            ImageMime::Gif => "image/gif",
            ImageMime::Webp => "image/webp",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ImagePayload {
    pub index: usize,
    pub mime: ImageMime,
    pub path: PathBuf,
}

impl ImagePayload {
    pub fn read(&self) -> Result<Vec<u8>, ProviderError> {
        fs::read(&self.path).map_err(|source| ProviderError::Image {
            path: self.path.clone(),
            source,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct ExtractedContent {
    pub text: Option<String>,
    /// Pages or slides in reading order.
    pub images: Vec<ImagePayload>,
}

impl ExtractedContent {
    pub fn text_only(text: String) -> Self {
        Self {
            text: Some(text),
            images: Vec::new(),
        }
    }

    /// Text that is worth sending: present and not just whitespace.
    pub fn usable_text(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.trim().is_empty())
    }

    pub fn fragment_count(&self) -> usize {
        self.images.len() + usize::from(self.usable_text().is_some())
    }

    pub fn ensure_not_empty(self, path: &Path) -> Result<Self, ExtractionError> {
        if self.fragment_count() == 0 {
            return Err(ExtractionError::Empty(path.to_path_buf()));
        }
        Ok(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestRole {
    Page,
    Content,
    Final,
}

impl fmt::Display for RequestRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestRole::Page => f.write_str("page"),
            RequestRole::Content => f.write_str("content"),
            RequestRole::Final => f.write_str("final"),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Fragment {
    Text(String),
    Image(ImagePayload),
}

/// One provider call. Built fresh each time and never reused.
#[derive(Debug, Clone)]
pub struct SuggestionRequest<'a> {
    pub rules: &'a ConventionRules,
    pub fragment: Fragment,
    pub role: RequestRole,
}

/// Exactly three candidates, most preferred first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionSet([String; 3]);

impl SuggestionSet {
    pub fn candidates(&self) -> &[String] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0.into()
    }
}

impl TryFrom<Vec<String>> for SuggestionSet {
    type Error = ProviderError;

    fn try_from(values: Vec<String>) -> Result<Self, Self::Error> {
        let count = values.len();
        let values: [String; 3] = values
            .try_into()
            .map_err(|_| ProviderError::WrongCount(count))?;
        Ok(SuggestionSet(values))
    }
}

/// How the resolver arrived at a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Index into the validated candidate list.
    Candidate(usize),
    /// First candidate plus `_n`.
    Suffix(usize),
}

#[derive(Debug, Clone)]
pub struct RenamePlan {
    pub source: PathBuf,
    /// Extension-inclusive file name in the source's directory.
    pub target_name: OsString,
    pub resolution: Resolution,
}

impl RenamePlan {
    pub fn target_path(&self) -> PathBuf {
        match self.source.parent() {
            Some(parent) => parent.join(&self.target_name),
            None => PathBuf::from(&self.target_name),
        }
    }
}
