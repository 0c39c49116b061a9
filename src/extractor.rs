use image::{ImageFormat, RgbaImage};
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{Options, Tree};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::ExtractionError;
use crate::models::{ExtractedContent, FormatTag, ImageMime, ImagePayload, SourceFile};
use crate::scratch::ScratchDir;

/// Longest side of a rasterized SVG.
const SVG_MAX_DIMENSION: u32 = 1024;

/// Longest side of a rendered PDF page or slide.
#[cfg_attr(not(feature = "pdfium"), allow(dead_code))]
const PAGE_MAX_DIMENSION: u32 = 1600;

/// Turns a file into text and raster images. Every image it hands back is
/// already a raster format; pages come back in reading order.
pub trait ContentExtractor: Send + Sync {
    fn extract(
        &self,
        file: &SourceFile,
        scratch: &ScratchDir,
    ) -> Result<ExtractedContent, ExtractionError>;
}

/// Default extractor: plain reads for text, `extractous` for office formats
/// and PDFs, `resvg` for SVG, pdfium for page images when compiled in.
#[derive(Debug, Default, Clone)]
pub struct DocumentExtractor;

impl DocumentExtractor {
    pub fn new() -> Self {
        Self
    }

    fn read_text(path: &Path) -> Result<String, ExtractionError> {
        let bytes = fs::read(path).map_err(|source| ExtractionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        String::from_utf8(bytes).map_err(|_| ExtractionError::InvalidUtf8(path.to_path_buf()))
    }

    fn convert_to_markdown(path: &Path) -> Result<String, ExtractionError> {
        let extractor = extractous::Extractor::new();
        let (text, _metadata) = extractor
            .extract_file_to_string(&path.to_string_lossy())
            .map_err(|e| ExtractionError::Conversion(e.to_string()))?;
        Ok(text)
    }

    /// MIME comes from the file's bytes, never its name.
    fn raster_image(path: &Path, scratch: &ScratchDir) -> Result<ImagePayload, ExtractionError> {
        let kind = infer::get_from_path(path).map_err(|source| ExtractionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let detected = kind.map(|k| k.mime_type()).unwrap_or("unknown");

        // Providers take no BMP; re-encode it.
        if detected == "image/bmp" {
            let png_path = scratch.join("converted.png");
            image::open(path)
                .and_then(|img| img.save_with_format(&png_path, ImageFormat::Png))
                .map_err(|e| ExtractionError::Rasterize {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                })?;
            return Ok(ImagePayload {
                index: 0,
                mime: ImageMime::Png,
                path: png_path,
            });
        }

        let mime = ImageMime::from_mime(detected)
            .ok_or_else(|| ExtractionError::UnsupportedImage(detected.to_string()))?;
        Ok(ImagePayload {
            index: 0,
            mime,
            path: path.to_path_buf(),
        })
    }

    fn rasterize_svg(path: &Path, scratch: &ScratchDir) -> Result<ImagePayload, ExtractionError> {
        let rasterize_err = |reason: String| ExtractionError::Rasterize {
            path: path.to_path_buf(),
            reason,
        };

        let svg_data = fs::read(path).map_err(|source| ExtractionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let tree = Tree::from_data(&svg_data, &Options::default())
            .map_err(|e| rasterize_err(format!("Failed to parse SVG: {}", e)))?;

        let svg_size = tree.size();
        let (orig_width, orig_height) = (svg_size.width(), svg_size.height());
        let scale = SVG_MAX_DIMENSION as f32 / orig_width.max(orig_height);
        let width = ((orig_width * scale).round() as u32).max(1);
        let height = ((orig_height * scale).round() as u32).max(1);

        let mut pixmap = Pixmap::new(width, height)
            .ok_or_else(|| rasterize_err("Failed to create pixmap".to_string()))?;
        resvg::render(&tree, Transform::from_scale(scale, scale), &mut pixmap.as_mut());

        let img = RgbaImage::from_raw(width, height, pixmap.data().to_vec())
            .ok_or_else(|| rasterize_err("Failed to create image from pixmap".to_string()))?;
        let png_path = scratch.join("rendered.png");
        img.save_with_format(&png_path, ImageFormat::Png)
            .map_err(|e| rasterize_err(format!("Failed to encode PNG: {}", e)))?;

        tracing::debug!("Rasterized {} to {}", path.display(), png_path.display());
        Ok(ImagePayload {
            index: 0,
            mime: ImageMime::Png,
            path: png_path,
        })
    }

    #[cfg(feature = "pdfium")]
    fn render_pages(pdf: &Path, scratch: &ScratchDir) -> Result<Vec<ImagePayload>, ExtractionError> {
        use pdfium_render::prelude::*;

        let rasterize_err = |reason: String| ExtractionError::Rasterize {
            path: pdf.to_path_buf(),
            reason,
        };

        let pdfium = match Pdfium::bind_to_system_library() {
            Ok(bindings) => Pdfium::new(bindings),
            Err(e) => {
                tracing::warn!("pdfium not available ({}), using text only", e);
                return Ok(Vec::new());
            }
        };

        let document = pdfium
            .load_pdf_from_file(pdf, None)
            .map_err(|e| rasterize_err(format!("Failed to load PDF: {}", e)))?;
        let config = PdfRenderConfig::new()
            .set_target_width(PAGE_MAX_DIMENSION as i32)
            .set_maximum_height(PAGE_MAX_DIMENSION as i32);

        let mut pages = Vec::new();
        for (index, page) in document.pages().iter().enumerate() {
            let bitmap = page
                .render_with_config(&config)
                .map_err(|e| rasterize_err(format!("Failed to render page {}: {}", index + 1, e)))?;
            let page_path = scratch.join(&format!("page_{}.png", index + 1));
            bitmap
                .as_image()
                .save_with_format(&page_path, image::ImageFormat::Png)
                .map_err(|e| rasterize_err(format!("Failed to encode page {}: {}", index + 1, e)))?;
            pages.push(ImagePayload {
                index,
                mime: ImageMime::Png,
                path: page_path,
            });
        }
        Ok(pages)
    }

    #[cfg(not(feature = "pdfium"))]
    fn render_pages(pdf: &Path, _scratch: &ScratchDir) -> Result<Vec<ImagePayload>, ExtractionError> {
        tracing::warn!(
            "Built without pdfium; {} is processed as text only",
            pdf.display()
        );
        Ok(Vec::new())
    }

    /// Slide decks are printed to PDF by a headless LibreOffice, then
    /// rendered page by page.
    fn render_slides(path: &Path, scratch: &ScratchDir) -> Result<Vec<ImagePayload>, ExtractionError> {
        let output = Command::new("soffice")
            .arg("--headless")
            .arg("--convert-to")
            .arg("pdf")
            .arg(path)
            .arg("--outdir")
            .arg(scratch.path())
            .output();

        let output = match output {
            Ok(output) => output,
            Err(e) => {
                tracing::warn!("soffice unavailable ({}), slides of {} not rendered", e, path.display());
                return Ok(Vec::new());
            }
        };

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "slides".to_string());
        let pdf_path: PathBuf = scratch.join(&format!("{}.pdf", stem));
        if !output.status.success() || !pdf_path.exists() {
            return Err(ExtractionError::Rasterize {
                path: path.to_path_buf(),
                reason: format!(
                    "soffice failed: {}",
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        Self::render_pages(&pdf_path, scratch)
    }
}

impl ContentExtractor for DocumentExtractor {
    fn extract(
        &self,
        file: &SourceFile,
        scratch: &ScratchDir,
    ) -> Result<ExtractedContent, ExtractionError> {
        let path = file.path.as_path();
        tracing::debug!("Extracting {} as {}", path.display(), file.format);

        let content = match file.format {
            FormatTag::Text | FormatTag::Markdown => {
                ExtractedContent::text_only(Self::read_text(path)?)
            }
            FormatTag::Image => ExtractedContent {
                text: None,
                images: vec![Self::raster_image(path, scratch)?],
            },
            FormatTag::Svg => ExtractedContent {
                text: None,
                images: vec![Self::rasterize_svg(path, scratch)?],
            },
            FormatTag::Pdf => ExtractedContent {
                text: Some(Self::convert_to_markdown(path)?),
                images: Self::render_pages(path, scratch)?,
            },
            FormatTag::Pptx => ExtractedContent {
                text: Some(Self::convert_to_markdown(path)?),
                images: Self::render_slides(path, scratch)?,
            },
            FormatTag::Docx | FormatTag::Other => {
                ExtractedContent::text_only(Self::convert_to_markdown(path)?)
            }
        };

        if let Some(text) = content.usable_text() {
            if let Err(e) = scratch.retain_text(text) {
                tracing::warn!("Could not write extracted text: {}", e);
            }
        }

        content.ensure_not_empty(path)
    }
}

#[cfg(test)]
mod tests;
