use super::{ContentExtractor, DocumentExtractor};
use crate::error::ExtractionError;
use crate::models::{FormatTag, ImageMime, SourceFile};
use crate::scratch::{RetentionPolicy, ScratchDir};
use image::{ImageFormat, RgbaImage};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const SQUARE_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="200" height="100">
  <rect width="200" height="100" fill="red"/>
</svg>"#;

fn create_test_file(dir: &TempDir, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn extract(path: PathBuf, forced: Option<FormatTag>, scratch: &ScratchDir) -> Result<crate::models::ExtractedContent, ExtractionError> {
    let file = SourceFile::new(path, forced).unwrap();
    DocumentExtractor::new().extract(&file, scratch)
}

#[test]
fn test_extract_text_file() {
    let temp_dir = TempDir::new().unwrap();
    let scratch = ScratchDir::acquire(RetentionPolicy::Release).unwrap();
    let path = create_test_file(&temp_dir, "notes.txt", b"Hello, world!");

    let content = extract(path, None, &scratch).unwrap();

    assert_eq!(content.text.as_deref(), Some("Hello, world!"));
    assert!(content.images.is_empty());
}

#[test]
fn test_extract_markdown_keeps_utf8() {
    let temp_dir = TempDir::new().unwrap();
    let scratch = ScratchDir::acquire(RetentionPolicy::Release).unwrap();
    let md = "# Café résumé\n\nÜbersicht über 東京";
    let path = create_test_file(&temp_dir, "README.md", md.as_bytes());

    let content = extract(path, None, &scratch).unwrap();

    assert_eq!(content.text.as_deref(), Some(md));
}

#[test]
fn test_invalid_utf8_is_extraction_error() {
    let temp_dir = TempDir::new().unwrap();
    let scratch = ScratchDir::acquire(RetentionPolicy::Release).unwrap();
    let path = create_test_file(&temp_dir, "broken.txt", &[0x66, 0xFF, 0xFE, 0x00]);

    let err = extract(path, None, &scratch).unwrap_err();
    assert!(matches!(err, ExtractionError::InvalidUtf8(_)));
}

#[test]
fn test_blank_text_is_empty() {
    let temp_dir = TempDir::new().unwrap();
    let scratch = ScratchDir::acquire(RetentionPolicy::Release).unwrap();
    let path = create_test_file(&temp_dir, "empty.txt", b"  \n\t");

    let err = extract(path, None, &scratch).unwrap_err();
    assert!(matches!(err, ExtractionError::Empty(_)));
}

#[test]
fn test_png_is_forwarded_as_png() {
    let temp_dir = TempDir::new().unwrap();
    let scratch = ScratchDir::acquire(RetentionPolicy::Release).unwrap();
    let path = temp_dir.path().join("12.png");
    RgbaImage::new(4, 4).save_with_format(&path, ImageFormat::Png).unwrap();

    let content = extract(path.clone(), None, &scratch).unwrap();

    assert!(content.text.is_none());
    assert_eq!(content.images.len(), 1);
    assert_eq!(content.images[0].mime, ImageMime::Png);
    assert_eq!(content.images[0].path, path);
}

#[test]
fn test_jpeg_mime_from_magic_bytes() {
    let temp_dir = TempDir::new().unwrap();
    let scratch = ScratchDir::acquire(RetentionPolicy::Release).unwrap();
    let path = temp_dir.path().join("IMG_0001");
    image::DynamicImage::new_rgb8(4, 4)
        .save_with_format(&path, ImageFormat::Jpeg)
        .unwrap();

    let file = SourceFile::new(path, None).unwrap();
    assert_eq!(file.format, FormatTag::Image);

    let content = DocumentExtractor::new().extract(&file, &scratch).unwrap();
    assert_eq!(content.images[0].mime, ImageMime::Jpeg);
}

#[test]
fn test_svg_is_rasterized_to_png() {
    let temp_dir = TempDir::new().unwrap();
    let scratch = ScratchDir::acquire(RetentionPolicy::Release).unwrap();
    let path = create_test_file(&temp_dir, "logo.svg", SQUARE_SVG.as_bytes());

    let content = extract(path.clone(), None, &scratch).unwrap();

    assert_eq!(content.images.len(), 1);
    let payload = &content.images[0];
    assert_eq!(payload.mime, ImageMime::Png);
    assert_ne!(payload.path, path);
    assert!(payload.path.starts_with(scratch.path()));

    let rendered = image::open(&payload.path).unwrap();
    assert_eq!(rendered.width(), 1024);
    assert_eq!(rendered.height(), 512);
}

#[test]
fn test_svg_forced_as_image_is_refused() {
    let temp_dir = TempDir::new().unwrap();
    let scratch = ScratchDir::acquire(RetentionPolicy::Release).unwrap();
    let path = create_test_file(&temp_dir, "drawing.svg", SQUARE_SVG.as_bytes());

    let err = extract(path, Some(FormatTag::Image), &scratch).unwrap_err();
    assert!(matches!(err, ExtractionError::UnsupportedImage(_)));
}

#[test]
fn test_svg_named_png_is_refused() {
    let temp_dir = TempDir::new().unwrap();
    let scratch = ScratchDir::acquire(RetentionPolicy::Release).unwrap();
    let path = create_test_file(&temp_dir, "logo.png", SQUARE_SVG.as_bytes());

    let file = SourceFile::new(path, None).unwrap();
    assert_eq!(file.format, FormatTag::Image);

    let err = DocumentExtractor::new().extract(&file, &scratch).unwrap_err();
    assert!(matches!(err, ExtractionError::UnsupportedImage(_)));
}

#[test]
fn test_mime_follows_bytes_not_extension() {
    let temp_dir = TempDir::new().unwrap();
    let scratch = ScratchDir::acquire(RetentionPolicy::Release).unwrap();
    let path = temp_dir.path().join("photo.png");
    image::DynamicImage::new_rgb8(4, 4)
        .save_with_format(&path, ImageFormat::Jpeg)
        .unwrap();

    let content = extract(path, None, &scratch).unwrap();

    assert_eq!(content.images[0].mime, ImageMime::Jpeg);
}

#[test]
fn test_retained_scratch_keeps_extracted_text() {
    let temp_dir = TempDir::new().unwrap();
    let scratch = ScratchDir::acquire(RetentionPolicy::Retain).unwrap();
    let path = create_test_file(&temp_dir, "note.md", b"# Meeting notes");

    extract(path, None, &scratch).unwrap();

    let kept = scratch.finish().unwrap();
    assert_eq!(
        fs::read_to_string(kept.join("extracted_content.md")).unwrap(),
        "# Meeting notes"
    );
    fs::remove_dir_all(kept).unwrap();
}

#[test]
fn test_format_detection_by_extension() {
    assert_eq!(FormatTag::from_extension("PDF"), Some(FormatTag::Pdf));
    assert_eq!(FormatTag::from_extension("jpeg"), Some(FormatTag::Image));
    assert_eq!(FormatTag::from_extension("svg"), Some(FormatTag::Svg));
    assert_eq!(FormatTag::from_extension("tar"), None);
    assert_eq!(FormatTag::from_forced("pptx"), Some(FormatTag::Pptx));
    assert_eq!(FormatTag::from_forced("zip"), None);
}
