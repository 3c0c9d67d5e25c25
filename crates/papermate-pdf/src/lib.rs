use std::path::Path;

use thiserror::Error;

pub mod backend;
pub mod config;
pub mod markdown;
pub mod segment;

pub use backend::SpanBackend;
pub use config::{SegmenterConfig, SegmenterConfigBuilder};
pub use markdown::render_markdown;
pub use segment::{segment, segment_with_config};

#[derive(Error, Debug)]
pub enum PdfError {
    #[error("failed to open PDF: {0}")]
    OpenError(String),
    #[error("failed to extract text: {0}")]
    ExtractionError(String),
    #[error("no sections could be segmented from the document")]
    NoSections,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One observed run of text with its rendered font size, rounded to whole
/// points. Produced by a [`SpanBackend`], consumed by the segmenter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSpan {
    pub text: String,
    pub font_size: u32,
}

impl TextSpan {
    pub fn new(text: impl Into<String>, font_size: u32) -> Self {
        Self {
            text: text.into(),
            font_size,
        }
    }
}

/// A titled, contiguous region of paper text between two detected headings
/// (or start/end of document). Content is never blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    pub content: String,
}

/// Extract titled sections from a PDF file using the given backend for
/// span extraction.
///
/// Pipeline:
/// 1. Extract (text, font size) spans from the PDF via `backend`
/// 2. Segment the span stream on font-size heading candidates
///
/// Fails with [`PdfError::NoSections`] when segmentation produces nothing;
/// callers treat that the same as an unreadable document.
pub fn extract_sections(
    pdf_path: &Path,
    backend: &dyn SpanBackend,
    config: &SegmenterConfig,
) -> Result<Vec<Section>, PdfError> {
    let spans = backend.extract_spans(pdf_path)?;
    tracing::debug!(spans = spans.len(), path = %pdf_path.display(), "extracted spans");

    let sections = segment_with_config(&spans, config);
    if sections.is_empty() {
        return Err(PdfError::NoSections);
    }
    Ok(sections)
}
