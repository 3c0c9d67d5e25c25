use std::path::Path;

use mupdf::{Document, TextPageFlags};

use papermate_pdf::{PdfError, SpanBackend, TextSpan};

/// MuPDF-based implementation of [`SpanBackend`].
///
/// mupdf is AGPL-licensed, so it lives in this dedicated crate and the
/// rest of the workspace never depends on it directly.
///
/// Within each line, consecutive characters sharing a rounded font size
/// are grouped into one [`TextSpan`], so the segmenter sees one span per
/// styled run.
///
/// By default, text in the bottom 5% of each page (footers) and top 4%
/// (headers) is excluded so running headers and page numbers do not show
/// up as spurious heading candidates.
pub struct MupdfBackend {
    /// Fraction of page height from bottom to exclude as footer (0.0–1.0).
    /// Default 0.05. `None` disables footer exclusion.
    footer_exclusion_ratio: Option<f32>,
    /// Fraction of page height from top to exclude as header (0.0–1.0).
    /// Default 0.04. `None` disables header exclusion.
    header_exclusion_ratio: Option<f32>,
}

impl Default for MupdfBackend {
    fn default() -> Self {
        Self {
            footer_exclusion_ratio: Some(0.05),
            header_exclusion_ratio: Some(0.04),
        }
    }
}

impl MupdfBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the footer exclusion ratio. Pass `0.0` to disable.
    pub fn with_footer_exclusion(mut self, ratio: f32) -> Self {
        self.footer_exclusion_ratio = if ratio > 0.0 { Some(ratio) } else { None };
        self
    }

    /// Set the header exclusion ratio. Pass `0.0` to disable.
    pub fn with_header_exclusion(mut self, ratio: f32) -> Self {
        self.header_exclusion_ratio = if ratio > 0.0 { Some(ratio) } else { None };
        self
    }
}

impl SpanBackend for MupdfBackend {
    fn extract_spans(&self, path: &Path) -> Result<Vec<TextSpan>, PdfError> {
        let path_str = path
            .to_str()
            .ok_or_else(|| PdfError::OpenError("invalid path encoding".into()))?;

        let document =
            Document::open(path_str).map_err(|e| PdfError::OpenError(e.to_string()))?;

        let mut spans = Vec::new();

        for page_result in document
            .pages()
            .map_err(|e| PdfError::ExtractionError(e.to_string()))?
        {
            let page = page_result.map_err(|e| PdfError::ExtractionError(e.to_string()))?;
            let text_page = page
                .to_text_page(TextPageFlags::empty())
                .map_err(|e| PdfError::ExtractionError(e.to_string()))?;

            // Page bounds for header/footer exclusion
            let page_bounds = page
                .bounds()
                .map_err(|e| PdfError::ExtractionError(e.to_string()))?;
            let page_height = page_bounds.y1 - page_bounds.y0;

            let header_threshold = self
                .header_exclusion_ratio
                .map(|r| page_bounds.y0 + page_height * r);
            let footer_threshold = self
                .footer_exclusion_ratio
                .map(|r| page_bounds.y1 - page_height * r);

            for block in text_page.blocks() {
                let block_bounds = block.bounds();

                // Skip blocks entirely within the header region
                if let Some(threshold) = header_threshold {
                    if block_bounds.y1 <= threshold {
                        continue;
                    }
                }

                // Skip blocks whose top edge is in the footer region
                if let Some(threshold) = footer_threshold {
                    if block_bounds.y0 >= threshold {
                        continue;
                    }
                }

                for line in block.lines() {
                    let mut run_text = String::new();
                    let mut run_size: Option<u32> = None;

                    for ch in line.chars() {
                        let size = ch.size().round().max(0.0) as u32;
                        let c = ch.char().unwrap_or('\u{FFFD}');

                        match run_size {
                            Some(current) if current == size => run_text.push(c),
                            Some(current) => {
                                push_span(&mut spans, &run_text, current);
                                run_text.clear();
                                run_text.push(c);
                                run_size = Some(size);
                            }
                            None => {
                                run_text.push(c);
                                run_size = Some(size);
                            }
                        }
                    }

                    if let Some(size) = run_size {
                        push_span(&mut spans, &run_text, size);
                    }
                }
            }
        }

        Ok(spans)
    }
}

/// Trimmed, non-empty runs only; whitespace-only runs carry no signal.
fn push_span(spans: &mut Vec<TextSpan>, text: &str, font_size: u32) {
    let trimmed = text.trim();
    if !trimmed.is_empty() {
        spans.push(TextSpan::new(trimmed, font_size));
    }
}
