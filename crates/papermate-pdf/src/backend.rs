use std::path::Path;

use crate::{PdfError, TextSpan};

/// Trait for PDF span extraction backends.
///
/// Implementors provide the low-level text + font-size extraction step; the
/// segmentation pipeline (heading detection, section assembly) lives in
/// [`crate::segment`].
pub trait SpanBackend: Send + Sync {
    /// Extract the text spans of a PDF file, in document order.
    fn extract_spans(&self, path: &Path) -> Result<Vec<TextSpan>, PdfError>;
}
