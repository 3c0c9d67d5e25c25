use std::path::PathBuf;
use std::sync::Arc;

use axum::Json;
use axum::extract::{Multipart, State};
use axum::http::{HeaderMap, StatusCode};

use papermate_core::gateway::openai::OpenAiGateway;
use papermate_core::{CoreError, Session, summarize};
use papermate_pdf::{PdfError, Section, SegmenterConfig, extract_sections};
use papermate_pdf_mupdf::MupdfBackend;

use crate::error::{bad_request, error_response};
use crate::models::{ErrorResponse, SummaryResponse};
use crate::state::AppState;
use crate::upload::{self, ModelCreds};

/// `POST /summarize`: upload a paper, segment and persist its sections,
/// reset the session, return a structured analysis.
pub async fn summarize_pdf(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Json<SummaryResponse>, (StatusCode, Json<ErrorResponse>)> {
    let creds = ModelCreds::from_headers(&headers).map_err(bad_request)?;
    let pdf = upload::parse_multipart(multipart).await.map_err(bad_request)?;

    // Scoped temp dir: the uploaded bytes are removed on every exit path.
    let temp_dir = tempfile::tempdir()
        .map_err(|e| error_response(&CoreError::Io(e)))?;
    let pdf_path = temp_dir.path().join("upload.pdf");
    std::fs::write(&pdf_path, &pdf.data)
        .map_err(|e| error_response(&CoreError::Io(e)))?;

    tracing::info!(filename = %pdf.filename, bytes = pdf.data.len(), "processing upload");

    // Extraction is blocking MuPDF work; keep it off the async runtime.
    let sections = extract_blocking(pdf_path, state.segmenter.clone())
        .await
        .map_err(|e| error_response(&e))?;
    drop(temp_dir);

    let markdown = papermate_pdf::render_markdown(&sections);
    let section_dir = state.sections_root.join("current");
    let paths = state
        .store
        .split_markdown(&markdown, &section_dir)
        .map_err(|e| error_response(&e))?;

    // Replace the whole session (id, sections and history together) so a
    // partial update with new sections but stale history can never be
    // observed.
    let session = Session::new(paths.clone());
    let session_id = state.session.replace(session);
    tracing::info!(%session_id, sections = paths.len(), "session reset");

    let gateway =
        OpenAiGateway::with_base_url(creds.api_key, creds.model, state.base_url.clone());
    let report = summarize(&paths, &gateway)
        .await
        .map_err(|e| error_response(&e))?;

    Ok(Json(SummaryResponse { summary: report }))
}

/// Run span extraction + segmentation on a blocking thread, folding
/// extraction failures into the domain taxonomy.
async fn extract_blocking(
    pdf_path: PathBuf,
    segmenter: SegmenterConfig,
) -> Result<Vec<Section>, CoreError> {
    let joined = tokio::task::spawn_blocking(move || {
        let backend = MupdfBackend::new();
        extract_sections(&pdf_path, &backend, &segmenter)
    })
    .await
    .map_err(|e| CoreError::ExtractionFailed(format!("extraction task failed: {e}")))?;

    joined.map_err(|e| match e {
        PdfError::NoSections => CoreError::NoSections,
        other => CoreError::ExtractionFailed(other.to_string()),
    })
}
