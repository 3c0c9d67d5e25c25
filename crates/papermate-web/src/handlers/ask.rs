use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};

use papermate_core::CoreError;
use papermate_core::gateway::openai::OpenAiGateway;

use crate::error::{bad_request, error_response};
use crate::models::{AnswerResponse, ErrorResponse, QuestionRequest};
use crate::state::AppState;
use crate::upload::ModelCreds;

/// `POST /ask`: answer a question about the currently uploaded paper.
///
/// The session's history is committed only after a successful turn; any
/// gateway failure (compression included) leaves it untouched.
pub async fn ask_question(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<QuestionRequest>,
) -> Result<Json<AnswerResponse>, (StatusCode, Json<ErrorResponse>)> {
    let creds = ModelCreds::from_headers(&headers).map_err(bad_request)?;

    let Some(session) = state.session.snapshot() else {
        return Err(error_response(&CoreError::SessionNotReady));
    };

    let gateway =
        OpenAiGateway::with_base_url(creds.api_key, creds.model, state.base_url.clone());

    let answer = state
        .manager
        .answer(
            &session.history,
            &request.question,
            &session.section_paths,
            &gateway,
        )
        .await
        .map_err(|e| error_response(&e))?;

    if !state.session.commit_history(session.id, answer.history) {
        tracing::warn!(session_id = %session.id, "session replaced mid-question; history not committed");
    }

    Ok(Json(AnswerResponse {
        answer: answer.text,
    }))
}
