use axum::{extract::State, Json};
use tracing::info;

use crate::models::analyze::{AnalyzeRequest, AnalyzeResponse};
use crate::AppState;

#[utoipa::path(
    post,
    path = "/api/analyze",
    tag = "kiosk",
    request_body = AnalyzeRequest,
    responses(
        (status = 200, description = "Decision for the current screen. Domain failures (status=fail) are still HTTP 200.", body = AnalyzeResponse),
        (status = 422, description = "Malformed request body", body = crate::models::common::ErrorMessage)
    )
)]
pub async fn analyze(
    State(state): State<AppState>,
    Json(payload): Json<AnalyzeRequest>,
) -> Json<AnalyzeResponse> {
    info!(
        "Analyze request (session={} texts={} input={:?})",
        payload.session_id,
        payload.ocr_texts.len(),
        payload.user_input,
    );

    Json(state.decider.analyze(&payload).await)
}
