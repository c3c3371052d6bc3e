use axum::{extract::State, Json};
use tracing::info;

use crate::models::screen::{ScreenDetectRequest, ScreenDetectResponse};
use crate::AppState;

#[utoipa::path(
    post,
    path = "/api/screen/detect",
    tag = "kiosk",
    request_body = ScreenDetectRequest,
    responses(
        (status = 200, description = "Similarity verdict, with a fresh analysis only when the screen changed.", body = ScreenDetectResponse),
        (status = 422, description = "Malformed request body", body = crate::models::common::ErrorMessage)
    )
)]
pub async fn screen_detect(
    State(state): State<AppState>,
    Json(payload): Json<ScreenDetectRequest>,
) -> Json<ScreenDetectResponse> {
    info!(
        "Screen detect request (session={} prev={} curr={})",
        payload.session_id,
        payload.previous_texts.len(),
        payload.current_texts.len(),
    );

    Json(state.detector.detect(payload).await)
}
