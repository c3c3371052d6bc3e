use axum::Json;

use crate::models::common::Health;

#[utoipa::path(
    get,
    path = "/healthz",
    tag = "meta",
    responses(
        (status = 200, description = "Service is up", body = Health)
    )
)]
pub async fn health() -> Json<Health> {
    Json(Health::ok())
}
