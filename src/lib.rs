pub mod apidoc;
pub mod config;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use config::Config;
use services::{ai::Decider, screen::ScreenDetector};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
pub struct AppState {
    pub cfg: Config,
    pub decider: Arc<dyn Decider>,
    pub detector: Arc<ScreenDetector>,
}

impl AppState {
    pub fn new(cfg: Config, http: reqwest::Client) -> Self {
        let decider = services::ai::build_decider(&cfg, http);
        let detector = Arc::new(ScreenDetector::new(
            decider.clone(),
            cfg.screen_change_threshold,
        ));
        Self {
            cfg,
            decider,
            detector,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/analyze", post(routes::analyze::analyze))
        .route("/api/screen/detect", post(routes::screen::screen_detect))
        .route("/healthz", get(routes::health::health))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", apidoc::ApiDoc::openapi()))
        .with_state(state)
}
