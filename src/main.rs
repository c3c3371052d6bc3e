use kimate_ai::{build_router, config::Config, AppState};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = Config::from_env().expect("Failed to load configuration");
    let http = reqwest::Client::new();
    // Compute before moving state anywhere
    let addr = format!("{}:{}", cfg.app_host, cfg.app_port);

    tracing::info!(
        "AI service init - model={} mock={} threshold={}",
        cfg.openai_model,
        cfg.ai_mock,
        cfg.screen_change_threshold,
    );

    let state = AppState::new(cfg, http);
    let app = build_router(state);

    let listener = TcpListener::bind(&addr).await.unwrap();

    tracing::info!("KiMate AI server listening on http://{addr}");
    axum::serve(listener, app).await.unwrap();
}
