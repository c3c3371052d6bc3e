use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "KiMate AI Server",
        version = "0.1.0",
        description = "Kiosk assistant backend. Forwards OCR texts and speech transcripts to an LLM and decides which on-screen button the user should press next."
    ),
    servers(
        (url = "http://localhost:8000", description = "Local dev")
    ),
    tags(
        (name = "kiosk", description = "Screen analysis endpoints"),
        (name = "meta", description = "Liveness")
    ),
    // Handlers (paths)
    paths(
        crate::routes::analyze::analyze,
        crate::routes::screen::screen_detect,
        crate::routes::health::health,
    ),
    // Schemas used in requests/responses
    components(
        schemas(
            crate::models::analyze::Role,
            crate::models::analyze::DialogueTurn,
            crate::models::analyze::AnalyzeRequest,
            crate::models::analyze::ActionType,
            crate::models::analyze::Action,
            crate::models::analyze::Status,
            crate::models::analyze::AnalyzeResponse,
            crate::models::screen::ScreenDetectRequest,
            crate::models::screen::ScreenDetectResponse,
            crate::models::common::Health,
            crate::models::common::ErrorMessage
        )
    )
)]
pub struct ApiDoc;
