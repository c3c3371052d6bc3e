use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::analyze::{null_as_empty, AnalyzeResponse, DialogueTurn};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ScreenDetectRequest {
    /// Texts recognized on the screen at the previous capture.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub previous_texts: Vec<String>,
    /// Texts recognized on the screen right now.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub current_texts: Vec<String>,
    pub session_id: String,
    #[serde(default)]
    pub user_input: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub dialogue_history: Vec<DialogueTurn>,
    #[serde(default)]
    pub last_btn: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ScreenDetectResponse {
    pub is_changed: bool,
    /// Jaccard similarity between the two screens' normalized text sets.
    pub similarity_score: f64,
    /// Populated only when the screen changed enough to re-run the analysis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_analysis: Option<AnalyzeResponse>,
}
