//! Screen change detection: Jaccard similarity over normalized text sets,
//! gating the (expensive) AI analysis behind a threshold.

use std::collections::HashSet;
use std::sync::Arc;

use crate::models::analyze::AnalyzeRequest;
use crate::models::screen::{ScreenDetectRequest, ScreenDetectResponse};
use crate::services::ai::Decider;

fn normalize(texts: &[String]) -> HashSet<String> {
    texts
        .iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Jaccard index over the normalized text sets of two screens.
/// Two blank screens count as unchanged (1.0).
pub fn jaccard_similarity(previous: &[String], current: &[String]) -> f64 {
    let prev_set = normalize(previous);
    let curr_set = normalize(current);
    if prev_set.is_empty() && curr_set.is_empty() {
        return 1.0;
    }
    let union = prev_set.union(&curr_set).count();
    if union == 0 {
        // Unreachable given the rule above, but never divide by zero.
        return 0.0;
    }
    let intersection = prev_set.intersection(&curr_set).count();
    intersection as f64 / union as f64
}

pub struct ScreenDetector {
    decider: Arc<dyn Decider>,
    threshold: f64,
}

impl ScreenDetector {
    pub fn new(decider: Arc<dyn Decider>, threshold: f64) -> Self {
        Self { decider, threshold }
    }

    /// Compare the two screens; only when similarity drops below the
    /// threshold is the decision engine invoked on the current screen.
    pub async fn detect(&self, payload: ScreenDetectRequest) -> ScreenDetectResponse {
        let similarity = jaccard_similarity(&payload.previous_texts, &payload.current_texts);
        let is_changed = similarity < self.threshold;

        let ai_analysis = if is_changed {
            let analyze_payload = AnalyzeRequest {
                session_id: payload.session_id,
                user_input: payload.user_input,
                ocr_texts: payload.current_texts,
                dialogue_history: payload.dialogue_history,
                last_btn: payload.last_btn,
            };
            Some(self.decider.analyze(&analyze_payload).await)
        } else {
            None
        };

        ScreenDetectResponse {
            is_changed,
            similarity_score: similarity,
            ai_analysis,
        }
    }
}
