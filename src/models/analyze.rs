use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Accepts a missing field *or* an explicit JSON `null` as an empty list.
/// Clients occasionally send `"ocr_texts": null` when OCR found nothing.
pub fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

/// One turn of the conversation so far. The caller resends the full history
/// on every request; nothing is stored server-side.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DialogueTurn {
    pub role: Role,
    pub utterance: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AnalyzeRequest {
    /// Session tracking id. Used for log correlation only, never echoed back.
    pub session_id: String,
    /// Latest user utterance (STT output). May be absent.
    #[serde(default)]
    pub user_input: Option<String>,
    /// Texts recognized on the current screen, in OCR order.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub ocr_texts: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub dialogue_history: Vec<DialogueTurn>,
    /// Text of the button the user pressed most recently, if any.
    #[serde(default)]
    pub last_btn: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    ClickText,
    SpeakOnly,
    AskClarification,
}

/// What the client app should physically do with the screen.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Action {
    #[serde(rename = "type")]
    pub kind: ActionType,
    #[serde(default)]
    pub params: BTreeMap<String, Value>,
}

impl Action {
    /// `target_text` must be copied verbatim from the request's `ocr_texts`.
    pub fn click_text(target_text: &str) -> Self {
        let mut params = BTreeMap::new();
        params.insert("target_text".to_string(), Value::String(target_text.to_string()));
        Self {
            kind: ActionType::ClickText,
            params,
        }
    }

    pub fn speak_only() -> Self {
        Self {
            kind: ActionType::SpeakOnly,
            params: BTreeMap::new(),
        }
    }

    /// `candidates` must all come from the request's `ocr_texts`.
    pub fn ask_clarification(candidates: Vec<String>) -> Self {
        let mut params = BTreeMap::new();
        params.insert(
            "candidates".to_string(),
            Value::Array(candidates.into_iter().map(Value::String).collect()),
        );
        Self {
            kind: ActionType::AskClarification,
            params,
        }
    }

    pub fn target_text(&self) -> Option<&str> {
        self.params.get("target_text").and_then(Value::as_str)
    }

    pub fn candidates(&self) -> Option<Vec<&str>> {
        self.params
            .get("candidates")
            .and_then(Value::as_array)
            .map(|arr| arr.iter().filter_map(Value::as_str).collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Success,
    Ambiguous,
    Fail,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AnalyzeResponse {
    pub status: Status,
    /// 0.0 ~ 1.0
    pub confidence: f64,
    /// Guidance spoken to the user. Korean, short, reads on-screen text verbatim.
    pub response_message: String,
    pub action: Action,
}

impl AnalyzeResponse {
    /// Bound check for responses coming back from the model. Our own
    /// constructors always satisfy this.
    pub fn is_valid(&self) -> bool {
        (0.0..=1.0).contains(&self.confidence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_ocr_texts_deserializes_to_empty() {
        let req: AnalyzeRequest = serde_json::from_str(
            r#"{"session_id": "sess_001", "ocr_texts": null, "dialogue_history": null}"#,
        )
        .unwrap();
        assert!(req.ocr_texts.is_empty());
        assert!(req.dialogue_history.is_empty());
        assert!(req.user_input.is_none());
        assert!(req.last_btn.is_none());
    }

    #[test]
    fn missing_optional_fields_default() {
        let req: AnalyzeRequest = serde_json::from_str(r#"{"session_id": "s"}"#).unwrap();
        assert!(req.ocr_texts.is_empty());
        assert!(req.dialogue_history.is_empty());
    }

    #[test]
    fn action_type_uses_snake_case_tags() {
        let action = Action::click_text("매장");
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["type"], "click_text");
        assert_eq!(json["params"]["target_text"], "매장");
    }

    #[test]
    fn clarification_params_hold_candidates() {
        let action = Action::ask_clarification(vec!["불고기버거".into(), "치즈버거".into()]);
        assert_eq!(
            action.candidates().unwrap(),
            vec!["불고기버거", "치즈버거"]
        );
        assert!(action.target_text().is_none());
    }

    #[test]
    fn speak_only_has_empty_params() {
        let action = Action::speak_only();
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["params"], serde_json::json!({}));
    }

    #[test]
    fn response_roundtrips_through_model_json() {
        // Shape the model is instructed to emit.
        let raw = r#"{
            "status": "ambiguous",
            "confidence": 0.9,
            "response_message": "어떤 메뉴를 선택하시겠습니까?",
            "action": {"type": "ask_clarification", "params": {"candidates": ["불고기버거", "치즈버거"]}}
        }"#;
        let res: AnalyzeResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(res.status, Status::Ambiguous);
        assert!(res.is_valid());
        assert_eq!(res.action.kind, ActionType::AskClarification);
    }

    #[test]
    fn out_of_range_confidence_is_invalid() {
        let raw = r#"{
            "status": "success",
            "confidence": 1.3,
            "response_message": "ok",
            "action": {"type": "speak_only", "params": {}}
        }"#;
        let res: AnalyzeResponse = serde_json::from_str(raw).unwrap();
        assert!(!res.is_valid());
    }
}
