//! Decision engine: given a screen's OCR texts and the user's utterance,
//! decide which button to guide the user to.
//!
//! Two interchangeable strategies behind the [`Decider`] trait: a
//! deterministic mock for offline use and tests, and the OpenAI-backed
//! decider. Neither ever surfaces an error to the HTTP layer; every failure
//! degrades into a well-formed fallback response.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};
use url::Url;

use crate::config::Config;
use crate::models::analyze::{Action, AnalyzeRequest, AnalyzeResponse, Status};
use crate::services::prompt;

#[async_trait]
pub trait Decider: Send + Sync {
    async fn analyze(&self, payload: &AnalyzeRequest) -> AnalyzeResponse;
}

/// Pick the strategy from config. A missing credential downgrades to mock
/// with a warning instead of failing startup.
pub fn build_decider(cfg: &Config, http: reqwest::Client) -> Arc<dyn Decider> {
    if cfg.ai_mock {
        return Arc::new(MockDecider);
    }
    match &cfg.openai_api_key {
        Some(key) => Arc::new(OpenAiDecider::new(
            http,
            cfg.openai_base_url.clone(),
            cfg.openai_model.clone(),
            key.clone(),
            cfg.ai_max_retries,
        )),
        None => {
            warn!("OPENAI_API_KEY is not set, falling back to mock mode");
            Arc::new(MockDecider)
        }
    }
}

/* --------------------------- mock strategy --------------------------- */

/// Deterministic offline decider: always targets the first visible text.
/// Defines the stable reference behavior callers can test against.
pub struct MockDecider;

#[async_trait]
impl Decider for MockDecider {
    async fn analyze(&self, payload: &AnalyzeRequest) -> AnalyzeResponse {
        match payload.ocr_texts.first() {
            Some(target) => AnalyzeResponse {
                status: Status::Success,
                confidence: 0.5,
                response_message: format!(
                    "{target} 버튼으로 안내하겠습니다. 손가락을 움직이면 목표에 가까워질수록 진동이 빨라집니다."
                ),
                action: Action::click_text(target),
            },
            None => AnalyzeResponse {
                status: Status::Fail,
                confidence: 0.3,
                response_message:
                    "화면에서 선택할 수 있는 텍스트가 없습니다. 화면을 다시 비춰주세요."
                        .to_string(),
                action: Action::speak_only(),
            },
        }
    }
}

/* -------------------------- OpenAI strategy -------------------------- */

#[derive(Debug, Error)]
enum DecideError {
    #[error("request error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("completions endpoint url: {0}")]
    Endpoint(#[from] url::ParseError),
    #[error("api status {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("empty completion")]
    EmptyCompletion,
    #[error("invalid completion json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("completion failed schema validation")]
    SchemaInvalid,
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

pub struct OpenAiDecider {
    http: reqwest::Client,
    base_url: Url,
    model: String,
    api_key: String,
    max_retries: u32,
}

impl OpenAiDecider {
    pub fn new(
        http: reqwest::Client,
        base_url: Url,
        model: String,
        api_key: String,
        max_retries: u32,
    ) -> Self {
        Self {
            http,
            base_url,
            model,
            api_key,
            max_retries: max_retries.max(1),
        }
    }

    async fn request_decision(
        &self,
        payload: &AnalyzeRequest,
    ) -> Result<AnalyzeResponse, DecideError> {
        let url = self.base_url.join("/v1/chat/completions")?;
        let body = json!({
            "model": self.model,
            "temperature": 0.3,
            "response_format": {"type": "json_object"},
            "messages": prompt::build_messages(payload),
        });

        let res = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            return Err(DecideError::Api { status, body });
        }

        let completion: ChatCompletion = res.json().await?;
        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(DecideError::EmptyCompletion)?;

        let parsed: AnalyzeResponse = serde_json::from_str(&content)?;
        if !parsed.is_valid() {
            return Err(DecideError::SchemaInvalid);
        }
        Ok(parsed)
    }

    fn fallback_response(&self) -> AnalyzeResponse {
        AnalyzeResponse {
            status: Status::Fail,
            confidence: 0.2,
            response_message: "잠시 오류가 발생했습니다. 화면을 다시 한번 확인해 주세요."
                .to_string(),
            action: Action::speak_only(),
        }
    }
}

#[async_trait]
impl Decider for OpenAiDecider {
    async fn analyze(&self, payload: &AnalyzeRequest) -> AnalyzeResponse {
        for attempt in 1..=self.max_retries {
            match self.request_decision(payload).await {
                Ok(response) => return response,
                Err(err) if attempt < self.max_retries => {
                    warn!(
                        "AI analysis retry ({attempt}/{}): {err}",
                        self.max_retries
                    );
                    tokio::time::sleep(Duration::from_millis(500 * attempt as u64)).await;
                }
                Err(err) => {
                    error!("AI analysis failed, returning fallback: {err}");
                }
            }
        }
        self.fallback_response()
    }
}
