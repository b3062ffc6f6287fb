use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use super::{AdviceError, AdviceProvider};
use crate::config::AdviceConfig;

/// generateContent 요청 본문.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    /// "user" 또는 "model"
    #[serde(default)]
    pub role: String,
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    #[serde(default)]
    pub text: String,
}

/// generateContent 응답 중 필요한 부분만.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    pub content: Option<Content>,
    #[serde(rename = "finishReason")]
    pub finish_reason: Option<String>,
}

impl GenerateContentRequest {
    pub fn user_text(prompt: &str) -> Self {
        Self {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        }
    }
}

impl GenerateContentResponse {
    /// 첫 후보의 텍스트 파트를 이어 붙인다. 텍스트가 없으면 `None`.
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content.parts.iter().map(|p| p.text.as_str()).collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

/// Gemini generateContent API 클라이언트.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
    timeout: Duration,
}

impl GeminiClient {
    pub fn new(base_url: &str, model: &str, api_key: &str, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
            timeout,
        }
    }

    /// 설정과 환경 변수에서 클라이언트를 만든다. 키가 없거나 비어 있으면 오류.
    pub fn from_config(cfg: &AdviceConfig) -> Result<Self, AdviceError> {
        let api_key = std::env::var(&cfg.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| AdviceError::MissingApiKey(cfg.api_key_env.clone()))?;
        Ok(Self::new(
            &cfg.base_url,
            &cfg.model,
            &api_key,
            Duration::from_secs(cfg.timeout_seconds),
        ))
    }

    /// 모델 이름은 URL 경로에 들어간다: {base}/models/{model}:generateContent
    pub fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

impl AdviceProvider for GeminiClient {
    fn generate(&self, prompt: &str) -> Result<Option<String>, AdviceError> {
        let request = GenerateContentRequest::user_text(prompt);
        let response = self
            .client
            .post(self.endpoint())
            .timeout(self.timeout)
            .query(&[("key", &self.api_key)])
            .json(&request)
            .send()?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response
                .text()
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AdviceError::Upstream { status, message });
        }

        let body: GenerateContentResponse = response.json()?;
        if let Some(reason) = body.candidates.first().and_then(|c| c.finish_reason.as_deref()) {
            tracing::debug!(finish_reason = reason, model = %self.model, "advice generated");
        }
        Ok(body.text())
    }
}
