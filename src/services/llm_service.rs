// src/services/llm_service.rs
use crate::errors::AnalyzeError;
use crate::models::{ChatMessage, ChatRequest, ChatResponse};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Instant;

/// Text generation backend used to write the skin report.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Sends `prompt` as a single user message and returns the first
    /// completion's text, or an empty string when the model returns none.
    async fn complete(&self, prompt: &str) -> Result<String, AnalyzeError>;

    fn model_name(&self) -> &str;
}

/// OpenAI-compatible chat completions endpoint, as served by the
/// Hugging Face inference router.
pub struct HuggingFaceChat {
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
    temperature: f64,
    client: Client,
}

impl HuggingFaceChat {
    pub fn new(
        api_key: String,
        base_url: &str,
        model: String,
        max_tokens: u32,
        temperature: f64,
        client: Client,
    ) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            max_tokens,
            temperature,
            client,
        }
    }
}

#[async_trait]
impl ChatModel for HuggingFaceChat {
    async fn complete(&self, prompt: &str) -> Result<String, AnalyzeError> {
        let start = Instant::now();

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AnalyzeError::AnalysisFailed(format!("Text generation request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AnalyzeError::AnalysisFailed(format!(
                "Text generation error ({}): {}",
                status, error_text
            )));
        }

        let result: ChatResponse = response.json().await.map_err(|e| {
            AnalyzeError::AnalysisFailed(format!("Failed to parse text generation response: {}", e))
        })?;

        let content = result
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .unwrap_or_default();

        log::info!(
            "{} returned {} chars in {}ms",
            self.model,
            content.len(),
            start.elapsed().as_millis()
        );

        Ok(content)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
