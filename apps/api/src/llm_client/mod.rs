/// LLM Client — the single point of entry for every model and embedding call.
///
/// ARCHITECTURAL RULE: no other module talks to the model server directly.
/// Pipeline components receive `&dyn ModelService` / `&dyn EmbeddingService`
/// handles so tests can swap in fakes.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod prompts;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("model server returned empty content")]
    EmptyContent,
}

/// Text generation contract: one prompt in, one completion out. No streaming.
#[async_trait]
pub trait ModelService: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}

/// Embedding contract: one text in, one dense vector out.
#[async_trait]
pub trait EmbeddingService: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, LlmError>;
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
    #[serde(default)]
    prompt_eval_count: Option<u32>,
    #[serde(default)]
    eval_count: Option<u32>,
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    #[serde(default)]
    embedding: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct OllamaError {
    error: String,
}

/// Ollama-backed client serving both the model and the embedding contract.
///
/// Requests are single-shot: no retries. The client-wide timeout bounds how long
/// a hung server can stall a screening run.
#[derive(Clone)]
pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
    embedding_model: String,
}

impl OllamaClient {
    pub fn new(
        base_url: &str,
        model: &str,
        embedding_model: &str,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            embedding_model: embedding_model.to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn embedding_model(&self) -> &str {
        &self.embedding_model
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, LlmError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.client.post(&url).json(body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<OllamaError>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl ModelService for OllamaClient {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };
        let response: GenerateResponse = self.post_json("/api/generate", &request).await?;

        debug!(
            "generate succeeded: model={}, prompt_tokens={:?}, output_tokens={:?}",
            self.model, response.prompt_eval_count, response.eval_count
        );

        if response.response.trim().is_empty() {
            return Err(LlmError::EmptyContent);
        }
        Ok(response.response)
    }
}

#[async_trait]
impl EmbeddingService for OllamaClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, LlmError> {
        let request = EmbeddingRequest {
            model: &self.embedding_model,
            prompt: text,
        };
        let response: EmbeddingResponse = self.post_json("/api/embeddings", &request).await?;

        if response.embedding.is_empty() {
            return Err(LlmError::EmptyContent);
        }
        Ok(response.embedding)
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from model output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}
