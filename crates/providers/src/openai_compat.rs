//! OpenAI-compatible service implementation.
//!
//! Works with: OpenAI, OpenRouter, LM Studio, Ollama, vLLM, and any endpoint
//! exposing OpenAI-compatible `/chat/completions` and `/embeddings` routes.
//! One client implements both the reasoning and the embedding contract.

use async_trait::async_trait;
use percept_core::error::{EmbeddingError, ReasoningError};
use percept_core::reasoning::{
    CompletionRequest, CompletionResponse, EmbeddingService, ReasoningService, ToolDefinition,
    ToolInvocation,
};
use serde::Deserialize;
use tracing::{debug, warn};

/// An OpenAI-compatible reasoning + embedding client.
pub struct OpenAiCompatService {
    name: String,
    base_url: String,
    api_key: String,
    chat_model: String,
    embedding_model: String,
    embedding_dimension: usize,
    client: reqwest::Client,
}

impl OpenAiCompatService {
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        chat_model: impl Into<String>,
        embedding_model: impl Into<String>,
        embedding_dimension: usize,
    ) -> Result<Self, ReasoningError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(300))
            .build()
            .map_err(|e| ReasoningError::NotConfigured(e.to_string()))?;

        Ok(Self {
            name: name.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            chat_model: chat_model.into(),
            embedding_model: embedding_model.into(),
            embedding_dimension,
            client,
        })
    }

    /// Create an OpenAI provider (convenience constructor).
    pub fn openai(api_key: impl Into<String>) -> Result<Self, ReasoningError> {
        Self::new(
            "openai",
            "https://api.openai.com/v1",
            api_key,
            "gpt-4o-mini",
            "text-embedding-3-small",
            1536,
        )
    }

    /// Create a client for an LM Studio-style local endpoint.
    pub fn local(base_url: &str, chat_model: &str) -> Result<Self, ReasoningError> {
        // Local endpoints don't check the key
        Self::new("local", base_url, "local", chat_model, chat_model, 768)
    }

    fn to_api_tools(tools: &[ToolDefinition]) -> Vec<serde_json::Value> {
        tools
            .iter()
            .map(|t| {
                serde_json::json!({
                    "type": "function",
                    "function": {
                        "name": t.name,
                        "description": t.description,
                        "parameters": t.parameters,
                    }
                })
            })
            .collect()
    }
}

#[async_trait]
impl ReasoningService for OpenAiCompatService {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, ReasoningError> {
        let url = format!("{}/chat/completions", self.base_url);

        let mut body = serde_json::json!({
            "model": self.chat_model,
            "messages": [
                { "role": "system", "content": request.system },
                { "role": "user", "content": request.input },
            ],
            "stream": false,
        });

        if !request.tools.is_empty() {
            body["tools"] = serde_json::json!(Self::to_api_tools(&request.tools));
        }

        debug!(service = %self.name, model = %self.chat_model, "Sending completion request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ReasoningError::Network(e.to_string()))?;

        let status = response.status().as_u16();

        if status == 401 || status == 403 {
            return Err(ReasoningError::AuthenticationFailed(
                "Invalid API key or insufficient permissions".into(),
            ));
        }

        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Reasoning service returned error");
            return Err(ReasoningError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        let parsed: ChatCompletionBody = response
            .json()
            .await
            .map_err(|e| ReasoningError::MalformedResponse(e.to_string()))?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ReasoningError::MalformedResponse("response has no choices".into()))?;

        let tool_calls = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|tc| ToolInvocation {
                name: tc.function.name,
                arguments: tc.function.arguments,
            })
            .collect();

        Ok(CompletionResponse {
            text: choice.message.content.unwrap_or_default(),
            tool_calls,
        })
    }
}

#[async_trait]
impl EmbeddingService for OpenAiCompatService {
    fn name(&self) -> &str {
        &self.name
    }

    fn dimension(&self) -> usize {
        self.embedding_dimension
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        // Blank input maps to a zero vector without a service round-trip.
        if text.trim().is_empty() {
            return Ok(vec![0.0; self.embedding_dimension]);
        }

        let url = format!("{}/embeddings", self.base_url);
        let body = serde_json::json!({
            "model": self.embedding_model,
            "input": text,
        });

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| EmbeddingError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Embedding service returned error");
            return Err(EmbeddingError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        let parsed: EmbeddingBody = response
            .json()
            .await
            .map_err(|e| EmbeddingError::Network(e.to_string()))?;

        parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or(EmbeddingError::EmptyResponse)
    }
}

// --- Wire types ---

#[derive(Debug, Deserialize)]
struct ChatCompletionBody {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
    tool_calls: Option<Vec<ApiToolCall>>,
}

#[derive(Debug, Deserialize)]
struct ApiToolCall {
    function: ApiFunction,
}

#[derive(Debug, Deserialize)]
struct ApiFunction {
    name: String,
    arguments: String,
}

#[derive(Debug, Deserialize)]
struct EmbeddingBody {
    data: Vec<EmbeddingDatum>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingDatum {
    embedding: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let svc = OpenAiCompatService::new(
            "test", "http://localhost:1234/v1/", "key", "model", "embed-model", 768,
        )
        .unwrap();
        assert_eq!(svc.base_url, "http://localhost:1234/v1");
    }

    #[tokio::test]
    async fn blank_embedding_input_returns_zero_vector() {
        let svc = OpenAiCompatService::new(
            "test", "http://localhost:1234/v1", "key", "model", "embed-model", 8,
        )
        .unwrap();

        let v = svc.embed("   ").await.unwrap();
        assert_eq!(v.len(), 8);
        assert!(v.iter().all(|x| *x == 0.0));
    }

    #[test]
    fn chat_completion_body_parses_tool_calls() {
        let json = r#"{
            "choices": [{
                "message": {
                    "content": "<think>Replying</think>",
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": { "name": "send_message", "arguments": "{\"recipient\":\"Bob\"}" }
                    }]
                }
            }]
        }"#;
        let parsed: ChatCompletionBody = serde_json::from_str(json).unwrap();
        let tc = parsed.choices[0].message.tool_calls.as_ref().unwrap();
        assert_eq!(tc[0].function.name, "send_message");
    }
}
