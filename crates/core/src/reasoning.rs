//! Reasoning and embedding service contracts.
//!
//! The reasoning service is the external completion endpoint the Brain asks
//! "what should I do"; the embedding service turns recall text into the
//! fixed-dimensionality vectors long-term memory ranks by. Both are consumed
//! strictly at this interface boundary — transport, model selection, and
//! retry policy belong to the implementations in `percept-providers`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{EmbeddingError, ReasoningError};

/// A tool definition sent to the reasoning service so it knows what
/// functions it may request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// The function name
    pub name: String,

    /// Description of what the function does
    pub description: String,

    /// JSON Schema describing the function's parameters
    pub parameters: serde_json::Value,
}

/// One reasoning request: system instruction, task input, and the catalog
/// of callable tools.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// The assembled system prompt (character, capabilities, working memory).
    pub system: String,

    /// The task input — the sensory data's processing instructions.
    pub input: String,

    /// Available tools the model can call.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolDefinition>,
}

/// A successful reasoning response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Narrative text. May be empty when the model only requests tools.
    pub text: String,

    /// Zero or more requested tool invocations, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolInvocation>,
}

/// A tool invocation requested by the reasoning service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInvocation {
    /// The requested function name.
    pub name: String,

    /// Arguments as a JSON string.
    pub arguments: String,
}

/// The reasoning service contract.
#[async_trait]
pub trait ReasoningService: Send + Sync {
    /// A human-readable name for this service (e.g., "openai", "mock").
    fn name(&self) -> &str;

    /// Send a request and get a complete response.
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> std::result::Result<CompletionResponse, ReasoningError>;
}

/// The embedding service contract.
///
/// Empty/whitespace input is defined to map to a deterministic zero vector of
/// [`dimension`](EmbeddingService::dimension) length without a service
/// round-trip — implementations must honor that before touching the network.
#[async_trait]
pub trait EmbeddingService: Send + Sync {
    /// A human-readable name for this service.
    fn name(&self) -> &str;

    /// The fixed dimensionality of vectors this service produces.
    fn dimension(&self) -> usize;

    /// Generate an embedding for the given text.
    async fn embed(&self, text: &str) -> std::result::Result<Vec<f32>, EmbeddingError>;
}
