//! Error types for the Percept domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for all Percept operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Reasoning service errors ---
    #[error("Reasoning error: {0}")]
    Reasoning(#[from] ReasoningError),

    // --- Embedding service errors ---
    #[error("Embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    // --- Memory errors ---
    #[error("Memory error: {0}")]
    Memory(#[from] MemoryError),

    // --- Sensor errors ---
    #[error("Sensor error: {0}")]
    Sensor(#[from] SensorError),

    // --- Actuator errors ---
    #[error("Actuator error: {0}")]
    Actuator(#[from] ActuatorError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum ReasoningError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Malformed response from reasoning service: {0}")]
    MalformedResponse(String),

    #[error("Reasoning service not configured: {0}")]
    NotConfigured(String),

    #[error("Network error: {0}")]
    Network(String),
}

#[derive(Debug, Clone, Error)]
pub enum EmbeddingError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Embedding service returned no vector for input")]
    EmptyResponse,

    #[error("Embedding service not configured: {0}")]
    NotConfigured(String),

    #[error("Network error: {0}")]
    Network(String),
}

#[derive(Debug, Error)]
pub enum MemoryError {
    /// Two embeddings from different embedding spaces were mixed.
    /// Always fatal to the call that detected it.
    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Embedding generation failed: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("Storage error: {0}")]
    Storage(String),
}

#[derive(Debug, Error)]
pub enum SensorError {
    #[error("Sensor collection failed: {sensor} — {reason}")]
    CollectionFailed { sensor: String, reason: String },
}

#[derive(Debug, Error)]
pub enum ActuatorError {
    #[error("No actuator exposes function: {0}")]
    UnknownFunction(String),

    #[error("Duplicate tool name at registration: {tool} (already owned by {owner})")]
    DuplicateTool { tool: String, owner: String },

    #[error("Missing required parameter: {function} needs {parameter}")]
    MissingParameter { function: String, parameter: String },

    #[error("Action execution failed: {function} — {reason}")]
    ExecutionFailed { function: String, reason: String },

    #[error("Invalid tool arguments: {0}")]
    InvalidArguments(String),
}
