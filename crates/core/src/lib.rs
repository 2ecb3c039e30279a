//! # Percept Core
//!
//! Domain types, traits, and error definitions for the Percept agent runtime.
//! This crate has **zero framework dependencies** — it defines the domain model
//! that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! Every external collaborator (reasoning service, embedding service, sensors,
//! actuators) is defined as a trait here. Implementations live in their
//! respective crates. This enables:
//! - Swapping implementations via configuration
//! - Easy testing with mock/stub implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod actuator;
pub mod character;
pub mod error;
pub mod interaction;
pub mod reasoning;
pub mod sensor;

// Re-export key types at crate root for ergonomics
pub use actuator::{Actuator, ToolRegistry};
pub use character::AgentCharacter;
pub use error::{Error, Result};
pub use interaction::{ActionEvent, Interaction, SensoryEvent, Thought, ToolRequest};
pub use reasoning::{
    CompletionRequest, CompletionResponse, EmbeddingService, ReasoningService, ToolDefinition,
    ToolInvocation,
};
pub use sensor::Sensor;
