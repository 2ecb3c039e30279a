//! Reasoning and embedding service implementations for Percept.

pub mod mock;
pub mod openai_compat;

pub use mock::{MockEmbedding, MockReasoning};
pub use openai_compat::OpenAiCompatService;
