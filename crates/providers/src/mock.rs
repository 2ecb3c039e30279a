//! Deterministic mock services for offline runs and tests.
//!
//! [`MockEmbedding`] approximates semantic similarity with word-based
//! features instead of a real model, so the memory system can be exercised
//! end to end without network access. [`MockReasoning`] replays scripted
//! responses.

use async_trait::async_trait;
use percept_core::error::{EmbeddingError, ReasoningError};
use percept_core::reasoning::{
    CompletionRequest, CompletionResponse, EmbeddingService, ReasoningService,
};
use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;

const MOCK_DIMENSION: usize = 100;

/// A hash-based embedding generator.
///
/// Features 0-9 flag common words, 10-19 flag topic clusters, 20-99 take
/// word-hash counts. The result is L2-normalized. Crude, but it preserves
/// the property that texts sharing vocabulary land near each other.
pub struct MockEmbedding;

#[async_trait]
impl EmbeddingService for MockEmbedding {
    fn name(&self) -> &str {
        "mock"
    }

    fn dimension(&self) -> usize {
        MOCK_DIMENSION
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Ok(mock_embedding(text))
    }
}

fn mock_embedding(text: &str) -> Vec<f32> {
    let mut embedding = vec![0.0f32; MOCK_DIMENSION];
    if text.trim().is_empty() {
        return embedding;
    }

    let lowered = text.to_lowercase();
    let words: Vec<&str> = lowered
        .split(|c: char| c == ' ' || c == '.' || c == ',' || c == '!' || c == '?')
        .filter(|w| !w.is_empty())
        .collect();
    let word_set: HashSet<&str> = words.iter().copied().collect();

    // Features 0-9: common word presence
    let common_words = [
        "name", "project", "help", "remember", "color", "prefer", "deadline", "weather", "love",
        "need",
    ];
    for (i, word) in common_words.iter().enumerate() {
        if word_set.contains(word) {
            embedding[i] = 1.0;
        }
    }

    // Features 10-19: topic indicators
    let topics: [&[&str]; 7] = [
        &["programming", "code", "debug", "debugging", "python", "javascript", "project", "ai"],
        &["name", "alice", "bob", "called"],
        &["color", "blue", "red", "green", "favorite"],
        &["deadline", "friday", "monday", "next", "week"],
        &["weather", "rain", "sunny", "nice", "today"],
        &["help", "need", "request", "please"],
        &["prefer", "like", "love", "favorite", "enjoy"],
    ];
    for (i, topic) in topics.iter().enumerate() {
        if topic.iter().any(|w| word_set.contains(w)) {
            embedding[10 + i] = 1.0;
        }
    }

    // Features 20-99: word hashing for additional signal
    for word in &words {
        let hash = (fnv1a(word) % 80) as usize;
        embedding[20 + hash] += 0.1;
    }

    // L2 normalize
    let magnitude = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
    if magnitude > 0.0 {
        for value in &mut embedding {
            *value /= magnitude;
        }
    }

    embedding
}

// Stable across platforms, unlike DefaultHasher.
fn fnv1a(text: &str) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in text.bytes() {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

/// A reasoning service that replays scripted responses in order.
///
/// Once the script is exhausted it returns an idle thought with no tool
/// calls, so loop tests terminate cleanly.
pub struct MockReasoning {
    script: Mutex<VecDeque<Result<CompletionResponse, ReasoningError>>>,
}

impl MockReasoning {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
        }
    }

    /// Queue a successful response.
    pub fn with_response(self, response: CompletionResponse) -> Self {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(Ok(response));
        }
        self
    }

    /// Queue a failure.
    pub fn with_failure(self, error: ReasoningError) -> Self {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(Err(error));
        }
        self
    }
}

impl Default for MockReasoning {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReasoningService for MockReasoning {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(
        &self,
        _request: CompletionRequest,
    ) -> Result<CompletionResponse, ReasoningError> {
        let scripted = self
            .script
            .lock()
            .map_err(|_| ReasoningError::NotConfigured("mock script poisoned".into()))?
            .pop_front();

        scripted.unwrap_or_else(|| {
            Ok(CompletionResponse {
                text: "<think>Nothing to do.</think><importance>0.2</importance>".into(),
                tool_calls: Vec::new(),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use percept_core::reasoning::ToolInvocation;

    #[tokio::test]
    async fn mock_embedding_is_deterministic_and_normalized() {
        let svc = MockEmbedding;
        let a = svc.embed("My name is Alice").await.unwrap();
        let b = svc.embed("My name is Alice").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), MOCK_DIMENSION);

        let magnitude = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((magnitude - 1.0).abs() < 1e-4);
    }

    #[tokio::test]
    async fn blank_text_embeds_to_zero_vector() {
        let svc = MockEmbedding;
        let v = svc.embed("  ").await.unwrap();
        assert!(v.iter().all(|x| *x == 0.0));
    }

    #[tokio::test]
    async fn shared_vocabulary_scores_higher() {
        let name_a = mock_embedding("My name is Alice");
        let name_q = mock_embedding("What is your name?");
        let weather = mock_embedding("The weather is nice");

        let dot = |a: &[f32], b: &[f32]| -> f32 { a.iter().zip(b).map(|(x, y)| x * y).sum() };
        assert!(dot(&name_q, &name_a) > dot(&name_q, &weather));
    }

    #[tokio::test]
    async fn mock_reasoning_replays_script_then_idles() {
        let svc = MockReasoning::new()
            .with_response(CompletionResponse {
                text: "scripted".into(),
                tool_calls: vec![ToolInvocation {
                    name: "send_message".into(),
                    arguments: "{}".into(),
                }],
            })
            .with_failure(ReasoningError::Network("down".into()));

        let request = CompletionRequest {
            system: String::new(),
            input: String::new(),
            tools: vec![],
        };

        let first = svc.complete(request.clone()).await.unwrap();
        assert_eq!(first.text, "scripted");
        assert_eq!(first.tool_calls.len(), 1);

        assert!(svc.complete(request.clone()).await.is_err());

        let idle = svc.complete(request).await.unwrap();
        assert!(idle.tool_calls.is_empty());
    }
}
