//! The Brain — Percept's reasoning gateway.
//!
//! Composes a system prompt from the agent's character, its capability
//! catalogs, and the working-memory transcript, invokes the external
//! reasoning service, and returns a structured [`Thought`]. The Brain never
//! mutates memory and never fails upward: a reasoning failure degrades to a
//! thought with no tool calls.

pub mod prompt;

use std::sync::Arc;

use percept_core::actuator::Actuator;
use percept_core::character::AgentCharacter;
use percept_core::interaction::{Interaction, SensoryEvent, Thought, ToolRequest};
use percept_core::reasoning::{CompletionRequest, ReasoningService, ToolDefinition};
use percept_core::sensor::Sensor;
use tracing::{debug, warn};

/// Default importance for sensory input when the model doesn't report one.
const DEFAULT_SENSORY_IMPORTANCE: f32 = 0.5;

/// The reasoning gateway.
pub struct Brain {
    reasoning: Arc<dyn ReasoningService>,
    character: AgentCharacter,
}

impl Brain {
    pub fn new(reasoning: Arc<dyn ReasoningService>, character: AgentCharacter) -> Self {
        Self { reasoning, character }
    }

    /// Reason about one piece of sensory data.
    ///
    /// A pure function of its inputs (modulo network I/O): memory is read by
    /// the caller, never here. On any service failure the returned Thought
    /// encodes the failure reason and requests no actions — the tick
    /// degrades to "no action" instead of crashing.
    pub async fn think(
        &self,
        sensory: &SensoryEvent,
        actuators: &[Arc<dyn Actuator>],
        sensors: &[Arc<dyn Sensor>],
        working_memory: &[Arc<Interaction>],
    ) -> Thought {
        let system = prompt::build_system_prompt(&self.character, actuators, sensors, working_memory);
        let tools: Vec<ToolDefinition> = actuators.iter().flat_map(|a| a.tool_definitions()).collect();

        let request = CompletionRequest {
            system,
            input: sensory.processing_instructions.clone(),
            tools,
        };

        match self.reasoning.complete(request).await {
            Ok(response) => {
                let importance = parse_importance(&response.text)
                    .unwrap_or(DEFAULT_SENSORY_IMPORTANCE);
                debug!(
                    source = %sensory.source,
                    tool_calls = response.tool_calls.len(),
                    importance,
                    "Reasoning completed"
                );
                Thought {
                    internal_text: response.text,
                    tool_calls: response
                        .tool_calls
                        .into_iter()
                        .map(|tc| ToolRequest {
                            name: tc.name,
                            arguments: tc.arguments,
                        })
                        .collect(),
                    importance_score: importance,
                }
            }
            Err(e) => {
                warn!(source = %sensory.source, error = %e, "Reasoning failed, degrading to no action");
                Thought::from_failure(e)
            }
        }
    }
}

/// Extract the model's `<importance>…</importance>` estimate, clamped to
/// [0, 1]. Absent or unparseable tags yield None.
fn parse_importance(text: &str) -> Option<f32> {
    let start = text.find("<importance>")? + "<importance>".len();
    let end = text[start..].find("</importance>")? + start;
    let value: f32 = text[start..end].trim().parse().ok()?;
    Some(value.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use percept_core::error::ReasoningError;
    use percept_core::reasoning::{CompletionResponse, ToolInvocation};
    use percept_providers::MockReasoning;

    fn sensory(text: &str) -> SensoryEvent {
        SensoryEvent::new("test", text.to_string(), text.to_string())
    }

    #[test]
    fn importance_parses_and_clamps() {
        assert_eq!(parse_importance("<importance>0.8</importance>"), Some(0.8));
        assert_eq!(parse_importance("pre <importance> 0.3 </importance> post"), Some(0.3));
        assert_eq!(parse_importance("<importance>7</importance>"), Some(1.0));
        assert_eq!(parse_importance("<importance>abc</importance>"), None);
        assert_eq!(parse_importance("no tags at all"), None);
    }

    #[tokio::test]
    async fn successful_reasoning_carries_tool_calls() {
        let reasoning = Arc::new(MockReasoning::new().with_response(CompletionResponse {
            text: "<think>Reply to Bob.</think><importance>0.8</importance>".into(),
            tool_calls: vec![ToolInvocation {
                name: "send_message".into(),
                arguments: r#"{"recipient":"Bob","content":"hi"}"#.into(),
            }],
        }));
        let brain = Brain::new(reasoning, AgentCharacter::new("Tester"));

        let thought = brain.think(&sensory("a message arrived"), &[], &[], &[]).await;
        assert_eq!(thought.tool_calls.len(), 1);
        assert_eq!(thought.tool_calls[0].name, "send_message");
        assert!((thought.importance_score - 0.8).abs() < 1e-6);
    }

    #[tokio::test]
    async fn missing_importance_falls_back_to_default() {
        let reasoning = Arc::new(MockReasoning::new().with_response(CompletionResponse {
            text: "<think>Just noting this.</think>".into(),
            tool_calls: vec![],
        }));
        let brain = Brain::new(reasoning, AgentCharacter::new("Tester"));

        let thought = brain.think(&sensory("input"), &[], &[], &[]).await;
        assert!((thought.importance_score - DEFAULT_SENSORY_IMPORTANCE).abs() < 1e-6);
    }

    #[tokio::test]
    async fn reasoning_failure_degrades_to_no_action() {
        let reasoning = Arc::new(
            MockReasoning::new().with_failure(ReasoningError::Network("unreachable".into())),
        );
        let brain = Brain::new(reasoning, AgentCharacter::new("Tester"));

        let thought = brain.think(&sensory("input"), &[], &[], &[]).await;
        assert!(thought.tool_calls.is_empty());
        assert!(thought.internal_text.contains("unreachable"));
    }
}
