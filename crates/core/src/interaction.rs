//! The Interaction model — the shared entity type for anything placed in memory.
//!
//! An [`Interaction`] is a single unit of agent experience: either sensory
//! input received from the environment ([`SensoryEvent`]) or an action the
//! agent has taken ([`ActionEvent`]). Both memory tiers store interactions,
//! and the working-memory transcript handed to the reasoning service is a
//! chronological sequence of them.
//!
//! Consumers switch on the variant tag; there is no virtual dispatch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

/// A single unit of agent experience.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Interaction {
    /// Input sensed from the environment.
    Sensory(SensoryEvent),
    /// An action the agent performed.
    Action(ActionEvent),
}

impl Interaction {
    /// When this interaction occurred (UTC). Immutable once set.
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Interaction::Sensory(e) => e.timestamp,
            Interaction::Action(e) => e.timestamp,
        }
    }

    /// Instructions for how the reasoning service should process this interaction.
    pub fn processing_instructions(&self) -> &str {
        match self {
            Interaction::Sensory(e) => &e.processing_instructions,
            Interaction::Action(e) => &e.processing_instructions,
        }
    }

    /// A concise string representation for memory recall.
    pub fn recall(&self) -> &str {
        match self {
            Interaction::Sensory(e) => &e.recall,
            Interaction::Action(e) => &e.recall,
        }
    }

    /// The thought generated in response to this interaction (if any).
    pub fn thought(&self) -> Option<&Thought> {
        match self {
            Interaction::Sensory(e) => e.thought.as_ref(),
            Interaction::Action(e) => e.thought.as_ref(),
        }
    }

    /// Attach the thought produced for this interaction.
    ///
    /// Set at most once, after reasoning completes and before the interaction
    /// is persisted to either memory tier. A second attempt is ignored.
    pub fn attach_thought(&mut self, thought: Thought) {
        let slot = match self {
            Interaction::Sensory(e) => &mut e.thought,
            Interaction::Action(e) => &mut e.thought,
        };
        if slot.is_some() {
            warn!(recall = %self.recall(), "Thought already attached, ignoring");
            return;
        }
        *slot = Some(thought);
    }
}

/// Sensory input received from a sensor. Input TO the agent from the environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensoryEvent {
    /// When this data was sensed (UTC).
    pub timestamp: DateTime<Utc>,

    /// Name of the producing sensor. Diagnostics only — never used for lifecycle.
    pub source: String,

    /// Instructions for the reasoning service, rendered by the sensor at creation.
    pub processing_instructions: String,

    /// Compact recall text for memory display.
    pub recall: String,

    /// The thought generated in response (set once, after reasoning).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thought: Option<Thought>,
}

impl SensoryEvent {
    /// Create a new sensory event, timestamped now.
    pub fn new(
        source: impl Into<String>,
        processing_instructions: impl Into<String>,
        recall: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            source: source.into(),
            processing_instructions: processing_instructions.into(),
            recall: recall.into(),
            thought: None,
        }
    }
}

impl From<SensoryEvent> for Interaction {
    fn from(event: SensoryEvent) -> Self {
        Interaction::Sensory(event)
    }
}

/// An action that was taken by the agent, produced by an actuator after it
/// performed work. Stored in memory so the agent can recall what it has done.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionEvent {
    /// When this action was performed (UTC).
    pub timestamp: DateTime<Utc>,

    /// The executed function name.
    pub action_name: String,

    /// String-keyed parameters the action was invoked with.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, String>,

    /// Instructions for the reasoning service.
    pub processing_instructions: String,

    /// Compact recall text for memory display.
    pub recall: String,

    /// The locally synthesized thought (set once, by the agent loop).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thought: Option<Thought>,
}

impl ActionEvent {
    /// Create an action event with default narrative texts derived from the
    /// action name and parameters.
    pub fn new(action_name: impl Into<String>, parameters: BTreeMap<String, String>) -> Self {
        let action_name = action_name.into();
        let timestamp = Utc::now();
        let params_text = render_parameters(&parameters);

        let processing_instructions = if params_text.is_empty() {
            format!("You took action: {action_name}")
        } else {
            format!("You took action: {action_name} with parameters: {params_text}")
        };
        let recall = if params_text.is_empty() {
            format!(
                "[{}] Action: {action_name}",
                timestamp.format("%Y-%m-%d %H:%M:%S")
            )
        } else {
            format!(
                "[{}] Action: {action_name} ({params_text})",
                timestamp.format("%Y-%m-%d %H:%M:%S")
            )
        };

        Self {
            timestamp,
            action_name,
            parameters,
            processing_instructions,
            recall,
            thought: None,
        }
    }

    /// Replace the default narrative with actuator-specific text.
    ///
    /// The narrative is itself a memory artifact, so actuators that can
    /// describe their effect more precisely should do so.
    pub fn with_narrative(
        mut self,
        processing_instructions: impl Into<String>,
        recall: impl Into<String>,
    ) -> Self {
        self.processing_instructions = processing_instructions.into();
        self.recall = recall.into();
        self
    }
}

impl From<ActionEvent> for Interaction {
    fn from(event: ActionEvent) -> Self {
        Interaction::Action(event)
    }
}

fn render_parameters(parameters: &BTreeMap<String, String>) -> String {
    parameters
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// The outcome of one reasoning pass over an interaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thought {
    /// Free-form reasoning narrative. May be empty.
    pub internal_text: String,

    /// Ordered sequence of requested actions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolRequest>,

    /// How significant the triggering interaction is, used for long-term
    /// ranking. Actions carry a fixed 0.7 by convention; sensory importance
    /// is model-provided.
    pub importance_score: f32,
}

impl Thought {
    /// Fixed importance attached to executed actions.
    pub const ACTION_IMPORTANCE: f32 = 0.7;

    /// Importance of a degraded thought produced from a reasoning failure.
    pub const FAILURE_IMPORTANCE: f32 = 0.1;

    /// Synthesize the thought attached to an executed action. No reasoning
    /// call is made for actions.
    pub fn for_action(action_name: &str) -> Self {
        Self {
            internal_text: format!("Executed action: {action_name}"),
            tool_calls: Vec::new(),
            importance_score: Self::ACTION_IMPORTANCE,
        }
    }

    /// Build a degraded thought that records a reasoning failure.
    /// The loop never crashes from a failed reasoning call; it degrades to
    /// "no action this tick".
    pub fn from_failure(reason: impl std::fmt::Display) -> Self {
        Self {
            internal_text: format!("Reasoning failed: {reason}"),
            tool_calls: Vec::new(),
            importance_score: Self::FAILURE_IMPORTANCE,
        }
    }
}

/// A single requested action inside a [`Thought`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolRequest {
    /// The function to invoke.
    pub name: String,

    /// JSON-encoded argument map (string keys, string values).
    pub arguments: String,
}
