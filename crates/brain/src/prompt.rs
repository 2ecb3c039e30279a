//! System prompt assembly.
//!
//! The prompt has three parts: the character's behavioral instructions, the
//! capability catalog (every actuator with its tools and parameter
//! descriptions, plus sensor descriptions), and the working-memory transcript
//! rendered in chronological order, oldest first.

use percept_core::actuator::Actuator;
use percept_core::character::AgentCharacter;
use percept_core::interaction::Interaction;
use percept_core::sensor::Sensor;
use std::sync::Arc;

pub fn build_system_prompt(
    character: &AgentCharacter,
    actuators: &[Arc<dyn Actuator>],
    sensors: &[Arc<dyn Sensor>],
    working_memory: &[Arc<Interaction>],
) -> String {
    let mut prompt = String::with_capacity(4096);

    prompt.push_str(&character.description());
    prompt.push_str("\n\n");

    prompt.push_str("<capabilities>\n");
    if actuators.is_empty() {
        prompt.push_str("You have no actuators; you can only observe.\n");
    } else {
        prompt.push_str("Your actuators:\n");
        for actuator in actuators {
            prompt.push_str(&format!("- {}: {}\n", actuator.name(), actuator.description()));
            for def in actuator.tool_definitions() {
                prompt.push_str(&format!("  - tool `{}`: {}\n", def.name, def.description));
                for (param, desc) in parameter_descriptions(&def.parameters) {
                    prompt.push_str(&format!("    - {param}: {desc}\n"));
                }
            }
        }
    }
    if !sensors.is_empty() {
        prompt.push_str("Your sensors:\n");
        for sensor in sensors {
            prompt.push_str(&format!("- {}: {}\n", sensor.name(), sensor.description()));
        }
    }
    prompt.push_str("</capabilities>\n");

    if !working_memory.is_empty() {
        prompt.push_str("\n<memory>\n");
        prompt.push_str("What you remember, oldest first:\n");
        for interaction in working_memory {
            prompt.push_str(interaction.recall());
            prompt.push('\n');
            if let Some(thought) = interaction.thought() {
                if !thought.internal_text.is_empty() {
                    prompt.push_str(&format!("  (your thought: {})\n", thought.internal_text));
                }
            }
        }
        prompt.push_str("</memory>\n");
    }

    prompt
}

/// Pull `name: description` pairs out of a JSON-schema parameter object.
fn parameter_descriptions(schema: &serde_json::Value) -> Vec<(String, String)> {
    let Some(properties) = schema.get("properties").and_then(|p| p.as_object()) else {
        return Vec::new();
    };

    properties
        .iter()
        .map(|(name, spec)| {
            let desc = spec
                .get("description")
                .and_then(|d| d.as_str())
                .unwrap_or("")
                .to_string();
            (name.clone(), desc)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use percept_core::error::ActuatorError;
    use percept_core::interaction::{ActionEvent, SensoryEvent};
    use percept_core::reasoning::ToolDefinition;
    use std::collections::BTreeMap;

    struct FakeActuator;

    #[async_trait]
    impl Actuator for FakeActuator {
        fn name(&self) -> &str {
            "message_box"
        }

        fn description(&self) -> &str {
            "Sends messages to other agents by message box name"
        }

        fn tool_definitions(&self) -> Vec<ToolDefinition> {
            vec![ToolDefinition {
                name: "send_message".into(),
                description: "Sends a message to a named message box".into(),
                parameters: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "recipient": { "type": "string", "description": "Target message box name" },
                        "content": { "type": "string", "description": "Message content" }
                    },
                    "required": ["recipient", "content"]
                }),
            }]
        }

        async fn execute(
            &self,
            function: &str,
            parameters: BTreeMap<String, String>,
        ) -> Result<ActionEvent, ActuatorError> {
            Ok(ActionEvent::new(function, parameters))
        }
    }

    struct FakeSensor;

    impl Sensor for FakeSensor {
        fn name(&self) -> &str {
            "message_box"
        }

        fn description(&self) -> &str {
            "Receives messages addressed to this agent"
        }

        fn try_collect(&self) -> Option<SensoryEvent> {
            None
        }
    }

    #[test]
    fn prompt_contains_catalog_and_memory() {
        let character = AgentCharacter::new("AgentOne");
        let actuators: Vec<Arc<dyn Actuator>> = vec![Arc::new(FakeActuator)];
        let sensors: Vec<Arc<dyn Sensor>> = vec![Arc::new(FakeSensor)];
        let memory: Vec<Arc<Interaction>> = vec![
            Arc::new(SensoryEvent::new("message_box", "msg arrived", "[t0] Received: hi").into()),
            Arc::new(ActionEvent::new("send_message", BTreeMap::new()).into()),
        ];

        let prompt = build_system_prompt(&character, &actuators, &sensors, &memory);

        assert!(prompt.contains("\"AgentOne\""));
        assert!(prompt.contains("send_message"));
        assert!(prompt.contains("Target message box name"));
        assert!(prompt.contains("Receives messages addressed to this agent"));

        // Transcript is chronological, oldest first.
        let received = prompt.find("[t0] Received: hi").unwrap();
        let acted = prompt.find("Action: send_message").unwrap();
        assert!(received < acted);
    }

    #[test]
    fn empty_memory_omits_transcript_section() {
        let character = AgentCharacter::new("AgentOne");
        let prompt = build_system_prompt(&character, &[], &[], &[]);
        assert!(!prompt.contains("<memory>"));
        assert!(prompt.contains("no actuators"));
    }
}
