//! Message-box sensor/actuator pair — the agent's link to its peers.

use async_trait::async_trait;
use chrono::Utc;
use percept_core::actuator::Actuator;
use percept_core::error::ActuatorError;
use percept_core::interaction::{ActionEvent, SensoryEvent};
use percept_core::reasoning::ToolDefinition;
use percept_core::sensor::Sensor;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

use crate::mesh::{Mailbox, Mesh, MeshMessage};

pub const SEND_MESSAGE_TOOL: &str = "send_message";

/// Perceives messages addressed to this agent's mailbox.
pub struct MessageBoxSensor {
    mailbox: Arc<Mailbox>,
}

impl MessageBoxSensor {
    pub fn new(mailbox: Arc<Mailbox>) -> Self {
        Self { mailbox }
    }
}

impl Sensor for MessageBoxSensor {
    fn name(&self) -> &str {
        "message_box"
    }

    fn description(&self) -> &str {
        "You can receive messages to your message box with your name. \
         Other agents can send you messages."
    }

    fn try_collect(&self) -> Option<SensoryEvent> {
        let message = self.mailbox.collect()?;
        let received_at = Utc::now();

        let processing_instructions = format!(
            "You sensed new data from the Message Box sensor.\n\
             You have received a message from an agent named \"{sender}\".\n\
             The content of the message is within the <MessageContent></MessageContent> XML tags.\n\
             <MessageContent>{text}</MessageContent>\n\n\
             Think about the message carefully. How do you want to react to it?",
            sender = message.sender,
            text = message.text,
        );
        let recall = format!(
            "[{}] Received message from {}: \"{}\"",
            received_at.format("%Y-%m-%d %H:%M:%S"),
            message.sender,
            message.text,
        );

        // The recall line and the stored timestamp must agree.
        let mut event = SensoryEvent::new(self.name(), processing_instructions, recall);
        event.timestamp = received_at;
        Some(event)
    }
}

/// Sends messages to other agents' mailboxes by name.
pub struct MessageBoxActuator {
    mesh: Arc<dyn Mesh>,
    sender_name: String,
}

impl MessageBoxActuator {
    pub fn new(mesh: Arc<dyn Mesh>, sender_name: impl Into<String>) -> Self {
        Self {
            mesh,
            sender_name: sender_name.into(),
        }
    }

    fn require<'a>(
        parameters: &'a BTreeMap<String, String>,
        key: &str,
    ) -> Result<&'a str, ActuatorError> {
        parameters
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| ActuatorError::MissingParameter {
                function: SEND_MESSAGE_TOOL.into(),
                parameter: key.into(),
            })
    }
}

#[async_trait]
impl Actuator for MessageBoxActuator {
    fn name(&self) -> &str {
        "message_box"
    }

    fn description(&self) -> &str {
        "Allows sending of messages to a message box by its name. \
         You can send messages to other agents."
    }

    fn tool_definitions(&self) -> Vec<ToolDefinition> {
        vec![ToolDefinition {
            name: SEND_MESSAGE_TOOL.into(),
            description: "Sends a message to a specified message box.".into(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "recipient": {
                        "type": "string",
                        "description": "The name of the target message box, e.g. \"Agent Smith\". \
                                        Case and whitespace sensitive."
                    },
                    "content": {
                        "type": "string",
                        "description": "Content of the sent message."
                    }
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
        if function != SEND_MESSAGE_TOOL {
            return Err(ActuatorError::UnknownFunction(function.to_string()));
        }

        let recipient = Self::require(&parameters, "recipient")?.to_string();
        let content = Self::require(&parameters, "content")?.to_string();

        self.mesh
            .tell(
                &recipient,
                MeshMessage {
                    sender: self.sender_name.clone(),
                    text: content.clone(),
                },
            )
            .map_err(|e| ActuatorError::ExecutionFailed {
                function: SEND_MESSAGE_TOOL.into(),
                reason: e.to_string(),
            })?;

        info!(recipient = %recipient, "Sent mesh message");

        let event = ActionEvent::new(SEND_MESSAGE_TOOL, parameters);
        let timestamp = event.timestamp.format("%Y-%m-%d %H:%M:%S");
        Ok(event.with_narrative(
            format!("You sent a message to {recipient}: \"{content}\""),
            format!("[{timestamp}] Sent message to {recipient}: \"{content}\""),
        ))
    }
}
