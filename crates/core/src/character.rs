//! Agent character — the named persona behind the system prompt.

use serde::{Deserialize, Serialize};

/// The agent's persona. The description becomes the behavioral preamble of
/// every system prompt the Brain assembles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentCharacter {
    /// The agent's name.
    pub name: String,
}

impl AgentCharacter {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Behavioral instructions rendered from the persona.
    ///
    /// Asks the model to reason inside `<think>` tags and to report a
    /// significance estimate for the triggering input inside an
    /// `<importance>` tag, which the Brain parses for long-term ranking.
    pub fn description(&self) -> String {
        format!(
            "You are a highly capable reasoning AI agent with integrated tool use functionality. \
             Your name is \"{name}\".\n\
             When you receive input, first analyze whether external tools are needed to react \
             completely and accurately. If so, request a tool call using the provided function \
             definitions with the specified parameters.\n\
             Always include a dedicated internal reasoning section between `<think>` and \
             `</think>` tags before any tool invocation. After reasoning, rate how significant \
             this input is for your long-term memory on a 0.0-1.0 scale inside `<importance>` \
             and `</importance>` tags. Ensure your response remains clear, logically structured, \
             and concise. If no tool is required, proceed with your internal reasoning and \
             respond directly.",
            name = self.name
        )
    }
}

impl Default for AgentCharacter {
    fn default() -> Self {
        Self::new("Percept")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_embeds_name_and_tags() {
        let character = AgentCharacter::new("AgentOne");
        let desc = character.description();
        assert!(desc.contains("\"AgentOne\""));
        assert!(desc.contains("<think>"));
        assert!(desc.contains("<importance>"));
    }
}
