//! Actuator trait and the tool registry.
//!
//! Actuators are what give the agent the ability to act in the world. Each
//! actuator exposes one or more callable tools; executing a tool performs the
//! side effect and returns an [`ActionEvent`] describing what happened — the
//! action's narrative is itself a memory artifact, never a bare
//! success/failure boolean.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::info;

use crate::error::ActuatorError;
use crate::interaction::ActionEvent;
use crate::reasoning::ToolDefinition;

/// The core Actuator trait.
#[async_trait]
pub trait Actuator: Send + Sync {
    /// A unique name for this actuator (e.g., "message_box").
    fn name(&self) -> &str;

    /// Human-readable description of this actuator's capability.
    /// Included in the capability catalog sent to the reasoning service.
    fn description(&self) -> &str;

    /// The tools this actuator exposes to the reasoning service.
    fn tool_definitions(&self) -> Vec<ToolDefinition>;

    /// Perform the side effect for one of this actuator's tools and return
    /// the ActionEvent describing what was done.
    async fn execute(
        &self,
        function: &str,
        parameters: BTreeMap<String, String>,
    ) -> std::result::Result<ActionEvent, ActuatorError>;
}

/// Registry mapping tool names to their owning actuators.
///
/// Rebuilt whenever the actuator set changes. Registration fails on a
/// duplicate tool name so an ambiguous configuration is detected up front
/// instead of silently picking whichever actuator registered first.
pub struct ToolRegistry {
    actuators: Vec<Arc<dyn Actuator>>,
    by_tool: HashMap<String, Arc<dyn Actuator>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            actuators: Vec::new(),
            by_tool: HashMap::new(),
        }
    }

    /// Register an actuator and index all of its tools.
    pub fn register(&mut self, actuator: Arc<dyn Actuator>) -> Result<(), ActuatorError> {
        for def in actuator.tool_definitions() {
            if let Some(owner) = self.by_tool.get(&def.name) {
                return Err(ActuatorError::DuplicateTool {
                    tool: def.name,
                    owner: owner.name().to_string(),
                });
            }
            self.by_tool.insert(def.name.clone(), Arc::clone(&actuator));
        }
        info!(actuator = %actuator.name(), "Registered actuator");
        self.actuators.push(actuator);
        Ok(())
    }

    /// Resolve the actuator that owns the given tool name.
    pub fn resolve(&self, tool_name: &str) -> Option<&Arc<dyn Actuator>> {
        self.by_tool.get(tool_name)
    }

    /// All registered actuators, in registration order.
    pub fn actuators(&self) -> &[Arc<dyn Actuator>] {
        &self.actuators
    }

    /// All tool definitions across every registered actuator.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.actuators
            .iter()
            .flat_map(|a| a.tool_definitions())
            .collect()
    }

    /// Number of registered actuators.
    pub fn len(&self) -> usize {
        self.actuators.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.actuators.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
