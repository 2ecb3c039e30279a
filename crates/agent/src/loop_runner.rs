//! The perception-reasoning-action tick loop.
//!
//! One tick: poll every sensor, and for each that has data, assemble working
//! memory, ask the Brain what to do, execute the requested actions, and
//! persist both the sensory input and the resulting actions into both memory
//! tiers. Per-sensor failures are caught at the sensor boundary; nothing in
//! the tick terminates the loop except the external shutdown signal.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use percept_brain::Brain;
use percept_core::actuator::ToolRegistry;
use percept_core::error::Error;
use percept_core::interaction::{Interaction, SensoryEvent, Thought};
use percept_core::sensor::Sensor;
use percept_memory::{LongTermMemory, ShortTermMemory};
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Default number of long-term entries blended into working memory per tick.
const DEFAULT_RECALL_LIMIT: usize = 10;

/// Default pause between ticks.
const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(100);

/// The agent loop orchestrator.
///
/// Sensors, actuators, and memory tiers are explicit constructor inputs, not
/// globals, so the loop can be assembled and tested in isolation.
pub struct AgentLoop {
    brain: Brain,
    sensors: Vec<Arc<dyn Sensor>>,
    registry: ToolRegistry,
    short_term: ShortTermMemory,
    long_term: Arc<LongTermMemory>,
    recall_limit: usize,
    tick_interval: Duration,
}

impl AgentLoop {
    pub fn new(
        brain: Brain,
        sensors: Vec<Arc<dyn Sensor>>,
        registry: ToolRegistry,
        short_term: ShortTermMemory,
        long_term: Arc<LongTermMemory>,
    ) -> Self {
        Self {
            brain,
            sensors,
            registry,
            short_term,
            long_term,
            recall_limit: DEFAULT_RECALL_LIMIT,
            tick_interval: DEFAULT_TICK_INTERVAL,
        }
    }

    /// Set how many long-term entries may join working memory per tick.
    pub fn with_recall_limit(mut self, limit: usize) -> Self {
        self.recall_limit = limit;
        self
    }

    /// Set the pause between ticks.
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    /// Drive the loop until the shutdown signal flips to true.
    ///
    /// Cancellation is cooperative and checked only between ticks: an
    /// in-flight reasoning call, memory write, or actuator execution runs to
    /// completion once started.
    pub async fn run(&mut self, shutdown: watch::Receiver<bool>) {
        info!(
            sensors = self.sensors.len(),
            actuators = self.registry.len(),
            "Agent loop started"
        );

        while !*shutdown.borrow() {
            self.tick().await;
            tokio::time::sleep(self.tick_interval).await;
        }

        info!("Agent loop stopped");
    }

    /// One full pass over all sensors.
    ///
    /// Sensors are polled sequentially; each sensor's reasoning, actuator,
    /// and memory work is fully awaited before the next sensor. A failure
    /// while processing one sensor is logged and does not affect the others.
    pub async fn tick(&mut self) {
        let sensors = self.sensors.clone();
        for sensor in sensors {
            let Some(event) = sensor.try_collect() else {
                continue;
            };

            debug!(sensor = %sensor.name(), "Collected sensory data");
            if let Err(e) = self.process_sensory(event).await {
                warn!(sensor = %sensor.name(), error = %e, "Sensor processing failed, continuing");
            }
        }
    }

    /// Steps 2-5 of the tick for one piece of sensory data.
    async fn process_sensory(&mut self, event: SensoryEvent) -> Result<(), Error> {
        let working_memory = self.assemble_working_memory(&event.processing_instructions).await?;

        let thought = self
            .brain
            .think(&event, self.registry.actuators(), &self.sensors, &working_memory)
            .await;

        let tool_calls = thought.tool_calls.clone();
        let importance = thought.importance_score;

        let mut interaction: Interaction = event.into();
        interaction.attach_thought(thought);
        self.persist(Arc::new(interaction), importance).await?;

        for call in tool_calls {
            let Some(actuator) = self.registry.resolve(&call.name) else {
                warn!(tool = %call.name, "No actuator exposes requested tool, skipping");
                continue;
            };

            let parameters: BTreeMap<String, String> = match serde_json::from_str(&call.arguments)
            {
                Ok(map) => map,
                Err(e) => {
                    warn!(tool = %call.name, error = %e, "Malformed tool arguments, skipping call");
                    continue;
                }
            };

            let actuator = Arc::clone(actuator);
            let action = actuator.execute(&call.name, parameters).await?;
            debug!(action = %action.action_name, "Executed action");

            // No further reasoning for actions; the thought is synthesized
            // locally with the fixed action importance.
            let thought = Thought::for_action(&action.action_name);
            let importance = thought.importance_score;

            let mut interaction: Interaction = action.into();
            interaction.attach_thought(thought);
            self.persist(Arc::new(interaction), importance).await?;
        }

        Ok(())
    }

    /// Short-term recall merged with up to `recall_limit` relevant long-term
    /// entries, deduplicated by identity of the underlying interaction and
    /// ordered by timestamp, oldest first.
    async fn assemble_working_memory(
        &self,
        query: &str,
    ) -> Result<Vec<Arc<Interaction>>, Error> {
        let mut working = self.short_term.recall();

        let relevant = self.long_term.recall_relevant(query, self.recall_limit).await?;
        for interaction in relevant {
            if !working.iter().any(|w| Arc::ptr_eq(w, &interaction)) {
                working.push(interaction);
            }
        }

        // Long-term recalls are exactly the entries short-term no longer
        // holds, i.e. older ones; restore chronological order for the
        // transcript.
        working.sort_by_key(|interaction| interaction.timestamp());

        Ok(working)
    }

    /// Write one interaction into both memory tiers.
    async fn persist(
        &mut self,
        interaction: Arc<Interaction>,
        importance: f32,
    ) -> Result<(), Error> {
        if let Some(evicted) = self.short_term.remember(Arc::clone(&interaction)) {
            debug!(recall = %evicted.recall(), "Short-term memory evicted oldest interaction");
        }
        self.long_term.remember(interaction, importance).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use percept_core::character::AgentCharacter;
    use percept_core::error::{EmbeddingError, ReasoningError};
    use percept_core::reasoning::{
        CompletionRequest, CompletionResponse, EmbeddingService, ReasoningService, ToolInvocation,
    };
    use percept_providers::{MockEmbedding, MockReasoning};
    use percept_senses::{LocalMesh, Mesh, MessageBoxActuator, MessageBoxSensor, MeshMessage};
    use std::sync::Mutex;

    fn send_message_call(recipient: &str, content: &str) -> ToolInvocation {
        ToolInvocation {
            name: "send_message".into(),
            arguments: format!(r#"{{"recipient":"{recipient}","content":"{content}"}}"#),
        }
    }

    /// Records every system prompt it is asked to complete.
    #[derive(Default)]
    struct RecordingReasoning {
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ReasoningService for RecordingReasoning {
        fn name(&self) -> &str {
            "recording"
        }

        async fn complete(
            &self,
            request: CompletionRequest,
        ) -> Result<CompletionResponse, ReasoningError> {
            if let Ok(mut prompts) = self.prompts.lock() {
                prompts.push(request.system);
            }
            Ok(CompletionResponse { text: String::new(), tool_calls: vec![] })
        }
    }

    struct Fixture {
        mesh: Arc<LocalMesh>,
        long_term: Arc<LongTermMemory>,
    }

    fn agent_with(reasoning: MockReasoning) -> (AgentLoop, Fixture) {
        let mesh = Arc::new(LocalMesh::new());
        let mesh_dyn: Arc<dyn Mesh> = Arc::clone(&mesh) as Arc<dyn Mesh>;

        let sensor: Arc<dyn Sensor> = Arc::new(MessageBoxSensor::new(mesh.at("Alice")));
        let mut registry = ToolRegistry::new();
        registry
            .register(Arc::new(MessageBoxActuator::new(mesh_dyn, "Alice")))
            .unwrap();

        let long_term = Arc::new(LongTermMemory::new(Arc::new(MockEmbedding)));
        let brain = Brain::new(Arc::new(reasoning), AgentCharacter::new("Alice"));

        let agent = AgentLoop::new(
            brain,
            vec![sensor],
            registry,
            ShortTermMemory::new(200),
            Arc::clone(&long_term),
        );

        (agent, Fixture { mesh, long_term })
    }

    fn deliver(mesh: &LocalMesh, text: &str) {
        mesh.tell(
            "Alice",
            MeshMessage { sender: "Bob".into(), text: text.into() },
        )
        .unwrap();
    }

    #[tokio::test]
    async fn tick_executes_tool_call_and_persists_both_events() {
        let reasoning = MockReasoning::new().with_response(CompletionResponse {
            text: "<think>Reply politely.</think><importance>0.6</importance>".into(),
            tool_calls: vec![send_message_call("Bob", "hello Bob")],
        });
        let (mut agent, fx) = agent_with(reasoning);

        deliver(&fx.mesh, "hi Alice");
        agent.tick().await;

        // Sensory event + action event, in both tiers.
        assert_eq!(fx.long_term.count().await, 2);
        let all = fx.long_term.recall_all().await;
        assert!(all[0].recall().contains("Received message from Bob"));
        assert!(all[1].recall().contains("Sent message to Bob"));

        // Thoughts attached: model-provided importance for the sensory event,
        // fixed 0.7 for the action.
        let sensory_thought = all[0].thought().unwrap();
        assert!((sensory_thought.importance_score - 0.6).abs() < 1e-6);
        let action_thought = all[1].thought().unwrap();
        assert!((action_thought.importance_score - 0.7).abs() < 1e-6);
        assert!(action_thought.tool_calls.is_empty());

        // The actuator really ran.
        let delivered = fx.mesh.at("Bob").collect().unwrap();
        assert_eq!(delivered.sender, "Alice");
        assert_eq!(delivered.text, "hello Bob");
    }

    #[tokio::test]
    async fn reasoning_failure_still_persists_sensory_data() {
        let reasoning =
            MockReasoning::new().with_failure(ReasoningError::Network("model down".into()));
        let (mut agent, fx) = agent_with(reasoning);

        deliver(&fx.mesh, "are you there?");
        agent.tick().await;

        // Degraded thought, no action, sensory data captured.
        assert_eq!(fx.long_term.count().await, 1);
        let all = fx.long_term.recall_all().await;
        let thought = all[0].thought().unwrap();
        assert!(thought.tool_calls.is_empty());
        assert!(thought.internal_text.contains("model down"));
    }

    #[tokio::test]
    async fn unknown_tool_is_skipped_without_aborting() {
        let reasoning = MockReasoning::new().with_response(CompletionResponse {
            text: "<think>Try a tool nobody has.</think>".into(),
            tool_calls: vec![ToolInvocation { name: "fly".into(), arguments: "{}".into() }],
        });
        let (mut agent, fx) = agent_with(reasoning);

        deliver(&fx.mesh, "can you fly?");
        agent.tick().await;

        // Only the sensory event was stored; no action happened.
        assert_eq!(fx.long_term.count().await, 1);
    }

    #[tokio::test]
    async fn malformed_arguments_skip_only_that_call() {
        let reasoning = MockReasoning::new().with_response(CompletionResponse {
            text: "<think>Two calls, one broken.</think>".into(),
            tool_calls: vec![
                ToolInvocation { name: "send_message".into(), arguments: "not json".into() },
                send_message_call("Bob", "still delivered"),
            ],
        });
        let (mut agent, fx) = agent_with(reasoning);

        deliver(&fx.mesh, "two calls please");
        agent.tick().await;

        // Sensory + the one good action.
        assert_eq!(fx.long_term.count().await, 2);
        assert_eq!(fx.mesh.at("Bob").collect().unwrap().text, "still delivered");
    }

    #[tokio::test]
    async fn embedding_failure_is_contained_by_sensor_boundary() {
        struct FailingEmbedder;

        #[async_trait]
        impl EmbeddingService for FailingEmbedder {
            fn name(&self) -> &str {
                "failing"
            }
            fn dimension(&self) -> usize {
                4
            }
            async fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
                Err(EmbeddingError::Network("embedding service down".into()))
            }
        }

        let mesh = Arc::new(LocalMesh::new());
        let sensor: Arc<dyn Sensor> = Arc::new(MessageBoxSensor::new(mesh.at("Alice")));
        let long_term = Arc::new(LongTermMemory::new(Arc::new(FailingEmbedder)));
        let brain = Brain::new(Arc::new(MockReasoning::new()), AgentCharacter::new("Alice"));

        let mut agent = AgentLoop::new(
            brain,
            vec![sensor],
            ToolRegistry::new(),
            ShortTermMemory::new(200),
            Arc::clone(&long_term),
        );

        deliver(&mesh, "this will fail to embed");
        agent.tick().await; // must not panic

        // No partial long-term entry.
        assert_eq!(long_term.count().await, 0);
    }

    #[tokio::test]
    async fn working_memory_dedupes_long_term_against_short_term() {
        let recording = Arc::new(RecordingReasoning::default());

        let mesh = Arc::new(LocalMesh::new());
        let sensor: Arc<dyn Sensor> = Arc::new(MessageBoxSensor::new(mesh.at("Alice")));
        let long_term = Arc::new(LongTermMemory::new(Arc::new(MockEmbedding)));
        let brain = Brain::new(
            Arc::clone(&recording) as Arc<dyn ReasoningService>,
            AgentCharacter::new("Alice"),
        );

        let mut agent = AgentLoop::new(
            brain,
            vec![sensor],
            ToolRegistry::new(),
            ShortTermMemory::new(200),
            Arc::clone(&long_term),
        );

        // First tick stores one interaction in both tiers (the same Arc).
        deliver(&mesh, "my name is Bob remember it");
        agent.tick().await;

        // Second tick: that interaction is in short-term recall AND is the
        // best long-term match, but must appear in the prompt only once.
        deliver(&mesh, "what is my name");
        agent.tick().await;

        let prompts = recording.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 2);
        let occurrences = prompts[1].matches("my name is Bob remember it").count();
        assert_eq!(occurrences, 1, "deduplicated by identity, not duplicated");
    }

    #[tokio::test]
    async fn working_memory_transcript_is_chronological() {
        let recording = Arc::new(RecordingReasoning::default());

        let mesh = Arc::new(LocalMesh::new());
        let sensor: Arc<dyn Sensor> = Arc::new(MessageBoxSensor::new(mesh.at("Alice")));
        let long_term = Arc::new(LongTermMemory::new(Arc::new(MockEmbedding)));
        let brain = Brain::new(
            Arc::clone(&recording) as Arc<dyn ReasoningService>,
            AgentCharacter::new("Alice"),
        );

        // Capacity 1: older interactions survive only in long-term memory and
        // re-enter working memory through relevance recall.
        let mut agent = AgentLoop::new(
            brain,
            vec![sensor],
            ToolRegistry::new(),
            ShortTermMemory::new(1),
            long_term,
        );

        deliver(&mesh, "my name is Bob remember it");
        agent.tick().await;
        deliver(&mesh, "my project deadline is Friday");
        agent.tick().await;
        deliver(&mesh, "what is my name");
        agent.tick().await;

        // Third prompt: the Bob interaction comes from long-term recall, the
        // deadline interaction from short-term. Oldest must render first.
        let prompts = recording.prompts.lock().unwrap();
        let third = &prompts[2];
        let older = third
            .find("my name is Bob remember it")
            .expect("older memory recalled from long-term");
        let newer = third
            .find("my project deadline is Friday")
            .expect("newer memory held in short-term");
        assert!(older < newer, "transcript renders oldest first");
    }

    #[tokio::test]
    async fn run_stops_on_shutdown_signal() {
        let (mut agent, _fx) = agent_with(MockReasoning::new());

        let (tx, rx) = watch::channel(false);
        let handle = tokio::spawn(async move {
            agent.run(rx).await;
        });

        tokio::time::sleep(Duration::from_millis(50)).await;
        tx.send(true).unwrap();

        tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .expect("loop should stop after shutdown")
            .unwrap();
    }

    #[tokio::test]
    async fn quiet_sensors_are_skipped() {
        let (mut agent, fx) = agent_with(MockReasoning::new());

        // No pending message anywhere.
        agent.tick().await;
        assert_eq!(fx.long_term.count().await, 0);
    }
}
