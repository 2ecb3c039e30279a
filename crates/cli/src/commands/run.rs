//! `percept run` — Start the agent loop.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use percept_agent::AgentLoop;
use percept_brain::Brain;
use percept_config::AppConfig;
use percept_core::reasoning::{EmbeddingService, ReasoningService};
use percept_core::sensor::Sensor;
use percept_core::{AgentCharacter, ToolRegistry};
use percept_memory::{LongTermMemory, ShortTermMemory};
use percept_providers::{MockEmbedding, MockReasoning, OpenAiCompatService};
use percept_senses::{LocalMesh, Mesh, MessageBoxActuator, MessageBoxSensor, TimeSensor};
use tokio::sync::watch;
use tracing::info;

pub async fn run(config_path: Option<PathBuf>, mock: bool) -> Result<(), Box<dyn std::error::Error>> {
    let path = config_path.unwrap_or_else(AppConfig::default_path);
    let config = AppConfig::load(Some(&path))?;

    info!(agent = %config.agent_name, "Starting agent");

    let (reasoning, embedding): (Arc<dyn ReasoningService>, Arc<dyn EmbeddingService>) =
        if mock || config.provider.api_key.is_none() {
            info!("No API key configured, using mock services");
            (Arc::new(MockReasoning::new()), Arc::new(MockEmbedding))
        } else {
            let service = Arc::new(OpenAiCompatService::new(
                "openai-compat",
                config.provider.base_url.clone(),
                config.provider.api_key.clone().unwrap_or_default(),
                config.provider.chat_model.clone(),
                config.provider.embedding_model.clone(),
                config.provider.embedding_dimension,
            )?);
            (
                Arc::clone(&service) as Arc<dyn ReasoningService>,
                service as Arc<dyn EmbeddingService>,
            )
        };

    let mesh: Arc<dyn Mesh> = Arc::new(LocalMesh::new());
    let mailbox = mesh.at(&config.agent_name);

    let mut sensors: Vec<Arc<dyn Sensor>> = vec![Arc::new(MessageBoxSensor::new(mailbox))];
    if config.runtime.time_sensor_secs > 0 {
        sensors.push(Arc::new(TimeSensor::new(chrono::Duration::seconds(
            config.runtime.time_sensor_secs as i64,
        ))));
    }

    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(MessageBoxActuator::new(
        Arc::clone(&mesh),
        config.agent_name.clone(),
    )))?;

    let brain = Brain::new(reasoning, AgentCharacter::new(config.agent_name.clone()));
    let short_term = ShortTermMemory::new(config.memory.short_term_capacity);
    let long_term = Arc::new(LongTermMemory::new(embedding));

    let mut agent = AgentLoop::new(brain, sensors, registry, short_term, long_term)
        .with_recall_limit(config.memory.recall_limit)
        .with_tick_interval(Duration::from_millis(config.runtime.tick_interval_ms));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown signal received");
            let _ = shutdown_tx.send(true);
        }
    });

    agent.run(shutdown_rx).await;
    Ok(())
}
