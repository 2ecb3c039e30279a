//! `percept memory-demo` — Exercise the memory system offline.
//!
//! Stores a small graded corpus with mock embeddings, then runs a handful of
//! relevance queries and prints what came back. Useful for eyeballing the
//! similarity/importance blend without an API key.

use std::sync::Arc;

use percept_core::interaction::{Interaction, SensoryEvent};
use percept_memory::LongTermMemory;
use percept_providers::MockEmbedding;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Memory System Demo ===\n");
    println!("Using mock embeddings (no API key required)\n");

    let memory = LongTermMemory::new(Arc::new(MockEmbedding));

    let corpus: &[(&str, f32, &str)] = &[
        ("My name is Alice and I love programming.", 0.9, "introduction"),
        ("I am working on an AI agent project.", 0.8, "goal"),
        ("The weather is nice today.", 0.2, "small talk"),
        ("Remember that my favorite color is blue.", 0.95, "explicit remember"),
        ("Hello there!", 0.1, "greeting"),
        ("I need help with debugging my code.", 0.7, "request"),
        ("Ok, thanks!", 0.15, "acknowledgment"),
        ("My project deadline is next Friday.", 0.85, "important fact"),
        ("Just chatting.", 0.2, "filler"),
        ("I prefer Python over JavaScript for backend work.", 0.75, "preference"),
    ];

    println!("Storing memories...\n");
    for (content, importance, label) in corpus {
        let event = SensoryEvent::new("demo", *content, *content);
        memory
            .remember(Arc::new(Interaction::Sensory(event)), *importance)
            .await?;
        println!("  [{importance:.2}] {label}");
        println!("       \"{content}\"\n");
    }

    println!("\nTotal memories stored: {}\n", memory.count().await);
    println!("{}", "=".repeat(60));

    let queries: &[(&str, &str)] = &[
        ("What is your name?", "should recall the introduction"),
        ("Tell me about your project", "should recall project-related memories"),
        ("What are your preferences?", "should recall color and language preferences"),
        ("What's your deadline?", "should recall the deadline"),
        ("Talk about the weather", "should recall the weather memory"),
    ];

    for (query, expectation) in queries {
        println!("\n\nQuery: \"{query}\"");
        println!("Expected: {expectation}\n");

        let relevant = memory.recall_relevant(query, 3).await?;
        if relevant.is_empty() {
            println!("  No relevant memories found");
        } else {
            println!("Retrieved memories:");
            for (i, interaction) in relevant.iter().enumerate() {
                println!("  {}. \"{}\"", i + 1, interaction.recall());
            }
        }

        println!("{}", "-".repeat(60));
    }

    println!("\n\n=== Memory Demo Complete ===");
    Ok(())
}
