//! Long-term memory — an append-only store ranked by relevance.
//!
//! Every stored interaction is wrapped with an embedding of its recall text
//! plus the importance assigned when it was stored. Recall blends *semantic
//! similarity* (does this memory address the query) with *importance* (was
//! this memory flagged as significant): similar-but-trivial memories don't
//! crowd out critical ones, and importance alone never dominates regardless
//! of topical relevance.

use chrono::{DateTime, Utc};
use percept_core::error::MemoryError;
use percept_core::interaction::Interaction;
use percept_core::reasoning::EmbeddingService;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::vector::cosine_similarity;

/// Weight of semantic similarity in the relevance blend. Fixed policy.
const SIMILARITY_WEIGHT: f32 = 0.7;

/// Weight of stored importance in the relevance blend. Fixed policy.
const IMPORTANCE_WEIGHT: f32 = 0.3;

/// One stored memory. Owned exclusively by [`LongTermMemory`]; never exposed.
#[derive(Debug, Clone)]
struct MemoryEntry {
    interaction: Arc<Interaction>,
    embedding: Vec<f32>,
    importance: f32,
    stored_at: DateTime<Utc>,
}

/// Unbounded, append-only long-term store keyed by semantic embeddings.
///
/// Inserts take the write lock so concurrent ticks never corrupt the list or
/// lose entries; reads snapshot under the read lock before ranking so a
/// concurrent insert never disturbs an in-flight ranking pass. Entries are
/// never mutated or deleted after insertion — there is no forgetting policy.
pub struct LongTermMemory {
    embedder: Arc<dyn EmbeddingService>,
    entries: RwLock<Vec<MemoryEntry>>,
}

impl LongTermMemory {
    pub fn new(embedder: Arc<dyn EmbeddingService>) -> Self {
        Self {
            embedder,
            entries: RwLock::new(Vec::new()),
        }
    }

    /// Store an interaction with the given importance.
    ///
    /// Embeds the interaction's recall text first; a failed embedding call
    /// fails the whole operation — partial storage with a missing or garbage
    /// embedding would corrupt ranking, so the count must not change.
    pub async fn remember(
        &self,
        interaction: Arc<Interaction>,
        importance: f32,
    ) -> Result<(), MemoryError> {
        let embedding = self.embedder.embed(interaction.recall()).await?;

        let entry = MemoryEntry {
            interaction,
            embedding,
            importance,
            stored_at: Utc::now(),
        };

        debug!(
            stored_at = %entry.stored_at.format("%Y-%m-%d %H:%M:%S"),
            importance = format!("{importance:.2}"),
            recall = %truncate(entry.interaction.recall(), 80),
            "Stored long-term memory"
        );

        self.entries.write().await.push(entry);
        Ok(())
    }

    /// Retrieve up to `limit` interactions relevant to `query`, most relevant
    /// first.
    ///
    /// Relevance = 0.7 * cosine similarity + 0.3 * stored importance. Ties
    /// keep insertion order (stable sort). An empty store or blank query
    /// yields an empty result without calling the embedding service.
    pub async fn recall_relevant(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<Arc<Interaction>>, MemoryError> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        // Consistent snapshot before ranking; concurrent inserts land in
        // later recalls.
        let snapshot: Vec<MemoryEntry> = {
            let entries = self.entries.read().await;
            if entries.is_empty() {
                return Ok(Vec::new());
            }
            entries.clone()
        };

        let query_embedding = self.embedder.embed(query).await?;

        let mut ranked: Vec<(f32, f32, MemoryEntry)> = Vec::with_capacity(snapshot.len());
        for entry in snapshot {
            let similarity = cosine_similarity(&query_embedding, &entry.embedding)?;
            let relevance = SIMILARITY_WEIGHT * similarity + IMPORTANCE_WEIGHT * entry.importance;
            ranked.push((relevance, similarity, entry));
        }

        // Vec::sort_by is stable: equal relevance keeps insertion order.
        ranked.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        ranked.truncate(limit);

        debug!(
            count = ranked.len(),
            query = %truncate(query, 60),
            "Recalled relevant long-term memories"
        );
        for (relevance, similarity, entry) in &ranked {
            debug!(
                relevance = format!("{relevance:.3}"),
                similarity = format!("{similarity:.3}"),
                importance = format!("{:.2}", entry.importance),
                recall = %truncate(entry.interaction.recall(), 60),
                "Ranked memory"
            );
        }

        Ok(ranked
            .into_iter()
            .map(|(_, _, entry)| entry.interaction)
            .collect())
    }

    /// All stored interactions, in insertion order.
    pub async fn recall_all(&self) -> Vec<Arc<Interaction>> {
        self.entries
            .read()
            .await
            .iter()
            .map(|e| Arc::clone(&e.interaction))
            .collect()
    }

    /// Number of stored memories.
    pub async fn count(&self) -> usize {
        self.entries.read().await.len()
    }
}

fn truncate(text: &str, max_len: usize) -> String {
    if text.len() <= max_len {
        return text.to_string();
    }
    let mut cut = max_len.saturating_sub(3);
    while !text.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}...", &text[..cut])
}
