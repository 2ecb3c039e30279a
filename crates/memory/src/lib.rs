//! Memory tiers for the Percept agent.
//!
//! Two cooperating stores back the agent's working context:
//! - [`ShortTermMemory`] — a bounded recency buffer, strictly FIFO.
//! - [`LongTermMemory`] — an unbounded, append-only store ranked by a blend
//!   of semantic similarity and importance.

pub mod long_term;
pub mod short_term;
pub mod vector;

pub use long_term::LongTermMemory;
pub use short_term::ShortTermMemory;
pub use vector::cosine_similarity;
