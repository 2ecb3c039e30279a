//! The Percept agent loop.

pub mod loop_runner;

pub use loop_runner::AgentLoop;
