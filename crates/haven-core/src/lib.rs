//! Business logic for Haven.
//!
//! Defines the two trait seams the infrastructure crate implements
//! ([`llm::provider::LlmProvider`], [`audit::store::InteractionStore`]),
//! the per-turn chat engine, in-memory session state, the built-in
//! persona catalog, and log aggregation.

pub mod audit;
pub mod chat;
pub mod llm;
pub mod persona;
