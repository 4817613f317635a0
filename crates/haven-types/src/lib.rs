//! Shared domain types for Haven.
//!
//! This crate has no business logic and no I/O. It defines the data shapes
//! passed between the core engine, the infrastructure clients, and the
//! API layer: conversation messages, personas, interaction records, and
//! the error taxonomy.

pub mod error;
pub mod llm;
pub mod persona;
pub mod record;
