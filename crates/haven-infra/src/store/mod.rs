//! Interaction store implementations.

pub mod dynamo;

pub use dynamo::DynamoStore;
