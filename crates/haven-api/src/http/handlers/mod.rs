//! API handlers.

pub mod chat;
pub mod persona;
pub mod session;
