//! Port definitions
//!
//! Ports are traits the application layer calls out through. Infrastructure
//! provides the adapters.

pub mod conversation_logger;
