//! External AI menu-extraction collaborator

pub mod circuit_breaker;
pub mod client;
pub mod config;

pub use circuit_breaker::{BreakerState, CircuitBreaker};
pub use client::{ExtractionError, MenuExtractionClient};
pub use config::ExtractionConfig;
