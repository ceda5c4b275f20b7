//! Cross-cutting plumbing shared by Harati Store services: error envelope,
//! health probe, request ids, env config and tracing setup.

pub mod config;
pub mod error;
pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;
