//! Configuration-driven documentation agent.
//!
//! Loads layered settings, connects the configured MCP tool servers,
//! binds them and a reasoning model into one agent, runs a single
//! documentation turn, and persists the result.

pub mod application;
pub mod config;
pub mod constants;
pub mod infrastructure;

pub use application::orchestrator;
pub use config::Settings;
