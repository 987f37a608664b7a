//! Application constants
//!
//! Single source of truth for paths and other constants.

/// Default settings file path
pub const SETTINGS_PATH: &str = "settings.json";

/// Default environment overlay file path
pub const ENV_PATH: &str = ".env";

/// Output file written after a successful run
pub const OUTPUT_PATH: &str = "Generated_README.md";

/// Name bound to the documentation agent
pub const AGENT_NAME: &str = "Terraform Documentation Agent";

/// Default Gemini API endpoint
pub const GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

/// Default Gemini API path (fallback when not overridden)
pub const GEMINI_API_PATH: &str = "v1beta/models";

/// Substring of the benign schema warning the MCP client library emits
/// while negotiating notification schemas during tool enumeration
pub const SCHEMA_NOISE_MARKER: &str = "Failed to validate notification";

/// Upper bound on tool invocation rounds inside one model turn
pub const MAX_TOOL_ROUNDS: usize = 8;
