//! Model types - Request, Response, and Error types

use thiserror::Error;

use crate::infrastructure::tooling::ToolServerError;

/// One reasoning request: a fully materialized system prompt plus the
/// user-facing input for the single turn.
#[derive(Debug, Clone)]
pub struct ModelRequest {
    pub system_prompt: String,
    pub prompt: String,
}

/// Text produced by one reasoning turn
#[derive(Debug, Clone)]
pub struct ModelResponse {
    pub output: String,
}

/// Model errors
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("provider '{provider}' requires an API key")]
    MissingApiKey { provider: String },

    #[error("network error calling provider '{provider}': {source}")]
    Network {
        provider: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("provider '{provider}' returned invalid response: {reason}")]
    InvalidResponse { provider: String, reason: String },

    #[error("tool exchange failed for provider '{provider}': {source}")]
    ToolExchange {
        provider: String,
        #[source]
        source: ToolServerError,
    },

    #[error("provider '{provider}' exceeded the tool exchange budget")]
    ExchangeBudget { provider: String },
}

impl ModelError {
    pub fn missing_api_key(provider: impl Into<String>) -> Self {
        Self::MissingApiKey {
            provider: provider.into(),
        }
    }

    pub fn network(provider: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            provider: provider.into(),
            source,
        }
    }

    pub fn invalid_response(provider: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidResponse {
            provider: provider.into(),
            reason: reason.into(),
        }
    }

    pub fn tool_exchange(provider: impl Into<String>, source: ToolServerError) -> Self {
        Self::ToolExchange {
            provider: provider.into(),
            source,
        }
    }
}
