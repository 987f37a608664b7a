//! Model traits

use async_trait::async_trait;

use super::types::{ModelError, ModelRequest, ModelResponse};
use crate::infrastructure::tooling::ToolServerHandle;

/// The reasoning capability: given a prompt and a set of named remote
/// operations, produce text, possibly after invoking some of them. How
/// many, which, and in what order is the implementation's business;
/// callers only see the final text.
#[async_trait]
pub trait ReasoningModel: Send + Sync {
    /// Provider identifier used in diagnostics
    fn id(&self) -> &str;

    /// Run one reasoning turn against the bound tool servers
    async fn respond(
        &self,
        request: ModelRequest,
        tools: &[ToolServerHandle],
    ) -> Result<ModelResponse, ModelError>;
}
