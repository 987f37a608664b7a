//! OpenAI-compatible client implementation
//!
//! Local-testing alternative that targets an OpenAI-style
//! `chat/completions` endpoint (Ollama, LocalAI). This path submits the
//! prompt as-is and does not exchange tool invocations.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use super::traits::ReasoningModel;
use super::types::{ModelError, ModelRequest, ModelResponse};
use crate::config::Settings;
use crate::infrastructure::tooling::ToolServerHandle;

#[derive(Clone)]
pub struct OpenAiCompatModel {
    id: String,
    endpoint: String,
    api_key: Option<String>,
    model: String,
    http: Client,
}

impl OpenAiCompatModel {
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.provider_url.clone(), settings.model_name.clone(), None)
    }

    pub fn new(endpoint: String, model: String, api_key: Option<String>) -> Self {
        Self {
            id: "openai-compat".to_string(),
            endpoint,
            api_key,
            model,
            http: Client::new(),
        }
    }

    fn chat_url(&self) -> String {
        let base = self.endpoint.trim_end_matches('/');
        format!("{base}/chat/completions")
    }
}

#[async_trait]
impl ReasoningModel for OpenAiCompatModel {
    fn id(&self) -> &str {
        &self.id
    }

    async fn respond(
        &self,
        request: ModelRequest,
        _tools: &[ToolServerHandle],
    ) -> Result<ModelResponse, ModelError> {
        let payload = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": request.system_prompt},
                {"role": "user", "content": request.prompt},
            ],
            "stream": false,
        });

        info!(
            provider = self.id.as_str(),
            model = self.model.as_str(),
            "Sending request to OpenAI-compatible endpoint"
        );

        let mut call = self.http.post(self.chat_url()).json(&payload);
        if let Some(key) = self.api_key.as_deref().filter(|key| !key.trim().is_empty()) {
            call = call.header("Authorization", format!("Bearer {key}"));
        }

        let response: ChatResponse = call
            .send()
            .await
            .map_err(|e| ModelError::network(&self.id, e))?
            .error_for_status()
            .map_err(|e| ModelError::network(&self.id, e))?
            .json()
            .await
            .map_err(|e| ModelError::network(&self.id, e))?;

        let output = response
            .choices
            .into_iter()
            .find_map(|choice| choice.message.content)
            .ok_or_else(|| ModelError::invalid_response(&self.id, "missing content"))?;

        Ok(ModelResponse { output })
    }
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_chat_completions_url() {
        let model = OpenAiCompatModel::new(
            "http://localhost:11434/v1/".to_string(),
            "llama3".to_string(),
            None,
        );
        assert_eq!(model.chat_url(), "http://localhost:11434/v1/chat/completions");
    }

    #[test]
    fn parses_chat_response_content() {
        let raw = json!({
            "choices": [{"message": {"role": "assistant", "content": "# Module"}}]
        });
        let response: ChatResponse = serde_json::from_value(raw).expect("valid response");
        let content = response.choices[0].message.content.clone();
        assert_eq!(content.as_deref(), Some("# Module"));
    }
}
