//! Gemini client implementation

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, info};

use super::traits::ReasoningModel;
use super::types::{ModelError, ModelRequest, ModelResponse};
use crate::config::Settings;
use crate::constants::{GEMINI_API_PATH, GEMINI_ENDPOINT, MAX_TOOL_ROUNDS};
use crate::infrastructure::tooling::{RemoteTool, ToolServerHandle, find_tool};

/// Gemini-backed reasoning model.
///
/// Tool use happens inside this client: enumerated server tools are
/// declared to the model, and functionCall parts are dispatched back to
/// the owning server until the model settles on text.
pub struct GeminiModel {
    id: String,
    endpoint: String,
    api_path: String,
    api_key: Option<String>,
    model: String,
    http: Client,
}

impl GeminiModel {
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.model_name.clone(), settings.gemini_api_key.clone())
    }

    pub fn new(model: String, api_key: Option<String>) -> Self {
        Self {
            id: "gemini".to_string(),
            endpoint: GEMINI_ENDPOINT.to_string(),
            api_path: GEMINI_API_PATH.to_string(),
            api_key,
            model,
            http: Client::new(),
        }
    }

    fn model_url(&self) -> String {
        let base = self.endpoint.trim_end_matches('/');
        format!("{base}/{}/{}:generateContent", self.api_path, self.model)
    }

    /// Credential is only checked here, at first use
    fn require_api_key(&self) -> Result<&str, ModelError> {
        self.api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ModelError::missing_api_key(&self.id))
    }

    fn function_declarations(tools: &[ToolServerHandle]) -> Vec<Value> {
        let mut declarations = Vec::new();
        for server in tools {
            for tool in server.tools() {
                declarations.push(declaration(&server.exposed_name(&tool.name), tool));
            }
        }
        declarations
    }

    async fn generate(&self, payload: &Value) -> Result<GeminiResponse, ModelError> {
        let api_key = self.require_api_key()?;
        let url = format!("{}?key={}", self.model_url(), api_key);

        self.http
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(|e| ModelError::network(&self.id, e))?
            .error_for_status()
            .map_err(|e| ModelError::network(&self.id, e))?
            .json()
            .await
            .map_err(|e| ModelError::network(&self.id, e))
    }
}

fn declaration(exposed_name: &str, tool: &RemoteTool) -> Value {
    json!({
        "name": exposed_name,
        "description": tool.description.clone().unwrap_or_default(),
        "parameters": tool.input_schema.clone(),
    })
}

#[async_trait]
impl ReasoningModel for GeminiModel {
    fn id(&self) -> &str {
        &self.id
    }

    async fn respond(
        &self,
        request: ModelRequest,
        tools: &[ToolServerHandle],
    ) -> Result<ModelResponse, ModelError> {
        let declarations = Self::function_declarations(tools);
        let mut contents = vec![json!({
            "role": "user",
            "parts": [{"text": request.prompt}],
        })];

        info!(
            provider = self.id.as_str(),
            model = self.model.as_str(),
            tools = declarations.len(),
            "Sending request to Gemini"
        );

        for round in 0..MAX_TOOL_ROUNDS {
            let mut payload = json!({
                "contents": contents,
                "system_instruction": {
                    "parts": [{"text": request.system_prompt}]
                },
            });
            if !declarations.is_empty() {
                payload["tools"] = json!([{"functionDeclarations": declarations}]);
            }

            let response = self.generate(&payload).await?;
            let content = response
                .candidates
                .unwrap_or_default()
                .into_iter()
                .find_map(|candidate| candidate.content)
                .ok_or_else(|| ModelError::invalid_response(&self.id, "missing candidate content"))?;

            let calls: Vec<GeminiFunctionCall> = content
                .parts
                .iter()
                .filter_map(|part| part.function_call.clone())
                .collect();

            if calls.is_empty() {
                let text = content
                    .parts
                    .into_iter()
                    .find_map(|part| part.text)
                    .ok_or_else(|| ModelError::invalid_response(&self.id, "missing text"))?;
                debug!(round, "Received final response from Gemini");
                return Ok(ModelResponse { output: text });
            }

            let model_turn = serde_json::to_value(&content)
                .map_err(|err| ModelError::invalid_response(&self.id, err.to_string()))?;
            contents.push(model_turn);

            for call in calls {
                let (server, local) = find_tool(tools, &call.name).ok_or_else(|| {
                    ModelError::invalid_response(&self.id, format!("unknown tool '{}'", call.name))
                })?;
                debug!(tool = %call.name, server = %server.name(), "Dispatching tool invocation");

                let result = server
                    .call(&local, call.args.unwrap_or_else(|| json!({})))
                    .await
                    .map_err(|source| ModelError::tool_exchange(&self.id, source))?;

                contents.push(json!({
                    "role": "user",
                    "parts": [{
                        "functionResponse": {
                            "name": call.name,
                            "response": {"result": result},
                        }
                    }],
                }));
            }
        }

        Err(ModelError::ExchangeBudget {
            provider: self.id.clone(),
        })
    }
}

#[derive(Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Clone, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Clone, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(rename = "functionCall", skip_serializing_if = "Option::is_none")]
    function_call: Option<GeminiFunctionCall>,
}

#[derive(Clone, Serialize, Deserialize)]
struct GeminiFunctionCall {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    args: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_generate_content_url() {
        let model = GeminiModel::new("gemini-2.5-flash".to_string(), Some("key".to_string()));
        assert_eq!(
            model.model_url(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn missing_key_surfaces_at_first_use() {
        let model = GeminiModel::new("gemini-2.5-flash".to_string(), None);
        assert!(matches!(
            model.require_api_key(),
            Err(ModelError::MissingApiKey { .. })
        ));

        let blank = GeminiModel::new("gemini-2.5-flash".to_string(), Some("  ".to_string()));
        assert!(matches!(
            blank.require_api_key(),
            Err(ModelError::MissingApiKey { .. })
        ));
    }

    #[test]
    fn declaration_carries_name_and_schema() {
        let tool = RemoteTool {
            name: "get_provider_details".to_string(),
            description: Some("Latest provider versions".to_string()),
            input_schema: json!({"type": "object", "properties": {}}),
        };
        let value = declaration("tf_get_provider_details", &tool);
        assert_eq!(value["name"], "tf_get_provider_details");
        assert_eq!(value["description"], "Latest provider versions");
        assert_eq!(value["parameters"]["type"], "object");
    }

    #[test]
    fn parses_function_call_parts() {
        let raw = json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{"functionCall": {"name": "tf_get_provider_details", "args": {"provider": "google"}}}]
                }
            }]
        });
        let response: GeminiResponse = serde_json::from_value(raw).expect("valid response");
        let content = response
            .candidates
            .expect("candidates")
            .remove(0)
            .content
            .expect("content");
        let call = content.parts[0].function_call.clone().expect("call");
        assert_eq!(call.name, "tf_get_provider_details");
        assert_eq!(call.args.expect("args")["provider"], "google");
    }
}
