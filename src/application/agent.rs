use std::sync::Arc;
use tracing::info;

use super::prompt::SystemPrompt;
use crate::infrastructure::model::{ModelError, ModelRequest, ReasoningModel};
use crate::infrastructure::tooling::ToolServerHandle;

/// Result of one agent invocation
#[derive(Debug, Clone)]
pub struct Response {
    pub output: String,
}

/// One invocable agent: a reasoning model, the connected tool servers,
/// a name, and the materialized system prompt. Built once per run and
/// consumed by exactly one [`Agent::run`] call.
pub struct Agent<'a> {
    name: String,
    model: Arc<dyn ReasoningModel>,
    servers: &'a [ToolServerHandle],
    system_prompt: SystemPrompt,
}

impl<'a> Agent<'a> {
    pub fn builder(model: Arc<dyn ReasoningModel>) -> AgentBuilder<'a> {
        AgentBuilder {
            name: crate::constants::AGENT_NAME.to_string(),
            model,
            servers: &[],
            system_prompt: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Submit one input and block until the model produces text. Any
    /// tool use happens inside the model capability; the only thing
    /// visible here is the bound server list.
    pub async fn run(&self, input: &str) -> Result<Response, ModelError> {
        info!(
            agent = %self.name,
            servers = self.servers.len(),
            "Agent run started"
        );
        let request = ModelRequest {
            system_prompt: self.system_prompt.text().to_string(),
            prompt: input.to_string(),
        };
        let response = self.model.respond(request, self.servers).await?;
        info!(agent = %self.name, "Agent returned final response");
        Ok(Response {
            output: response.output,
        })
    }
}

pub struct AgentBuilder<'a> {
    name: String,
    model: Arc<dyn ReasoningModel>,
    servers: &'a [ToolServerHandle],
    system_prompt: Option<SystemPrompt>,
}

impl<'a> AgentBuilder<'a> {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn servers(mut self, servers: &'a [ToolServerHandle]) -> Self {
        self.servers = servers;
        self
    }

    pub fn system_prompt(mut self, prompt: SystemPrompt) -> Self {
        self.system_prompt = Some(prompt);
        self
    }

    pub fn build(self) -> Agent<'a> {
        Agent {
            name: self.name,
            model: self.model,
            servers: self.servers,
            system_prompt: self
                .system_prompt
                .unwrap_or_else(|| SystemPrompt::compose("", "")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::model::ModelResponse;
    use async_trait::async_trait;

    struct FixedModel {
        output: String,
    }

    #[async_trait]
    impl ReasoningModel for FixedModel {
        fn id(&self) -> &str {
            "fixed"
        }

        async fn respond(
            &self,
            _request: ModelRequest,
            _tools: &[ToolServerHandle],
        ) -> Result<crate::infrastructure::model::ModelResponse, ModelError> {
            Ok(ModelResponse {
                output: self.output.clone(),
            })
        }
    }

    struct EchoModel;

    #[async_trait]
    impl ReasoningModel for EchoModel {
        fn id(&self) -> &str {
            "echo"
        }

        async fn respond(
            &self,
            request: ModelRequest,
            _tools: &[ToolServerHandle],
        ) -> Result<ModelResponse, ModelError> {
            Ok(ModelResponse {
                output: format!("{}|{}", request.system_prompt, request.prompt),
            })
        }
    }

    #[tokio::test]
    async fn returns_model_output_unchanged() {
        let model = Arc::new(FixedModel {
            output: "# X\nhi".to_string(),
        });
        let agent = Agent::builder(model)
            .name("test agent")
            .system_prompt(SystemPrompt::compose("Say hi.", "# X"))
            .build();

        let response = agent.run("ping").await.expect("response");
        assert_eq!(response.output, "# X\nhi");
    }

    #[tokio::test]
    async fn passes_system_prompt_and_input_to_the_model() {
        let agent = Agent::builder(Arc::new(EchoModel))
            .system_prompt(SystemPrompt::compose("rules", "# T"))
            .build();

        let response = agent.run("the input").await.expect("response");
        assert!(response.output.contains("rules"));
        assert!(response.output.ends_with("|the input"));
    }
}
