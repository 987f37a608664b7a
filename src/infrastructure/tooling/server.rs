use rmcp::ServiceExt;
use rmcp::model::CallToolRequestParam;
use rmcp::service::{RoleClient, RunningService};
use rmcp::transport::sse_client::SseClientConfig;
use rmcp::transport::{SseClientTransport, StreamableHttpClientTransport};
use serde_json::{Value, json};
use tracing::{debug, warn};

use super::error::ToolServerError;
use crate::config::ServerDescriptor;

/// Transport selection for one tool server, decided at the input
/// boundary so everything downstream matches exhaustively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerTransport {
    Sse { url: String },
    StreamableHttp { url: String },
}

impl ServerTransport {
    /// The only place an unrecognized `type` string can surface; no
    /// handle is ever produced for one.
    pub fn from_descriptor(
        name: &str,
        descriptor: &ServerDescriptor,
    ) -> Result<Self, ToolServerError> {
        match descriptor.kind.as_str() {
            "sse" => Ok(Self::Sse {
                url: descriptor.url.clone(),
            }),
            "http" => Ok(Self::StreamableHttp {
                url: descriptor.url.clone(),
            }),
            other => Err(ToolServerError::UnsupportedKind {
                name: name.to_string(),
                kind: other.to_string(),
            }),
        }
    }

    pub fn url(&self) -> &str {
        match self {
            Self::Sse { url } | Self::StreamableHttp { url } => url,
        }
    }
}

/// One named operation exposed by a connected server
#[derive(Debug, Clone)]
pub struct RemoteTool {
    pub name: String,
    pub description: Option<String>,
    pub input_schema: Value,
}

/// Live connection to one tool server, with its enumerated tool list.
///
/// The wire protocol itself belongs to the `rmcp` client; this handle
/// only names the server, routes invocations, and closes the session.
pub struct ToolServerHandle {
    name: String,
    url: String,
    prefix: String,
    tools: Vec<RemoteTool>,
    service: RunningService<RoleClient, ()>,
}

impl ToolServerHandle {
    /// Connect to the server described by `descriptor` and enumerate its
    /// tools. Fails without any I/O when the transport kind is unknown.
    pub async fn connect(
        name: &str,
        descriptor: &ServerDescriptor,
    ) -> Result<Self, ToolServerError> {
        let transport = ServerTransport::from_descriptor(name, descriptor)?;
        debug!(server = name, url = transport.url(), "Connecting tool server");

        let service = match &transport {
            ServerTransport::Sse { url } => {
                let config = SseClientConfig {
                    sse_endpoint: url.clone().into(),
                    ..Default::default()
                };
                let sse = SseClientTransport::start_with_client(reqwest::Client::new(), config)
                    .await
                    .map_err(|err| ToolServerError::Connect {
                        name: name.to_string(),
                        url: url.clone(),
                        reason: err.to_string(),
                    })?;
                ().serve(sse).await.map_err(|err| ToolServerError::Connect {
                    name: name.to_string(),
                    url: url.clone(),
                    reason: err.to_string(),
                })?
            }
            ServerTransport::StreamableHttp { url } => {
                let http = StreamableHttpClientTransport::from_uri(url.as_str());
                ().serve(http).await.map_err(|err| ToolServerError::Connect {
                    name: name.to_string(),
                    url: url.clone(),
                    reason: err.to_string(),
                })?
            }
        };

        let listing = service.list_tools(Default::default()).await.map_err(|source| {
            ToolServerError::Enumerate {
                name: name.to_string(),
                source,
            }
        })?;
        let tools = listing
            .tools
            .into_iter()
            .map(|tool| RemoteTool {
                name: tool.name.to_string(),
                description: tool.description.map(|text| text.to_string()),
                input_schema: serde_json::to_value(&*tool.input_schema)
                    .unwrap_or_else(|_| json!({"type": "object"})),
            })
            .collect();

        Ok(Self {
            name: name.to_string(),
            url: transport.url().to_string(),
            prefix: descriptor.prefix.clone(),
            tools,
            service,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn tools(&self) -> &[RemoteTool] {
        &self.tools
    }

    /// Comma-joined tool names, as enumerated
    pub fn tool_names(&self) -> String {
        self.tools
            .iter()
            .map(|tool| tool.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// The name a tool is presented under, with the server prefix applied
    pub fn exposed_name(&self, tool: &str) -> String {
        format!("{}{}", self.prefix, tool)
    }

    /// Map an exposed (possibly prefixed) name back to a local tool
    pub fn resolve(&self, exposed: &str) -> Option<&RemoteTool> {
        resolve_exposed(&self.prefix, &self.tools, exposed)
    }

    /// Invoke one tool with JSON arguments and return the raw result
    pub async fn call(&self, tool: &str, arguments: Value) -> Result<Value, ToolServerError> {
        let result = self
            .service
            .call_tool(CallToolRequestParam {
                name: tool.to_string().into(),
                arguments: arguments.as_object().cloned(),
            })
            .await
            .map_err(|source| ToolServerError::Invoke {
                name: self.name.clone(),
                tool: tool.to_string(),
                source,
            })?;

        serde_json::to_value(result).map_err(|source| ToolServerError::Encode {
            name: self.name.clone(),
            tool: tool.to_string(),
            source,
        })
    }

    /// Close the session. Failures are logged, not propagated; the run
    /// is already past the point where they could change its outcome.
    pub async fn close(self) {
        if let Err(err) = self.service.cancel().await {
            warn!(server = %self.name, %err, "Failed to close tool server session");
        }
    }
}

/// Locate the handle owning an exposed tool name, returning the handle
/// and the server-local tool name to invoke.
pub fn find_tool<'a>(
    servers: &'a [ToolServerHandle],
    exposed: &str,
) -> Option<(&'a ToolServerHandle, String)> {
    servers.iter().find_map(|server| {
        server
            .resolve(exposed)
            .map(|tool| (server, tool.name.clone()))
    })
}

fn resolve_exposed<'a>(prefix: &str, tools: &'a [RemoteTool], exposed: &str) -> Option<&'a RemoteTool> {
    let local = if prefix.is_empty() {
        exposed
    } else {
        exposed.strip_prefix(prefix)?
    };
    tools.iter().find(|tool| tool.name == local)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(kind: &str) -> ServerDescriptor {
        ServerDescriptor {
            url: "http://localhost:8001/mcp".to_string(),
            kind: kind.to_string(),
            prefix: String::new(),
        }
    }

    #[test]
    fn recognizes_both_transport_kinds() {
        let sse = ServerTransport::from_descriptor("a", &descriptor("sse")).expect("sse");
        assert!(matches!(sse, ServerTransport::Sse { .. }));

        let http = ServerTransport::from_descriptor("b", &descriptor("http")).expect("http");
        assert!(matches!(http, ServerTransport::StreamableHttp { .. }));
    }

    #[test]
    fn rejects_unknown_transport_kind() {
        let err = ServerTransport::from_descriptor("c", &descriptor("websocket")).unwrap_err();
        match err {
            ToolServerError::UnsupportedKind { name, kind } => {
                assert_eq!(name, "c");
                assert_eq!(kind, "websocket");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    fn sample_tools() -> Vec<RemoteTool> {
        vec![RemoteTool {
            name: "get_provider_details".to_string(),
            description: None,
            input_schema: json!({"type": "object"}),
        }]
    }

    #[test]
    fn resolves_unprefixed_names_directly() {
        let tools = sample_tools();
        assert!(resolve_exposed("", &tools, "get_provider_details").is_some());
        assert!(resolve_exposed("", &tools, "missing").is_none());
    }

    #[test]
    fn resolves_prefixed_names_by_stripping_the_prefix() {
        let tools = sample_tools();
        assert!(resolve_exposed("tf_", &tools, "tf_get_provider_details").is_some());
        assert!(resolve_exposed("tf_", &tools, "get_provider_details").is_none());
    }
}
