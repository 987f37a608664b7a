use thiserror::Error;

/// Errors from connecting to, enumerating, or invoking tool servers
#[derive(Debug, Error)]
pub enum ToolServerError {
    #[error("unsupported server type '{kind}' for server '{name}'")]
    UnsupportedKind { name: String, kind: String },

    #[error("failed to connect to tool server '{name}' at {url}: {reason}")]
    Connect {
        name: String,
        url: String,
        reason: String,
    },

    #[error("failed to list tools on server '{name}': {source}")]
    Enumerate {
        name: String,
        #[source]
        source: rmcp::service::ServiceError,
    },

    #[error("tool '{tool}' failed on server '{name}': {source}")]
    Invoke {
        name: String,
        tool: String,
        #[source]
        source: rmcp::service::ServiceError,
    },

    #[error("tool '{tool}' on server '{name}' returned an unencodable result: {source}")]
    Encode {
        name: String,
        tool: String,
        #[source]
        source: serde_json::Error,
    },
}
