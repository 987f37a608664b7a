use std::collections::BTreeMap;
use tracing::{debug, info};

use super::error::ToolServerError;
use super::server::ToolServerHandle;
use crate::config::ServerDescriptor;

/// Owns every tool server session opened for one run.
///
/// Sessions are opened strictly one after another in mapping order, and
/// every exit path closes all of them, including a failure partway
/// through connecting.
pub struct ServerPool {
    servers: Vec<ToolServerHandle>,
}

impl ServerPool {
    /// Connect to each configured server and enumerate its tools. Each
    /// successful enumeration is reported as one log record carrying the
    /// URL and the comma-joined tool names.
    pub async fn connect(
        descriptors: &BTreeMap<String, ServerDescriptor>,
    ) -> Result<Self, ToolServerError> {
        let mut servers = Vec::with_capacity(descriptors.len());
        for (name, descriptor) in descriptors {
            match ToolServerHandle::connect(name, descriptor).await {
                Ok(handle) => {
                    info!(
                        url = %handle.url(),
                        tools = %handle.tool_names(),
                        "Listed tools for server"
                    );
                    servers.push(handle);
                }
                Err(err) => {
                    Self { servers }.shutdown().await;
                    return Err(err);
                }
            }
        }
        Ok(Self { servers })
    }

    pub fn handles(&self) -> &[ToolServerHandle] {
        &self.servers
    }

    pub fn len(&self) -> usize {
        self.servers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }

    /// Close every session
    pub async fn shutdown(self) {
        for server in self.servers {
            debug!(server = %server.name(), "Closing tool server session");
            server.close().await;
        }
    }
}
