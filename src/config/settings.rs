use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::error::ConfigError;

/// One tool server entry from the `servers` mapping.
///
/// `kind` is the transport selector (`"sse"` or `"http"` on the wire);
/// `prefix` namespaces the server's tool names when non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerDescriptor {
    pub url: String,
    pub kind: String,
    pub prefix: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawServerDescriptor {
    pub url: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub prefix: Option<String>,
}

impl RawServerDescriptor {
    pub(super) fn validate(self, server: &str) -> Result<ServerDescriptor, ConfigError> {
        let url = self.url.ok_or_else(|| ConfigError::ServerField {
            server: server.to_string(),
            field: "url",
        })?;
        let kind = self.kind.ok_or_else(|| ConfigError::ServerField {
            server: server.to_string(),
            field: "type",
        })?;
        Ok(ServerDescriptor {
            url,
            kind,
            prefix: self.prefix.unwrap_or_default(),
        })
    }
}

/// Fully resolved process configuration.
///
/// Built exactly once per run by [`Settings::load`] / [`super::resolve`]
/// and read-only afterwards. The document fields are paths whose contents
/// are read verbatim at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub servers: BTreeMap<String, ServerDescriptor>,
    pub provider_url: String,
    pub model_name: String,
    pub gemini_api_key: Option<String>,
    pub verbose_logging: bool,
    pub instructions: PathBuf,
    pub example_content: PathBuf,
    pub readme_example: PathBuf,
}

impl Settings {
    /// Resolve settings from the default source chain, reading the
    /// settings file from `path` when given (an explicit path that does
    /// not exist is an error; the default path is optional).
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        super::loader::resolve(
            super::loader::SettingsOverrides::default(),
            path,
            Path::new(crate::constants::ENV_PATH),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_complete_entry() {
        let raw = RawServerDescriptor {
            url: Some("http://localhost:8001/mcp".to_string()),
            kind: Some("http".to_string()),
            prefix: None,
        };
        let descriptor = raw.validate("terraform").expect("valid descriptor");
        assert_eq!(descriptor.url, "http://localhost:8001/mcp");
        assert_eq!(descriptor.kind, "http");
        assert_eq!(descriptor.prefix, "");
    }

    #[test]
    fn rejects_entry_without_url() {
        let raw = RawServerDescriptor {
            url: None,
            kind: Some("sse".to_string()),
            prefix: None,
        };
        let err = raw.validate("mermaid").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::ServerField { field: "url", .. }
        ));
    }

    #[test]
    fn rejects_entry_without_type() {
        let raw = RawServerDescriptor {
            url: Some("http://localhost:8001".to_string()),
            kind: None,
            prefix: Some("tf_".to_string()),
        };
        let err = raw.validate("terraform").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::ServerField { field: "type", .. }
        ));
    }
}
