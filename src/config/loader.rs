use super::error::ConfigError;
use super::settings::{RawServerDescriptor, Settings};
use crate::constants::SETTINGS_PATH;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One layer of the settings source chain. Every field is optional; a
/// layer only contributes the fields it defines.
///
/// This is also the in-process override source, the highest-precedence
/// layer of [`resolve`].
#[derive(Debug, Default, Deserialize)]
pub struct SettingsOverrides {
    pub servers: Option<BTreeMap<String, RawServerDescriptor>>,
    pub provider_url: Option<String>,
    pub model_name: Option<String>,
    pub gemini_api_key: Option<String>,
    pub verbose_logging: Option<bool>,
    pub instructions: Option<String>,
    pub example_content: Option<String>,
    pub readme_example: Option<String>,
}

impl SettingsOverrides {
    /// Fill fields `self` leaves undefined from the lower-precedence layer.
    fn merged_with(self, lower: SettingsOverrides) -> SettingsOverrides {
        SettingsOverrides {
            servers: self.servers.or(lower.servers),
            provider_url: self.provider_url.or(lower.provider_url),
            model_name: self.model_name.or(lower.model_name),
            gemini_api_key: self.gemini_api_key.or(lower.gemini_api_key),
            verbose_logging: self.verbose_logging.or(lower.verbose_logging),
            instructions: self.instructions.or(lower.instructions),
            example_content: self.example_content.or(lower.example_content),
            readme_example: self.readme_example.or(lower.readme_example),
        }
    }
}

/// Merge the four settings sources in precedence order and validate the
/// result: in-process overrides, then the settings file, then process
/// environment variables, then the dotenv overlay at `env_file`.
pub fn resolve(
    overrides: SettingsOverrides,
    file_path: Option<&Path>,
    env_file: &Path,
) -> Result<Settings, ConfigError> {
    let file = file_source(file_path)?;
    let environment = env_source()?;
    let dotenv = dotenv_source(env_file)?;

    let merged = overrides
        .merged_with(file)
        .merged_with(environment)
        .merged_with(dotenv);
    validate(merged)
}

fn file_source(path: Option<&Path>) -> Result<SettingsOverrides, ConfigError> {
    let (path, required) = match path {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(SETTINGS_PATH), false),
    };

    debug!(path = %path.display(), "Reading settings file");
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(source) if source.kind() == io::ErrorKind::NotFound => {
            if required {
                return Err(ConfigError::NotFound { path });
            }
            debug!(path = %path.display(), "No settings file at default path");
            return Ok(SettingsOverrides::default());
        }
        Err(source) => return Err(ConfigError::Io { path, source }),
    };

    serde_json::from_str(&content).map_err(|source| ConfigError::Parse { path, source })
}

fn env_source() -> Result<SettingsOverrides, ConfigError> {
    values_from(|name| env::var(name).ok())
}

fn dotenv_source(path: &Path) -> Result<SettingsOverrides, ConfigError> {
    let iter = match dotenvy::from_filename_iter(path) {
        Ok(iter) => iter,
        Err(err) => {
            debug!(path = %path.display(), %err, "No environment overlay loaded");
            return Ok(SettingsOverrides::default());
        }
    };

    let mut vars = HashMap::new();
    for item in iter {
        let (key, value) = item.map_err(|err| ConfigError::Env {
            name: path.display().to_string(),
            reason: err.to_string(),
        })?;
        vars.insert(key, value);
    }
    values_from(|name| vars.get(name).cloned())
}

/// Extract settings fields from an environment-style lookup. Field names
/// are uppercased; `SERVERS` carries a JSON object and `VERBOSE_LOGGING`
/// a boolean literal.
fn values_from(lookup: impl Fn(&str) -> Option<String>) -> Result<SettingsOverrides, ConfigError> {
    let servers = lookup("SERVERS")
        .map(|raw| {
            serde_json::from_str(&raw).map_err(|err| ConfigError::Env {
                name: "SERVERS".to_string(),
                reason: err.to_string(),
            })
        })
        .transpose()?;
    let verbose_logging = lookup("VERBOSE_LOGGING")
        .map(|raw| parse_bool("VERBOSE_LOGGING", &raw))
        .transpose()?;

    Ok(SettingsOverrides {
        servers,
        provider_url: lookup("PROVIDER_URL"),
        model_name: lookup("MODEL_NAME"),
        gemini_api_key: lookup("GEMINI_API_KEY"),
        verbose_logging,
        instructions: lookup("INSTRUCTIONS"),
        example_content: lookup("EXAMPLE_CONTENT"),
        readme_example: lookup("README_EXAMPLE"),
    })
}

fn parse_bool(name: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(ConfigError::Env {
            name: name.to_string(),
            reason: format!("expected a boolean, got '{raw}'"),
        }),
    }
}

fn validate(merged: SettingsOverrides) -> Result<Settings, ConfigError> {
    let raw_servers = merged.servers.ok_or(ConfigError::Missing { field: "servers" })?;
    let mut servers = BTreeMap::new();
    for (name, raw) in raw_servers {
        let descriptor = raw.validate(&name)?;
        servers.insert(name, descriptor);
    }

    let provider_url = merged.provider_url.ok_or(ConfigError::Missing {
        field: "provider_url",
    })?;
    let model_name = merged.model_name.ok_or(ConfigError::Missing {
        field: "model_name",
    })?;
    let instructions = merged.instructions.ok_or(ConfigError::Missing {
        field: "instructions",
    })?;
    let example_content = merged.example_content.ok_or(ConfigError::Missing {
        field: "example_content",
    })?;
    let readme_example = merged.readme_example.ok_or(ConfigError::Missing {
        field: "readme_example",
    })?;

    Ok(Settings {
        servers,
        provider_url,
        model_name,
        gemini_api_key: merged.gemini_api_key,
        verbose_logging: merged.verbose_logging.unwrap_or(false),
        instructions: PathBuf::from(instructions),
        example_content: PathBuf::from(example_content),
        readme_example: PathBuf::from(readme_example),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer(model_name: &str) -> SettingsOverrides {
        SettingsOverrides {
            model_name: Some(model_name.to_string()),
            ..SettingsOverrides::default()
        }
    }

    #[test]
    fn higher_layer_wins_for_defined_fields() {
        let merged = layer("upper").merged_with(layer("lower"));
        assert_eq!(merged.model_name.as_deref(), Some("upper"));
    }

    #[test]
    fn lower_layer_fills_undefined_fields() {
        let upper = SettingsOverrides {
            provider_url: Some("http://localhost:11434/v1".to_string()),
            ..SettingsOverrides::default()
        };
        let merged = upper.merged_with(layer("lower"));
        assert_eq!(merged.model_name.as_deref(), Some("lower"));
        assert_eq!(
            merged.provider_url.as_deref(),
            Some("http://localhost:11434/v1")
        );
    }

    #[test]
    fn parses_boolean_literals() {
        assert!(parse_bool("VERBOSE_LOGGING", "true").expect("true"));
        assert!(parse_bool("VERBOSE_LOGGING", "1").expect("one"));
        assert!(!parse_bool("VERBOSE_LOGGING", "False").expect("false"));
        assert!(parse_bool("VERBOSE_LOGGING", "maybe").is_err());
    }

    #[test]
    fn parses_servers_from_json_value() {
        let vars: HashMap<String, String> = HashMap::from([(
            "SERVERS".to_string(),
            r#"{"terraform": {"url": "http://localhost:8001/mcp", "type": "http"}}"#.to_string(),
        )]);
        let layer = values_from(|name| vars.get(name).cloned()).expect("valid layer");
        let servers = layer.servers.expect("servers defined");
        assert_eq!(servers.len(), 1);
        assert!(servers.contains_key("terraform"));
    }

    #[test]
    fn rejects_malformed_servers_value() {
        let vars: HashMap<String, String> =
            HashMap::from([("SERVERS".to_string(), "not json".to_string())]);
        let err = values_from(|name| vars.get(name).cloned()).unwrap_err();
        assert!(matches!(err, ConfigError::Env { .. }));
    }
}
