pub mod error;
pub mod loader;
pub mod settings;

pub use error::ConfigError;
pub use loader::{SettingsOverrides, resolve};
pub use settings::{RawServerDescriptor, ServerDescriptor, Settings};
