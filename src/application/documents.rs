use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::config::Settings;

/// Errors that can occur when reading referenced documents
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to read document {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// The three externally supplied documents a run needs: the agent
/// instructions, the example input, and the README skeleton. All read
/// verbatim, no parsing.
#[derive(Debug, Clone)]
pub struct DocumentSet {
    pub instructions: String,
    pub example_content: String,
    pub readme_example: String,
}

impl DocumentSet {
    pub fn load(settings: &Settings) -> Result<Self, DocumentError> {
        Ok(Self {
            instructions: read_document(&settings.instructions)?,
            example_content: read_document(&settings.example_content)?,
            readme_example: read_document(&settings.readme_example)?,
        })
    }
}

fn read_document(path: &Path) -> Result<String, DocumentError> {
    debug!(path = %path.display(), "Reading document");
    fs::read_to_string(path).map_err(|source| DocumentError::Read {
        path: path.to_path_buf(),
        source,
    })
}
