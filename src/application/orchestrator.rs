//! The single-run pipeline: settings in, one generated document out.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use super::agent::Agent;
use super::documents::{DocumentError, DocumentSet};
use super::prompt::SystemPrompt;
use crate::config::Settings;
use crate::constants::{AGENT_NAME, OUTPUT_PATH};
use crate::infrastructure::model::{GeminiModel, ModelError, ReasoningModel};
use crate::infrastructure::render;
use crate::infrastructure::telemetry::NoiseFilter;
use crate::infrastructure::tooling::{ServerPool, ToolServerError};

/// Any failure a run can end with. Nothing is caught and recovered
/// inside the pipeline; every variant surfaces to the process boundary.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    ToolServer(#[from] ToolServerError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("failed to write output to {path:?}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Run the pipeline with the deployment's Gemini model
pub async fn run(settings: Settings, noise: NoiseFilter) -> Result<(), PipelineError> {
    let model: Arc<dyn ReasoningModel> = Arc::new(GeminiModel::from_settings(&settings));
    // Local-testing alternative targeting an OpenAI-compatible endpoint:
    // let model: Arc<dyn ReasoningModel> =
    //     Arc::new(crate::infrastructure::model::OpenAiCompatModel::from_settings(&settings));
    run_with_model(settings, noise, model).await
}

/// The strictly linear sequence: load documents, connect and enumerate
/// every tool server, build the agent, submit the one example input,
/// disable the noise filter, close the pool, then render and persist.
///
/// The output file is only touched after every earlier step has
/// succeeded, and the pool is closed on success and failure alike.
pub async fn run_with_model(
    settings: Settings,
    noise: NoiseFilter,
    model: Arc<dyn ReasoningModel>,
) -> Result<(), PipelineError> {
    let documents = DocumentSet::load(&settings)?;
    let pool = ServerPool::connect(&settings.servers).await?;
    info!(servers = pool.len(), "All tool servers connected");

    let outcome = {
        let agent = Agent::builder(model)
            .name(AGENT_NAME)
            .servers(pool.handles())
            .system_prompt(SystemPrompt::compose(
                &documents.instructions,
                &documents.readme_example,
            ))
            .build();
        agent.run(&documents.example_content).await
    };

    noise.disable();
    pool.shutdown().await;
    let response = outcome?;

    render::echo_markdown(&response.output);
    persist(Path::new(OUTPUT_PATH), &response.output)?;
    Ok(())
}

/// Write the raw output verbatim, overwriting any previous run's file
fn persist(path: &Path, output: &str) -> Result<(), PipelineError> {
    fs::write(path, output).map_err(|source| PipelineError::Output {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), bytes = output.len(), "Documentation written");
    Ok(())
}
