pub mod agent;
pub mod documents;
pub mod orchestrator;
pub mod prompt;

pub use agent::{Agent, AgentBuilder, Response};
pub use documents::{DocumentError, DocumentSet};
pub use orchestrator::PipelineError;
pub use prompt::SystemPrompt;
