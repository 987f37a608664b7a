mod gemini;
mod openai;
mod traits;
mod types;

pub use gemini::GeminiModel;
pub use openai::OpenAiCompatModel;
pub use traits::ReasoningModel;
pub use types::{ModelError, ModelRequest, ModelResponse};
