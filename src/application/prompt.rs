/// Fixed expert-role preamble placed ahead of the loaded instructions
const ROLE_PREAMBLE: &str = "You are a Terraform Documentation Agent.\n\
Your task is to analyze the provided Terraform code and create a README.md file based on your analysis.";

/// Lead-in separating the instructions from the README skeleton
const TEMPLATE_LEAD_IN: &str = "The README.md should look like:";

/// The fully materialized system prompt: preamble, instruction text, and
/// target-output template joined with fixed separators. No templating,
/// no escaping; the loaded documents pass through verbatim.
#[derive(Debug, Clone)]
pub struct SystemPrompt(String);

impl SystemPrompt {
    pub fn compose(instructions: &str, readme_template: &str) -> Self {
        Self(format!(
            "{ROLE_PREAMBLE}\n\nINSTRUCTIONS:\n{instructions}\n\n{TEMPLATE_LEAD_IN}\n{readme_template}"
        ))
    }

    pub fn text(&self) -> &str {
        &self.0
    }
}
