use std::path::PathBuf;

use thiserror::Error;

/// Failures raised while sequencing a multi-section questionnaire.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error("flow {name} has no matching prompt section")]
    MissingSection { name: String },
    #[error("section {name} has no prompt function")]
    MissingPrompt { name: String },
    #[error("prompts to ask for section {section} are invalid: {reason}")]
    InvalidPrompts { section: String, reason: String },
    /// Raised by section prompt factories that cannot produce their questions.
    #[error("section {section} failed to create its prompts: {message}")]
    Factory { section: String, message: String },
    #[error("hook {hook} failed: {message}")]
    Hook { hook: &'static str, message: String },
    #[error("prompting failed: {0}")]
    Prompt(String),
    #[error("prompting interrupted by user")]
    Interrupted,
    #[error("invalid answers: {0}")]
    InvalidAnswers(String),
    #[error("template error: {0}")]
    Template(String),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FlowError {
    /// True for the validation failures the error handler may choose to skip past.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            FlowError::MissingSection { .. }
                | FlowError::MissingPrompt { .. }
                | FlowError::InvalidPrompts { .. }
        )
    }
}
