use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::FlowError;
use crate::spec::question::QuestionSpec;

/// A single question or a list of them, as a section may declare either.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum PromptDef {
    One(QuestionSpec),
    Many(Vec<QuestionSpec>),
}

impl PromptDef {
    /// Normalizes to an ordered list; a single question becomes a one-element list.
    pub fn into_list(self) -> Vec<QuestionSpec> {
        match self {
            PromptDef::One(question) => vec![question],
            PromptDef::Many(questions) => questions,
        }
    }

    /// Reads a definition from arbitrary JSON, rejecting anything that is not a
    /// question object or an array of them.
    pub fn from_value(section: &str, value: Value) -> Result<Self, FlowError> {
        serde_json::from_value(value).map_err(|err| FlowError::InvalidPrompts {
            section: section.to_string(),
            reason: err.to_string(),
        })
    }
}

impl From<QuestionSpec> for PromptDef {
    fn from(question: QuestionSpec) -> Self {
        PromptDef::One(question)
    }
}

impl From<Vec<QuestionSpec>> for PromptDef {
    fn from(questions: Vec<QuestionSpec>) -> Self {
        PromptDef::Many(questions)
    }
}

pub fn prompt_names(questions: &[QuestionSpec]) -> Vec<String> {
    questions
        .iter()
        .map(|question| question.name.clone())
        .collect()
}
