use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::expr::Expr;

/// Widget hint for the terminal prompter; the flow itself never inspects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    #[default]
    Input,
    Confirm,
    Number,
    List,
    Password,
}

/// A single question. Only `name` matters to the flow; the rest is UI metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct QuestionSpec {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: QuestionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<String>,
    /// Shown only when this evaluates to true against `{"answers": ...}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when: Option<Expr>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl QuestionSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: QuestionType::Input,
            message: None,
            default: None,
            choices: Vec::new(),
            when: None,
            extra: Map::new(),
        }
    }

    pub fn with_kind(mut self, kind: QuestionType) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_choices<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.choices = choices.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_when(mut self, when: Expr) -> Self {
        self.when = Some(when);
        self
    }

    /// Text shown to the user, falling back to the question name.
    pub fn display_message(&self) -> &str {
        self.message.as_deref().unwrap_or(&self.name)
    }
}
