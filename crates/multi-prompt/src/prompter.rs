use std::io::ErrorKind;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use dialoguer::{Confirm, Error as DialoguerError, Input, Password, Select};
use serde_json::{Number, Value, json};

use crate::answers::{Answers, merge_answers};
use crate::config::ResolvedConfig;
use crate::error::FlowError;
use crate::spec::{QuestionSpec, QuestionType};
use crate::visibility::{VisibilityMode, is_visible};

/// Asks a batch of questions and returns the answers by question name.
///
/// `answers` holds everything accumulated before this batch, known answers included.
#[async_trait]
pub trait Prompter: Send + Sync {
    async fn prompt(
        &self,
        questions: &[QuestionSpec],
        answers: &Answers,
        config: &ResolvedConfig,
    ) -> Result<Answers, FlowError>;
}

/// Interactive prompter backed by `dialoguer`.
///
/// Reads block the calling task until the user answers.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompter;

impl TerminalPrompter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Prompter for TerminalPrompter {
    async fn prompt(
        &self,
        questions: &[QuestionSpec],
        answers: &Answers,
        config: &ResolvedConfig,
    ) -> Result<Answers, FlowError> {
        ask_visible(questions, answers, config, ask_terminal)
    }
}

/// Non-interactive prompter that answers every question with its default,
/// or `"unknown"` when it has none. Keeps every batch it was asked.
#[derive(Debug, Clone, Default)]
pub struct DefaultValuePrompter {
    asked: Arc<Mutex<Vec<Vec<QuestionSpec>>>>,
}

impl DefaultValuePrompter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Batches received so far, one entry per prompting call.
    pub fn asked(&self) -> Vec<Vec<QuestionSpec>> {
        self.asked
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl Prompter for DefaultValuePrompter {
    async fn prompt(
        &self,
        questions: &[QuestionSpec],
        answers: &Answers,
        config: &ResolvedConfig,
    ) -> Result<Answers, FlowError> {
        self.asked
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(questions.to_vec());
        ask_visible(questions, answers, config, |question| {
            Ok(question
                .default
                .clone()
                .filter(|value| !value.is_null())
                .unwrap_or_else(|| Value::String("unknown".into())))
        })
    }
}

/// Asks each question in order, skipping those whose `when` is false against the
/// accumulated answers plus the answers given earlier in the batch.
fn ask_visible(
    questions: &[QuestionSpec],
    accumulated: &Answers,
    config: &ResolvedConfig,
    mut ask: impl FnMut(&QuestionSpec) -> Result<Value, FlowError>,
) -> Result<Answers, FlowError> {
    let mut answers = Answers::new();
    for question in questions {
        if question.when.is_some() {
            let mut context = accumulated.clone();
            merge_answers(&mut context, &answers);
            if !is_visible(question, &context, VisibilityMode::Visible) {
                config
                    .log
                    .log_with("hidden question", || json!({ "name": question.name }));
                continue;
            }
        }
        let value = ask(question)?;
        answers.insert(question.name.clone(), value);
    }
    Ok(answers)
}

fn ask_terminal(question: &QuestionSpec) -> Result<Value, FlowError> {
    let message = question.display_message();
    match question.kind {
        QuestionType::Input => {
            let mut input = Input::<String>::new().with_prompt(message);
            if let Some(default) = question.default.as_ref().and_then(default_text) {
                input = input.default(default);
            }
            input
                .interact_text()
                .map(Value::String)
                .map_err(prompt_error)
        }
        QuestionType::Password => Password::new()
            .with_prompt(message)
            .interact()
            .map(Value::String)
            .map_err(prompt_error),
        QuestionType::Confirm => {
            let default = question
                .default
                .as_ref()
                .and_then(Value::as_bool)
                .unwrap_or(false);
            Confirm::new()
                .with_prompt(message)
                .default(default)
                .interact()
                .map(Value::Bool)
                .map_err(prompt_error)
        }
        QuestionType::Number => {
            let mut input = Input::<f64>::new().with_prompt(message);
            if let Some(default) = question.default.as_ref().and_then(Value::as_f64) {
                input = input.default(default);
            }
            let number = input.interact_text().map_err(prompt_error)?;
            Ok(number_value(number))
        }
        QuestionType::List => {
            if question.choices.is_empty() {
                return Err(FlowError::Prompt(format!(
                    "list question {} has no choices",
                    question.name
                )));
            }
            let default = question
                .default
                .as_ref()
                .and_then(Value::as_str)
                .and_then(|value| question.choices.iter().position(|choice| choice == value))
                .unwrap_or(0);
            let index = Select::new()
                .with_prompt(message)
                .items(&question.choices)
                .default(default)
                .interact()
                .map_err(prompt_error)?;
            Ok(Value::String(question.choices[index].clone()))
        }
    }
}

fn default_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

fn number_value(number: f64) -> Value {
    const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;
    if number.fract() == 0.0 && number.abs() <= MAX_SAFE_INTEGER {
        Value::from(number as i64)
    } else {
        Number::from_f64(number)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

fn prompt_error(err: DialoguerError) -> FlowError {
    match err {
        DialoguerError::IO(io) if io.kind() == ErrorKind::Interrupted => FlowError::Interrupted,
        other => FlowError::Prompt(other.to_string()),
    }
}
