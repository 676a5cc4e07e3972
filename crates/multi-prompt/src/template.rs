use handlebars::Handlebars;
use serde_json::Value;

use crate::answers::{Answers, answers_context};
use crate::error::FlowError;
use crate::spec::question::QuestionSpec;

/// Renders `{{answers.<name>}}` placeholders in statically declared questions.
pub struct TemplateEngine {
    registry: Handlebars<'static>,
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateEngine {
    pub fn new() -> Self {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(false);
        registry.register_escape_fn(handlebars::no_escape);
        Self { registry }
    }

    pub fn render_str(&self, template: &str, answers: &Answers) -> Result<String, FlowError> {
        if !template.contains("{{") {
            return Ok(template.to_string());
        }
        self.registry
            .render_template(template, &answers_context(answers))
            .map_err(|err| FlowError::Template(err.to_string()))
    }

    /// Renders the message and any string default; other fields are untouched.
    pub fn render_question(
        &self,
        question: &QuestionSpec,
        answers: &Answers,
    ) -> Result<QuestionSpec, FlowError> {
        let mut rendered = question.clone();
        if let Some(message) = &question.message {
            rendered.message = Some(self.render_str(message, answers)?);
        }
        if let Some(Value::String(default)) = &question.default {
            rendered.default = Some(Value::String(self.render_str(default, answers)?));
        }
        Ok(rendered)
    }
}
