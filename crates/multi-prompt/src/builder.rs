use async_trait::async_trait;
use serde_json::json;

use crate::answers::Answers;
use crate::config::ResolvedConfig;
use crate::error::FlowError;
use crate::filter::{PromptFilter, prompts_to_ask};
use crate::normalize::{PromptDef, prompt_names};
use crate::spec::{QuestionSpec, Section, SectionPrompt};
use crate::template::TemplateEngine;

/// Inputs for building one section's prompts.
#[derive(Debug, Clone, Copy)]
pub struct BuildRequest<'a> {
    pub section: &'a Section,
    /// Answers accumulated from earlier sections, seeded with the known answers.
    pub answers: &'a Answers,
    pub known_answer_names: &'a [String],
}

/// Produces the questions to ask for a section.
#[async_trait]
pub trait PromptsBuilder: Send + Sync {
    async fn create_prompts_to_ask(
        &self,
        request: BuildRequest<'_>,
        config: &ResolvedConfig,
    ) -> Result<Vec<QuestionSpec>, FlowError>;
}

/// Resolves the section prompt, normalizes it and drops already-known questions.
///
/// Static questions that survive the filter have their `message` and string
/// `default` rendered against the accumulated answers.
#[derive(Default)]
pub struct DefaultPromptsBuilder {
    templates: TemplateEngine,
}

impl DefaultPromptsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the section's questions and whether they are templated.
    async fn resolve_definition(
        &self,
        request: BuildRequest<'_>,
        config: &ResolvedConfig,
    ) -> Result<(Vec<QuestionSpec>, bool), FlowError> {
        let section = request.section;
        match &section.prompt {
            None => Err(FlowError::MissingPrompt {
                name: section.name.clone(),
            }),
            Some(SectionPrompt::Static(def)) => Ok((def.clone().into_list(), true)),
            Some(SectionPrompt::Dynamic(factory)) => {
                let def: PromptDef = factory.create(request.answers, config).await?;
                Ok((def.into_list(), false))
            }
        }
    }
}

#[async_trait]
impl PromptsBuilder for DefaultPromptsBuilder {
    async fn create_prompts_to_ask(
        &self,
        request: BuildRequest<'_>,
        config: &ResolvedConfig,
    ) -> Result<Vec<QuestionSpec>, FlowError> {
        let (questions, templated) = self.resolve_definition(request, config).await?;
        let question_names = prompt_names(&questions);
        let filter = PromptFilter::exclude(request.known_answer_names.iter().cloned());
        let mut prompts = prompts_to_ask(questions, &filter, &config.log);
        if templated {
            prompts = prompts
                .iter()
                .map(|question| self.templates.render_question(question, request.answers))
                .collect::<Result<_, _>>()?;
        }
        config.log.log_with("prompts to ask", || {
            json!({
                "section": request.section.name,
                "questions": question_names,
                "known_answer_names": request.known_answer_names,
                "prompts_to_ask": prompt_names(&prompts),
            })
        });
        Ok(prompts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PromptOptions, resolve};
    use crate::spec::prompt_fn;
    use serde_json::Value;

    fn answers(value: Value) -> Answers {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn dynamic_prompt_sees_accumulated_answers() {
        let section = Section::new(
            "second",
            prompt_fn(|answers, _log| async move {
                let age = answers.get("age").cloned().unwrap_or(Value::Null);
                Ok::<_, FlowError>(PromptDef::from(
                    QuestionSpec::new("type")
                        .with_message(format!("At {age} year old you should be a")),
                ))
            }),
        );
        let config = resolve(PromptOptions::new());
        let accumulated = answers(json!({ "age": 32 }));
        let prompts = DefaultPromptsBuilder::new()
            .create_prompts_to_ask(
                BuildRequest {
                    section: &section,
                    answers: &accumulated,
                    known_answer_names: &["age".to_string()],
                },
                &config,
            )
            .await
            .unwrap();
        assert_eq!(prompts.len(), 1);
        assert_eq!(
            prompts[0].message.as_deref(),
            Some("At 32 year old you should be a")
        );
    }

    #[tokio::test]
    async fn static_prompt_excludes_known_answers() {
        let section = Section::new(
            "first",
            SectionPrompt::questions(vec![
                QuestionSpec::new("firstName").with_default("Kristian"),
                QuestionSpec::new("nickname").with_default("{{answers.firstName}}y"),
            ]),
        );
        let config = resolve(PromptOptions::new());
        let accumulated = answers(json!({ "firstName": "Kris" }));
        let prompts = DefaultPromptsBuilder::new()
            .create_prompts_to_ask(
                BuildRequest {
                    section: &section,
                    answers: &accumulated,
                    known_answer_names: &["firstName".to_string()],
                },
                &config,
            )
            .await
            .unwrap();
        assert_eq!(prompt_names(&prompts), vec!["nickname"]);
        assert_eq!(prompts[0].default, Some(json!("Krisy")));
    }

    #[tokio::test]
    async fn known_questions_are_never_rendered() {
        let broken = "{{#if answers.age}}unterminated";
        let section = Section::new(
            "first",
            SectionPrompt::questions(vec![
                QuestionSpec::new("firstName").with_message(broken),
                QuestionSpec::new("pet").with_default("cat"),
            ]),
        );
        let config = resolve(PromptOptions::new());
        let accumulated = answers(json!({ "firstName": "Kris", "age": 32 }));
        let builder = DefaultPromptsBuilder::new();

        let prompts = builder
            .create_prompts_to_ask(
                BuildRequest {
                    section: &section,
                    answers: &accumulated,
                    known_answer_names: &["firstName".to_string()],
                },
                &config,
            )
            .await
            .unwrap();
        assert_eq!(prompt_names(&prompts), vec!["pet"]);

        let err = builder
            .create_prompts_to_ask(
                BuildRequest {
                    section: &section,
                    answers: &accumulated,
                    known_answer_names: &[],
                },
                &config,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, FlowError::Template(_)));
    }

    #[tokio::test]
    async fn section_without_prompt_is_rejected() {
        let section = Section::without_prompt("broken");
        let config = resolve(PromptOptions::new());
        let err = DefaultPromptsBuilder::new()
            .create_prompts_to_ask(
                BuildRequest {
                    section: &section,
                    answers: &Answers::new(),
                    known_answer_names: &[],
                },
                &config,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, FlowError::MissingPrompt { .. }));
    }
}
