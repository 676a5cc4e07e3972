use std::collections::BTreeSet;

use serde_json::json;

use crate::answers::{Answers, merge_answers};
use crate::builder::BuildRequest;
use crate::config::{PromptOptions, ResolvedConfig, resolve};
use crate::error::FlowError;
use crate::hooks::{HookEvent, dispatch};
use crate::normalize::prompt_names;
use crate::spec::{PromptsDef, QuestionSpec, Section};

/// Runs every section in `def.flow` order and returns the merged answers.
///
/// Known answers seed the accumulator, suppress matching questions, and are
/// merged last so they always win.
pub async fn multi_prompt(def: &PromptsDef, options: PromptOptions) -> Result<Answers, FlowError> {
    let config = resolve(options);
    run_flow(def, &config).await
}

/// Same as [`multi_prompt`] with an already resolved configuration.
pub async fn run_flow(def: &PromptsDef, config: &ResolvedConfig) -> Result<Answers, FlowError> {
    let known_answer_names = config.known_answer_names();
    let sections = validate_flow(def, config)?;

    let mut answers = config.known_answers.clone();
    for section in sections {
        answers = run_section(section, answers, &known_answer_names, config).await?;
    }

    dispatch(
        &config.hooks,
        HookEvent::PromptedAnswers { answers: &answers },
        config,
    )
    .await?;

    merge_answers(&mut answers, &config.known_answers);
    Ok(answers)
}

/// Lists every problem that would stop `def` from running, in flow order.
pub fn check_flow(def: &PromptsDef) -> Vec<FlowError> {
    def.flow
        .iter()
        .filter_map(|name| lookup_section(def, name).err())
        .collect()
}

fn lookup_section<'a>(def: &'a PromptsDef, name: &str) -> Result<&'a Section, FlowError> {
    let section = def.get(name).ok_or_else(|| FlowError::MissingSection {
        name: name.to_string(),
    })?;
    if section.prompt.is_none() {
        return Err(FlowError::MissingPrompt {
            name: name.to_string(),
        });
    }
    Ok(section)
}

/// Checks every flow entry before anything is asked. Entries the error handler
/// lets through are dropped from the run.
fn validate_flow<'a>(
    def: &'a PromptsDef,
    config: &ResolvedConfig,
) -> Result<Vec<&'a Section>, FlowError> {
    let mut sections = Vec::with_capacity(def.flow.len());
    for name in &def.flow {
        match lookup_section(def, name) {
            Ok(section) => sections.push(section),
            Err(problem) => config.report(problem)?,
        }
    }
    Ok(sections)
}

async fn run_section(
    section: &Section,
    mut answers: Answers,
    known_answer_names: &[String],
    config: &ResolvedConfig,
) -> Result<Answers, FlowError> {
    config
        .log
        .log_with("section", || json!({ "section": section.name }));

    dispatch(
        &config.hooks,
        HookEvent::SectionNew { section },
        config,
    )
    .await?;

    let prompts = config
        .builder
        .create_prompts_to_ask(
            BuildRequest {
                section,
                answers: &answers,
                known_answer_names,
            },
            config,
        )
        .await?;

    if !valid_prompts_to_ask(section, &prompts, config)? {
        return Ok(answers);
    }

    dispatch(
        &config.hooks,
        HookEvent::SectionCreated {
            section,
            prompts: &prompts,
        },
        config,
    )
    .await?;

    config
        .log
        .log_with("prompt", || json!({ "prompts": prompt_names(&prompts) }));
    let section_answers = config
        .prompter
        .prompt(&prompts, &answers, config)
        .await?;

    dispatch(
        &config.hooks,
        HookEvent::SectionAnswers {
            section,
            answers: &section_answers,
        },
        config,
    )
    .await?;

    merge_answers(&mut answers, &section_answers);
    Ok(answers)
}

/// `Ok(false)` means the section contributes nothing and should be skipped.
fn valid_prompts_to_ask(
    section: &Section,
    prompts: &[QuestionSpec],
    config: &ResolvedConfig,
) -> Result<bool, FlowError> {
    if let Some(reason) = invalid_reason(prompts) {
        config.report(FlowError::InvalidPrompts {
            section: section.name.clone(),
            reason,
        })?;
        return Ok(false);
    }
    if prompts.is_empty() {
        config.warn(
            "promptsToAsk has no prompts",
            Some(&json!({ "section": section.name })),
        );
        return Ok(false);
    }
    Ok(true)
}

fn invalid_reason(prompts: &[QuestionSpec]) -> Option<String> {
    let mut seen = BTreeSet::new();
    for (index, question) in prompts.iter().enumerate() {
        if question.name.trim().is_empty() {
            return Some(format!("question at position {index} has no name"));
        }
        if !seen.insert(question.name.as_str()) {
            return Some(format!("question {} is listed more than once", question.name));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_and_blank_names_are_invalid() {
        let dup = vec![QuestionSpec::new("a"), QuestionSpec::new("a")];
        assert!(invalid_reason(&dup).unwrap().contains("more than once"));
        let blank = vec![QuestionSpec::new(" ")];
        assert!(invalid_reason(&blank).unwrap().contains("position 0"));
        assert!(invalid_reason(&[QuestionSpec::new("a")]).is_none());
        assert!(invalid_reason(&[]).is_none());
    }

    #[test]
    fn check_flow_lists_every_problem() {
        let def = PromptsDef::new()
            .section(Section::without_prompt("empty"))
            .with_flow(["missing", "empty"]);
        let problems = check_flow(&def);
        assert_eq!(problems.len(), 2);
        assert!(matches!(problems[0], FlowError::MissingSection { .. }));
        assert!(matches!(problems[1], FlowError::MissingPrompt { .. }));
    }
}
