use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::answers::Answers;
use crate::config::ResolvedConfig;
use crate::error::FlowError;
use crate::log::Logger;
use crate::normalize::PromptDef;
use crate::spec::question::QuestionSpec;

/// Computes a section's questions from the answers collected so far.
#[async_trait]
pub trait PromptFactory: Send + Sync {
    async fn create(
        &self,
        answers: &Answers,
        config: &ResolvedConfig,
    ) -> Result<PromptDef, FlowError>;
}

struct FnFactory<F>(F);

#[async_trait]
impl<F, Fut> PromptFactory for FnFactory<F>
where
    F: Fn(Answers, Logger) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<PromptDef, FlowError>> + Send + 'static,
{
    async fn create(
        &self,
        answers: &Answers,
        config: &ResolvedConfig,
    ) -> Result<PromptDef, FlowError> {
        (self.0)(answers.clone(), config.log.clone()).await
    }
}

/// Wraps an async closure as a dynamic section prompt.
///
/// The closure receives a snapshot of the accumulated answers and the gated logger.
pub fn prompt_fn<F, Fut>(factory: F) -> SectionPrompt
where
    F: Fn(Answers, Logger) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<PromptDef, FlowError>> + Send + 'static,
{
    SectionPrompt::Dynamic(Arc::new(FnFactory(factory)))
}

/// Where a section's questions come from.
#[derive(Clone)]
pub enum SectionPrompt {
    Static(PromptDef),
    Dynamic(Arc<dyn PromptFactory>),
}

impl SectionPrompt {
    pub fn questions(questions: Vec<QuestionSpec>) -> Self {
        SectionPrompt::Static(PromptDef::Many(questions))
    }
}

impl fmt::Debug for SectionPrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SectionPrompt::Static(def) => f.debug_tuple("Static").field(def).finish(),
            SectionPrompt::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

/// A named step in the flow.
#[derive(Debug, Clone)]
pub struct Section {
    pub name: String,
    pub label: Option<String>,
    pub prompt: Option<SectionPrompt>,
}

impl Section {
    pub fn new(name: impl Into<String>, prompt: SectionPrompt) -> Self {
        Self {
            name: name.into(),
            label: None,
            prompt: Some(prompt),
        }
    }

    /// A section with nothing to ask; rejected when the flow is validated.
    pub fn without_prompt(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: None,
            prompt: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }
}

/// The flow order plus the sections it refers to.
#[derive(Debug, Clone, Default)]
pub struct PromptsDef {
    pub flow: Vec<String>,
    pub sections: BTreeMap<String, Section>,
}

impl PromptsDef {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the section and appends it to the flow.
    pub fn section(mut self, section: Section) -> Self {
        self.flow.push(section.name.clone());
        self.sections.insert(section.name.clone(), section);
        self
    }

    /// Registers the section without touching the flow.
    pub fn insert_section(&mut self, section: Section) {
        self.sections.insert(section.name.clone(), section);
    }

    pub fn with_flow<I, S>(mut self, flow: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.flow = flow.into_iter().map(Into::into).collect();
        self
    }

    pub fn get(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }
}
