use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::answers::Answers;
use crate::config::ResolvedConfig;
use crate::error::FlowError;
use crate::normalize::prompt_names;
use crate::spec::{QuestionSpec, Section};

/// Lifecycle callbacks fired while the flow runs. Every hook defaults to a no-op,
/// so implementors only override the events they care about.
#[async_trait]
pub trait FlowHooks: Send + Sync {
    /// Before the section's prompts are built.
    async fn section_new(
        &self,
        _section: &Section,
        _config: &ResolvedConfig,
    ) -> Result<(), FlowError> {
        Ok(())
    }

    /// After the section's prompts are built and validated.
    async fn section_created(
        &self,
        _section: &Section,
        _prompts: &[QuestionSpec],
        _config: &ResolvedConfig,
    ) -> Result<(), FlowError> {
        Ok(())
    }

    /// After the section's prompts are answered.
    async fn section_answers(
        &self,
        _section: &Section,
        _answers: &Answers,
        _config: &ResolvedConfig,
    ) -> Result<(), FlowError> {
        Ok(())
    }

    /// Once the whole flow is done, before known answers are merged back in.
    async fn prompted_answers(
        &self,
        _answers: &Answers,
        _config: &ResolvedConfig,
    ) -> Result<(), FlowError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHooks;

impl FlowHooks for NoopHooks {}

/// The four hook slots, named as in the hook table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookName {
    SectionNew,
    SectionCreated,
    SectionAnswers,
    PromptedAnswers,
}

impl HookName {
    pub const ALL: [HookName; 4] = [
        HookName::SectionNew,
        HookName::SectionCreated,
        HookName::SectionAnswers,
        HookName::PromptedAnswers,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HookName::SectionNew => "sectionNew",
            HookName::SectionCreated => "sectionCreated",
            HookName::SectionAnswers => "sectionAnswers",
            HookName::PromptedAnswers => "promptedAnswers",
        }
    }
}

/// One optional handler per hook slot. Each slot falls back on its own, so a
/// table that only fills `section_answers` keeps another table's `section_new`.
#[derive(Clone, Default)]
pub struct HookTable {
    pub section_new: Option<Arc<dyn FlowHooks>>,
    pub section_created: Option<Arc<dyn FlowHooks>>,
    pub section_answers: Option<Arc<dyn FlowHooks>>,
    pub prompted_answers: Option<Arc<dyn FlowHooks>>,
}

impl HookTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `hooks` for every slot.
    pub fn all(hooks: Arc<dyn FlowHooks>) -> Self {
        let mut table = Self::new();
        for name in HookName::ALL {
            table.set(name, hooks.clone());
        }
        table
    }

    pub fn with(mut self, name: HookName, hooks: impl FlowHooks + 'static) -> Self {
        self.set(name, Arc::new(hooks));
        self
    }

    pub fn set(&mut self, name: HookName, hooks: Arc<dyn FlowHooks>) {
        *self.slot_mut(name) = Some(hooks);
    }

    pub fn get(&self, name: HookName) -> Option<&Arc<dyn FlowHooks>> {
        match name {
            HookName::SectionNew => self.section_new.as_ref(),
            HookName::SectionCreated => self.section_created.as_ref(),
            HookName::SectionAnswers => self.section_answers.as_ref(),
            HookName::PromptedAnswers => self.prompted_answers.as_ref(),
        }
    }

    fn slot_mut(&mut self, name: HookName) -> &mut Option<Arc<dyn FlowHooks>> {
        match name {
            HookName::SectionNew => &mut self.section_new,
            HookName::SectionCreated => &mut self.section_created,
            HookName::SectionAnswers => &mut self.section_answers,
            HookName::PromptedAnswers => &mut self.prompted_answers,
        }
    }

    /// Fills every empty slot from `fallback`.
    pub fn or(mut self, fallback: HookTable) -> Self {
        for name in HookName::ALL {
            if self.get(name).is_none()
                && let Some(hooks) = fallback.get(name)
            {
                self.set(name, hooks.clone());
            }
        }
        self
    }

    /// Fills every remaining empty slot with [`NoopHooks`].
    pub fn resolve(self) -> ResolvedHooks {
        let noop: Arc<dyn FlowHooks> = Arc::new(NoopHooks);
        let pick = |slot: Option<Arc<dyn FlowHooks>>| slot.unwrap_or_else(|| noop.clone());
        ResolvedHooks {
            section_new: pick(self.section_new),
            section_created: pick(self.section_created),
            section_answers: pick(self.section_answers),
            prompted_answers: pick(self.prompted_answers),
        }
    }
}

/// A hook table with every slot filled.
#[derive(Clone)]
pub struct ResolvedHooks {
    section_new: Arc<dyn FlowHooks>,
    section_created: Arc<dyn FlowHooks>,
    section_answers: Arc<dyn FlowHooks>,
    prompted_answers: Arc<dyn FlowHooks>,
}

impl ResolvedHooks {
    pub fn get(&self, name: HookName) -> &dyn FlowHooks {
        match name {
            HookName::SectionNew => self.section_new.as_ref(),
            HookName::SectionCreated => self.section_created.as_ref(),
            HookName::SectionAnswers => self.section_answers.as_ref(),
            HookName::PromptedAnswers => self.prompted_answers.as_ref(),
        }
    }
}

impl Default for ResolvedHooks {
    fn default() -> Self {
        HookTable::new().resolve()
    }
}

#[derive(Debug, Clone, Copy)]
pub enum HookEvent<'a> {
    SectionNew {
        section: &'a Section,
    },
    SectionCreated {
        section: &'a Section,
        prompts: &'a [QuestionSpec],
    },
    SectionAnswers {
        section: &'a Section,
        answers: &'a Answers,
    },
    PromptedAnswers {
        answers: &'a Answers,
    },
}

impl HookEvent<'_> {
    pub fn hook(&self) -> HookName {
        match self {
            HookEvent::SectionNew { .. } => HookName::SectionNew,
            HookEvent::SectionCreated { .. } => HookName::SectionCreated,
            HookEvent::SectionAnswers { .. } => HookName::SectionAnswers,
            HookEvent::PromptedAnswers { .. } => HookName::PromptedAnswers,
        }
    }

    pub fn name(&self) -> &'static str {
        self.hook().as_str()
    }
}

/// Invokes the handler in the slot matching `event`.
pub async fn dispatch(
    hooks: &ResolvedHooks,
    event: HookEvent<'_>,
    config: &ResolvedConfig,
) -> Result<(), FlowError> {
    let handler = hooks.get(event.hook());
    config.log.log_with("hook", || match event {
        HookEvent::SectionNew { section } => {
            json!({ "hook": event.name(), "section": section.name })
        }
        HookEvent::SectionCreated { section, prompts } => json!({
            "hook": event.name(),
            "section": section.name,
            "prompts": prompt_names(prompts),
        }),
        HookEvent::SectionAnswers { section, answers } => json!({
            "hook": event.name(),
            "section": section.name,
            "answers": answers,
        }),
        HookEvent::PromptedAnswers { answers } => {
            json!({ "hook": event.name(), "answers": answers })
        }
    });

    match event {
        HookEvent::SectionNew { section } => handler.section_new(section, config).await,
        HookEvent::SectionCreated { section, prompts } => {
            handler.section_created(section, prompts, config).await
        }
        HookEvent::SectionAnswers { section, answers } => {
            handler.section_answers(section, answers, config).await
        }
        HookEvent::PromptedAnswers { answers } => {
            handler.prompted_answers(answers, config).await
        }
    }
}
