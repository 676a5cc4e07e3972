#![allow(missing_docs)]

pub mod answers;
pub mod builder;
pub mod config;
pub mod document;
pub mod error;
pub mod expr;
pub mod filter;
pub mod flow;
pub mod hooks;
pub mod log;
pub mod normalize;
pub mod prompter;
pub mod spec;
pub mod template;
pub mod visibility;

pub use answers::{Answers, answers_from_value, load_answers, merge_answers};
pub use builder::{BuildRequest, DefaultPromptsBuilder, PromptsBuilder};
pub use config::{Defaults, PromptOptions, ResolvedConfig, resolve};
pub use document::{FlowDocument, SectionDocument};
pub use error::FlowError;
pub use expr::Expr;
pub use filter::{PromptFilter, prompts_to_ask};
pub use flow::{check_flow, multi_prompt, run_flow};
pub use hooks::{
    FlowHooks, HookEvent, HookName, HookTable, NoopHooks, ResolvedHooks, dispatch,
};
pub use log::{ErrorHandler, LogSink, Logger, RaiseOnError, TracingSink};
pub use normalize::{PromptDef, prompt_names};
pub use prompter::{DefaultValuePrompter, Prompter, TerminalPrompter};
pub use spec::{
    PromptFactory, PromptsDef, QuestionSpec, QuestionType, Section, SectionPrompt, prompt_fn,
};
pub use template::TemplateEngine;
pub use visibility::{VisibilityMode, is_visible};
