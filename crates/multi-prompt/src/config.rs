use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::answers::{Answers, answer_names};
use crate::builder::{DefaultPromptsBuilder, PromptsBuilder};
use crate::error::FlowError;
use crate::hooks::{FlowHooks, HookName, HookTable, ResolvedHooks};
use crate::log::{ErrorHandler, LogSink, Logger, RaiseOnError, TracingSink};
use crate::prompter::{Prompter, TerminalPrompter};

/// Fallbacks consulted when [`PromptOptions`] leaves a collaborator unset.
#[derive(Clone, Default)]
pub struct Defaults {
    pub prompter: Option<Arc<dyn Prompter>>,
    pub hooks: HookTable,
    pub builder: Option<Arc<dyn PromptsBuilder>>,
    pub log: Option<Arc<dyn LogSink>>,
    pub error: Option<Arc<dyn ErrorHandler>>,
}

/// Caller-supplied configuration for one [`crate::multi_prompt`] run.
#[derive(Clone, Default)]
pub struct PromptOptions {
    pub prompter: Option<Arc<dyn Prompter>>,
    pub known_answers: Option<Answers>,
    pub hooks: HookTable,
    pub defaults: Option<Defaults>,
    pub builder: Option<Arc<dyn PromptsBuilder>>,
    pub log: Option<Arc<dyn LogSink>>,
    pub error: Option<Arc<dyn ErrorHandler>>,
    pub warn: Option<Arc<dyn LogSink>>,
    pub log_on: bool,
}

impl PromptOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prompter(mut self, prompter: impl Prompter + 'static) -> Self {
        self.prompter = Some(Arc::new(prompter));
        self
    }

    pub fn with_known_answers(mut self, answers: Answers) -> Self {
        self.known_answers = Some(answers);
        self
    }

    /// Uses `hooks` for every hook slot.
    pub fn with_hooks(mut self, hooks: impl FlowHooks + 'static) -> Self {
        self.hooks = HookTable::all(Arc::new(hooks));
        self
    }

    /// Sets a single hook slot; the other slots keep falling back to the defaults.
    pub fn with_hook(mut self, name: HookName, hooks: impl FlowHooks + 'static) -> Self {
        self.hooks.set(name, Arc::new(hooks));
        self
    }

    pub fn with_defaults(mut self, defaults: Defaults) -> Self {
        self.defaults = Some(defaults);
        self
    }

    pub fn with_builder(mut self, builder: impl PromptsBuilder + 'static) -> Self {
        self.builder = Some(Arc::new(builder));
        self
    }

    pub fn with_log(mut self, sink: impl LogSink + 'static) -> Self {
        self.log = Some(Arc::new(sink));
        self
    }

    pub fn with_error(mut self, handler: impl ErrorHandler + 'static) -> Self {
        self.error = Some(Arc::new(handler));
        self
    }

    pub fn with_warn(mut self, sink: impl LogSink + 'static) -> Self {
        self.warn = Some(Arc::new(sink));
        self
    }

    pub fn log_on(mut self, enabled: bool) -> Self {
        self.log_on = enabled;
        self
    }
}

/// Fully resolved configuration, shared by reference with every step of a run.
pub struct ResolvedConfig {
    pub prompter: Arc<dyn Prompter>,
    pub known_answers: Answers,
    pub hooks: ResolvedHooks,
    pub builder: Arc<dyn PromptsBuilder>,
    pub log: Logger,
    pub warn: Logger,
    pub error: Arc<dyn ErrorHandler>,
}

impl ResolvedConfig {
    pub fn known_answer_names(&self) -> Vec<String> {
        answer_names(&self.known_answers)
    }

    /// Routes an error through the configured handler.
    pub fn report(&self, error: FlowError) -> Result<(), FlowError> {
        self.error.handle(error, &self.log)
    }

    pub fn warn(&self, message: &str, data: Option<&Value>) {
        self.warn.log(message, data);
    }
}

impl fmt::Debug for ResolvedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedConfig")
            .field("known_answers", &self.known_answers)
            .field("log", &self.log)
            .field("warn", &self.warn)
            .finish_non_exhaustive()
    }
}

/// Merges caller options with the defaults table and the built-in defaults.
pub fn resolve(options: PromptOptions) -> ResolvedConfig {
    let defaults = options.defaults.unwrap_or_default();

    let sink = options
        .log
        .or(defaults.log)
        .unwrap_or_else(|| Arc::new(TracingSink));
    let log = Logger::new(sink, options.log_on);
    let warn = match options.warn {
        Some(sink) => Logger::new(sink, true),
        None => log.clone(),
    };

    ResolvedConfig {
        prompter: options
            .prompter
            .or(defaults.prompter)
            .unwrap_or_else(|| Arc::new(TerminalPrompter::new())),
        known_answers: options.known_answers.unwrap_or_default(),
        hooks: options.hooks.or(defaults.hooks).resolve(),
        builder: options
            .builder
            .or(defaults.builder)
            .unwrap_or_else(|| Arc::new(DefaultPromptsBuilder::new())),
        log,
        warn,
        error: options
            .error
            .or(defaults.error)
            .unwrap_or_else(|| Arc::new(RaiseOnError)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompter::DefaultValuePrompter;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recording(Mutex<Vec<String>>);

    impl LogSink for Recording {
        fn log(&self, message: &str, _data: Option<&Value>) {
            self.0.lock().unwrap().push(message.to_string());
        }
    }

    #[test]
    fn empty_options_resolve_to_builtins() {
        let config = resolve(PromptOptions::new());
        assert!(config.known_answers.is_empty());
        assert!(!config.log.is_enabled());
        assert!(!config.warn.is_enabled());
    }

    #[test]
    fn known_answer_names_cover_every_key() {
        let known = json!({ "firstName": "Kristian", "age": 32 })
            .as_object()
            .cloned()
            .unwrap();
        let config = resolve(PromptOptions::new().with_known_answers(known));
        let mut names = config.known_answer_names();
        names.sort();
        assert_eq!(names, vec!["age", "firstName"]);
    }

    #[test]
    fn defaults_table_fills_missing_log_sink() {
        let sink = Arc::new(Recording::default());
        let defaults = Defaults {
            log: Some(sink.clone()),
            prompter: Some(Arc::new(DefaultValuePrompter::new())),
            ..Defaults::default()
        };
        let config = resolve(PromptOptions::new().with_defaults(defaults).log_on(true));
        config.log.log("hello", None);
        config.warn("careful", None);
        assert_eq!(*sink.0.lock().unwrap(), vec!["hello", "careful"]);
    }

    #[test]
    fn explicit_warn_sink_ignores_log_switch() {
        let sink = Arc::new(Recording::default());
        let config = resolve(PromptOptions {
            warn: Some(sink.clone()),
            ..PromptOptions::new()
        });
        config.log.log("quiet", None);
        config.warn("loud", None);
        assert_eq!(*sink.0.lock().unwrap(), vec!["loud"]);
    }
}
