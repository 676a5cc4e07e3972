use serde_json::json;

use crate::log::Logger;
use crate::spec::question::QuestionSpec;

/// Name-based selection of questions. An empty `include` selects everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptFilter {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

impl PromptFilter {
    pub fn exclude<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            include: Vec::new(),
            exclude: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn include<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            include: names.into_iter().map(Into::into).collect(),
            exclude: Vec::new(),
        }
    }

    pub fn with_exclude<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn is_selected(&self, name: &str) -> bool {
        let included = self.include.is_empty() || self.include.iter().any(|n| n == name);
        let excluded = self.exclude.iter().any(|n| n == name);
        included && !excluded
    }
}

/// Keeps the questions selected by `filter`, preserving order.
pub fn prompts_to_ask(
    questions: Vec<QuestionSpec>,
    filter: &PromptFilter,
    log: &Logger,
) -> Vec<QuestionSpec> {
    questions
        .into_iter()
        .filter(|question| {
            let selected = filter.is_selected(&question.name);
            log.log_with("filter", || {
                json!({
                    "name": question.name,
                    "include": filter.include,
                    "exclude": filter.exclude,
                    "selected": selected,
                })
            });
            selected
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::prompt_names;

    fn questions(names: &[&str]) -> Vec<QuestionSpec> {
        names.iter().map(|name| QuestionSpec::new(*name)).collect()
    }

    #[test]
    fn exclude_drops_known_names() {
        let filter = PromptFilter::exclude(["firstName"]);
        let kept = prompts_to_ask(questions(&["firstName", "age"]), &filter, &Logger::silent());
        assert_eq!(prompt_names(&kept), vec!["age"]);
    }

    #[test]
    fn include_restricts_and_exclude_still_wins() {
        let filter = PromptFilter::include(["a", "b"]).with_exclude(["b"]);
        let kept = prompts_to_ask(questions(&["a", "b", "c"]), &filter, &Logger::silent());
        assert_eq!(prompt_names(&kept), vec!["a"]);
    }

    #[test]
    fn empty_filter_keeps_everything() {
        let kept = prompts_to_ask(
            questions(&["x", "y"]),
            &PromptFilter::default(),
            &Logger::silent(),
        );
        assert_eq!(prompt_names(&kept), vec!["x", "y"]);
    }
}
