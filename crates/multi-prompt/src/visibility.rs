use crate::answers::{Answers, answers_context};
use crate::spec::question::QuestionSpec;

/// What to assume when a `when` expression cannot be evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisibilityMode {
    #[default]
    Visible,
    Hidden,
}

pub fn is_visible(question: &QuestionSpec, answers: &Answers, mode: VisibilityMode) -> bool {
    let Some(expr) = &question.when else {
        return true;
    };
    match expr.evaluate(&answers_context(answers)) {
        Some(value) => value,
        None => mode == VisibilityMode::Visible,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::Expr;
    use serde_json::json;

    #[test]
    fn unresolvable_expression_follows_mode() {
        let question = QuestionSpec::new("pet").with_when(Expr::Var {
            path: "/answers/hasPet".into(),
        });
        let answers = Answers::new();
        assert!(is_visible(&question, &answers, VisibilityMode::Visible));
        assert!(!is_visible(&question, &answers, VisibilityMode::Hidden));
    }

    #[test]
    fn false_predicate_hides_question() {
        let mut answers = Answers::new();
        answers.insert("hasPet".into(), json!(false));
        let question = QuestionSpec::new("pet").with_when(Expr::Var {
            path: "/answers/hasPet".into(),
        });
        assert!(!is_visible(&question, &answers, VisibilityMode::Visible));
        assert!(is_visible(&QuestionSpec::new("name"), &answers, VisibilityMode::Hidden));
    }
}
