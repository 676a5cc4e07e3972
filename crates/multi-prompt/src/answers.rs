use std::path::Path;

use serde_json::{Map, Value, json};

use crate::document::read_file;
use crate::error::FlowError;

/// Mapping from question name to answer value.
pub type Answers = Map<String, Value>;

/// Copies every entry of `source` into `target`, overwriting same-named keys.
pub fn merge_answers(target: &mut Answers, source: &Answers) {
    for (name, value) in source {
        target.insert(name.clone(), value.clone());
    }
}

/// Names of every answer, in map order.
pub fn answer_names(answers: &Answers) -> Vec<String> {
    answers.keys().cloned().collect()
}

/// Wraps answers as `{"answers": ...}`, the context shape used by expressions and templates.
pub fn answers_context(answers: &Answers) -> Value {
    json!({ "answers": answers })
}

/// Accepts a JSON object of answers; `null` is treated as no answers.
pub fn answers_from_value(value: Value) -> Result<Answers, FlowError> {
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Answers::new()),
        other => Err(FlowError::InvalidAnswers(format!(
            "answers must be a JSON object, got {}",
            type_label(&other)
        ))),
    }
}

/// Reads a JSON answers file; the contents follow [`answers_from_value`].
pub fn load_answers(path: impl AsRef<Path>) -> Result<Answers, FlowError> {
    let value: Value = serde_json::from_str(&read_file(path.as_ref())?)?;
    answers_from_value(value)
}

fn type_label(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_overwrites_existing_keys() {
        let mut target = answers_from_value(json!({ "a": 1, "b": 2 })).unwrap();
        let source = answers_from_value(json!({ "b": 3, "c": 4 })).unwrap();
        merge_answers(&mut target, &source);
        assert_eq!(Value::Object(target), json!({ "a": 1, "b": 3, "c": 4 }));
    }

    #[test]
    fn non_object_answers_are_rejected() {
        let err = answers_from_value(json!([1, 2])).unwrap_err();
        assert!(err.to_string().contains("array"));
        assert!(answers_from_value(Value::Null).unwrap().is_empty());
    }

    #[test]
    fn unreadable_answers_file_is_an_io_error() {
        let err = load_answers("does/not/exist.json").unwrap_err();
        assert!(matches!(err, FlowError::Io { .. }));
    }
}
