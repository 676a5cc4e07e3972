use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use schemars::{JsonSchema, schema_for};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::FlowError;
use crate::normalize::PromptDef;
use crate::spec::{PromptsDef, Section, SectionPrompt};

/// A section as written in a flow document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SectionDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// A single question object or an array of them. Message and string
    /// defaults may reference earlier answers as `{{answers.<name>}}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub questions: Option<PromptDef>,
}

/// JSON description of a flow whose sections are all static.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FlowDocument {
    pub flow: Vec<String>,
    #[serde(default)]
    pub sections: BTreeMap<String, SectionDocument>,
}

impl FlowDocument {
    pub fn from_json(json: &str) -> Result<Self, FlowError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a flow document from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FlowError> {
        Self::from_json(&read_file(path.as_ref())?)
    }

    pub fn json_schema() -> Result<Value, FlowError> {
        Ok(serde_json::to_value(schema_for!(FlowDocument))?)
    }

    pub fn into_prompts_def(self) -> PromptsDef {
        let mut def = PromptsDef::new().with_flow(self.flow);
        for (name, doc) in self.sections {
            let section = Section {
                name,
                label: doc.label,
                prompt: doc.questions.map(SectionPrompt::Static),
            };
            def.insert_section(section);
        }
        def
    }
}

pub(crate) fn read_file(path: &Path) -> Result<String, FlowError> {
    fs::read_to_string(path).map_err(|source| FlowError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sections_without_questions_have_no_prompt() {
        let doc = FlowDocument::from_json(
            r#"{ "flow": ["a", "b"], "sections": { "a": { "questions": { "name": "x" } }, "b": {} } }"#,
        )
        .expect("document");
        let def = doc.into_prompts_def();
        assert_eq!(def.flow, vec!["a", "b"]);
        assert!(def.get("a").and_then(|s| s.prompt.as_ref()).is_some());
        assert!(def.get("b").and_then(|s| s.prompt.as_ref()).is_none());
    }

    #[test]
    fn schema_describes_flow_and_sections() {
        let schema = FlowDocument::json_schema().expect("schema");
        let props = schema["properties"].as_object().expect("properties");
        assert!(props.contains_key("flow"));
        assert!(props.contains_key("sections"));
    }

    #[test]
    fn missing_document_is_an_io_error() {
        let err = FlowDocument::load("does/not/exist.json").unwrap_err();
        assert!(matches!(err, FlowError::Io { ref path, .. } if path.ends_with("exist.json")));
        assert!(err.to_string().starts_with("failed to read does/not/exist.json"));
    }
}
