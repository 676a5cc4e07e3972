pub mod question;
pub mod section;

pub use question::{QuestionSpec, QuestionType};
pub use section::{PromptFactory, PromptsDef, Section, SectionPrompt, prompt_fn};
