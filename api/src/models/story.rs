use serde::Deserialize;
use serde_json::Value;

use crate::validation::{Checks, FieldError, Validate};

/// Body of `POST /add-story`. The story itself is stored verbatim.
#[derive(Debug, Deserialize)]
pub struct AddStoryPayload {
    #[serde(default)]
    pub story: Option<Value>,
}

impl Validate for AddStoryPayload {
    fn field_errors(&self) -> Vec<FieldError> {
        Checks::new()
            .require_some("story", self.story.as_ref(), "Story is mandatory")
            .finish()
    }
}
