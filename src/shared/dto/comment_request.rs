use serde::Deserialize;

use crate::{task_error::{TaskError, ValidationErrors}, task_schema};

/// Body of `PATCH /tasks/{task_id}/comment`.
#[derive(Debug, Clone, Deserialize)]
pub struct CommentRequest {
    #[serde(default, alias = "text")]
    pub comment: String,
}

impl CommentRequest {
    pub fn validate(self) -> Result<String, TaskError> {
        let mut errors = ValidationErrors::new();
        let comment = task_schema::check_not_blank("comment", Some(self.comment), &mut errors);
        errors.into_result(comment.unwrap_or_default())
    }
}
