use serde::Deserialize;

use crate::{task_error::{TaskError, ValidationErrors}, task_schema};

/// Body of `PATCH /tasks/{task_id}/status`.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusUpdateRequest {
    #[serde(default)]
    pub status: String,
}

impl StatusUpdateRequest {
    pub fn validate(self) -> Result<String, TaskError> {
        let mut errors = ValidationErrors::new();
        let status = task_schema::check_not_blank("status", Some(self.status), &mut errors);
        errors.into_result(status.unwrap_or_default())
    }
}
