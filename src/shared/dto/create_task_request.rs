use serde::Deserialize;

use crate::{
    task::Task,
    task_error::{TaskError, ValidationErrors},
    task_priority, task_schema, task_status,
};

/// Body of `POST /tasks`. A client-sent `task_id`, `past_due` or
/// `updated_at` is ignored; the store and service own those.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTaskRequest {
    #[serde(default)]
    pub task_name: Option<String>,
    pub status: Option<String>,
    pub assignee: Option<String>,
    pub due_date: Option<String>,
    pub priority: Option<String>,
    pub task_type: Option<String>,
    pub description: Option<String>,
    pub attach_file: Option<String>,
    pub effort_level: Option<String>,
    pub summary: Option<String>,
    pub link: Option<String>,
}

impl CreateTaskRequest {
    pub fn named(task_name: impl Into<String>) -> Self {
        Self { task_name: Some(task_name.into()), ..Self::default() }
    }

    /// Checks every field and builds an unsaved task (`task_id` 0).
    pub fn validate(self) -> Result<Task, TaskError> {
        let mut errors = ValidationErrors::new();

        let task_name = task_schema::require_name(self.task_name, &mut errors);
        let status = task_schema::check_not_blank("status", self.status, &mut errors)
            .unwrap_or_else(task_status::default_status);
        let priority = task_schema::check_not_blank("priority", self.priority, &mut errors)
            .map(|p| task_priority::normalize(&p));
        let due_date = task_schema::check_due_date(self.due_date, &mut errors);
        let attach_file = task_schema::check_url("attach_file", self.attach_file, &mut errors);
        let link = task_schema::check_url("link", self.link, &mut errors);

        let task = Task {
            status,
            assignee: task_schema::clean_text(self.assignee),
            due_date,
            priority,
            task_type: task_schema::clean_text(self.task_type),
            description: task_schema::clean_text(self.description),
            attach_file,
            effort_level: task_schema::clean_text(self.effort_level),
            summary: task_schema::clean_text(self.summary),
            link,
            ..Task::named(task_name.unwrap_or_default())
        };
        errors.into_result(task)
    }
}
