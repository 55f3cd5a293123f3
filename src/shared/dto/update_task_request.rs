use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

use crate::{
    task::Task,
    task_error::{TaskError, ValidationErrors},
    task_priority, task_schema,
};

/// Body of `PUT /tasks/{task_id}`. Absent fields are left unchanged, an
/// explicit `null` (or a blank string) clears an optional field. Comments
/// only grow through the comment endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTaskRequest {
    pub task_name: Option<String>,
    pub status: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub assignee: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub due_date: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub priority: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub task_type: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub attach_file: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub effort_level: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub summary: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub link: Option<Option<String>>,
}

/// Keeps a present `null` apart from an absent field.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// A validated update, ready to apply to a stored task. For optional
/// fields, `Some(None)` clears the value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskChanges {
    pub task_name: Option<String>,
    pub status: Option<String>,
    pub assignee: Option<Option<String>>,
    pub due_date: Option<Option<NaiveDate>>,
    pub priority: Option<Option<String>>,
    pub task_type: Option<Option<String>>,
    pub description: Option<Option<String>>,
    pub attach_file: Option<Option<String>>,
    pub effort_level: Option<Option<String>>,
    pub summary: Option<Option<String>>,
    pub link: Option<Option<String>>,
}

impl UpdateTaskRequest {
    pub fn validate(self) -> Result<TaskChanges, TaskError> {
        let mut errors = ValidationErrors::new();

        let task_name = match self.task_name {
            Some(name) => task_schema::require_name(Some(name), &mut errors),
            None => None,
        };
        let status = task_schema::check_not_blank("status", self.status, &mut errors);
        let changes = TaskChanges {
            task_name,
            status,
            assignee: self.assignee.map(task_schema::clean_text),
            due_date: self.due_date.map(|v| task_schema::check_due_date(v, &mut errors)),
            priority: self.priority.map(|v| {
                task_schema::check_not_blank("priority", v, &mut errors).map(|p| task_priority::normalize(&p))
            }),
            task_type: self.task_type.map(task_schema::clean_text),
            description: self.description.map(task_schema::clean_text),
            attach_file: self.attach_file.map(|v| task_schema::check_url("attach_file", v, &mut errors)),
            effort_level: self.effort_level.map(task_schema::clean_text),
            summary: self.summary.map(task_schema::clean_text),
            link: self.link.map(|v| task_schema::check_url("link", v, &mut errors)),
        };
        errors.into_result(changes)
    }
}

fn replace<T>(slot: &mut Option<T>, change: Option<Option<T>>) {
    if let Some(value) = change {
        *slot = value;
    }
}

impl TaskChanges {
    pub fn apply(self, task: &mut Task) {
        if let Some(task_name) = self.task_name {
            task.task_name = task_name;
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        replace(&mut task.assignee, self.assignee);
        replace(&mut task.due_date, self.due_date);
        replace(&mut task.priority, self.priority);
        replace(&mut task.task_type, self.task_type);
        replace(&mut task.description, self.description);
        replace(&mut task.attach_file, self.attach_file);
        replace(&mut task.effort_level, self.effort_level);
        replace(&mut task.summary, self.summary);
        replace(&mut task.link, self.link);
    }
}
