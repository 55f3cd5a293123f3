use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::task_status;

/// A tracked work item, as stored by every backend and returned by the API.
///
/// `past_due` is derived; stores may persist it but it is recomputed from
/// `due_date` and `status` whenever a task is read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub task_id: u64,
    pub task_name: String,
    #[serde(default = "task_status::default_status")]
    pub status: String,
    #[serde(default)]
    pub assignee: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub task_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub attach_file: Option<String>,
    #[serde(default)]
    pub past_due: bool,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub effort_level: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub comments: Vec<String>,
    #[serde(default)]
    pub link: Option<String>,
}

impl Task {
    /// A task with only a name; everything else empty and no id assigned yet.
    pub fn named(task_name: impl Into<String>) -> Self {
        Self {
            task_id: 0,
            task_name: task_name.into(),
            status: task_status::default_status(),
            assignee: None,
            due_date: None,
            priority: None,
            task_type: None,
            description: None,
            attach_file: None,
            past_due: false,
            updated_at: None,
            effort_level: None,
            summary: None,
            comments: Vec::new(),
            link: None,
        }
    }

    pub fn is_done(&self) -> bool {
        task_status::is_done(&self.status)
    }

    pub fn is_active(&self) -> bool {
        !self.is_done()
    }

    pub fn compute_past_due(&self, today: NaiveDate) -> bool {
        match self.due_date {
            Some(due) => due < today && !self.is_done(),
            None => false,
        }
    }

    pub fn refresh_past_due(&mut self, today: NaiveDate) {
        self.past_due = self.compute_past_due(today);
    }

    /// Stamp a mutation. Never moves `updated_at` backwards.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = Some(match self.updated_at {
            Some(previous) if previous > now => previous,
            _ => now,
        });
    }
}
