use async_trait::async_trait;

use crate::{task::Task, task_error::TaskError};

/// An in-place edit applied to a stored task inside the store's critical section.
pub type TaskMutation = Box<dyn FnOnce(&mut Task) -> Result<(), TaskError> + Send>;

/// Persistence capability shared by the local file and remote workspace backends.
///
/// Stores never compute `past_due`; callers refresh it on the way out.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Short backend label, reported by `/about` and startup logs.
    fn backend_name(&self) -> &'static str;

    async fn list(&self) -> Result<Vec<Task>, TaskError>;

    async fn get(&self, task_id: u64) -> Result<Option<Task>, TaskError>;

    /// Persists `task`, ignoring its `task_id`, and returns it with the assigned id.
    async fn create(&self, task: Task) -> Result<Task, TaskError>;

    /// Applies `mutation` to the stored task and persists the result.
    /// `Ok(None)` when no task has `task_id`.
    async fn update(&self, task_id: u64, mutation: TaskMutation) -> Result<Option<Task>, TaskError>;
}
