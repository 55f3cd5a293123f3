use chrono::{Local, NaiveDate, Utc};

use crate::{
    create_task_request::CreateTaskRequest,
    data_access::{data_context::DataContext, task_store::TaskMutation},
    task::Task,
    task_error::TaskError,
    update_task_request::UpdateTaskRequest,
};

/// Task operations over whichever store the process started with.
///
/// Stateless apart from the store handle; every returned task has
/// `past_due` recomputed for the current local date.
#[derive(Clone)]
pub struct TaskService {
    data_context: DataContext,
}

impl TaskService {
    pub fn new(data_context: DataContext) -> Self {
        Self { data_context }
    }

    pub fn backend_name(&self) -> &'static str {
        self.data_context.backend_name()
    }

    fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    fn present(mut task: Task) -> Task {
        task.refresh_past_due(Self::today());
        task
    }

    pub async fn list_tasks(&self) -> Result<Vec<Task>, TaskError> {
        let tasks = self.data_context.store().list().await?;
        Ok(tasks.into_iter().map(Self::present).collect())
    }

    pub async fn list_active_tasks(&self) -> Result<Vec<Task>, TaskError> {
        let tasks = self.list_tasks().await?;
        Ok(tasks.into_iter().filter(Task::is_active).collect())
    }

    pub async fn get_task(&self, task_id: u64) -> Result<Task, TaskError> {
        self.data_context
            .store()
            .get(task_id)
            .await?
            .map(Self::present)
            .ok_or(TaskError::NotFound(task_id))
    }

    pub async fn create_task(&self, request: CreateTaskRequest) -> Result<Task, TaskError> {
        let mut task = request.validate()?;
        task.touch(Utc::now());
        task.refresh_past_due(Self::today());
        let created = self.data_context.store().create(task).await?;
        tracing::info!(task_id = created.task_id, backend = self.backend_name(), "task created");
        Ok(Self::present(created))
    }

    pub async fn update_task(&self, task_id: u64, request: UpdateTaskRequest) -> Result<Task, TaskError> {
        let changes = request.validate()?;
        self.mutate(task_id, Box::new(move |task: &mut Task| {
            changes.apply(task);
            Ok(())
        }))
        .await
    }

    pub async fn update_status(&self, task_id: u64, status: String) -> Result<Task, TaskError> {
        self.mutate(task_id, Box::new(move |task: &mut Task| {
            task.status = status;
            Ok(())
        }))
        .await
    }

    /// Appends to the end of `comments`; earlier comments are never touched.
    pub async fn add_comment(&self, task_id: u64, comment: String) -> Result<Task, TaskError> {
        self.mutate(task_id, Box::new(move |task: &mut Task| {
            task.comments.push(comment);
            Ok(())
        }))
        .await
    }

    pub async fn add_link(&self, task_id: u64, url: String) -> Result<Task, TaskError> {
        self.mutate(task_id, Box::new(move |task: &mut Task| {
            task.link = Some(url);
            Ok(())
        }))
        .await
    }

    /// Runs `change` inside the store's write cycle, then stamps the task.
    async fn mutate(&self, task_id: u64, change: TaskMutation) -> Result<Task, TaskError> {
        let today = Self::today();
        let mutation: TaskMutation = Box::new(move |task: &mut Task| {
            change(task)?;
            task.touch(Utc::now());
            task.refresh_past_due(today);
            Ok(())
        });
        let updated = self
            .data_context
            .store()
            .update(task_id, mutation)
            .await?
            .ok_or(TaskError::NotFound(task_id))?;
        tracing::info!(task_id, backend = self.backend_name(), "task updated");
        Ok(Self::present(updated))
    }
}
