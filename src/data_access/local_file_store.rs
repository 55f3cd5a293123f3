//! Task store backed by one JSON document on local disk.
//!
//! The whole array is read for every access and rewritten for every
//! mutation. An async mutex spans each read-modify-write cycle, and writes
//! go through a temp file + rename so a crash never leaves half a document.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::{fs, sync::Mutex};

use super::task_store::{TaskMutation, TaskStore};
use crate::{task::Task, task_error::TaskError};

pub struct LocalFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl LocalFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), lock: Mutex::new(()) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<Vec<Task>, TaskError> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(TaskError::Storage(format!(
                    "Cannot read task file {}: {e}",
                    self.path.display()
                )))
            }
        };
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&content).map_err(|e| {
            TaskError::Storage(format!("Task file {} is not a valid task array: {e}", self.path.display()))
        })
    }

    async fn write_all(&self, tasks: &[Task]) -> Result<(), TaskError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        let data = serde_json::to_string_pretty(tasks)
            .map_err(|e| TaskError::Storage(format!("Cannot encode tasks: {e}")))?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, data.as_bytes()).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

fn next_id(tasks: &[Task]) -> Result<u64, TaskError> {
    tasks
        .iter()
        .map(|t| t.task_id)
        .max()
        .unwrap_or(0)
        .checked_add(1)
        .ok_or_else(|| TaskError::Storage("Task ids are exhausted".to_string()))
}

#[async_trait]
impl TaskStore for LocalFileStore {
    fn backend_name(&self) -> &'static str {
        "local-file"
    }

    async fn list(&self) -> Result<Vec<Task>, TaskError> {
        let _guard = self.lock.lock().await;
        self.read_all().await
    }

    async fn get(&self, task_id: u64) -> Result<Option<Task>, TaskError> {
        let _guard = self.lock.lock().await;
        let tasks = self.read_all().await?;
        Ok(tasks.into_iter().find(|t| t.task_id == task_id))
    }

    async fn create(&self, mut task: Task) -> Result<Task, TaskError> {
        let _guard = self.lock.lock().await;
        let mut tasks = self.read_all().await?;
        task.task_id = next_id(&tasks)?;
        tasks.push(task.clone());
        self.write_all(&tasks).await?;
        tracing::debug!(task_id = task.task_id, path = %self.path.display(), "task appended to file");
        Ok(task)
    }

    async fn update(&self, task_id: u64, mutation: TaskMutation) -> Result<Option<Task>, TaskError> {
        let _guard = self.lock.lock().await;
        let mut tasks = self.read_all().await?;
        let Some(task) = tasks.iter_mut().find(|t| t.task_id == task_id) else {
            return Ok(None);
        };
        mutation(task)?;
        let updated = task.clone();
        self.write_all(&tasks).await?;
        tracing::debug!(task_id, path = %self.path.display(), "task rewritten in file");
        Ok(Some(updated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn store_in(dir: &tempfile::TempDir) -> LocalFileStore {
        LocalFileStore::new(dir.path().join("tasks.json"))
    }

    #[tokio::test]
    async fn missing_file_is_an_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert!(store.list().await.unwrap().is_empty());
        assert_eq!(store.get(1).await.unwrap(), None);
    }

    #[tokio::test]
    async fn ids_are_max_plus_one() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let first = store.create(Task::named("a")).await.unwrap();
        let second = store.create(Task::named("b")).await.unwrap();
        assert_eq!((first.task_id, second.task_id), (1, 2));

        std::fs::write(
            store.path(),
            r#"[{"task_id":7,"task_name":"imported"},{"task_id":3,"task_name":"older"}]"#,
        )
        .unwrap();
        let third = store.create(Task::named("c")).await.unwrap();
        assert_eq!(third.task_id, 8);
        assert_eq!(store.list().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn exhausted_ids_are_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let seeded = format!(r#"[{{"task_id":{},"task_name":"last"}}]"#, u64::MAX);
        std::fs::write(store.path(), &seeded).unwrap();

        let result = store.create(Task::named("one more")).await;
        assert!(matches!(result, Err(TaskError::Storage(_))));
        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), seeded);
    }

    #[tokio::test]
    async fn file_holds_a_plain_task_array() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.create(Task::named("persisted")).await.unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value[0]["task_name"], "persisted");
        assert_eq!(value[0]["task_id"], 1);
        assert!(!dir.path().join("tasks.json.tmp").exists());
    }

    #[tokio::test]
    async fn update_applies_mutation_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let created = store.create(Task::named("a")).await.unwrap();

        let updated = store
            .update(created.task_id, Box::new(|t: &mut Task| {
                t.comments.push("hello".to_string());
                Ok(())
            }))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.comments, vec!["hello".to_string()]);

        let reloaded = LocalFileStore::new(store.path()).get(created.task_id).await.unwrap().unwrap();
        assert_eq!(reloaded.comments, vec!["hello".to_string()]);
    }

    #[tokio::test]
    async fn update_of_unknown_id_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let result = store.update(42, Box::new(|_: &mut Task| Ok(()))).await.unwrap();
        assert!(result.is_none());
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn failed_mutation_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let created = store.create(Task::named("a")).await.unwrap();
        let result = store
            .update(created.task_id, Box::new(|t: &mut Task| {
                t.task_name = "changed".to_string();
                Err(TaskError::Storage("refused".to_string()))
            }))
            .await;
        assert!(result.is_err());
        assert_eq!(store.get(created.task_id).await.unwrap().unwrap().task_name, "a");
    }

    #[tokio::test]
    async fn malformed_file_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        std::fs::write(store.path(), "{ not an array").unwrap();
        assert!(matches!(store.list().await, Err(TaskError::Storage(_))));
    }

    #[tokio::test]
    async fn creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalFileStore::new(dir.path().join("nested/data/tasks.json"));
        store.create(Task::named("deep")).await.unwrap();
        assert!(store.path().exists());
    }

    #[tokio::test]
    async fn concurrent_writers_do_not_lose_updates() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(store_in(&dir));
        let task_id = store.create(Task::named("busy")).await.unwrap().task_id;

        let mut handles = Vec::new();
        for i in 0..20 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .update(task_id, Box::new(move |t: &mut Task| {
                        t.comments.push(format!("c{i}"));
                        Ok(())
                    }))
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let task = store.get(task_id).await.unwrap().unwrap();
        assert_eq!(task.comments.len(), 20);
    }
}
