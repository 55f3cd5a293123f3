use std::sync::Arc;

use super::{local_file_store::LocalFileStore, notion_store::NotionStore, task_store::TaskStore};
use crate::{settings::Settings, task_error::TaskError};

/// The task store chosen at startup. Fixed for the life of the process.
#[derive(Clone)]
pub struct DataContext {
    store: Arc<dyn TaskStore>,
}

impl DataContext {
    /// Remote workspace when valid credentials are configured, local file otherwise.
    pub fn open(settings: &Settings) -> Result<Self, TaskError> {
        let store: Arc<dyn TaskStore> = match &settings.remote {
            Some(remote) if remote.is_valid() => Arc::new(NotionStore::new(remote)?),
            Some(_) => {
                tracing::warn!(
                    "NOTION_TOKEN/NOTION_DATABASE_ID are set but invalid; falling back to the local task file"
                );
                Arc::new(LocalFileStore::new(&settings.tasks_file))
            }
            None => Arc::new(LocalFileStore::new(&settings.tasks_file)),
        };
        tracing::info!(backend = store.backend_name(), "task store selected");
        Ok(Self { store })
    }

    pub fn with_store(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &dyn TaskStore {
        self.store.as_ref()
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }
}
