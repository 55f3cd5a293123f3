//! Task store backed by a hosted workspace database (Notion API).
//!
//! Every call goes straight to the remote service; nothing is cached and
//! nothing is retried. Writes are serialized in-process so id assignment
//! and read-modify-write updates do not race each other.

use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION},
    Client, RequestBuilder, StatusCode, Url,
};
use serde_json::{json, Value};
use tokio::sync::Mutex;

use super::{
    notion_properties::{self, RemoteTask},
    task_store::{TaskMutation, TaskStore},
};
use crate::{
    settings::{RemoteSettings, NOTION_VERSION},
    task::Task,
    task_error::{TaskError, ValidationErrors},
};

const PAGE_SIZE: u32 = 100;

pub struct NotionStore {
    client: Client,
    base_url: String,
    database_id: String,
    write_lock: Mutex<()>,
}

impl NotionStore {
    pub fn new(settings: &RemoteSettings) -> Result<Self, TaskError> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", settings.token.trim()))
            .map_err(|_| TaskError::permanent("Workspace token is not a valid header value"))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert("notion-version", HeaderValue::from_static(NOTION_VERSION));

        let client = Client::builder()
            .timeout(settings.request_timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| TaskError::permanent(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: settings.api_base_url.trim_end_matches('/').to_string(),
            database_id: settings.database_id.trim().to_string(),
            write_lock: Mutex::new(()),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Value, TaskError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = format!("Workspace API returned {status}: {}", api_message(&body));
            tracing::warn!(%status, "workspace request rejected");
            return Err(if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
                TaskError::transient(message)
            } else {
                TaskError::permanent(message)
            });
        }
        response
            .json::<Value>()
            .await
            .map_err(|e| TaskError::permanent(format!("Undecodable workspace response: {e}")))
    }

    /// Runs a database query, following pagination to the end.
    async fn query_pages(&self, filter: Option<Value>) -> Result<Vec<RemoteTask>, TaskError> {
        let url = self.url(&format!("databases/{}/query", self.database_id));
        let mut pages = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut body = json!({ "page_size": PAGE_SIZE });
            if let Some(filter) = &filter {
                body["filter"] = filter.clone();
            }
            if let Some(cursor) = &cursor {
                body["start_cursor"] = json!(cursor);
            }

            let response = self.send(self.client.post(&url).json(&body)).await?;
            let results = response
                .get("results")
                .and_then(Value::as_array)
                .ok_or_else(|| TaskError::permanent("Workspace query response has no results"))?;
            for page in results {
                if notion_properties::page_task_id(page).is_none() {
                    let page_id = page.get("id").and_then(Value::as_str).unwrap_or_default();
                    tracing::warn!(page_id, "skipping workspace page without a task id");
                    continue;
                }
                pages.push(notion_properties::page_to_task(page)?);
            }

            cursor = match response.get("has_more").and_then(Value::as_bool) {
                Some(true) => response.get("next_cursor").and_then(Value::as_str).map(str::to_string),
                _ => None,
            };
            if cursor.is_none() {
                break;
            }
        }
        Ok(pages)
    }

    async fn find_page(&self, task_id: u64) -> Result<Option<RemoteTask>, TaskError> {
        let filter = json!({ "property": notion_properties::TASK_ID, "number": { "equals": task_id } });
        let mut pages = self.query_pages(Some(filter)).await?;
        if pages.len() > 1 {
            tracing::warn!(task_id, count = pages.len(), "several workspace pages share one task id");
        }
        Ok(if pages.is_empty() { None } else { Some(pages.swap_remove(0)) })
    }

    /// Looks up the workspace user whose display name matches `name`.
    async fn resolve_user(&self, name: &str) -> Result<String, TaskError> {
        let mut cursor: Option<String> = None;
        loop {
            let mut url = Url::parse(&self.url("users"))
                .map_err(|e| TaskError::permanent(format!("Invalid workspace API URL: {e}")))?;
            url.query_pairs_mut().append_pair("page_size", &PAGE_SIZE.to_string());
            if let Some(cursor) = &cursor {
                url.query_pairs_mut().append_pair("start_cursor", cursor);
            }
            let response = self.send(self.client.get(url)).await?;
            let users = response.get("results").and_then(Value::as_array).cloned().unwrap_or_default();
            let found = users.iter().find_map(|user| {
                let user_name = user.get("name").and_then(Value::as_str)?;
                if user_name.trim().eq_ignore_ascii_case(name.trim()) {
                    user.get("id").and_then(Value::as_str).map(str::to_string)
                } else {
                    None
                }
            });
            if let Some(id) = found {
                return Ok(id);
            }

            cursor = match response.get("has_more").and_then(Value::as_bool) {
                Some(true) => response.get("next_cursor").and_then(Value::as_str).map(str::to_string),
                _ => None,
            };
            if cursor.is_none() {
                return Err(TaskError::Validation(ValidationErrors::single(
                    "assignee",
                    format!("'{name}' is not a member of the workspace"),
                )));
            }
        }
    }

    /// Reuses the page's current user id when the assignee name is unchanged.
    async fn assignee_id(
        &self,
        task: &Task,
        known: Option<(&str, &str)>,
    ) -> Result<Option<String>, TaskError> {
        let Some(name) = task.assignee.as_deref() else {
            return Ok(None);
        };
        if let Some((known_name, known_id)) = known {
            if known_name == name {
                return Ok(Some(known_id.to_string()));
            }
        }
        self.resolve_user(name).await.map(Some)
    }
}

fn api_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

#[async_trait]
impl TaskStore for NotionStore {
    fn backend_name(&self) -> &'static str {
        "notion"
    }

    async fn list(&self) -> Result<Vec<Task>, TaskError> {
        let pages = self.query_pages(None).await?;
        tracing::debug!(count = pages.len(), "workspace tasks listed");
        Ok(pages.into_iter().map(|p| p.task).collect())
    }

    async fn get(&self, task_id: u64) -> Result<Option<Task>, TaskError> {
        Ok(self.find_page(task_id).await?.map(|p| p.task))
    }

    async fn create(&self, mut task: Task) -> Result<Task, TaskError> {
        let _guard = self.write_lock.lock().await;
        let existing = self.query_pages(None).await?;
        task.task_id = existing
            .iter()
            .map(|p| p.task.task_id)
            .max()
            .unwrap_or(0)
            .checked_add(1)
            .ok_or_else(|| TaskError::permanent("Workspace task ids are exhausted"))?;
        notion_properties::check_text_limits(&task)?;

        let assignee_id = self.assignee_id(&task, None).await?;
        let body = json!({
            "parent": { "database_id": self.database_id },
            "properties": notion_properties::task_to_properties(&task, assignee_id.as_deref()),
        });
        let page = self.send(self.client.post(self.url("pages")).json(&body)).await?;
        let mut created = notion_properties::page_to_task(&page)?.task;
        if let Some(stamp) = task.updated_at {
            created.touch(stamp);
        }
        tracing::debug!(task_id = created.task_id, "workspace page created");
        Ok(created)
    }

    async fn update(&self, task_id: u64, mutation: TaskMutation) -> Result<Option<Task>, TaskError> {
        let _guard = self.write_lock.lock().await;
        let Some(remote) = self.find_page(task_id).await? else {
            return Ok(None);
        };
        let previous_assignee = remote.task.assignee.clone();
        let mut task = remote.task;
        mutation(&mut task)?;
        notion_properties::check_text_limits(&task)?;

        let known = previous_assignee.as_deref().zip(remote.assignee_id.as_deref());
        let assignee_id = self.assignee_id(&task, known).await?;
        let body = json!({
            "properties": notion_properties::task_to_properties(&task, assignee_id.as_deref()),
        });
        let url = self.url(&format!("pages/{}", remote.page_id));
        let page = self.send(self.client.patch(&url).json(&body)).await?;
        let mut updated = notion_properties::page_to_task(&page)?.task;
        if let Some(stamp) = task.updated_at {
            updated.touch(stamp);
        }
        tracing::debug!(task_id, page_id = %remote.page_id, "workspace page updated");
        Ok(Some(updated))
    }
}
