use std::fmt;

use axum::http::StatusCode;
use thiserror::Error;

/// A single rejected input field and why it was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub reason: String,
}

/// Every offending field found while validating one payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    pub fields: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &'static str, reason: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.push(field, reason);
        errors
    }

    pub fn push(&mut self, field: &'static str, reason: impl Into<String>) {
        self.fields.push(FieldError { field, reason: reason.into() });
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn has(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f.field == field)
    }

    /// `Ok(value)` when nothing was rejected.
    pub fn into_result<T>(self, value: T) -> Result<T, TaskError> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(TaskError::Validation(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .fields
            .iter()
            .map(|e| format!("{}: {}", e.field, e.reason))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("Invalid task payload: {0}")]
    Validation(ValidationErrors),
    #[error("Task {0} not found")]
    NotFound(u64),
    #[error("Task backend unavailable ({}): {message}", transience(.transient))]
    BackendUnavailable { transient: bool, message: String },
    #[error("Task storage failure: {0}")]
    Storage(String),
}

fn transience(transient: &bool) -> &'static str {
    if *transient { "transient" } else { "permanent" }
}

impl TaskError {
    pub fn transient(message: impl Into<String>) -> Self {
        Self::BackendUnavailable { transient: true, message: message.into() }
    }

    pub fn permanent(message: impl Into<String>) -> Self {
        Self::BackendUnavailable { transient: false, message: message.into() }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            TaskError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            TaskError::NotFound(_) => StatusCode::NOT_FOUND,
            TaskError::BackendUnavailable { transient: true, .. } => StatusCode::SERVICE_UNAVAILABLE,
            TaskError::BackendUnavailable { transient: false, .. } => StatusCode::BAD_GATEWAY,
            TaskError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<std::io::Error> for TaskError {
    fn from(value: std::io::Error) -> Self {
        Self::Storage(value.to_string())
    }
}

impl From<reqwest::Error> for TaskError {
    fn from(value: reqwest::Error) -> Self {
        let transient = value.is_timeout()
            || value.is_connect()
            || value
                .status()
                .is_some_and(|s| s.is_server_error() || s.as_u16() == 429);
        Self::BackendUnavailable { transient, message: value.to_string() }
    }
}

// Controllers answer with `(StatusCode, String)`, so `?` converts directly.
impl From<TaskError> for (StatusCode, String) {
    fn from(value: TaskError) -> Self {
        let status = value.status_code();
        if status.is_server_error() {
            tracing::error!(%status, error = %value, "request failed");
        }
        (status, value.to_string())
    }
}
