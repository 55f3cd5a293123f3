use serde::Deserialize;

use crate::{task_error::{TaskError, ValidationErrors}, task_schema};

/// Body of `PATCH /tasks/{task_id}/link`.
#[derive(Debug, Clone, Deserialize)]
pub struct LinkRequest {
    #[serde(default, alias = "link")]
    pub url: String,
}

impl LinkRequest {
    pub fn validate(self) -> Result<String, TaskError> {
        let mut errors = ValidationErrors::new();
        if self.url.trim().is_empty() {
            errors.push("url", "is required");
            return Err(TaskError::Validation(errors));
        }
        let url = task_schema::check_url("url", Some(self.url), &mut errors);
        errors.into_result(url.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_must_be_a_web_url() {
        let ok = LinkRequest { url: " https://example.com/doc ".to_string() };
        assert_eq!(ok.validate().unwrap(), "https://example.com/doc");

        let bad: LinkRequest = serde_json::from_str(r#"{"link":"not a url"}"#).unwrap();
        assert!(matches!(bad.validate(), Err(TaskError::Validation(e)) if e.has("url")));
    }
}
