//! Field-level rules shared by the create and update payloads.

use chrono::{DateTime, NaiveDate};
use reqwest::Url;

use super::task_error::ValidationErrors;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Trim; blank text counts as absent.
pub fn clean_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// `YYYY-MM-DD`, or an RFC 3339 timestamp truncated to its date.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
}

pub fn is_web_url(value: &str) -> bool {
    Url::parse(value)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
        .unwrap_or(false)
}

pub fn require_name(value: Option<String>, errors: &mut ValidationErrors) -> Option<String> {
    let name = clean_text(value);
    if name.is_none() {
        errors.push("task_name", "is required and must not be empty");
    }
    name
}

pub fn check_due_date(value: Option<String>, errors: &mut ValidationErrors) -> Option<NaiveDate> {
    let raw = clean_text(value)?;
    let parsed = parse_date(&raw);
    if parsed.is_none() {
        errors.push("due_date", format!("'{raw}' is not a valid calendar date (expected YYYY-MM-DD)"));
    }
    parsed
}

pub fn check_url(
    field: &'static str,
    value: Option<String>,
    errors: &mut ValidationErrors,
) -> Option<String> {
    let url = clean_text(value)?;
    if is_web_url(&url) {
        Some(url)
    } else {
        errors.push(field, format!("'{url}' is not an absolute http(s) URL"));
        None
    }
}

/// Present-but-blank is rejected; absent is fine.
pub fn check_not_blank(
    field: &'static str,
    value: Option<String>,
    errors: &mut ValidationErrors,
) -> Option<String> {
    let raw = value?;
    let cleaned = clean_text(Some(raw));
    if cleaned.is_none() {
        errors.push(field, "must not be blank");
    }
    cleaned
}
