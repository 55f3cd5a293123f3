//! Mapping between `Task` and a workspace database page's property bag.
//!
//! The public `task_id` lives in the page's `Task id` number property; the
//! page's own id is only used to address it for updates.

use chrono::{DateTime, Utc};
use serde_json::{json, Map, Value};

use crate::{
    task::Task,
    task_error::{TaskError, ValidationErrors},
    task_schema, task_status,
};

pub const TASK_ID: &str = "Task id";
pub const TASK_NAME: &str = "Task name";
pub const STATUS: &str = "Status";
pub const ASSIGNEE: &str = "Assignee";
pub const DUE_DATE: &str = "Due date";
pub const PRIORITY: &str = "Priority";
pub const TASK_TYPE: &str = "Task type";
pub const DESCRIPTION: &str = "Description";
pub const ATTACH_FILE: &str = "Attach file";
pub const PAST_DUE: &str = "Past due";
pub const EFFORT_LEVEL: &str = "Effort level";
pub const SUMMARY: &str = "Summary";
pub const COMMENTS: &str = "Comments";
pub const LINK: &str = "Link";

// Rich text objects are capped at 2000 characters each, and a property
// holds at most 100 of them.
const RICH_TEXT_CHUNK: usize = 2000;
const RICH_TEXT_MAX_ITEMS: usize = 100;

/// A task together with the page that stores it.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteTask {
    pub page_id: String,
    /// Workspace user behind `task.assignee`, when the page names one.
    pub assignee_id: Option<String>,
    pub task: Task,
}

fn prop<'a>(props: &'a Value, name: &str) -> Option<&'a Value> {
    props.get(name).filter(|v| !v.is_null())
}

fn plain_text(items: Option<&Value>) -> Option<String> {
    let text: String = items?
        .as_array()?
        .iter()
        .filter_map(|item| {
            item.get("plain_text")
                .or_else(|| item.get("text").and_then(|t| t.get("content")))
                .and_then(Value::as_str)
        })
        .collect();
    task_schema::clean_text(Some(text))
}

fn select_name(props: &Value, name: &str) -> Option<String> {
    let p = prop(props, name)?;
    p.get("select")
        .or_else(|| p.get("status"))
        .and_then(|s| s.get("name"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn rich_text(props: &Value, name: &str) -> Option<String> {
    plain_text(prop(props, name)?.get("rich_text"))
}

/// `(user id, display name)` of the first assigned person.
fn first_person(props: &Value) -> (Option<String>, Option<String>) {
    let Some(p) = prop(props, ASSIGNEE) else {
        return (None, None);
    };
    if let Some(person) = p.get("people").and_then(Value::as_array).and_then(|people| people.first()) {
        let field = |key: &str| person.get(key).and_then(Value::as_str).map(str::to_string);
        return (field("id"), field("name"));
    }
    (None, plain_text(p.get("rich_text")))
}

fn first_file_url(props: &Value) -> Option<String> {
    let files = prop(props, ATTACH_FILE)?.get("files")?.as_array()?;
    files.iter().find_map(|f| {
        f.get("external")
            .or_else(|| f.get("file"))
            .and_then(|inner| inner.get("url"))
            .and_then(Value::as_str)
            .map(str::to_string)
    })
}

/// The public id stored on a page, if it has one.
pub fn page_task_id(page: &Value) -> Option<u64> {
    prop(page.get("properties")?, TASK_ID)?
        .get("number")
        .and_then(|n| n.as_u64().or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)))
}

/// Comments are written as a JSON array of strings. Text that is not such
/// an array was typed into the workspace by hand and is read one line per
/// comment.
fn read_comments(text: Option<String>) -> Vec<String> {
    let Some(text) = text else {
        return Vec::new();
    };
    if let Ok(comments) = serde_json::from_str::<Vec<String>>(&text) {
        return comments;
    }
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn encode_comments(comments: &[String]) -> Option<String> {
    if comments.is_empty() {
        return None;
    }
    serde_json::to_string(comments).ok()
}

/// Reads a query result or page response into a task.
pub fn page_to_task(page: &Value) -> Result<RemoteTask, TaskError> {
    let page_id = page
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| TaskError::permanent("Workspace page has no id"))?
        .to_string();
    let props = page
        .get("properties")
        .ok_or_else(|| TaskError::permanent(format!("Workspace page {page_id} has no properties")))?;
    let task_id = page_task_id(page)
        .ok_or_else(|| TaskError::permanent(format!("Workspace page {page_id} has no '{TASK_ID}' number")))?;

    let comments = read_comments(rich_text(props, COMMENTS));

    let (assignee_id, assignee) = first_person(props);

    let task = Task {
        task_id,
        task_name: plain_text(prop(props, TASK_NAME).and_then(|p| p.get("title"))).unwrap_or_default(),
        status: select_name(props, STATUS).unwrap_or_else(task_status::default_status),
        assignee,
        due_date: prop(props, DUE_DATE)
            .and_then(|p| p.get("date"))
            .and_then(|d| d.get("start"))
            .and_then(Value::as_str)
            .and_then(task_schema::parse_date),
        priority: select_name(props, PRIORITY),
        task_type: select_name(props, TASK_TYPE),
        description: rich_text(props, DESCRIPTION),
        attach_file: first_file_url(props),
        past_due: false,
        updated_at: page
            .get("last_edited_time")
            .and_then(Value::as_str)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc)),
        effort_level: select_name(props, EFFORT_LEVEL),
        summary: rich_text(props, SUMMARY),
        comments,
        link: prop(props, LINK)
            .and_then(|p| p.get("url"))
            .and_then(Value::as_str)
            .map(str::to_string),
    };
    Ok(RemoteTask { page_id, assignee_id, task })
}

fn text_value(text: Option<&str>) -> Value {
    let Some(text) = text else {
        return json!([]);
    };
    let chars: Vec<char> = text.chars().collect();
    let chunks: Vec<Value> = chars
        .chunks(RICH_TEXT_CHUNK)
        .map(|chunk| json!({ "text": { "content": chunk.iter().collect::<String>() } }))
        .collect();
    Value::Array(chunks)
}

fn check_length(field: &'static str, text: Option<&str>, errors: &mut ValidationErrors) {
    let limit = RICH_TEXT_CHUNK * RICH_TEXT_MAX_ITEMS;
    if text.is_some_and(|t| t.chars().count() > limit) {
        errors.push(field, format!("exceeds the workspace limit of {limit} characters"));
    }
}

/// Rejects a task whose text would not fit in its workspace property.
pub fn check_text_limits(task: &Task) -> Result<(), TaskError> {
    let mut errors = ValidationErrors::new();
    check_length("task_name", Some(task.task_name.as_str()), &mut errors);
    check_length("description", task.description.as_deref(), &mut errors);
    check_length("summary", task.summary.as_deref(), &mut errors);
    check_length("comments", encode_comments(&task.comments).as_deref(), &mut errors);
    errors.into_result(())
}

fn select_value(name: Option<&str>) -> Value {
    match name {
        Some(name) => json!({ "select": { "name": name } }),
        None => json!({ "select": null }),
    }
}

/// Full property set for a page write. `assignee_id` is the resolved
/// workspace user for `task.assignee`, if any.
pub fn task_to_properties(task: &Task, assignee_id: Option<&str>) -> Value {
    let mut props = Map::new();
    props.insert(TASK_ID.into(), json!({ "number": task.task_id }));
    props.insert(TASK_NAME.into(), json!({ "title": text_value(Some(task.task_name.as_str())) }));
    props.insert(STATUS.into(), select_value(Some(task.status.as_str())));
    props.insert(
        ASSIGNEE.into(),
        match assignee_id {
            Some(id) => json!({ "people": [{ "id": id }] }),
            None => json!({ "people": [] }),
        },
    );
    props.insert(
        DUE_DATE.into(),
        match task.due_date {
            Some(due) => json!({ "date": { "start": due.format(task_schema::DATE_FORMAT).to_string() } }),
            None => json!({ "date": null }),
        },
    );
    props.insert(PRIORITY.into(), select_value(task.priority.as_deref()));
    props.insert(TASK_TYPE.into(), select_value(task.task_type.as_deref()));
    props.insert(DESCRIPTION.into(), json!({ "rich_text": text_value(task.description.as_deref()) }));
    props.insert(
        ATTACH_FILE.into(),
        match &task.attach_file {
            Some(url) => json!({ "files": [{ "name": "file", "external": { "url": url } }] }),
            None => json!({ "files": [] }),
        },
    );
    props.insert(PAST_DUE.into(), json!({ "checkbox": task.past_due }));
    props.insert(EFFORT_LEVEL.into(), select_value(task.effort_level.as_deref()));
    props.insert(SUMMARY.into(), json!({ "rich_text": text_value(task.summary.as_deref()) }));
    let comments = encode_comments(&task.comments);
    props.insert(COMMENTS.into(), json!({ "rich_text": text_value(comments.as_deref()) }));
    props.insert(LINK.into(), json!({ "url": task.link }));
    Value::Object(props)
}
