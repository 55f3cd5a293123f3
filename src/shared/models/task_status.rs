//! Status vocabulary. Statuses are free text; these are the recommended values.

pub const NOT_STARTED: &str = "Not Started";
pub const IN_PROGRESS: &str = "In Progress";
pub const DONE: &str = "Done";

pub const RECOMMENDED: [&str; 3] = [NOT_STARTED, IN_PROGRESS, DONE];

const DONE_SET: [&str; 2] = ["done", "completed"];

pub fn default_status() -> String {
    NOT_STARTED.to_string()
}

/// True when the status belongs to the done set (case-insensitive, trimmed).
pub fn is_done(status: &str) -> bool {
    let status = status.trim().to_lowercase();
    DONE_SET.contains(&status.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn done_set_ignores_case_and_padding() {
        assert!(is_done("Done"));
        assert!(is_done(" done "));
        assert!(is_done("Completed"));
        assert!(!is_done("In Progress"));
        assert!(!is_done(""));
    }
}
