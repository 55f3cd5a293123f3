pub mod app_state;
pub mod settings;
pub mod task;
pub mod task_error;
pub mod task_priority;
pub mod task_schema;
pub mod task_status;
