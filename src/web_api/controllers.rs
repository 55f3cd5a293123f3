pub mod root_controller;
pub mod task_controller;
