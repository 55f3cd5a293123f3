// Requests
pub mod create_task_request;
pub mod update_task_request;
pub mod status_update_request;
pub mod comment_request;
pub mod link_request;


// Responses
pub mod message_response;
