use axum::{extract::State, Json};

use crate::{app_state::SharedState, message_response::MessageResponse};

pub struct RootController {}

impl RootController {
    pub async fn welcome() -> Json<MessageResponse> {
        Json(MessageResponse::new("To-Do Task Tracker API"))
    }

    pub async fn about(State(state): State<SharedState>) -> Json<MessageResponse> {
        Json(MessageResponse {
            message: "This is the about page.".to_string(),
            backend: Some(state.task_service.backend_name().to_string()),
        })
    }
}
