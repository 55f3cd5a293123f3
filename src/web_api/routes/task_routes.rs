use axum::{Router, routing::{get, patch}};
use crate::{app_state::SharedState, task_controller::TaskController};

pub const ROUTER_PATH: &str = "/tasks";

pub fn get_router(app_state: SharedState) -> Router {
    Router::new()
        .route(ROUTER_PATH, get(TaskController::get_all).post(TaskController::add))
        .route(format!("{}/active", ROUTER_PATH).as_str(), get(TaskController::get_active))
        .route(format!("{}/:task_id", ROUTER_PATH).as_str(), get(TaskController::get).put(TaskController::edit))
        .route(format!("{}/:task_id/status", ROUTER_PATH).as_str(), patch(TaskController::set_status))
        .route(format!("{}/:task_id/comment", ROUTER_PATH).as_str(), patch(TaskController::add_comment))
        .route(format!("{}/:task_id/link", ROUTER_PATH).as_str(), patch(TaskController::set_link))
        .with_state(app_state)
}
