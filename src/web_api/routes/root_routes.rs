use axum::{Router, routing::get};
use crate::{app_state::SharedState, root_controller::RootController};

pub fn get_router(app_state: SharedState) -> Router {
    Router::new()
        .route("/", get(RootController::welcome))
        .route("/about", get(RootController::about))
        .with_state(app_state)
}
