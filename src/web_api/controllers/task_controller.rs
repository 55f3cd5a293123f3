use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    app_state::SharedState, comment_request::CommentRequest,
    create_task_request::CreateTaskRequest, link_request::LinkRequest,
    status_update_request::StatusUpdateRequest, task::Task,
    update_task_request::UpdateTaskRequest,
};

pub struct TaskController {}

impl TaskController {
    pub async fn get_all(State(state): State<SharedState>) -> Result<Json<Vec<Task>>, (StatusCode, String)> {
        Ok(Json(state.task_service.list_tasks().await?))
    }

    pub async fn get_active(State(state): State<SharedState>) -> Result<Json<Vec<Task>>, (StatusCode, String)> {
        Ok(Json(state.task_service.list_active_tasks().await?))
    }

    pub async fn get(
        State(state): State<SharedState>,
        Path(task_id): Path<u64>) -> Result<Json<Task>, (StatusCode, String)> {
        Ok(Json(state.task_service.get_task(task_id).await?))
    }

    pub async fn add(
        State(state): State<SharedState>,
        Json(body): Json<CreateTaskRequest>) -> Result<(StatusCode, Json<Task>), (StatusCode, String)> {
        let task = state.task_service.create_task(body).await?;
        Ok((StatusCode::CREATED, Json(task)))
    }

    pub async fn edit(
        State(state): State<SharedState>,
        Path(task_id): Path<u64>,
        Json(body): Json<UpdateTaskRequest>) -> Result<Json<Task>, (StatusCode, String)> {
        Ok(Json(state.task_service.update_task(task_id, body).await?))
    }

    pub async fn set_status(
        State(state): State<SharedState>,
        Path(task_id): Path<u64>,
        Json(body): Json<StatusUpdateRequest>) -> Result<Json<Task>, (StatusCode, String)> {
        let status = body.validate()?;
        Ok(Json(state.task_service.update_status(task_id, status).await?))
    }

    pub async fn add_comment(
        State(state): State<SharedState>,
        Path(task_id): Path<u64>,
        Json(body): Json<CommentRequest>) -> Result<Json<Task>, (StatusCode, String)> {
        let comment = body.validate()?;
        Ok(Json(state.task_service.add_comment(task_id, comment).await?))
    }

    pub async fn set_link(
        State(state): State<SharedState>,
        Path(task_id): Path<u64>,
        Json(body): Json<LinkRequest>) -> Result<Json<Task>, (StatusCode, String)> {
        let url = body.validate()?;
        Ok(Json(state.task_service.add_link(task_id, url).await?))
    }
}
