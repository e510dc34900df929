use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    routing::{delete, get, post, put},
};

use tasktrack_core::{Task, TaskId};

use crate::app::dto::{CreateTaskRequest, TaskCreatedResponse, UpdateTaskRequest};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::context::AuthContext;

pub fn router() -> Router {
    Router::new()
        .route("/create", post(create_task))
        .route("/get/all", get(list_tasks))
        .route("/get/:task_id", get(get_task))
        .route("/update/:task_id", put(update_task))
        .route("/delete/:task_id", delete(delete_task))
}

async fn create_task(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Json(body): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<TaskCreatedResponse>), ApiError> {
    let owner = ctx.owner_id(&services.owner_claim)?;
    let task = Task::new(body.name, body.description)?;

    services.tasks.upsert(&owner, &task).await?;
    tracing::debug!(owner = %owner, task_id = %task.id, "task created");

    Ok((StatusCode::ACCEPTED, Json(TaskCreatedResponse { task_id: task.id })))
}

async fn list_tasks(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let owner = ctx.owner_id(&services.owner_claim)?;
    Ok(Json(services.tasks.read_all(&owner).await?))
}

async fn get_task(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Path(task_id): Path<String>,
) -> Result<Json<Task>, ApiError> {
    let owner = ctx.owner_id(&services.owner_claim)?;
    // Malformed ids can never have been stored.
    let task_id: TaskId = task_id.parse().map_err(|_| ApiError::NotFound)?;

    Ok(Json(services.tasks.read(&owner, &task_id.to_string()).await?))
}

async fn update_task(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Path(task_id): Path<String>,
    Json(body): Json<UpdateTaskRequest>,
) -> Result<StatusCode, ApiError> {
    let owner = ctx.owner_id(&services.owner_claim)?;
    let task_id: TaskId = task_id
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("invalid task id: {task_id}")))?;

    let task = Task::with_id(task_id, body.name, body.description, body.is_completed)?;
    services.tasks.upsert(&owner, &task).await?;

    Ok(StatusCode::NO_CONTENT)
}

async fn delete_task(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Path(task_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let owner = ctx.owner_id(&services.owner_claim)?;

    match task_id.parse::<TaskId>() {
        Ok(task_id) => services.tasks.delete(&owner, &task_id.to_string()).await?,
        Err(_) => tracing::debug!(%task_id, "delete of malformed task id is a no-op"),
    }

    Ok(StatusCode::OK)
}
