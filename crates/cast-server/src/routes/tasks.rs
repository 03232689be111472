//! Task CRUD endpoints.

use axum::Json;
use axum::Router;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use serde::{Deserialize, Serialize};

use cast_core::input::NewTask;
use cast_core::responses::{TaskSummary, TaskView};
use cast_telegram::Messenger;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub fn routes<M: Messenger>() -> Router<AppState<M>> {
    Router::new()
        .route("/api/tasks", get(list_tasks::<M>).post(create_task::<M>))
        .route(
            "/api/tasks/:id",
            get(get_task::<M>).delete(delete_task::<M>),
        )
        .route("/api/tasks/:id/start", post(start_task::<M>))
        .route("/api/tasks/:id/stop", post(stop_task::<M>))
}

/// `GET /api/tasks` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskList {
    pub tasks: Vec<TaskView>,
}

/// Acknowledgement for mutating endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ack {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task: Option<TaskSummary>,
}

impl Ack {
    const fn ok() -> Self {
        Self {
            success: true,
            task: None,
        }
    }

    const fn with_task(task: TaskSummary) -> Self {
        Self {
            success: true,
            task: Some(task),
        }
    }
}

async fn list_tasks<M: Messenger>(State(state): State<AppState<M>>) -> Json<TaskList> {
    Json(TaskList {
        tasks: state.manager.list().await,
    })
}

async fn create_task<M: Messenger>(
    State(state): State<AppState<M>>,
    body: Result<Json<NewTask>, JsonRejection>,
) -> ApiResult<Json<Ack>> {
    let Json(request) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let summary = state.manager.create(&request).await?;
    Ok(Json(Ack::with_task(summary)))
}

async fn get_task<M: Messenger>(
    State(state): State<AppState<M>>,
    Path(id): Path<String>,
) -> ApiResult<Json<TaskView>> {
    state
        .manager
        .get(&id)
        .await
        .map(Json)
        .ok_or_else(|| task_not_found(&id))
}

async fn start_task<M: Messenger>(
    State(state): State<AppState<M>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Ack>> {
    state
        .manager
        .start(&id)
        .await
        .map(|summary| Json(Ack::with_task(summary)))
        .ok_or_else(|| task_not_found(&id))
}

async fn stop_task<M: Messenger>(
    State(state): State<AppState<M>>,
    Path(id): Path<String>,
) -> Json<Ack> {
    state.manager.stop(&id).await;
    Json(Ack::ok())
}

async fn delete_task<M: Messenger>(
    State(state): State<AppState<M>>,
    Path(id): Path<String>,
) -> Json<Ack> {
    state.manager.delete(&id).await;
    Json(Ack::ok())
}

fn task_not_found(id: &str) -> ApiError {
    ApiError::NotFound {
        message: format!("Task not found: {id}"),
    }
}
