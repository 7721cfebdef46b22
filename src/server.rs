//!
//! corkboard HTTP server
//! ---------------------
//! Axum-based JSON API over the core. Each route runs the same pipeline:
//! bearer-token auth resolves the acting principal, the resource binder
//! loads the target entity, the access evaluator authorizes at the level the
//! route requires (member for read/use, owner for destructive changes), and
//! the matching service executes. The response layer maps `AppError` kinds
//! onto HTTP statuses and a `{success, message, ...}` JSON envelope.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, patch, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::json;
use tracing::info;

use crate::access::{self, AccessLevel};
use crate::bind;
use crate::error::{AppError, AppResult};
use crate::identity::{self, Principal, SessionManager};
use crate::input::{
    BoardInput, CommentInput, ListInput, LoginInput, MoveListInput, MoveTaskInput, RegisterInput,
    TaskInput, UpdateListInput, WorkspaceInput,
};
use crate::service;
use crate::store::SharedStore;
use crate::view::user_public;

/// Shared server state injected into all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
    pub sessions: Arc<SessionManager>,
}

impl AppState {
    pub fn new() -> Self {
        AppState { store: SharedStore::new(), sessions: Arc::new(SessionManager::default()) }
    }
}

impl Default for AppState {
    fn default() -> Self { Self::new() }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut body = json!({
            "success": false,
            "message": self.message(),
            "code": self.code_str(),
        });
        if let AppError::Validation { errors, .. } = &self {
            body["errors"] = serde_json::to_value(errors).unwrap_or_default();
        }
        (status, Json(body)).into_response()
    }
}

fn ok<T: Serialize>(message: &str, data: T) -> Response {
    (StatusCode::OK, Json(json!({"success": true, "message": message, "data": data}))).into_response()
}

fn created<T: Serialize>(message: &str, data: T) -> Response {
    (StatusCode::CREATED, Json(json!({"success": true, "message": message, "data": data}))).into_response()
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

fn authenticate(state: &AppState, headers: &HeaderMap) -> AppResult<Principal> {
    let Some(token) = bearer_token(headers) else {
        return Err(AppError::unauthenticated("no_token", "Not authorized, no token"));
    };
    state
        .sessions
        .validate(token)
        .ok_or_else(|| AppError::unauthenticated("invalid_token", "Unauthorized"))
}

fn require(allowed: bool, what: &str) -> AppResult<()> {
    if allowed {
        Ok(())
    } else {
        Err(AppError::forbidden("forbidden".to_string(), format!("Forbidden: No access to this {what}")))
    }
}

// --- auth ---

async fn register(State(state): State<AppState>, Json(input): Json<RegisterInput>) -> AppResult<Response> {
    let resp = identity::register(&state.store, &state.sessions, &input)?;
    Ok(created(
        "User registered successfully",
        json!({"token": resp.session.token, "user": user_public(&resp.user)}),
    ))
}

async fn login(State(state): State<AppState>, Json(input): Json<LoginInput>) -> AppResult<Response> {
    let resp = identity::login(&state.store, &state.sessions, &input)?;
    Ok(ok(
        "Login successful",
        json!({"token": resp.session.token, "user": user_public(&resp.user)}),
    ))
}

async fn logout(State(state): State<AppState>, headers: HeaderMap) -> AppResult<Response> {
    authenticate(&state, &headers)?;
    if let Some(token) = bearer_token(&headers) {
        state.sessions.logout(token);
    }
    Ok(ok("Logged out", ()))
}

// --- workspaces ---

async fn create_workspace(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<WorkspaceInput>,
) -> AppResult<Response> {
    let actor = authenticate(&state, &headers)?;
    let view = service::workspace::create_workspace(&state.store, &actor.user_id, &input)?;
    Ok(created("Workspace created successfully", view))
}

async fn my_workspaces(State(state): State<AppState>, headers: HeaderMap) -> AppResult<Response> {
    let actor = authenticate(&state, &headers)?;
    Ok(ok("Workspaces fetched successfully", service::workspace::my_workspaces(&state.store, &actor.user_id)))
}

async fn get_workspace(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> AppResult<Response> {
    let actor = authenticate(&state, &headers)?;
    let ws = bind::bind_workspace(&state.store.lock(), &id)?;
    require(access::workspace_access(&ws, &actor.user_id, AccessLevel::Member), "workspace")?;
    Ok(ok("Workspace fetched successfully", service::workspace::get_workspace(&state.store, &ws)))
}

async fn update_workspace(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(input): Json<WorkspaceInput>,
) -> AppResult<Response> {
    let actor = authenticate(&state, &headers)?;
    let ws = bind::bind_workspace(&state.store.lock(), &id)?;
    require(access::workspace_access(&ws, &actor.user_id, AccessLevel::Owner), "workspace")?;
    Ok(ok("Workspace updated successfully", service::workspace::update_workspace(&state.store, ws, &input)?))
}

async fn delete_workspace(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> AppResult<Response> {
    let actor = authenticate(&state, &headers)?;
    let ws = bind::bind_workspace(&state.store.lock(), &id)?;
    require(access::workspace_access(&ws, &actor.user_id, AccessLevel::Owner), "workspace")?;
    service::workspace::delete_workspace(&state.store, &ws.id)?;
    Ok(ok("Workspace successfully deleted", ()))
}

// --- boards ---

async fn create_board(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<BoardInput>,
) -> AppResult<Response> {
    let actor = authenticate(&state, &headers)?;
    input.validate()?;
    let ws = bind::bind_workspace(&state.store.lock(), &input.workspace_id)?;
    require(access::workspace_access(&ws, &actor.user_id, AccessLevel::Member), "workspace")?;
    Ok(created("Board created successfully", service::board::create_board(&state.store, &actor.user_id, &ws, &input)?))
}

async fn my_boards(State(state): State<AppState>, headers: HeaderMap) -> AppResult<Response> {
    let actor = authenticate(&state, &headers)?;
    Ok(ok("Boards fetched successfully", service::board::my_boards(&state.store, &actor.user_id)))
}

async fn boards_by_workspace(
    State(state): State<AppState>,
    Path(workspace_id): Path<String>,
    headers: HeaderMap,
) -> AppResult<Response> {
    let actor = authenticate(&state, &headers)?;
    let ws = bind::bind_workspace(&state.store.lock(), &workspace_id)?;
    require(access::workspace_access(&ws, &actor.user_id, AccessLevel::Member), "workspace")?;
    Ok(ok("Boards fetched successfully", service::board::boards_by_workspace(&state.store, &ws)))
}

async fn get_board(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> AppResult<Response> {
    let actor = authenticate(&state, &headers)?;
    let board = bind::bind_board(&state.store.lock(), &id)?;
    require(access::board_access(&board, &actor.user_id, AccessLevel::Member), "board")?;
    Ok(ok("Board fetched successfully", service::board::get_board(&state.store, &board)))
}

async fn update_board(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(input): Json<BoardInput>,
) -> AppResult<Response> {
    let actor = authenticate(&state, &headers)?;
    let board = bind::bind_board(&state.store.lock(), &id)?;
    require(access::board_access(&board, &actor.user_id, AccessLevel::Owner), "board")?;
    Ok(ok("Board updated successfully", service::board::update_board(&state.store, board, &input)?))
}

async fn delete_board(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> AppResult<Response> {
    let actor = authenticate(&state, &headers)?;
    let board = bind::bind_board(&state.store.lock(), &id)?;
    require(access::board_access(&board, &actor.user_id, AccessLevel::Owner), "board")?;
    service::board::delete_board(&state.store, &board.id)?;
    Ok(ok("Board successfully deleted", ()))
}

// --- lists ---

async fn create_list(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<ListInput>,
) -> AppResult<Response> {
    let actor = authenticate(&state, &headers)?;
    input.validate()?;
    let board = bind::bind_board(&state.store.lock(), &input.board_id)?;
    require(access::board_access(&board, &actor.user_id, AccessLevel::Member), "board")?;
    Ok(created("List created successfully", service::list::create_list(&state.store, &board, &input)?))
}

async fn lists_by_board(
    State(state): State<AppState>,
    Path(board_id): Path<String>,
    headers: HeaderMap,
) -> AppResult<Response> {
    let actor = authenticate(&state, &headers)?;
    let board = bind::bind_board(&state.store.lock(), &board_id)?;
    require(access::board_access(&board, &actor.user_id, AccessLevel::Member), "board")?;
    Ok(ok("Lists fetched successfully", service::list::lists_by_board(&state.store, &board)))
}

async fn get_list(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> AppResult<Response> {
    let actor = authenticate(&state, &headers)?;
    let guard = state.store.lock();
    let list = bind::bind_list(&guard, &id)?;
    require(access::list_access(&guard, &list, &actor.user_id, AccessLevel::Member), "list's board")?;
    drop(guard);
    Ok(ok("List fetched successfully", service::list::get_list(&state.store, &list)))
}

async fn update_list(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(input): Json<UpdateListInput>,
) -> AppResult<Response> {
    let actor = authenticate(&state, &headers)?;
    let guard = state.store.lock();
    let list = bind::bind_list(&guard, &id)?;
    require(access::list_access(&guard, &list, &actor.user_id, AccessLevel::Member), "list's board")?;
    drop(guard);
    Ok(ok("List updated successfully", service::list::update_list(&state.store, list, &input)?))
}

async fn move_list(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(input): Json<MoveListInput>,
) -> AppResult<Response> {
    let actor = authenticate(&state, &headers)?;
    let guard = state.store.lock();
    let list = bind::bind_list(&guard, &id)?;
    require(access::list_access(&guard, &list, &actor.user_id, AccessLevel::Member), "list's board")?;
    drop(guard);
    Ok(ok("List moved successfully", service::list::move_list(&state.store, list, &input)?))
}

async fn delete_list(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> AppResult<Response> {
    let actor = authenticate(&state, &headers)?;
    let guard = state.store.lock();
    let list = bind::bind_list(&guard, &id)?;
    require(access::list_access(&guard, &list, &actor.user_id, AccessLevel::Owner), "list's board")?;
    drop(guard);
    service::list::delete_list(&state.store, &list.id)?;
    Ok(ok("List successfully deleted", ()))
}

// --- tasks ---

async fn create_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<TaskInput>,
) -> AppResult<Response> {
    let actor = authenticate(&state, &headers)?;
    input.validate()?;
    let guard = state.store.lock();
    let list = bind::bind_list(&guard, &input.list_id)?;
    require(access::list_access(&guard, &list, &actor.user_id, AccessLevel::Member), "list's board")?;
    drop(guard);
    Ok(created("Task created successfully", service::task::create_task(&state.store, &list, &input)?))
}

async fn tasks_by_list(
    State(state): State<AppState>,
    Path(list_id): Path<String>,
    headers: HeaderMap,
) -> AppResult<Response> {
    let actor = authenticate(&state, &headers)?;
    let guard = state.store.lock();
    let list = bind::bind_list(&guard, &list_id)?;
    require(access::list_access(&guard, &list, &actor.user_id, AccessLevel::Member), "list's board")?;
    drop(guard);
    Ok(ok("Tasks fetched successfully", service::task::tasks_by_list(&state.store, &list)))
}

async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> AppResult<Response> {
    let actor = authenticate(&state, &headers)?;
    let guard = state.store.lock();
    let task = bind::bind_task(&guard, &id)?;
    require(access::task_access(&guard, &task, &actor.user_id, AccessLevel::Member), "task's list's board")?;
    drop(guard);
    Ok(ok("Task fetched successfully", service::task::get_task(&state.store, &task)))
}

async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(input): Json<TaskInput>,
) -> AppResult<Response> {
    let actor = authenticate(&state, &headers)?;
    input.validate()?;
    let guard = state.store.lock();
    let task = bind::bind_task(&guard, &id)?;
    require(access::task_access(&guard, &task, &actor.user_id, AccessLevel::Member), "task's list's board")?;
    // The target list may differ from the current one; it must be accessible too.
    let list = bind::bind_list(&guard, &input.list_id)?;
    require(access::list_access(&guard, &list, &actor.user_id, AccessLevel::Member), "list's board")?;
    drop(guard);
    Ok(ok("Task updated successfully", service::task::update_task(&state.store, task, &list, &input)?))
}

async fn move_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(input): Json<MoveTaskInput>,
) -> AppResult<Response> {
    let actor = authenticate(&state, &headers)?;
    input.validate()?;
    let guard = state.store.lock();
    let task = bind::bind_task(&guard, &id)?;
    require(access::task_access(&guard, &task, &actor.user_id, AccessLevel::Member), "task's list's board")?;
    let list = bind::bind_list(&guard, &input.list_id)?;
    require(access::list_access(&guard, &list, &actor.user_id, AccessLevel::Member), "list's board")?;
    drop(guard);
    Ok(ok("Task moved successfully", service::task::move_task(&state.store, task, &list, &input)?))
}

async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> AppResult<Response> {
    let actor = authenticate(&state, &headers)?;
    let guard = state.store.lock();
    let task = bind::bind_task(&guard, &id)?;
    require(access::task_access(&guard, &task, &actor.user_id, AccessLevel::Owner), "task's list's board")?;
    drop(guard);
    service::task::delete_task(&state.store, &task.id)?;
    Ok(ok("Task successfully deleted", ()))
}

// --- comments ---

async fn create_comment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<CommentInput>,
) -> AppResult<Response> {
    let actor = authenticate(&state, &headers)?;
    input.validate()?;
    let guard = state.store.lock();
    let task = bind::bind_task(&guard, &input.task_id)?;
    require(access::task_access(&guard, &task, &actor.user_id, AccessLevel::Member), "task's list's board")?;
    drop(guard);
    Ok(created("Comment created successfully", service::comment::create_comment(&state.store, &actor.user_id, &task, &input)?))
}

async fn comments_by_task(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
    headers: HeaderMap,
) -> AppResult<Response> {
    let actor = authenticate(&state, &headers)?;
    let guard = state.store.lock();
    let task = bind::bind_task(&guard, &task_id)?;
    require(access::task_access(&guard, &task, &actor.user_id, AccessLevel::Member), "task's list's board")?;
    drop(guard);
    Ok(ok("Comments fetched successfully", service::comment::comments_by_task(&state.store, &task)))
}

async fn delete_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> AppResult<Response> {
    let actor = authenticate(&state, &headers)?;
    let guard = state.store.lock();
    let comment = bind::bind_comment(&guard, &id)?;
    require(access::comment_delete_allowed(&guard, &comment, &actor.user_id), "comment")?;
    drop(guard);
    service::comment::delete_comment(&state.store, &comment.id)?;
    Ok(ok("Comment successfully deleted", ()))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/workspaces", post(create_workspace).get(my_workspaces))
        .route(
            "/api/workspaces/{id}",
            get(get_workspace).put(update_workspace).delete(delete_workspace),
        )
        .route("/api/boards", post(create_board).get(my_boards))
        .route("/api/boards/workspace/{workspaceId}", get(boards_by_workspace))
        .route("/api/boards/{id}", get(get_board).put(update_board).delete(delete_board))
        .route("/api/lists", post(create_list))
        .route("/api/lists/board/{boardId}", get(lists_by_board))
        .route("/api/lists/{id}", get(get_list).put(update_list).delete(delete_list))
        .route("/api/lists/{id}/move", patch(move_list))
        .route("/api/tasks", post(create_task))
        .route("/api/tasks/list/{listId}", get(tasks_by_list))
        .route("/api/tasks/{id}", get(get_task).put(update_task).delete(delete_task))
        .route("/api/tasks/{id}/move", patch(move_task))
        .route("/api/comments", post(create_comment))
        .route("/api/comments/task/{taskId}", get(comments_by_task))
        .route("/api/comments/{id}", delete(delete_comment))
        .with_state(state)
}

/// Start the HTTP server bound to the given port.
pub async fn run(http_port: u16) -> anyhow::Result<()> {
    let state = AppState::new();
    let app = router(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], http_port));
    info!(target: "corkboard::server", "listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
