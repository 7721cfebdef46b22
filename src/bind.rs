//! Resource binder: turn a route identifier into a loaded, typed entity
//! before any authorization runs.
//!
//! Malformed identifiers fail fast with a validation error and never reach a
//! store lookup; absent entities fail with a `NotFound` naming the entity
//! kind. The loaded entity is returned to the caller and passed explicitly
//! through the handling stages — there is no shared mutable request context.

use crate::error::{AppError, AppResult};
use crate::ident::EntityId;
use crate::model::{Board, Comment, List, Task, User, Workspace};
use crate::store::Store;

fn bind_with<T>(
    kind: &str,
    raw: &str,
    lookup: impl FnOnce(&EntityId) -> Option<T>,
) -> AppResult<T> {
    let Some(id) = EntityId::parse(raw) else {
        return Err(AppError::invalid_field("id", &format!("Invalid {kind} ID format")));
    };
    lookup(&id).ok_or_else(|| {
        AppError::not_found(
            format!("{kind}_not_found"),
            format!("{} not found", capitalize(kind)),
        )
    })
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

pub fn bind_user(store: &Store, raw: &str) -> AppResult<User> {
    bind_with("user", raw, |id| store.user(id))
}

pub fn bind_workspace(store: &Store, raw: &str) -> AppResult<Workspace> {
    bind_with("workspace", raw, |id| store.workspace(id))
}

pub fn bind_board(store: &Store, raw: &str) -> AppResult<Board> {
    bind_with("board", raw, |id| store.board(id))
}

pub fn bind_list(store: &Store, raw: &str) -> AppResult<List> {
    bind_with("list", raw, |id| store.list(id))
}

pub fn bind_task(store: &Store, raw: &str) -> AppResult<Task> {
    bind_with("task", raw, |id| store.task(id))
}

pub fn bind_comment(store: &Store, raw: &str) -> AppResult<Comment> {
    bind_with("comment", raw, |id| store.comment(id))
}
