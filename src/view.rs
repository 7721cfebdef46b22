//! Read-side projections returned by the services: entities with their
//! cross-references resolved to human-readable refs (names, emails) instead
//! of bare ids. Resolution is best-effort — a dangling reference degrades to
//! an id-only ref with a warning, it is never a hard failure.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

use crate::ident::EntityId;
use crate::model::{Board, Comment, List, Priority, Task, Workspace};
use crate::store::Store;

#[derive(Debug, Clone, Serialize)]
pub struct UserRef {
    pub id: EntityId,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NamedRef {
    pub id: EntityId,
    pub name: String,
}

/// Public projection of a user (no credential material).
pub fn user_public(user: &crate::model::User) -> UserRef {
    UserRef { id: user.id.clone(), name: user.name.clone(), email: user.email.clone() }
}

fn user_ref(store: &Store, id: &EntityId) -> UserRef {
    match store.user(id) {
        Some(u) => UserRef { id: u.id, name: u.name, email: u.email },
        None => {
            warn!(target: "corkboard::view", "dangling user reference {}", id);
            UserRef { id: id.clone(), name: String::new(), email: String::new() }
        }
    }
}

fn named_ref(id: &EntityId, name: Option<String>, kind: &str) -> NamedRef {
    match name {
        Some(name) => NamedRef { id: id.clone(), name },
        None => {
            warn!(target: "corkboard::view", "dangling {} reference {}", kind, id);
            NamedRef { id: id.clone(), name: String::new() }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceView {
    pub id: EntityId,
    pub name: String,
    pub owner: UserRef,
    pub members: Vec<UserRef>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub fn workspace_view(store: &Store, ws: &Workspace) -> WorkspaceView {
    WorkspaceView {
        id: ws.id.clone(),
        name: ws.name.clone(),
        owner: user_ref(store, &ws.owner),
        members: ws.members.iter().map(|m| user_ref(store, m)).collect(),
        created_at: ws.created_at,
        updated_at: ws.updated_at,
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardView {
    pub id: EntityId,
    pub name: String,
    pub owner: UserRef,
    pub members: Vec<UserRef>,
    pub workspace: NamedRef,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub fn board_view(store: &Store, board: &Board) -> BoardView {
    BoardView {
        id: board.id.clone(),
        name: board.name.clone(),
        owner: user_ref(store, &board.owner),
        members: board.members.iter().map(|m| user_ref(store, m)).collect(),
        workspace: named_ref(&board.workspace, store.workspace(&board.workspace).map(|w| w.name), "workspace"),
        created_at: board.created_at,
        updated_at: board.updated_at,
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListView {
    pub id: EntityId,
    pub name: String,
    pub board: NamedRef,
    pub position: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub fn list_view(store: &Store, list: &List) -> ListView {
    ListView {
        id: list.id.clone(),
        name: list.name.clone(),
        board: named_ref(&list.board, store.board(&list.board).map(|b| b.name), "board"),
        position: list.position,
        created_at: list.created_at,
        updated_at: list.updated_at,
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskView {
    pub id: EntityId,
    pub title: String,
    pub description: String,
    pub list: NamedRef,
    pub position: i64,
    pub due_date: DateTime<Utc>,
    pub priority: Priority,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub fn task_view(store: &Store, task: &Task) -> TaskView {
    TaskView {
        id: task.id.clone(),
        title: task.title.clone(),
        description: task.description.clone(),
        list: named_ref(&task.list, store.list(&task.list).map(|l| l.name), "list"),
        position: task.position,
        due_date: task.due_date,
        priority: task.priority,
        created_at: task.created_at,
        updated_at: task.updated_at,
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub id: EntityId,
    pub text: String,
    pub task: NamedRef,
    pub author: UserRef,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub fn comment_view(store: &Store, comment: &Comment) -> CommentView {
    CommentView {
        id: comment.id.clone(),
        text: comment.text.clone(),
        task: named_ref(&comment.task, store.task(&comment.task).map(|t| t.title), "task"),
        author: user_ref(store, &comment.author),
        created_at: comment.created_at,
        updated_at: comment.updated_at,
    }
}
