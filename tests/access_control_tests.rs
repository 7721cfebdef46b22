//! Access-control integration tests: member/owner/author rules across the
//! Workspace -> Board -> List -> Task -> Comment chain, exercised through the
//! public registration and service APIs.

use corkboard::access::{self, AccessLevel};
use corkboard::ident::EntityId;
use corkboard::identity::{register, SessionManager};
use corkboard::input::{
    BoardInput, CommentInput, ListInput, RegisterInput, TaskInput, WorkspaceInput,
};
use corkboard::model::{Board, List, Priority, Task, Workspace};
use corkboard::service::{board, comment, list, task, workspace};
use corkboard::store::SharedStore;

fn register_user(store: &SharedStore, name: &str) -> EntityId {
    let sm = SessionManager::default();
    let resp = register(
        store,
        &sm,
        &RegisterInput {
            name: name.into(),
            email: format!("{}@example.com", name.to_ascii_lowercase()),
            password: "password1".into(),
        },
    )
    .expect("registration");
    resp.user.id
}

struct World {
    store: SharedStore,
    owner: EntityId,
    member: EntityId,
    outsider: EntityId,
    workspace: Workspace,
    board: Board,
    list: List,
    task: Task,
}

/// Owner creates workspace W, board B under it, list L1 and task T1; a second
/// user is added to the board's members; the outsider has no grants at all.
fn world() -> World {
    let store = SharedStore::new();
    let owner = register_user(&store, "Alice");
    let member = register_user(&store, "Bob");
    let outsider = register_user(&store, "Carol");

    let ws_view = workspace::create_workspace(&store, &owner, &WorkspaceInput { name: "Workspace W".into() })
        .expect("workspace");
    let workspace = store.lock().workspace(&ws_view.id).unwrap();

    let board_view = board::create_board(
        &store,
        &owner,
        &workspace,
        &BoardInput { name: "Board B".into(), workspace_id: workspace.id.to_string() },
    )
    .expect("board");
    let mut board_entity = store.lock().board(&board_view.id).unwrap();
    board_entity.members.push(member.clone());
    let board_entity = store.lock().update_board(board_entity);

    let list_view = list::create_list(
        &store,
        &board_entity,
        &ListInput { name: "List L1".into(), board_id: board_entity.id.to_string(), position: 1 },
    )
    .expect("list");
    let list_entity = store.lock().list(&list_view.id).unwrap();

    let task_view = task::create_task(
        &store,
        &list_entity,
        &TaskInput {
            title: "Task T1".into(),
            description: None,
            list_id: list_entity.id.to_string(),
            position: 1,
            due_date: chrono::Utc::now(),
            priority: Priority::Medium,
        },
    )
    .expect("task");
    let task_entity = store.lock().task(&task_view.id).unwrap();

    World { store, owner, member, outsider, workspace, board: board_entity, list: list_entity, task: task_entity }
}

#[test]
fn board_access_is_exactly_owner_and_members() {
    let w = world();
    assert!(access::board_access(&w.board, &w.owner, AccessLevel::Member));
    assert!(access::board_access(&w.board, &w.member, AccessLevel::Member));
    assert!(!access::board_access(&w.board, &w.outsider, AccessLevel::Member));
}

#[test]
fn workspace_membership_does_not_grant_board_access() {
    let w = world();
    // Make the outsider a workspace member, but not a board member.
    let mut ws = w.workspace.clone();
    ws.members.push(w.outsider.clone());
    let ws = w.store.lock().update_workspace(ws);

    assert!(access::workspace_access(&ws, &w.outsider, AccessLevel::Member));
    assert!(!access::board_access(&w.board, &w.outsider, AccessLevel::Member));
    let guard = w.store.lock();
    assert!(!access::task_access(&guard, &w.task, &w.outsider, AccessLevel::Member));
}

#[test]
fn owner_level_is_required_for_board_deletion() {
    let w = world();
    // Plain member may not delete.
    assert!(!access::board_access(&w.board, &w.member, AccessLevel::Owner));
    // Owner may, and the cascade then runs.
    assert!(access::board_access(&w.board, &w.owner, AccessLevel::Owner));
    board::delete_board(&w.store, &w.board.id).expect("delete");
    assert!(w.store.lock().board(&w.board.id).is_none());
}

#[test]
fn comment_deletion_by_author_board_owner_and_nobody_else() {
    let w = world();
    let view = comment::create_comment(
        &w.store,
        &w.member,
        &w.task,
        &CommentInput { text: "looks good".into(), task_id: w.task.id.to_string() },
    )
    .expect("comment");
    let stored = w.store.lock().comment(&view.id).unwrap();

    let guard = w.store.lock();
    // Author (a plain board member) may delete their own comment.
    assert!(access::comment_delete_allowed(&guard, &stored, &w.member));
    // Board owner may delete anyone's comment.
    assert!(access::comment_delete_allowed(&guard, &stored, &w.owner));
    // Any third party is refused.
    assert!(!access::comment_delete_allowed(&guard, &stored, &w.outsider));
}

#[test]
fn end_to_end_outsider_is_denied_then_board_cascade_empties_the_tree() {
    let w = world();
    // User C (not a member of B) attempting to read T1 is denied.
    {
        let guard = w.store.lock();
        assert!(!access::task_access(&guard, &w.task, &w.outsider, AccessLevel::Member));
    }

    // Owner deletes the board; L1, T1 and any comments are all gone.
    comment::create_comment(
        &w.store,
        &w.owner,
        &w.task,
        &CommentInput { text: "about to go".into(), task_id: w.task.id.to_string() },
    )
    .expect("comment");
    board::delete_board(&w.store, &w.board.id).expect("delete");

    let guard = w.store.lock();
    assert!(guard.board(&w.board.id).is_none());
    assert!(guard.lists_by_board(&w.board.id).is_empty());
    assert!(guard.tasks_by_list(&w.list.id).is_empty());
    assert!(guard.comments_by_task(&w.task.id).is_empty());
    // The parent workspace survives.
    assert!(guard.workspace(&w.workspace.id).is_some());
}
