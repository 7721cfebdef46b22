//! Ordering tests: lists and tasks sort by caller-supplied position with
//! creation order breaking ties, moves touch only the moved entity, and
//! comments come back newest first.

use corkboard::ident::EntityId;
use corkboard::identity::{register, SessionManager};
use corkboard::input::{
    BoardInput, CommentInput, ListInput, MoveListInput, MoveTaskInput, RegisterInput, TaskInput,
    WorkspaceInput,
};
use corkboard::model::{Board, List, Priority};
use corkboard::service::{board, comment, list, task, workspace};
use corkboard::store::SharedStore;

fn setup() -> (SharedStore, EntityId, Board) {
    let store = SharedStore::new();
    let sm = SessionManager::default();
    let owner = register(
        &store,
        &sm,
        &RegisterInput { name: "Alice".into(), email: "alice@example.com".into(), password: "password1".into() },
    )
    .unwrap()
    .user
    .id;
    let ws = workspace::create_workspace(&store, &owner, &WorkspaceInput { name: "Workspace".into() }).unwrap();
    let ws_entity = store.lock().workspace(&ws.id).unwrap();
    let b = board::create_board(
        &store,
        &owner,
        &ws_entity,
        &BoardInput { name: "Board".into(), workspace_id: ws.id.to_string() },
    )
    .unwrap();
    let board_entity = store.lock().board(&b.id).unwrap();
    (store, owner, board_entity)
}

fn add_list(store: &SharedStore, board: &Board, name: &str, position: i64) -> List {
    let view = list::create_list(
        store,
        board,
        &ListInput { name: name.into(), board_id: board.id.to_string(), position },
    )
    .unwrap();
    store.lock().list(&view.id).unwrap()
}

fn add_task(store: &SharedStore, list: &List, title: &str, position: i64) -> EntityId {
    task::create_task(
        store,
        list,
        &TaskInput {
            title: title.into(),
            description: None,
            list_id: list.id.to_string(),
            position,
            due_date: chrono::Utc::now(),
            priority: Priority::Low,
        },
    )
    .unwrap()
    .id
}

#[test]
fn lists_sort_by_position_with_ties_in_creation_order() {
    let (store, _owner, b) = setup();
    add_list(&store, &b, "Backlog", 2);
    add_list(&store, &b, "Doing", 1);
    // Two lists share position 2; the earlier-created one must come first.
    add_list(&store, &b, "Review", 2);
    add_list(&store, &b, "Done", 9); // gaps are fine

    let names: Vec<String> = list::lists_by_board(&store, &b).into_iter().map(|l| l.name).collect();
    assert_eq!(names, vec!["Doing", "Backlog", "Review", "Done"]);
}

#[test]
fn moving_a_list_changes_only_the_moved_list() {
    let (store, _owner, b) = setup();
    let l1 = add_list(&store, &b, "One", 1);
    add_list(&store, &b, "Two", 2);
    add_list(&store, &b, "Three", 3);

    let moved = list::move_list(&store, l1, &MoveListInput { position: 5 }).unwrap();
    assert_eq!(moved.position, 5);

    let views = list::lists_by_board(&store, &b);
    let names: Vec<&str> = views.iter().map(|v| v.name.as_str()).collect();
    assert_eq!(names, vec!["Two", "Three", "One"]);
    // Siblings keep their stored positions; nobody was renumbered.
    assert_eq!(views[0].position, 2);
    assert_eq!(views[1].position, 3);
}

#[test]
fn tasks_sort_by_position_and_moves_can_reparent() {
    let (store, _owner, b) = setup();
    let l1 = add_list(&store, &b, "Todo", 1);
    let l2 = add_list(&store, &b, "Doing", 2);
    add_task(&store, &l1, "write draft", 3);
    let t2 = add_task(&store, &l1, "collect input", 1);
    add_task(&store, &l1, "send draft", 3);

    let titles: Vec<String> = task::tasks_by_list(&store, &l1).into_iter().map(|t| t.title).collect();
    assert_eq!(titles, vec!["collect input", "write draft", "send draft"]);

    // Moving to another list sets the new parent and position together.
    let t2_entity = store.lock().task(&t2).unwrap();
    let moved = task::move_task(&store, t2_entity, &l2, &MoveTaskInput { list_id: l2.id.to_string(), position: 1 }).unwrap();
    assert_eq!(moved.list.id, l2.id);

    assert_eq!(task::tasks_by_list(&store, &l1).len(), 2);
    let in_l2: Vec<String> = task::tasks_by_list(&store, &l2).into_iter().map(|t| t.title).collect();
    assert_eq!(in_l2, vec!["collect input"]);
}

#[test]
fn comments_list_newest_first() {
    let (store, owner, b) = setup();
    let l = add_list(&store, &b, "Todo", 1);
    let t = add_task(&store, &l, "write draft", 1);
    let task_entity = store.lock().task(&t).unwrap();

    for text in ["first note", "second note", "third note"] {
        comment::create_comment(
            &store,
            &owner,
            &task_entity,
            &CommentInput { text: text.into(), task_id: t.to_string() },
        )
        .unwrap();
    }

    let texts: Vec<String> =
        comment::comments_by_task(&store, &task_entity).into_iter().map(|c| c.text).collect();
    assert_eq!(texts, vec!["third note", "second note", "first note"]);
}
