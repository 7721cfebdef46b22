//! Cascade deletion engine: delete a resource and every entity transitively
//! parented under it as a single all-or-nothing unit.
//!
//! Descendant id sets are collected breadth first (board -> lists -> tasks ->
//! comments), then deleted strictly leaf to root inside one store
//! transaction. Leaf-to-root order is mandatory: deleting a parent before
//! its children would let concurrent readers observe orphans and complicate
//! retries. Any step failure aborts the whole transaction; rollback is
//! guaranteed by the transaction guard on every exit path.
//!
//! The operation is idempotent per root id: the root's existence is
//! re-checked at the transaction point and an already-deleted root is a
//! no-op (`Ok(false)`).

use tracing::{debug, info};

use crate::error::AppResult;
use crate::ident::EntityId;
use crate::store::{Coll, Filter, Store};

/// One ordered deletion statement within the scoped transaction.
#[derive(Debug)]
pub struct DeleteStep {
    pub coll: Coll,
    pub filter: Filter,
}

/// Reusable scoped-transaction runner: open, re-check the root, execute the
/// ordered steps, commit. Returns whether the root existed. Store failures
/// propagate as `Internal` after the rollback has restored pre-call state.
fn run_scoped_delete(
    store: &mut Store,
    root: Coll,
    root_id: &EntityId,
    steps: Vec<DeleteStep>,
) -> AppResult<bool> {
    let mut txn = store.begin();
    if !txn.exists(root, root_id) {
        debug!(target: "corkboard::cascade", "cascade delete: {:?} {} already absent, no-op", root, root_id);
        return Ok(false);
    }
    let mut removed = 0usize;
    for step in &steps {
        removed += txn.delete_where(step.coll, &step.filter)?;
    }
    txn.commit();
    info!(target: "corkboard::cascade", "cascade delete: root={:?} id={} rows_removed={}", root, root_id, removed);
    Ok(true)
}

pub fn delete_workspace_cascade(store: &mut Store, workspace_id: &EntityId) -> AppResult<bool> {
    let board_ids: Vec<EntityId> = store.boards_by_workspace(workspace_id).into_iter().map(|b| b.id).collect();
    let list_ids: Vec<EntityId> = store.lists_by_boards(&board_ids).into_iter().map(|l| l.id).collect();
    let task_ids: Vec<EntityId> = store.tasks_by_lists(&list_ids).into_iter().map(|t| t.id).collect();
    run_scoped_delete(
        store,
        Coll::Workspace,
        workspace_id,
        vec![
            DeleteStep { coll: Coll::Comment, filter: Filter::ParentIn(task_ids) },
            DeleteStep { coll: Coll::Task, filter: Filter::ParentIn(list_ids) },
            DeleteStep { coll: Coll::List, filter: Filter::ParentIn(board_ids) },
            DeleteStep { coll: Coll::Board, filter: Filter::ParentIn(vec![workspace_id.clone()]) },
            DeleteStep { coll: Coll::Workspace, filter: Filter::Id(workspace_id.clone()) },
        ],
    )
}

pub fn delete_board_cascade(store: &mut Store, board_id: &EntityId) -> AppResult<bool> {
    let list_ids: Vec<EntityId> = store.lists_by_board(board_id).into_iter().map(|l| l.id).collect();
    let task_ids: Vec<EntityId> = store.tasks_by_lists(&list_ids).into_iter().map(|t| t.id).collect();
    run_scoped_delete(
        store,
        Coll::Board,
        board_id,
        vec![
            DeleteStep { coll: Coll::Comment, filter: Filter::ParentIn(task_ids) },
            DeleteStep { coll: Coll::Task, filter: Filter::ParentIn(list_ids) },
            DeleteStep { coll: Coll::List, filter: Filter::ParentIn(vec![board_id.clone()]) },
            DeleteStep { coll: Coll::Board, filter: Filter::Id(board_id.clone()) },
        ],
    )
}

pub fn delete_list_cascade(store: &mut Store, list_id: &EntityId) -> AppResult<bool> {
    let task_ids: Vec<EntityId> = store.tasks_by_list(list_id).into_iter().map(|t| t.id).collect();
    run_scoped_delete(
        store,
        Coll::List,
        list_id,
        vec![
            DeleteStep { coll: Coll::Comment, filter: Filter::ParentIn(task_ids) },
            DeleteStep { coll: Coll::Task, filter: Filter::ParentIn(vec![list_id.clone()]) },
            DeleteStep { coll: Coll::List, filter: Filter::Id(list_id.clone()) },
        ],
    )
}

pub fn delete_task_cascade(store: &mut Store, task_id: &EntityId) -> AppResult<bool> {
    run_scoped_delete(
        store,
        Coll::Task,
        task_id,
        vec![
            DeleteStep { coll: Coll::Comment, filter: Filter::ParentIn(vec![task_id.clone()]) },
            DeleteStep { coll: Coll::Task, filter: Filter::Id(task_id.clone()) },
        ],
    )
}

/// Comments have no descendants; still routed through the transaction runner
/// so the existence re-check and error mapping stay uniform.
pub fn delete_comment(store: &mut Store, comment_id: &EntityId) -> AppResult<bool> {
    run_scoped_delete(
        store,
        Coll::Comment,
        comment_id,
        vec![DeleteStep { coll: Coll::Comment, filter: Filter::Id(comment_id.clone()) }],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crate::model::{Board, Comment, List, Priority, Task, Workspace};

    struct Tree {
        store: Store,
        workspace: EntityId,
        board: EntityId,
        lists: Vec<EntityId>,
        tasks: Vec<EntityId>,
        comments: Vec<EntityId>,
    }

    fn tree() -> Tree {
        let mut store = Store::new();
        let now = Utc::now();
        let owner = EntityId::generate();
        let workspace = store
            .insert_workspace(Workspace {
                id: EntityId::generate(),
                name: "W".into(),
                owner: owner.clone(),
                members: vec![owner.clone()],
                created_at: now,
                updated_at: now,
            })
            .id;
        let board = store
            .insert_board(Board {
                id: EntityId::generate(),
                name: "B".into(),
                owner: owner.clone(),
                members: vec![owner.clone()],
                workspace: workspace.clone(),
                created_at: now,
                updated_at: now,
            })
            .id;
        let mut lists = Vec::new();
        let mut tasks = Vec::new();
        let mut comments = Vec::new();
        for li in 0..2 {
            let list = store
                .insert_list(List {
                    id: EntityId::generate(),
                    name: format!("L{li}"),
                    board: board.clone(),
                    position: li + 1,
                    created_at: now,
                    updated_at: now,
                })
                .id;
            for ti in 0..2 {
                let task = store
                    .insert_task(Task {
                        id: EntityId::generate(),
                        title: format!("T{li}.{ti}"),
                        description: String::new(),
                        list: list.clone(),
                        position: ti + 1,
                        due_date: now,
                        priority: Priority::Low,
                        created_at: now,
                        updated_at: now,
                    })
                    .id;
                let comment = store
                    .insert_comment(Comment {
                        id: EntityId::generate(),
                        text: "note".into(),
                        task: task.clone(),
                        author: owner.clone(),
                        created_at: now,
                        updated_at: now,
                    })
                    .id;
                tasks.push(task);
                comments.push(comment);
            }
            lists.push(list);
        }
        Tree { store, workspace, board, lists, tasks, comments }
    }

    #[test]
    fn board_cascade_removes_every_descendant() {
        let mut t = tree();
        assert!(delete_board_cascade(&mut t.store, &t.board).unwrap());

        assert!(t.store.board(&t.board).is_none());
        assert!(t.store.lists_by_board(&t.board).is_empty());
        assert!(t.store.tasks_by_lists(&t.lists).is_empty());
        assert!(t.store.comments_by_tasks(&t.tasks).is_empty());
        // The parent workspace is untouched.
        assert!(t.store.workspace(&t.workspace).is_some());
    }

    #[test]
    fn workspace_cascade_removes_boards_too() {
        let mut t = tree();
        assert!(delete_workspace_cascade(&mut t.store, &t.workspace).unwrap());
        assert!(t.store.workspace(&t.workspace).is_none());
        assert!(t.store.board(&t.board).is_none());
        assert!(t.store.comments_by_tasks(&t.tasks).is_empty());
    }

    #[test]
    fn list_cascade_leaves_siblings_alone() {
        let mut t = tree();
        let victim = t.lists[0].clone();
        let survivor = t.lists[1].clone();
        assert!(delete_list_cascade(&mut t.store, &victim).unwrap());
        assert!(t.store.list(&victim).is_none());
        assert!(t.store.tasks_by_list(&victim).is_empty());
        assert_eq!(t.store.tasks_by_list(&survivor).len(), 2);
    }

    #[test]
    fn task_cascade_removes_its_comments() {
        let mut t = tree();
        let task = t.tasks[0].clone();
        assert!(delete_task_cascade(&mut t.store, &task).unwrap());
        assert!(t.store.task(&task).is_none());
        assert!(t.store.comments_by_task(&task).is_empty());
        assert_eq!(t.store.comment(&t.comments[1]).is_some(), true);
    }

    #[test]
    fn mid_cascade_failure_leaves_state_intact() {
        let mut t = tree();
        // Comments delete fine, then the Task step fails.
        t.store.set_fail_point(Some(Coll::Task));
        let err = delete_board_cascade(&mut t.store, &t.board);
        assert!(err.is_err());

        // Nothing is partially gone: comments, tasks, lists and the board
        // are all exactly as before the call.
        assert!(t.store.board(&t.board).is_some());
        assert_eq!(t.store.lists_by_board(&t.board).len(), 2);
        assert_eq!(t.store.tasks_by_lists(&t.lists).len(), 4);
        assert_eq!(t.store.comments_by_tasks(&t.tasks).len(), 4);
    }

    #[test]
    fn second_delete_is_a_noop() {
        let mut t = tree();
        assert!(delete_board_cascade(&mut t.store, &t.board).unwrap());
        assert!(!delete_board_cascade(&mut t.store, &t.board).unwrap());
    }
}
