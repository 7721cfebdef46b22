//!
//! corkboard entity store
//! ----------------------
//! In-memory document store holding the six collections (users, workspaces,
//! boards, lists, tasks, comments), each keyed by `EntityId`. The store
//! assigns creation/update timestamps on insert/update and offers the
//! narrow surface the core needs: find-by-id, find-by-filter, and atomic
//! multi-statement transactions.
//!
//! Transactions are snapshot based: `Store::begin` captures the collections,
//! mutations apply to the live maps, and dropping the `Txn` without a commit
//! restores the snapshot. The cascade deletion engine relies on this for its
//! all-or-nothing guarantee.
//!
//! Reference fields are advisory only; nothing here enforces that a `List`'s
//! board exists. Collections are `BTreeMap`s keyed by creation-ordered ids,
//! so unsorted scans come back in arrival order.
//!
//! The public API centers around `Store`, usually wrapped in the thread-safe
//! `SharedStore` (`Arc<Mutex<Store>>`) elsewhere in the codebase.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::Utc;
use parking_lot::Mutex;
use thiserror::Error;
use tracing::debug;

use crate::ident::EntityId;
use crate::model::{Board, Comment, List, Task, User, Workspace};

/// The hierarchy collections a deletion step can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coll {
    Workspace,
    Board,
    List,
    Task,
    Comment,
}

/// Row selector for `delete_where`. `ParentIn` matches rows whose canonical
/// parent reference (Board.workspace, List.board, Task.list, Comment.task)
/// is one of the given ids.
#[derive(Debug, Clone)]
pub enum Filter {
    Id(EntityId),
    ParentIn(Vec<EntityId>),
}

#[derive(Debug, Error)]
pub enum StoreError {
    /// Raised by the fault injection point; stands in for the connectivity
    /// and constraint failures a real document store can produce.
    #[error("store failure while deleting from {0:?}")]
    DeleteFailed(Coll),
}

#[derive(Debug, Clone, Default)]
struct Collections {
    users: BTreeMap<EntityId, User>,
    workspaces: BTreeMap<EntityId, Workspace>,
    boards: BTreeMap<EntityId, Board>,
    lists: BTreeMap<EntityId, List>,
    tasks: BTreeMap<EntityId, Task>,
    comments: BTreeMap<EntityId, Comment>,
}

#[derive(Debug, Default)]
pub struct Store {
    data: Collections,
    /// Test fault injection: any delete touching this collection fails until
    /// the point is cleared. Lets tests abort a cascade mid-transaction.
    fail_point: Option<Coll>,
}

impl Store {
    pub fn new() -> Self { Store::default() }

    pub fn set_fail_point(&mut self, coll: Option<Coll>) { self.fail_point = coll; }

    // --- inserts/updates: timestamps are assigned here, not by callers ---

    pub fn insert_user(&mut self, mut user: User) -> User {
        let now = Utc::now();
        user.created_at = now;
        user.updated_at = now;
        self.data.users.insert(user.id.clone(), user.clone());
        user
    }

    pub fn insert_workspace(&mut self, mut ws: Workspace) -> Workspace {
        let now = Utc::now();
        ws.created_at = now;
        ws.updated_at = now;
        self.data.workspaces.insert(ws.id.clone(), ws.clone());
        ws
    }

    pub fn update_workspace(&mut self, mut ws: Workspace) -> Workspace {
        ws.updated_at = Utc::now();
        self.data.workspaces.insert(ws.id.clone(), ws.clone());
        ws
    }

    pub fn insert_board(&mut self, mut board: Board) -> Board {
        let now = Utc::now();
        board.created_at = now;
        board.updated_at = now;
        self.data.boards.insert(board.id.clone(), board.clone());
        board
    }

    pub fn update_board(&mut self, mut board: Board) -> Board {
        board.updated_at = Utc::now();
        self.data.boards.insert(board.id.clone(), board.clone());
        board
    }

    pub fn insert_list(&mut self, mut list: List) -> List {
        let now = Utc::now();
        list.created_at = now;
        list.updated_at = now;
        self.data.lists.insert(list.id.clone(), list.clone());
        list
    }

    pub fn update_list(&mut self, mut list: List) -> List {
        list.updated_at = Utc::now();
        self.data.lists.insert(list.id.clone(), list.clone());
        list
    }

    pub fn insert_task(&mut self, mut task: Task) -> Task {
        let now = Utc::now();
        task.created_at = now;
        task.updated_at = now;
        self.data.tasks.insert(task.id.clone(), task.clone());
        task
    }

    pub fn update_task(&mut self, mut task: Task) -> Task {
        task.updated_at = Utc::now();
        self.data.tasks.insert(task.id.clone(), task.clone());
        task
    }

    pub fn insert_comment(&mut self, mut comment: Comment) -> Comment {
        let now = Utc::now();
        comment.created_at = now;
        comment.updated_at = now;
        self.data.comments.insert(comment.id.clone(), comment.clone());
        comment
    }

    // --- find-by-id ---

    pub fn user(&self, id: &EntityId) -> Option<User> { self.data.users.get(id).cloned() }
    pub fn workspace(&self, id: &EntityId) -> Option<Workspace> { self.data.workspaces.get(id).cloned() }
    pub fn board(&self, id: &EntityId) -> Option<Board> { self.data.boards.get(id).cloned() }
    pub fn list(&self, id: &EntityId) -> Option<List> { self.data.lists.get(id).cloned() }
    pub fn task(&self, id: &EntityId) -> Option<Task> { self.data.tasks.get(id).cloned() }
    pub fn comment(&self, id: &EntityId) -> Option<Comment> { self.data.comments.get(id).cloned() }

    pub fn exists(&self, coll: Coll, id: &EntityId) -> bool {
        match coll {
            Coll::Workspace => self.data.workspaces.contains_key(id),
            Coll::Board => self.data.boards.contains_key(id),
            Coll::List => self.data.lists.contains_key(id),
            Coll::Task => self.data.tasks.contains_key(id),
            Coll::Comment => self.data.comments.contains_key(id),
        }
    }

    // --- find-by-filter ---

    /// Case-insensitive email lookup; emails are stored lowercased.
    pub fn user_by_email(&self, email: &str) -> Option<User> {
        let needle = email.trim().to_ascii_lowercase();
        self.data.users.values().find(|u| u.email == needle).cloned()
    }

    pub fn workspaces_with_member(&self, user_id: &EntityId) -> Vec<Workspace> {
        self.data.workspaces.values().filter(|w| w.members.contains(user_id)).cloned().collect()
    }

    pub fn boards_with_member(&self, user_id: &EntityId) -> Vec<Board> {
        self.data.boards.values().filter(|b| b.members.contains(user_id)).cloned().collect()
    }

    pub fn boards_by_workspace(&self, workspace_id: &EntityId) -> Vec<Board> {
        self.data.boards.values().filter(|b| &b.workspace == workspace_id).cloned().collect()
    }

    pub fn lists_by_board(&self, board_id: &EntityId) -> Vec<List> {
        self.data.lists.values().filter(|l| &l.board == board_id).cloned().collect()
    }

    pub fn tasks_by_list(&self, list_id: &EntityId) -> Vec<Task> {
        self.data.tasks.values().filter(|t| &t.list == list_id).cloned().collect()
    }

    pub fn comments_by_task(&self, task_id: &EntityId) -> Vec<Comment> {
        self.data.comments.values().filter(|c| &c.task == task_id).cloned().collect()
    }

    pub fn lists_by_boards(&self, board_ids: &[EntityId]) -> Vec<List> {
        let set: BTreeSet<&EntityId> = board_ids.iter().collect();
        self.data.lists.values().filter(|l| set.contains(&l.board)).cloned().collect()
    }

    pub fn tasks_by_lists(&self, list_ids: &[EntityId]) -> Vec<Task> {
        let set: BTreeSet<&EntityId> = list_ids.iter().collect();
        self.data.tasks.values().filter(|t| set.contains(&t.list)).cloned().collect()
    }

    pub fn comments_by_tasks(&self, task_ids: &[EntityId]) -> Vec<Comment> {
        let set: BTreeSet<&EntityId> = task_ids.iter().collect();
        self.data.comments.values().filter(|c| set.contains(&c.task)).cloned().collect()
    }

    // --- deletion primitive ---

    /// Remove rows matching the filter. Returns the number of rows removed.
    /// Honors the fault injection point so tests can abort transactions.
    pub fn delete_where(&mut self, coll: Coll, filter: &Filter) -> Result<usize, StoreError> {
        if self.fail_point == Some(coll) {
            return Err(StoreError::DeleteFailed(coll));
        }
        let removed = match (coll, filter) {
            (Coll::Workspace, Filter::Id(id)) => self.data.workspaces.remove(id).map(|_| 1).unwrap_or(0),
            (Coll::Board, Filter::Id(id)) => self.data.boards.remove(id).map(|_| 1).unwrap_or(0),
            (Coll::List, Filter::Id(id)) => self.data.lists.remove(id).map(|_| 1).unwrap_or(0),
            (Coll::Task, Filter::Id(id)) => self.data.tasks.remove(id).map(|_| 1).unwrap_or(0),
            (Coll::Comment, Filter::Id(id)) => self.data.comments.remove(id).map(|_| 1).unwrap_or(0),
            (Coll::Workspace, Filter::ParentIn(_)) => 0, // workspaces have no parent reference
            (Coll::Board, Filter::ParentIn(ids)) => retain_without_parent(&mut self.data.boards, ids, |b| &b.workspace),
            (Coll::List, Filter::ParentIn(ids)) => retain_without_parent(&mut self.data.lists, ids, |l| &l.board),
            (Coll::Task, Filter::ParentIn(ids)) => retain_without_parent(&mut self.data.tasks, ids, |t| &t.list),
            (Coll::Comment, Filter::ParentIn(ids)) => retain_without_parent(&mut self.data.comments, ids, |c| &c.task),
        };
        debug!(target: "corkboard::store", "delete_where: coll={:?} filter={:?} removed={}", coll, filter, removed);
        Ok(removed)
    }

    /// Open a snapshot transaction. All mutations through the returned `Txn`
    /// are discarded unless `commit` is called before the guard drops.
    pub fn begin(&mut self) -> Txn<'_> {
        let snapshot = self.data.clone();
        Txn { store: self, snapshot: Some(snapshot), committed: false }
    }
}

fn retain_without_parent<T: Clone>(
    map: &mut BTreeMap<EntityId, T>,
    parents: &[EntityId],
    parent_of: impl Fn(&T) -> &EntityId,
) -> usize {
    let set: BTreeSet<&EntityId> = parents.iter().collect();
    let before = map.len();
    map.retain(|_, row| !set.contains(parent_of(row)));
    before - map.len()
}

/// Transaction guard. Rolls back to the captured snapshot on drop unless
/// committed, so every exit path (including panics and `?` early returns in
/// the caller) releases cleanly.
pub struct Txn<'a> {
    store: &'a mut Store,
    snapshot: Option<Collections>,
    committed: bool,
}

impl Txn<'_> {
    pub fn exists(&self, coll: Coll, id: &EntityId) -> bool {
        self.store.exists(coll, id)
    }

    pub fn delete_where(&mut self, coll: Coll, filter: &Filter) -> Result<usize, StoreError> {
        self.store.delete_where(coll, filter)
    }

    pub fn commit(mut self) {
        self.committed = true;
        self.snapshot = None;
    }
}

impl Drop for Txn<'_> {
    fn drop(&mut self) {
        if !self.committed {
            if let Some(snapshot) = self.snapshot.take() {
                self.store.data = snapshot;
                debug!(target: "corkboard::store", "transaction rolled back");
            }
        }
    }
}

/// Cloneable thread-safe handle to the store, shared across request handlers.
#[derive(Clone, Default)]
pub struct SharedStore(pub Arc<Mutex<Store>>);

impl SharedStore {
    pub fn new() -> Self { SharedStore(Arc::new(Mutex::new(Store::new()))) }

    pub fn lock(&self) -> parking_lot::MutexGuard<'_, Store> { self.0.lock() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Role;

    fn mk_user(store: &mut Store, name: &str) -> User {
        let now = Utc::now();
        store.insert_user(User {
            id: EntityId::generate(),
            name: name.into(),
            email: format!("{}@example.com", name.to_ascii_lowercase()),
            password_hash: String::new(),
            role: Role::User,
            created_at: now,
            updated_at: now,
        })
    }

    fn mk_workspace(store: &mut Store, owner: &EntityId) -> Workspace {
        let now = Utc::now();
        store.insert_workspace(Workspace {
            id: EntityId::generate(),
            name: "ws".into(),
            owner: owner.clone(),
            members: vec![owner.clone()],
            created_at: now,
            updated_at: now,
        })
    }

    fn mk_board(store: &mut Store, owner: &EntityId, ws: &EntityId) -> Board {
        let now = Utc::now();
        store.insert_board(Board {
            id: EntityId::generate(),
            name: "board".into(),
            owner: owner.clone(),
            members: vec![owner.clone()],
            workspace: ws.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    #[test]
    fn find_by_id_and_filter() {
        let mut store = Store::new();
        let user = mk_user(&mut store, "Alice");
        let ws = mk_workspace(&mut store, &user.id);
        let board = mk_board(&mut store, &user.id, &ws.id);

        assert!(store.user(&user.id).is_some());
        assert!(store.user_by_email("ALICE@Example.Com").is_some());
        assert_eq!(store.boards_by_workspace(&ws.id).len(), 1);
        assert_eq!(store.boards_with_member(&user.id)[0].id, board.id);
        assert!(store.boards_by_workspace(&user.id).is_empty());
    }

    #[test]
    fn delete_where_parent_in() {
        let mut store = Store::new();
        let user = mk_user(&mut store, "Alice");
        let ws = mk_workspace(&mut store, &user.id);
        let b1 = mk_board(&mut store, &user.id, &ws.id);
        let _b2 = mk_board(&mut store, &user.id, &ws.id);

        let removed = store
            .delete_where(Coll::Board, &Filter::ParentIn(vec![ws.id.clone()]))
            .unwrap();
        assert_eq!(removed, 2);
        assert!(store.board(&b1.id).is_none());
    }

    #[test]
    fn dropped_transaction_rolls_back() {
        let mut store = Store::new();
        let user = mk_user(&mut store, "Alice");
        let ws = mk_workspace(&mut store, &user.id);

        {
            let mut txn = store.begin();
            txn.delete_where(Coll::Workspace, &Filter::Id(ws.id.clone())).unwrap();
            assert!(!txn.exists(Coll::Workspace, &ws.id));
            // dropped without commit
        }
        assert!(store.workspace(&ws.id).is_some());
    }

    #[test]
    fn committed_transaction_persists() {
        let mut store = Store::new();
        let user = mk_user(&mut store, "Alice");
        let ws = mk_workspace(&mut store, &user.id);

        let mut txn = store.begin();
        txn.delete_where(Coll::Workspace, &Filter::Id(ws.id.clone())).unwrap();
        txn.commit();
        assert!(store.workspace(&ws.id).is_none());
    }

    #[test]
    fn fail_point_aborts_delete() {
        let mut store = Store::new();
        let user = mk_user(&mut store, "Alice");
        let ws = mk_workspace(&mut store, &user.id);
        store.set_fail_point(Some(Coll::Workspace));

        let err = store.delete_where(Coll::Workspace, &Filter::Id(ws.id.clone()));
        assert!(err.is_err());
        assert!(store.workspace(&ws.id).is_some());
    }
}
