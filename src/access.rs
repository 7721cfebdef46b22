//! Access evaluator: pure authorization verdicts over the entity hierarchy.
//!
//! Every check resolves the ownership chain upward to the Workspace or Board
//! that governs the resource and applies one owner/members rule. Membership
//! does not cascade: a workspace member is not implicitly a member of the
//! boards under it; each level stores its own authorization list.
//!
//! Denied is a boolean `false`, never an error. A broken link in the chain
//! (the store does not enforce referential integrity) is logged and denies
//! access rather than panicking — cascade deletion is what normally keeps
//! these chains intact, but the evaluator stays defensive regardless.

use tracing::warn;

use crate::ident::EntityId;
use crate::model::{Board, Comment, List, Task, Workspace};
use crate::store::Store;

/// Authorization strength for a check. `Member` permits read/use, `Owner`
/// gates destructive and structural changes (delete, re-parent).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessLevel {
    Member,
    Owner,
}

/// The owner/members shape shared by Workspace and Board. The rule logic is
/// written once against this trait; everything deeper in the hierarchy is
/// resolved up to its governing Board first.
pub trait AccessScope {
    fn owner_id(&self) -> &EntityId;
    fn member_ids(&self) -> &[EntityId];
}

impl AccessScope for Workspace {
    fn owner_id(&self) -> &EntityId { &self.owner }
    fn member_ids(&self) -> &[EntityId] { &self.members }
}

impl AccessScope for Board {
    fn owner_id(&self) -> &EntityId { &self.owner }
    fn member_ids(&self) -> &[EntityId] { &self.members }
}

/// The single owner/member rule. Owner always satisfies member-level checks;
/// the converse does not hold.
pub fn scope_allows(scope: &impl AccessScope, user_id: &EntityId, level: AccessLevel) -> bool {
    let is_owner = scope.owner_id() == user_id;
    match level {
        AccessLevel::Owner => is_owner,
        AccessLevel::Member => is_owner || scope.member_ids().contains(user_id),
    }
}

/// A resource below Board level, identified by its loaded entity. Used to
/// drive the upward walk without repeating per-type traversal code.
#[derive(Debug, Clone, Copy)]
pub enum Resource<'a> {
    List(&'a List),
    Task(&'a Task),
    Comment(&'a Comment),
}

/// Resolve the Board that governs a sub-Board resource, one hop at a time.
/// Returns `None` (and logs) if any link is missing.
pub fn governing_board(store: &Store, resource: Resource<'_>) -> Option<Board> {
    match resource {
        Resource::List(list) => {
            let board = store.board(&list.board);
            if board.is_none() {
                warn!(target: "corkboard::access", "list {} references missing board {}", list.id, list.board);
            }
            board
        }
        Resource::Task(task) => {
            let Some(list) = store.list(&task.list) else {
                warn!(target: "corkboard::access", "task {} references missing list {}", task.id, task.list);
                return None;
            };
            governing_board(store, Resource::List(&list))
        }
        Resource::Comment(comment) => {
            let Some(task) = store.task(&comment.task) else {
                warn!(target: "corkboard::access", "comment {} references missing task {}", comment.id, comment.task);
                return None;
            };
            governing_board(store, Resource::Task(&task))
        }
    }
}

pub fn workspace_access(workspace: &Workspace, user_id: &EntityId, level: AccessLevel) -> bool {
    scope_allows(workspace, user_id, level)
}

pub fn board_access(board: &Board, user_id: &EntityId, level: AccessLevel) -> bool {
    scope_allows(board, user_id, level)
}

pub fn list_access(store: &Store, list: &List, user_id: &EntityId, level: AccessLevel) -> bool {
    match governing_board(store, Resource::List(list)) {
        Some(board) => scope_allows(&board, user_id, level),
        None => false,
    }
}

pub fn task_access(store: &Store, task: &Task, user_id: &EntityId, level: AccessLevel) -> bool {
    match governing_board(store, Resource::Task(task)) {
        Some(board) => scope_allows(&board, user_id, level),
        None => false,
    }
}

/// Member-level comment access: governing-board member, or the comment's
/// author.
pub fn comment_access(store: &Store, comment: &Comment, user_id: &EntityId) -> bool {
    if &comment.author == user_id {
        return true;
    }
    match governing_board(store, Resource::Comment(comment)) {
        Some(board) => scope_allows(&board, user_id, AccessLevel::Member),
        None => false,
    }
}

/// Comment deletion uses the author-or-board-owner variant: the author may
/// always remove their own comment, the governing board's owner may remove
/// anyone's. Plain board members may not.
pub fn comment_delete_allowed(store: &Store, comment: &Comment, user_id: &EntityId) -> bool {
    if &comment.author == user_id {
        return true;
    }
    match governing_board(store, Resource::Comment(comment)) {
        Some(board) => scope_allows(&board, user_id, AccessLevel::Owner),
        None => false,
    }
}
