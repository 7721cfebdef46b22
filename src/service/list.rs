use crate::cascade;
use crate::error::AppResult;
use crate::ident::EntityId;
use crate::input::{ListInput, MoveListInput, UpdateListInput};
use crate::model::{Board, List};
use crate::store::SharedStore;
use crate::view::{list_view, ListView};

pub fn create_list(store: &SharedStore, board: &Board, input: &ListInput) -> AppResult<ListView> {
    input.validate()?;
    let guard = &mut *store.lock();
    let list = guard.insert_list(List {
        id: EntityId::generate(),
        name: input.name.trim().to_string(),
        board: board.id.clone(),
        position: input.position,
        created_at: chrono::Utc::now(),
        updated_at: chrono::Utc::now(),
    });
    Ok(list_view(guard, &list))
}

pub fn update_list(store: &SharedStore, mut list: List, input: &UpdateListInput) -> AppResult<ListView> {
    input.validate()?;
    let guard = &mut *store.lock();
    list.name = input.name.trim().to_string();
    list.position = input.position;
    let saved = guard.update_list(list);
    Ok(list_view(guard, &saved))
}

/// Position is caller-supplied; siblings are never renumbered. Gaps and
/// duplicates are tolerated, ties resolve by arrival order at read time.
pub fn move_list(store: &SharedStore, mut list: List, input: &MoveListInput) -> AppResult<ListView> {
    input.validate()?;
    let guard = &mut *store.lock();
    list.position = input.position;
    let saved = guard.update_list(list);
    Ok(list_view(guard, &saved))
}

pub fn get_list(store: &SharedStore, list: &List) -> ListView {
    list_view(&store.lock(), list)
}

/// Sibling lists sorted by position; the stable sort keeps equal positions
/// in arrival order.
pub fn lists_by_board(store: &SharedStore, board: &Board) -> Vec<ListView> {
    let guard = store.lock();
    let mut lists = guard.lists_by_board(&board.id);
    lists.sort_by_key(|l| l.position);
    lists.iter().map(|l| list_view(&guard, l)).collect()
}

pub fn delete_list(store: &SharedStore, list_id: &EntityId) -> AppResult<()> {
    cascade::delete_list_cascade(&mut store.lock(), list_id)?;
    Ok(())
}
