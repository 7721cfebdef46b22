use crate::cascade;
use crate::error::AppResult;
use crate::ident::EntityId;
use crate::input::BoardInput;
use crate::model::{Board, Workspace};
use crate::store::SharedStore;
use crate::view::{board_view, BoardView};

/// The creator becomes the board's owner and sole initial member; workspace
/// membership does not propagate down. The parent comes from the bound,
/// already-authorized workspace, never from the payload.
pub fn create_board(
    store: &SharedStore,
    actor: &EntityId,
    workspace: &Workspace,
    input: &BoardInput,
) -> AppResult<BoardView> {
    input.validate()?;
    let guard = &mut *store.lock();
    let board = guard.insert_board(Board {
        id: EntityId::generate(),
        name: input.name.trim().to_string(),
        owner: actor.clone(),
        members: vec![actor.clone()],
        workspace: workspace.id.clone(),
        created_at: chrono::Utc::now(),
        updated_at: chrono::Utc::now(),
    });
    Ok(board_view(guard, &board))
}

/// The workspace reference is immutable after creation; only the name moves.
pub fn update_board(store: &SharedStore, mut board: Board, input: &BoardInput) -> AppResult<BoardView> {
    input.validate()?;
    let guard = &mut *store.lock();
    board.name = input.name.trim().to_string();
    let saved = guard.update_board(board);
    Ok(board_view(guard, &saved))
}

pub fn get_board(store: &SharedStore, board: &Board) -> BoardView {
    board_view(&store.lock(), board)
}

pub fn my_boards(store: &SharedStore, actor: &EntityId) -> Vec<BoardView> {
    let guard = store.lock();
    guard.boards_with_member(actor).iter().map(|b| board_view(&guard, b)).collect()
}

pub fn boards_by_workspace(store: &SharedStore, workspace: &Workspace) -> Vec<BoardView> {
    let guard = store.lock();
    guard.boards_by_workspace(&workspace.id).iter().map(|b| board_view(&guard, b)).collect()
}

pub fn delete_board(store: &SharedStore, board_id: &EntityId) -> AppResult<()> {
    cascade::delete_board_cascade(&mut store.lock(), board_id)?;
    Ok(())
}
