use crate::cascade;
use crate::error::AppResult;
use crate::ident::EntityId;
use crate::input::WorkspaceInput;
use crate::model::Workspace;
use crate::store::SharedStore;
use crate::view::{workspace_view, WorkspaceView};

/// The creator becomes owner and sole initial member.
pub fn create_workspace(store: &SharedStore, actor: &EntityId, input: &WorkspaceInput) -> AppResult<WorkspaceView> {
    input.validate()?;
    let guard = &mut *store.lock();
    let ws = guard.insert_workspace(Workspace {
        id: EntityId::generate(),
        name: input.name.trim().to_string(),
        owner: actor.clone(),
        members: vec![actor.clone()],
        created_at: chrono::Utc::now(),
        updated_at: chrono::Utc::now(),
    });
    Ok(workspace_view(guard, &ws))
}

/// Only validated fields are applied; nothing else on the entity can change.
pub fn update_workspace(store: &SharedStore, mut workspace: Workspace, input: &WorkspaceInput) -> AppResult<WorkspaceView> {
    input.validate()?;
    let guard = &mut *store.lock();
    workspace.name = input.name.trim().to_string();
    let saved = guard.update_workspace(workspace);
    Ok(workspace_view(guard, &saved))
}

pub fn get_workspace(store: &SharedStore, workspace: &Workspace) -> WorkspaceView {
    workspace_view(&store.lock(), workspace)
}

/// Workspaces the user belongs to (the owner is always in the members set).
pub fn my_workspaces(store: &SharedStore, actor: &EntityId) -> Vec<WorkspaceView> {
    let guard = store.lock();
    guard.workspaces_with_member(actor).iter().map(|w| workspace_view(&guard, w)).collect()
}

/// Cascade: boards under the workspace, their lists, tasks and comments all
/// go with it, atomically.
pub fn delete_workspace(store: &SharedStore, workspace_id: &EntityId) -> AppResult<()> {
    cascade::delete_workspace_cascade(&mut store.lock(), workspace_id)?;
    Ok(())
}
