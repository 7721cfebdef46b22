use crate::cascade;
use crate::error::AppResult;
use crate::ident::EntityId;
use crate::input::CommentInput;
use crate::model::{Comment, Task};
use crate::store::SharedStore;
use crate::view::{comment_view, CommentView};

/// The author is always the authenticated actor.
pub fn create_comment(store: &SharedStore, actor: &EntityId, task: &Task, input: &CommentInput) -> AppResult<CommentView> {
    input.validate()?;
    let guard = &mut *store.lock();
    let comment = guard.insert_comment(Comment {
        id: EntityId::generate(),
        text: input.text.trim().to_string(),
        task: task.id.clone(),
        author: actor.clone(),
        created_at: chrono::Utc::now(),
        updated_at: chrono::Utc::now(),
    });
    Ok(comment_view(guard, &comment))
}

/// Newest first.
pub fn comments_by_task(store: &SharedStore, task: &Task) -> Vec<CommentView> {
    let guard = store.lock();
    let mut comments = guard.comments_by_task(&task.id);
    comments.sort_by(|a, b| (b.created_at, &b.id).cmp(&(a.created_at, &a.id)));
    comments.iter().map(|c| comment_view(&guard, c)).collect()
}

pub fn delete_comment(store: &SharedStore, comment_id: &EntityId) -> AppResult<()> {
    cascade::delete_comment(&mut store.lock(), comment_id)?;
    Ok(())
}
