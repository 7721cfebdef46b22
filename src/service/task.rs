use crate::cascade;
use crate::error::AppResult;
use crate::ident::EntityId;
use crate::input::{MoveTaskInput, TaskInput};
use crate::model::{List, Task};
use crate::store::SharedStore;
use crate::view::{task_view, TaskView};

pub fn create_task(store: &SharedStore, list: &List, input: &TaskInput) -> AppResult<TaskView> {
    input.validate()?;
    let guard = &mut *store.lock();
    let task = guard.insert_task(Task {
        id: EntityId::generate(),
        title: input.title.trim().to_string(),
        description: input.description.clone().unwrap_or_default(),
        list: list.id.clone(),
        position: input.position,
        due_date: input.due_date,
        priority: input.priority,
        created_at: chrono::Utc::now(),
        updated_at: chrono::Utc::now(),
    });
    Ok(task_view(guard, &task))
}

/// Full-field update. The target list is the bound, already-authorized one —
/// an update may re-parent the task.
pub fn update_task(store: &SharedStore, mut task: Task, list: &List, input: &TaskInput) -> AppResult<TaskView> {
    input.validate()?;
    let guard = &mut *store.lock();
    task.title = input.title.trim().to_string();
    task.description = input.description.clone().unwrap_or_default();
    task.list = list.id.clone();
    task.position = input.position;
    task.due_date = input.due_date;
    task.priority = input.priority;
    let saved = guard.update_task(task);
    Ok(task_view(guard, &saved))
}

/// Move re-parents to the bound target list and sets the caller-supplied
/// position; siblings keep their stored positions.
pub fn move_task(store: &SharedStore, mut task: Task, list: &List, input: &MoveTaskInput) -> AppResult<TaskView> {
    input.validate()?;
    let guard = &mut *store.lock();
    task.list = list.id.clone();
    task.position = input.position;
    let saved = guard.update_task(task);
    Ok(task_view(guard, &saved))
}

pub fn get_task(store: &SharedStore, task: &Task) -> TaskView {
    task_view(&store.lock(), task)
}

pub fn tasks_by_list(store: &SharedStore, list: &List) -> Vec<TaskView> {
    let guard = store.lock();
    let mut tasks = guard.tasks_by_list(&list.id);
    tasks.sort_by_key(|t| t.position);
    tasks.iter().map(|t| task_view(&guard, t)).collect()
}

/// Task deletion cascades the task's comments in the same transaction.
pub fn delete_task(store: &SharedStore, task_id: &EntityId) -> AppResult<()> {
    cascade::delete_task_cascade(&mut store.lock(), task_id)?;
    Ok(())
}
