//! Validated input shapes for every mutation, plus the auth inputs.
//!
//! Each input mirrors exactly the fields a client may set; owner, author and
//! parent references always come from the authenticated actor and the bound
//! parent entity, never from the payload. `validate()` returns a field-level
//! error map so the boundary can render a 400 with per-field messages.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::{AppError, AppResult, FieldErrors};
use crate::ident::EntityId;
use crate::model::Priority;

fn require_min(errors: &mut FieldErrors, field: &str, value: &str, min: usize, message: &str) {
    if value.trim().chars().count() < min {
        errors.entry(field.to_string()).or_default().push(message.to_string());
    }
}

fn require_object_id(errors: &mut FieldErrors, field: &str, value: &str) {
    if EntityId::parse(value).is_none() {
        errors.entry(field.to_string()).or_default().push(format!("Invalid {field} format"));
    }
}

fn require_position(errors: &mut FieldErrors, field: &str, value: i64) {
    if value < 1 {
        errors.entry(field.to_string()).or_default().push("Position is required".to_string());
    }
}

fn finish(errors: FieldErrors) -> AppResult<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::validation("validation_failed", "Invalid input", errors))
    }
}

// Good-enough shape check; real deliverability is out of scope.
fn email_is_well_formed(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else { return false };
    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl RegisterInput {
    pub fn validate(&self) -> AppResult<()> {
        let mut errors = FieldErrors::new();
        require_min(&mut errors, "name", &self.name, 3, "Name must be at least 3 characters long");
        if !email_is_well_formed(self.email.trim()) {
            errors.entry("email".into()).or_default().push("Invalid email address".into());
        }
        if self.password.chars().count() < 6 {
            errors.entry("password".into()).or_default().push("Password must be at least 6 characters".into());
        }
        finish(errors)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

impl LoginInput {
    pub fn validate(&self) -> AppResult<()> {
        let mut errors = FieldErrors::new();
        if !email_is_well_formed(self.email.trim()) {
            errors.entry("email".into()).or_default().push("Invalid email address".into());
        }
        if self.password.chars().count() < 6 {
            errors.entry("password".into()).or_default().push("Password must be at least 6 characters".into());
        }
        finish(errors)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkspaceInput {
    pub name: String,
}

impl WorkspaceInput {
    pub fn validate(&self) -> AppResult<()> {
        let mut errors = FieldErrors::new();
        require_min(&mut errors, "name", &self.name, 3, "Name must be at least 3 characters long");
        finish(errors)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardInput {
    pub name: String,
    pub workspace_id: String,
}

impl BoardInput {
    pub fn validate(&self) -> AppResult<()> {
        let mut errors = FieldErrors::new();
        require_min(&mut errors, "name", &self.name, 3, "Name must be at least 3 characters long");
        require_object_id(&mut errors, "workspaceId", &self.workspace_id);
        finish(errors)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListInput {
    pub name: String,
    pub board_id: String,
    pub position: i64,
}

impl ListInput {
    pub fn validate(&self) -> AppResult<()> {
        let mut errors = FieldErrors::new();
        require_min(&mut errors, "name", &self.name, 3, "Name must be at least 3 characters long");
        require_object_id(&mut errors, "boardId", &self.board_id);
        require_position(&mut errors, "position", self.position);
        finish(errors)
    }
}

/// Update keeps the list under its board; only name and position may change.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateListInput {
    pub name: String,
    pub position: i64,
}

impl UpdateListInput {
    pub fn validate(&self) -> AppResult<()> {
        let mut errors = FieldErrors::new();
        require_min(&mut errors, "name", &self.name, 3, "Name must be at least 3 characters long");
        require_position(&mut errors, "position", self.position);
        finish(errors)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MoveListInput {
    pub position: i64,
}

impl MoveListInput {
    pub fn validate(&self) -> AppResult<()> {
        let mut errors = FieldErrors::new();
        require_position(&mut errors, "position", self.position);
        finish(errors)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskInput {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub list_id: String,
    pub position: i64,
    pub due_date: DateTime<Utc>,
    pub priority: Priority,
}

impl TaskInput {
    pub fn validate(&self) -> AppResult<()> {
        let mut errors = FieldErrors::new();
        require_min(&mut errors, "title", &self.title, 3, "Title must be at least 3 characters long");
        if let Some(desc) = &self.description {
            require_min(&mut errors, "description", desc, 3, "Description is required");
        }
        require_object_id(&mut errors, "listId", &self.list_id);
        require_position(&mut errors, "position", self.position);
        finish(errors)
    }
}

/// Re-parents the task to the target list and sets its position. The engine
/// never renumbers siblings; positions are caller-supplied.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveTaskInput {
    pub list_id: String,
    pub position: i64,
}

impl MoveTaskInput {
    pub fn validate(&self) -> AppResult<()> {
        let mut errors = FieldErrors::new();
        require_object_id(&mut errors, "listId", &self.list_id);
        require_position(&mut errors, "position", self.position);
        finish(errors)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentInput {
    pub text: String,
    pub task_id: String,
}

impl CommentInput {
    pub fn validate(&self) -> AppResult<()> {
        let mut errors = FieldErrors::new();
        require_min(&mut errors, "text", &self.text, 3, "Comment must be at least 3 characters long");
        require_object_id(&mut errors, "taskId", &self.task_id);
        finish(errors)
    }
}
