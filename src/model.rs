//! Domain entities for the corkboard hierarchy:
//! Workspace -> Board -> List -> Task -> Comment, plus User.
//!
//! Reference fields hold the parent/owner/author `EntityId` directly; the
//! store does not enforce referential integrity, so consumers must verify
//! each link when walking the hierarchy.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ident::EntityId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Default for Role {
    fn default() -> Self { Role::User }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: EntityId,
    pub name: String,
    /// Stored lowercased; uniqueness is case-insensitive.
    pub email: String,
    /// Argon2 PHC string. Never serialized into responses.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workspace {
    pub id: EntityId,
    pub name: String,
    pub owner: EntityId,
    pub members: Vec<EntityId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    pub id: EntityId,
    pub name: String,
    pub owner: EntityId,
    pub members: Vec<EntityId>,
    pub workspace: EntityId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct List {
    pub id: EntityId,
    pub name: String,
    pub board: EntityId,
    /// Left-to-right order among sibling lists. Not unique; read-time sorting
    /// breaks ties by arrival order.
    pub position: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: EntityId,
    pub title: String,
    pub description: String,
    pub list: EntityId,
    pub position: i64,
    pub due_date: DateTime<Utc>,
    pub priority: Priority,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: EntityId,
    pub text: String,
    pub task: EntityId,
    pub author: EntityId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
