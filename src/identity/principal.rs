use serde::{Deserialize, Serialize};

use crate::ident::EntityId;
use crate::model::{Role, User};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Principal {
    pub user_id: EntityId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl Principal {
    pub fn for_user(user: &User) -> Self {
        let mut roles = vec!["user".to_string()];
        if user.role == Role::Admin {
            roles.push("admin".to_string());
        }
        Principal {
            user_id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            roles,
        }
    }
}
