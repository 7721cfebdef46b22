//! Store-backed registration and login.
//!
//! Login failures never reveal whether the email exists: unknown address and
//! wrong password produce the same `Unauthenticated` response.

use crate::error::{AppError, AppResult};
use crate::ident::EntityId;
use crate::input::{LoginInput, RegisterInput};
use crate::model::{Role, User};
use crate::security;
use crate::store::SharedStore;
use tracing::info;

use super::principal::Principal;
use super::session::{Session, SessionManager};

#[derive(Debug, Clone)]
pub struct AuthResponse {
    pub session: Session,
    pub user: User,
}

pub fn register(store: &SharedStore, sm: &SessionManager, input: &RegisterInput) -> AppResult<AuthResponse> {
    input.validate()?;

    let email = input.email.trim().to_ascii_lowercase();
    let user = {
        let mut guard = store.lock();
        if guard.user_by_email(&email).is_some() {
            return Err(AppError::invalid_field("email", "Email already in use"));
        }
        let hash = security::hash_password(&input.password)
            .map_err(|e| AppError::internal("hash_failed".to_string(), e.to_string()))?;
        guard.insert_user(User {
            id: EntityId::generate(),
            name: input.name.trim().to_string(),
            email,
            password_hash: hash,
            role: Role::User,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        })
    };

    let session = sm.issue(Principal::for_user(&user));
    info!(target: "corkboard::identity", "user registered: id={}", user.id);
    Ok(AuthResponse { session, user })
}

pub fn login(store: &SharedStore, sm: &SessionManager, input: &LoginInput) -> AppResult<AuthResponse> {
    input.validate()?;

    let user = store.lock().user_by_email(&input.email);
    let Some(user) = user else {
        return Err(AppError::unauthenticated("invalid_credentials", "Invalid email or password"));
    };
    if !security::verify_password(&user.password_hash, &input.password) {
        return Err(AppError::unauthenticated("invalid_credentials", "Invalid email or password"));
    }

    let session = sm.issue(Principal::for_user(&user));
    info!(target: "corkboard::identity", "user logged in: id={}", user.id);
    Ok(AuthResponse { session, user })
}
