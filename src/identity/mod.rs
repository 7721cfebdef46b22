//! Central identity and session management.
//! Keep the public surface thin and split implementation across sub-modules.

mod principal;
mod provider;
mod session;

pub use principal::Principal;
pub use provider::{login, register, AuthResponse};
pub use session::{Session, SessionManager, SessionToken};
