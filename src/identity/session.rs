use std::collections::HashMap;
use std::time::{Duration, Instant};

use base64::Engine;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use tracing::debug;

use crate::ident::EntityId;

use super::principal::Principal;

pub type SessionToken = String;

#[derive(Debug, Clone)]
pub struct Session {
    pub token: SessionToken,
    pub principal: Principal,
    pub issued_at: Instant,
    pub expires_at: Instant,
}

static SESSIONS: Lazy<RwLock<HashMap<String, Session>>> = Lazy::new(|| RwLock::new(HashMap::new()));

fn gen_token() -> String {
    // 256-bit random token, base64url without padding
    let mut buf = [0u8; 32];
    let _ = getrandom::getrandom(&mut buf);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buf)
}

pub struct SessionManager {
    pub ttl: Duration,
}

impl Default for SessionManager {
    fn default() -> Self { Self { ttl: Duration::from_secs(24 * 60 * 60) } }
}

impl SessionManager {
    pub fn issue(&self, principal: Principal) -> Session {
        let now = Instant::now();
        let token = gen_token();
        let sess = Session {
            token: token.clone(),
            principal: principal.clone(),
            issued_at: now,
            expires_at: now + self.ttl,
        };
        SESSIONS.write().insert(token, sess.clone());
        debug!(target: "corkboard::identity", "session issued: user={} ttl_secs={}", principal.user_id, self.ttl.as_secs());
        sess
    }

    /// Resolve a bearer token to its principal, pruning it if expired.
    pub fn validate(&self, token: &str) -> Option<Principal> {
        let now = Instant::now();
        let mut expired = false;
        let out = {
            let map = SESSIONS.read();
            match map.get(token) {
                Some(sess) if sess.expires_at > now => Some(sess.principal.clone()),
                Some(_) => {
                    expired = true;
                    None
                }
                None => None,
            }
        };
        if expired {
            SESSIONS.write().remove(token);
        }
        out
    }

    pub fn logout(&self, token: &str) -> bool {
        SESSIONS.write().remove(token).is_some()
    }

    /// Revoke every live session belonging to the user. Returns how many
    /// were removed.
    pub fn revoke_user(&self, user_id: &EntityId) -> usize {
        let mut map = SESSIONS.write();
        let before = map.len();
        map.retain(|_, sess| &sess.principal.user_id != user_id);
        let count = before - map.len();
        debug!(target: "corkboard::identity", "sessions revoked: user={} count={}", user_id, count);
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ident::EntityId;

    fn principal() -> Principal {
        Principal {
            user_id: EntityId::generate(),
            name: "Alice".into(),
            email: "alice@example.com".into(),
            roles: vec!["user".into()],
        }
    }

    #[test]
    fn issue_validate_logout() {
        let sm = SessionManager::default();
        let sess = sm.issue(principal());
        let resolved = sm.validate(&sess.token).expect("valid token");
        assert_eq!(resolved.user_id, sess.principal.user_id);
        assert!(sm.logout(&sess.token));
        assert!(sm.validate(&sess.token).is_none());
    }

    #[test]
    fn expired_tokens_are_pruned() {
        let sm = SessionManager { ttl: Duration::from_secs(0) };
        let sess = sm.issue(principal());
        assert!(sm.validate(&sess.token).is_none());
    }

    #[test]
    fn revoke_user_removes_all_of_their_sessions_and_nobody_elses() {
        let sm = SessionManager::default();
        let alice = principal();
        let bob = principal();
        let a1 = sm.issue(alice.clone());
        let a2 = sm.issue(alice.clone());
        let b1 = sm.issue(bob.clone());

        assert_eq!(sm.revoke_user(&alice.user_id), 2);
        assert!(sm.validate(&a1.token).is_none());
        assert!(sm.validate(&a2.token).is_none());
        assert!(sm.validate(&b1.token).is_some());
        // Nothing left to revoke on a second pass.
        assert_eq!(sm.revoke_user(&alice.user_id), 0);
    }
}
