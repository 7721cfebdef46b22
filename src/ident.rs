//! Entity identifier generation and validation
//! -------------------------------------------
//! Single source of truth for the 24-hex-character object id format used by
//! every collection. Ids embed a 4-byte epoch-seconds prefix, 5 random bytes
//! and a 3-byte process-local counter, so lexicographic order follows arrival
//! order — listing code relies on this for tie-breaking.

use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicU32, Ordering};

use serde::{Deserialize, Serialize};

static COUNTER: AtomicU32 = AtomicU32::new(0);

/// Opaque unique identifier for a stored entity.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Validate an incoming identifier string: exactly 24 lowercase hex chars.
    /// Uppercase hex is accepted and normalized, anything else is rejected.
    pub fn parse(raw: &str) -> Option<EntityId> {
        let trimmed = raw.trim();
        if trimmed.len() != 24 { return None; }
        if !trimmed.bytes().all(|b| b.is_ascii_hexdigit()) { return None; }
        Some(EntityId(trimmed.to_ascii_lowercase()))
    }

    /// Mint a fresh identifier. Seconds prefix keeps ids creation-ordered
    /// across processes; the middle bytes are a per-process constant and the
    /// counter disambiguates ids minted within the same second, so ids from
    /// one process always sort in mint order.
    pub fn generate() -> EntityId {
        static PROCESS_RANDOM: once_cell::sync::Lazy<[u8; 5]> = once_cell::sync::Lazy::new(|| {
            let mut buf = [0u8; 5];
            let _ = getrandom::getrandom(&mut buf);
            buf
        });
        let secs = chrono::Utc::now().timestamp() as u32;
        let random = *PROCESS_RANDOM;
        let count = COUNTER.fetch_add(1, Ordering::Relaxed) & 0x00ff_ffff;
        let mut out = String::with_capacity(24);
        for b in secs.to_be_bytes() {
            out.push_str(&format!("{:02x}", b));
        }
        for b in random {
            out.push_str(&format!("{:02x}", b));
        }
        for b in &count.to_be_bytes()[1..] {
            out.push_str(&format!("{:02x}", b));
        }
        EntityId(out)
    }

    pub fn as_str(&self) -> &str { &self.0 }
}

impl Display for EntityId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
