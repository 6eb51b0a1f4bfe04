//! Session identifier.
//!
//! Sessions are named by opaque strings. Callers may supply their own name
//! (so a tournament controller can reuse its own session key) or let the
//! pool generate one. Generated identifiers are UUID v4 rendered in the
//! 32-character simple format.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Identifier of a session in the environment pool.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SessionId(String);

impl SessionId {
    /// Generate a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Wrap a caller-supplied name.
    ///
    /// Returns `None` for empty or whitespace-only input, which callers
    /// treat as "no session supplied".
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_owned()))
        }
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for SessionId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<SessionId> for String {
    fn from(id: SessionId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_simple_uuids() {
        let id = SessionId::generate();
        assert_eq!(id.as_str().len(), 32);
        assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(id, SessionId::generate());
    }

    #[test]
    fn blank_names_are_rejected() {
        assert!(SessionId::parse("").is_none());
        assert!(SessionId::parse("   ").is_none());
        assert_eq!(
            SessionId::parse(" team-a ").map(String::from),
            Some(String::from("team-a"))
        );
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = SessionId::parse("abc").unwrap_or_else(SessionId::generate);
        let json = serde_json::to_string(&id).ok();
        assert_eq!(json.as_deref(), Some("\"abc\""));
    }
}
