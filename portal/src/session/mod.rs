//! Session guard: the single authoritative place a user session is read,
//! written, and queried.
//!
//! An authenticated user record is serialized to JSON and sealed into one
//! opaque AES-256-GCM token. The browser keeps that token in its sole
//! `userSession` storage slot and presents it on requests; nothing else in
//! the application touches the storage format. Opening a token collapses
//! every failure mode (bad base64, tampered ciphertext, foreign key, bad
//! JSON) into "no session" — a user with a damaged slot simply appears
//! logged out.

use crate::errors::{ServiceError, ServiceResult};
use crate::utils::crypto::SessionCrypto;
use serde::{Deserialize, Serialize};

/// Key of the single browser storage entry owned by the session guard.
pub const SESSION_SLOT_KEY: &str = "userSession";

/// Status code the PHP backend uses for administrator accounts.
const ADMIN_STATUS: i32 = 1;

/// Authenticated user record, exactly as sealed into the session token.
///
/// Either fully present and well-formed or entirely absent; no partial
/// state exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSession {
    pub id: i64,
    pub school_id: String,
    pub fname: String,
    #[serde(default)]
    pub mname: String,
    pub lname: String,
    #[serde(default)]
    pub suffix: String,
    #[serde(default)]
    pub extension: String,
    pub status: i32,
    pub authenticated: bool,
}

impl UserSession {
    pub fn role(&self) -> Role {
        if self.status == ADMIN_STATUS {
            Role::Admin
        } else {
            Role::User
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role() == Role::Admin
    }

    /// Display name: first and last name joined with a single space.
    pub fn username(&self) -> String {
        format!("{} {}", self.fname, self.lname)
    }
}

/// Role derived from the backend status code: 1 is admin, everything else
/// (including an absent session) is a standard user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Seals and opens session tokens.
///
/// The only component allowed to know that a token is AES-256-GCM over the
/// JSON serialization of [`UserSession`].
///
/// Built once at startup and shared; cloning is cheap and clones share the
/// same key material.
#[derive(Clone)]
pub struct SessionCodec {
    crypto: SessionCrypto,
}

impl SessionCodec {
    /// Build a codec keyed from the configured session passphrase.
    pub fn new() -> ServiceResult<Self> {
        let crypto = SessionCrypto::new()
            .map_err(|e| ServiceError::internal_error(format!("Session cipher error: {}", e)))?;
        Ok(SessionCodec { crypto })
    }

    pub fn with_crypto(crypto: SessionCrypto) -> Self {
        SessionCodec { crypto }
    }

    /// Seal a well-formed session into an opaque token.
    pub fn seal(&self, session: &UserSession) -> ServiceResult<String> {
        let json = serde_json::to_string(session)
            .map_err(|e| ServiceError::internal_error(format!("Session serialization: {}", e)))?;
        self.crypto
            .encrypt(&json)
            .map_err(|e| ServiceError::internal_error(format!("Session encryption: {}", e)))
    }

    /// Open a token. Malformed, tampered, or foreign tokens are
    /// indistinguishable from no token at all.
    pub fn open(&self, token: &str) -> Option<UserSession> {
        let json = self.crypto.decrypt(token).ok()?;
        serde_json::from_str(&json).ok()
    }
}

/// The single string-keyed storage entry the guard owns.
///
/// In the browser this is `sessionStorage["userSession"]`; in-process
/// consumers and tests use [`MemorySlot`].
pub trait SessionSlot {
    fn read(&self) -> Option<String>;
    fn write(&mut self, value: String);
    fn clear(&mut self);
}

/// In-process slot implementation.
#[derive(Debug, Default)]
pub struct MemorySlot {
    value: Option<String>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionSlot for MemorySlot {
    fn read(&self) -> Option<String> {
        self.value.clone()
    }

    fn write(&mut self, value: String) {
        self.value = Some(value);
    }

    fn clear(&mut self) {
        self.value = None;
    }
}

/// Authoritative session store for one browsing session.
///
/// Two states: anonymous and authenticated. `set_session` overwrites (no
/// merge), `clear_session` returns to anonymous, and a slot read that fails
/// to open resolves to anonymous.
pub struct SessionGuard<S: SessionSlot> {
    codec: SessionCodec,
    slot: S,
}

impl<S: SessionSlot> SessionGuard<S> {
    pub fn new(codec: SessionCodec, slot: S) -> Self {
        SessionGuard { codec, slot }
    }

    /// Overwrite the stored record with an encrypted serialization of
    /// `session`.
    pub fn set_session(&mut self, session: &UserSession) -> ServiceResult<()> {
        let token = self.codec.seal(session)?;
        self.slot.write(token);
        Ok(())
    }

    /// The stored session, or `None` when the slot is empty or holds
    /// anything the codec cannot open.
    pub fn get_session(&self) -> Option<UserSession> {
        let token = self.slot.read()?;
        self.codec.open(&token)
    }

    /// Remove the stored record.
    pub fn clear_session(&mut self) {
        self.slot.clear();
    }

    pub fn is_authenticated(&self) -> bool {
        self.get_session()
            .map(|session| session.authenticated)
            .unwrap_or(false)
    }

    pub fn role(&self) -> Role {
        self.get_session()
            .map(|session| session.role())
            .unwrap_or(Role::User)
    }

    pub fn user_id(&self) -> Option<i64> {
        self.get_session().map(|session| session.id)
    }

    pub fn username(&self) -> Option<String> {
        self.get_session().map(|session| session.username())
    }

    pub fn school_id(&self) -> Option<String> {
        self.get_session().map(|session| session.school_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> SessionCodec {
        SessionCodec::with_crypto(SessionCrypto::from_key("test passphrase").unwrap())
    }

    fn sample_session() -> UserSession {
        UserSession {
            id: 7,
            school_id: "S1".to_string(),
            fname: "Ana".to_string(),
            mname: "B".to_string(),
            lname: "Cruz".to_string(),
            suffix: String::new(),
            extension: String::new(),
            status: 1,
            authenticated: true,
        }
    }

    #[test]
    fn test_set_then_get_round_trips() {
        let mut guard = SessionGuard::new(codec(), MemorySlot::new());
        let session = sample_session();

        guard.set_session(&session).unwrap();

        assert_eq!(guard.get_session(), Some(session));
    }

    #[test]
    fn test_codec_clones_share_key_material() {
        // The codec is built once at startup and handed out by clone; a
        // token sealed by one clone must open under another.
        let original = codec();
        let clone = original.clone();

        let token = original.seal(&sample_session()).unwrap();
        assert_eq!(clone.open(&token), Some(sample_session()));
    }

    #[test]
    fn test_fresh_slot_is_anonymous() {
        let guard = SessionGuard::new(codec(), MemorySlot::new());

        assert_eq!(guard.get_session(), None);
        assert!(!guard.is_authenticated());
        assert_eq!(guard.role(), Role::User);
        assert_eq!(guard.user_id(), None);
        assert_eq!(guard.username(), None);
        assert_eq!(guard.school_id(), None);
    }

    #[test]
    fn test_foreign_slot_contents_collapse_to_absent() {
        // Anything not produced by this codec must read as "no session".
        let garbage = [
            "".to_string(),
            "random bytes".to_string(),
            // JSON plaintext written directly into the slot
            serde_json::to_string(&sample_session()).unwrap(),
            // Valid token sealed under a different key
            SessionCodec::with_crypto(SessionCrypto::from_key("other key").unwrap())
                .seal(&sample_session())
                .unwrap(),
        ];

        for raw in garbage {
            let mut slot = MemorySlot::new();
            slot.write(raw);
            let guard = SessionGuard::new(codec(), slot);

            assert_eq!(guard.get_session(), None);
            assert!(!guard.is_authenticated());
        }
    }

    #[test]
    fn test_clear_session_always_yields_absent() {
        let mut guard = SessionGuard::new(codec(), MemorySlot::new());

        // Clearing an already-anonymous guard is fine
        guard.clear_session();
        assert_eq!(guard.get_session(), None);

        guard.set_session(&sample_session()).unwrap();
        assert!(guard.is_authenticated());

        guard.clear_session();
        assert_eq!(guard.get_session(), None);
        assert!(!guard.is_authenticated());
    }

    #[test]
    fn test_set_session_overwrites_without_merge() {
        let mut guard = SessionGuard::new(codec(), MemorySlot::new());
        guard.set_session(&sample_session()).unwrap();

        let other = UserSession {
            id: 8,
            school_id: "S2".to_string(),
            fname: "Ben".to_string(),
            mname: String::new(),
            lname: "Reyes".to_string(),
            suffix: String::new(),
            extension: String::new(),
            status: 2,
            authenticated: true,
        };
        guard.set_session(&other).unwrap();

        assert_eq!(guard.get_session(), Some(other));
    }

    #[test]
    fn test_role_mapping() {
        let mut guard = SessionGuard::new(codec(), MemorySlot::new());

        for (status, expected) in [
            (1, Role::Admin),
            (0, Role::User),
            (2, Role::User),
            (-1, Role::User),
        ] {
            let mut session = sample_session();
            session.status = status;
            guard.set_session(&session).unwrap();
            assert_eq!(guard.role(), expected, "status {}", status);
        }
    }

    #[test]
    fn test_admin_login_scenario() {
        // Login succeeds with school_id S1, Ana Cruz, status 1.
        let mut guard = SessionGuard::new(codec(), MemorySlot::new());
        guard.set_session(&sample_session()).unwrap();

        assert!(guard.is_authenticated());
        assert_eq!(guard.role(), Role::Admin);
        assert_eq!(guard.role().as_str(), "admin");
        assert_eq!(guard.username(), Some("Ana Cruz".to_string()));
        assert_eq!(guard.school_id(), Some("S1".to_string()));
    }
}
