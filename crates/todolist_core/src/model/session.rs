//! Authenticated session state.
//!
//! # Invariants
//! - Token and username are set and cleared together.
//! - A fresh session is signed out.

use serde::{Deserialize, Serialize};

/// Identity established by a successful sign-in or sign-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Opaque bearer token issued by the API.
    pub token: String,
    /// Username the token was issued for.
    pub username: String,
}

/// Current authentication state of the client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    identity: Option<Identity>,
}

impl Session {
    /// Creates a signed-out session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the current identity.
    pub fn set(&mut self, token: impl Into<String>, username: impl Into<String>) {
        self.identity = Some(Identity {
            token: token.into(),
            username: username.into(),
        });
    }

    /// Signs out, dropping token and username together.
    pub fn clear(&mut self) {
        self.identity = None;
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.identity.as_ref().map(|identity| identity.token.as_str())
    }

    pub fn username(&self) -> Option<&str> {
        self.identity
            .as_ref()
            .map(|identity| identity.username.as_str())
    }

    pub fn is_signed_in(&self) -> bool {
        self.identity.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::Session;

    #[test]
    fn new_session_is_signed_out() {
        let session = Session::new();
        assert!(!session.is_signed_in());
        assert_eq!(session.token(), None);
        assert_eq!(session.username(), None);
    }

    #[test]
    fn set_and_clear_move_token_and_username_together() {
        let mut session = Session::new();
        session.set("tok1", "jean-paul");
        assert_eq!(session.token(), Some("tok1"));
        assert_eq!(session.username(), Some("jean-paul"));

        session.clear();
        assert_eq!(session.token(), None);
        assert_eq!(session.username(), None);
    }
}
