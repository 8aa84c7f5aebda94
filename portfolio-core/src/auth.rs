//! Identity provider seam.
//!
//! The sync layer only needs to know whether someone is signed in, to follow
//! sign-in state changes, and to sign out. Credential exchange happens in the
//! host (browser session, CLI flag, ...) before the sync layer is consulted.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;
use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub uid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl User {
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            email: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Sign-out failed: {0}")]
    SignOut(String),
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// The signed-in user, if any.
    fn current_user(&self) -> Option<User>;

    /// Follows sign-in state; the receiver starts at the current state.
    fn watch(&self) -> watch::Receiver<Option<User>>;

    async fn sign_out(&self) -> Result<(), AuthError>;
}

/// Session held in memory, signed in and out by the host.
pub struct MemoryAuth {
    session: watch::Sender<Option<User>>,
    fail_sign_out: AtomicBool,
}

impl MemoryAuth {
    /// Starts signed out.
    pub fn new() -> Self {
        let (session, _) = watch::channel(None);
        Self {
            session,
            fail_sign_out: AtomicBool::new(false),
        }
    }

    pub fn signed_in(user: User) -> Self {
        let auth = Self::new();
        auth.sign_in(user);
        auth
    }

    pub fn sign_in(&self, user: User) {
        tracing::info!("Signed in as {}", user.email.as_deref().unwrap_or(&user.uid));
        self.session.send_replace(Some(user));
    }

    /// Makes subsequent `sign_out` calls fail and keep the session.
    pub fn fail_sign_out(&self, fail: bool) {
        self.fail_sign_out.store(fail, Ordering::SeqCst);
    }
}

impl Default for MemoryAuth {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuthProvider for MemoryAuth {
    fn current_user(&self) -> Option<User> {
        self.session.borrow().clone()
    }

    fn watch(&self) -> watch::Receiver<Option<User>> {
        self.session.subscribe()
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        if self.fail_sign_out.load(Ordering::SeqCst) {
            return Err(AuthError::SignOut("identity provider unreachable".to_string()));
        }
        self.session.send_replace(None);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_auth_starts_signed_out() {
        let auth = MemoryAuth::new();
        assert_eq!(auth.current_user(), None);
    }

    #[tokio::test]
    async fn test_watch_follows_sign_in_and_out() {
        let auth = MemoryAuth::new();
        let mut rx = auth.watch();

        auth.sign_in(User::new("u1").with_email("admin@example.edu"));
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().as_ref().map(|u| u.uid.as_str()), Some("u1"));

        auth.sign_out().await.unwrap();
        rx.changed().await.unwrap();
        assert!(rx.borrow().is_none());
    }

    #[tokio::test]
    async fn test_failed_sign_out_keeps_session() {
        let auth = MemoryAuth::signed_in(User::new("u1"));
        auth.fail_sign_out(true);

        assert!(auth.sign_out().await.is_err());
        assert!(auth.current_user().is_some());
    }
}
