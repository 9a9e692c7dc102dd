//! Session token storage.
//!
//! How a token is obtained is outside this crate; the session only stores it, hands it to
//! the interceptor and publishes when the server rejects it.

use std::sync::{Arc, RwLock};
use tokio::sync::watch;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    Anonymous,
    Authenticated,
    /// The server answered 401; the UI should navigate to `redirect_to`.
    Expired { redirect_to: String },
}

/// Shared, cloneable handle to the current session.
#[derive(Clone)]
pub struct AuthSession {
    token: Arc<RwLock<Option<String>>>,
    status: Arc<watch::Sender<SessionStatus>>,
    login_path: Arc<str>,
}

impl AuthSession {
    pub fn new(login_path: impl Into<String>) -> Self {
        let (status, _) = watch::channel(SessionStatus::Anonymous);
        Self {
            token: Arc::new(RwLock::new(None)),
            status: Arc::new(status),
            login_path: Arc::from(login_path.into()),
        }
    }

    pub fn sign_in(&self, token: impl Into<String>) {
        self.store(Some(token.into()));
        self.status.send_replace(SessionStatus::Authenticated);
        info!("Signed in");
    }

    pub fn sign_out(&self) {
        self.store(None);
        self.status.send_replace(SessionStatus::Anonymous);
        info!("Signed out");
    }

    /// Drops the token after the server rejected it and asks for a redirect to login.
    pub fn invalidate(&self) {
        self.store(None);
        self.status.send_replace(SessionStatus::Expired {
            redirect_to: self.login_path.to_string(),
        });
        info!(redirect_to = %self.login_path, "Session expired");
    }

    pub fn token(&self) -> Option<String> {
        match self.token.read() {
            Ok(token) => token.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    pub fn status(&self) -> SessionStatus {
        self.status.borrow().clone()
    }

    /// Notified on every sign-in, sign-out and expiry.
    pub fn subscribe(&self) -> watch::Receiver<SessionStatus> {
        self.status.subscribe()
    }

    fn store(&self, token: Option<String>) {
        match self.token.write() {
            Ok(mut slot) => *slot = token,
            Err(poisoned) => *poisoned.into_inner() = token,
        }
    }
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("authenticated", &self.is_authenticated())
            .field("status", &self.status())
            .finish()
    }
}
