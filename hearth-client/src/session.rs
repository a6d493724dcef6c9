//! Session state
//!
//! The session cookie lives in the reqwest cookie store; this module only
//! tracks who is logged in and tells subscribers when that changes.

use shared::client::UserInfo;
use shared::types::Actor;
use tokio::sync::watch;

/// Who the client is acting for
#[derive(Debug, Clone, Default)]
pub enum AuthState {
    #[default]
    LoggedOut,
    LoggedIn(UserInfo),
}

impl AuthState {
    pub fn user(&self) -> Option<&UserInfo> {
        match self {
            AuthState::LoggedIn(user) => Some(user),
            AuthState::LoggedOut => None,
        }
    }

    pub fn is_logged_in(&self) -> bool {
        matches!(self, AuthState::LoggedIn(_))
    }
}

/// Shared handle to the current [`AuthState`]
#[derive(Debug, Clone)]
pub struct Session {
    tx: watch::Sender<AuthState>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(AuthState::LoggedOut);
        Self { tx }
    }

    /// Receive every login, logout and forced logout
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.tx.subscribe()
    }

    pub fn state(&self) -> AuthState {
        self.tx.borrow().clone()
    }

    pub fn current_user(&self) -> Option<UserInfo> {
        self.tx.borrow().user().cloned()
    }

    /// Workflow actor of the logged-in user
    pub fn actor(&self) -> Option<Actor> {
        self.tx.borrow().user().map(UserInfo::actor)
    }

    pub fn is_logged_in(&self) -> bool {
        self.tx.borrow().is_logged_in()
    }

    pub(crate) fn set_logged_in(&self, user: UserInfo) {
        tracing::info!(user_id = user.id, username = %user.username, "logged in");
        self.tx.send_replace(AuthState::LoggedIn(user));
    }

    pub(crate) fn set_logged_out(&self) {
        let previous = self.tx.send_replace(AuthState::LoggedOut);
        if let AuthState::LoggedIn(user) = previous {
            tracing::info!(user_id = user.id, "logged out");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> UserInfo {
        serde_json::from_str(r#"{"id":5,"username":"anna","role":"waiter","permissions":["captain_order:*"]}"#)
            .unwrap()
    }

    #[test]
    fn test_login_logout_cycle() {
        let session = Session::new();
        assert!(!session.is_logged_in());
        assert!(session.actor().is_none());

        session.set_logged_in(user());
        assert_eq!(session.current_user().unwrap().username, "anna");
        assert!(session.actor().unwrap().can("captain_order:print"));

        session.set_logged_out();
        assert!(session.current_user().is_none());
    }

    #[tokio::test]
    async fn test_subscribers_see_forced_logout() {
        let session = Session::new();
        session.set_logged_in(user());
        let mut rx = session.subscribe();

        session.set_logged_out();
        rx.changed().await.unwrap();
        assert!(!rx.borrow().is_logged_in());
    }
}
