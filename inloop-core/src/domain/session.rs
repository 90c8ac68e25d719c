//! Session domain model

use serde::Serialize;

use super::account::Account;

/// Where the session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Startup, before the persisted session has been read
    Unresolved,
    LoggedOut,
    LoggedIn,
}

/// Read-only view of the session handed to consumers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub account: Option<Account>,
}

impl SessionSnapshot {
    pub fn unresolved() -> Self {
        Self {
            state: SessionState::Unresolved,
            account: None,
        }
    }

    pub fn from_account(account: Option<Account>) -> Self {
        let state = if account.is_some() {
            SessionState::LoggedIn
        } else {
            SessionState::LoggedOut
        };
        Self { state, account }
    }

    pub fn is_loading(&self) -> bool {
        self.state == SessionState::Unresolved
    }

    pub fn is_authenticated(&self) -> bool {
        self.account.is_some()
    }

    /// Guarded pages send the visitor to the login form only once loading has
    /// finished and nobody is signed in.
    pub fn should_redirect_to_login(&self) -> bool {
        !self.is_loading() && !self.is_authenticated()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;

    #[test]
    fn test_redirect_waits_for_loading() {
        let snapshot = SessionSnapshot::unresolved();
        assert!(snapshot.is_loading());
        assert!(!snapshot.should_redirect_to_login());

        let snapshot = SessionSnapshot::from_account(None);
        assert_eq!(snapshot.state, SessionState::LoggedOut);
        assert!(snapshot.should_redirect_to_login());

        let account = Account::new("1", "admin", "admin@inloop.com", Role::Administrator);
        let snapshot = SessionSnapshot::from_account(Some(account));
        assert_eq!(snapshot.state, SessionState::LoggedIn);
        assert!(snapshot.is_authenticated());
        assert!(!snapshot.should_redirect_to_login());
    }
}
