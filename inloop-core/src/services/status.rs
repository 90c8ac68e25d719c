//! Status service - session and registry summary

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use super::session::SessionStore;
use crate::domain::result::Result;
use crate::domain::{RoleCapabilities, SessionState};

/// Status service for `inloop status`
pub struct StatusService {
    session: Arc<SessionStore>,
}

impl StatusService {
    pub fn new(session: Arc<SessionStore>) -> Self {
        Self { session }
    }

    /// Get overall status summary
    pub fn get_status(&self) -> Result<StatusSummary> {
        let snapshot = self.session.snapshot()?;
        let registry = self.session.registry();
        let accounts = registry.list()?;

        let mut accounts_by_role = BTreeMap::new();
        for account in &accounts {
            *accounts_by_role
                .entry(account.role.label().to_string())
                .or_insert(0usize) += 1;
        }

        let builtin_accounts = registry.builtin_count();
        Ok(StatusSummary {
            storage_backend: self.session.storage_backend().to_string(),
            session_state: snapshot.state,
            signed_in: snapshot.account.as_ref().map(|a| SignedIn {
                username: a.username.clone(),
                email: a.email.clone(),
                role: a.role.label().to_string(),
                capabilities: a.role.capabilities(),
            }),
            total_accounts: accounts.len(),
            builtin_accounts,
            registered_accounts: accounts.len().saturating_sub(builtin_accounts),
            accounts_by_role,
            latency_ms: self.session.options().latency.as_millis() as u64,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct StatusSummary {
    pub storage_backend: String,
    pub session_state: SessionState,
    pub signed_in: Option<SignedIn>,
    pub total_accounts: usize,
    pub builtin_accounts: usize,
    pub registered_accounts: usize,
    pub accounts_by_role: BTreeMap<String, usize>,
    pub latency_ms: u64,
}

#[derive(Debug, Serialize)]
pub struct SignedIn {
    pub username: String,
    pub email: String,
    pub role: String,
    pub capabilities: RoleCapabilities,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryStore;
    use crate::domain::Role;
    use crate::services::SessionOptions;

    #[tokio::test(start_paused = true)]
    async fn test_status_counts() {
        let storage = Arc::new(MemoryStore::new());
        let session =
            Arc::new(SessionStore::open(storage, SessionOptions::default()).unwrap());
        session
            .register("Jane", "jane@x.com", "pw", Role::Member)
            .await
            .unwrap();

        let status = StatusService::new(Arc::clone(&session)).get_status().unwrap();
        assert_eq!(status.storage_backend, "memory");
        assert_eq!(status.session_state, SessionState::LoggedIn);
        assert_eq!(status.total_accounts, 4);
        assert_eq!(status.registered_accounts, 1);
        assert_eq!(status.accounts_by_role.get("Student"), Some(&2));

        let signed_in = status.signed_in.unwrap();
        assert_eq!(signed_in.email, "jane@x.com");
        assert!(!signed_in.capabilities.can_create_post);
    }
}
