//! Session service - the current identity and the operations that change it
//!
//! `SessionStore` owns the account registry and the current-session pointer.
//! Consumers get snapshots; they never mutate account data themselves.
//!
//! Lifecycle: a new store is `Unresolved` until [`SessionStore::load`] reads
//! the persisted session, after which it is `LoggedIn` or `LoggedOut`.
//! Sign-in and sign-up wait out a fixed artificial delay before touching
//! any state. The state lock is never held across that await, so snapshots
//! stay readable while a login is "in flight".

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use uuid::Uuid;

use super::logging::{LogEvent, LoggingService};
use super::registry::{keys, AccountRegistry, RegisteredAccount};
use crate::domain::result::{Error, Result};
use crate::domain::{
    normalize_email, Account, Credential, CredentialScheme, ProfileUpdate, Role, SessionSnapshot,
    SessionState,
};
use crate::ports::KeyValueStore;

/// Default artificial latency for sign-in and sign-up
pub const DEFAULT_LATENCY: Duration = Duration::from_millis(800);

/// Tunables for a session store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    /// Delay before authenticate/register resolve
    pub latency: Duration,
    /// Scheme for credentials created by register
    pub credential_scheme: CredentialScheme,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            latency: DEFAULT_LATENCY,
            credential_scheme: CredentialScheme::Plaintext,
        }
    }
}

pub struct SessionStore {
    storage: Arc<dyn KeyValueStore>,
    registry: AccountRegistry,
    options: SessionOptions,
    session: Mutex<SessionSnapshot>,
    logger: Option<Arc<LoggingService>>,
}

impl SessionStore {
    /// Create an unresolved store; call [`load`](Self::load) before use
    pub fn new(storage: Arc<dyn KeyValueStore>, options: SessionOptions) -> Self {
        Self {
            registry: AccountRegistry::new(Arc::clone(&storage)),
            storage,
            options,
            session: Mutex::new(SessionSnapshot::unresolved()),
            logger: None,
        }
    }

    /// Create a store and rehydrate it from storage
    pub fn open(storage: Arc<dyn KeyValueStore>, options: SessionOptions) -> Result<Self> {
        let store = Self::new(storage, options);
        store.load()?;
        Ok(store)
    }

    /// Record session events to the given event log
    pub fn with_logger(mut self, logger: Arc<LoggingService>) -> Self {
        self.logger = Some(logger);
        self
    }

    fn lock(&self) -> Result<MutexGuard<'_, SessionSnapshot>> {
        self.session
            .lock()
            .map_err(|e| Error::storage(format!("Lock poisoned: {}", e)))
    }

    fn record(&self, event: LogEvent) {
        if let Some(logger) = &self.logger {
            if let Err(e) = logger.log(event) {
                tracing::debug!("failed to write event log: {}", e);
            }
        }
    }

    /// Rehydrate the current session from storage.
    ///
    /// An unreadable record is treated as no session and removed, so the
    /// next start does not trip over it again.
    pub fn load(&self) -> Result<SessionState> {
        let account = match self.storage.get(keys::CURRENT_SESSION)? {
            Some(raw) => match serde_json::from_str::<Account>(&raw) {
                Ok(account) => Some(account),
                Err(e) => {
                    tracing::warn!("discarding unreadable {} record: {}", keys::CURRENT_SESSION, e);
                    self.storage.remove(keys::CURRENT_SESSION)?;
                    None
                }
            },
            None => None,
        };

        let snapshot = SessionSnapshot::from_account(account);
        let state = snapshot.state;
        *self.lock()? = snapshot;

        tracing::debug!(?state, "session rehydrated");
        Ok(state)
    }

    pub fn snapshot(&self) -> Result<SessionSnapshot> {
        Ok(self.lock()?.clone())
    }

    pub fn state(&self) -> Result<SessionState> {
        Ok(self.lock()?.state)
    }

    /// The signed-in account, if any
    pub fn current(&self) -> Result<Option<Account>> {
        Ok(self.lock()?.account.clone())
    }

    /// The signed-in account, or `NoActiveSession`
    pub fn require_current(&self) -> Result<Account> {
        self.ensure_ready()?;
        self.current()?.ok_or(Error::NoActiveSession)
    }

    pub fn registry(&self) -> &AccountRegistry {
        &self.registry
    }

    pub fn options(&self) -> SessionOptions {
        self.options
    }

    pub fn storage_backend(&self) -> &'static str {
        self.storage.backend()
    }

    fn ensure_ready(&self) -> Result<()> {
        if self.state()? == SessionState::Unresolved {
            return Err(Error::NotReady);
        }
        Ok(())
    }

    async fn simulate_latency(&self) {
        if !self.options.latency.is_zero() {
            tokio::time::sleep(self.options.latency).await;
        }
    }

    /// Persist and install a new current account
    fn set_current(&self, account: &Account) -> Result<()> {
        let raw = serde_json::to_string(account)?;
        self.storage.set(keys::CURRENT_SESSION, &raw)?;
        *self.lock()? = SessionSnapshot::from_account(Some(account.clone()));
        Ok(())
    }

    /// Sign in with an email (any casing) and an exact password.
    ///
    /// On failure the previous session, if any, is left as it was. On
    /// success any previous session is replaced.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Account> {
        self.ensure_ready()?;
        self.simulate_latency().await;

        let email = normalize_email(email);
        match self.registry.verify(&email, password)? {
            Some(account) => {
                self.set_current(&account)?;
                tracing::info!(role = %account.role, "signed in");
                self.record(LogEvent::new("login_succeeded").with_role(account.role));
                Ok(account)
            }
            None => {
                tracing::info!("sign-in rejected");
                self.record(LogEvent::new("login_failed"));
                Err(Error::InvalidCredentials)
            }
        }
    }

    /// Create an account and sign it in.
    ///
    /// Rejected with `EmailAlreadyRegistered` if the email, compared
    /// case-insensitively, belongs to a built-in or earlier account; the
    /// registry is not touched in that case.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<Account> {
        self.ensure_ready()?;
        self.simulate_latency().await;

        let email = normalize_email(email);
        if self.registry.contains(&email)? {
            tracing::info!("sign-up rejected: email taken");
            self.record(LogEvent::new("signup_rejected").with_role(role));
            return Err(Error::EmailAlreadyRegistered(email));
        }

        let credential = Credential::create(password, self.options.credential_scheme)?;
        let account = Account::new(Uuid::new_v4().to_string(), username, &email, role);

        self.registry.insert(RegisteredAccount {
            credential,
            account: account.clone(),
        })?;
        self.set_current(&account)?;

        tracing::info!(role = %role, "account registered");
        self.record(LogEvent::new("signup_succeeded").with_role(role));
        Ok(account)
    }

    /// Merge profile fields into the current account.
    ///
    /// Returns `Ok(None)` without doing anything when nobody is signed in.
    /// Runtime accounts also get their registry entry rewritten; built-in
    /// accounts only change in the session record.
    pub fn update_profile(&self, update: &ProfileUpdate) -> Result<Option<Account>> {
        self.ensure_ready()?;

        let mut session = self.lock()?;
        let Some(current) = session.account.as_ref() else {
            tracing::debug!("profile update ignored: no active session");
            return Ok(None);
        };

        let mut merged = current.clone();
        merged.apply(update);

        // Registry first: if it fails, neither record nor snapshot has moved
        if !self.registry.is_seed(&merged.email) {
            self.registry.update_account(&merged)?;
        }
        self.storage
            .set(keys::CURRENT_SESSION, &serde_json::to_string(&merged)?)?;
        session.account = Some(merged.clone());
        drop(session);

        self.record(LogEvent::new("profile_updated").with_role(merged.role));
        Ok(Some(merged))
    }

    /// Clear the current session and its persisted record.
    ///
    /// Returns whether someone was signed in. The registry is untouched.
    pub fn sign_out(&self) -> Result<bool> {
        self.ensure_ready()?;

        let mut session = self.lock()?;
        self.storage.remove(keys::CURRENT_SESSION)?;
        let previous = session.account.take();
        session.state = SessionState::LoggedOut;
        drop(session);

        if let Some(account) = &previous {
            tracing::info!(role = %account.role, "signed out");
            self.record(LogEvent::new("signed_out").with_role(account.role));
        }
        Ok(previous.is_some())
    }
}
