//! Account registry - built-in plus runtime-registered accounts
//!
//! The registry is the union of the seed accounts and the
//! `registered-accounts` record, keyed by lower-cased email. Seeds always
//! win a lookup. The runtime table is re-read on every call, so several
//! stores on the same storage observe each other's signups.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::adapters::seed::{builtin_accounts, SeedAccount};
use crate::domain::result::{Error, Result};
use crate::domain::{normalize_email, Account, Credential};
use crate::ports::KeyValueStore;

/// Storage keys owned by the session store
pub mod keys {
    /// JSON-serialized current account, absent when signed out
    pub const CURRENT_SESSION: &str = "current-session";

    /// JSON map from lower-cased email to `{ password, account }`
    pub const REGISTERED_ACCOUNTS: &str = "registered-accounts";
}

/// One entry of the runtime table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredAccount {
    #[serde(flatten)]
    pub credential: Credential,
    pub account: Account,
}

type RegisteredTable = BTreeMap<String, RegisteredAccount>;

pub struct AccountRegistry {
    storage: Arc<dyn KeyValueStore>,
    seeds: Vec<SeedAccount>,
}

impl AccountRegistry {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            storage,
            seeds: builtin_accounts(),
        }
    }

    fn seed(&self, email: &str) -> Option<&SeedAccount> {
        self.seeds.iter().find(|s| s.account.email == email)
    }

    /// True if the email belongs to a built-in account
    pub fn is_seed(&self, email: &str) -> bool {
        self.seed(&normalize_email(email)).is_some()
    }

    /// Read the runtime table.
    ///
    /// A record that does not parse is treated as an empty table; the next
    /// successful registration overwrites it.
    pub fn load_registered(&self) -> Result<RegisteredTable> {
        let Some(raw) = self.storage.get(keys::REGISTERED_ACCOUNTS)? else {
            return Ok(RegisteredTable::new());
        };

        match serde_json::from_str(&raw) {
            Ok(table) => Ok(table),
            Err(e) => {
                tracing::warn!("ignoring unreadable {} record: {}", keys::REGISTERED_ACCOUNTS, e);
                Ok(RegisteredTable::new())
            }
        }
    }

    fn save_registered(&self, table: &RegisteredTable) -> Result<()> {
        let raw = serde_json::to_string(table)?;
        self.storage.set(keys::REGISTERED_ACCOUNTS, &raw)
    }

    /// Look an account up by email, any casing
    pub fn find(&self, email: &str) -> Result<Option<Account>> {
        let email = normalize_email(email);
        if let Some(seed) = self.seed(&email) {
            return Ok(Some(seed.account.clone()));
        }
        Ok(self.load_registered()?.remove(&email).map(|r| r.account))
    }

    pub fn contains(&self, email: &str) -> Result<bool> {
        Ok(self.find(email)?.is_some())
    }

    /// Return the account whose credential matches, checking seeds first
    /// and then the runtime table.
    pub fn verify(&self, email: &str, password: &str) -> Result<Option<Account>> {
        let email = normalize_email(email);

        if let Some(seed) = self.seed(&email) {
            if seed.credential.verify(password) {
                return Ok(Some(seed.account.clone()));
            }
        }

        let registered = self.load_registered()?;
        Ok(registered
            .get(&email)
            .filter(|r| r.credential.verify(password))
            .map(|r| r.account.clone()))
    }

    /// Add a runtime account.
    ///
    /// Fails without touching storage if the email is already taken by a
    /// seed or an earlier registration.
    pub fn insert(&self, record: RegisteredAccount) -> Result<()> {
        let email = normalize_email(&record.account.email);
        if self.seed(&email).is_some() {
            return Err(Error::EmailAlreadyRegistered(email));
        }

        let mut table = self.load_registered()?;
        if table.contains_key(&email) {
            return Err(Error::EmailAlreadyRegistered(email));
        }

        table.insert(email, record);
        self.save_registered(&table)
    }

    /// Replace the stored profile of a runtime account.
    ///
    /// Returns false for seed accounts and unknown emails, which are left
    /// alone.
    pub fn update_account(&self, account: &Account) -> Result<bool> {
        let email = normalize_email(&account.email);
        if self.seed(&email).is_some() {
            return Ok(false);
        }

        let mut table = self.load_registered()?;
        match table.get_mut(&email) {
            Some(record) => {
                record.account = account.clone();
                self.save_registered(&table)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Every known account: seeds first, then runtime accounts by email
    pub fn list(&self) -> Result<Vec<Account>> {
        let mut accounts: Vec<Account> = self.seeds.iter().map(|s| s.account.clone()).collect();
        accounts.extend(self.load_registered()?.into_values().map(|r| r.account));
        Ok(accounts)
    }

    pub fn builtin_count(&self) -> usize {
        self.seeds.len()
    }
}
