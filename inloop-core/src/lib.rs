//! Inloop Core - session and identity store for the Inloop campus network
//!
//! This crate implements the core domain logic following hexagonal architecture:
//!
//! - **domain**: Core entities (Account, Role, Credential, SessionSnapshot)
//! - **ports**: Trait definitions for external dependencies (KeyValueStore)
//! - **services**: Business logic orchestration (SessionStore, AccountRegistry)
//! - **adapters**: Concrete implementations (file, DuckDB, in-memory, seed data)
//!
//! Everything the feed, calendar and forum screens need from identity goes
//! through [`SessionStore`]: sign in, sign up, edit the profile, sign out, and
//! read the current snapshot.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod log_migrations;
pub mod migrations;
pub mod ports;
pub mod services;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use adapters::duckdb::DuckDbStore;
use adapters::file::FileStore;
use config::{Config, StorageBackend};
use ports::KeyValueStore;
use services::*;

// Re-export commonly used types at crate root
pub use domain::result::{Error, OperationResult};
pub use domain::{
    Account, Credential, CredentialScheme, ProfileUpdate, Role, RoleCapabilities,
    SessionSnapshot, SessionState,
};
pub use services::{
    EntryPoint, LogEntry, LogEvent, LoggingService, SessionOptions, SessionStore,
};

/// Main context for Inloop operations
///
/// Holds the configuration, the storage backend and the services wired on
/// top of it. The session store is already rehydrated when this returns.
pub struct InloopContext {
    pub config: Config,
    pub storage: Arc<dyn KeyValueStore>,
    pub session: Arc<SessionStore>,
    pub status_service: StatusService,
    pub logger: Option<Arc<LoggingService>>,
}

impl InloopContext {
    /// Create a new Inloop context rooted at `inloop_dir`
    pub fn new(inloop_dir: &Path, entry_point: EntryPoint) -> Result<Self> {
        let config = Config::load(inloop_dir)?;

        let storage: Arc<dyn KeyValueStore> = match config.storage {
            StorageBackend::File => Arc::new(FileStore::new(&inloop_dir.join("storage"))?),
            StorageBackend::DuckDb => Arc::new(DuckDbStore::new(&inloop_dir.join("inloop.duckdb"))?),
        };

        // The event log is best effort; a broken logs.duckdb must not lock anyone out
        let logger = match LoggingService::new(inloop_dir, entry_point, env!("CARGO_PKG_VERSION")) {
            Ok(service) => Some(Arc::new(service)),
            Err(e) => {
                tracing::warn!("event log unavailable: {}", e);
                None
            }
        };

        let mut session = SessionStore::new(Arc::clone(&storage), config.session_options());
        if let Some(logger) = &logger {
            session = session.with_logger(Arc::clone(logger));
        }
        session.load().context("Failed to restore session")?;
        let session = Arc::new(session);

        let status_service = StatusService::new(Arc::clone(&session));

        Ok(Self {
            config,
            storage,
            session,
            status_service,
            logger,
        })
    }
}
