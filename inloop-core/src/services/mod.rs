//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions. Each service
//! focuses on a specific use case or feature area.

pub mod logging;
pub mod migration;
pub mod registry;
mod session;
mod status;

pub use logging::{EntryPoint, LogEntry, LogEvent, LoggingService};
pub use migration::{MigrationResult, MigrationService};
pub use registry::{keys, AccountRegistry, RegisteredAccount};
pub use session::{SessionOptions, SessionStore, DEFAULT_LATENCY};
pub use status::{SignedIn, StatusService, StatusSummary};
