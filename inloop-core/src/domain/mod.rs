//! Core domain entities
//!
//! All business entities are defined here. These are pure data structures
//! with validation logic - no I/O or external dependencies.

mod account;
mod credential;
mod session;
pub mod result;

pub use account::{normalize_email, Account, ProfileUpdate, Role, RoleCapabilities, PLACEHOLDER_AVATAR};
pub use credential::{Credential, CredentialScheme};
pub use session::{SessionSnapshot, SessionState};
