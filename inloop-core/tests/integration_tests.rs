//! Integration tests for the session store
//!
//! These run the session store against every real storage adapter, in temp
//! directories, and "restart" by opening a second store on the same storage.
//! Time is paused, so the artificial sign-in delay costs nothing.
//!
//! Run with: cargo test --test integration_tests -- --nocapture

use std::path::Path;
use std::sync::Arc;

use tempfile::TempDir;

use inloop_core::adapters::duckdb::DuckDbStore;
use inloop_core::adapters::file::FileStore;
use inloop_core::adapters::memory::MemoryStore;
use inloop_core::ports::KeyValueStore;
use inloop_core::services::keys;
use inloop_core::{
    EntryPoint, Error, InloopContext, LoggingService, ProfileUpdate, Role, SessionOptions,
    SessionState, SessionStore,
};

// ============================================================================
// Test Helpers
// ============================================================================

/// Every storage backend, each in its own directory under `dir`
fn backends(dir: &Path) -> Vec<Arc<dyn KeyValueStore>> {
    vec![
        Arc::new(MemoryStore::new()),
        Arc::new(FileStore::new(&dir.join("files")).expect("Failed to create file store")),
        Arc::new(DuckDbStore::new(&dir.join("kv.duckdb")).expect("Failed to create duckdb store")),
    ]
}

/// Open a rehydrated store, as on process start
fn open(storage: &Arc<dyn KeyValueStore>) -> SessionStore {
    SessionStore::open(Arc::clone(storage), SessionOptions::default())
        .expect("Failed to open session store")
}

// ============================================================================
// Concrete Scenarios
// ============================================================================

/// Seed admin signs in with an upper-cased email
#[tokio::test(start_paused = true)]
async fn test_admin_login_any_casing() {
    let temp_dir = TempDir::new().unwrap();
    for storage in backends(temp_dir.path()) {
        let store = open(&storage);

        let account = store.authenticate("ADMIN@INLOOP.COM", "admin").await.unwrap();

        assert_eq!(account.role, Role::Administrator);
        let snapshot = store.snapshot().unwrap();
        assert_eq!(snapshot.state, SessionState::LoggedIn);
        assert_eq!(snapshot.account.unwrap().role, Role::Administrator);
    }
}

/// Wrong password fails and leaves the (empty) session alone
#[tokio::test(start_paused = true)]
async fn test_wrong_password_changes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    for storage in backends(temp_dir.path()) {
        let store = open(&storage);

        let err = store.authenticate("admin@inloop.com", "wrong").await.unwrap_err();

        assert!(matches!(err, Error::InvalidCredentials));
        assert_eq!(store.state().unwrap(), SessionState::LoggedOut);
        assert_eq!(storage.get(keys::CURRENT_SESSION).unwrap(), None);
    }
}

/// Second signup with the same email in another casing is rejected
#[tokio::test(start_paused = true)]
async fn test_duplicate_signup_rejected() {
    let temp_dir = TempDir::new().unwrap();
    for storage in backends(temp_dir.path()) {
        let store = open(&storage);

        store
            .register("Jane", "jane@x.com", "pw", Role::Member)
            .await
            .unwrap();
        let registry_before = storage.get(keys::REGISTERED_ACCOUNTS).unwrap();

        let err = store
            .register("Jane2", "JANE@x.com", "pw2", Role::Member)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::EmailAlreadyRegistered(ref e) if e == "jane@x.com"));
        assert_eq!(storage.get(keys::REGISTERED_ACCOUNTS).unwrap(), registry_before);
        assert_eq!(store.current().unwrap().unwrap().username, "Jane");
    }
}

/// Signup, bio edit, restart: the bio survives
#[tokio::test(start_paused = true)]
async fn test_profile_edit_survives_restart() {
    let temp_dir = TempDir::new().unwrap();
    for storage in backends(temp_dir.path()) {
        {
            let store = open(&storage);
            store
                .register("Jane", "jane@x.com", "pw", Role::Member)
                .await
                .unwrap();
            store.update_profile(&ProfileUpdate::new().bio("hi")).unwrap();
        }

        let restarted = open(&storage);
        let current = restarted.current().unwrap().expect("session should rehydrate");
        assert_eq!(current.bio.as_deref(), Some("hi"));
        assert_eq!(current.username, "Jane");

        // The registry entry was rewritten too, so a later sign-in sees it
        restarted.sign_out().unwrap();
        let again = restarted.authenticate("jane@x.com", "pw").await.unwrap();
        assert_eq!(again.bio.as_deref(), Some("hi"));
    }
}

// ============================================================================
// Properties
// ============================================================================

/// Login succeeds exactly for a known email with the exact password
#[tokio::test(start_paused = true)]
async fn test_authenticate_iff_exact_match() {
    let temp_dir = TempDir::new().unwrap();
    for storage in backends(temp_dir.path()) {
        let store = open(&storage);
        store
            .register("Org", "Events@Campus.edu", "S3cret", Role::Organization)
            .await
            .unwrap();
        store.sign_out().unwrap();

        let cases = [
            ("events@campus.edu", "S3cret", true),
            ("EVENTS@CAMPUS.EDU", "S3cret", true),
            ("events@campus.edu", "s3cret", false),
            ("events@campus.edu", "S3cret ", false),
            ("other@campus.edu", "S3cret", false),
            ("club@inloop.com", "club123", true),
            ("club@inloop.com", "CLUB123", false),
            ("student@inloop.com", "student123", true),
        ];

        for (email, password, expected) in cases {
            let result = store.authenticate(email, password).await;
            assert_eq!(result.is_ok(), expected, "{} / {}", email, password);
        }
    }
}

/// Email matching ignores case only; surrounding whitespace is not stripped
#[tokio::test(start_paused = true)]
async fn test_padded_email_is_a_different_account() {
    let temp_dir = TempDir::new().unwrap();
    for storage in backends(temp_dir.path()) {
        let store = open(&storage);

        let err = store
            .authenticate(" admin@inloop.com ", "admin")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidCredentials));
        assert_eq!(store.state().unwrap(), SessionState::LoggedOut);

        store
            .register("Jane", "jane@x.com", "pw", Role::Member)
            .await
            .unwrap();
        store.sign_out().unwrap();

        assert!(store.authenticate(" jane@x.com", "pw").await.is_err());
        let padded = store
            .register("Jane2", " JANE@x.com", "pw2", Role::Member)
            .await
            .unwrap();
        assert_eq!(padded.email, " jane@x.com");
    }
}

/// Seed emails can never be registered, in any casing
#[tokio::test(start_paused = true)]
async fn test_seed_emails_are_reserved() {
    let temp_dir = TempDir::new().unwrap();
    for storage in backends(temp_dir.path()) {
        let store = open(&storage);

        for email in ["admin@inloop.com", "Club@Inloop.com", "STUDENT@INLOOP.COM"] {
            let err = store
                .register("Impostor", email, "x", Role::Administrator)
                .await
                .unwrap_err();
            assert!(matches!(err, Error::EmailAlreadyRegistered(_)));
        }

        assert_eq!(storage.get(keys::REGISTERED_ACCOUNTS).unwrap(), None);
        assert_eq!(store.state().unwrap(), SessionState::LoggedOut);
    }
}

/// Signing out then restarting never resurrects the old session
#[tokio::test(start_paused = true)]
async fn test_sign_out_then_restart_is_logged_out() {
    let temp_dir = TempDir::new().unwrap();
    for storage in backends(temp_dir.path()) {
        {
            let store = open(&storage);
            store.authenticate("student@inloop.com", "student123").await.unwrap();
            assert!(store.sign_out().unwrap());
            assert_eq!(store.state().unwrap(), SessionState::LoggedOut);
        }

        let restarted = open(&storage);
        assert_eq!(restarted.state().unwrap(), SessionState::LoggedOut);
        assert!(restarted.snapshot().unwrap().should_redirect_to_login());
    }
}

/// Sign-out clears the session but not the registry
#[tokio::test(start_paused = true)]
async fn test_sign_out_keeps_registry() {
    let temp_dir = TempDir::new().unwrap();
    for storage in backends(temp_dir.path()) {
        let store = open(&storage);
        let jane = store
            .register("Jane", "jane@x.com", "pw", Role::Member)
            .await
            .unwrap();

        store.sign_out().unwrap();

        assert!(store.registry().contains("jane@x.com").unwrap());
        let again = store.authenticate("jane@x.com", "pw").await.unwrap();
        assert_eq!(again.id, jane.id);
    }
}

/// Registration assigns a fresh id, the placeholder avatar, and signs in
#[tokio::test(start_paused = true)]
async fn test_register_builds_new_account() {
    let temp_dir = TempDir::new().unwrap();
    for storage in backends(temp_dir.path()) {
        let store = open(&storage);

        let a = store
            .register("A", "a@x.com", "pw", Role::Member)
            .await
            .unwrap();
        let b = store
            .register("B", "B@X.com", "pw", Role::Organization)
            .await
            .unwrap();

        assert_ne!(a.id, b.id);
        assert_eq!(b.email, "b@x.com");
        assert_eq!(b.avatar.as_deref(), Some(inloop_core::domain::PLACEHOLDER_AVATAR));
        assert!(b.bio.is_none());
        assert_eq!(store.current().unwrap().unwrap().id, b.id);
    }
}

/// Two stores on one storage see each other's registrations
#[tokio::test(start_paused = true)]
async fn test_registrations_visible_across_stores() {
    let temp_dir = TempDir::new().unwrap();
    for storage in backends(temp_dir.path()) {
        let first = open(&storage);
        let second = open(&storage);

        first
            .register("Jane", "jane@x.com", "pw", Role::Member)
            .await
            .unwrap();

        let err = second
            .register("Other", "jane@x.com", "pw", Role::Member)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::EmailAlreadyRegistered(_)));
        assert!(second.authenticate("jane@x.com", "pw").await.is_ok());
    }
}

/// Records written by older builds (no scheme field) still load
#[tokio::test(start_paused = true)]
async fn test_reads_existing_record_layout() {
    let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    storage
        .set(
            keys::REGISTERED_ACCOUNTS,
            r#"{"sam@x.com":{"password":"pw","account":{"id":"1700000000000","username":"Sam","email":"sam@x.com","role":"club","avatar":"/placeholder.svg"}}}"#,
        )
        .unwrap();
    storage
        .set(
            keys::CURRENT_SESSION,
            r#"{"id":"3","username":"John Doe","email":"student@inloop.com","role":"student","year":3}"#,
        )
        .unwrap();

    let store = open(&storage);
    assert_eq!(store.current().unwrap().unwrap().year, Some(3));

    let sam = store.authenticate("sam@x.com", "pw").await.unwrap();
    assert_eq!(sam.role, Role::Organization);
    assert_eq!(sam.id, "1700000000000");
}

// ============================================================================
// Context Wiring
// ============================================================================

/// The context rehydrates and records privacy-safe events
#[tokio::test(start_paused = true)]
async fn test_context_records_events_without_emails() {
    let temp_dir = TempDir::new().unwrap();

    {
        let ctx = InloopContext::new(temp_dir.path(), EntryPoint::Embedded).unwrap();
        assert_eq!(ctx.session.state().unwrap(), SessionState::LoggedOut);
        ctx.session
            .authenticate("club@inloop.com", "club123")
            .await
            .unwrap();
        let _ = ctx.session.authenticate("club@inloop.com", "bad").await;
    }

    let ctx = InloopContext::new(temp_dir.path(), EntryPoint::Embedded).unwrap();
    assert_eq!(ctx.session.current().unwrap().unwrap().email, "club@inloop.com");
    assert!(temp_dir.path().join("storage").join("current-session.json").exists());
    drop(ctx);

    let logs = LoggingService::new(temp_dir.path(), EntryPoint::Embedded, "test").unwrap();
    let entries = logs.get_recent(10).unwrap();
    let events: Vec<_> = entries.iter().map(|e| e.event.as_str()).collect();
    assert!(events.contains(&"login_succeeded"));
    assert!(events.contains(&"login_failed"));

    let dump = serde_json::to_string(&entries).unwrap();
    assert!(!dump.contains("club@inloop.com"));
    assert!(!dump.contains("club123"));
}
