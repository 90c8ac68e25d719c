//! Log database migrations - embedded SQL files
//!
//! Kept separate from the key-value store migrations: logs.duckdb is its own
//! file and must never share a schema with session data.

/// All log migrations, embedded at compile time.
/// Format: (filename, sql_content)
pub const LOG_MIGRATIONS: &[(&str, &str)] = &[
    ("000_migrations.sql", include_str!("000_migrations.sql")),
    (
        "001_initial_schema.sql",
        include_str!("001_initial_schema.sql"),
    ),
];
