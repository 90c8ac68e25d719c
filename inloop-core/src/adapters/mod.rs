//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - In-memory map for the KeyValueStore port (tests, throwaway sessions)
//! - One-file-per-key directory for the KeyValueStore port
//! - DuckDB table for the KeyValueStore port
//! - Built-in seed accounts

pub mod duckdb;
pub mod file;
pub mod memory;
pub mod seed;
