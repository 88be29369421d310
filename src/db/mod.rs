//! Database module: models, schema and storage for the application's SQLite file.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows
//! - `schema.rs`: SQL DDL and column migrations (SQLite-first)
//! - `sqlite.rs`: pool construction and queries used during bootstrap

pub mod models;
pub mod schema;
pub mod sqlite;

pub use models::{DbUser, NewUser};
pub use schema::SQLITE_INIT;
pub use sqlite::{SqlitePool, UserStorage, connect};
