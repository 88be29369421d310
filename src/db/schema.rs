//! SQL DDL for the application's persistent tables.
//! Every statement is guarded with `IF NOT EXISTS` so re-running is harmless.

/// SQLite schema mirroring the web application's model layer:
/// - `users`: login accounts, `username` unique, `is_admin` stored as 0/1
/// - `archives`: generated PDF sheets owned by a user
/// - `user_settings`: per-user PDF layout defaults, one row per user
/// - `file_storage`: uploaded files kept on disk under `uploads/`
/// - `messages`: chat messages
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username VARCHAR(80) NOT NULL,
    full_name VARCHAR(200) NULL,
    password_hash VARCHAR(255) NOT NULL,
    is_admin INTEGER NOT NULL DEFAULT 0,
    created_at DATETIME NOT NULL
);

CREATE UNIQUE INDEX IF NOT EXISTS ix_users_username ON users(username);

CREATE TABLE IF NOT EXISTS archives (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users(id),
    filename VARCHAR(255) NOT NULL,
    pdf_data BLOB NOT NULL,
    source_type VARCHAR(50) NULL, -- "excel" | "text"
    source_name VARCHAR(255) NULL,
    qr_codes_count INTEGER NOT NULL DEFAULT 0,
    comment TEXT NULL,
    created_at DATETIME NOT NULL
);

CREATE INDEX IF NOT EXISTS ix_archives_user_id ON archives(user_id);
CREATE INDEX IF NOT EXISTS ix_archives_created_at ON archives(created_at);

CREATE TABLE IF NOT EXISTS user_settings (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL UNIQUE REFERENCES users(id),
    width FLOAT NOT NULL DEFAULT 75.0,
    height FLOAT NOT NULL DEFAULT 120.0,
    rows_per_page INTEGER NOT NULL DEFAULT 5,
    columns_per_page INTEGER NOT NULL DEFAULT 1,
    excel_mode VARCHAR(20) NOT NULL DEFAULT 'one_column' -- or 'two_columns'
);

CREATE TABLE IF NOT EXISTS file_storage (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users(id),
    filename VARCHAR(255) NOT NULL,
    original_filename VARCHAR(255) NOT NULL,
    file_path VARCHAR(500) NOT NULL,
    file_size INTEGER NOT NULL,
    mime_type VARCHAR(100) NULL,
    description TEXT NULL,
    created_at DATETIME NOT NULL
);

CREATE INDEX IF NOT EXISTS ix_file_storage_user_id ON file_storage(user_id);
CREATE INDEX IF NOT EXISTS ix_file_storage_created_at ON file_storage(created_at);

CREATE TABLE IF NOT EXISTS messages (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users(id),
    content TEXT NOT NULL,
    created_at DATETIME NOT NULL
);

CREATE INDEX IF NOT EXISTS ix_messages_user_id ON messages(user_id);
CREATE INDEX IF NOT EXISTS ix_messages_created_at ON messages(created_at)
"#;

/// Columns added after the first release. Databases created by older builds
/// lack them; `ALTER TABLE ... ADD COLUMN` is applied only when missing.
pub const COLUMN_MIGRATIONS: &[ColumnMigration] = &[ColumnMigration {
    table: "users",
    column: "full_name",
    definition: "VARCHAR(200)",
}];

#[derive(Debug, Clone, Copy)]
pub struct ColumnMigration {
    pub table: &'static str,
    pub column: &'static str,
    pub definition: &'static str,
}

/// Tables the schema initializer must leave behind.
pub const REQUIRED_TABLES: &[&str] = &[
    "users",
    "archives",
    "user_settings",
    "file_storage",
    "messages",
];
