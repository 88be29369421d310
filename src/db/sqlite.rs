use crate::db::models::{DbUser, NewUser};
use crate::db::schema::{COLUMN_MIGRATIONS, ColumnMigration, SQLITE_INIT};
use crate::error::BootError;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Row, Sqlite};
use std::path::Path;

pub type SqlitePool = Pool<Sqlite>;

/// Open (creating if missing) the SQLite file at `path`.
pub async fn connect(path: &Path) -> Result<SqlitePool, BootError> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;
    Ok(pool)
}

#[derive(Clone)]
pub struct UserStorage {
    pool: SqlitePool,
}

impl UserStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), BootError> {
        // execute multiple statements one by one (sqlx::query takes a single statement)
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Apply missing column migrations. Returns the `table.column` names added.
    /// Tables that do not exist yet are skipped; `init_schema` creates them whole.
    pub async fn apply_migrations(&self) -> Result<Vec<String>, BootError> {
        let tables = self.table_names().await?;
        let mut applied = Vec::new();
        for m in COLUMN_MIGRATIONS {
            if !tables.iter().any(|t| t == m.table) || self.has_column(m.table, m.column).await? {
                continue;
            }
            self.add_column(m).await?;
            applied.push(format!("{}.{}", m.table, m.column));
        }
        Ok(applied)
    }

    async fn has_column(&self, table: &str, column: &str) -> Result<bool, BootError> {
        let rows = sqlx::query(&format!("PRAGMA table_info({table})"))
            .fetch_all(&self.pool)
            .await?;
        for row in rows {
            let name: String = row.try_get("name")?;
            if name == column {
                return Ok(true);
            }
        }
        Ok(false)
    }

    async fn add_column(&self, m: &ColumnMigration) -> Result<(), BootError> {
        let ddl = format!(
            "ALTER TABLE {} ADD COLUMN {} {}",
            m.table, m.column, m.definition
        );
        sqlx::query(&ddl).execute(&self.pool).await?;
        Ok(())
    }

    pub async fn table_names(&self) -> Result<Vec<String>, BootError> {
        let names: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(names.into_iter().map(|(n,)| n).collect())
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<DbUser>, BootError> {
        let user = sqlx::query_as::<_, DbUser>(
            r#"SELECT id, username, full_name, password_hash, is_admin, created_at
               FROM users WHERE username = ?"#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    /// Insert a new account. Returns the row id.
    pub async fn insert(&self, user: NewUser) -> Result<i64, BootError> {
        let is_admin_i = if user.is_admin { 1 } else { 0 };
        let res = sqlx::query(
            r#"INSERT INTO users (username, password_hash, is_admin, created_at)
               VALUES (?, ?, ?, ?)"#,
        )
        .bind(user.username)
        .bind(user.password_hash)
        .bind(is_admin_i)
        .bind(Utc::now().naive_utc())
        .execute(&self.pool)
        .await?;
        Ok(res.last_insert_rowid())
    }

    pub async fn count_by_username(&self, username: &str) -> Result<i64, BootError> {
        let rec: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE username = ?")
            .bind(username)
            .fetch_one(&self.pool)
            .await?;
        Ok(rec.0)
    }

    /// Close the pool so the file is released before permissions change or handover.
    pub async fn close(self) {
        self.pool.close().await;
    }
}
