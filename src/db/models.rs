use chrono::NaiveDateTime;
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct DbUser {
    pub id: i64,
    pub username: String,
    pub full_name: Option<String>,
    pub password_hash: String,
    pub is_admin: i64,
    pub created_at: NaiveDateTime,
}

impl DbUser {
    pub fn is_admin(&self) -> bool {
        self.is_admin != 0
    }
}

/// Insert payload; the password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub is_admin: bool,
}
