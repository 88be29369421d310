use crate::config::SeedAccount;
use crate::db::{NewUser, UserStorage};
use crate::error::BootError;
use crate::service::password::hash_password;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Created(i64),
    AlreadyExists,
}

/// Ensure the administrative account named by `seed` exists. An existing
/// account is never modified.
pub async fn seed_default_account(
    storage: &UserStorage,
    seed: SeedAccount,
) -> Result<SeedOutcome, BootError> {
    if storage.find_by_username(&seed.username).await?.is_some() {
        info!(username = %seed.username, "default user already exists");
        return Ok(SeedOutcome::AlreadyExists);
    }

    let id = storage
        .insert(NewUser {
            password_hash: hash_password(&seed.password),
            username: seed.username.clone(),
            is_admin: true,
        })
        .await?;
    info!(username = %seed.username, id, admin = true, "default user created");
    Ok(SeedOutcome::Created(id))
}

/// Create a single account, refusing to touch an existing one.
pub async fn add_user(
    storage: &UserStorage,
    username: &str,
    password: &str,
    is_admin: bool,
) -> Result<i64, BootError> {
    if storage.find_by_username(username).await?.is_some() {
        return Err(BootError::UserExists(username.to_string()));
    }
    let id = storage
        .insert(NewUser {
            username: username.to_string(),
            password_hash: hash_password(password),
            is_admin,
        })
        .await?;
    info!(username, id, admin = is_admin, "user created");
    Ok(id)
}
