//! Bootstrap configuration, read once from the environment.
//!
//! Sources, lowest to highest precedence:
//! - built-in defaults (`Config::default`)
//! - process environment (optionally pre-populated from `.env` by `dotenvy`)
//!
//! Every recognized key is a plain string, so values are taken verbatim
//! rather than through `figment::providers::Env`, which would parse `007`
//! as a number or `[1,2]` as a list.

use crate::error::BootError;
use figment::{Figment, providers::Serialized};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const DEFAULT_USERNAME: &str = "admin";
pub const DEFAULT_PASSWORD: &str = "2103";
pub const DEFAULT_INIT_COMMAND: &str = "python init_db.py";
pub const DEFAULT_DATABASE_FILE: &str = "instance/database.db";

/// Environment keys understood by the bootstrap. Anything else in the
/// environment is ignored.
const ENV_KEYS: &[&str] = &[
    "APP_ROOT",
    "DATABASE_FILE",
    "STORAGE_DIR",
    "INIT_COMMAND",
    "DEFAULT_USERNAME",
    "DEFAULT_PASSWORD",
    "LOGLEVEL",
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub app_root: PathBuf,
    /// Relative paths resolve against `app_root`.
    pub database_file: PathBuf,
    pub storage_dir: Option<PathBuf>,
    /// Whitespace-separated argv of the dedicated init routine. Empty disables it.
    pub init_command: String,
    pub default_username: String,
    pub default_password: String,
    pub loglevel: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_root: PathBuf::from("."),
            database_file: PathBuf::from(DEFAULT_DATABASE_FILE),
            storage_dir: None,
            init_command: DEFAULT_INIT_COMMAND.to_string(),
            default_username: DEFAULT_USERNAME.to_string(),
            default_password: DEFAULT_PASSWORD.to_string(),
            loglevel: "info".to_string(),
        }
    }
}

/// Credentials of the administrative account seeded on first boot.
#[derive(Clone, PartialEq, Eq)]
pub struct SeedAccount {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for SeedAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeedAccount")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Recognized keys present in the environment, lowercased, values untouched.
/// Non-unicode values are skipped.
fn env_strings() -> Serialized<BTreeMap<String, String>> {
    let raw = ENV_KEYS
        .iter()
        .filter_map(|key| {
            std::env::var(key)
                .ok()
                .map(|value| (key.to_lowercase(), value))
        })
        .collect();
    Serialized::defaults(raw)
}

impl Config {
    /// Extract from defaults merged with the process environment.
    pub fn from_env() -> Result<Self, BootError> {
        Self::figment().extract().map_err(BootError::from)
    }

    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default())).merge(env_strings())
    }

    /// Config rooted at `app_root`, all other fields at their defaults.
    pub fn with_root(app_root: impl Into<PathBuf>) -> Self {
        Self {
            app_root: app_root.into(),
            ..Self::default()
        }
    }

    fn resolve(&self, p: &Path) -> PathBuf {
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.app_root.join(p)
        }
    }

    pub fn database_path(&self) -> PathBuf {
        self.resolve(&self.database_file)
    }

    /// Directory holding the database file; target of the write probe.
    pub fn instance_dir(&self) -> PathBuf {
        self.database_path()
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.app_root.clone())
    }

    /// Every directory that must exist before the schema is touched.
    pub fn required_dirs(&self) -> Vec<PathBuf> {
        let mut dirs = vec![
            self.instance_dir(),
            self.app_root.join("uploads"),
            self.app_root.join("static").join("media"),
        ];
        if let Some(storage) = self.storage_dir.as_deref() {
            dirs.push(self.resolve(storage));
        }
        dirs
    }

    /// Argv of the primary init phase, `None` when disabled.
    pub fn init_argv(&self) -> Option<Vec<String>> {
        let argv: Vec<String> = self
            .init_command
            .split_whitespace()
            .map(str::to_string)
            .collect();
        (!argv.is_empty()).then_some(argv)
    }

    pub fn seed_account(&self) -> SeedAccount {
        SeedAccount {
            username: self.default_username.clone(),
            password: self.default_password.clone(),
        }
    }
}
