use sqlx::Error as SqlxError;
use std::path::PathBuf;
use thiserror::Error as ThisError;

/// Exit status for directory preparation failures (EX_CANTCREAT).
pub const EXIT_LAYOUT: i32 = 73;
/// Exit status when the fallback schema phase fails (EX_SOFTWARE).
pub const EXIT_SCHEMA: i32 = 70;
/// Exit status for unreadable configuration (EX_CONFIG).
pub const EXIT_CONFIG: i32 = 78;
/// Exit status when the server command cannot be executed.
pub const EXIT_HANDOVER: i32 = 126;

#[derive(Debug, ThisError)]
pub enum BootError {
    #[error("failed to create directory {path}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("path exists but is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("Database error: {0}")]
    DatabaseError(#[from] SqlxError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed password hash")]
    MalformedHash,

    #[error("user '{0}' already exists")]
    UserExists(String),

    #[error("schema initialization failed")]
    Schema(#[source] Box<BootError>),

    #[error("empty server command")]
    EmptyCommand,

    #[error("failed to execute '{program}'")]
    Handover {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

impl From<figment::Error> for BootError {
    fn from(e: figment::Error) -> Self {
        BootError::Config(Box::new(e))
    }
}

impl BootError {
    /// Process exit status used when this error ends the bootstrap.
    pub fn exit_code(&self) -> i32 {
        match self {
            BootError::CreateDir { .. } | BootError::NotADirectory(_) => EXIT_LAYOUT,
            BootError::Schema(_) => EXIT_SCHEMA,
            BootError::Config(_) => EXIT_CONFIG,
            BootError::Handover { .. } | BootError::EmptyCommand => EXIT_HANDOVER,
            BootError::UserExists(_) => 1,
            BootError::DatabaseError(_) | BootError::Io(_) | BootError::MalformedHash => 1,
        }
    }

    /// Render the error with its full `source()` chain, one cause per line.
    pub fn chain(&self) -> String {
        let mut out = self.to_string();
        let mut cur = std::error::Error::source(self);
        while let Some(cause) = cur {
            out.push_str("\n  caused by: ");
            out.push_str(&cause.to_string());
            cur = cause.source();
        }
        out
    }
}
