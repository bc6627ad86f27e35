//! Error types and exit codes for notevault.

use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

/// Exit codes used by the command-line driver.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const NOTE_NOT_FOUND: i32 = 2;
    pub const PATH_CONFLICT: i32 = 3;
    pub const CONFIG_ERROR: i32 = 5;
}

/// Main error type for vault operations.
#[derive(Error, Debug)]
pub enum VaultError {
    #[error("Note not found: {0}")]
    NoteNotFound(Uuid),

    #[error("No note cached at path: {0}")]
    PathNotFound(PathBuf),

    #[error("Path {path} is already used by note {owner}")]
    PathConflict { path: PathBuf, owner: Uuid },

    #[error("Invalid vault path: {0}")]
    InvalidVaultPath(PathBuf),

    #[error("Note path must be relative and stay inside the vault: {0}")]
    InvalidNotePath(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Sync watcher is already running")]
    WatcherAlreadyRunning,

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML serialize error: {0}")]
    YamlSerialize(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Glob pattern error: {0}")]
    GlobPattern(#[from] glob::PatternError),

    #[error("{0}")]
    Other(String),
}

impl VaultError {
    /// Returns the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            VaultError::NoteNotFound(_) | VaultError::PathNotFound(_) => exit_code::NOTE_NOT_FOUND,
            VaultError::PathConflict { .. } => exit_code::PATH_CONFLICT,
            VaultError::ConfigError(_) | VaultError::TomlParse(_) => exit_code::CONFIG_ERROR,
            _ => exit_code::GENERAL_ERROR,
        }
    }

    /// Whether this error means the requested note does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, VaultError::NoteNotFound(_) | VaultError::PathNotFound(_))
    }
}

/// Result type alias for vault operations.
pub type Result<T> = std::result::Result<T, VaultError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(VaultError::NoteNotFound(Uuid::nil()).exit_code(), 2);
        assert_eq!(
            VaultError::PathConflict {
                path: PathBuf::from("a.md"),
                owner: Uuid::nil(),
            }
            .exit_code(),
            3
        );
        assert_eq!(VaultError::ConfigError("bad".into()).exit_code(), 5);
        assert_eq!(VaultError::Other("x".into()).exit_code(), 1);
    }

    #[test]
    fn test_not_found_classification() {
        assert!(VaultError::PathNotFound(PathBuf::from("x.md")).is_not_found());
        assert!(!VaultError::WatcherAlreadyRunning.is_not_found());
    }
}
