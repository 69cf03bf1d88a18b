use crate::notify::Severity;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GhcloneError {
    #[error("invalid repository reference: {0}")]
    InvalidReference(String),

    #[error("already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("clone failed: {0}")]
    CloneFailed(String),

    #[error("could not create worktree: {0}")]
    WorktreeCreationFailed(String),

    #[error("could not create fork: {0}")]
    ForkCreationFailed(String),

    #[error("`{0}` is required and was not found in PATH")]
    MissingDependency(String),

    #[error("repository has no `origin` remote")]
    NoOriginRemote,

    #[error("origin is not a recognizable GitHub repository: {0}")]
    UnparsableOrigin(String),

    #[error("no repository reference given")]
    EmptyInput,

    #[error("not a git repository: {0}")]
    NotARepo(String),

    #[error("cancelled")]
    Cancelled,

    #[error("lock error: {0}")]
    Lock(String),

    #[error("git error: {0}")]
    Git(#[from] git2::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(String),
}

impl GhcloneError {
    pub fn severity(&self) -> Severity {
        match self {
            GhcloneError::Cancelled | GhcloneError::EmptyInput => Severity::Info,
            GhcloneError::AlreadyExists(_) => Severity::Warn,
            _ => Severity::Error,
        }
    }
}

pub type Result<T> = std::result::Result<T, GhcloneError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn existing_target_is_a_warning_naming_the_path() {
        let err = GhcloneError::AlreadyExists(PathBuf::from("/tmp/git/user---repo"));
        assert_eq!(err.severity(), Severity::Warn);
        assert!(err.to_string().contains("/tmp/git/user---repo"));
    }

    #[test]
    fn subprocess_failures_are_errors() {
        assert_eq!(
            GhcloneError::CloneFailed("boom".into()).severity(),
            Severity::Error
        );
        assert_eq!(GhcloneError::NoOriginRemote.severity(), Severity::Error);
        assert_eq!(GhcloneError::Cancelled.severity(), Severity::Info);
    }
}
