use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigPathError;

pub type SessionResult<T> = std::result::Result<T, SessionError>;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("cannot start a session on a document without pages")]
    EmptyDocument,
    #[error("session ended at {end_time}")]
    AlreadyExpired { end_time: chrono::DateTime<chrono::Utc> },
    #[error("no active reading session")]
    NoActiveSession,
    #[error("failed to resolve state directory: {0}")]
    StateDirectory(#[from] ConfigPathError),
    #[error("failed to write session state: {path}")]
    WriteState { path: PathBuf, source: io::Error },
    #[error("failed to remove session state: {path}")]
    ClearState { path: PathBuf, source: io::Error },
    #[error("failed to encode session state")]
    Encode(#[from] serde_json::Error),
}
