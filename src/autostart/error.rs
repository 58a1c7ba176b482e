use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigPathError;

pub type AutostartResult<T> = std::result::Result<T, AutostartError>;

#[derive(Debug, Error)]
pub enum AutostartError {
    #[error("failed to resolve autostart location: {0}")]
    Location(#[from] ConfigPathError),
    #[error("failed to resolve current executable")]
    CurrentExe(#[source] io::Error),
    #[error("failed to write autostart entry: {path}")]
    Write { path: PathBuf, source: io::Error },
    #[error("failed to remove autostart entry: {path}")]
    Remove { path: PathBuf, source: io::Error },
    #[error("failed to update login items registry key")]
    Registry(#[source] io::Error),
}
