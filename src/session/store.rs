use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::{app_data_dir, DataDirEnv, DataDirFlavor, APP_DIR};

use super::error::{SessionError, SessionResult};
use super::record::SessionRecord;

pub const SESSION_FILE_NAME: &str = "session.json";
const TEMP_SUFFIX: &str = "tmp";

/// Persistence seam for the single session record.
pub trait SessionStore {
    /// Missing, unreadable or corrupt state all read as "no session".
    fn load(&self) -> Option<SessionRecord>;
    fn save(&self, record: &SessionRecord) -> SessionResult<()>;
    /// Removing state that does not exist is not an error.
    fn clear(&self) -> SessionResult<()>;
}

#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn with_default_path() -> SessionResult<Self> {
        let dir = app_data_dir(APP_DIR, DataDirFlavor::current(), &DataDirEnv::from_env())?;
        Ok(Self::with_path(dir.join(SESSION_FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension(TEMP_SUFFIX)
    }

    fn write_atomically(&self, contents: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let temp = self.temp_path();
        fs::write(&temp, contents)?;
        fs::rename(&temp, &self.path)
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Option<SessionRecord> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no saved session");
                return None;
            }
            Err(err) => {
                tracing::warn!(path = %self.path.display(), ?err, "failed to read session state");
                return None;
            }
        };

        match serde_json::from_str::<SessionRecord>(&contents) {
            Ok(record) => Some(record),
            Err(err) => {
                tracing::warn!(path = %self.path.display(), ?err, "ignoring corrupt session state");
                None
            }
        }
    }

    fn save(&self, record: &SessionRecord) -> SessionResult<()> {
        let contents = serde_json::to_string_pretty(record)?;
        self.write_atomically(&contents)
            .map_err(|source| SessionError::WriteState {
                path: self.path.clone(),
                source,
            })?;
        tracing::trace!(page = record.page_num, "session state saved");
        Ok(())
    }

    fn clear(&self) -> SessionResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "session state cleared");
                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(SessionError::ClearState {
                path: self.path.clone(),
                source,
            }),
        }
    }
}
