//! Login-item registration so an interrupted session comes back after a reboot.

mod entry;
mod error;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::APP_DIR;

pub use error::{AutostartError, AutostartResult};

const LAUNCH_AGENT_LABEL: &str = "com.github.pagelock";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Backend {
    DesktopEntry { path: PathBuf },
    LaunchAgent { path: PathBuf },
    #[cfg(target_os = "windows")]
    Registry,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Autostart {
    backend: Backend,
}

impl Autostart {
    pub fn for_current_platform() -> AutostartResult<Self> {
        #[cfg(target_os = "windows")]
        {
            Ok(Self {
                backend: Backend::Registry,
            })
        }
        #[cfg(target_os = "macos")]
        {
            let home = std::env::var_os("HOME")
                .map(PathBuf::from)
                .ok_or(crate::config::ConfigPathError::MissingHomeDirectory)?;
            Ok(Self::launch_agent_in(home.join("Library").join("LaunchAgents")))
        }
        #[cfg(not(any(target_os = "windows", target_os = "macos")))]
        {
            let (xdg_config_home, home) = crate::config::config_env_dirs();
            let root = crate::config::config_root(xdg_config_home.as_deref(), home.as_deref())?;
            Ok(Self::desktop_entry_in(root.join("autostart")))
        }
    }

    pub fn desktop_entry_in(dir: impl AsRef<Path>) -> Self {
        Self {
            backend: Backend::DesktopEntry {
                path: dir.as_ref().join(format!("{APP_DIR}.desktop")),
            },
        }
    }

    pub fn launch_agent_in(dir: impl AsRef<Path>) -> Self {
        Self {
            backend: Backend::LaunchAgent {
                path: dir.as_ref().join(format!("{LAUNCH_AGENT_LABEL}.plist")),
            },
        }
    }

    /// Registers the running executable, with no arguments.
    pub fn register(&self) -> AutostartResult<()> {
        let exe = std::env::current_exe().map_err(AutostartError::CurrentExe)?;
        self.register_executable(&exe)
    }

    pub fn register_executable(&self, exe: &Path) -> AutostartResult<()> {
        match &self.backend {
            Backend::DesktopEntry { path } => {
                write_entry(path, &entry::desktop_entry_contents(APP_DIR, exe))?
            }
            Backend::LaunchAgent { path } => {
                write_entry(path, &entry::launch_agent_plist(LAUNCH_AGENT_LABEL, exe))?
            }
            #[cfg(target_os = "windows")]
            Backend::Registry => registry::set_run_value(APP_DIR, entry::registry_command(exe))?,
        }
        tracing::info!(exe = %exe.display(), "registered for autostart");
        Ok(())
    }

    pub fn unregister(&self) -> AutostartResult<()> {
        match &self.backend {
            Backend::DesktopEntry { path } | Backend::LaunchAgent { path } => {
                remove_entry(path)?
            }
            #[cfg(target_os = "windows")]
            Backend::Registry => registry::delete_run_value(APP_DIR)?,
        }
        tracing::info!("removed autostart registration");
        Ok(())
    }

    pub fn is_registered(&self) -> bool {
        match &self.backend {
            Backend::DesktopEntry { path } | Backend::LaunchAgent { path } => path.exists(),
            #[cfg(target_os = "windows")]
            Backend::Registry => registry::has_run_value(APP_DIR),
        }
    }
}

fn write_entry(path: &Path, contents: &str) -> AutostartResult<()> {
    let write = || -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, contents)
    };
    write().map_err(|source| AutostartError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn remove_entry(path: &Path) -> AutostartResult<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(AutostartError::Remove {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(target_os = "windows")]
mod registry {
    use winreg::enums::{HKEY_CURRENT_USER, KEY_QUERY_VALUE, KEY_SET_VALUE};
    use winreg::RegKey;

    use super::{AutostartError, AutostartResult};

    const RUN_KEY: &str = "Software\\Microsoft\\Windows\\CurrentVersion\\Run";

    fn run_key() -> AutostartResult<RegKey> {
        RegKey::predef(HKEY_CURRENT_USER)
            .open_subkey_with_flags(RUN_KEY, KEY_SET_VALUE | KEY_QUERY_VALUE)
            .map_err(AutostartError::Registry)
    }

    pub(super) fn set_run_value(name: &str, command: String) -> AutostartResult<()> {
        run_key()?
            .set_value(name, &command)
            .map_err(AutostartError::Registry)
    }

    pub(super) fn delete_run_value(name: &str) -> AutostartResult<()> {
        match run_key()?.delete_value(name) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(AutostartError::Registry(err)),
        }
    }

    pub(super) fn has_run_value(name: &str) -> bool {
        run_key()
            .ok()
            .and_then(|key| key.get_value::<String, _>(name).ok())
            .is_some()
    }
}
