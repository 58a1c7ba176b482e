use crate::autostart::Autostart;
use crate::config::{load_app_config, AppConfig};
use crate::document::PdfEngine;
use crate::error::AppResult;
use crate::session::{FileSessionStore, SESSION_FILE_NAME};

pub(super) struct AppBootstrap {
    pub(super) config: AppConfig,
    pub(super) store: FileSessionStore,
    pub(super) autostart: Option<Autostart>,
    pub(super) engine: PdfEngine,
}

pub(super) fn bootstrap_app_runtime() -> AppResult<AppBootstrap> {
    let config = load_app_config();
    tracing::info!(
        session_minutes = config.session_minutes,
        register_autostart = config.register_autostart,
        fullscreen = config.fullscreen,
        "loaded app config"
    );

    let store = initialize_session_store();
    tracing::info!(path = %store.path().display(), "using session state file");

    let engine = PdfEngine::spawn()?;

    Ok(AppBootstrap {
        autostart: initialize_autostart(&config),
        config,
        store,
        engine,
    })
}

fn initialize_session_store() -> FileSessionStore {
    match FileSessionStore::with_default_path() {
        Ok(store) => store,
        Err(err) => {
            // Sessions still work for this run; they just won't survive a restart.
            let fallback = std::env::temp_dir()
                .join(crate::config::APP_DIR)
                .join(SESSION_FILE_NAME);
            tracing::warn!(
                ?err,
                fallback = %fallback.display(),
                "session data directory unavailable; using temp dir"
            );
            FileSessionStore::with_path(fallback)
        }
    }
}

fn initialize_autostart(config: &AppConfig) -> Option<Autostart> {
    if !config.register_autostart {
        tracing::info!("autostart registration disabled by config");
        return None;
    }
    match Autostart::for_current_platform() {
        Ok(autostart) => Some(autostart),
        Err(err) => {
            tracing::warn!(?err, "autostart unavailable on this system");
            None
        }
    }
}
