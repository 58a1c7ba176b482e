pub mod app;
pub mod autostart;
mod config;
pub mod document;
pub mod error;
pub mod input;
pub mod logging;
pub mod notification;
pub mod session;
pub mod state;
pub mod ui;
pub use error::{AppError, AppResult};

/// Entrypoint used by the binary.
pub fn run() -> AppResult<()> {
    logging::init();
    tracing::info!("starting pagelock");

    let mut app = app::App::new();
    app.start()?;

    tracing::info!("event loop finished");
    Ok(())
}
