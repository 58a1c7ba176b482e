mod controller;
mod countdown;
mod error;
mod record;
mod store;

pub use controller::{ActiveSession, EndReason, PageTurn, Recovery, SessionController, Tick};
pub use countdown::{format_remaining, Countdown};
pub use error::{SessionError, SessionResult};
pub use record::SessionRecord;
pub use store::{FileSessionStore, SessionStore, SESSION_FILE_NAME};
