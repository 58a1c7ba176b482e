use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use gtk4::prelude::*;
use gtk4::{ApplicationWindow, Label};

use crate::session::format_remaining;

const LOCKED_TOAST_CLASS: &str = "locked";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ToastKind {
    Info,
    Locked,
}

/// Overlay label for short status messages. A newer toast cancels the hide
/// timer of the one it replaces.
#[derive(Clone)]
pub(crate) struct ToastRuntime {
    label: Label,
    generation: Rc<Cell<u64>>,
}

impl ToastRuntime {
    pub(crate) fn new(label: &Label) -> Self {
        Self {
            label: label.clone(),
            generation: Rc::new(Cell::new(0)),
        }
    }

    pub(crate) fn notify(&self, message: impl Into<String>, duration_ms: u32) {
        self.present(&message.into(), ToastKind::Info, duration_ms);
    }

    /// Tells the user a control is locked, with the time left when known.
    pub(crate) fn locked(&self, remaining: Option<Duration>, duration_ms: u32) {
        self.present(&locked_message(remaining), ToastKind::Locked, duration_ms);
    }

    fn present(&self, message: &str, kind: ToastKind, duration_ms: u32) {
        tracing::debug!(?kind, message, "showing toast");
        self.label.set_text(message);
        if kind == ToastKind::Locked {
            self.label.add_css_class(LOCKED_TOAST_CLASS);
        } else {
            self.label.remove_css_class(LOCKED_TOAST_CLASS);
        }
        self.label.set_visible(true);

        let generation = self.generation.get().wrapping_add(1);
        self.generation.set(generation);

        let label = self.label.clone();
        let current = self.generation.clone();
        gtk4::glib::timeout_add_local_once(
            Duration::from_millis(u64::from(duration_ms)),
            move || {
                if current.get() == generation {
                    label.set_visible(false);
                }
            },
        );
    }
}

pub(crate) fn locked_message(remaining: Option<Duration>) -> String {
    match remaining {
        Some(remaining) => format!("Locked: {} left", format_remaining(remaining)),
        None => "Locked until the session ends".to_string(),
    }
}

pub(crate) fn set_fullscreen(window: &ApplicationWindow, fullscreen: bool) {
    if window.is_fullscreen() == fullscreen {
        return;
    }
    tracing::debug!(fullscreen, "changing fullscreen state");
    if fullscreen {
        window.fullscreen();
    } else {
        window.unfullscreen();
    }
}

pub(crate) fn toggle_fullscreen(window: &ApplicationWindow) {
    set_fullscreen(window, !window.is_fullscreen());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locked_message_includes_time_left() {
        assert_eq!(
            locked_message(Some(Duration::from_secs(4 * 60 + 5))),
            "Locked: 04:05 left"
        );
        assert_eq!(
            locked_message(Some(Duration::from_millis(1_200))),
            "Locked: 00:02 left"
        );
        assert_eq!(locked_message(None), "Locked until the session ends");
    }
}
