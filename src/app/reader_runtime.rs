use std::cell::{Cell, RefCell};
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use chrono::Utc;
use gtk4::prelude::*;
use gtk4::{ApplicationWindow, FileChooserNative};

use crate::autostart::Autostart;
use crate::config::AppConfig;
use crate::document::{DocumentResult, PdfDocument, PdfEngine, RenderOutcome, RenderedPage};
use crate::error::AppError;
use crate::input::{resolve_shortcut, InputContext, ShortcutAction};
use crate::notification;
use crate::session::{
    format_remaining, ActiveSession, EndReason, FileSessionStore, PageTurn, Recovery,
    SessionController, SessionError, SessionRecord, SessionStore, Tick,
};
use crate::state::{ReaderEvent, ReaderState, StateMachine};
use crate::ui::StyleTokens;

use super::dialog::{choose_pdf, show_error_dialog};
use super::input_bridge::{normalize_shortcut_key, shortcut_modifiers};
use super::layout::{page_indicator, render_target_width, step_page, PageStep, ReaderView};
use super::runtime_support::{set_fullscreen, toggle_fullscreen, ToastRuntime};
use super::worker::spawn_worker_action;

const COUNTDOWN_IDLE_TEXT: &str = "--:--";
const COUNTDOWN_DONE_TEXT: &str = "Done";

pub(super) struct ReaderRuntimeParts {
    pub(super) window: ApplicationWindow,
    pub(super) view: ReaderView,
    pub(super) style_tokens: StyleTokens,
    pub(super) config: AppConfig,
    pub(super) autostart: Option<Autostart>,
    pub(super) machine: Rc<RefCell<StateMachine>>,
    pub(super) store: FileSessionStore,
    pub(super) engine: PdfEngine,
}

/// Everything the reader window needs on the GTK thread. Session state is
/// owned by the controller; this type only reflects it onto widgets.
pub(super) struct ReaderRuntime {
    window: ApplicationWindow,
    view: ReaderView,
    toast: ToastRuntime,
    style_tokens: StyleTokens,
    config: AppConfig,
    autostart: Option<Autostart>,
    machine: Rc<RefCell<StateMachine>>,
    sessions: RefCell<SessionController<FileSessionStore>>,
    engine: PdfEngine,
    document: RefCell<Option<PdfDocument>>,
    // Page shown while no session runs.
    browse_page: Cell<u32>,
    render_sequence: Cell<u64>,
    requested_render: Cell<Option<(u32, u32)>>,
    shown_page: Cell<Option<u32>>,
    file_chooser: RefCell<Option<FileChooserNative>>,
}

impl ReaderRuntime {
    pub(super) fn new(parts: ReaderRuntimeParts) -> Rc<Self> {
        let toast = ToastRuntime::new(&parts.view.toast_label);
        Rc::new(Self {
            window: parts.window,
            view: parts.view,
            toast,
            style_tokens: parts.style_tokens,
            config: parts.config,
            autostart: parts.autostart,
            machine: parts.machine,
            sessions: RefCell::new(SessionController::new(parts.store)),
            engine: parts.engine,
            document: RefCell::new(None),
            browse_page: Cell::new(0),
            render_sequence: Cell::new(0),
            requested_render: Cell::new(None),
            shown_page: Cell::new(None),
            file_chooser: RefCell::new(None),
        })
    }

    pub(super) fn connect_signals(self: &Rc<Self>) {
        {
            let runtime = self.clone();
            self.view
                .select_button
                .connect_clicked(move |_| runtime.select_document());
        }
        {
            let runtime = self.clone();
            self.view
                .prev_button
                .connect_clicked(move |_| runtime.turn_page(PageStep::Backward));
        }
        {
            let runtime = self.clone();
            self.view
                .next_button
                .connect_clicked(move |_| runtime.turn_page(PageStep::Forward));
        }
        {
            let runtime = self.clone();
            self.window
                .connect_close_request(move |_| runtime.handle_close_request());
        }
        {
            let runtime = self.clone();
            self.window.connect_fullscreened_notify(move |window| {
                if runtime.should_hold_fullscreen() && !window.is_fullscreen() {
                    tracing::debug!("restoring fullscreen while session is locked");
                    window.fullscreen();
                }
            });
        }

        let key_controller = gtk4::EventControllerKey::new();
        key_controller.set_propagation_phase(gtk4::PropagationPhase::Capture);
        let runtime = self.clone();
        key_controller.connect_key_pressed(move |_, key, keycode, modifier| {
            let Some(shortcut_key) = normalize_shortcut_key(key, keycode) else {
                return gtk4::glib::Propagation::Proceed;
            };
            let shortcut = resolve_shortcut(
                shortcut_key,
                shortcut_modifiers(modifier),
                runtime.input_context(),
            );
            let Some(action) = shortcut else {
                return gtk4::glib::Propagation::Proceed;
            };
            tracing::debug!(?action, "shortcut resolved");
            runtime.handle_shortcut(action);
            gtk4::glib::Propagation::Stop
        });
        self.window.add_controller(key_controller);
    }

    fn handle_shortcut(self: &Rc<Self>, action: ShortcutAction) {
        match action {
            ShortcutAction::NextPage => self.turn_page(PageStep::Forward),
            ShortcutAction::PrevPage => self.turn_page(PageStep::Backward),
            ShortcutAction::SelectDocument => self.select_document(),
            ShortcutAction::ToggleFullscreen => toggle_fullscreen(&self.window),
            ShortcutAction::LeaveFullscreen => set_fullscreen(&self.window, false),
            ShortcutAction::CloseRequested => self.window.close(),
            ShortcutAction::Suppressed => self.show_locked_toast(),
        }
    }

    fn input_context(&self) -> InputContext {
        InputContext {
            locked: self.machine.borrow().state().is_locked(),
            has_document: self.document.borrow().is_some(),
            fullscreen: self.window.is_fullscreen(),
        }
    }

    fn should_hold_fullscreen(&self) -> bool {
        self.config.fullscreen && !self.machine.borrow().controls().fullscreen_toggle_allowed
    }

    fn remaining(&self) -> Option<Duration> {
        self.sessions
            .borrow()
            .active()
            .map(|active| active.countdown().remaining(Utc::now()))
    }

    fn show_locked_toast(&self) {
        self.toast
            .locked(self.remaining(), self.style_tokens.toast_duration_ms);
    }

    fn handle_close_request(&self) -> gtk4::glib::Propagation {
        if self.machine.borrow().controls().close_allowed {
            tracing::info!("window close accepted");
            return gtk4::glib::Propagation::Proceed;
        }
        tracing::info!("window close refused while session is running");
        self.show_locked_toast();
        gtk4::glib::Propagation::Stop
    }

    /// Current page and page count, from the session when one runs.
    fn position(&self) -> Option<(u32, u32)> {
        if let Some(active) = self.sessions.borrow().active() {
            return Some((active.page(), active.total_pages()));
        }
        self.document
            .borrow()
            .as_ref()
            .map(|document| (self.browse_page.get(), document.page_count()))
    }

    pub(super) fn refresh_controls(&self) {
        let state = self.machine.borrow().state();
        let controls = self.machine.borrow().controls();
        let session_running = self.sessions.borrow().is_active();
        let position = self.position();

        self.view.select_button.set_sensitive(controls.select_allowed);
        self.window.set_deletable(controls.close_allowed);

        let (can_go_back, can_go_forward) = match position {
            Some((page, total)) => (
                page > 0,
                // Next on the last page finishes the document.
                session_running || page + 1 < total,
            ),
            None => (false, false),
        };
        self.view.prev_button.set_sensitive(can_go_back);
        self.view.next_button.set_sensitive(can_go_forward);
        self.view.page_label.set_text(&page_indicator(position));

        let countdown = &self.view.countdown_label;
        match state {
            ReaderState::Session => {
                countdown.remove_css_class("finished");
                countdown.add_css_class("locked");
            }
            ReaderState::Finished => {
                countdown.remove_css_class("locked");
                countdown.add_css_class("finished");
                countdown.set_text(COUNTDOWN_DONE_TEXT);
            }
            ReaderState::Idle => {
                countdown.remove_css_class("locked");
                countdown.remove_css_class("finished");
                countdown.set_text(COUNTDOWN_IDLE_TEXT);
            }
        }
        if let Some(remaining) = self.remaining() {
            countdown.set_text(&format_remaining(remaining));
        }

        let has_document = position.is_some();
        self.view.placeholder.set_visible(!has_document);
        if !has_document {
            self.view.picture.set_visible(false);
        }
    }

    pub(super) fn restore_session(self: &Rc<Self>) {
        let recovery = self.sessions.borrow().recover(Utc::now());
        match recovery {
            Ok(Recovery::None) => tracing::info!("no saved session"),
            Ok(Recovery::Expired(record)) => {
                tracing::info!(path = %record.pdf_path().display(), "saved session already ended");
                self.unregister_autostart();
                self.toast.notify(
                    "Your previous reading session already ended.",
                    self.style_tokens.toast_duration_ms,
                );
            }
            Ok(Recovery::Resumable(record)) => self.resume_session(record),
            Err(err) => tracing::warn!(?err, "failed to inspect saved session"),
        }
    }

    fn resume_session(self: &Rc<Self>, record: SessionRecord) {
        let document = match self.engine.open(record.pdf_path()) {
            Ok(document) => document,
            Err(err) => {
                tracing::error!(?err, path = %record.pdf_path().display(), "cannot reopen saved session");
                show_error_dialog(
                    &self.window,
                    "Cannot resume reading session",
                    &err.user_message(),
                    self.style_tokens,
                );
                if let Err(err) = self.sessions.borrow().store().clear() {
                    tracing::warn!(?err, "failed to clear saved session");
                }
                self.unregister_autostart();
                return;
            }
        };

        let resumed = self
            .sessions
            .borrow_mut()
            .resume(record, document.page_count(), Utc::now())
            .map(ActiveSession::page);
        match resumed {
            Ok(page) => tracing::info!(page, "resuming saved session"),
            Err(SessionError::AlreadyExpired { end_time }) => {
                tracing::info!(%end_time, "saved session expired during startup");
                self.unregister_autostart();
                return;
            }
            Err(err) => {
                // Nothing became active, so `abort` will not unregister.
                self.unregister_autostart();
                self.abort(err.into());
                return;
            }
        }

        match self.machine.borrow_mut().transition(ReaderEvent::ResumeSession) {
            Ok(transition) => tracing::info!(?transition, "reader locked"),
            Err(err) => {
                tracing::error!(?err, "cannot enter resumed session");
                return;
            }
        }
        self.enter_session(document);
    }

    fn select_document(self: &Rc<Self>) {
        if !self.machine.borrow().controls().select_allowed {
            self.show_locked_toast();
            return;
        }
        let runtime = self.clone();
        let chooser = choose_pdf(&self.window, move |path| runtime.start_session(path));
        self.file_chooser.replace(Some(chooser));
    }

    fn start_session(self: &Rc<Self>, path: PathBuf) {
        self.file_chooser.replace(None);
        if !self.machine.borrow().can_transition(ReaderEvent::BeginSession) {
            tracing::warn!(path = %path.display(), "ignoring selection while a session runs");
            return;
        }

        let document = match self.engine.open(&path) {
            Ok(document) => document,
            Err(err) => {
                tracing::error!(?err, path = %path.display(), "cannot open selected pdf");
                show_error_dialog(
                    &self.window,
                    "Cannot open PDF",
                    &err.user_message(),
                    self.style_tokens,
                );
                return;
            }
        };

        let begun = self
            .sessions
            .borrow_mut()
            .begin(
                document.path(),
                document.page_count(),
                self.config.session_duration(),
                Utc::now(),
            )
            .map(|_| ());
        if let Err(err) = begun {
            self.abort(err.into());
            return;
        }
        match self.machine.borrow_mut().transition(ReaderEvent::BeginSession) {
            Ok(transition) => tracing::info!(?transition, "reader locked"),
            Err(err) => {
                tracing::error!(?err, "cannot enter new session");
                return;
            }
        }
        self.enter_session(document);
    }

    fn enter_session(self: &Rc<Self>, document: PdfDocument) {
        self.document.replace(Some(document));
        self.shown_page.set(None);
        if let Some(autostart) = self.autostart.as_ref() {
            if let Err(err) = autostart.register() {
                tracing::warn!(?err, "failed to register autostart");
            }
        }
        if self.config.fullscreen {
            set_fullscreen(&self.window, true);
        }
        self.refresh_controls();
        self.request_render();
    }

    fn turn_page(self: &Rc<Self>, step: PageStep) {
        if self.sessions.borrow().is_active() {
            let turn = {
                let mut sessions = self.sessions.borrow_mut();
                match step {
                    PageStep::Forward => sessions.next_page(),
                    PageStep::Backward => sessions.prev_page(),
                }
            };
            match turn {
                Ok(PageTurn::Moved(page)) => {
                    tracing::debug!(page, "page turned");
                    self.refresh_controls();
                    self.request_render();
                }
                Ok(PageTurn::AtLastPage) => self.end_session(EndReason::DocumentFinished),
                Ok(PageTurn::AtFirstPage) => {}
                Err(err) => self.abort(err.into()),
            }
            return;
        }

        let Some(total) = self.document.borrow().as_ref().map(PdfDocument::page_count) else {
            return;
        };
        if let Some(page) = step_page(self.browse_page.get(), total, step) {
            self.browse_page.set(page);
            self.refresh_controls();
            self.request_render();
        }
    }

    pub(super) fn on_tick(self: &Rc<Self>) {
        let page_before = self.sessions.borrow().active().map(ActiveSession::page);
        let tick = self.sessions.borrow_mut().tick(Utc::now());
        match tick {
            Ok(Tick::Idle) => {}
            Ok(Tick::Running { remaining }) => {
                self.view
                    .countdown_label
                    .set_text(&format_remaining(remaining));
            }
            Ok(Tick::Expired) => self.apply_session_end(EndReason::TimerExpired, page_before),
            Err(err) => {
                tracing::warn!(?err, "failed to clear state after expiry");
                if page_before.is_some() && !self.sessions.borrow().is_active() {
                    self.apply_session_end(EndReason::TimerExpired, page_before);
                }
            }
        }

        if self.document.borrow().is_some() {
            let wanted = self.position().map(|(page, _)| (page, self.target_width()));
            if wanted.is_some() && wanted != self.requested_render.get() {
                tracing::debug!(?wanted, "viewport changed; re-rendering");
                self.request_render();
            }
        }
    }

    fn end_session(&self, reason: EndReason) {
        let page_before = self.sessions.borrow().active().map(ActiveSession::page);
        let finished = self.sessions.borrow_mut().finish(reason);
        match finished {
            Ok(true) => self.apply_session_end(reason, page_before),
            Ok(false) => {}
            Err(err) => {
                tracing::warn!(?err, "failed to clear state at session end");
                self.apply_session_end(reason, page_before);
            }
        }
    }

    fn apply_session_end(&self, reason: EndReason, last_page: Option<u32>) {
        if let Some(page) = last_page {
            self.browse_page.set(page);
        }
        let event = match reason {
            EndReason::TimerExpired => ReaderEvent::TimerExpired,
            EndReason::DocumentFinished => ReaderEvent::DocumentFinished,
            EndReason::Aborted => ReaderEvent::Abort,
        };
        match self.machine.borrow_mut().transition(event) {
            Ok(transition) => tracing::info!(?transition, "reader unlocked"),
            Err(err) => tracing::warn!(?err, "session end did not change reader state"),
        }
        self.unregister_autostart();

        let message = match reason {
            EndReason::TimerExpired => Some("Time is up. The reader is unlocked."),
            EndReason::DocumentFinished => Some("You reached the end of the document."),
            EndReason::Aborted => None,
        };
        if let Some(message) = message {
            notification::send(message);
            self.toast.notify(message, self.style_tokens.toast_duration_ms);
        }
        self.refresh_controls();
    }

    /// Shows the error and tears down the session and document.
    fn abort(&self, err: AppError) {
        tracing::error!(%err, "aborting reading session");
        let message = match &err {
            AppError::Document(document_err) => document_err.user_message(),
            other => other.to_string(),
        };
        show_error_dialog(
            &self.window,
            "Reading session ended",
            &message,
            self.style_tokens,
        );

        self.end_session(EndReason::Aborted);
        self.document.replace(None);
        self.browse_page.set(0);
        self.shown_page.set(None);
        self.requested_render.set(None);
        // Retire whatever is queued for the old document.
        self.render_sequence
            .set(self.engine.next_ticket().sequence());
        self.view.picture.set_paintable(None::<&gtk4::gdk::Paintable>);
        self.refresh_controls();
    }

    fn unregister_autostart(&self) {
        if let Some(autostart) = self.autostart.as_ref() {
            if let Err(err) = autostart.unregister() {
                tracing::warn!(?err, "failed to remove autostart registration");
            }
        }
    }

    fn target_width(&self) -> u32 {
        let viewport_width = [
            self.view.scroller.width(),
            self.window.width(),
            self.style_tokens.window_default_width,
        ]
        .into_iter()
        .find(|width| *width > 0)
        .unwrap_or(self.style_tokens.window_default_width);
        render_target_width(
            viewport_width,
            self.window.scale_factor(),
            self.style_tokens.page_margin,
        )
    }

    fn request_render(self: &Rc<Self>) {
        let Some(document) = self.document.borrow().clone() else {
            return;
        };
        let Some((page, _)) = self.position() else {
            return;
        };
        let width = self.target_width();
        let ticket = self.engine.next_ticket();
        let sequence = ticket.sequence();
        self.render_sequence.set(sequence);
        self.requested_render.set(Some((page, width)));
        tracing::debug!(page, width, sequence, "rendering page");

        let engine = self.engine.clone();
        let runtime = self.clone();
        spawn_worker_action(
            move || engine.render(ticket, &document, page, width),
            move |result: DocumentResult<RenderOutcome>| runtime.on_render_result(sequence, result),
        );
    }

    fn on_render_result(&self, sequence: u64, result: DocumentResult<RenderOutcome>) {
        if sequence != self.render_sequence.get() {
            tracing::debug!(sequence, "dropping stale render");
            return;
        }
        match result {
            Ok(RenderOutcome::Rendered(rendered)) => self.show_page(rendered),
            Ok(RenderOutcome::Superseded) => tracing::debug!(sequence, "render superseded"),
            Err(err) => self.abort(err.into()),
        }
    }

    fn show_page(&self, rendered: RenderedPage) {
        let index = rendered.index;
        let (Ok(width), Ok(height)) = (
            i32::try_from(rendered.width()),
            i32::try_from(rendered.height()),
        ) else {
            tracing::warn!(index, "rendered page too large to display");
            return;
        };
        let stride = rendered.width() as usize * 4;
        let bytes = gtk4::glib::Bytes::from_owned(rendered.image.into_raw());
        let texture = gtk4::gdk::MemoryTexture::new(
            width,
            height,
            gtk4::gdk::MemoryFormat::R8g8b8a8,
            &bytes,
            stride,
        );

        let scale = self.window.scale_factor().max(1);
        let picture = &self.view.picture;
        picture.set_paintable(Some(&texture));
        picture.set_size_request(width / scale, height / scale);
        picture.set_visible(true);
        self.view.placeholder.set_visible(false);

        if self.shown_page.replace(Some(index)) != Some(index) {
            self.view.scroller.vadjustment().set_value(0.0);
        }
    }
}
