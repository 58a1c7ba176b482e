use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use crate::error::AppResult;
use crate::state::{ReaderEvent, StateMachine};
use crate::ui::{LAYOUT_TOKENS, READER_COLORS};
use gtk4::prelude::*;
use gtk4::{Application, ApplicationWindow};

mod bootstrap;
mod dialog;
mod input_bridge;
mod layout;
mod reader_runtime;
mod runtime_css;
mod runtime_support;
mod worker;

use self::bootstrap::*;
use self::layout::build_reader_ui;
use self::reader_runtime::{ReaderRuntime, ReaderRuntimeParts};
use self::runtime_css::install_runtime_css;

const APPLICATION_ID: &str = "com.github.pagelock.Pagelock";
const UI_TICK_INTERVAL: Duration = Duration::from_secs(1);

pub struct App {
    machine: StateMachine,
}

impl App {
    pub fn new() -> Self {
        Self {
            machine: StateMachine::new(),
        }
    }

    pub fn start(&mut self) -> AppResult<()> {
        let bootstrap = bootstrap_app_runtime()?;

        tracing::info!(event = "start", from = ?self.machine.state());
        let transition = self.machine.transition(ReaderEvent::Start)?;
        tracing::debug!(?transition, "reader ready");

        let shared_machine = Rc::new(RefCell::new(std::mem::take(&mut self.machine)));
        let machine_for_activate = shared_machine.clone();
        let pending_bootstrap = RefCell::new(Some(bootstrap));
        let activate_once = Rc::new(Cell::new(false));

        tracing::info!("starting gtk runtime");
        let application = Application::new(
            Some(APPLICATION_ID),
            gtk4::gio::ApplicationFlags::empty(),
        );

        application.connect_activate(move |app| {
            if activate_once.replace(true) {
                tracing::debug!("duplicate activate; raising the reader window");
                if let Some(window) = app.active_window() {
                    window.present();
                }
                return;
            }
            let Some(bootstrap) = pending_bootstrap.borrow_mut().take() else {
                return;
            };

            let style_tokens = LAYOUT_TOKENS;
            install_runtime_css(style_tokens, &READER_COLORS);

            let window = ApplicationWindow::new(app);
            window.add_css_class("pagelock-root");
            window.set_title(Some("pagelock"));
            window.set_default_size(
                style_tokens.window_default_width,
                style_tokens.window_default_height,
            );
            let view = build_reader_ui(&window, style_tokens);

            let runtime = ReaderRuntime::new(ReaderRuntimeParts {
                window: window.clone(),
                view,
                style_tokens,
                config: bootstrap.config,
                autostart: bootstrap.autostart,
                machine: machine_for_activate.clone(),
                store: bootstrap.store,
                engine: bootstrap.engine,
            });
            runtime.connect_signals();
            runtime.restore_session();
            runtime.refresh_controls();

            {
                let runtime = runtime.clone();
                gtk4::glib::timeout_add_local(UI_TICK_INTERVAL, move || {
                    runtime.on_tick();
                    gtk4::glib::ControlFlow::Continue
                });
            }

            tracing::info!("presenting reader window");
            window.present();
        });

        // Pass only argv[0] so GTK does not try to parse anything else.
        let gtk_args: Vec<String> = std::env::args().take(1).collect();
        application.run_with_args(&gtk_args);

        self.machine = std::mem::take(&mut *shared_machine.borrow_mut());
        Ok(())
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
