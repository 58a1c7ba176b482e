mod window_runtime;

pub(crate) use window_runtime::{set_fullscreen, toggle_fullscreen, ToastRuntime};
