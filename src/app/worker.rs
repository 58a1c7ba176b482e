use std::sync::mpsc;
use std::time::Duration;

pub(super) const RENDER_RESULT_POLL_INTERVAL: Duration = Duration::from_millis(16);

/// Runs `work` off the main loop and hands its result back to `on_result` on
/// the GTK thread. If the worker panics the callback never fires.
pub(super) fn spawn_worker_action<T, W, H>(work: W, on_result: H)
where
    T: Send + 'static,
    W: FnOnce() -> T + Send + 'static,
    H: FnOnce(T) + 'static,
{
    let (tx, rx) = mpsc::channel::<T>();
    std::thread::spawn(move || {
        let _ = tx.send(work());
    });

    let mut on_result = Some(on_result);
    gtk4::glib::timeout_add_local(RENDER_RESULT_POLL_INTERVAL, move || match rx.try_recv() {
        Ok(result) => {
            if let Some(on_result) = on_result.take() {
                on_result(result);
            }
            gtk4::glib::ControlFlow::Break
        }
        Err(mpsc::TryRecvError::Empty) => gtk4::glib::ControlFlow::Continue,
        Err(mpsc::TryRecvError::Disconnected) => {
            tracing::warn!("worker exited without producing a result");
            gtk4::glib::ControlFlow::Break
        }
    });
}
