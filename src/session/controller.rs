use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};

use super::countdown::Countdown;
use super::error::{SessionError, SessionResult};
use super::record::SessionRecord;
use super::store::SessionStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveSession {
    record: SessionRecord,
    total_pages: u32,
}

impl ActiveSession {
    pub fn page(&self) -> u32 {
        self.record.page_num
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn countdown(&self) -> Countdown {
        Countdown::until(self.record.end_time)
    }

    fn last_page(&self) -> u32 {
        self.total_pages.saturating_sub(1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recovery {
    None,
    /// The saved session ran out while the app was not running; its state is gone.
    Expired(SessionRecord),
    Resumable(SessionRecord),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageTurn {
    Moved(u32),
    AtFirstPage,
    AtLastPage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Idle,
    Running { remaining: Duration },
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    TimerExpired,
    DocumentFinished,
    Aborted,
}

/// Owns the session lifecycle and the store that persists it.
#[derive(Debug)]
pub struct SessionController<S: SessionStore> {
    store: S,
    active: Option<ActiveSession>,
}

impl<S: SessionStore> SessionController<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            active: None,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn active(&self) -> Option<&ActiveSession> {
        self.active.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn recover(&self, now: DateTime<Utc>) -> SessionResult<Recovery> {
        let Some(record) = self.store.load() else {
            return Ok(Recovery::None);
        };

        if record.is_expired(now) {
            tracing::info!(
                path = %record.pdf_path.display(),
                end_time = %record.end_time,
                "discarding expired session"
            );
            self.store.clear()?;
            return Ok(Recovery::Expired(record));
        }

        Ok(Recovery::Resumable(record))
    }

    pub fn begin(
        &mut self,
        pdf_path: impl Into<PathBuf>,
        total_pages: u32,
        duration: chrono::Duration,
        now: DateTime<Utc>,
    ) -> SessionResult<&ActiveSession> {
        if total_pages == 0 {
            return Err(SessionError::EmptyDocument);
        }
        if let Some(previous) = self.active.as_ref() {
            tracing::warn!(
                path = %previous.record.pdf_path.display(),
                "replacing an active session"
            );
        }

        let record = SessionRecord::new(pdf_path, 0, now + duration);
        self.store.save(&record)?;
        tracing::info!(
            path = %record.pdf_path.display(),
            total_pages,
            end_time = %record.end_time,
            "session started"
        );
        Ok(self.active.insert(ActiveSession {
            record,
            total_pages,
        }))
    }

    pub fn resume(
        &mut self,
        mut record: SessionRecord,
        total_pages: u32,
        now: DateTime<Utc>,
    ) -> SessionResult<&ActiveSession> {
        if total_pages == 0 {
            return Err(SessionError::EmptyDocument);
        }
        if record.is_expired(now) {
            self.store.clear()?;
            return Err(SessionError::AlreadyExpired {
                end_time: record.end_time,
            });
        }

        let last_page = total_pages - 1;
        if record.page_num > last_page {
            tracing::warn!(
                saved = record.page_num,
                last_page,
                "saved page beyond document end; clamping"
            );
            record.page_num = last_page;
        }
        if let Err(err) = self.store.save(&record) {
            tracing::warn!(?err, "cannot persist resumed session; discarding saved state");
            if let Err(clear_err) = self.store.clear() {
                tracing::warn!(?clear_err, "failed to discard saved session");
            }
            return Err(err);
        }
        tracing::info!(
            path = %record.pdf_path.display(),
            page = record.page_num,
            end_time = %record.end_time,
            "session resumed"
        );
        Ok(self.active.insert(ActiveSession {
            record,
            total_pages,
        }))
    }

    pub fn next_page(&mut self) -> SessionResult<PageTurn> {
        let active = self.active.as_ref().ok_or(SessionError::NoActiveSession)?;
        if active.page() >= active.last_page() {
            return Ok(PageTurn::AtLastPage);
        }
        let next = active.page() + 1;
        self.move_to(next)
    }

    pub fn prev_page(&mut self) -> SessionResult<PageTurn> {
        let active = self.active.as_ref().ok_or(SessionError::NoActiveSession)?;
        if active.page() == 0 {
            return Ok(PageTurn::AtFirstPage);
        }
        let previous = active.page() - 1;
        self.move_to(previous)
    }

    // Persist before committing so memory never runs ahead of the state file.
    fn move_to(&mut self, page: u32) -> SessionResult<PageTurn> {
        let active = self.active.as_mut().ok_or(SessionError::NoActiveSession)?;
        let mut record = active.record.clone();
        record.page_num = page;
        self.store.save(&record)?;
        active.record = record;
        Ok(PageTurn::Moved(page))
    }

    pub fn tick(&mut self, now: DateTime<Utc>) -> SessionResult<Tick> {
        let Some(countdown) = self.active.as_ref().map(ActiveSession::countdown) else {
            return Ok(Tick::Idle);
        };

        if countdown.is_expired(now) {
            self.finish(EndReason::TimerExpired)?;
            return Ok(Tick::Expired);
        }

        Ok(Tick::Running {
            remaining: countdown.remaining(now),
        })
    }

    /// Ends the session and clears its persisted state. Only the first call
    /// for a session returns `true`; later calls are no-ops.
    pub fn finish(&mut self, reason: EndReason) -> SessionResult<bool> {
        let Some(active) = self.active.take() else {
            tracing::debug!(?reason, "finish requested without an active session");
            return Ok(false);
        };

        tracing::info!(
            ?reason,
            path = %active.record.pdf_path.display(),
            page = active.record.page_num,
            "session ended"
        );
        self.store.clear()?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::cell::{Cell, RefCell};

    #[derive(Debug, Default)]
    struct MemoryStore {
        record: RefCell<Option<SessionRecord>>,
        saves: Cell<usize>,
        clears: Cell<usize>,
        fail_saves: Cell<bool>,
    }

    impl MemoryStore {
        fn with_record(record: SessionRecord) -> Self {
            let store = Self::default();
            store.record.replace(Some(record));
            store
        }

        fn saved(&self) -> Option<SessionRecord> {
            self.record.borrow().clone()
        }
    }

    impl SessionStore for MemoryStore {
        fn load(&self) -> Option<SessionRecord> {
            self.saved()
        }

        fn save(&self, record: &SessionRecord) -> SessionResult<()> {
            if self.fail_saves.get() {
                return Err(SessionError::WriteState {
                    path: PathBuf::from("/memory"),
                    source: std::io::Error::other("disk full"),
                });
            }
            self.saves.set(self.saves.get() + 1);
            self.record.replace(Some(record.clone()));
            Ok(())
        }

        fn clear(&self) -> SessionResult<()> {
            self.clears.set(self.clears.get() + 1);
            self.record.replace(None);
            Ok(())
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 10, 0, 0).unwrap()
    }

    fn started(total_pages: u32) -> SessionController<MemoryStore> {
        let mut controller = SessionController::new(MemoryStore::default());
        controller
            .begin("/books/a.pdf", total_pages, chrono::Duration::minutes(30), now())
            .expect("session should start");
        controller
    }

    #[test]
    fn begin_rejects_documents_without_pages() {
        let mut controller = SessionController::new(MemoryStore::default());
        let err = controller
            .begin("/books/empty.pdf", 0, chrono::Duration::minutes(30), now())
            .expect_err("zero pages should be rejected");

        assert!(matches!(err, SessionError::EmptyDocument));
        assert!(!controller.is_active());
        assert!(controller.store().saved().is_none());
    }

    #[test]
    fn begin_persists_first_page_and_deadline() {
        let controller = started(5);
        let saved = controller.store().saved().expect("record should be saved");

        assert_eq!(saved.page_num, 0);
        assert_eq!(saved.pdf_path, PathBuf::from("/books/a.pdf"));
        assert_eq!(saved.end_time, now() + chrono::Duration::minutes(30));
    }

    #[test]
    fn page_index_stays_within_document_bounds() {
        let mut controller = started(3);

        assert_eq!(controller.prev_page().unwrap(), PageTurn::AtFirstPage);
        assert_eq!(controller.next_page().unwrap(), PageTurn::Moved(1));
        assert_eq!(controller.next_page().unwrap(), PageTurn::Moved(2));
        assert_eq!(controller.next_page().unwrap(), PageTurn::AtLastPage);
        assert_eq!(controller.active().unwrap().page(), 2);
        assert_eq!(controller.prev_page().unwrap(), PageTurn::Moved(1));
        assert_eq!(controller.prev_page().unwrap(), PageTurn::Moved(0));
        assert_eq!(controller.prev_page().unwrap(), PageTurn::AtFirstPage);
    }

    #[test]
    fn single_page_document_never_moves() {
        let mut controller = started(1);
        assert_eq!(controller.next_page().unwrap(), PageTurn::AtLastPage);
        assert_eq!(controller.prev_page().unwrap(), PageTurn::AtFirstPage);
    }

    #[test]
    fn saved_state_tracks_most_recent_page() {
        let mut controller = started(10);
        for _ in 0..4 {
            controller.next_page().unwrap();
        }
        controller.prev_page().unwrap();

        assert_eq!(controller.store().saved().unwrap().page_num, 3);
        assert_eq!(controller.active().unwrap().page(), 3);
    }

    #[test]
    fn failed_save_leaves_displayed_page_unchanged() {
        let mut controller = started(4);
        controller.store().fail_saves.set(true);

        assert!(controller.next_page().is_err());
        assert_eq!(controller.active().unwrap().page(), 0);
        assert_eq!(controller.store().saved().unwrap().page_num, 0);
    }

    #[test]
    fn recover_discards_expired_session() {
        let record = SessionRecord::new("/books/a.pdf", 4, now() - chrono::Duration::seconds(1));
        let controller = SessionController::new(MemoryStore::with_record(record.clone()));

        assert_eq!(controller.recover(now()).unwrap(), Recovery::Expired(record));
        assert!(controller.store().saved().is_none());
        assert!(!controller.is_active());
    }

    #[test]
    fn recover_offers_unexpired_session() {
        let record = SessionRecord::new("/books/a.pdf", 4, now() + chrono::Duration::minutes(5));
        let controller = SessionController::new(MemoryStore::with_record(record.clone()));

        assert_eq!(controller.recover(now()).unwrap(), Recovery::Resumable(record));
        assert_eq!(controller.store().clears.get(), 0);
    }

    #[test]
    fn recover_without_state_reports_none() {
        let controller = SessionController::new(MemoryStore::default());
        assert_eq!(controller.recover(now()).unwrap(), Recovery::None);
    }

    #[test]
    fn resume_clamps_saved_page_to_document() {
        let record = SessionRecord::new("/books/a.pdf", 40, now() + chrono::Duration::minutes(5));
        let mut controller = SessionController::new(MemoryStore::with_record(record.clone()));

        let active = controller.resume(record, 12, now()).unwrap();
        assert_eq!(active.page(), 11);
        assert_eq!(controller.store().saved().unwrap().page_num, 11);
    }

    #[test]
    fn resume_refuses_expired_record_and_clears_state() {
        let record = SessionRecord::new("/books/a.pdf", 1, now());
        let mut controller = SessionController::new(MemoryStore::with_record(record.clone()));

        let err = controller.resume(record, 3, now()).unwrap_err();
        assert!(matches!(err, SessionError::AlreadyExpired { .. }));
        assert!(!controller.is_active());
        assert!(controller.store().saved().is_none());
    }

    #[test]
    fn resume_that_cannot_save_discards_the_record() {
        let record = SessionRecord::new("/books/a.pdf", 2, now() + chrono::Duration::minutes(5));
        let mut controller = SessionController::new(MemoryStore::with_record(record.clone()));
        controller.store().fail_saves.set(true);

        let err = controller.resume(record, 6, now()).unwrap_err();
        assert!(matches!(err, SessionError::WriteState { .. }));
        assert!(!controller.is_active());
        assert!(controller.store().saved().is_none());
        assert_eq!(controller.store().clears.get(), 1);

        // A later abort has nothing left to clear, and the next start finds no session.
        assert!(!controller.finish(EndReason::Aborted).unwrap());
        assert_eq!(controller.recover(now()).unwrap(), Recovery::None);
    }

    #[test]
    fn tick_counts_down_then_expires_once() {
        let mut controller = started(3);

        assert_eq!(
            controller.tick(now() + chrono::Duration::minutes(29)).unwrap(),
            Tick::Running {
                remaining: Duration::from_secs(60)
            }
        );
        let deadline = now() + chrono::Duration::minutes(30);
        assert_eq!(controller.tick(deadline).unwrap(), Tick::Expired);
        assert_eq!(controller.tick(deadline).unwrap(), Tick::Idle);
        assert_eq!(controller.store().clears.get(), 1);
        assert!(controller.store().saved().is_none());
    }

    #[test]
    fn finish_clears_state_exactly_once() {
        let mut controller = started(3);

        assert!(controller.finish(EndReason::DocumentFinished).unwrap());
        assert!(!controller.finish(EndReason::TimerExpired).unwrap());
        assert!(!controller.finish(EndReason::Aborted).unwrap());
        assert_eq!(controller.store().clears.get(), 1);
        assert_eq!(
            controller.tick(now() + chrono::Duration::hours(1)).unwrap(),
            Tick::Idle
        );
    }

    #[test]
    fn navigation_without_session_is_an_error() {
        let mut controller = SessionController::new(MemoryStore::default());
        assert!(matches!(
            controller.next_page(),
            Err(SessionError::NoActiveSession)
        ));
        assert!(matches!(
            controller.prev_page(),
            Err(SessionError::NoActiveSession)
        ));
    }
}
