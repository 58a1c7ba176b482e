use super::model::ReaderState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderEvent {
    Start,
    BeginSession,
    ResumeSession,
    TimerExpired,
    DocumentFinished,
    Abort,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateTransition {
    pub from: ReaderState,
    pub event: ReaderEvent,
    pub to: ReaderState,
}

impl StateTransition {
    pub const fn new(from: ReaderState, event: ReaderEvent, to: ReaderState) -> Self {
        Self { from, event, to }
    }
}
