use super::error::{StateError, StateResult};
use super::{event::StateTransition, ControlLock, ReaderEvent, ReaderState};

#[derive(Debug, Default)]
pub struct StateMachine {
    state: ReaderState,
}

impl StateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ReaderState {
        self.state
    }

    pub fn controls(&self) -> ControlLock {
        ControlLock::for_state(self.state)
    }

    pub fn can_transition(&self, event: ReaderEvent) -> bool {
        self.next_state(event).is_some()
    }

    pub fn next_state(&self, event: ReaderEvent) -> Option<ReaderState> {
        use ReaderEvent::*;
        match (self.state, event) {
            (ReaderState::Idle, Start) => Some(ReaderState::Idle),
            (ReaderState::Idle | ReaderState::Finished, BeginSession) => {
                Some(ReaderState::Session)
            }
            (ReaderState::Idle, ResumeSession) => Some(ReaderState::Session),
            (ReaderState::Session, TimerExpired | DocumentFinished) => {
                Some(ReaderState::Finished)
            }
            (ReaderState::Session, Abort) => Some(ReaderState::Idle),
            _ => None,
        }
    }

    /// Applies `event` and returns the transition that happened. A rejected
    /// event leaves the state untouched.
    pub fn transition(&mut self, event: ReaderEvent) -> StateResult<StateTransition> {
        tracing::debug!(from = ?self.state, event = ?event, "request state transition");
        let next = self.next_state(event).ok_or_else(|| {
            let from = self.state;
            tracing::warn!(from = ?from, event = ?event, "invalid state transition requested");
            StateError::InvalidStateTransition { from, event }
        })?;

        let record = StateTransition::new(self.state, event, next);
        self.state = next;
        Ok(record)
    }
}
