use super::model::ReaderState;

/// What the reader window lets the user do in a given state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlLock {
    pub close_allowed: bool,
    pub select_allowed: bool,
    pub fullscreen_toggle_allowed: bool,
}

impl ControlLock {
    pub const fn for_state(state: ReaderState) -> Self {
        let unlocked = !state.is_locked();
        Self {
            close_allowed: unlocked,
            select_allowed: unlocked,
            fullscreen_toggle_allowed: unlocked,
        }
    }

    pub const fn is_locked(&self) -> bool {
        !self.close_allowed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_locks_close_select_and_fullscreen() {
        let lock = ControlLock::for_state(ReaderState::Session);
        assert!(lock.is_locked());
        assert!(!lock.close_allowed);
        assert!(!lock.select_allowed);
        assert!(!lock.fullscreen_toggle_allowed);
    }

    #[test]
    fn idle_and_finished_unlock_everything() {
        for state in [ReaderState::Idle, ReaderState::Finished] {
            let lock = ControlLock::for_state(state);
            assert!(!lock.is_locked());
            assert!(lock.close_allowed && lock.select_allowed && lock.fullscreen_toggle_allowed);
        }
    }
}
