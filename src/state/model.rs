#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReaderState {
    /// No session; a document may or may not be shown.
    #[default]
    Idle,
    /// A timed session is running and the window is locked.
    Session,
    /// The last session ended normally; the document stays on screen.
    Finished,
}

impl ReaderState {
    pub const fn is_locked(self) -> bool {
        matches!(self, Self::Session)
    }
}
