#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutKey {
    Character(char),
    Left,
    Right,
    PageUp,
    PageDown,
    Space,
    Backspace,
    Escape,
    F4,
    F11,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShortcutModifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl ShortcutModifiers {
    pub const fn new(ctrl: bool, shift: bool, alt: bool) -> Self {
        Self { ctrl, shift, alt }
    }

    const fn none(self) -> bool {
        !self.ctrl && !self.alt
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputContext {
    /// A reading session is running.
    pub locked: bool,
    pub has_document: bool,
    pub fullscreen: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    NextPage,
    PrevPage,
    SelectDocument,
    ToggleFullscreen,
    LeaveFullscreen,
    CloseRequested,
    /// Swallowed because the session lock forbids it.
    Suppressed,
}

fn resolve_navigation_shortcut(
    key: ShortcutKey,
    modifiers: ShortcutModifiers,
) -> Option<ShortcutAction> {
    if !modifiers.none() {
        return None;
    }
    match key {
        ShortcutKey::Right
        | ShortcutKey::PageDown
        | ShortcutKey::Character('j')
        | ShortcutKey::Character('l') => Some(ShortcutAction::NextPage),
        ShortcutKey::Space if !modifiers.shift => Some(ShortcutAction::NextPage),
        ShortcutKey::Space => Some(ShortcutAction::PrevPage),
        ShortcutKey::Left
        | ShortcutKey::PageUp
        | ShortcutKey::Backspace
        | ShortcutKey::Character('k')
        | ShortcutKey::Character('h') => Some(ShortcutAction::PrevPage),
        _ => None,
    }
}

fn resolve_window_shortcut(
    key: ShortcutKey,
    modifiers: ShortcutModifiers,
    fullscreen: bool,
) -> Option<ShortcutAction> {
    match (key, modifiers.ctrl, modifiers.alt) {
        (ShortcutKey::Escape, false, false) if fullscreen => Some(ShortcutAction::LeaveFullscreen),
        (ShortcutKey::Character('o'), true, false) => Some(ShortcutAction::SelectDocument),
        (ShortcutKey::Character('w' | 'q'), true, false) => Some(ShortcutAction::CloseRequested),
        (ShortcutKey::F4, false, true) => Some(ShortcutAction::CloseRequested),
        (ShortcutKey::Escape, false, false) => Some(ShortcutAction::CloseRequested),
        (ShortcutKey::F11, false, false) => Some(ShortcutAction::ToggleFullscreen),
        _ => None,
    }
}

fn locked_out(action: ShortcutAction) -> bool {
    matches!(
        action,
        ShortcutAction::SelectDocument
            | ShortcutAction::ToggleFullscreen
            | ShortcutAction::LeaveFullscreen
            | ShortcutAction::CloseRequested
    )
}

pub fn resolve_shortcut(
    key: ShortcutKey,
    modifiers: ShortcutModifiers,
    context: InputContext,
) -> Option<ShortcutAction> {
    if let Some(action) = resolve_window_shortcut(key, modifiers, context.fullscreen) {
        if context.locked && locked_out(action) {
            return Some(ShortcutAction::Suppressed);
        }
        return Some(action);
    }

    if context.has_document {
        return resolve_navigation_shortcut(key, modifiers);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_MODIFIERS: ShortcutModifiers = ShortcutModifiers::new(false, false, false);
    const CTRL: ShortcutModifiers = ShortcutModifiers::new(true, false, false);
    const ALT: ShortcutModifiers = ShortcutModifiers::new(false, false, true);

    fn reading(locked: bool) -> InputContext {
        InputContext {
            locked,
            has_document: true,
            fullscreen: false,
        }
    }

    #[test]
    fn close_shortcuts_are_suppressed_while_locked() {
        for (key, modifiers) in [
            (ShortcutKey::Character('w'), CTRL),
            (ShortcutKey::Character('q'), CTRL),
            (ShortcutKey::F4, ALT),
            (ShortcutKey::Escape, NO_MODIFIERS),
        ] {
            assert_eq!(
                resolve_shortcut(key, modifiers, reading(true)),
                Some(ShortcutAction::Suppressed),
                "{key:?} should be swallowed"
            );
            assert_eq!(
                resolve_shortcut(key, modifiers, reading(false)),
                Some(ShortcutAction::CloseRequested)
            );
        }
    }

    #[test]
    fn escape_leaves_fullscreen_before_closing() {
        let fullscreen = InputContext {
            fullscreen: true,
            ..reading(false)
        };
        assert_eq!(
            resolve_shortcut(ShortcutKey::Escape, NO_MODIFIERS, fullscreen),
            Some(ShortcutAction::LeaveFullscreen)
        );
        assert_eq!(
            resolve_shortcut(ShortcutKey::Escape, NO_MODIFIERS, reading(false)),
            Some(ShortcutAction::CloseRequested)
        );
        assert_eq!(
            resolve_shortcut(
                ShortcutKey::Escape,
                NO_MODIFIERS,
                InputContext {
                    locked: true,
                    ..fullscreen
                }
            ),
            Some(ShortcutAction::Suppressed)
        );
        assert_eq!(
            resolve_shortcut(ShortcutKey::Character('w'), CTRL, fullscreen),
            Some(ShortcutAction::CloseRequested)
        );
    }

    #[test]
    fn select_and_fullscreen_are_suppressed_while_locked() {
        assert_eq!(
            resolve_shortcut(ShortcutKey::Character('o'), CTRL, reading(true)),
            Some(ShortcutAction::Suppressed)
        );
        assert_eq!(
            resolve_shortcut(ShortcutKey::F11, NO_MODIFIERS, reading(true)),
            Some(ShortcutAction::Suppressed)
        );
        assert_eq!(
            resolve_shortcut(ShortcutKey::Character('o'), CTRL, InputContext::default()),
            Some(ShortcutAction::SelectDocument)
        );
    }

    #[test]
    fn navigation_stays_available_while_locked() {
        assert_eq!(
            resolve_shortcut(ShortcutKey::Right, NO_MODIFIERS, reading(true)),
            Some(ShortcutAction::NextPage)
        );
        assert_eq!(
            resolve_shortcut(ShortcutKey::PageUp, NO_MODIFIERS, reading(true)),
            Some(ShortcutAction::PrevPage)
        );
        assert_eq!(
            resolve_shortcut(
                ShortcutKey::Space,
                ShortcutModifiers::new(false, true, false),
                reading(true)
            ),
            Some(ShortcutAction::PrevPage)
        );
    }

    #[test]
    fn navigation_requires_a_document() {
        assert_eq!(
            resolve_shortcut(ShortcutKey::Right, NO_MODIFIERS, InputContext::default()),
            None
        );
    }

    #[test]
    fn modified_letters_do_not_navigate() {
        assert_eq!(
            resolve_shortcut(ShortcutKey::Character('j'), CTRL, reading(false)),
            None
        );
        assert_eq!(
            resolve_shortcut(ShortcutKey::Character('w'), NO_MODIFIERS, reading(false)),
            None
        );
    }
}
