use crate::input::{ShortcutKey, ShortcutModifiers};

fn shortcut_character_from_keycode(keycode: u32) -> Option<char> {
    // GDK reports XKB keycodes (evdev + 8) on both X11 and Wayland. Falling back
    // to them keeps letter shortcuts working under non-Latin layouts.
    match keycode {
        43 => Some('h'),
        44 => Some('j'),
        45 => Some('k'),
        46 => Some('l'),
        32 => Some('o'),
        24 => Some('q'),
        25 => Some('w'),
        _ => None,
    }
}

pub(super) fn normalize_shortcut_key(key: gtk4::gdk::Key, keycode: u32) -> Option<ShortcutKey> {
    match key {
        gtk4::gdk::Key::Left | gtk4::gdk::Key::KP_Left => return Some(ShortcutKey::Left),
        gtk4::gdk::Key::Right | gtk4::gdk::Key::KP_Right => return Some(ShortcutKey::Right),
        gtk4::gdk::Key::Page_Up | gtk4::gdk::Key::KP_Page_Up => return Some(ShortcutKey::PageUp),
        gtk4::gdk::Key::Page_Down | gtk4::gdk::Key::KP_Page_Down => {
            return Some(ShortcutKey::PageDown)
        }
        gtk4::gdk::Key::space | gtk4::gdk::Key::KP_Space => return Some(ShortcutKey::Space),
        gtk4::gdk::Key::BackSpace => return Some(ShortcutKey::Backspace),
        gtk4::gdk::Key::Escape => return Some(ShortcutKey::Escape),
        gtk4::gdk::Key::F4 => return Some(ShortcutKey::F4),
        gtk4::gdk::Key::F11 => return Some(ShortcutKey::F11),
        _ => {}
    }

    let keyval_shortcut = key
        .to_unicode()
        .filter(|character| !character.is_control())
        .map(|character| character.to_ascii_lowercase());
    match keyval_shortcut {
        Some(character) if character.is_ascii() => Some(ShortcutKey::Character(character)),
        Some(_) | None => shortcut_character_from_keycode(keycode).map(ShortcutKey::Character),
    }
}

pub(super) fn shortcut_modifiers(modifier: gtk4::gdk::ModifierType) -> ShortcutModifiers {
    ShortcutModifiers::new(
        modifier.contains(gtk4::gdk::ModifierType::CONTROL_MASK),
        modifier.contains(gtk4::gdk::ModifierType::SHIFT_MASK),
        modifier.contains(gtk4::gdk::ModifierType::ALT_MASK),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_shortcut_key_falls_back_to_hardware_keycode_for_letters() {
        assert_eq!(
            normalize_shortcut_key(gtk4::gdk::Key::Hangul, 44),
            Some(ShortcutKey::Character('j'))
        );
        assert_eq!(
            normalize_shortcut_key(gtk4::gdk::Key::Hangul, 25),
            Some(ShortcutKey::Character('w'))
        );
        assert_eq!(normalize_shortcut_key(gtk4::gdk::Key::Hangul, 999), None);
    }

    #[test]
    fn normalize_shortcut_key_maps_navigation_and_window_keys() {
        assert_eq!(
            normalize_shortcut_key(gtk4::gdk::Key::Page_Down, 0),
            Some(ShortcutKey::PageDown)
        );
        assert_eq!(
            normalize_shortcut_key(gtk4::gdk::Key::KP_Left, 0),
            Some(ShortcutKey::Left)
        );
        assert_eq!(
            normalize_shortcut_key(gtk4::gdk::Key::F4, 0),
            Some(ShortcutKey::F4)
        );
        assert_eq!(
            normalize_shortcut_key(gtk4::gdk::Key::W, 0),
            Some(ShortcutKey::Character('w'))
        );
    }

    #[test]
    fn shortcut_modifiers_reads_ctrl_shift_and_alt() {
        let modifiers = shortcut_modifiers(
            gtk4::gdk::ModifierType::CONTROL_MASK | gtk4::gdk::ModifierType::ALT_MASK,
        );
        assert_eq!(modifiers, ShortcutModifiers::new(true, false, true));
    }
}
