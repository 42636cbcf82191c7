use winit::keyboard::{Key, NamedKey};

use crate::playback::keys::KeyPress;

/// Map a winit logical key onto the playback key model.
pub fn key_press(key: &Key) -> KeyPress {
    match key {
        Key::Named(NamedKey::Escape) => KeyPress::Escape,
        Key::Named(NamedKey::Space) => KeyPress::Space,
        Key::Named(NamedKey::ArrowLeft) => KeyPress::ArrowLeft,
        Key::Named(NamedKey::ArrowRight) => KeyPress::ArrowRight,
        Key::Character(text) => {
            let mut chars = text.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyPress::Char(c),
                _ => KeyPress::Other(text.to_string()),
            }
        }
        Key::Named(named) => KeyPress::Other(format!("{named:?}")),
        other => KeyPress::Other(format!("{other:?}")),
    }
}
