use std::fmt;

/// A key press, independent of the windowing toolkit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyPress {
    Char(char),
    Escape,
    Space,
    ArrowLeft,
    ArrowRight,
    /// Anything else, carried by name for reporting.
    Other(String),
}

impl fmt::Display for KeyPress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyPress::Char(c) => write!(f, "'{c}'"),
            KeyPress::Escape => f.write_str("Escape"),
            KeyPress::Space => f.write_str("Space"),
            KeyPress::ArrowLeft => f.write_str("ArrowLeft"),
            KeyPress::ArrowRight => f.write_str("ArrowRight"),
            KeyPress::Other(name) => f.write_str(name),
        }
    }
}

/// Transport commands reachable from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKey {
    Quit,
    TogglePause,
    StepForward,
    StepBack,
}

impl TransportKey {
    /// Fixed bindings: `q`/Esc quit, Space toggles, `.`/Right steps forward,
    /// `,`/Left steps back.
    pub fn from_key(key: &KeyPress) -> Option<Self> {
        match key {
            KeyPress::Char('q') | KeyPress::Escape => Some(TransportKey::Quit),
            KeyPress::Space | KeyPress::Char(' ') => Some(TransportKey::TogglePause),
            KeyPress::Char('.') | KeyPress::ArrowRight => Some(TransportKey::StepForward),
            KeyPress::Char(',') | KeyPress::ArrowLeft => Some(TransportKey::StepBack),
            _ => None,
        }
    }
}

/// Keyboard shortcut legend shown in the viewer.
pub struct Shortcuts;

impl Shortcuts {
    pub fn legend() -> &'static [(&'static str, &'static str)] {
        &[
            ("Space", "Play / Pause"),
            (". / Right", "Next frame"),
            (", / Left", "Previous frame"),
            ("q / Esc", "Quit"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quit_bindings() {
        assert_eq!(TransportKey::from_key(&KeyPress::Char('q')), Some(TransportKey::Quit));
        assert_eq!(TransportKey::from_key(&KeyPress::Escape), Some(TransportKey::Quit));
        // only lowercase q quits
        assert_eq!(TransportKey::from_key(&KeyPress::Char('Q')), None);
    }

    #[test]
    fn toggle_binding() {
        assert_eq!(
            TransportKey::from_key(&KeyPress::Space),
            Some(TransportKey::TogglePause)
        );
    }

    #[test]
    fn step_bindings() {
        for key in [KeyPress::Char('.'), KeyPress::ArrowRight] {
            assert_eq!(TransportKey::from_key(&key), Some(TransportKey::StepForward));
        }
        for key in [KeyPress::Char(','), KeyPress::ArrowLeft] {
            assert_eq!(TransportKey::from_key(&key), Some(TransportKey::StepBack));
        }
    }

    #[test]
    fn unbound_keys() {
        for key in [
            KeyPress::Char('x'),
            KeyPress::Char('>'),
            KeyPress::Other("F1".into()),
        ] {
            assert_eq!(TransportKey::from_key(&key), None, "{key}");
        }
    }

    #[test]
    fn legend_covers_every_command() {
        assert_eq!(Shortcuts::legend().len(), 4);
    }
}
