/// A key press with its modifier state, as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyChord {
    pub key: String,
    pub ctrl: bool,
    pub shift: bool,
}

impl KeyChord {
    #[must_use]
    pub fn new(key: impl Into<String>, ctrl: bool, shift: bool) -> Self {
        Self {
            key: key.into(),
            ctrl,
            shift,
        }
    }

    /// Parse a chord written as `ctrl+shift+i`, `F12`, `ctrl+u`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let mut ctrl = false;
        let mut shift = false;
        let mut key = None;
        for part in raw.split('+').map(str::trim) {
            match part.to_ascii_lowercase().as_str() {
                "" => return None,
                "ctrl" | "control" => ctrl = true,
                "shift" => shift = true,
                _ if key.is_none() => key = Some(part.to_string()),
                _ => return None,
            }
        }
        key.map(|key| Self { key, ctrl, shift })
    }

    /// Developer-tool and view-source shortcuts blocked during an attempt.
    #[must_use]
    pub fn is_restricted(&self) -> bool {
        let key = self.key.as_str();
        let inspector = key.eq_ignore_ascii_case("i") || key.eq_ignore_ascii_case("c");
        key.eq_ignore_ascii_case("f12")
            || (self.ctrl && self.shift && inspector)
            || (self.ctrl && key.eq_ignore_ascii_case("u"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn devtools_shortcuts_are_restricted() {
        for raw in ["F12", "ctrl+shift+I", "ctrl+shift+c", "ctrl+u"] {
            let chord = KeyChord::parse(raw).unwrap();
            assert!(chord.is_restricted(), "{raw} should be restricted");
        }
    }

    #[test]
    fn ordinary_keys_pass() {
        for raw in ["a", "ctrl+c", "shift+i", "F5"] {
            let chord = KeyChord::parse(raw).unwrap();
            assert!(!chord.is_restricted(), "{raw} should be allowed");
        }
    }

    #[test]
    fn malformed_chords_are_rejected() {
        assert_eq!(KeyChord::parse("ctrl+"), None);
        assert_eq!(KeyChord::parse("ctrl+a+b"), None);
        assert_eq!(KeyChord::parse("shift"), None);
    }
}
