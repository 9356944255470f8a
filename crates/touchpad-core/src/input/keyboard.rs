//! Physical keyboard translation.
//!
//! Printable characters are forwarded as literal text so the host types
//! exactly what the user typed, whatever the host's keyboard layout.  A
//! short list of editing and navigation keys is forwarded as logical key
//! codes.  Everything else stays local.

use tracing::trace;

use crate::input::events::KeyEvent;
use crate::input::InputSink;
use crate::protocol::keys::LogicalKey;

/// What happened to a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Sent to the host; the local UI should not act on it.
    Forwarded,
    /// A mapped key held with shift: left for the local UI (text
    /// selection and the like) and not sent.
    PassThrough,
    /// Modifier chord, composition, unknown name or keyboard disabled.
    Ignored,
}

/// Translates physical key presses into key codes or text.
#[derive(Debug, Clone)]
pub struct KeyTranslator {
    enabled: bool,
}

impl Default for KeyTranslator {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl KeyTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Turns physical key capture on or off (the on-screen keyboard toggle).
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Translates one key press.
    pub fn key_event(&mut self, event: &KeyEvent, sink: &mut impl InputSink) -> KeyOutcome {
        if !self.enabled || event.ctrl || event.alt || event.composing {
            return KeyOutcome::Ignored;
        }
        if let Some(key) = LogicalKey::from_physical_name(&event.key) {
            if event.shift {
                return KeyOutcome::PassThrough;
            }
            sink.keyboard_key(key);
            return KeyOutcome::Forwarded;
        }
        if event.key.chars().count() == 1 {
            sink.keyboard_text(&event.key);
            return KeyOutcome::Forwarded;
        }
        trace!(key = %event.key, "dropping unmapped key");
        KeyOutcome::Ignored
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::MockInputSink;
    use mockall::predicate::eq;

    fn shifted(key: &str) -> KeyEvent {
        KeyEvent {
            shift: true,
            ..KeyEvent::plain(key)
        }
    }

    #[test]
    fn test_mapped_key_is_forwarded_as_code() {
        let mut keys = KeyTranslator::new();
        let mut sink = MockInputSink::new();
        sink.expect_keyboard_key()
            .with(eq(LogicalKey::Return))
            .times(1)
            .returning(|_| ());

        let outcome = keys.key_event(&KeyEvent::plain("Enter"), &mut sink);

        assert_eq!(outcome, KeyOutcome::Forwarded);
    }

    #[test]
    fn test_legacy_arrow_name_is_mapped() {
        let mut keys = KeyTranslator::new();
        let mut sink = MockInputSink::new();
        sink.expect_keyboard_key()
            .with(eq(LogicalKey::Left))
            .times(1)
            .returning(|_| ());
        keys.key_event(&KeyEvent::plain("Left"), &mut sink);
    }

    #[test]
    fn test_shifted_mapped_key_passes_through() {
        let mut keys = KeyTranslator::new();
        let mut sink = MockInputSink::new();
        sink.expect_keyboard_key().never();

        let outcome = keys.key_event(&shifted("ArrowRight"), &mut sink);

        assert_eq!(outcome, KeyOutcome::PassThrough);
    }

    #[test]
    fn test_shifted_character_is_forwarded_as_text() {
        let mut keys = KeyTranslator::new();
        let mut sink = MockInputSink::new();
        sink.expect_keyboard_text()
            .withf(|text| text == "A")
            .times(1)
            .returning(|_| ());
        assert_eq!(keys.key_event(&shifted("A"), &mut sink), KeyOutcome::Forwarded);
    }

    #[test]
    fn test_multibyte_character_is_text() {
        let mut keys = KeyTranslator::new();
        let mut sink = MockInputSink::new();
        sink.expect_keyboard_text()
            .withf(|text| text == "é")
            .times(1)
            .returning(|_| ());
        keys.key_event(&KeyEvent::plain("é"), &mut sink);
    }

    #[test]
    fn test_modifier_chords_and_composition_are_ignored() {
        let mut keys = KeyTranslator::new();
        let mut sink = MockInputSink::new();
        sink.expect_keyboard_text().never();
        sink.expect_keyboard_key().never();

        let ctrl = KeyEvent {
            ctrl: true,
            ..KeyEvent::plain("c")
        };
        let alt = KeyEvent {
            alt: true,
            ..KeyEvent::plain("Enter")
        };
        let composing = KeyEvent {
            composing: true,
            ..KeyEvent::plain("k")
        };
        for event in [ctrl, alt, composing] {
            assert_eq!(keys.key_event(&event, &mut sink), KeyOutcome::Ignored);
        }
    }

    #[test]
    fn test_unmapped_named_key_is_dropped() {
        let mut keys = KeyTranslator::new();
        let mut sink = MockInputSink::new();
        sink.expect_keyboard_text().never();
        sink.expect_keyboard_key().never();
        assert_eq!(
            keys.key_event(&KeyEvent::plain("F5"), &mut sink),
            KeyOutcome::Ignored
        );
    }

    #[test]
    fn test_disabled_translator_ignores_everything() {
        let mut keys = KeyTranslator::new();
        keys.set_enabled(false);
        let mut sink = MockInputSink::new();
        sink.expect_keyboard_text().never();
        assert_eq!(
            keys.key_event(&KeyEvent::plain("x"), &mut sink),
            KeyOutcome::Ignored
        );
    }
}
