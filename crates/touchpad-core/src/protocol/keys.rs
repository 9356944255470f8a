//! Logical key codes and pointer button indices.
//!
//! The remote host does not understand physical keyboard layouts.  Printable
//! characters travel as literal text (`t` commands); everything else travels
//! as a *logical key code*: a small, stable integer that names what the key
//! does rather than where it sits on the keyboard.
//!
//! # Why logical codes? (for beginners)
//!
//! A phone's on-screen keyboard, a laptop keyboard and a media remote all
//! produce "volume up" in different ways.  The host only needs to know the
//! intent, so the protocol fixes one number per intent:
//!
//! | Code | Key                | Code | Key          |
//! |------|--------------------|------|--------------|
//! | 0    | Volume mute        | 9    | Arrow left   |
//! | 1    | Volume down        | 10   | Arrow right  |
//! | 2    | Volume up          | 11   | Arrow up     |
//! | 3    | Media play/pause   | 12   | Arrow down   |
//! | 4    | Media previous     | 13   | Home         |
//! | 5    | Media next         | 14   | End          |
//! | 6    | Browser back       | 15   | Backspace    |
//! | 7    | Browser forward    | 16   | Delete       |
//! | 8    | Super              | 17   | Enter        |
//!
//! The numbers are part of the wire format and must never be reordered.

use serde::{Deserialize, Serialize};

/// Protocol-level key code for a non-printable key.
///
/// The numeric value of each variant is its code on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum LogicalKey {
    VolumeMute = 0,
    VolumeDown = 1,
    VolumeUp = 2,
    MediaPlayPause = 3,
    MediaPrevTrack = 4,
    MediaNextTrack = 5,
    BrowserBack = 6,
    BrowserForward = 7,
    Super = 8,
    Left = 9,
    Right = 10,
    Up = 11,
    Down = 12,
    Home = 13,
    End = 14,
    BackSpace = 15,
    Delete = 16,
    Return = 17,
}

impl LogicalKey {
    /// Every logical key, in wire-code order.
    pub const ALL: [LogicalKey; 18] = [
        LogicalKey::VolumeMute,
        LogicalKey::VolumeDown,
        LogicalKey::VolumeUp,
        LogicalKey::MediaPlayPause,
        LogicalKey::MediaPrevTrack,
        LogicalKey::MediaNextTrack,
        LogicalKey::BrowserBack,
        LogicalKey::BrowserForward,
        LogicalKey::Super,
        LogicalKey::Left,
        LogicalKey::Right,
        LogicalKey::Up,
        LogicalKey::Down,
        LogicalKey::Home,
        LogicalKey::End,
        LogicalKey::BackSpace,
        LogicalKey::Delete,
        LogicalKey::Return,
    ];

    /// Returns the wire code of this key.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Looks up a key by its wire code.
    ///
    /// Returns `None` for codes outside `0..=17`.
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(usize::from(code)).copied()
    }

    /// Maps a physical key name (as reported by a keyboard event) to a
    /// logical key.
    ///
    /// Only the navigation and editing keys the touchpad forwards are
    /// recognised.  Legacy short names (`"Left"`, `"OS"`) are accepted
    /// alongside their modern equivalents.  Media and volume keys are not
    /// captured from the keyboard; they are sent from on-screen buttons.
    pub fn from_physical_name(name: &str) -> Option<Self> {
        match name {
            "OS" | "Super" | "Meta" => Some(LogicalKey::Super),
            "Backspace" => Some(LogicalKey::BackSpace),
            "Enter" => Some(LogicalKey::Return),
            "Delete" => Some(LogicalKey::Delete),
            "Home" => Some(LogicalKey::Home),
            "End" => Some(LogicalKey::End),
            "Left" | "ArrowLeft" => Some(LogicalKey::Left),
            "Right" | "ArrowRight" => Some(LogicalKey::Right),
            "Up" | "ArrowUp" => Some(LogicalKey::Up),
            "Down" | "ArrowDown" => Some(LogicalKey::Down),
            _ => None,
        }
    }
}

/// Pointer button index as sent in `b` commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum PointerButton {
    Left = 0,
    Right = 1,
    Middle = 2,
}

impl PointerButton {
    /// Returns the wire index of this button.
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Looks up a button by wire index (`0..=2`).
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(PointerButton::Left),
            1 => Some(PointerButton::Right),
            2 => Some(PointerButton::Middle),
            _ => None,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
