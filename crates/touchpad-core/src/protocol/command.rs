//! Text codec for client → host input commands.
//!
//! Wire format: one command per channel message, a single-character prefix
//! followed by `;`-separated fields.
//!
//! ```text
//! m<dx>;<dy>        relative pointer move
//! s<dh>;<dv>        scroll delta, gesture in progress
//! S<dh>;<dv>        scroll delta, gesture finishing
//! S                 scroll gesture end, no residual delta
//! b<button>;<0|1>   button release / press
//! k<code>           logical key press
//! t<text>           literal text (rest of the message, UTF-8)
//! ```
//!
//! All numeric fields are signed decimal integers.  The channel is
//! message-oriented, so no length prefix or terminator is needed.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::protocol::keys::{LogicalKey, PointerButton};

/// Errors that can occur when decoding a command from wire text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandParseError {
    /// The message was empty.
    #[error("empty command")]
    Empty,

    /// The prefix character is not a known command.
    #[error("unknown command prefix: {0:?}")]
    UnknownPrefix(char),

    /// The command carried the wrong number of `;`-separated fields.
    #[error("wrong number of arguments: expected {expected}, got {got}")]
    WrongArgumentCount { expected: usize, got: usize },

    /// A numeric field could not be parsed.
    #[error("invalid integer field: {0:?}")]
    InvalidInteger(String),

    /// A `k` command named a key code outside the logical key table.
    #[error("unknown key code: {0}")]
    UnknownKey(u8),

    /// A `b` command named a button index outside `0..=2`.
    #[error("unknown pointer button: {0}")]
    UnknownButton(i64),
}

/// One input command sent to the remote host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Relative pointer motion in whole device units.
    Move { dx: i64, dy: i64 },
    /// Scroll delta.  `finish` marks the last delta of a scroll gesture.
    Scroll { dh: i64, dv: i64, finish: bool },
    /// End of a scroll gesture with no residual delta (bare `S`).
    ScrollEnd,
    /// Pointer button press (`pressed = true`) or release.
    Button { button: PointerButton, pressed: bool },
    /// Logical key press.
    Key(LogicalKey),
    /// Literal text insertion.
    Text(String),
}

impl Command {
    /// Returns the single-character wire prefix of this command.
    pub fn prefix(&self) -> char {
        match self {
            Command::Move { .. } => 'm',
            Command::Scroll { finish: false, .. } => 's',
            Command::Scroll { finish: true, .. } | Command::ScrollEnd => 'S',
            Command::Button { .. } => 'b',
            Command::Key(_) => 'k',
            Command::Text(_) => 't',
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = self.prefix();
        match self {
            Command::Move { dx, dy } => write!(f, "{prefix}{dx};{dy}"),
            Command::Scroll { dh, dv, .. } => write!(f, "{prefix}{dh};{dv}"),
            Command::ScrollEnd => write!(f, "{prefix}"),
            Command::Button { button, pressed } => {
                write!(f, "{prefix}{};{}", button.index(), u8::from(*pressed))
            }
            Command::Key(key) => write!(f, "{prefix}{}", key.code()),
            Command::Text(text) => write!(f, "{prefix}{text}"),
        }
    }
}

impl FromStr for Command {
    type Err = CommandParseError;

    /// Decodes one command using the same rules the host applies.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use touchpad_core::protocol::Command;
    ///
    /// let cmd: Command = "m-3;7".parse().unwrap();
    /// assert_eq!(cmd, Command::Move { dx: -3, dy: 7 });
    /// assert_eq!(cmd.to_string(), "m-3;7");
    /// ```
    fn from_str(message: &str) -> Result<Self, Self::Err> {
        let mut chars = message.chars();
        let prefix = chars.next().ok_or(CommandParseError::Empty)?;
        let rest = chars.as_str();

        match prefix {
            // Text takes the remainder verbatim, including any ';'.
            't' => return Ok(Command::Text(rest.to_string())),
            'k' => {
                let code: u8 = rest
                    .parse()
                    .map_err(|_| CommandParseError::InvalidInteger(rest.to_string()))?;
                return LogicalKey::from_code(code)
                    .map(Command::Key)
                    .ok_or(CommandParseError::UnknownKey(code));
            }
            'S' if rest.is_empty() => return Ok(Command::ScrollEnd),
            'm' | 's' | 'S' | 'b' => {}
            other => return Err(CommandParseError::UnknownPrefix(other)),
        }

        let (x, y) = parse_pair(rest)?;
        match prefix {
            'm' => Ok(Command::Move { dx: x, dy: y }),
            's' => Ok(Command::Scroll {
                dh: x,
                dv: y,
                finish: false,
            }),
            'S' => Ok(Command::Scroll {
                dh: x,
                dv: y,
                finish: true,
            }),
            _ => {
                let button = u8::try_from(x)
                    .ok()
                    .and_then(PointerButton::from_index)
                    .ok_or(CommandParseError::UnknownButton(x))?;
                Ok(Command::Button {
                    button,
                    pressed: y != 0,
                })
            }
        }
    }
}

/// Splits `"<a>;<b>"` into two integers.
fn parse_pair(fields: &str) -> Result<(i64, i64), CommandParseError> {
    let parts: Vec<&str> = fields.split(';').collect();
    if parts.len() != 2 {
        return Err(CommandParseError::WrongArgumentCount {
            expected: 2,
            got: parts.len(),
        });
    }
    let parse = |s: &str| {
        s.parse::<i64>()
            .map_err(|_| CommandParseError::InvalidInteger(s.to_string()))
    };
    Ok((parse(parts[0])?, parse(parts[1])?))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_move() {
        assert_eq!(Command::Move { dx: 5, dy: -2 }.to_string(), "m5;-2");
    }

    #[test]
    fn test_encode_scroll_in_progress_uses_lowercase_prefix() {
        let cmd = Command::Scroll {
            dh: 0,
            dv: -12,
            finish: false,
        };
        assert_eq!(cmd.to_string(), "s0;-12");
    }

    #[test]
    fn test_encode_scroll_finish_uses_uppercase_prefix() {
        let cmd = Command::Scroll {
            dh: 3,
            dv: 4,
            finish: true,
        };
        assert_eq!(cmd.to_string(), "S3;4");
    }

    #[test]
    fn test_encode_scroll_end_is_bare_prefix() {
        assert_eq!(Command::ScrollEnd.to_string(), "S");
    }

    #[test]
    fn test_encode_button() {
        let press = Command::Button {
            button: PointerButton::Left,
            pressed: true,
        };
        let release = Command::Button {
            button: PointerButton::Middle,
            pressed: false,
        };
        assert_eq!(press.to_string(), "b0;1");
        assert_eq!(release.to_string(), "b2;0");
    }

    #[test]
    fn test_encode_key_and_text() {
        assert_eq!(Command::Key(LogicalKey::Return).to_string(), "k17");
        assert_eq!(Command::Text("a;b".to_string()).to_string(), "ta;b");
    }

    #[test]
    fn test_decode_text_keeps_separators_and_unicode() {
        let cmd: Command = "tgrüß;dich".parse().unwrap();
        assert_eq!(cmd, Command::Text("grüß;dich".to_string()));
    }

    #[test]
    fn test_decode_bare_s_is_scroll_end() {
        assert_eq!("S".parse::<Command>(), Ok(Command::ScrollEnd));
    }

    #[test]
    fn test_decode_button_treats_any_nonzero_as_pressed() {
        let cmd: Command = "b1;7".parse().unwrap();
        assert_eq!(
            cmd,
            Command::Button {
                button: PointerButton::Right,
                pressed: true
            }
        );
    }

    #[test]
    fn test_decode_rejects_empty() {
        assert_eq!("".parse::<Command>(), Err(CommandParseError::Empty));
    }

    #[test]
    fn test_decode_rejects_unknown_prefix() {
        assert_eq!(
            "x1;2".parse::<Command>(),
            Err(CommandParseError::UnknownPrefix('x'))
        );
    }

    #[test]
    fn test_decode_rejects_wrong_field_count() {
        assert_eq!(
            "m1;2;3".parse::<Command>(),
            Err(CommandParseError::WrongArgumentCount {
                expected: 2,
                got: 3
            })
        );
        assert!(matches!(
            "s".parse::<Command>(),
            Err(CommandParseError::WrongArgumentCount { .. })
        ));
    }

    #[test]
    fn test_decode_rejects_non_integer_fields() {
        assert_eq!(
            "m1.5;2".parse::<Command>(),
            Err(CommandParseError::InvalidInteger("1.5".to_string()))
        );
    }

    #[test]
    fn test_decode_rejects_unknown_key_and_button() {
        assert_eq!("k18".parse::<Command>(), Err(CommandParseError::UnknownKey(18)));
        assert_eq!(
            "b3;1".parse::<Command>(),
            Err(CommandParseError::UnknownButton(3))
        );
        assert_eq!(
            "b-1;1".parse::<Command>(),
            Err(CommandParseError::UnknownButton(-1))
        );
    }
}
