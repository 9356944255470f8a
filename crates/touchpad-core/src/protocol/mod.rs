//! Wire protocol: handshake, host config and the command grammar.

pub mod channel;
pub mod command;
pub mod config;
pub mod keys;

pub use channel::{challenge_response, ChannelError, ChannelEvent, ChannelSession, ChannelState};
pub use command::{Command, CommandParseError};
pub use config::RemoteConfig;
pub use keys::{LogicalKey, PointerButton};
