//! Inbound chat parsing
//!
//! Decodes Lingr webhook bodies and recognizes karuta commands in message text.

pub mod command;
pub mod types;

pub use command::{is_valid_key, CommandMatch, CommandParser, REBUKE};
pub use types::*;
