//! `!vim-karuta` / `?vim-karuta` command parsing

use regex::Regex;

/// Reply for a key that is not a single hiragana
pub const REBUKE: &str = "お前いい加減にしろよ";

/// First and last valid key characters
pub const KEY_RANGE: std::ops::RangeInclusive<char> = 'あ'..='ん';

/// A recognized command in a chat line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandMatch {
    /// `!vim-karuta <key> <value>`
    Update { key: String, value: String },
    /// `?vim-karuta <key>`
    Query { key: String },
    NoMatch,
}

/// Regex-based matcher for the two karuta commands.
///
/// Whitespace is the ASCII set (tab, LF, FF, CR, space); a full-width space
/// is part of a token.
pub struct CommandParser {
    update_regex: Regex,
    query_regex: Regex,
}

impl CommandParser {
    pub fn new() -> Self {
        Self {
            update_regex: Regex::new(
                r"^!vim-karuta[\t\n\f\r ]+([^\t\n\f\r ]+)[\t\n\f\r ]+(.+)$",
            )
            .expect("update pattern is valid"),
            query_regex: Regex::new(r"^\?vim-karuta[\t\n\f\r ]+([^\t\n\f\r ]+)$")
                .expect("query pattern is valid"),
        }
    }

    /// Classify a chat line. No side effects.
    pub fn parse(&self, text: &str) -> CommandMatch {
        if let Some(caps) = self.update_regex.captures(text) {
            return CommandMatch::Update {
                key: caps[1].to_string(),
                value: caps[2].to_string(),
            };
        }

        if let Some(caps) = self.query_regex.captures(text) {
            return CommandMatch::Query {
                key: caps[1].to_string(),
            };
        }

        CommandMatch::NoMatch
    }
}

impl Default for CommandParser {
    fn default() -> Self {
        Self::new()
    }
}

/// A key must be exactly one character between あ and ん inclusive
pub fn is_valid_key(key: &str) -> bool {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => KEY_RANGE.contains(&c),
        _ => false,
    }
}
