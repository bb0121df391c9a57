//! Karuta command handling
//!
//! Turns one webhook batch into the bot's reply, reading and writing
//! entries through the configured [`KarutaStore`].

use crate::parser::{is_valid_key, CommandMatch, CommandParser, Event, REBUKE};
use crate::store::{KarutaStore, UpsertOutcome};

/// Longest reply Lingr accepts, in characters
pub const MAX_REPLY_CHARS: usize = 999;

const REGISTERED: &str = "登録しました";
const UPDATED: &str = "更新しました";

/// Command handler for karuta business logic
pub struct KarutaHandler {
    store: KarutaStore,
    parser: CommandParser,
}

impl KarutaHandler {
    pub fn new(store: KarutaStore) -> Self {
        KarutaHandler {
            store,
            parser: CommandParser::new(),
        }
    }

    /// Process a batch of events in order and build the reply.
    ///
    /// Storage failures are logged and contribute nothing to the reply.
    pub async fn handle(&self, events: &[Event]) -> String {
        let mut reply = String::new();

        for event in events {
            let Some(message) = &event.message else {
                tracing::debug!("Skipping event {} without message", event.id);
                continue;
            };

            match self.parser.parse(&message.text) {
                CommandMatch::Update { key, value } => self.update(&key, &value, &mut reply).await,
                CommandMatch::Query { key } => self.query(&key, &mut reply).await,
                CommandMatch::NoMatch => {}
            }
        }

        finish_reply(reply)
    }

    async fn update(&self, key: &str, value: &str, reply: &mut String) {
        if !is_valid_key(key) {
            push_line(reply, REBUKE);
            return;
        }

        match self.store.upsert(key, value).await {
            Ok(UpsertOutcome::Inserted) => {
                tracing::info!("Registered karuta {}", key);
                push_line(reply, REGISTERED);
            }
            Ok(UpsertOutcome::Updated) => {
                tracing::info!("Updated karuta {}", key);
                push_line(reply, UPDATED);
            }
            Err(e) => tracing::error!("Failed to store karuta {}: {}", key, e),
        }
    }

    async fn query(&self, key: &str, reply: &mut String) {
        if !is_valid_key(key) {
            push_line(reply, REBUKE);
            return;
        }

        match self.store.get(key).await {
            Ok(Some(entry)) => push_line(reply, &format!("{}: {}", entry.key, entry.value)),
            Ok(None) => tracing::debug!("No karuta for {}", key),
            Err(e) => tracing::error!("Failed to look up karuta {}: {}", key, e),
        }
    }
}

fn push_line(reply: &mut String, line: &str) {
    reply.push_str(line);
    reply.push('\n');
}

/// Strip trailing newlines and cap the reply at [`MAX_REPLY_CHARS`] characters
pub fn finish_reply(reply: String) -> String {
    let trimmed = reply.trim_end_matches('\n');
    match trimmed.char_indices().nth(MAX_REPLY_CHARS) {
        Some((end, _)) => trimmed[..end].to_string(),
        None => trimmed.to_string(),
    }
}
