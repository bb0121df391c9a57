//! Lingr webhook payload types

use serde::{Deserialize, Deserializer, Serialize};

/// Body of a Lingr bot callback: one batch of room events
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Status {
    #[serde(default)]
    pub events: Vec<Event>,
}

impl Status {
    /// Decode a webhook body. Malformed JSON yields an empty batch.
    pub fn from_slice(body: &[u8]) -> Self {
        match serde_json::from_slice(body) {
            Ok(status) => status,
            Err(e) => {
                tracing::warn!("Ignoring malformed webhook body: {}", e);
                Status::default()
            }
        }
    }
}

/// A single room event
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "event_id", default)]
    pub id: i64,

    /// Chat message; other event kinds (presence etc.) carry none
    #[serde(default)]
    pub message: Option<Message>,
}

/// A chat message. Only `text` drives the bot; the rest is passed through.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Message {
    #[serde(default, deserialize_with = "nullable_string")]
    pub id: String,

    #[serde(default, deserialize_with = "nullable_string")]
    pub room: String,

    #[serde(default, deserialize_with = "nullable_string")]
    pub public_session_id: String,

    #[serde(default, deserialize_with = "nullable_string")]
    pub icon_url: String,

    #[serde(rename = "type", default, deserialize_with = "nullable_string")]
    pub kind: String,

    #[serde(default, deserialize_with = "nullable_string")]
    pub speaker_id: String,

    #[serde(default, deserialize_with = "nullable_string")]
    pub nickname: String,

    #[serde(default, deserialize_with = "nullable_string")]
    pub text: String,
}

/// Treat JSON `null` like an absent string
fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_lingr_payload() {
        let body = r#"{
            "status": "ok",
            "counter": 208,
            "events": [{
                "event_id": 208,
                "message": {
                    "id": "82",
                    "room": "vim",
                    "public_session_id": "UBDH84",
                    "icon_url": "http://example.com/icon.png",
                    "type": "user",
                    "speaker_id": "mattn",
                    "nickname": "mattn",
                    "text": "?vim-karuta あ",
                    "timestamp": "2011-02-12T08:13:51Z",
                    "local_id": null
                }
            }]
        }"#;

        let status = Status::from_slice(body.as_bytes());
        assert_eq!(status.events.len(), 1);

        let event = &status.events[0];
        assert_eq!(event.id, 208);
        let message = event.message.as_ref().unwrap();
        assert_eq!(message.text, "?vim-karuta あ");
        assert_eq!(message.kind, "user");
        assert_eq!(message.speaker_id, "mattn");
    }

    #[test]
    fn test_malformed_body_is_empty_batch() {
        assert!(Status::from_slice(b"{not json").events.is_empty());
        assert!(Status::from_slice(b"").events.is_empty());
    }

    #[test]
    fn test_missing_events_is_empty_batch() {
        assert!(Status::from_slice(b"{}").events.is_empty());
    }

    #[test]
    fn test_event_without_message() {
        let status = Status::from_slice(br#"{"events":[{"event_id":1,"presence":{}}]}"#);
        assert_eq!(status.events.len(), 1);
        assert!(status.events[0].message.is_none());
    }

    #[test]
    fn test_null_text_is_empty() {
        let status = Status::from_slice(br#"{"events":[{"event_id":1,"message":{"text":null}}]}"#);
        assert_eq!(status.events[0].message.as_ref().unwrap().text, "");
    }
}
