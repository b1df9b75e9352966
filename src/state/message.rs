// Message record model
// The only entity of the chat: one bubble in the conversation history

use serde::{Deserialize, Serialize};

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// Typed or uploaded by the person using the widget
    User,
    /// Reply from the remote endpoint, or a locally generated error notice
    System,
}

/// One unit of chat history.
///
/// Records are immutable once created; the history only ever grows until it
/// is cleared as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Displayable content
    pub text: String,
    /// Author of the message
    pub sender: Sender,
    /// Whether the record is mirrored to durable storage.
    /// Stored under the `save` key.
    #[serde(rename = "save", alias = "persist", default = "default_persist")]
    pub persist: bool,
}

fn default_persist() -> bool {
    true
}

impl Message {
    /// Create a persisted message from the user
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::User,
            persist: true,
        }
    }

    /// Create a persisted system message
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::System,
            persist: true,
        }
    }

    /// Whether this message was authored by the user
    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_shape() {
        let json = serde_json::to_value(Message::user("hello")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"text": "hello", "sender": "user", "save": true})
        );
    }

    #[test]
    fn test_reads_persist_alias_and_missing_flag() {
        let aliased: Message =
            serde_json::from_str(r#"{"text":"a","sender":"system","persist":false}"#).unwrap();
        assert_eq!(aliased.sender, Sender::System);
        assert!(!aliased.persist);

        let bare: Message = serde_json::from_str(r#"{"text":"b","sender":"user"}"#).unwrap();
        assert!(bare.persist);
        assert!(bare.is_user());
    }

    #[test]
    fn test_unknown_sender_is_rejected() {
        let result = serde_json::from_str::<Message>(r#"{"text":"c","sender":"bot"}"#);
        assert!(result.is_err());
    }
}
