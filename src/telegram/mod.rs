//! Telegram transport for the bot.
//!
//! This module wraps the [`teloxide`] Bot API client behind two seams:
//!
//! - [`Messenger`] sends text and photo messages to a chat. Commands only see
//!   this trait, which keeps them testable with [`MockMessenger`].
//! - [`listen`] long-polls the Bot API and hands every incoming message to a
//!   callback as a transport-neutral [`InboundMessage`].

mod listener;
mod messenger;

pub use crate::telegram::listener::listen;
#[cfg(test)]
pub use crate::telegram::messenger::MockMessenger;
pub use crate::telegram::messenger::{Messenger, TelegramMessenger, TextFormat};

/// A chat message as seen by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InboundMessage {
    /// Chat the message was posted in, replies go there
    pub chat_id: i64,
    /// Telegram user id of the sender, absent for channel posts
    pub sender_id: Option<u64>,
    /// Display name of the sender, used in logs
    pub sender_name: Option<String>,
    /// Text content, absent for stickers, photos without caption, etc.
    pub text: Option<String>,
}

impl InboundMessage {
    /// Human readable sender identity for logs.
    pub fn sender_label(&self) -> String {
        match (&self.sender_name, self.sender_id) {
            (Some(name), Some(id)) => format!("{} ({})", name, id),
            (None, Some(id)) => id.to_string(),
            (Some(name), None) => name.clone(),
            (None, None) => "unknown".to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sender_label() {
        let mut message = InboundMessage {
            chat_id: 1,
            sender_id: Some(42),
            sender_name: Some("ada".to_string()),
            text: None,
        };
        assert_eq!(message.sender_label(), "ada (42)");

        message.sender_name = None;
        assert_eq!(message.sender_label(), "42");

        message.sender_id = None;
        assert_eq!(message.sender_label(), "unknown");
    }
}
