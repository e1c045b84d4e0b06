//! Outbound messages to Telegram chats.

use anyhow::Result;
use async_trait::async_trait;
use log::debug;
use mockall::automock;
use teloxide::{
    Bot,
    payloads::{SendMessageSetters, SendPhotoSetters},
    requests::Requester,
    types::{ChatId, InputFile, ParseMode},
};

/// Formatting applied to an outgoing text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFormat {
    /// Sent as is
    Plain,
    /// Parsed as Telegram legacy Markdown (`*bold*`, `` `code` ``)
    Markdown,
}

/// Sends messages to Telegram chats.
///
/// This trait abstracts the Bot API so that commands and the dispatcher can be
/// tested with mocks.
#[automock]
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Sends a text message to a chat.
    async fn send_text(&self, chat_id: i64, text: &str, format: TextFormat) -> Result<()>;
    /// Sends an image with a Markdown caption to a chat.
    async fn send_photo(&self, chat_id: i64, photo: Vec<u8>, caption: &str) -> Result<()>;
}

/// [`Messenger`] implementation backed by the Telegram Bot API.
pub struct TelegramMessenger {
    /// Bot API client, cheap to clone and safe to share
    bot: Bot,
}

impl TelegramMessenger {
    /// Create a new [TelegramMessenger].
    ///
    /// # Arguments
    ///
    /// * `bot` - The teloxide client, authenticated with the bot token.
    pub fn new(bot: Bot) -> Self {
        TelegramMessenger { bot }
    }
}

#[async_trait]
impl Messenger for TelegramMessenger {
    #[allow(deprecated)]
    async fn send_text(&self, chat_id: i64, text: &str, format: TextFormat) -> Result<()> {
        debug!("send text to chat {} -> {}", chat_id, text);

        let request = self.bot.send_message(ChatId(chat_id), text);
        match format {
            TextFormat::Plain => request.await?,
            TextFormat::Markdown => request.parse_mode(ParseMode::Markdown).await?,
        };

        Ok(())
    }

    #[allow(deprecated)]
    async fn send_photo(&self, chat_id: i64, photo: Vec<u8>, caption: &str) -> Result<()> {
        debug!("send photo of {} bytes to chat {}", photo.len(), chat_id);

        self.bot
            .send_photo(ChatId(chat_id), InputFile::memory(photo))
            .caption(caption)
            .parse_mode(ParseMode::Markdown)
            .await?;

        Ok(())
    }
}
