//! Incoming updates from the Telegram Bot API.
//!
//! [`listen`] runs the teloxide long-polling loop until the process receives a
//! termination signal (Ctrl-C). Every message update is converted into an
//! [`InboundMessage`] and handed to the callback. The callback must not block,
//! it is expected to spawn the actual processing.

use std::sync::Arc;

use log::{debug, info};
use teloxide::{
    Bot,
    dispatching::{Dispatcher, UpdateFilterExt},
    error_handlers::LoggingErrorHandler,
    respond,
    types::{Message, Update},
};

use crate::telegram::InboundMessage;

impl From<&Message> for InboundMessage {
    fn from(message: &Message) -> Self {
        InboundMessage {
            chat_id: message.chat.id.0,
            sender_id: message.from.as_ref().map(|user| user.id.0),
            sender_name: message.from.as_ref().map(|user| user.full_name()),
            text: message.text().map(str::to_owned),
        }
    }
}

/// Starts polling Telegram and forwards every message to `on_message`.
///
/// Returns once polling stopped, after a Ctrl-C.
///
/// # Arguments
///
/// * `bot` - The teloxide client used to poll updates
/// * `on_message` - Callback invoked for each incoming message
pub async fn listen<F>(bot: Bot, on_message: F)
where
    F: Fn(InboundMessage) + Send + Sync + 'static,
{
    info!("start polling telegram updates");

    let on_message = Arc::new(on_message);
    let handler = Update::filter_message().endpoint(move |message: Message| {
        let on_message = Arc::clone(&on_message);
        async move {
            debug!("received message {} in chat {}", message.id.0, message.chat.id.0);
            on_message(InboundMessage::from(&message));
            respond(())
        }
    });

    Dispatcher::builder(bot, handler)
        .default_handler(|update| async move {
            debug!("ignore update {}", update.id.0);
        })
        .error_handler(LoggingErrorHandler::with_custom_text(
            "an error occurred in the telegram dispatcher",
        ))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    info!("telegram polling stopped");
}
