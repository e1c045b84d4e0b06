//! Bot module wiring the Telegram transport to the command dispatcher.
//!
//! This module provides the main [`Bot`] implementation. It builds every
//! component once at startup, then forwards each incoming Telegram message
//! to the [`Dispatcher`] in its own task.
//!
//! # Architecture
//!
//! ```text
//! Telegram long polling → InboundMessage → tokio::spawn → Dispatcher::dispatch
//! ```
//!
//! Messages are processed concurrently and may be answered out of order.
//! A slow upstream call only delays the message that triggered it.
//!
//! # Example
//!
//! ```no_run
//! let config = Config::load("config.yaml")?;
//!
//! let bot = Bot::new(config)?;
//! bot.start().await; // Runs until Ctrl-C
//! ```

use std::sync::Arc;

use log::{debug, info};

use crate::{
    commands::{CommandLoader, DispatchSettings, Dispatcher, HandlerCatalog},
    config::Config,
    i18n::Translator,
    telegram::{self, TelegramMessenger},
};

/// Main bot structure connecting Telegram to the commands.
pub struct Bot {
    /// Telegram client used for long polling.
    ///
    /// The [`TelegramMessenger`] owned by the dispatcher shares its connection pool.
    telegram: teloxide::Bot,

    /// Message router shared by every dispatch task.
    dispatcher: Arc<Dispatcher>,
}

impl Bot {
    /// Creates a new Bot instance from the configuration.
    ///
    /// Loads the translations and the command registry. Broken manifests are
    /// logged and skipped, they never prevent the bot from starting.
    ///
    /// # Arguments
    ///
    /// * `config` - Configuration loaded from file and environment
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded translations can't be parsed.
    pub fn new(config: Config) -> Result<Self, anyhow::Error> {
        let telegram = teloxide::Bot::new(&config.telegram.token);
        let messenger = Arc::new(TelegramMessenger::new(telegram.clone()));

        let translator = Arc::new(Translator::new(&config.bot.language)?);
        info!("replying in locale {}", translator.locale());

        let loader = CommandLoader::new(HandlerCatalog::builtin(&config.ffinfo));
        let registry = Arc::new(loader.load_all(&config.commands.manifests));

        let dispatcher = Arc::new(Dispatcher::new(
            registry,
            messenger,
            translator,
            DispatchSettings::from(&config.bot),
        ));

        Ok(Bot {
            telegram,
            dispatcher,
        })
    }

    /// Starts polling Telegram and dispatching messages.
    ///
    /// Each message is dispatched in a new task, so the polling loop never
    /// waits for a command. Returns when polling stops on Ctrl-C.
    pub async fn start(self) {
        let dispatcher = self.dispatcher;

        telegram::listen(self.telegram, move |message| {
            let dispatcher = Arc::clone(&dispatcher);
            tokio::spawn(async move {
                let outcome = dispatcher.dispatch(message).await;
                debug!("dispatch ended with {:?}", outcome);
            });
        })
        .await;
    }
}
