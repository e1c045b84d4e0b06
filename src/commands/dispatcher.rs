//! Per-message dispatch.
//!
//! [`Dispatcher::dispatch`] walks a message through a fixed sequence of
//! steps, each of them able to end the processing:
//!
//! ```text
//! filter prefix → parse → resolve → authorize → invoke → report outcome
//! ```
//!
//! The dispatcher keeps no state between messages and never returns an
//! error: failures end up in the logs and, when relevant, in a reply.

use std::{collections::HashSet, panic::AssertUnwindSafe, sync::Arc};

use futures::FutureExt;
use log::{debug, error, info};

use crate::{
    commands::{CommandRegistry, ExecutionContext, Role},
    config::BotSettings,
    i18n::Translator,
    telegram::{InboundMessage, Messenger, TextFormat},
};

/// Terminal state reached by a dispatched message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Not a command: no text or no prefix
    Ignored,
    /// No command registered under the parsed name
    NotFound(String),
    /// Admin-only command invoked by a non-admin
    Restricted(String),
    /// The handler completed successfully
    Executed(String),
    /// The handler returned an error or panicked
    Failed(String),
}

/// Dispatcher knobs taken from the configuration.
#[derive(Debug, Clone)]
pub struct DispatchSettings {
    /// Prefix every command starts with
    pub prefix: String,
    /// Telegram user ids allowed to run admin-only commands
    pub admins: HashSet<u64>,
    /// Reply for unknown commands
    pub command_not_found_message: Option<String>,
}

impl From<&BotSettings> for DispatchSettings {
    fn from(settings: &BotSettings) -> Self {
        DispatchSettings {
            prefix: settings.prefix.clone(),
            admins: settings.admins.clone(),
            command_not_found_message: settings.command_not_found_message.clone(),
        }
    }
}

/// Splits a command message into its lowercase name and its arguments.
///
/// Returns `None` when `text` doesn't start with `prefix`. A message made of
/// the prefix only yields an empty name.
///
/// # Examples
///
/// ```ignore
/// let (name, args) = parse_invocation("/FfInfo 123  bd", "/").unwrap();
/// assert_eq!(name, "ffinfo");
/// assert_eq!(args, vec!["123", "bd"]);
/// ```
pub fn parse_invocation(text: &str, prefix: &str) -> Option<(String, Vec<String>)> {
    let rest = text.strip_prefix(prefix)?;
    let mut tokens = rest.split_whitespace();
    let name = tokens.next().unwrap_or_default().to_lowercase();
    let args = tokens.map(str::to_owned).collect();
    Some((name, args))
}

/// Routes chat messages to command handlers.
pub struct Dispatcher {
    registry: Arc<CommandRegistry>,
    messenger: Arc<dyn Messenger>,
    translator: Arc<Translator>,
    settings: DispatchSettings,
}

impl Dispatcher {
    /// Create a new [Dispatcher].
    ///
    /// # Arguments
    ///
    /// * `registry` - Commands available to users
    /// * `messenger` - Client used for replies
    /// * `translator` - Translation lookup shared with handlers
    /// * `settings` - Prefix, admins and not found reply
    pub fn new(
        registry: Arc<CommandRegistry>,
        messenger: Arc<dyn Messenger>,
        translator: Arc<Translator>,
        settings: DispatchSettings,
    ) -> Self {
        Dispatcher {
            registry,
            messenger,
            translator,
            settings,
        }
    }

    /// Processes one inbound message until a terminal state.
    pub async fn dispatch(&self, message: InboundMessage) -> DispatchOutcome {
        let Some(text) = message.text.as_deref() else {
            return DispatchOutcome::Ignored;
        };
        let Some((name, args)) = parse_invocation(text, &self.settings.prefix) else {
            return DispatchOutcome::Ignored;
        };
        debug!("parsed command {:?} with args {:?}", name, args);

        let Some(command) = self.registry.lookup(&name) else {
            debug!("no command named {:?}", name);
            if let Some(reply) = &self.settings.command_not_found_message {
                self.send(message.chat_id, reply).await;
            }
            return DispatchOutcome::NotFound(name);
        };

        let user = message.sender_label();
        if command.descriptor.role == Role::Admin && !self.is_admin(&message) {
            info!("refuse admin command {} to {}", name, user);
            self.send(message.chat_id, &self.translator.t("dispatcher.restricted"))
                .await;
            return DispatchOutcome::Restricted(name);
        }

        let chat_id = message.chat_id;
        let handler = Arc::clone(&command.handler);
        let ctx = ExecutionContext {
            messenger: Arc::clone(&self.messenger),
            message,
            args,
            translator: Arc::clone(&self.translator),
            prefix: self.settings.prefix.clone(),
            registry: Arc::clone(&self.registry),
        };

        let result = AssertUnwindSafe(async move { handler.run(ctx).await })
            .catch_unwind()
            .await;

        let reason = match result {
            Ok(Ok(())) => {
                info!("{} executed {}", user, name);
                return DispatchOutcome::Executed(name);
            }
            Ok(Err(e)) => {
                error!("command {} failed for {}: {:?}", name, user, e);
                e.to_string()
            }
            Err(_) => {
                error!("command {} panicked for {}", name, user);
                self.translator
                    .t_with("dispatcher.panic", &[("command", name.as_str())])
            }
        };

        let reply = self
            .translator
            .t_with("dispatcher.error", &[("message", reason.as_str())]);
        self.send(chat_id, &reply).await;
        DispatchOutcome::Failed(name)
    }

    fn is_admin(&self, message: &InboundMessage) -> bool {
        message
            .sender_id
            .is_some_and(|id| self.settings.admins.contains(&id))
    }

    async fn send(&self, chat_id: i64, text: &str) {
        if let Err(e) = self
            .messenger
            .send_text(chat_id, text, TextFormat::Plain)
            .await
        {
            error!("failed to reply in chat {}: {:?}", chat_id, e);
        }
    }
}
