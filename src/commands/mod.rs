//! Command registry and dispatch.
//!
//! This module turns chat messages into command handler invocations.
//!
//! # Overview
//!
//! ```text
//! Telegram message
//!      │
//!      ▼
//! ┌────────────┐  filter prefix, parse name + args
//! │ Dispatcher │
//! └────────────┘
//!      │ lookup (case-insensitive)
//!      ▼
//! ┌─────────────────┐      built once at startup by the CommandLoader
//! │ CommandRegistry │ ◄─── from manifests bound to HandlerCatalog entries
//! └─────────────────┘
//!      │ role gate
//!      ▼
//! ┌────────────────┐
//! │ CommandHandler │  runs with an ExecutionContext, sends its own reply
//! └────────────────┘
//! ```
//!
//! # Loading
//!
//! Executable handlers only come from the [`HandlerCatalog`], a static table
//! compiled into the binary. The filesystem only provides declarative
//! manifests binding a [`Descriptor`] to a catalog handler id, see
//! [`loader`]. Without manifests every catalog entry is registered with its
//! built-in descriptor.
//!
//! # Module Organization
//!
//! - [`registry`] - Immutable name to command mapping and its builder
//! - [`loader`] - Manifest discovery and loading
//! - [`catalog`] - Built-in handler table
//! - [`dispatcher`] - Per-message dispatch state machine
//! - [`actions`] - Built-in command handlers

use std::{collections::HashMap, sync::Arc};

use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use serde::Deserialize;

use crate::{
    i18n::Translator,
    telegram::{InboundMessage, Messenger, TextFormat},
};

mod actions;
mod catalog;
mod dispatcher;
mod loader;
mod registry;

pub use crate::commands::catalog::HandlerCatalog;
pub use crate::commands::dispatcher::{DispatchSettings, Dispatcher};
pub use crate::commands::loader::CommandLoader;
pub use crate::commands::registry::CommandRegistry;

/// Access level required to run a command.
///
/// Deserialized from the integer level of the manifests: `0` is public and
/// `1` is admin-only.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(try_from = "u8")]
pub enum Role {
    /// Anyone can run the command
    #[default]
    Public,
    /// Only the configured admins can run the command
    Admin,
}

impl TryFrom<u8> for Role {
    type Error = String;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        match level {
            0 => Ok(Role::Public),
            1 => Ok(Role::Admin),
            _ => Err(format!("unknown role level {}, expected 0 or 1", level)),
        }
    }
}

/// Metadata describing a command.
///
/// Only `name` is required in a manifest, every other field defaults to an
/// empty value. In `guide`, `{pn}` stands for the prefixed command name.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Descriptor {
    /// Command name, matched case-insensitively
    pub name: String,
    /// Version of the command
    #[serde(default)]
    pub version: String,
    /// Author of the command
    #[serde(default)]
    pub author: String,
    /// One line description displayed by `help`
    #[serde(default)]
    pub short_description: String,
    /// Category used to group commands in `help`
    #[serde(default)]
    pub category: String,
    /// Access level
    #[serde(default)]
    pub role: Role,
    /// Usage guide indexed by locale
    #[serde(default)]
    pub guide: HashMap<String, String>,
}

impl Descriptor {
    /// Returns the usage guide for `locale` with `{pn}` expanded.
    ///
    /// Falls back to the english guide, then to any guide.
    pub fn usage(&self, locale: &str, prefix: &str) -> Option<String> {
        let guide = self
            .guide
            .get(locale)
            .or_else(|| self.guide.get(crate::i18n::FALLBACK_LOCALE))
            .or_else(|| self.guide.values().min())?;

        Some(guide.replace("{pn}", &format!("{}{}", prefix, self.name)))
    }
}

/// Everything a handler needs for one invocation.
///
/// Built by the [`Dispatcher`] for each message and owned by the handler call.
pub struct ExecutionContext {
    /// Client used to reply
    pub messenger: Arc<dyn Messenger>,
    /// The message which triggered the command
    pub message: InboundMessage,
    /// Whitespace separated tokens following the command name
    pub args: Vec<String>,
    /// Translation lookup
    pub translator: Arc<Translator>,
    /// Configured command prefix
    pub prefix: String,
    /// Read-only view on the registered commands
    pub registry: Arc<CommandRegistry>,
}

impl ExecutionContext {
    /// Sends a plain text reply to the chat of the message.
    pub async fn reply(&self, text: &str) -> Result<()> {
        self.messenger
            .send_text(self.message.chat_id, text, TextFormat::Plain)
            .await
    }

    /// Sends a Markdown reply to the chat of the message.
    pub async fn reply_markdown(&self, text: &str) -> Result<()> {
        self.messenger
            .send_text(self.message.chat_id, text, TextFormat::Markdown)
            .await
    }

    /// Sends an image with a Markdown caption to the chat of the message.
    pub async fn reply_photo(&self, photo: Vec<u8>, caption: &str) -> Result<()> {
        self.messenger
            .send_photo(self.message.chat_id, photo, caption)
            .await
    }
}

/// Executable behavior bound to a command.
///
/// A handler sends its own replies through the context. Returning an error
/// makes the dispatcher log it and send a short error reply.
#[automock]
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Runs the command.
    async fn run(&self, ctx: ExecutionContext) -> Result<()>;
}
