//! Built-in handler table.
//!
//! Every executable command is listed here at compile time. Manifests can
//! only reference these handlers by id, nothing else is ever executed.

use std::sync::Arc;

use crate::{
    commands::{
        CommandHandler, Descriptor,
        actions::{self, FfInfoCommand, HelpCommand},
    },
    config::FfInfo,
    freefire::FreeFireRequester,
};

/// A handler available to manifests.
pub struct CatalogEntry {
    /// Id referenced by the `handler` field of manifests
    pub id: &'static str,
    /// Shared handler instance
    pub handler: Arc<dyn CommandHandler>,
    /// Descriptor used when no manifest is configured
    pub descriptor: Descriptor,
}

/// Static table of the handlers compiled into the bot.
#[derive(Default)]
pub struct HandlerCatalog {
    entries: Vec<CatalogEntry>,
}

impl HandlerCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        HandlerCatalog::default()
    }

    /// Catalog of the commands shipped with the bot.
    ///
    /// # Arguments
    ///
    /// * `ffinfo` - Upstream endpoints of the ffinfo command
    pub fn builtin(ffinfo: &FfInfo) -> Self {
        let requester =
            FreeFireRequester::new(&ffinfo.info_url, &ffinfo.player_url, &ffinfo.outfit_url);

        HandlerCatalog::new()
            .with(
                "ffinfo",
                Arc::new(FfInfoCommand::new(requester, &ffinfo.default_region)),
                actions::ffinfo_descriptor(),
            )
            .with("help", Arc::new(HelpCommand), actions::help_descriptor())
    }

    /// Adds an entry, replacing any entry with the same id.
    pub fn with(
        mut self,
        id: &'static str,
        handler: Arc<dyn CommandHandler>,
        descriptor: Descriptor,
    ) -> Self {
        self.entries.retain(|entry| entry.id != id);
        self.entries.push(CatalogEntry {
            id,
            handler,
            descriptor,
        });
        self
    }

    /// Returns the handler registered under `id`.
    pub fn handler(&self, id: &str) -> Option<Arc<dyn CommandHandler>> {
        self.entries
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| Arc::clone(&entry.handler))
    }

    /// All entries, in insertion order.
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }
}
