//! Command handlers compiled into the bot.
//!
//! Each handler implements [`CommandHandler`](crate::commands::CommandHandler)
//! and comes with the descriptor it is registered under when no manifest is
//! configured.
//!
//! # Available Handlers
//!
//! - [`FfInfoCommand`] - Free Fire player lookup
//! - [`HelpCommand`] - Command list and usage guides

mod ffinfo;
mod help;

pub use crate::commands::actions::{
    ffinfo::{FfInfoCommand, ffinfo_descriptor},
    help::{HelpCommand, help_descriptor},
};
