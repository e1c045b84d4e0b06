//! Telecmd - A Telegram bot with pluggable commands.
//!
//! This is the main entry point of the bot. It loads the configuration,
//! builds the command registry and polls Telegram until Ctrl-C.
//!
//! # Overview
//!
//! Every message starting with the configured prefix is treated as a command
//! invocation: `/ffinfo 1234567890 bd` runs the `ffinfo` command with the
//! arguments `1234567890` and `bd`. Commands are described by YAML manifests
//! bound to handlers compiled into the binary.
//!
//! # Features
//!
//! - **Command Registry**: Case-insensitive names, loaded once from manifests
//! - **Role Gate**: Admin-only commands are refused to other users
//! - **Error Replies**: Failing or panicking commands answer with a short error
//! - **Free Fire Lookup**: `ffinfo` aggregates two profile providers and an outfit image
//! - **Translations**: English and Bengali replies
//!
//! # Configuration
//!
//! Create a `config.yaml` file with your settings:
//!
//! ```yaml
//! telegram:
//!   token: "123456:ABC-DEF"
//!
//! bot:
//!   prefix: "/"
//!   admins: [11111111]
//!
//! commands:
//!   manifests: ["commands/*.yaml"]
//! ```
//!
//! See the [`config`] module for every option.
//!
//! # Usage
//!
//! ```bash
//! BOT_TOKEN="123456:ABC-DEF" telecmd --config config.yaml
//! ```
//!
//! # Architecture
//!
//! - [`bot`] - Wiring of the transport, registry and dispatcher
//! - [`commands`] - Registry, manifest loading, dispatch and built-in commands
//! - [`config`] - YAML configuration with environment variable overrides
//! - [`freefire`] - Free Fire providers client used by `ffinfo`
//! - [`i18n`] - Reply translations
//! - [`telegram`] - Telegram Bot API transport
//!
//! # Environment Variables
//!
//! - `RUST_LOG` - Controls logging level (default: `info`)
//! - `BOT_TOKEN` - Telegram bot token, overrides `telegram.token`

use clap::Parser;
use env_logger::Env;
use log::{error, info};

use crate::{bot::Bot, config::Config};

mod bot;
mod commands;
mod config;
mod freefire;
mod i18n;
mod telegram;

/// Command-line arguments for the telecmd bot.
///
/// # Examples
///
/// ```bash
/// telecmd --config config.yaml
/// ```
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the YAML configuration file.
    ///
    /// A missing file is accepted when the environment provides the token.
    #[arg(short, long, default_value = "config.yaml")]
    config: String,
}

/// Main entry point for the telecmd bot.
///
/// Configuration and initialization errors are logged and end the process
/// without panicking.
#[tokio::main]
async fn main() {
    // Put logger at info level by default
    let env = Env::default().filter_or("RUST_LOG", "info");
    env_logger::init_from_env(env);

    info!("Starting telecmd {}...", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();

    let config = match Config::load(&args.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load config file: {}", e);
            return;
        }
    };

    let bot = match Bot::new(config) {
        Ok(b) => b,
        Err(e) => {
            error!("Failed to initialize bot: {}", e);
            return;
        }
    };
    bot.start().await;

    info!("telecmd stopped");
}
