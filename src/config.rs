//! Configuration file structures for the telecmd bot.
//!
//! The configuration is read from a YAML file and merged with environment
//! variables. It is split into four sections: Telegram credentials, dispatch
//! settings, command manifests and the ffinfo upstream endpoints.
//!
//! # Configuration File Format
//!
//! ```yaml
//! telegram:
//!   # Bot API token given by @BotFather
//!   token: "123456:ABC-DEF"
//!
//! bot:
//!   # Prefix every command must start with
//!   prefix: "/"
//!   # Telegram user ids allowed to run admin-only commands
//!   admins: [11111111]
//!   # Default locale of the bot replies
//!   language: en
//!   # Reply sent for unknown commands, unknown commands are ignored when absent
//!   command_not_found_message: "Unknown command"
//!
//! commands:
//!   # Glob patterns of the command manifests, built-in commands are used when empty
//!   manifests: ["commands/**/*.yaml"]
//!
//! ffinfo:
//!   info_url: "https://nodejs-info.vercel.app"
//!   player_url: "https://aditya-info-v8op.onrender.com"
//!   outfit_url: "https://aimguard-outfit.vercel.app"
//!   default_region: bd
//! ```
//!
//! # Environment Variable Overrides
//!
//! Any value can be overridden with a `TELECMD_` prefixed variable, nested keys
//! being separated by `__` (e.g. `TELECMD_BOT__PREFIX="!"`). The `BOT_TOKEN`
//! variable overrides `telegram.token`.

use std::collections::HashSet;

use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::Deserialize;
use thiserror::Error;

/// Errors raised while loading the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file or the environment could not be extracted into [`Config`].
    #[error("invalid configuration: {0}")]
    Extract(#[from] Box<figment::Error>),
    /// No bot token was provided by the file nor by `BOT_TOKEN`.
    #[error("bot token not provided, set BOT_TOKEN or telegram.token")]
    MissingToken,
    /// The command prefix is empty, every message would be a command.
    #[error("command prefix must not be empty")]
    EmptyPrefix,
}

/// Root configuration structure.
#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    /// Telegram credentials
    #[serde(default)]
    pub telegram: Telegram,
    /// Dispatcher settings
    #[serde(default)]
    pub bot: BotSettings,
    /// Command manifests location
    #[serde(default)]
    pub commands: Commands,
    /// Upstream endpoints of the ffinfo command
    #[serde(default)]
    pub ffinfo: FfInfo,
}

/// Telegram Bot API credentials.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct Telegram {
    /// Bot API token.
    #[serde(default)]
    pub token: String,
}

/// Settings driving the message dispatcher.
#[derive(Deserialize, Debug, Clone)]
pub struct BotSettings {
    /// Prefix a message must start with to be treated as a command.
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// Telegram user ids allowed to run admin-only commands.
    #[serde(default)]
    pub admins: HashSet<u64>,
    /// Default locale of the replies.
    #[serde(default = "default_language")]
    pub language: String,
    /// Reply for unknown commands. Unknown commands are ignored when `None`.
    #[serde(default)]
    pub command_not_found_message: Option<String>,
}

impl Default for BotSettings {
    fn default() -> Self {
        BotSettings {
            prefix: default_prefix(),
            admins: HashSet::new(),
            language: default_language(),
            command_not_found_message: None,
        }
    }
}

/// Location of the command manifests.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct Commands {
    /// Glob patterns matching manifest files.
    ///
    /// When empty, every built-in command is registered with its default descriptor.
    #[serde(default)]
    pub manifests: Vec<String>,
}

/// Upstream services queried by the ffinfo command.
#[derive(Deserialize, Debug, Clone)]
pub struct FfInfo {
    /// Base URL of the first player-data provider.
    #[serde(default = "default_info_url")]
    pub info_url: String,
    /// Base URL of the second player-data provider.
    #[serde(default = "default_player_url")]
    pub player_url: String,
    /// Base URL of the profile image generator.
    #[serde(default = "default_outfit_url")]
    pub outfit_url: String,
    /// Region used when the user doesn't give one.
    #[serde(default = "default_region")]
    pub default_region: String,
}

impl Default for FfInfo {
    fn default() -> Self {
        FfInfo {
            info_url: default_info_url(),
            player_url: default_player_url(),
            outfit_url: default_outfit_url(),
            default_region: default_region(),
        }
    }
}

fn default_prefix() -> String {
    "/".to_owned()
}

fn default_language() -> String {
    "en".to_owned()
}

fn default_info_url() -> String {
    "https://nodejs-info.vercel.app".to_owned()
}

fn default_player_url() -> String {
    "https://aditya-info-v8op.onrender.com".to_owned()
}

fn default_outfit_url() -> String {
    "https://aimguard-outfit.vercel.app".to_owned()
}

fn default_region() -> String {
    "bd".to_owned()
}

impl Config {
    /// Loads the configuration from a YAML file merged with the environment.
    ///
    /// Precedence, from lowest to highest: the YAML file, `TELECMD_*` variables,
    /// `BOT_TOKEN`. A missing file is not an error as long as the environment
    /// provides the token.
    ///
    /// # Errors
    ///
    /// Returns an error if the sources can't be extracted, if no token is
    /// provided or if the prefix is empty.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let mut config: Config = Figment::new()
            .merge(Yaml::file(path))
            .merge(Env::prefixed("TELECMD_").split("__"))
            .merge(
                Env::raw()
                    .only(&["BOT_TOKEN"])
                    .map(|_| "telegram.token".into()),
            )
            .extract()
            .map_err(Box::new)?;

        if config.telegram.token.trim().is_empty() {
            return Err(ConfigError::MissingToken);
        }
        if config.bot.prefix.is_empty() {
            return Err(ConfigError::EmptyPrefix);
        }

        // Normalize endpoints, the requester appends the paths itself
        for url in [
            &mut config.ffinfo.info_url,
            &mut config.ffinfo.player_url,
            &mut config.ffinfo.outfit_url,
        ] {
            while url.ends_with('/') {
                url.pop();
            }
        }
        config.ffinfo.default_region = config.ffinfo.default_region.to_lowercase();

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use figment::Jail;

    use super::*;

    #[test]
    fn test_load_full_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.yaml",
                r#"
telegram:
  token: "123:abc"
bot:
  prefix: "!"
  admins: [1, 2]
  language: bn
  command_not_found_message: "nope"
commands:
  manifests: ["commands/*.yaml"]
ffinfo:
  info_url: "http://info.local/"
  player_url: "http://player.local"
  outfit_url: "http://outfit.local//"
  default_region: IND
"#,
            )?;

            let config = Config::load("config.yaml").expect("config should load");
            assert_eq!(config.telegram.token, "123:abc");
            assert_eq!(config.bot.prefix, "!");
            assert!(config.bot.admins.contains(&1));
            assert!(config.bot.admins.contains(&2));
            assert_eq!(config.bot.language, "bn");
            assert_eq!(config.bot.command_not_found_message.as_deref(), Some("nope"));
            assert_eq!(config.commands.manifests, vec!["commands/*.yaml"]);
            assert_eq!(config.ffinfo.info_url, "http://info.local");
            assert_eq!(config.ffinfo.outfit_url, "http://outfit.local");
            assert_eq!(config.ffinfo.default_region, "ind");
            Ok(())
        });
    }

    #[test]
    fn test_load_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file("config.yaml", "telegram:\n  token: \"t\"\n")?;

            let config = Config::load("config.yaml").expect("config should load");
            assert_eq!(config.bot.prefix, "/");
            assert!(config.bot.admins.is_empty());
            assert_eq!(config.bot.language, "en");
            assert!(config.bot.command_not_found_message.is_none());
            assert!(config.commands.manifests.is_empty());
            assert_eq!(config.ffinfo.default_region, "bd");
            assert_eq!(config.ffinfo.info_url, "https://nodejs-info.vercel.app");
            Ok(())
        });
    }

    #[test]
    fn test_bot_token_env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file("config.yaml", "telegram:\n  token: \"from-file\"\n")?;
            jail.set_env("BOT_TOKEN", "from-env");

            let config = Config::load("config.yaml").expect("config should load");
            assert_eq!(config.telegram.token, "from-env");
            Ok(())
        });
    }

    #[test]
    fn test_prefixed_env_overrides_nested_value() {
        Jail::expect_with(|jail| {
            jail.create_file("config.yaml", "telegram:\n  token: \"t\"\n")?;
            jail.set_env("TELECMD_BOT__PREFIX", "#");

            let config = Config::load("config.yaml").expect("config should load");
            assert_eq!(config.bot.prefix, "#");
            Ok(())
        });
    }

    #[test]
    fn test_missing_file_with_env_token() {
        Jail::expect_with(|jail| {
            jail.set_env("BOT_TOKEN", "only-env");

            let config = Config::load("missing.yaml").expect("config should load");
            assert_eq!(config.telegram.token, "only-env");
            Ok(())
        });
    }

    #[test]
    fn test_missing_token_is_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file("config.yaml", "bot:\n  prefix: \"/\"\n")?;

            let result = Config::load("config.yaml");
            assert!(matches!(result, Err(ConfigError::MissingToken)));
            Ok(())
        });
    }

    #[test]
    fn test_empty_prefix_is_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.yaml",
                "telegram:\n  token: \"t\"\nbot:\n  prefix: \"\"\n",
            )?;

            let result = Config::load("config.yaml");
            assert!(matches!(result, Err(ConfigError::EmptyPrefix)));
            Ok(())
        });
    }
}
