//! Help command handler.
//!
//! Without argument, lists the registered commands grouped by category.
//! With a command name, shows the details and usage guide of that command.

use std::collections::{BTreeMap, HashMap};

use anyhow::Result;
use async_trait::async_trait;
use log::debug;

use crate::commands::{CommandHandler, Descriptor, ExecutionContext, Role};

const UNCATEGORIZED: &str = "Other";

/// Descriptor used when no manifest declares the command.
pub fn help_descriptor() -> Descriptor {
    Descriptor {
        name: "help".to_string(),
        version: "1.0".to_string(),
        author: "telecmd".to_string(),
        short_description: "List commands or show how to use one".to_string(),
        category: "General".to_string(),
        role: Role::Public,
        guide: HashMap::from([("en".to_string(), "{pn} [command]".to_string())]),
    }
}

/// Handler of `help [command]`.
pub struct HelpCommand;

#[async_trait]
impl CommandHandler for HelpCommand {
    async fn run(&self, ctx: ExecutionContext) -> Result<()> {
        debug!("handling help command with {:?}", ctx.args);

        let text = match ctx.args.first() {
            None => format_command_list(&ctx),
            Some(name) => match ctx.registry.lookup(name) {
                Some(command) => format_command_detail(&ctx, &command.descriptor),
                None => ctx
                    .translator
                    .t_with("help.unknown", &[("name", escape_markdown(name).as_str())]),
            },
        };

        ctx.reply_markdown(&text).await
    }
}

/// Escapes the characters that open an entity in Telegram legacy Markdown.
fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '_' | '*' | '`' | '[') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() { "-" } else { value }
}

fn format_command_list(ctx: &ExecutionContext) -> String {
    let mut categories: BTreeMap<&str, Vec<&Descriptor>> = BTreeMap::new();
    for descriptor in ctx.registry.descriptors() {
        let category = if descriptor.category.is_empty() {
            UNCATEGORIZED
        } else {
            descriptor.category.as_str()
        };
        categories.entry(category).or_default().push(descriptor);
    }

    let admin_only = ctx.translator.t("help.admin_only");
    let mut text = ctx.translator.t("help.title");
    for (category, descriptors) in categories {
        text.push_str(&format!("\n\n*{}*", category));
        for descriptor in descriptors {
            let lock = match descriptor.role {
                Role::Admin => format!(" {}", admin_only),
                Role::Public => String::new(),
            };
            text.push_str(&format!(
                "\n• {}{}: {}",
                descriptor.name,
                lock,
                or_dash(&descriptor.short_description)
            ));
        }
    }

    text.push_str("\n\n");
    text.push_str(
        &ctx.translator
            .t_with("help.footer", &[("prefix", ctx.prefix.as_str())]),
    );
    text
}

fn format_command_detail(ctx: &ExecutionContext, descriptor: &Descriptor) -> String {
    let usage = descriptor
        .usage(ctx.translator.locale(), &ctx.prefix)
        .unwrap_or_else(|| ctx.translator.t("help.no_usage"));

    ctx.translator.t_with(
        "help.detail",
        &[
            ("name", descriptor.name.as_str()),
            ("version", or_dash(&descriptor.version)),
            ("author", or_dash(&descriptor.author)),
            ("description", or_dash(&descriptor.short_description)),
            ("category", or_dash(&descriptor.category)),
            ("usage", usage.as_str()),
        ],
    )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        commands::{CommandRegistry, MockCommandHandler, actions::ffinfo_descriptor},
        i18n::Translator,
        telegram::{InboundMessage, MockMessenger, TextFormat},
    };

    fn create_registry() -> Arc<CommandRegistry> {
        let mut builder = CommandRegistry::builder();
        builder
            .register(ffinfo_descriptor(), Arc::new(MockCommandHandler::new()))
            .unwrap();
        builder
            .register(help_descriptor(), Arc::new(MockCommandHandler::new()))
            .unwrap();
        builder
            .register(
                Descriptor {
                    name: "ban".to_string(),
                    short_description: "Ban a user".to_string(),
                    category: "Admin".to_string(),
                    role: Role::Admin,
                    ..Default::default()
                },
                Arc::new(MockCommandHandler::new()),
            )
            .unwrap();
        Arc::new(builder.build())
    }

    fn create_context(messenger: MockMessenger, args: &[&str], prefix: &str) -> ExecutionContext {
        ExecutionContext {
            messenger: Arc::new(messenger),
            message: InboundMessage {
                chat_id: 3,
                ..Default::default()
            },
            args: args.iter().map(|arg| arg.to_string()).collect(),
            translator: Arc::new(Translator::new("en").unwrap()),
            prefix: prefix.to_string(),
            registry: create_registry(),
        }
    }

    fn expect_markdown<F>(messenger: &mut MockMessenger, check: F)
    where
        F: Fn(&str) -> bool + Send + 'static,
    {
        messenger
            .expect_send_text()
            .withf(move |chat_id, text, format| {
                *chat_id == 3 && *format == TextFormat::Markdown && check(text)
            })
            .times(1)
            .returning(|_, _, _| Ok(()));
    }

    #[tokio::test]
    async fn test_lists_commands_by_category() {
        let mut messenger = MockMessenger::new();
        expect_markdown(&mut messenger, |text| {
            let admin = text.find("*Admin*");
            let games = text.find("*Games*");
            let general = text.find("*General*");
            text.starts_with("📜 *Commands*")
                && admin < games
                && games < general
                && admin.is_some()
                && text.contains("• ban 🔒: Ban a user")
                && text.contains("• ffinfo: Get Free Fire player info by UID")
                && text.contains("• help: List commands or show how to use one")
                && text.ends_with("Type `!help <command>` for details.")
        });

        HelpCommand
            .run(create_context(messenger, &[], "!"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_describes_command() {
        let mut messenger = MockMessenger::new();
        expect_markdown(&mut messenger, |text| {
            text.starts_with("📘 *ffinfo* (v1.5) by Himu Mals")
                && text.contains("*Category:* Games")
                && text.contains("*Usage:* /ffinfo <uid> [region]")
        });

        HelpCommand
            .run(create_context(messenger, &["FFINFO"], "/"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_describes_command_without_guide() {
        let mut messenger = MockMessenger::new();
        expect_markdown(&mut messenger, |text| {
            text.starts_with("📘 *ban* (v-) by -") && text.contains("*Usage:* no usage guide")
        });

        HelpCommand
            .run(create_context(messenger, &["ban"], "/"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_unknown_command() {
        let mut messenger = MockMessenger::new();
        expect_markdown(&mut messenger, |text| {
            text == "❓ Command eval does not exist."
        });

        HelpCommand
            .run(create_context(messenger, &["eval"], "/"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_unknown_command_name_is_escaped() {
        let mut messenger = MockMessenger::new();
        expect_markdown(&mut messenger, |text| {
            text == r"❓ Command my\_cmd\*\`x\[ does not exist."
        });

        HelpCommand
            .run(create_context(messenger, &["my_cmd*`x["], "/"))
            .await
            .unwrap();
    }

    #[test]
    fn test_escape_markdown() {
        assert_eq!(escape_markdown("ffinfo"), "ffinfo");
        assert_eq!(escape_markdown("a_b"), r"a\_b");
        assert_eq!(escape_markdown("*[`"), r"\*\[\`");
    }
}
