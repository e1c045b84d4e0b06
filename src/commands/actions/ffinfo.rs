//! `ffinfo` command handler.
//!
//! Looks up a Free Fire player by UID. The two profile providers and the
//! outfit generator are queried concurrently, then the merged report is
//! sent as the caption of the outfit image.

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use log::{error, info};

use crate::{
    commands::{CommandHandler, Descriptor, ExecutionContext, Role},
    freefire::{self, PlayerRequester},
};

/// Descriptor used when no manifest declares the command.
pub fn ffinfo_descriptor() -> Descriptor {
    Descriptor {
        name: "ffinfo".to_string(),
        version: "1.5".to_string(),
        author: "Himu Mals".to_string(),
        short_description: "Get Free Fire player info by UID".to_string(),
        category: "Games".to_string(),
        role: Role::Public,
        guide: HashMap::from([("en".to_string(), "{pn} <uid> [region]".to_string())]),
    }
}

fn is_valid_uid(uid: &str) -> bool {
    !uid.is_empty() && uid.bytes().all(|byte| byte.is_ascii_digit())
}

/// Handler of `ffinfo <uid> [region]`.
pub struct FfInfoCommand<R: PlayerRequester> {
    requester: R,
    /// Region used when the second argument is missing
    default_region: String,
}

impl<R: PlayerRequester> FfInfoCommand<R> {
    /// Create a new [FfInfoCommand].
    ///
    /// # Arguments
    ///
    /// * `requester` - Client of the upstream providers
    /// * `default_region` - Region used when none is given
    pub fn new(requester: R, default_region: &str) -> Self {
        FfInfoCommand {
            requester,
            default_region: default_region.to_lowercase(),
        }
    }
}

#[async_trait]
impl<R: PlayerRequester> CommandHandler for FfInfoCommand<R> {
    async fn run(&self, ctx: ExecutionContext) -> Result<()> {
        let Some(uid) = ctx.args.first().filter(|uid| is_valid_uid(uid)) else {
            let usage = ctx
                .translator
                .t_with("ffinfo.usage", &[("prefix", ctx.prefix.as_str())]);
            return ctx.reply_markdown(&usage).await;
        };
        let region = ctx
            .args
            .get(1)
            .map_or_else(|| self.default_region.clone(), |region| region.to_lowercase());

        info!("lookup free fire player {} in region {}", uid, region);

        let lookup = tokio::try_join!(
            self.requester.get_profile(uid),
            self.requester.get_player_info(uid, &region),
            self.requester.get_outfit(uid, &region)
        );
        let (profile, player_info, outfit) = match lookup {
            Ok(responses) => responses,
            Err(e) => {
                error!("failed to fetch free fire player {}: {:?}", uid, e);
                return ctx.reply(&ctx.translator.t("ffinfo.failed")).await;
            }
        };

        let Some(card) = freefire::render(uid, &region, &profile, &player_info) else {
            info!("no free fire player {} in region {}", uid, region);
            return ctx.reply(&ctx.translator.t("ffinfo.no_data")).await;
        };

        if let Err(e) = ctx.reply_photo(outfit, &card).await {
            error!("failed to send card of free fire player {}: {:?}", uid, e);
            return ctx.reply(&ctx.translator.t("ffinfo.failed")).await;
        }

        Ok(())
    }
}
