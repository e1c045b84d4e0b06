//! Markdown report of a Free Fire player.
//!
//! Each line merges the two providers: the first truthy value of the first
//! provider, then of the second one, then a placeholder.

use std::fmt::Write;

use chrono::DateTime;

use crate::freefire::response_structs::{
    BasicInfo, CaptainInfo, ClanInfo, GuildOwner, PlayerInfoResponse, ProfileGuild, ProfilePet,
    ProfilePlayer, ProfileResponse, Scalar, SocialInfo,
};

const TIMESTAMP_FORMAT: &str = "%-m/%-d/%Y, %H:%M:%S";

/// First truthy candidate, or `placeholder`.
fn pick(candidates: &[Option<&Scalar>], placeholder: &str) -> String {
    candidates
        .iter()
        .flatten()
        .find(|value| value.is_truthy())
        .map_or_else(|| placeholder.to_owned(), |value| value.to_string())
}

/// Formats a unix timestamp in UTC, `-` when absent or invalid.
fn format_timestamp(value: Option<&Scalar>) -> String {
    value
        .filter(|value| value.is_truthy())
        .and_then(Scalar::as_seconds)
        .and_then(|seconds| DateTime::from_timestamp(seconds, 0))
        .map_or_else(|| "-".to_owned(), |date| date.format(TIMESTAMP_FORMAT).to_string())
}

/// Renders the caption of the player card.
///
/// Returns `None` when either provider has no `player_info`.
///
/// # Arguments
///
/// * `uid` - The requested player id
/// * `region` - The region sent to the providers
/// * `profile` - Response of the first provider
/// * `player_info` - Response of the second provider
pub fn render(
    uid: &str,
    region: &str,
    profile: &ProfileResponse,
    player_info: &PlayerInfoResponse,
) -> Option<String> {
    let data = profile.data.as_ref()?;
    let p1 = data.player_info.as_ref()?;
    let info = player_info.player_info.as_ref()?;

    let default_pet = ProfilePet::default();
    let default_guild = ProfileGuild::default();
    let default_owner = GuildOwner::default();
    let default_basic = BasicInfo::default();
    let default_captain = CaptainInfo::default();
    let default_clan = ClanInfo::default();
    let default_social = SocialInfo::default();

    let pet1 = data.pet_info.as_ref().unwrap_or(&default_pet);
    let guild1 = data.guild_info.as_ref().unwrap_or(&default_guild);
    let owner1 = guild1.owner_basic_info.as_ref().unwrap_or(&default_owner);
    let p2 = info.basic_info.as_ref().unwrap_or(&default_basic);
    let captain = info.captain_basic_info.as_ref().unwrap_or(&default_captain);
    let clan = info.clan_basic_info.as_ref().unwrap_or(&default_clan);
    let pet2 = info.pet_info.as_ref().unwrap_or(&default_pet);
    let social = info.social_info.as_ref().unwrap_or(&default_social);

    let credit_score = info
        .credit_score_info
        .as_ref()
        .and_then(|credit| credit.credit_score.as_ref());
    let diamond_cost = info
        .diamond_cost_res
        .as_ref()
        .and_then(|cost| cost.diamond_cost.as_ref());
    let prime_level = p2
        .prime_level
        .as_ref()
        .and_then(|prime| prime.level.as_ref());
    let weapon_skins = p2
        .weapon_skin_shows
        .iter()
        .flatten()
        .filter(|skin| skin.is_truthy())
        .map(Scalar::to_string)
        .collect::<Vec<_>>()
        .join(", ");

    let mut card = String::from("🎮 *FREE FIRE PLAYER INFO*\n\n");
    write_identity(&mut card, uid, p1, p2, social);

    // Writing into a String can't fail
    let _ = write!(
        card,
        "🎖 *Badges:* {} | ID: {}\n\
         🚩 *Banner ID:* {}\n\
         🖼 *Avatar ID:* {}\n\
         🏷 *Title ID:* {}\n\n",
        pick(&[p2.badge_cnt.as_ref()], "-"),
        pick(&[p2.badge_id.as_ref()], "-"),
        pick(&[p1.banner_id.as_ref(), p2.banner_id.as_ref()], "-"),
        pick(&[p1.avatar_id.as_ref(), p2.head_pic.as_ref()], "-"),
        pick(&[p1.title_id.as_ref(), p2.title.as_ref()], "-"),
    );

    let _ = write!(
        card,
        "🏆 *Battle Stats:*\n \
         - BR Rank: {}\n \
         - CS Rank: {}\n \
         - BP Level: {}\n \
         - Max Rank: {} | CS Max: {}\n \
         - Season: {}\n \
         - Diamond Cost: {}\n\n",
        pick(&[p1.br_rank_points.as_ref(), p2.ranking_points.as_ref()], "-"),
        pick(&[p1.cs_rank_points.as_ref(), p2.cs_ranking_points.as_ref()], "-"),
        pick(&[p1.bp_level.as_ref(), prime_level], "-"),
        pick(&[p2.max_rank.as_ref()], "-"),
        pick(&[p2.cs_max_rank.as_ref()], "-"),
        pick(&[p2.season_id.as_ref()], "-"),
        pick(&[diamond_cost], "-"),
    );

    let _ = write!(
        card,
        "🐾 *Pet Info:*\n \
         - Name: {}\n \
         - Level: {}\n \
         - Exp: {}\n\n",
        pick(&[pet1.name.as_ref(), pet2.name.as_ref()], "None"),
        pick(&[pet1.level.as_ref(), pet2.level.as_ref()], "-"),
        pick(&[pet1.exp.as_ref(), pet2.exp.as_ref()], "-"),
    );

    let _ = write!(
        card,
        "🏰 *Guild/Clan Info:*\n \
         - Name: {}\n \
         - Level: {}\n \
         - Members: {}\n \
         - Owner: {} (Lvl: {})\n\n",
        pick(&[guild1.name.as_ref(), clan.clan_name.as_ref()], "None"),
        pick(&[guild1.level.as_ref(), clan.clan_level.as_ref()], "-"),
        pick(&[guild1.members.as_ref(), clan.member_num.as_ref()], "-"),
        pick(&[owner1.nickname.as_ref(), captain.nickname.as_ref()], "Unknown"),
        pick(&[owner1.level.as_ref(), captain.level.as_ref()], "-"),
    );

    let _ = write!(
        card,
        "🎯 *Social Info:*\n \
         - Gender: {}\n \
         - Language: {}\n \
         - Mode Pref: {}\n \
         - Rank Show: {}\n \
         - Active: {}\n \
         - Honor Score: {}\n\n",
        pick(&[social.gender.as_ref()], "-"),
        pick(&[social.language.as_ref()], "-"),
        pick(&[social.mode_prefer.as_ref()], "-"),
        pick(&[social.rank_show.as_ref()], "-"),
        pick(&[social.time_active.as_ref()], "-"),
        pick(&[credit_score], "-"),
    );

    let weapon_skins = if weapon_skins.is_empty() {
        "-"
    } else {
        weapon_skins.as_str()
    };
    let _ = write!(
        card,
        "🔫 *Weapon Skins:* {}\n\n📌 *Region Used:* {}",
        weapon_skins, region
    );

    Some(card)
}

fn write_identity(
    card: &mut String,
    uid: &str,
    p1: &ProfilePlayer,
    p2: &BasicInfo,
    social: &SocialInfo,
) {
    let created = match p1.account_created.as_ref().filter(|value| value.is_truthy()) {
        Some(value) => value.to_string(),
        None => format_timestamp(p2.create_at.as_ref()),
    };
    let last_login = match p1.last_login.as_ref().filter(|value| value.is_truthy()) {
        Some(value) => value.to_string(),
        None => format_timestamp(p2.last_login_at.as_ref()),
    };

    let _ = write!(
        card,
        "👤 *Nickname:* {}\n\
         🆔 *UID:* {}\n\
         🏅 *Level:* {} (Exp: {})\n\
         ❤️ *Likes:* {}\n\
         🌍 *Region:* {}\n\
         📅 *Account Created:* {}\n\
         ⏰ *Last Login:* {}\n\
         🖋 *Signature:* {}\n\n",
        pick(&[p1.nikname.as_ref(), p2.nickname.as_ref()], "Unknown"),
        uid,
        pick(&[p1.level.as_ref(), p2.level.as_ref()], "-"),
        pick(&[p1.exp.as_ref(), p2.exp.as_ref()], "-"),
        pick(&[p1.likes.as_ref(), p2.liked.as_ref()], "-"),
        pick(&[p1.region.as_ref(), p2.region.as_ref()], "-"),
        created,
        last_login,
        pick(&[p1.signature.as_ref(), social.signature.as_ref()], "None"),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(body: &str) -> ProfileResponse {
        serde_json::from_str(body).unwrap()
    }

    fn player_info(body: &str) -> PlayerInfoResponse {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn test_pick_first_truthy() {
        let empty = Scalar::Text(String::new());
        let zero: Scalar = serde_json::from_str("0").unwrap();
        let name = Scalar::Text("Ada".to_string());
        let other = Scalar::Text("Bob".to_string());

        assert_eq!(pick(&[Some(&name), Some(&other)], "-"), "Ada");
        assert_eq!(pick(&[None, Some(&other)], "-"), "Bob");
        assert_eq!(pick(&[Some(&empty), Some(&zero)], "-"), "-");
        assert_eq!(pick(&[], "None"), "None");
    }

    #[test]
    fn test_format_timestamp() {
        let seconds: Scalar = serde_json::from_str("1600000000").unwrap();
        assert_eq!(format_timestamp(Some(&seconds)), "9/13/2020, 12:26:40");

        let text = Scalar::Text("1600000000".to_string());
        assert_eq!(format_timestamp(Some(&text)), "9/13/2020, 12:26:40");

        let zero: Scalar = serde_json::from_str("0").unwrap();
        assert_eq!(format_timestamp(Some(&zero)), "-");
        assert_eq!(format_timestamp(None), "-");
        assert_eq!(format_timestamp(Some(&Scalar::Text("soon".to_string()))), "-");
    }

    #[test]
    fn test_render_requires_both_providers() {
        let full_profile = profile(r#"{"data": {"player_info": {}}}"#);
        let full_info = player_info(r#"{"player_info": {}}"#);

        assert!(render("1", "bd", &profile("{}"), &full_info).is_none());
        assert!(render("1", "bd", &profile(r#"{"data": {}}"#), &full_info).is_none());
        assert!(render("1", "bd", &full_profile, &player_info("{}")).is_none());
        assert!(render("1", "bd", &full_profile, &full_info).is_some());
    }

    #[test]
    fn test_render_merges_providers() {
        let profile = profile(
            r#"{"data": {
                "player_info": {"nikname": "Ada", "level": 0, "likes": "", "signature": "gg"},
                "guildInfo": {"name": "Crew"}
            }}"#,
        );
        let info = player_info(
            r#"{"player_info": {
                "basicInfo": {
                    "nickname": "Other", "level": 61, "liked": 1200,
                    "createAt": 1600000000, "weaponSkinShows": [907, 908]
                },
                "captainBasicInfo": {"nickname": "Bob", "level": 70},
                "petInfo": {"name": "Rockie"},
                "creditScoreInfo": {"creditScore": 100}
            }}"#,
        );

        let card = render("1234567890", "sg", &profile, &info).unwrap();

        assert!(card.starts_with("🎮 *FREE FIRE PLAYER INFO*\n\n"));
        assert!(card.contains("👤 *Nickname:* Ada\n"));
        assert!(card.contains("🆔 *UID:* 1234567890\n"));
        assert!(card.contains("🏅 *Level:* 61 (Exp: -)\n"));
        assert!(card.contains("❤️ *Likes:* 1200\n"));
        assert!(card.contains("📅 *Account Created:* 9/13/2020, 12:26:40\n"));
        assert!(card.contains("⏰ *Last Login:* -\n"));
        assert!(card.contains("🖋 *Signature:* gg\n"));
        assert!(card.contains(" - Name: Rockie\n"));
        assert!(card.contains(" - Name: Crew\n"));
        assert!(card.contains(" - Owner: Bob (Lvl: 70)\n"));
        assert!(card.contains(" - Honor Score: 100\n"));
        assert!(card.contains("🔫 *Weapon Skins:* 907, 908\n"));
        assert!(card.ends_with("📌 *Region Used:* sg"));
    }

    #[test]
    fn test_render_placeholders() {
        let card = render(
            "42",
            "bd",
            &profile(r#"{"data": {"player_info": {}}}"#),
            &player_info(r#"{"player_info": {}}"#),
        )
        .unwrap();

        assert!(card.contains("👤 *Nickname:* Unknown\n"));
        assert!(card.contains("🖋 *Signature:* None\n"));
        assert!(card.contains("🎖 *Badges:* - | ID: -\n"));
        assert!(card.contains(" - Owner: Unknown (Lvl: -)\n"));
        assert!(card.contains("🔫 *Weapon Skins:* -\n"));
    }

    #[test]
    fn test_render_null_sections() {
        let card = render(
            "42",
            "bd",
            &profile(r#"{"data": {"player_info": {"nikname": "Ada"}}}"#),
            &player_info(
                r#"{"player_info": {"basicInfo": {"weaponSkinShows": null, "primeLevel": 0}}}"#,
            ),
        )
        .unwrap();

        assert!(card.contains("👤 *Nickname:* Ada\n"));
        assert!(card.contains(" - BP Level: -\n"));
        assert!(card.contains("🔫 *Weapon Skins:* -\n"));
    }

    #[test]
    fn test_render_skips_empty_weapon_skins() {
        let card = render(
            "42",
            "bd",
            &profile(r#"{"data": {"player_info": {}}}"#),
            &player_info(
                r#"{"player_info": {"basicInfo": {"weaponSkinShows": [907, null, "", 0, 908]}}}"#,
            ),
        )
        .unwrap();

        assert!(card.contains("🔫 *Weapon Skins:* 907, 908\n"));
    }
}
