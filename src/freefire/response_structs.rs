//! Response structures of the Free Fire profile providers.
//!
//! Both providers are loosely typed: the same field can come back as a
//! string, a number or be missing. Every displayed field is therefore a
//! [`Scalar`] and every structure defaults to empty values.

use std::fmt;

use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use serde_json::{Number, Value};

/// Deserializes a section, turning `null` or a value of the wrong shape
/// into `None` instead of failing the whole response.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).ok())
}

/// A loosely typed JSON leaf value.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum Scalar {
    Text(String),
    Number(Number),
    Flag(bool),
    /// Arrays and objects where a leaf was expected
    Other(Value),
}

impl Scalar {
    /// Whether the value is worth displaying.
    ///
    /// Empty strings, zero and `false` are not.
    pub fn is_truthy(&self) -> bool {
        match self {
            Scalar::Text(text) => !text.is_empty(),
            Scalar::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
            Scalar::Flag(flag) => *flag,
            Scalar::Other(value) => !value.is_null(),
        }
    }

    /// Reads the value as a whole number of seconds.
    pub fn as_seconds(&self) -> Option<i64> {
        match self {
            Scalar::Text(text) => text.trim().parse().ok(),
            Scalar::Number(number) => number
                .as_i64()
                .or_else(|| number.as_f64().map(|n| n as i64)),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Scalar::Text(text) => write!(f, "{}", text),
            Scalar::Number(number) => write!(f, "{}", number),
            Scalar::Flag(flag) => write!(f, "{}", flag),
            Scalar::Other(value) => write!(f, "{}", value),
        }
    }
}

/// Response from `{info_url}/info?uid={uid}`.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct ProfileResponse {
    #[serde(deserialize_with = "lenient")]
    pub data: Option<ProfileData>,
}

/// Payload of a [`ProfileResponse`].
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct ProfileData {
    #[serde(deserialize_with = "lenient")]
    pub player_info: Option<ProfilePlayer>,
    #[serde(rename = "petInfo", deserialize_with = "lenient")]
    pub pet_info: Option<ProfilePet>,
    #[serde(rename = "guildInfo", deserialize_with = "lenient")]
    pub guild_info: Option<ProfileGuild>,
}

/// Player section of the first provider.
///
/// `nikname` is the actual spelling used by the provider.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct ProfilePlayer {
    pub nikname: Option<Scalar>,
    pub level: Option<Scalar>,
    pub exp: Option<Scalar>,
    pub likes: Option<Scalar>,
    pub region: Option<Scalar>,
    pub account_created: Option<Scalar>,
    pub last_login: Option<Scalar>,
    pub signature: Option<Scalar>,
    pub banner_id: Option<Scalar>,
    pub avatar_id: Option<Scalar>,
    pub title_id: Option<Scalar>,
    pub br_rank_points: Option<Scalar>,
    pub cs_rank_points: Option<Scalar>,
    pub bp_level: Option<Scalar>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct ProfilePet {
    pub name: Option<Scalar>,
    pub level: Option<Scalar>,
    pub exp: Option<Scalar>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct ProfileGuild {
    pub name: Option<Scalar>,
    pub level: Option<Scalar>,
    pub members: Option<Scalar>,
    #[serde(deserialize_with = "lenient")]
    pub owner_basic_info: Option<GuildOwner>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct GuildOwner {
    pub nickname: Option<Scalar>,
    pub level: Option<Scalar>,
}

/// Response from `{player_url}/player-info?uid={uid}&region={region}`.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct PlayerInfoResponse {
    #[serde(deserialize_with = "lenient")]
    pub player_info: Option<PlayerInfo>,
}

/// Player sections of the second provider.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct PlayerInfo {
    #[serde(deserialize_with = "lenient")]
    pub basic_info: Option<BasicInfo>,
    #[serde(deserialize_with = "lenient")]
    pub captain_basic_info: Option<CaptainInfo>,
    #[serde(deserialize_with = "lenient")]
    pub clan_basic_info: Option<ClanInfo>,
    #[serde(deserialize_with = "lenient")]
    pub pet_info: Option<ProfilePet>,
    #[serde(deserialize_with = "lenient")]
    pub social_info: Option<SocialInfo>,
    #[serde(deserialize_with = "lenient")]
    pub credit_score_info: Option<CreditScoreInfo>,
    #[serde(deserialize_with = "lenient")]
    pub diamond_cost_res: Option<DiamondCost>,
}

/// Account details of the second provider.
///
/// `create_at` and `last_login_at` are unix timestamps in seconds.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct BasicInfo {
    pub nickname: Option<Scalar>,
    pub level: Option<Scalar>,
    pub exp: Option<Scalar>,
    pub liked: Option<Scalar>,
    pub region: Option<Scalar>,
    pub create_at: Option<Scalar>,
    pub last_login_at: Option<Scalar>,
    pub badge_cnt: Option<Scalar>,
    pub badge_id: Option<Scalar>,
    pub banner_id: Option<Scalar>,
    pub head_pic: Option<Scalar>,
    pub title: Option<Scalar>,
    pub ranking_points: Option<Scalar>,
    pub cs_ranking_points: Option<Scalar>,
    #[serde(deserialize_with = "lenient")]
    pub prime_level: Option<PrimeLevel>,
    pub max_rank: Option<Scalar>,
    pub cs_max_rank: Option<Scalar>,
    pub season_id: Option<Scalar>,
    #[serde(deserialize_with = "lenient")]
    pub weapon_skin_shows: Option<Vec<Scalar>>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct PrimeLevel {
    pub level: Option<Scalar>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct CaptainInfo {
    pub nickname: Option<Scalar>,
    pub level: Option<Scalar>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct ClanInfo {
    pub clan_name: Option<Scalar>,
    pub clan_level: Option<Scalar>,
    pub member_num: Option<Scalar>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct SocialInfo {
    pub signature: Option<Scalar>,
    pub gender: Option<Scalar>,
    pub language: Option<Scalar>,
    pub mode_prefer: Option<Scalar>,
    pub rank_show: Option<Scalar>,
    pub time_active: Option<Scalar>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct CreditScoreInfo {
    pub credit_score: Option<Scalar>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct DiamondCost {
    pub diamond_cost: Option<Scalar>,
}
