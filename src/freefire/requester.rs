//! HTTP client for the Free Fire profile providers.
//!
//! This module provides the [`FreeFireRequester`] struct, which queries the
//! two profile providers and the outfit image generator.

use anyhow::Result;
use async_trait::async_trait;
use log::{debug, info};
use mockall::automock;
use reqwest::Client;

use crate::freefire::response_structs::{PlayerInfoResponse, ProfileResponse};

/// HTTP client for requesting Free Fire player data.
///
/// # Examples
///
/// ```no_run
/// let requester = FreeFireRequester::new(
///     "https://nodejs-info.vercel.app",
///     "https://aditya-info-v8op.onrender.com",
///     "https://aimguard-outfit.vercel.app",
/// );
/// let profile = requester.get_profile("1234567890").await?;
/// ```
pub struct FreeFireRequester {
    /// Base url of the first profile provider
    info_url: String,
    /// Base url of the second profile provider
    player_url: String,
    /// Base url of the outfit image generator
    outfit_url: String,
    /// HTTP client
    client: Client,
}

/// Trait for requesting player data.
///
/// This trait abstracts the HTTP operations for easier testing with mocks.
/// Non-success statuses are errors.
#[automock]
#[async_trait]
pub trait PlayerRequester: Send + Sync {
    /// Fetches the profile of the first provider.
    async fn get_profile(&self, uid: &str) -> Result<ProfileResponse>;
    /// Fetches the profile of the second provider.
    async fn get_player_info(&self, uid: &str, region: &str) -> Result<PlayerInfoResponse>;
    /// Fetches the generated outfit image.
    async fn get_outfit(&self, uid: &str, region: &str) -> Result<Vec<u8>>;
}

impl FreeFireRequester {
    /// Create a new [FreeFireRequester].
    ///
    /// # Arguments
    ///
    /// * `info_url` - Base URL of the first profile provider.
    /// * `player_url` - Base URL of the second profile provider.
    /// * `outfit_url` - Base URL of the outfit image generator.
    pub fn new(info_url: &str, player_url: &str, outfit_url: &str) -> Self {
        FreeFireRequester {
            info_url: info_url.to_string(),
            player_url: player_url.to_string(),
            outfit_url: outfit_url.to_string(),
            client: Client::new(),
        }
    }
}

#[async_trait]
impl PlayerRequester for FreeFireRequester {
    /// Request `/info?uid={uid}`.
    ///
    /// The player lives under `data.player_info`, next to `data.petInfo`
    /// and `data.guildInfo`.
    async fn get_profile(&self, uid: &str) -> Result<ProfileResponse> {
        let url = format!("{}/info", &self.info_url);
        info!("request profile of {}", uid);
        debug!("request {}?uid={}", &url, uid);

        let profile: ProfileResponse = self
            .client
            .get(&url)
            .query(&[("uid", uid)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        debug!("response from {}?uid={} -> {:?}", &url, uid, &profile);

        Ok(profile)
    }

    /// Request `/player-info?uid={uid}&region={region}`.
    ///
    /// The sections live under `player_info`: `basicInfo`, `captainBasicInfo`,
    /// `clanBasicInfo`, `petInfo`, `socialInfo`, `creditScoreInfo` and
    /// `diamondCostRes`.
    async fn get_player_info(&self, uid: &str, region: &str) -> Result<PlayerInfoResponse> {
        let url = format!("{}/player-info", &self.player_url);
        info!("request player info of {} in {}", uid, region);
        debug!("request {}?uid={}&region={}", &url, uid, region);

        let player_info: PlayerInfoResponse = self
            .client
            .get(&url)
            .query(&[("uid", uid), ("region", region)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        debug!(
            "response from {}?uid={}&region={} -> {:?}",
            &url, uid, region, &player_info
        );

        Ok(player_info)
    }

    /// Request `/generate-profile?uid={uid}&region={region}`, an image.
    async fn get_outfit(&self, uid: &str, region: &str) -> Result<Vec<u8>> {
        let url = format!("{}/generate-profile", &self.outfit_url);
        info!("request outfit of {} in {}", uid, region);

        let image = self
            .client
            .get(&url)
            .query(&[("uid", uid), ("region", region)])
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        debug!("outfit of {} is {} bytes", uid, image.len());

        Ok(image.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;

    use super::*;

    fn uid_and_region(uid: &str, region: &str) -> Matcher {
        Matcher::AllOf(vec![
            Matcher::UrlEncoded("uid".to_owned(), uid.to_owned()),
            Matcher::UrlEncoded("region".to_owned(), region.to_owned()),
        ])
    }

    #[tokio::test]
    async fn test_get_profile() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();
        let body = r#"{"data": {"player_info": {"nikname": "Ada", "level": 60}}}"#;

        server
            .mock("GET", "/info")
            .match_query(Matcher::UrlEncoded("uid".to_owned(), "123".to_owned()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await;

        let requester = FreeFireRequester::new(&url, &url, &url);
        let profile = requester.get_profile("123").await.unwrap();
        let player = profile.data.unwrap().player_info.unwrap();
        assert_eq!(player.nikname.unwrap().to_string(), "Ada");
        assert_eq!(player.level.unwrap().to_string(), "60");
    }

    #[tokio::test]
    async fn test_get_player_info() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();
        let body = r#"{"player_info": {"basicInfo": {"nickname": "Ada", "liked": 1200}}}"#;

        server
            .mock("GET", "/player-info")
            .match_query(uid_and_region("123", "bd"))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await;

        let requester = FreeFireRequester::new(&url, &url, &url);
        let player_info = requester.get_player_info("123", "bd").await.unwrap();
        let basic = player_info.player_info.unwrap().basic_info.unwrap();
        assert_eq!(basic.nickname.unwrap().to_string(), "Ada");
        assert_eq!(basic.liked.unwrap().to_string(), "1200");
    }

    #[tokio::test]
    async fn test_get_outfit() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();
        let image = vec![0x89, b'P', b'N', b'G'];

        server
            .mock("GET", "/generate-profile")
            .match_query(uid_and_region("123", "sg"))
            .with_status(200)
            .with_header("content-type", "image/png")
            .with_body(&image)
            .create_async()
            .await;

        let requester = FreeFireRequester::new(&url, &url, &url);
        assert_eq!(requester.get_outfit("123", "sg").await.unwrap(), image);
    }

    #[tokio::test]
    async fn test_error_status() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        server
            .mock("GET", "/info")
            .match_query(Matcher::Any)
            .with_status(500)
            .create_async()
            .await;
        server
            .mock("GET", "/generate-profile")
            .match_query(Matcher::Any)
            .with_status(404)
            .create_async()
            .await;

        let requester = FreeFireRequester::new(&url, &url, &url);
        assert!(requester.get_profile("123").await.is_err());
        assert!(requester.get_outfit("123", "bd").await.is_err());
    }

    #[tokio::test]
    async fn test_invalid_body() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        server
            .mock("GET", "/player-info")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let requester = FreeFireRequester::new(&url, &url, &url);
        assert!(requester.get_player_info("123", "bd").await.is_err());
    }
}
