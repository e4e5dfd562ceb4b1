//! 此模块实现了与 Last.fm 平台进行交互的 `ScrobbleProvider`。
//! API 来源于 <https://www.last.fm/api>

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::{
    error::{Result, SoundboardError},
    model::{
        generic::{RecentTrack, TopAlbum, TopArtist, TopTrack, UserInfo},
        period::Period,
    },
    providers::ScrobbleProvider,
};

pub mod models;

use models::{
    LfmRecentTrack, LfmTopAlbum, LfmTopArtist, LfmTopTrack, LfmUser, RecentTracksResponse,
    TopAlbumsResponse, TopArtistsResponse, TopTracksResponse, UserInfoResponse, best_image,
    parse_count,
};

const BASE_URL_LASTFM: &str = "https://ws.audioscrobbler.com/2.0/";

/// Last.fm 的客户端实现。
///
/// 所有操作都复用同一个多路复用端点，通过 `method` 查询参数选择具体行为，
/// 以 API Key 查询参数认证。
#[derive(Debug, Clone)]
pub struct LastFm {
    api_key: String,
    http_client: Client,
    base_url: String,
}

impl LastFm {
    /// 创建一个新的 `LastFm` 实例。
    ///
    /// # 错误
    /// `api_key` 为空时返回 [`SoundboardError::Unconfigured`]：
    /// 没有 Key 的 Last.fm 客户端无法发出任何有效请求。
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(SoundboardError::Unconfigured);
        }
        Ok(Self {
            api_key,
            http_client: Client::new(),
            base_url: BASE_URL_LASTFM.to_string(),
        })
    }

    /// 使用自定义端点地址创建实例，用于测试或代理场景。
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let mut client = Self::new(api_key)?;
        client.base_url = base_url.into();
        Ok(client)
    }

    /// 辅助函数，向多路复用端点发送一次查询请求并反序列化响应。
    async fn get_json<R: DeserializeOwned>(
        &self,
        method: &str,
        params: &[(&str, &str)],
    ) -> Result<R> {
        let mut query: Vec<(&str, &str)> = vec![
            ("method", method),
            ("api_key", self.api_key.as_str()),
            ("format", "json"),
        ];
        query.extend_from_slice(params);

        let response = self
            .http_client
            .get(&self.base_url)
            .query(&query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SoundboardError::UpstreamStatus {
                provider: "lastfm",
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("未知状态").to_string(),
            });
        }

        let response_text = response.text().await?;
        serde_json::from_str::<R>(&response_text).map_err(SoundboardError::from)
    }
}

/// 将原始用户资料规整为通用模型。
///
/// 该后端总是提供注册时间与库规模统计；所有数字都以字符串形式
/// 到达，解析失败的字段回退到 0 而不是拖垮整条记录。
fn normalize_user(user: LfmUser) -> UserInfo {
    let display_name = if user.realname.is_empty() {
        user.name.clone()
    } else {
        user.realname.clone()
    };
    UserInfo {
        display_name,
        avatar_url: best_image(&user.image),
        playcount: parse_count(&user.playcount),
        artist_count: Some(parse_count(&user.artist_count)),
        track_count: Some(parse_count(&user.track_count)),
        album_count: Some(parse_count(&user.album_count)),
        registered_timestamp: user.registered.unixtime.parse().ok(),
        country: user.country,
        profile_url: user.url,
        name: user.name,
    }
}

fn normalize_recent_track(track: LfmRecentTrack) -> RecentTrack {
    let now_playing = track
        .attr
        .as_ref()
        .is_some_and(|attr| attr.nowplaying == "true");
    RecentTrack {
        name: track.name,
        artist: track.artist.text,
        album: track.album.text,
        image_url: best_image(&track.image),
        url: track.url,
        now_playing,
        played_at: track.date.and_then(|date| date.uts.parse().ok()),
    }
}

fn normalize_top_artist(artist: LfmTopArtist) -> TopArtist {
    TopArtist {
        name: artist.name,
        playcount: parse_count(&artist.playcount),
        url: artist.url,
    }
}

fn normalize_top_album(album: LfmTopAlbum) -> TopAlbum {
    TopAlbum {
        name: album.name,
        artist: album.artist.name,
        playcount: parse_count(&album.playcount),
        image_url: best_image(&album.image),
        url: album.url,
    }
}

fn normalize_top_track(track: LfmTopTrack) -> TopTrack {
    TopTrack {
        name: track.name,
        artist: track.artist.name,
        playcount: parse_count(&track.playcount),
        url: track.url,
    }
}

#[async_trait]
impl ScrobbleProvider for LastFm {
    fn name(&self) -> &'static str {
        "lastfm"
    }

    async fn get_user_info(&self, username: &str) -> Result<UserInfo> {
        let response: UserInfoResponse = self
            .get_json("user.getinfo", &[("user", username)])
            .await?;
        Ok(normalize_user(response.user))
    }

    async fn get_recent_tracks(&self, username: &str, limit: u32) -> Result<Vec<RecentTrack>> {
        let limit = limit.to_string();
        let response: RecentTracksResponse = self
            .get_json(
                "user.getrecenttracks",
                &[("user", username), ("limit", limit.as_str())],
            )
            .await?;
        Ok(response
            .recenttracks
            .track
            .into_iter()
            .map(normalize_recent_track)
            .collect())
    }

    async fn get_top_artists(
        &self,
        username: &str,
        period: Period,
        limit: u32,
    ) -> Result<Vec<TopArtist>> {
        let limit = limit.to_string();
        let response: TopArtistsResponse = self
            .get_json(
                "user.gettopartists",
                &[
                    ("user", username),
                    ("period", period.api_value()),
                    ("limit", limit.as_str()),
                ],
            )
            .await?;
        Ok(response
            .topartists
            .artist
            .into_iter()
            .map(normalize_top_artist)
            .collect())
    }

    async fn get_top_albums(
        &self,
        username: &str,
        period: Period,
        limit: u32,
    ) -> Result<Vec<TopAlbum>> {
        let limit = limit.to_string();
        let response: TopAlbumsResponse = self
            .get_json(
                "user.gettopalbums",
                &[
                    ("user", username),
                    ("period", period.api_value()),
                    ("limit", limit.as_str()),
                ],
            )
            .await?;
        Ok(response
            .topalbums
            .album
            .into_iter()
            .map(normalize_top_album)
            .collect())
    }

    async fn get_top_tracks(
        &self,
        username: &str,
        period: Period,
        limit: u32,
    ) -> Result<Vec<TopTrack>> {
        let limit = limit.to_string();
        let response: TopTracksResponse = self
            .get_json(
                "user.gettoptracks",
                &[
                    ("user", username),
                    ("period", period.api_value()),
                    ("limit", limit.as_str()),
                ],
            )
            .await?;
        Ok(response
            .toptracks
            .track
            .into_iter()
            .map(normalize_top_track)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::models::LfmImage;

    fn init_tracing() {
        use tracing_subscriber::{EnvFilter, FmtSubscriber};
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("info,soundboard_rs=debug"));
        let _ = FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    }

    fn image(size: &str, text: &str) -> LfmImage {
        LfmImage {
            text: text.to_string(),
            size: size.to_string(),
        }
    }

    #[test]
    fn test_best_image_prefers_extralarge() {
        let images = vec![
            image("small", "https://img/s.png"),
            image("mega", "https://img/m.png"),
            image("extralarge", "https://img/xl.png"),
        ];
        assert_eq!(best_image(&images).as_deref(), Some("https://img/xl.png"));
    }

    #[test]
    fn test_best_image_priority_order() {
        let images = vec![
            image("medium", "https://img/md.png"),
            image("mega", "https://img/mega.png"),
            image("large", "https://img/lg.png"),
        ];
        assert_eq!(best_image(&images).as_deref(), Some("https://img/mega.png"));
    }

    #[test]
    fn test_best_image_falls_back_to_first_non_empty() {
        let images = vec![
            image("weird", ""),
            image("unknown", "https://img/any.png"),
            image("other", "https://img/other.png"),
        ];
        assert_eq!(best_image(&images).as_deref(), Some("https://img/any.png"));
    }

    #[test]
    fn test_best_image_skips_named_size_with_empty_content() {
        let images = vec![
            image("extralarge", ""),
            image("large", "https://img/lg.png"),
        ];
        assert_eq!(best_image(&images).as_deref(), Some("https://img/lg.png"));
    }

    #[test]
    fn test_best_image_empty_set() {
        assert_eq!(best_image(&[]), None);
        assert_eq!(best_image(&[image("small", "")]), None);
    }

    #[test]
    fn test_parse_count_defaults_to_zero() {
        assert_eq!(parse_count("12345"), 12345);
        assert_eq!(parse_count(""), 0);
        assert_eq!(parse_count("not-a-number"), 0);
        assert_eq!(parse_count("-3"), 0);
    }

    #[test]
    fn test_new_rejects_empty_key() {
        assert!(matches!(
            LastFm::new(""),
            Err(SoundboardError::Unconfigured)
        ));
        assert!(LastFm::new("0123456789abcdef").is_ok());
    }

    #[test]
    fn test_normalize_user() {
        let raw = serde_json::json!({
            "name": "alice",
            "realname": "",
            "image": [{ "#text": "https://img/avatar.png", "size": "extralarge" }],
            "playcount": "12345",
            "artist_count": "321",
            "track_count": "4321",
            "album_count": "210",
            "registered": { "unixtime": "1122334455" },
            "country": "Iceland",
            "url": "https://www.last.fm/user/alice"
        });
        let user: LfmUser = serde_json::from_value(raw).unwrap();
        let user = normalize_user(user);

        assert_eq!(user.name, "alice");
        // 没有显示名时回退到用户名
        assert_eq!(user.display_name, "alice");
        assert_eq!(user.playcount, 12345);
        assert_eq!(user.artist_count, Some(321));
        assert_eq!(user.registered_timestamp, Some(1_122_334_455));
        assert_eq!(user.country, "Iceland");
        assert_eq!(user.avatar_url.as_deref(), Some("https://img/avatar.png"));
    }

    #[test]
    fn test_normalize_user_malformed_playcount() {
        let raw = serde_json::json!({
            "name": "bob",
            "realname": "Bob",
            "image": [],
            "playcount": "??",
            "registered": { "unixtime": "" },
            "url": "https://www.last.fm/user/bob"
        });
        let user: LfmUser = serde_json::from_value(raw).unwrap();
        let user = normalize_user(user);

        assert_eq!(user.display_name, "Bob");
        assert_eq!(user.playcount, 0);
        assert_eq!(user.registered_timestamp, None);
        assert_eq!(user.country, "");
    }

    #[test]
    fn test_normalize_recent_track_now_playing() {
        let raw = serde_json::json!({
            "name": "Svefn-g-englar",
            "artist": { "#text": "Sigur Rós" },
            "album": { "#text": "Ágætis byrjun" },
            "image": [],
            "@attr": { "nowplaying": "true" },
            "url": "https://www.last.fm/music/track"
        });
        let track: LfmRecentTrack = serde_json::from_value(raw).unwrap();
        let track = normalize_recent_track(track);

        assert!(track.now_playing);
        assert_eq!(track.played_at, None);
        assert_eq!(track.artist, "Sigur Rós");
    }

    #[test]
    fn test_normalize_recent_track_historical() {
        let raw = serde_json::json!({
            "name": "Ný batterí",
            "artist": { "#text": "Sigur Rós" },
            "album": { "#text": "" },
            "image": [],
            "date": { "uts": "1700000000" },
            "url": "https://www.last.fm/music/track"
        });
        let track: LfmRecentTrack = serde_json::from_value(raw).unwrap();
        let track = normalize_recent_track(track);

        assert!(!track.now_playing);
        assert_eq!(track.played_at, Some(1_700_000_000));
        assert_eq!(track.album, "");
    }

    #[tokio::test]
    #[ignore]
    async fn test_live_user_info() {
        init_tracing();
        let api_key =
            std::env::var("LASTFM_API_KEY").expect("需要设置 LASTFM_API_KEY 才能运行此测试");
        let provider = LastFm::new(api_key).unwrap();

        let user = provider.get_user_info("rj").await.unwrap();
        assert_eq!(user.name, "rj");
        assert!(!user.profile_url.is_empty());

        let tracks = provider.get_recent_tracks("rj", 5).await.unwrap();
        assert!(tracks.iter().filter(|t| t.now_playing).count() <= 1);
    }
}
