//! 此模块实现了与 ListenBrainz 平台进行交互的 `ScrobbleProvider`。
//! API 来源于 <https://listenbrainz.readthedocs.io/>
//!
//! 该后端无需认证，数据以收听事件为源：用户资料从单一的收听总数
//! 端点合成，封面从 Cover Art Archive 按 release MBID 派生。

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
    ListenCountResponse, ListensPayload, ListensResponse, PlayingNowPayload, PlayingNowResponse,
    TopArtistsResponse, TopRecordingsResponse, TopReleasesResponse,
};

const BASE_URL_LISTENBRAINZ: &str = "https://api.listenbrainz.org";
const LISTENBRAINZ_WEB_URL: &str = "https://listenbrainz.org";
const MUSICBRAINZ_URL: &str = "https://musicbrainz.org";
const COVER_ART_ARCHIVE_URL: &str = "https://coverartarchive.org";

/// ListenBrainz 的客户端实现。
#[derive(Debug, Clone)]
pub struct ListenBrainz {
    http_client: Client,
    base_url: String,
}

impl Default for ListenBrainz {
    fn default() -> Self {
        Self::new()
    }
}

impl ListenBrainz {
    /// 创建一个新的 `ListenBrainz` 实例。
    #[must_use]
    pub fn new() -> Self {
        Self {
            http_client: Client::new(),
            base_url: BASE_URL_LISTENBRAINZ.to_string(),
        }
    }

    /// 使用自定义端点地址创建实例，用于测试或代理场景。
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// 辅助函数，向指定路径发送一次 GET 请求并反序列化响应。
    async fn get_json<R: DeserializeOwned>(&self, path: &str) -> Result<R> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.http_client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SoundboardError::UpstreamStatus {
                provider: "listenbrainz",
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("未知状态").to_string(),
            });
        }

        let response_text = response.text().await?;
        serde_json::from_str::<R>(&response_text).map_err(SoundboardError::from)
    }

    /// 将抽象的报告窗口翻译为该后端自己的 range 词汇。
    ///
    /// 枚举是封闭的，穷尽匹配保证不存在未映射的窗口。
    fn period_range(period: Period) -> &'static str {
        match period {
            Period::SevenDays => "week",
            Period::OneMonth => "month",
            Period::ThreeMonths => "quarter",
            Period::SixMonths => "half_yearly",
            Period::TwelveMonths => "year",
            Period::Overall => "all_time",
        }
    }
}

fn profile_url(username: &str) -> String {
    format!("{LISTENBRAINZ_WEB_URL}/user/{username}/")
}

/// 根据 Cover Art Archive 的 release MBID 构造封面 URL。
///
/// 该后端从不直接返回封面；没有 MBID 时返回 `None` 而不是错误。
fn cover_art_url(caa_release_mbid: Option<&str>) -> Option<String> {
    caa_release_mbid.map(|mbid| format!("{COVER_ART_ARCHIVE_URL}/release/{mbid}/front-500"))
}

fn artist_url(mbids: &[String]) -> String {
    mbids.first().map_or_else(
        || "#".to_string(),
        |mbid| format!("{MUSICBRAINZ_URL}/artist/{mbid}"),
    )
}

fn recording_url(mbid: &str) -> String {
    format!("{MUSICBRAINZ_URL}/recording/{mbid}")
}

fn release_url(mbid: Option<&str>) -> String {
    mbid.map_or_else(
        || "#".to_string(),
        |mbid| format!("{MUSICBRAINZ_URL}/release/{mbid}"),
    )
}

/// 将历史收听与正在播放探测的结果装配为最终的曲目列表。
///
/// 探测命中时合成一条 `now_playing` 条目置于首位；历史条目
/// 不与合成条目去重，也不受其挤占。
fn assemble_recent_tracks(
    username: &str,
    listens: ListensPayload,
    playing_now: Option<PlayingNowPayload>,
) -> Vec<RecentTrack> {
    let mut tracks = Vec::with_capacity(listens.listens.len() + 1);

    let now_playing = playing_now
        .and_then(|payload| payload.listens.into_iter().next())
        .filter(|listen| listen.playing_now);
    if let Some(now) = now_playing {
        tracks.push(RecentTrack {
            name: now.track_metadata.track_name,
            artist: now.track_metadata.artist_name,
            album: now.track_metadata.release_name.unwrap_or_default(),
            image_url: None,
            url: profile_url(username),
            now_playing: true,
            played_at: None,
        });
    }

    for listen in listens.listens {
        let mapping = listen.track_metadata.mbid_mapping;
        let url = mapping
            .as_ref()
            .and_then(|m| m.recording_mbid.as_deref())
            .map_or_else(|| profile_url(username), recording_url);
        tracks.push(RecentTrack {
            name: listen.track_metadata.track_name,
            artist: listen.track_metadata.artist_name,
            album: listen.track_metadata.release_name.unwrap_or_default(),
            image_url: cover_art_url(
                mapping.as_ref().and_then(|m| m.caa_release_mbid.as_deref()),
            ),
            url,
            now_playing: false,
            played_at: Some(listen.listened_at),
        });
    }

    tracks
}

#[async_trait]
impl ScrobbleProvider for ListenBrainz {
    fn name(&self) -> &'static str {
        "listenbrainz"
    }

    /// 该后端没有独立的用户资料端点，`UserInfo` 从收听总数合成：
    /// 显示名即用户名，头像、库规模与注册时间一律为 `None`。
    async fn get_user_info(&self, username: &str) -> Result<UserInfo> {
        let user = urlencoding::encode(username);
        let response: ListenCountResponse = self
            .get_json(&format!("/1/user/{user}/listen-count"))
            .await?;

        Ok(UserInfo {
            name: username.to_string(),
            display_name: username.to_string(),
            avatar_url: None,
            playcount: response.payload.count,
            artist_count: None,
            track_count: None,
            album_count: None,
            registered_timestamp: None,
            country: String::new(),
            profile_url: profile_url(username),
        })
    }

    /// 并发发起历史收听与正在播放两个子请求。
    ///
    /// 正在播放探测允许失败（网络故障或 404）：失败被就地掩蔽，
    /// 按"当前无播放"处理，绝不作为整个调用的失败向上传播。
    async fn get_recent_tracks(&self, username: &str, limit: u32) -> Result<Vec<RecentTrack>> {
        let user = urlencoding::encode(username);
        let listens_path = format!("/1/user/{user}/listens?count={limit}");
        let playing_path = format!("/1/user/{user}/playing-now");
        let listens_fut = self.get_json::<ListensResponse>(&listens_path);
        let playing_fut = self.get_json::<PlayingNowResponse>(&playing_path);

        let (listens, playing) = futures::join!(listens_fut, playing_fut);

        let playing = match playing {
            Ok(response) => Some(response.payload),
            Err(e) => {
                tracing::debug!("[ListenBrainz] playing-now 探测失败，按无播放处理: {e}");
                None
            }
        };

        Ok(assemble_recent_tracks(username, listens?.payload, playing))
    }

    async fn get_top_artists(
        &self,
        username: &str,
        period: Period,
        limit: u32,
    ) -> Result<Vec<TopArtist>> {
        let user = urlencoding::encode(username);
        let range = Self::period_range(period);
        let response: TopArtistsResponse = self
            .get_json(&format!(
                "/1/stats/user/{user}/artists?range={range}&count={limit}"
            ))
            .await?;

        Ok(response
            .payload
            .artists
            .into_iter()
            .map(|artist| TopArtist {
                name: artist.artist_name,
                playcount: artist.listen_count,
                url: artist_url(&artist.artist_mbids),
            })
            .collect())
    }

    async fn get_top_albums(
        &self,
        username: &str,
        period: Period,
        limit: u32,
    ) -> Result<Vec<TopAlbum>> {
        let user = urlencoding::encode(username);
        let range = Self::period_range(period);
        let response: TopReleasesResponse = self
            .get_json(&format!(
                "/1/stats/user/{user}/releases?range={range}&count={limit}"
            ))
            .await?;

        Ok(response
            .payload
            .releases
            .into_iter()
            .map(|release| TopAlbum {
                name: release.release_name,
                artist: release.artist_name,
                playcount: release.listen_count,
                image_url: cover_art_url(release.caa_release_mbid.as_deref()),
                url: release_url(release.release_mbid.as_deref()),
            })
            .collect())
    }

    async fn get_top_tracks(
        &self,
        username: &str,
        period: Period,
        limit: u32,
    ) -> Result<Vec<TopTrack>> {
        let user = urlencoding::encode(username);
        let range = Self::period_range(period);
        let response: TopRecordingsResponse = self
            .get_json(&format!(
                "/1/stats/user/{user}/recordings?range={range}&count={limit}"
            ))
            .await?;

        Ok(response
            .payload
            .recordings
            .into_iter()
            .map(|recording| TopTrack {
                name: recording.track_name,
                artist: recording.artist_name,
                playcount: recording.listen_count,
                url: recording
                    .recording_mbid
                    .as_deref()
                    .map_or_else(|| "#".to_string(), recording_url),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    fn init_tracing() {
        use tracing_subscriber::{EnvFilter, FmtSubscriber};
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("info,soundboard_rs=debug"));
        let _ = FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    }

    fn listens_fixture() -> ListensPayload {
        let raw = serde_json::json!({
            "listens": [
                {
                    "listened_at": 1_700_000_200,
                    "track_metadata": {
                        "artist_name": "Björk",
                        "track_name": "Jóga",
                        "release_name": "Homogenic",
                        "mbid_mapping": {
                            "caa_release_mbid": "11111111-2222-3333-4444-555555555555",
                            "recording_mbid": "aaaaaaaa-bbbb-cccc-dddd-eeeeeeeeeeee"
                        }
                    }
                },
                {
                    "listened_at": 1_700_000_100,
                    "track_metadata": {
                        "artist_name": "Björk",
                        "track_name": "Hunter"
                    }
                }
            ]
        });
        serde_json::from_value(raw).unwrap()
    }

    fn playing_now_fixture(playing: bool) -> PlayingNowPayload {
        let raw = serde_json::json!({
            "listens": [
                {
                    "playing_now": playing,
                    "track_metadata": {
                        "artist_name": "Sigur Rós",
                        "track_name": "Glósóli",
                        "release_name": "Takk..."
                    }
                }
            ]
        });
        serde_json::from_value(raw).unwrap()
    }

    #[test]
    fn test_period_range_is_total() {
        for period in Period::iter() {
            assert!(
                !ListenBrainz::period_range(period).is_empty(),
                "窗口 {period:?} 应有 range 映射"
            );
        }
        assert_eq!(ListenBrainz::period_range(Period::SevenDays), "week");
        assert_eq!(ListenBrainz::period_range(Period::ThreeMonths), "quarter");
        assert_eq!(ListenBrainz::period_range(Period::Overall), "all_time");
    }

    #[test]
    fn test_cover_art_url() {
        assert_eq!(
            cover_art_url(Some("abc-123")).as_deref(),
            Some("https://coverartarchive.org/release/abc-123/front-500")
        );
        assert_eq!(cover_art_url(None), None);
    }

    #[test]
    fn test_artist_url_falls_back() {
        assert_eq!(artist_url(&[]), "#");
        assert_eq!(
            artist_url(&["mbid-1".to_string(), "mbid-2".to_string()]),
            "https://musicbrainz.org/artist/mbid-1"
        );
    }

    #[test]
    fn test_assemble_prepends_now_playing() {
        let tracks = assemble_recent_tracks("bob", listens_fixture(), Some(playing_now_fixture(true)));

        assert_eq!(tracks.len(), 3);
        assert!(tracks[0].now_playing);
        assert_eq!(tracks[0].played_at, None);
        assert_eq!(tracks[0].name, "Glósóli");
        // 历史条目保持原样，不与合成条目去重
        assert!(tracks[1..].iter().all(|t| !t.now_playing));
        assert!(tracks[1..].iter().all(|t| t.played_at.is_some()));
        assert_eq!(
            tracks[1].image_url.as_deref(),
            Some("https://coverartarchive.org/release/11111111-2222-3333-4444-555555555555/front-500")
        );
        // 没有 MBID 映射的条目回退到用户主页链接
        assert_eq!(tracks[2].image_url, None);
        assert_eq!(tracks[2].url, "https://listenbrainz.org/user/bob/");
    }

    #[test]
    fn test_assemble_ignores_failed_probe() {
        let tracks = assemble_recent_tracks("bob", listens_fixture(), None);

        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks.iter().filter(|t| t.now_playing).count(), 0);
    }

    #[test]
    fn test_assemble_ignores_idle_probe() {
        let tracks =
            assemble_recent_tracks("bob", listens_fixture(), Some(playing_now_fixture(false)));

        assert_eq!(tracks.len(), 2);
        assert!(tracks.iter().all(|t| !t.now_playing));
    }

    #[tokio::test]
    async fn test_listens_failure_propagates() {
        // 指向不可达的端点：两个子请求都会失败。探测的失败被掩蔽，
        // 但历史收听是主数据，它的失败必须向上传播。
        let provider = ListenBrainz::with_base_url("http://127.0.0.1:1");
        let result = provider.get_recent_tracks("bob", 10).await;
        assert!(result.is_err(), "历史收听失败时整个调用应失败");
    }

    #[tokio::test]
    #[ignore]
    async fn test_live_full_flow() {
        init_tracing();
        let provider = ListenBrainz::new();

        let user = provider.get_user_info("rob").await.unwrap();
        assert_eq!(user.name, "rob");
        assert_eq!(user.artist_count, None);
        assert_eq!(user.registered_timestamp, None);

        let tracks = provider.get_recent_tracks("rob", 5).await.unwrap();
        assert!(tracks.iter().filter(|t| t.now_playing).count() <= 1);
        for track in tracks.iter().filter(|t| !t.now_playing) {
            assert!(track.played_at.is_some());
        }

        let artists = provider
            .get_top_artists("rob", Period::Overall, 5)
            .await
            .unwrap();
        assert!(artists.len() <= 5);
    }
}
