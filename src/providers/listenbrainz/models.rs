//! 此模块定义了所有用于反序列化 ListenBrainz API 响应的数据结构。
//! API 来源于 <https://listenbrainz.readthedocs.io/>

use serde::Deserialize;

// =================================================================
// `listen-count` 端点的模型
// =================================================================

/// `listen-count` 响应的外层容器。
#[derive(Debug, Deserialize)]
pub struct ListenCountResponse {
    /// 响应主体。
    pub payload: ListenCountPayload,
}

/// 收听总数。
#[derive(Debug, Deserialize)]
pub struct ListenCountPayload {
    /// 该用户的收听事件总数。
    pub count: u64,
}

// =================================================================
// `listens` 与 `playing-now` 端点的模型
// =================================================================

/// `listens` 响应的外层容器。
#[derive(Debug, Deserialize)]
pub struct ListensResponse {
    /// 响应主体。
    pub payload: ListensPayload,
}

/// 历史收听列表。
#[derive(Debug, Deserialize)]
pub struct ListensPayload {
    /// 收听事件列表，从新到旧。
    #[serde(default)]
    pub listens: Vec<LbListen>,
}

/// 一次已完成的收听事件。
#[derive(Debug, Deserialize)]
pub struct LbListen {
    /// 收听完成时间的 Unix 秒数。
    pub listened_at: i64,
    /// 曲目元数据。
    pub track_metadata: LbTrackMetadata,
}

/// 收听事件携带的曲目元数据。
#[derive(Debug, Deserialize)]
pub struct LbTrackMetadata {
    /// 艺术家名。
    pub artist_name: String,
    /// 曲目名。
    pub track_name: String,
    /// 专辑名。
    #[serde(default)]
    pub release_name: Option<String>,
    /// MBID 映射，用于派生封面与规范链接。
    #[serde(default)]
    pub mbid_mapping: Option<LbMbidMapping>,
}

/// MusicBrainz 标识符映射。
#[derive(Debug, Deserialize)]
pub struct LbMbidMapping {
    /// Cover Art Archive 使用的 release MBID。
    #[serde(default)]
    pub caa_release_mbid: Option<String>,
    /// 录音 MBID。
    #[serde(default)]
    pub recording_mbid: Option<String>,
}

/// `playing-now` 响应的外层容器。
#[derive(Debug, Deserialize)]
pub struct PlayingNowResponse {
    /// 响应主体。
    pub payload: PlayingNowPayload,
}

/// 正在播放探测的结果。
#[derive(Debug, Deserialize)]
pub struct PlayingNowPayload {
    /// 至多一条正在播放的记录。
    #[serde(default)]
    pub listens: Vec<LbPlayingNow>,
}

/// 一条正在播放的记录。
#[derive(Debug, Deserialize)]
pub struct LbPlayingNow {
    /// 是否确实处于播放中。
    #[serde(default)]
    pub playing_now: bool,
    /// 曲目元数据。
    pub track_metadata: LbTrackMetadata,
}

// =================================================================
// `stats/user/.../{artists,releases,recordings}` 端点的模型
// =================================================================

/// `stats/.../artists` 响应的外层容器。
#[derive(Debug, Deserialize)]
pub struct TopArtistsResponse {
    /// 响应主体。
    pub payload: TopArtistsPayload,
}

/// 热门艺术家列表。
#[derive(Debug, Deserialize)]
pub struct TopArtistsPayload {
    /// 艺术家列表，按上游排名排序。
    #[serde(default)]
    pub artists: Vec<LbTopArtist>,
}

/// 一位热门艺术家。
#[derive(Debug, Deserialize)]
pub struct LbTopArtist {
    /// 艺术家名。
    pub artist_name: String,
    /// 艺术家的 MBID 列表，可能为空。
    #[serde(default)]
    pub artist_mbids: Vec<String>,
    /// 窗口内的收听次数。
    pub listen_count: u64,
}

/// `stats/.../releases` 响应的外层容器。
#[derive(Debug, Deserialize)]
pub struct TopReleasesResponse {
    /// 响应主体。
    pub payload: TopReleasesPayload,
}

/// 热门专辑列表。
#[derive(Debug, Deserialize)]
pub struct TopReleasesPayload {
    /// 专辑列表，按上游排名排序。
    #[serde(default)]
    pub releases: Vec<LbTopRelease>,
}

/// 一张热门专辑。
#[derive(Debug, Deserialize)]
pub struct LbTopRelease {
    /// 艺术家名。
    pub artist_name: String,
    /// 专辑名。
    pub release_name: String,
    /// release MBID。
    #[serde(default)]
    pub release_mbid: Option<String>,
    /// Cover Art Archive 使用的 release MBID。
    #[serde(default)]
    pub caa_release_mbid: Option<String>,
    /// 窗口内的收听次数。
    pub listen_count: u64,
}

/// `stats/.../recordings` 响应的外层容器。
#[derive(Debug, Deserialize)]
pub struct TopRecordingsResponse {
    /// 响应主体。
    pub payload: TopRecordingsPayload,
}

/// 热门曲目列表。
#[derive(Debug, Deserialize)]
pub struct TopRecordingsPayload {
    /// 曲目列表，按上游排名排序。
    #[serde(default)]
    pub recordings: Vec<LbTopRecording>,
}

/// 一首热门曲目。
#[derive(Debug, Deserialize)]
pub struct LbTopRecording {
    /// 艺术家名。
    pub artist_name: String,
    /// 曲目名。
    pub track_name: String,
    /// 录音 MBID。
    #[serde(default)]
    pub recording_mbid: Option<String>,
    /// 窗口内的收听次数。
    pub listen_count: u64,
}
