//! 此模块定义了所有用于反序列化 Last.fm API 响应的数据结构。
//! API 来源于 <https://www.last.fm/api>

use serde::Deserialize;

/// 图片尺寸的挑选优先级，从最优到最次。
const IMAGE_SIZE_PRIORITY: [&str; 5] = ["extralarge", "mega", "large", "medium", "small"];

/// 将上游以字符串形式返回的数字解析为 `u64`，解析失败时回退到 0。
///
/// Last.fm 的所有数字字段都以字符串返回，个别字段偶尔缺失或畸形，
/// 单个字段解析失败不应拖垮整条记录。
pub(crate) fn parse_count(raw: &str) -> u64 {
    raw.parse().unwrap_or(0)
}

/// 从一组同主体、多分辨率的图片中挑选最合适的一张。
///
/// 按 extralarge > mega > large > medium > small 的优先级挑选；
/// 若没有任何命名尺寸携带内容，回退到第一张内容非空的图片；
/// 整组为空时返回 `None`。
pub(crate) fn best_image(images: &[LfmImage]) -> Option<String> {
    for size in IMAGE_SIZE_PRIORITY {
        if let Some(image) = images.iter().find(|i| i.size == size)
            && !image.text.is_empty()
        {
            return Some(image.text.clone());
        }
    }
    images
        .iter()
        .find(|i| !i.text.is_empty())
        .map(|i| i.text.clone())
}

/// Last.fm 返回的多分辨率图片条目。
#[derive(Debug, Deserialize, Clone)]
pub struct LfmImage {
    /// 图片 URL，可能为空字符串。
    #[serde(rename = "#text", default)]
    pub text: String,
    /// 尺寸名称，例如 `"large"`, `"extralarge"`。
    #[serde(default)]
    pub size: String,
}

/// 只包含 `#text` 字段的通用容器，用于艺术家与专辑的内嵌引用。
#[derive(Debug, Deserialize, Default)]
pub struct TextField {
    /// 内嵌的文本值。
    #[serde(rename = "#text", default)]
    pub text: String,
}

/// 只包含 `name` 字段的通用容器。
#[derive(Debug, Deserialize)]
pub struct NamedRef {
    /// 引用对象的名称。
    pub name: String,
}

// =================================================================
// `user.getinfo` 的模型
// =================================================================

/// `user.getinfo` 响应的外层容器。
#[derive(Debug, Deserialize)]
pub struct UserInfoResponse {
    /// 用户资料主体。
    pub user: LfmUser,
}

/// 代表一位用户的个人资料。
///
/// 该后端总是提供注册时间、国家与库规模统计。
#[derive(Debug, Deserialize)]
pub struct LfmUser {
    /// 用户名。
    pub name: String,
    /// 真实显示名，可能为空字符串。
    #[serde(default)]
    pub realname: String,
    /// 头像图片集。
    #[serde(default)]
    pub image: Vec<LfmImage>,
    /// 总收听次数，字符串形式。
    #[serde(default)]
    pub playcount: String,
    /// 收听过的艺术家总数，字符串形式。
    #[serde(default)]
    pub artist_count: String,
    /// 收听过的曲目总数，字符串形式。
    #[serde(default)]
    pub track_count: String,
    /// 收听过的专辑总数，字符串形式。
    #[serde(default)]
    pub album_count: String,
    /// 注册信息。
    pub registered: LfmRegistered,
    /// 国家，可能为空。
    #[serde(default)]
    pub country: String,
    /// 个人主页 URL。
    pub url: String,
}

/// 用户的注册信息。
#[derive(Debug, Deserialize)]
pub struct LfmRegistered {
    /// 注册时间的 Unix 秒数，字符串形式。
    #[serde(default)]
    pub unixtime: String,
}

// =================================================================
// `user.getrecenttracks` 的模型
// =================================================================

/// `user.getrecenttracks` 响应的外层容器。
#[derive(Debug, Deserialize)]
pub struct RecentTracksResponse {
    /// 最近收听列表的容器。
    pub recenttracks: RecentTracksPayload,
}

/// 最近收听列表。
#[derive(Debug, Deserialize)]
pub struct RecentTracksPayload {
    /// 曲目列表，从新到旧。
    #[serde(default)]
    pub track: Vec<LfmRecentTrack>,
}

/// 一条最近收听记录。
#[derive(Debug, Deserialize)]
pub struct LfmRecentTrack {
    /// 曲目名。
    pub name: String,
    /// 艺术家引用。
    pub artist: TextField,
    /// 专辑引用，可能为空。
    #[serde(default)]
    pub album: TextField,
    /// 封面图片集。
    #[serde(default)]
    pub image: Vec<LfmImage>,
    /// 收听完成时间；正在播放的条目没有该字段。
    pub date: Option<LfmDate>,
    /// 附加属性；`nowplaying == "true"` 标记正在播放的条目。
    #[serde(rename = "@attr")]
    pub attr: Option<LfmTrackAttr>,
    /// 曲目链接。
    pub url: String,
}

/// 收听完成时间。
#[derive(Debug, Deserialize)]
pub struct LfmDate {
    /// Unix 秒数，字符串形式。
    pub uts: String,
}

/// 曲目的附加属性。
#[derive(Debug, Deserialize)]
pub struct LfmTrackAttr {
    /// 值为 `"true"` 时表示该条目正在播放。
    #[serde(default)]
    pub nowplaying: String,
}

// =================================================================
// `user.gettopartists` / `user.gettopalbums` / `user.gettoptracks` 的模型
// =================================================================

/// `user.gettopartists` 响应的外层容器。
#[derive(Debug, Deserialize)]
pub struct TopArtistsResponse {
    /// 热门艺术家列表的容器。
    pub topartists: TopArtistsPayload,
}

/// 热门艺术家列表。
#[derive(Debug, Deserialize)]
pub struct TopArtistsPayload {
    /// 艺术家列表，按上游排名排序。
    #[serde(default)]
    pub artist: Vec<LfmTopArtist>,
}

/// 一位热门艺术家。
#[derive(Debug, Deserialize)]
pub struct LfmTopArtist {
    /// 艺术家名。
    pub name: String,
    /// 窗口内收听次数，字符串形式。
    #[serde(default)]
    pub playcount: String,
    /// 艺术家链接。
    pub url: String,
}

/// `user.gettopalbums` 响应的外层容器。
#[derive(Debug, Deserialize)]
pub struct TopAlbumsResponse {
    /// 热门专辑列表的容器。
    pub topalbums: TopAlbumsPayload,
}

/// 热门专辑列表。
#[derive(Debug, Deserialize)]
pub struct TopAlbumsPayload {
    /// 专辑列表，按上游排名排序。
    #[serde(default)]
    pub album: Vec<LfmTopAlbum>,
}

/// 一张热门专辑。
#[derive(Debug, Deserialize)]
pub struct LfmTopAlbum {
    /// 专辑名。
    pub name: String,
    /// 窗口内收听次数，字符串形式。
    #[serde(default)]
    pub playcount: String,
    /// 艺术家引用。
    pub artist: NamedRef,
    /// 封面图片集。
    #[serde(default)]
    pub image: Vec<LfmImage>,
    /// 专辑链接。
    pub url: String,
}

/// `user.gettoptracks` 响应的外层容器。
#[derive(Debug, Deserialize)]
pub struct TopTracksResponse {
    /// 热门曲目列表的容器。
    pub toptracks: TopTracksPayload,
}

/// 热门曲目列表。
#[derive(Debug, Deserialize)]
pub struct TopTracksPayload {
    /// 曲目列表，按上游排名排序。
    #[serde(default)]
    pub track: Vec<LfmTopTrack>,
}

/// 一首热门曲目。
#[derive(Debug, Deserialize)]
pub struct LfmTopTrack {
    /// 曲目名。
    pub name: String,
    /// 窗口内收听次数，字符串形式。
    #[serde(default)]
    pub playcount: String,
    /// 艺术家引用。
    pub artist: NamedRef,
    /// 曲目链接。
    pub url: String,
}
