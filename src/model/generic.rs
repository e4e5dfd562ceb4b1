//! 定义了整个库通用的、与具体提供商无关的核心数据模型。
//!
//! 这些结构体（如 `UserInfo`, `RecentTrack`, `TopArtist`）是所有 Provider
//! 在获取到各自平台的数据后，需要转换成的目标标准格式。每次查询都产出
//! 一份全新的不可变快照，生命周期只到下一次查询为止。

use serde::{Deserialize, Serialize};

/// 代表一位用户的个人资料与总体统计。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    /// 用户名，稳定的账号句柄。
    pub name: String,
    /// 适合展示的名称；后端没有单独的显示名时回退到 `name`。
    pub display_name: String,
    /// 头像图片 URL。
    pub avatar_url: Option<String>,
    /// 总收听次数。
    pub playcount: u64,
    /// 收听过的艺术家总数；后端不暴露库规模时为 `None`。
    pub artist_count: Option<u64>,
    /// 收听过的曲目总数；后端不暴露库规模时为 `None`。
    pub track_count: Option<u64>,
    /// 收听过的专辑总数；后端不暴露库规模时为 `None`。
    pub album_count: Option<u64>,
    /// 注册时间的 Unix 秒数；后端没有注册概念时为 `None`。
    pub registered_timestamp: Option<i64>,
    /// 国家，未知时为空字符串。
    pub country: String,
    /// 个人主页 URL。
    pub profile_url: String,
}

/// 代表一条最近收听记录。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentTrack {
    /// 曲目名。
    pub name: String,
    /// 艺术家名。
    pub artist: String,
    /// 专辑名，允许为空字符串。
    pub album: String,
    /// 封面图片 URL。缺失以 `None` 表示，绝不使用空字符串。
    pub image_url: Option<String>,
    /// 曲目链接。
    pub url: String,
    /// 是否正在播放。一个结果集中至多有一条为真。
    pub now_playing: bool,
    /// 收听完成时间的 Unix 秒数；当且仅当 `now_playing` 为真时为 `None`，
    /// 因为进行中的播放还没有完成时间。
    pub played_at: Option<i64>,
}

/// 代表选定时间窗口内的一位热门艺术家。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopArtist {
    /// 艺术家名。
    pub name: String,
    /// 窗口内的收听次数。
    pub playcount: u64,
    /// 艺术家链接。
    pub url: String,
}

/// 代表选定时间窗口内的一张热门专辑。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopAlbum {
    /// 专辑名。
    pub name: String,
    /// 艺术家名。
    pub artist: String,
    /// 窗口内的收听次数。
    pub playcount: u64,
    /// 封面图片 URL。
    pub image_url: Option<String>,
    /// 专辑链接。
    pub url: String,
}

/// 代表选定时间窗口内的一首热门曲目。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopTrack {
    /// 曲目名。
    pub name: String,
    /// 艺术家名。
    pub artist: String,
    /// 窗口内的收听次数。
    pub playcount: u64,
    /// 曲目链接。
    pub url: String,
}
