//! 提供商模块
//!
//! 该模块定义了与 scrobbling 后端进行交互的核心抽象。

use async_trait::async_trait;

use crate::{
    error::Result,
    model::{
        generic::{RecentTrack, TopAlbum, TopArtist, TopTrack, UserInfo},
        period::Period,
    },
};

pub mod lastfm;
pub mod listenbrainz;

/// 定义了所有 scrobbling 后端需要实现的通用接口。
///
/// 两个后端在认证方式、分页、字段语义与缺失数据模式上都不同，
/// 但对外满足同一份能力契约。提供商在配置阶段被选定一次，
/// 此后任何调用点都不再按种类分支。
#[async_trait]
pub trait ScrobbleProvider: Send + Sync {
    ///
    /// 返回提供商的唯一名称。
    ///
    /// 一个全小写的静态字符串，例如 `"lastfm"`, `"listenbrainz"`。
    ///
    fn name(&self) -> &'static str;

    ///
    /// 获取用户的个人资料与总体统计。
    ///
    /// # 参数
    /// * `username` - 用户名。
    ///
    /// # 返回
    /// 一个 `Result`，成功时包含规整后的 `UserInfo`。
    /// 非成功状态码或网络故障以错误返回。
    ///
    async fn get_user_info(&self, username: &str) -> Result<UserInfo>;

    ///
    /// 获取最近收听的曲目，按时间从新到旧排列。
    ///
    /// 若后端报告有正在播放的曲目，该条目必须出现在结果中
    /// （必要时由实现合成），置于列表首位，且不计入 `limit`
    /// 所限制的历史条目数。
    ///
    /// # 参数
    /// * `username` - 用户名。
    /// * `limit` - 历史条目数上限。
    ///
    async fn get_recent_tracks(&self, username: &str, limit: u32) -> Result<Vec<RecentTrack>>;

    ///
    /// 获取指定时间窗口内收听次数最多的艺术家。
    ///
    /// 排序以上游返回为准，客户端不做二次排序。
    /// `limit` 只是上限，上游可能返回更少的条目。
    ///
    async fn get_top_artists(
        &self,
        username: &str,
        period: Period,
        limit: u32,
    ) -> Result<Vec<TopArtist>>;

    ///
    /// 获取指定时间窗口内收听次数最多的专辑。
    ///
    /// 排序与 `limit` 语义同 [`ScrobbleProvider::get_top_artists`]。
    ///
    async fn get_top_albums(
        &self,
        username: &str,
        period: Period,
        limit: u32,
    ) -> Result<Vec<TopAlbum>>;

    ///
    /// 获取指定时间窗口内收听次数最多的曲目。
    ///
    /// 排序与 `limit` 语义同 [`ScrobbleProvider::get_top_artists`]。
    ///
    async fn get_top_tracks(
        &self,
        username: &str,
        period: Period,
        limit: u32,
    ) -> Result<Vec<TopTrack>>;
}
