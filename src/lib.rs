#![warn(missing_docs)]

//! # Soundboard RS
//!
//! 一个个人音乐收听仪表盘的数据层，从可互换的 scrobbling 后端拉取
//! 个人资料、最近收听与热门统计，并把两种结构迥异的上游 API
//! 规整为同一套数据模型。
//!
//! ## 主要功能
//!
//! - **提供商抽象**: 同一份能力契约的两个实现——以 API Key 认证的
//!   Last.fm 与无需认证的 ListenBrainz，各自处理认证、分页、
//!   字段缺失与时间窗口词汇的翻译。
//! - **聚合编排**: 五个互相独立的查询并发执行，窗口切换只重查
//!   窗口相关的三个，最近收听按固定间隔自动刷新。
//! - **头图补充**: 按艺术家名的尽力而为图片查询，独立缓存，
//!   失败绝不影响主数据。
//!
//! ## 获取仪表盘数据
//!
//! ```rust,no_run
//! use soundboard_rs::{AppConfig, Soundboard};
//!
//! async {
//!     let soundboard = Soundboard::new(AppConfig::from_env());
//!     match soundboard.dashboard("alice") {
//!         Ok(dashboard) => {
//!             dashboard.refresh().await;
//!             let data = dashboard.snapshot();
//!             println!("总收听次数: {}", data.user.map_or(0, |u| u.playcount));
//!         }
//!         Err(e) => eprintln!("发生错误: {e}"),
//!     }
//! };
//! ```

pub mod artwork;
pub mod cache;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod format;
pub mod model;
pub mod providers;

use std::sync::Arc;

pub use crate::{
    config::{AppConfig, ProviderKind},
    dashboard::{Dashboard, DashboardData},
    error::{Result, SoundboardError},
    model::{
        generic::{RecentTrack, TopAlbum, TopArtist, TopTrack, UserInfo},
        period::Period,
    },
    providers::ScrobbleProvider,
};

use crate::artwork::ArtworkResolver;

// ==========================================================
//  顶层 API
// ==========================================================

/// 顶层仪表盘客户端，持有解析好的提供商与头图解析器。
///
/// 这是与本库交互的主要入口点。提供商在构造时按配置解析一次，
/// 此后整个进程生命周期内不再变化。
pub struct Soundboard {
    config: AppConfig,
    provider: Option<Arc<dyn ScrobbleProvider>>,
    artwork: ArtworkResolver,
}

impl Soundboard {
    /// 按配置解析提供商并创建客户端。
    ///
    /// Last.fm 模式下缺少 API Key 时客户端处于"未配置"状态：
    /// 不会发出任何网络请求，[`Soundboard::dashboard`] 会拒绝建立查询。
    #[must_use]
    pub fn new(config: AppConfig) -> Self {
        let provider = config.resolve_provider();
        match &provider {
            Some(p) => tracing::info!("[Soundboard] 已选用提供商 '{}'。", p.name()),
            None => {
                tracing::warn!("[Soundboard] 未解析出任何提供商，客户端处于未配置状态。");
            }
        }

        let artwork = match &config.artwork_base_url {
            Some(base_url) => ArtworkResolver::with_base_url(base_url.clone()),
            None => ArtworkResolver::new(),
        };

        Self {
            config,
            provider,
            artwork,
        }
    }

    /// 从环境变量读取配置并创建客户端。
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(AppConfig::from_env())
    }

    /// 客户端是否已解析出可用的提供商。
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    /// 创建时使用的配置。
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// 为指定用户建立一个仪表盘编排器。
    ///
    /// # 错误
    /// 未配置状态下返回 [`SoundboardError::Unconfigured`]，
    /// 不会发出任何查询。
    pub fn dashboard(&self, username: &str) -> Result<Dashboard> {
        let provider = self
            .provider
            .clone()
            .ok_or(SoundboardError::Unconfigured)?;
        Ok(Dashboard::new(provider, username, self.config.default_period))
    }

    /// 按艺术家名查询头图，失败时返回 `None`。
    ///
    /// 详见 [`ArtworkResolver::artist_image`]。
    pub async fn artist_image(&self, artist_name: &str) -> Option<String> {
        self.artwork.artist_image(artist_name).await
    }
}
