//! 负责解析进程启动时读取一次的应用配置。
//!
//! 配置解析为一个显式的结构体，按引用传入需要它的组件，
//! 不存在进程级的可变全局状态。

use std::env;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    model::period::Period,
    providers::{ScrobbleProvider, lastfm::LastFm, listenbrainz::ListenBrainz},
};

const ENV_PROVIDER: &str = "SOUNDBOARD_PROVIDER";
const ENV_API_KEY: &str = "SOUNDBOARD_API_KEY";
const ENV_API_KEY_FALLBACK: &str = "LASTFM_API_KEY";
const ENV_USERNAME: &str = "SOUNDBOARD_USERNAME";
const ENV_DEFAULT_PERIOD: &str = "SOUNDBOARD_DEFAULT_PERIOD";
const ENV_ARTWORK_PROXY: &str = "SOUNDBOARD_ARTWORK_PROXY";

/// 可用的 scrobbling 后端种类。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// 经典的、以 API Key 认证的后端。
    #[default]
    LastFm,
    /// 社区运营的、无需认证的后端。
    ListenBrainz,
}

impl ProviderKind {
    /// 从配置值解析后端种类；除 `"listenbrainz"` 外一律按 Last.fm 处理。
    #[must_use]
    pub fn from_config_value(value: &str) -> Self {
        if value.eq_ignore_ascii_case("listenbrainz") {
            Self::ListenBrainz
        } else {
            Self::LastFm
        }
    }

    /// 返回适合展示的提供商名称。
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::LastFm => "last.fm",
            Self::ListenBrainz => "listenbrainz",
        }
    }

    /// 返回提供商的站点地址。
    #[must_use]
    pub fn site_url(&self) -> &'static str {
        match self {
            Self::LastFm => "https://last.fm",
            Self::ListenBrainz => "https://listenbrainz.org/",
        }
    }
}

/// 应用配置，在进程启动时解析一次，此后按引用传递。
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// 选用的后端种类。
    pub provider: ProviderKind,
    /// Last.fm 模式所需的 API Key。
    pub api_key: Option<String>,
    /// 固定用户名；设置后应用进入单用户模式，否则为开放搜索模式。
    pub username: Option<String>,
    /// 默认的报告时间窗口。
    pub default_period: Period,
    /// 艺术家图片搜索的基地址（直连或边缘代理），`None` 时使用默认直连地址。
    pub artwork_base_url: Option<String>,
}

impl AppConfig {
    /// 从环境变量读取配置。
    ///
    /// 无法识别的默认窗口值回退到全部历史，并记录一条警告。
    #[must_use]
    pub fn from_env() -> Self {
        let provider =
            ProviderKind::from_config_value(&env::var(ENV_PROVIDER).unwrap_or_default());
        let api_key = env::var(ENV_API_KEY)
            .ok()
            .or_else(|| env::var(ENV_API_KEY_FALLBACK).ok())
            .filter(|key| !key.is_empty());
        let username = env::var(ENV_USERNAME).ok().filter(|name| !name.is_empty());
        let default_period = match env::var(ENV_DEFAULT_PERIOD) {
            Ok(raw) => Period::from_api_value(&raw).unwrap_or_else(|| {
                warn!("[Config] 无法识别的默认时间窗口 '{raw}'，回退到全部历史。");
                Period::Overall
            }),
            Err(_) => Period::Overall,
        };
        let artwork_base_url = env::var(ENV_ARTWORK_PROXY)
            .ok()
            .filter(|url| !url.is_empty());

        Self {
            provider,
            api_key,
            username,
            default_period,
            artwork_base_url,
        }
    }

    /// 按解析规则挑选唯一的提供商实现。
    ///
    /// ListenBrainz 模式总是成功；Last.fm 模式要求非空的 API Key，
    /// 否则解析为"未配置"状态（`None`）。未配置是一个一等的配置状态，
    /// 与运行时的查询失败是两回事，下游在该状态下必须拒绝发起查询。
    #[must_use]
    pub fn resolve_provider(&self) -> Option<Arc<dyn ScrobbleProvider>> {
        match self.provider {
            ProviderKind::ListenBrainz => Some(Arc::new(ListenBrainz::new())),
            ProviderKind::LastFm => {
                let api_key = self.api_key.as_deref().filter(|key| !key.is_empty())?;
                match LastFm::new(api_key) {
                    Ok(client) => Some(Arc::new(client)),
                    Err(e) => {
                        warn!("[Config] Last.fm 客户端创建失败: {e}");
                        None
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_kind_from_config_value() {
        assert_eq!(
            ProviderKind::from_config_value("listenbrainz"),
            ProviderKind::ListenBrainz
        );
        assert_eq!(
            ProviderKind::from_config_value("ListenBrainz"),
            ProviderKind::ListenBrainz
        );
        assert_eq!(ProviderKind::from_config_value("lastfm"), ProviderKind::LastFm);
        // 未知值一律按 Last.fm 处理
        assert_eq!(ProviderKind::from_config_value(""), ProviderKind::LastFm);
        assert_eq!(
            ProviderKind::from_config_value("spotify"),
            ProviderKind::LastFm
        );
    }

    #[test]
    fn test_resolve_listenbrainz_needs_no_key() {
        let config = AppConfig {
            provider: ProviderKind::ListenBrainz,
            ..AppConfig::default()
        };
        let provider = config.resolve_provider().expect("应解析出提供商");
        assert_eq!(provider.name(), "listenbrainz");
    }

    #[test]
    fn test_resolve_lastfm_without_key_is_unconfigured() {
        let config = AppConfig {
            provider: ProviderKind::LastFm,
            api_key: None,
            ..AppConfig::default()
        };
        assert!(config.resolve_provider().is_none());

        let config = AppConfig {
            provider: ProviderKind::LastFm,
            api_key: Some(String::new()),
            ..AppConfig::default()
        };
        assert!(config.resolve_provider().is_none());
    }

    #[test]
    fn test_resolve_lastfm_with_key() {
        let config = AppConfig {
            provider: ProviderKind::LastFm,
            api_key: Some("0123456789abcdef".to_string()),
            ..AppConfig::default()
        };
        let provider = config.resolve_provider().expect("应解析出提供商");
        assert_eq!(provider.name(), "lastfm");
    }
}
