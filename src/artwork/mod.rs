//! 艺术家头图解析器。
//!
//! 通过第三方图片搜索 API 按艺术家名补充头图。这是尽力而为的
//! 修饰性查询：任何失败都解析为 `None`，绝不阻塞主数据的渲染。

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::{
    cache::TtlCache,
    error::{Result, SoundboardError},
};

const BASE_URL_DEEZER: &str = "https://api.deezer.com";
/// 艺术家头图几乎不变，缓存一整天。
const ARTWORK_MAX_AGE: Duration = Duration::from_secs(24 * 60 * 60);
/// 失败后的额外尝试次数。
const ARTWORK_RETRIES: u32 = 1;

/// Deezer 搜索返回的艺术家条目。
#[derive(Debug, Deserialize)]
struct DeezerArtist {
    #[serde(default)]
    picture_medium: String,
    #[serde(default)]
    picture_big: String,
    #[serde(default)]
    picture_xl: String,
}

/// Deezer 艺术家搜索响应。
#[derive(Debug, Deserialize)]
struct DeezerSearchResponse {
    #[serde(default)]
    data: Vec<DeezerArtist>,
}

/// 按艺术家名查询头图的解析器，结果缓存 24 小时。
///
/// 缓存只以艺术家名为键，与用户名和时间窗口无关。
pub struct ArtworkResolver {
    http_client: Client,
    base_url: String,
    cache: TtlCache<String, Option<String>>,
}

impl Default for ArtworkResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ArtworkResolver {
    /// 创建一个直连图片搜索 API 的解析器。
    #[must_use]
    pub fn new() -> Self {
        Self::with_base_url(BASE_URL_DEEZER)
    }

    /// 使用自定义基地址创建解析器，通常指向部署侧的转发代理。
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http_client: Client::new(),
            base_url,
            cache: TtlCache::new(ARTWORK_MAX_AGE),
        }
    }

    /// 查询艺术家头图 URL。
    ///
    /// 上游失败、空结果或没有可用尺寸时都返回 `None`；
    /// 失败至多重试一次，最终结果（包括 `None`）写入缓存。
    pub async fn artist_image(&self, artist_name: &str) -> Option<String> {
        if artist_name.trim().is_empty() {
            return None;
        }

        let key = artist_name.to_string();
        if let Some(cached) = self.cache.get(&key) {
            return cached;
        }

        let mut image = None;
        for attempt in 0..=ARTWORK_RETRIES {
            match self.search_artist_image(artist_name).await {
                Ok(found) => {
                    image = found;
                    break;
                }
                Err(e) => {
                    debug!("[Artwork] 第 {} 次查询 '{artist_name}' 失败: {e}", attempt + 1);
                }
            }
        }

        self.cache.insert(key, image.clone());
        image
    }

    async fn search_artist_image(&self, artist_name: &str) -> Result<Option<String>> {
        let url = format!(
            "{}/search/artist?q={}&limit=1",
            self.base_url,
            urlencoding::encode(artist_name)
        );
        let response = self.http_client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SoundboardError::UpstreamStatus {
                provider: "deezer",
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("未知状态").to_string(),
            });
        }

        let response_text = response.text().await?;
        let body: DeezerSearchResponse = serde_json::from_str(&response_text)?;
        Ok(body.data.into_iter().next().and_then(pick_picture))
    }
}

/// 从一条搜索结果中挑选最大的可用头图。
fn pick_picture(artist: DeezerArtist) -> Option<String> {
    [
        artist.picture_xl,
        artist.picture_big,
        artist.picture_medium,
    ]
    .into_iter()
    .find(|picture| !picture.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pick_picture_prefers_xl() {
        let artist = DeezerArtist {
            picture_medium: "https://img/md.png".to_string(),
            picture_big: "https://img/big.png".to_string(),
            picture_xl: "https://img/xl.png".to_string(),
        };
        assert_eq!(pick_picture(artist).as_deref(), Some("https://img/xl.png"));
    }

    #[test]
    fn test_pick_picture_falls_back() {
        let artist = DeezerArtist {
            picture_medium: "https://img/md.png".to_string(),
            picture_big: String::new(),
            picture_xl: String::new(),
        };
        assert_eq!(pick_picture(artist).as_deref(), Some("https://img/md.png"));
    }

    #[test]
    fn test_pick_picture_all_empty() {
        let artist = DeezerArtist {
            picture_medium: String::new(),
            picture_big: String::new(),
            picture_xl: String::new(),
        };
        assert_eq!(pick_picture(artist), None);
    }

    #[test]
    fn test_empty_search_response_yields_none() {
        let body: DeezerSearchResponse = serde_json::from_str(r#"{ "data": [] }"#).unwrap();
        assert_eq!(body.data.into_iter().next().and_then(pick_picture), None);
    }

    #[test]
    fn test_with_base_url_trims_trailing_slash() {
        let resolver = ArtworkResolver::with_base_url("https://proxy.example.com/");
        assert_eq!(resolver.base_url, "https://proxy.example.com");
    }

    #[tokio::test]
    async fn test_blank_artist_name_short_circuits() {
        let resolver = ArtworkResolver::with_base_url("http://127.0.0.1:1");
        assert_eq!(resolver.artist_image("   ").await, None);
    }

    #[tokio::test]
    async fn test_unreachable_upstream_resolves_to_none() {
        // 上游完全不可达时，解析器在重试后仍以 None 收场，不报错
        let resolver = ArtworkResolver::with_base_url("http://127.0.0.1:1");
        assert_eq!(resolver.artist_image("Sigur Rós").await, None);
    }

    #[tokio::test]
    #[ignore]
    async fn test_live_artist_image() {
        let resolver = ArtworkResolver::new();
        let image = resolver.artist_image("Radiohead").await;
        assert!(image.is_some_and(|url| url.starts_with("https://")));
    }
}
