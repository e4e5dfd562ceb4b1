//! 定义了整个 `soundboard` 库的错误类型 `SoundboardError`。

use thiserror::Error;

/// `soundboard` 库的通用错误枚举。
#[derive(Error, Debug)]
pub enum SoundboardError {
    /// 网络请求失败 (源自 `reqwest::Error`)
    #[error("网络请求失败: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// JSON 解析失败 (源自 `serde_json::Error`)
    #[error("JSON 解析失败: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// 上游 API 返回了非成功的 HTTP 状态码
    #[error("{provider} API 返回错误状态 {status}: {message}")]
    UpstreamStatus {
        /// 出错的提供商名称。
        provider: &'static str,
        /// HTTP 状态码。
        status: u16,
        /// 状态说明。
        message: String,
    },

    /// API 返回错误或空数据
    #[error("API 为 `{0}` 返回了错误或空数据")]
    ApiError(String),

    /// 未解析出任何数据提供商
    ///
    /// 这是一个配置状态而非运行时故障：Last.fm 模式要求非空的 API Key，
    /// 缺少 Key 时客户端拒绝建立任何查询。
    #[error("未配置数据提供商: Last.fm 模式需要非空的 API Key")]
    Unconfigured,
}

/// `SoundboardError` 的 `Result` 类型别名，方便在函数签名中使用。
pub type Result<T> = std::result::Result<T, SoundboardError>;
