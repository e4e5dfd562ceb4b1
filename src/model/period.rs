//! 定义了所有 "Top N" 统计查询所使用的报告时间窗口。

use std::fmt;

use serde::{Deserialize, Serialize};
use strum_macros::EnumIter;

/// 报告时间窗口的封闭枚举。
///
/// 所有热门统计都以该粒度聚合。每个后端自行把窗口翻译为
/// 自己的词汇表；由于枚举是封闭的，翻译表是全函数。
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter,
)]
pub enum Period {
    /// 最近七天。
    #[serde(rename = "7day")]
    SevenDays,
    /// 最近一个月。
    #[serde(rename = "1month")]
    OneMonth,
    /// 最近三个月。
    #[serde(rename = "3month")]
    ThreeMonths,
    /// 最近六个月。
    #[serde(rename = "6month")]
    SixMonths,
    /// 最近十二个月。
    #[serde(rename = "12month")]
    TwelveMonths,
    /// 全部历史。
    #[default]
    #[serde(rename = "overall")]
    Overall,
}

impl Period {
    /// 返回经典 scrobbling API 所使用的窗口标识符。
    #[must_use]
    pub fn api_value(&self) -> &'static str {
        match self {
            Self::SevenDays => "7day",
            Self::OneMonth => "1month",
            Self::ThreeMonths => "3month",
            Self::SixMonths => "6month",
            Self::TwelveMonths => "12month",
            Self::Overall => "overall",
        }
    }

    /// 从窗口标识符解析 `Period`，无法识别的值返回 `None`。
    ///
    /// 用于校验来自配置的默认窗口。
    #[must_use]
    pub fn from_api_value(value: &str) -> Option<Self> {
        match value {
            "7day" => Some(Self::SevenDays),
            "1month" => Some(Self::OneMonth),
            "3month" => Some(Self::ThreeMonths),
            "6month" => Some(Self::SixMonths),
            "12month" => Some(Self::TwelveMonths),
            "overall" => Some(Self::Overall),
            _ => None,
        }
    }

    /// 返回适合展示的窗口标签。
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::SevenDays => "7 Days",
            Self::OneMonth => "Month",
            Self::ThreeMonths => "3 Months",
            Self::SixMonths => "6 Months",
            Self::TwelveMonths => "Year",
            Self::Overall => "All Time",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.api_value())
    }
}
