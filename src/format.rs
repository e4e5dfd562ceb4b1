//! 供展示层使用的纯格式化工具。
//!
//! 所有函数都是确定性的：涉及"现在"的计算一律由调用方注入时间，
//! 便于测试。

use chrono::{DateTime, Utc};

const SECONDS_PER_DAY: i64 = 86_400;

/// 将数字格式化为缩写形式。
///
/// `1_234_567` → `"1.2M"`，`4_567` → `"4.6K"`，小数字原样输出。
#[must_use]
pub fn format_number(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

/// 将 Unix 秒格式化为 "January 2006" 风格的月份，用于注册时间展示。
#[must_use]
pub fn format_date(unix_seconds: i64) -> String {
    DateTime::<Utc>::from_timestamp(unix_seconds, 0)
        .map(|date| date.format("%B %Y").to_string())
        .unwrap_or_default()
}

/// 将过去的时间点渲染为相对时间。
///
/// 一分钟内为 "just now"，此后依次为分钟、小时、天，
/// 超过一周退回到 "Mar 5" 风格的日期。
#[must_use]
pub fn time_ago(unix_seconds: i64, now_unix_seconds: i64) -> String {
    let diff = now_unix_seconds - unix_seconds;
    let minutes = diff / 60;
    let hours = diff / 3_600;
    let days = diff / SECONDS_PER_DAY;

    if minutes < 1 {
        "just now".to_string()
    } else if minutes < 60 {
        format!("{minutes}m ago")
    } else if hours < 24 {
        format!("{hours}h ago")
    } else if days < 7 {
        format!("{days}d ago")
    } else {
        DateTime::<Utc>::from_timestamp(unix_seconds, 0)
            .map(|date| date.format("%b %-d").to_string())
            .unwrap_or_default()
    }
}

/// 计算平均每日收听次数：总收听 ÷ max(1, 注册以来的整天数)。
///
/// 注册不足一天（或时钟偏差导致的负数）按一天计，避免除零与虚高。
#[must_use]
pub fn scrobbles_per_day(playcount: u64, registered_unix_seconds: i64, now_unix_seconds: i64) -> f64 {
    let days = ((now_unix_seconds - registered_unix_seconds) / SECONDS_PER_DAY).max(1);
    playcount as f64 / days as f64
}
