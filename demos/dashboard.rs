//! 用于演示 `soundboard` 库的核心功能。
//!
//! ## 如何运行
//!
//! ```bash
//! SOUNDBOARD_PROVIDER=listenbrainz cargo run --example dashboard -- rob
//! # 或使用 Last.fm:
//! SOUNDBOARD_API_KEY=<key> cargo run --example dashboard -- rj
//! ```

use chrono::Utc;
use soundboard_rs::{Soundboard, format};
use tracing::{Level, error, info};

#[tokio::main]
async fn main() -> soundboard_rs::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let soundboard = Soundboard::from_env();
    if !soundboard.is_configured() {
        error!(
            "未配置任何提供商。请设置 SOUNDBOARD_PROVIDER=listenbrainz，\
             或为 Last.fm 模式设置 SOUNDBOARD_API_KEY。"
        );
        return Ok(());
    }

    let username = std::env::args()
        .nth(1)
        .or_else(|| soundboard.config().username.clone());
    let Some(username) = username else {
        error!("请通过参数或 SOUNDBOARD_USERNAME 指定用户名。");
        return Ok(());
    };

    info!(
        "正在为 '{}' 拉取 {} 的数据...",
        username,
        soundboard.config().provider.display_name()
    );

    let dashboard = soundboard.dashboard(&username)?;
    dashboard.refresh().await;
    let data = dashboard.snapshot();

    if let Some(message) = &data.error {
        error!("部分查询失败: {message}");
    }

    let now = Utc::now().timestamp();

    if let Some(user) = &data.user {
        println!("\n== {} ==", user.display_name);
        println!("总收听次数: {}", format::format_number(user.playcount));
        if let Some(registered) = user.registered_timestamp {
            println!("注册于: {}", format::format_date(registered));
            println!(
                "平均每天: {:.1} 次",
                format::scrobbles_per_day(user.playcount, registered, now)
            );
        }
        if let Some(artist_count) = user.artist_count {
            println!("艺术家数: {}", format::format_number(artist_count));
        }
        println!("主页: {}", user.profile_url);
    }

    if !data.recent_tracks.is_empty() {
        println!("\n-- 最近收听 ({}) --", data.recent_tracks.len());
        for track in &data.recent_tracks {
            let when = match track.played_at {
                Some(played_at) => format::time_ago(played_at, now),
                None => "▶ 正在播放".to_string(),
            };
            println!("  {} - {} [{when}]", track.artist, track.name);
        }
    }

    if !data.top_artists.is_empty() {
        println!("\n-- 热门艺术家 ({}) --", data.period.label());
        for artist in &data.top_artists {
            println!("  {:>6}  {}", artist.playcount, artist.name);
        }

        // 顺带演示头图补充：失败时静默回退
        if let Some(first) = data.top_artists.first() {
            match soundboard.artist_image(&first.name).await {
                Some(url) => info!("'{}' 的头图: {url}", first.name),
                None => info!("'{}' 没有可用头图。", first.name),
            }
        }
    }

    if !data.top_albums.is_empty() {
        println!("\n-- 热门专辑 ({}) --", data.period.label());
        for album in &data.top_albums {
            println!("  {:>6}  {} - {}", album.playcount, album.artist, album.name);
        }
    }

    if !data.top_tracks.is_empty() {
        println!("\n-- 热门曲目 ({}) --", data.period.label());
        for track in &data.top_tracks {
            println!("  {:>6}  {} - {}", track.playcount, track.artist, track.name);
        }
    }

    Ok(())
}
