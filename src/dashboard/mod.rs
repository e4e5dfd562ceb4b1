//! 数据聚合编排器。
//!
//! 针对一个用户维护五个互相独立的查询状态（个人资料、最近收听、
//! 热门艺术家/专辑/曲目），支持并发刷新、切换时间窗口时只重查
//! 窗口相关的三个查询，以及整体重试。

use std::sync::{
    Arc, RwLock, RwLockReadGuard, RwLockWriteGuard,
    atomic::{AtomicU64, Ordering},
};
use std::time::Duration;

use tracing::{debug, info};

use crate::{
    cache::TtlCache,
    error::SoundboardError,
    model::{
        generic::{RecentTrack, TopAlbum, TopArtist, TopTrack, UserInfo},
        period::Period,
    },
    providers::ScrobbleProvider,
};

/// 用户资料的新鲜度窗口。
const USER_MAX_AGE: Duration = Duration::from_secs(5 * 60);
/// 热门统计的新鲜度窗口。
const TOP_MAX_AGE: Duration = Duration::from_secs(60);
/// 最近收听的自动刷新间隔。最近收听不设新鲜度窗口，每次都重新拉取。
pub const RECENT_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

const RECENT_TRACKS_LIMIT: u32 = 10;
const TOP_ARTISTS_LIMIT: u32 = 12;
const TOP_ALBUMS_LIMIT: u32 = 8;
const TOP_TRACKS_LIMIT: u32 = 10;

/// 单个查询的状态：最近一次的数据、错误与是否已有过结果。
#[derive(Debug)]
struct QueryState<T> {
    data: Option<T>,
    error: Option<Arc<SoundboardError>>,
    resolved: bool,
}

impl<T> Default for QueryState<T> {
    fn default() -> Self {
        Self {
            data: None,
            error: None,
            resolved: false,
        }
    }
}

impl<T> QueryState<T> {
    /// 用一次查询的结果更新状态。失败时保留旧数据，只记录错误。
    fn settle(&mut self, result: Result<T, SoundboardError>) {
        match result {
            Ok(data) => {
                self.data = Some(data);
                self.error = None;
            }
            Err(e) => {
                self.error = Some(Arc::new(e));
            }
        }
        self.resolved = true;
    }

    fn reset(&mut self) {
        self.data = None;
        self.error = None;
        self.resolved = false;
    }
}

#[derive(Debug, Default)]
struct DashboardState {
    period: Period,
    user: QueryState<UserInfo>,
    recent_tracks: QueryState<Vec<RecentTrack>>,
    top_artists: QueryState<Vec<TopArtist>>,
    top_albums: QueryState<Vec<TopAlbum>>,
    top_tracks: QueryState<Vec<TopTrack>>,
    /// 进行中的窗口相关查询数。
    period_inflight: u32,
}

/// 某一时刻的仪表盘快照，供展示层读取。
#[derive(Debug, Clone)]
pub struct DashboardData {
    /// 用户个人资料；尚未加载到时为 `None`。
    pub user: Option<UserInfo>,
    /// 最近收听的曲目。
    pub recent_tracks: Vec<RecentTrack>,
    /// 热门艺术家。
    pub top_artists: Vec<TopArtist>,
    /// 热门专辑。
    pub top_albums: Vec<TopAlbum>,
    /// 热门曲目。
    pub top_tracks: Vec<TopTrack>,
    /// 整体加载中：仅在个人资料查询尚未有结果时为真。
    pub loading: bool,
    /// 窗口加载中：只影响与时间窗口相关的三个面板，
    /// 切换窗口不会让整个仪表盘回到空白。
    pub period_loading: bool,
    /// 当前生效的报告时间窗口。
    pub period: Period,
    /// 按固定优先级（用户、最近收听、艺术家、专辑、曲目）取出的
    /// 第一个错误消息。
    pub error: Option<String>,
}

/// 仪表盘编排器，以用户名为键聚合五个查询。
///
/// 提供商在构造时注入，此后不再变化。查询结果缓存在各自的
/// 新鲜度窗口内，窗口切换通过 epoch 计数丢弃过期的在途结果。
pub struct Dashboard {
    provider: Arc<dyn ScrobbleProvider>,
    username: String,
    state: RwLock<DashboardState>,
    period_epoch: AtomicU64,
    user_cache: TtlCache<String, UserInfo>,
    top_artists_cache: TtlCache<(String, Period), Vec<TopArtist>>,
    top_albums_cache: TtlCache<(String, Period), Vec<TopAlbum>>,
    top_tracks_cache: TtlCache<(String, Period), Vec<TopTrack>>,
}

impl Dashboard {
    /// 为指定用户创建一个仪表盘编排器。
    pub fn new(
        provider: Arc<dyn ScrobbleProvider>,
        username: impl Into<String>,
        default_period: Period,
    ) -> Self {
        let state = DashboardState {
            period: default_period,
            ..DashboardState::default()
        };
        Self {
            provider,
            username: username.into(),
            state: RwLock::new(state),
            period_epoch: AtomicU64::new(0),
            user_cache: TtlCache::new(USER_MAX_AGE),
            top_artists_cache: TtlCache::new(TOP_MAX_AGE),
            top_albums_cache: TtlCache::new(TOP_MAX_AGE),
            top_tracks_cache: TtlCache::new(TOP_MAX_AGE),
        }
    }

    /// 当前仪表盘对应的用户名。
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// 当前生效的时间窗口。
    #[must_use]
    pub fn period(&self) -> Period {
        self.read_state().period
    }

    fn read_state(&self) -> RwLockReadGuard<'_, DashboardState> {
        self.state.read().expect("仪表盘状态锁已中毒")
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, DashboardState> {
        self.state.write().expect("仪表盘状态锁已中毒")
    }

    /// 并发执行全部五个查询，各查询完成时独立写回自身状态。
    ///
    /// 用户资料与热门统计先查各自的缓存，新鲜则不触网；
    /// 最近收听始终重新拉取。
    pub async fn refresh(&self) {
        let period = self.period();
        let epoch = self.period_epoch.load(Ordering::Acquire);

        let user_fut = async {
            let result = self.fetch_user().await;
            self.write_state().user.settle(result);
        };
        let recent_fut = async {
            let result = self
                .provider
                .get_recent_tracks(&self.username, RECENT_TRACKS_LIMIT)
                .await;
            self.write_state().recent_tracks.settle(result);
        };
        let period_fut = self.refresh_period_queries(period, epoch);

        futures::join!(user_fut, recent_fut, period_fut);
    }

    /// 切换报告时间窗口。
    ///
    /// 只重新发起三个与窗口相关的查询，用户资料与最近收听不受影响；
    /// 窗口面板被重置。若在拉取返回之前窗口再次变化，过期结果被丢弃。
    pub async fn set_period(&self, period: Period) {
        {
            let state = self.read_state();
            if state.period == period {
                return;
            }
        }

        let epoch = self.period_epoch.fetch_add(1, Ordering::AcqRel) + 1;
        {
            let mut state = self.write_state();
            state.period = period;
            state.top_artists.reset();
            state.top_albums.reset();
            state.top_tracks.reset();
        }
        info!("[Dashboard] 时间窗口切换为 {period}");

        self.refresh_period_queries(period, epoch).await;
    }

    /// 只刷新最近收听，由定时器按固定间隔驱动。不触碰窗口加载状态。
    pub async fn refresh_recent_tracks(&self) {
        let result = self
            .provider
            .get_recent_tracks(&self.username, RECENT_TRACKS_LIMIT)
            .await;
        self.write_state().recent_tracks.settle(result);
    }

    /// 手动整体重试：无论哪个查询失败，五个查询全部重新发起，
    /// 相关缓存先行失效。
    pub async fn retry(&self) {
        let period = self.period();
        self.user_cache.invalidate(&self.username);
        let key = (self.username.clone(), period);
        self.top_artists_cache.invalidate(&key);
        self.top_albums_cache.invalidate(&key);
        self.top_tracks_cache.invalidate(&key);

        info!("[Dashboard] 手动重试，重新发起全部查询。");
        self.refresh().await;
    }

    /// 按固定间隔刷新最近收听的循环，直到调用方丢弃该任务。
    pub async fn auto_refresh_loop(&self) {
        let mut interval = tokio::time::interval(RECENT_REFRESH_INTERVAL);
        // 第一次 tick 立即完成，跳过它以避免与初始刷新重叠
        interval.tick().await;
        loop {
            interval.tick().await;
            self.refresh_recent_tracks().await;
        }
    }

    /// 生成当前时刻的不可变快照。
    #[must_use]
    pub fn snapshot(&self) -> DashboardData {
        let state = self.read_state();
        let error = [
            state.user.error.as_ref(),
            state.recent_tracks.error.as_ref(),
            state.top_artists.error.as_ref(),
            state.top_albums.error.as_ref(),
            state.top_tracks.error.as_ref(),
        ]
        .into_iter()
        .flatten()
        .next()
        .map(|e| e.to_string());

        DashboardData {
            user: state.user.data.clone(),
            recent_tracks: state.recent_tracks.data.clone().unwrap_or_default(),
            top_artists: state.top_artists.data.clone().unwrap_or_default(),
            top_albums: state.top_albums.data.clone().unwrap_or_default(),
            top_tracks: state.top_tracks.data.clone().unwrap_or_default(),
            loading: !state.user.resolved,
            period_loading: state.period_inflight > 0,
            period: state.period,
            error,
        }
    }

    /// 并发拉取三个窗口相关查询。
    ///
    /// `epoch` 标记发起拉取时的窗口代次：写回前再次核对，
    /// 被后续切换取代的结果直接丢弃。
    async fn refresh_period_queries(&self, period: Period, epoch: u64) {
        let artists_fut = async {
            self.begin_period_fetch();
            let result = self.fetch_top_artists(period).await;
            self.finish_period_fetch(epoch, |state| state.top_artists.settle(result));
        };
        let albums_fut = async {
            self.begin_period_fetch();
            let result = self.fetch_top_albums(period).await;
            self.finish_period_fetch(epoch, |state| state.top_albums.settle(result));
        };
        let tracks_fut = async {
            self.begin_period_fetch();
            let result = self.fetch_top_tracks(period).await;
            self.finish_period_fetch(epoch, |state| state.top_tracks.settle(result));
        };

        futures::join!(artists_fut, albums_fut, tracks_fut);
    }

    fn begin_period_fetch(&self) {
        self.write_state().period_inflight += 1;
    }

    fn finish_period_fetch(&self, epoch: u64, apply: impl FnOnce(&mut DashboardState)) {
        let mut state = self.write_state();
        state.period_inflight -= 1;
        if self.period_epoch.load(Ordering::Acquire) == epoch {
            apply(&mut state);
        } else {
            debug!("[Dashboard] 时间窗口已再次切换，丢弃过期的查询结果。");
        }
    }

    async fn fetch_user(&self) -> Result<UserInfo, SoundboardError> {
        if let Some(cached) = self.user_cache.get(&self.username) {
            debug!("[Dashboard] 用户资料缓存命中: {}", self.username);
            return Ok(cached);
        }
        let user = self.provider.get_user_info(&self.username).await?;
        self.user_cache.insert(self.username.clone(), user.clone());
        Ok(user)
    }

    async fn fetch_top_artists(&self, period: Period) -> Result<Vec<TopArtist>, SoundboardError> {
        let key = (self.username.clone(), period);
        if let Some(cached) = self.top_artists_cache.get(&key) {
            debug!("[Dashboard] 热门艺术家缓存命中: {} @ {period}", self.username);
            return Ok(cached);
        }
        let artists = self
            .provider
            .get_top_artists(&self.username, period, TOP_ARTISTS_LIMIT)
            .await?;
        self.top_artists_cache.insert(key, artists.clone());
        Ok(artists)
    }

    async fn fetch_top_albums(&self, period: Period) -> Result<Vec<TopAlbum>, SoundboardError> {
        let key = (self.username.clone(), period);
        if let Some(cached) = self.top_albums_cache.get(&key) {
            debug!("[Dashboard] 热门专辑缓存命中: {} @ {period}", self.username);
            return Ok(cached);
        }
        let albums = self
            .provider
            .get_top_albums(&self.username, period, TOP_ALBUMS_LIMIT)
            .await?;
        self.top_albums_cache.insert(key, albums.clone());
        Ok(albums)
    }

    async fn fetch_top_tracks(&self, period: Period) -> Result<Vec<TopTrack>, SoundboardError> {
        let key = (self.username.clone(), period);
        if let Some(cached) = self.top_tracks_cache.get(&key) {
            debug!("[Dashboard] 热门曲目缓存命中: {} @ {period}", self.username);
            return Ok(cached);
        }
        let tracks = self
            .provider
            .get_top_tracks(&self.username, period, TOP_TRACKS_LIMIT)
            .await?;
        self.top_tracks_cache.insert(key, tracks.clone());
        Ok(tracks)
    }
}
