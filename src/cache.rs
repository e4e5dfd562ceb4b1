//! 一个带过期时间的小型并发键值缓存。
//!
//! 每类查询的新鲜度窗口不同（用户资料数分钟、热门统计一分钟、
//! 艺术家头图一整天），调用方在构造缓存时注入各自的 `max_age`，
//! 避免把时间常量散落在各个调用点。

use std::hash::Hash;
use std::time::{Duration, Instant};

use dashmap::DashMap;

/// 键 → (值, 存入时间) 的并发缓存，读取时按 `max_age` 判定过期。
pub struct TtlCache<K, V> {
    entries: DashMap<K, (V, Instant)>,
    max_age: Duration,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    /// 创建一个新的缓存，`max_age` 为条目的最大存活时间。
    #[must_use]
    pub fn new(max_age: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            max_age,
        }
    }

    /// 返回未过期的缓存值；过期条目在读取时被移除。
    pub fn get(&self, key: &K) -> Option<V> {
        {
            let entry = self.entries.get(key)?;
            let (value, stored_at) = entry.value();
            if stored_at.elapsed() < self.max_age {
                return Some(value.clone());
            }
        }
        self.entries.remove(key);
        None
    }

    /// 写入或覆盖一个条目，存入时间重置为当前时刻。
    pub fn insert(&self, key: K, value: V) {
        self.entries.insert(key, (value, Instant::now()));
    }

    /// 使指定键的条目立即失效。
    pub fn invalidate(&self, key: &K) {
        self.entries.remove(key);
    }
}
