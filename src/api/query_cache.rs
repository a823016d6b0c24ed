// ==========================================
// Transfer Model - 查询结果缓存
// ==========================================
// 职责: 按查询标识缓存视图结果，带 TTL 与整体失效
// 约束:
// - 进程内共享，多个渲染并发读写安全
// - 失效为整体清空（不做按键加锁）
// - 查询失败不写缓存
// - 查询期间发生失效时，结果不回填缓存
// ==========================================

use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;

// ==========================================
// QueryKey - 查询标识
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Totals,
    Sites,
    MaterialSummary,
    RowsForSite(String),
}

struct CacheEntry {
    value: Arc<dyn Any + Send + Sync>,
    stored_at: Instant,
}

/// 缓存统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

// ==========================================
// QueryCache
// ==========================================
#[derive(Default)]
pub struct QueryCache {
    entries: Mutex<HashMap<QueryKey, CacheEntry>>,
    /// 每次整体失效加一
    generation: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<QueryKey, CacheEntry>> {
        // 缓存内容可随时丢弃，锁中毒时直接沿用内部数据
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// 读取未过期的缓存值
    pub fn get<T>(&self, key: &QueryKey, ttl: Duration) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        let mut entries = self.lock();
        let fresh = match entries.get(key) {
            Some(entry) if entry.stored_at.elapsed() < ttl => {
                entry.value.downcast_ref::<T>().cloned()
            }
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        };

        match fresh {
            Some(value) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(value)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// 写入缓存（覆盖旧值，重新计时）
    pub fn insert<T>(&self, key: QueryKey, value: T)
    where
        T: Send + Sync + 'static,
    {
        self.lock().insert(
            key,
            CacheEntry {
                value: Arc::new(value),
                stored_at: Instant::now(),
            },
        );
    }

    /// 命中则返回缓存，否则执行查询并写入缓存
    ///
    /// 锁只在读写 map 时持有，查询期间不持锁。
    /// 查询开始后若缓存被失效，结果只返回给调用方，不写入缓存。
    pub async fn get_or_compute<T, E, F, Fut>(
        &self,
        key: QueryKey,
        ttl: Duration,
        compute: F,
    ) -> Result<T, E>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(value) = self.get::<T>(&key, ttl) {
            tracing::debug!(?key, "缓存命中");
            return Ok(value);
        }

        tracing::debug!(?key, "缓存未命中，执行查询");
        let generation = self.generation.load(Ordering::Acquire);
        let value = compute().await?;

        let mut entries = self.lock();
        if self.generation.load(Ordering::Acquire) == generation {
            entries.insert(
                key,
                CacheEntry {
                    value: Arc::new(value.clone()),
                    stored_at: Instant::now(),
                },
            );
        } else {
            tracing::debug!(?key, "查询期间缓存已失效，结果不回填");
        }
        Ok(value)
    }

    /// 整体失效
    pub fn invalidate_all(&self) {
        let mut entries = self.lock();
        self.generation.fetch_add(1, Ordering::AcqRel);
        let dropped = entries.len();
        entries.clear();
        tracing::debug!(dropped, "查询缓存已清空");
    }

    pub fn contains(&self, key: &QueryKey) -> bool {
        self.lock().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }
}
