use anyhow::Result;
use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs;

use crate::config::CacheConfig;

pub mod performance_monitor;
pub use performance_monitor::{CachePerformanceMonitor, CachePerformanceReport};

/// File-backed cache of generated responses
pub struct CacheManager {
    config: CacheConfig,
    performance_monitor: CachePerformanceMonitor,
}

/// Cache entry
#[derive(Debug, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub data: T,
    /// Unix seconds at write time
    pub timestamp: i64,
    /// MD5 of the cache key, also the file stem
    pub key_hash: String,
    pub model_name: Option<String>,
}

impl CacheManager {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            performance_monitor: CachePerformanceMonitor::new(),
        }
    }

    /// MD5 hex digest of a cache key
    pub fn hash_key(&self, key: impl AsRef<[u8]>) -> String {
        let mut hasher = Md5::new();
        hasher.update(key.as_ref());
        format!("{:x}", hasher.finalize())
    }

    fn get_cache_path(&self, category: &str, hash: &str) -> PathBuf {
        self.config
            .cache_dir
            .join(category)
            .join(format!("{}.json", hash))
    }

    fn is_expired(&self, timestamp: i64) -> bool {
        let age = chrono::Utc::now().timestamp() - timestamp;
        age > (self.config.expire_hours * 3600) as i64
    }

    /// Read a cached value. Misses, expired entries and unreadable files all yield `None`.
    pub async fn get<T>(&self, category: &str, key: &str) -> Option<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        if !self.config.enabled {
            return None;
        }

        let hash = self.hash_key(key);
        let cache_path = self.get_cache_path(category, &hash);

        if !cache_path.exists() {
            self.performance_monitor.record_cache_miss(category);
            return None;
        }

        let content = match fs::read_to_string(&cache_path).await {
            Ok(content) => content,
            Err(e) => {
                self.performance_monitor
                    .record_cache_error(category, &format!("read failed: {}", e));
                return None;
            }
        };

        match serde_json::from_str::<CacheEntry<T>>(&content) {
            Ok(entry) if self.is_expired(entry.timestamp) => {
                let _ = fs::remove_file(&cache_path).await;
                self.performance_monitor.record_cache_miss(category);
                None
            }
            Ok(entry) => {
                self.performance_monitor.record_cache_hit(category);
                Some(entry.data)
            }
            Err(e) => {
                self.performance_monitor
                    .record_cache_error(category, &format!("deserialize failed: {}", e));
                None
            }
        }
    }

    /// Store a value, recording which model produced it
    pub async fn set<T>(&self, category: &str, key: &str, data: T, model: Option<&str>) -> Result<()>
    where
        T: Serialize,
    {
        if !self.config.enabled {
            return Ok(());
        }

        let hash = self.hash_key(key);
        let cache_path = self.get_cache_path(category, &hash);

        if let Some(parent) = cache_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let entry = CacheEntry {
            data,
            timestamp: chrono::Utc::now().timestamp(),
            key_hash: hash,
            model_name: model.map(str::to_string),
        };

        let content = match serde_json::to_string_pretty(&entry) {
            Ok(content) => content,
            Err(e) => {
                self.performance_monitor
                    .record_cache_error(category, &format!("serialize failed: {}", e));
                return Err(e.into());
            }
        };

        match fs::write(&cache_path, content).await {
            Ok(_) => {
                self.performance_monitor.record_cache_write(category);
                Ok(())
            }
            Err(e) => {
                self.performance_monitor
                    .record_cache_error(category, &format!("write failed: {}", e));
                Err(e.into())
            }
        }
    }

    pub fn generate_performance_report(&self) -> CachePerformanceReport {
        self.performance_monitor.generate_report()
    }
}
