use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use tracing::{debug, warn};

/// Cache performance monitor
#[derive(Clone)]
pub struct CachePerformanceMonitor {
    metrics: Arc<CacheMetrics>,
}

#[derive(Default)]
pub struct CacheMetrics {
    pub cache_hits: AtomicUsize,
    pub cache_misses: AtomicUsize,
    pub cache_writes: AtomicUsize,
    pub cache_errors: AtomicUsize,
    /// Per-category counters
    pub category_metrics: std::sync::RwLock<HashMap<String, CategoryMetrics>>,
}

#[derive(Default)]
pub struct CategoryMetrics {
    pub hits: AtomicU64,
    pub misses: AtomicU64,
}

/// Cache performance report
#[derive(Debug, Serialize, Deserialize)]
pub struct CachePerformanceReport {
    pub hit_rate: f64,
    /// Lookups (hits + misses)
    pub total_operations: usize,
    pub cache_hits: usize,
    pub cache_misses: usize,
    pub cache_writes: usize,
    pub cache_errors: usize,
    pub category_stats: HashMap<String, CategoryPerformanceStats>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryPerformanceStats {
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
}

fn hit_rate(hits: f64, misses: f64) -> f64 {
    if hits + misses > 0.0 {
        hits / (hits + misses)
    } else {
        0.0
    }
}

impl CachePerformanceMonitor {
    pub fn new() -> Self {
        Self {
            metrics: Arc::new(CacheMetrics::default()),
        }
    }

    pub fn record_cache_hit(&self, category: &str) {
        self.metrics.cache_hits.fetch_add(1, Ordering::Relaxed);

        if let Ok(mut category_map) = self.metrics.category_metrics.write() {
            let category_metrics = category_map.entry(category.to_string()).or_default();
            category_metrics.hits.fetch_add(1, Ordering::Relaxed);
        }

        debug!(category, "cache hit");
    }

    pub fn record_cache_miss(&self, category: &str) {
        self.metrics.cache_misses.fetch_add(1, Ordering::Relaxed);

        if let Ok(mut category_map) = self.metrics.category_metrics.write() {
            let category_metrics = category_map.entry(category.to_string()).or_default();
            category_metrics.misses.fetch_add(1, Ordering::Relaxed);
        }

        debug!(category, "cache miss");
    }

    pub fn record_cache_write(&self, category: &str) {
        self.metrics.cache_writes.fetch_add(1, Ordering::Relaxed);
        debug!(category, "cache write");
    }

    pub fn record_cache_error(&self, category: &str, error: &str) {
        self.metrics.cache_errors.fetch_add(1, Ordering::Relaxed);
        warn!(category, error, "cache error");
    }

    pub fn generate_report(&self) -> CachePerformanceReport {
        let hits = self.metrics.cache_hits.load(Ordering::Relaxed);
        let misses = self.metrics.cache_misses.load(Ordering::Relaxed);
        let writes = self.metrics.cache_writes.load(Ordering::Relaxed);
        let errors = self.metrics.cache_errors.load(Ordering::Relaxed);

        let category_stats = match self.metrics.category_metrics.read() {
            Ok(category_map) => category_map
                .iter()
                .map(|(category, metrics)| {
                    let cat_hits = metrics.hits.load(Ordering::Relaxed);
                    let cat_misses = metrics.misses.load(Ordering::Relaxed);
                    (
                        category.clone(),
                        CategoryPerformanceStats {
                            hits: cat_hits,
                            misses: cat_misses,
                            hit_rate: hit_rate(cat_hits as f64, cat_misses as f64),
                        },
                    )
                })
                .collect(),
            Err(_) => HashMap::new(),
        };

        CachePerformanceReport {
            hit_rate: hit_rate(hits as f64, misses as f64),
            total_operations: hits + misses,
            cache_hits: hits,
            cache_misses: misses,
            cache_writes: writes,
            cache_errors: errors,
            category_stats,
        }
    }
}

impl Default for CachePerformanceMonitor {
    fn default() -> Self {
        Self::new()
    }
}
