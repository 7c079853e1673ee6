use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::{AnalysisError, BenchmarkProvider, ComparisonLevel, CompanyContext};

/// Wildcard activity used for sector-wide reference data
pub const ANY_ACTIVITY: &str = "*";

/// Classification a benchmark set is keyed by
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BenchmarkKey {
    pub sector: String,
    pub activity: String,
    pub comparison_level: ComparisonLevel,
}

impl BenchmarkKey {
    pub fn new(sector: &str, activity: &str, comparison_level: ComparisonLevel) -> Self {
        Self {
            sector: sector.trim().to_lowercase(),
            activity: activity.trim().to_lowercase(),
            comparison_level,
        }
    }

    pub fn for_company(context: &CompanyContext) -> Self {
        Self::new(&context.sector, &context.activity, context.comparison_level)
    }

    /// Same sector and level, any activity
    pub fn sector_wide(&self) -> Self {
        Self {
            sector: self.sector.clone(),
            activity: ANY_ACTIVITY.to_string(),
            comparison_level: self.comparison_level,
        }
    }
}

impl std::fmt::Display for BenchmarkKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.sector, self.activity, self.comparison_level)
    }
}

/// A peer company's reported metrics, keyed like the reference ratios
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PeerCompany {
    pub name: String,
    #[serde(default)]
    pub metrics: BTreeMap<String, f64>,
}

/// Reference data for one classification
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchmarkSet {
    /// Industry averages, e.g. `liquidity.currentRatio`
    pub ratios: BTreeMap<String, f64>,
    pub peers: Vec<PeerCompany>,
    /// Historical sector series, oldest first, e.g. `growth.revenue`
    pub historical_index: BTreeMap<String, Vec<f64>>,
}

impl BenchmarkSet {
    pub fn ratio(&self, key: &str) -> Option<f64> {
        self.ratios.get(key).copied().filter(|v| v.is_finite())
    }

    /// Finite values of `metric` across all peers that report it
    pub fn peer_values(&self, metric: &str) -> Vec<f64> {
        self.peers
            .iter()
            .filter_map(|p| p.metrics.get(metric).copied())
            .filter(|v| v.is_finite())
            .collect()
    }

    pub fn history(&self, series: &str) -> Option<&[f64]> {
        self.historical_index.get(series).map(|v| v.as_slice())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct BenchmarkEntry {
    key: BenchmarkKey,
    set: BenchmarkSet,
}

/// In-memory provider, typically loaded once from a JSON file.
#[derive(Debug, Clone, Default)]
pub struct StaticBenchmarkProvider {
    sets: HashMap<BenchmarkKey, BenchmarkSet>,
}

impl StaticBenchmarkProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_set(mut self, key: BenchmarkKey, set: BenchmarkSet) -> Self {
        self.insert(key, set);
        self
    }

    pub fn insert(&mut self, key: BenchmarkKey, set: BenchmarkSet) {
        let key = BenchmarkKey::new(&key.sector, &key.activity, key.comparison_level);
        self.sets.insert(key, set);
    }

    /// Parse a JSON array of `{ "key": {...}, "set": {...} }` entries.
    pub fn from_json_str(json: &str) -> Result<Self, AnalysisError> {
        let entries: Vec<BenchmarkEntry> = serde_json::from_str(json)
            .map_err(|e| AnalysisError::Configuration(format!("invalid benchmark file: {}", e)))?;
        let mut provider = Self::new();
        for entry in entries {
            provider.insert(entry.key, entry.set);
        }
        Ok(provider)
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    fn lookup(&self, key: &BenchmarkKey) -> Option<BenchmarkSet> {
        let key = BenchmarkKey::new(&key.sector, &key.activity, key.comparison_level);
        self.sets
            .get(&key)
            .or_else(|| self.sets.get(&key.sector_wide()))
            .cloned()
    }
}

#[async_trait]
impl BenchmarkProvider for StaticBenchmarkProvider {
    async fn fetch(&self, key: &BenchmarkKey) -> Result<Option<BenchmarkSet>, AnalysisError> {
        Ok(self.lookup(key))
    }
}

/// Internal cache entry with timestamp
struct CacheEntry<T> {
    data: T,
    cached_at: DateTime<Utc>,
}

/// TTL cache in front of another provider. Misses (`None`) are cached too so
/// an unknown classification is not re-fetched on every run.
pub struct CachedBenchmarkProvider<P> {
    inner: P,
    ttl: Duration,
    cache: DashMap<BenchmarkKey, CacheEntry<Option<BenchmarkSet>>>,
}

impl<P: BenchmarkProvider> CachedBenchmarkProvider<P> {
    pub fn new(inner: P, ttl_secs: i64) -> Self {
        Self {
            inner,
            ttl: Duration::seconds(ttl_secs),
            cache: DashMap::new(),
        }
    }

    pub fn invalidate(&self, key: &BenchmarkKey) {
        self.cache.remove(key);
    }
}

#[async_trait]
impl<P: BenchmarkProvider> BenchmarkProvider for CachedBenchmarkProvider<P> {
    async fn fetch(&self, key: &BenchmarkKey) -> Result<Option<BenchmarkSet>, AnalysisError> {
        if let Some(entry) = self.cache.get(key) {
            if Utc::now() - entry.cached_at < self.ttl {
                tracing::debug!("Benchmark cache hit for {}", key);
                return Ok(entry.data.clone());
            }
        }

        let data = self.inner.fetch(key).await?;
        self.cache.insert(
            key.clone(),
            CacheEntry {
                data: data.clone(),
                cached_at: Utc::now(),
            },
        );
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn sample_set(current_ratio: f64) -> BenchmarkSet {
        let mut set = BenchmarkSet::default();
        set.ratios.insert("liquidity.currentRatio".to_string(), current_ratio);
        set
    }

    #[tokio::test]
    async fn test_static_provider_falls_back_to_sector_wide() {
        let provider = StaticBenchmarkProvider::new().with_set(
            BenchmarkKey::new("Retail", ANY_ACTIVITY, ComparisonLevel::Local),
            sample_set(1.4),
        );

        let key = BenchmarkKey::new("retail", "grocery", ComparisonLevel::Local);
        let set = provider.fetch(&key).await.unwrap().unwrap();
        assert_eq!(set.ratio("liquidity.currentRatio"), Some(1.4));

        let missing = BenchmarkKey::new("mining", "gold", ComparisonLevel::Local);
        assert!(provider.fetch(&missing).await.unwrap().is_none());
    }

    #[test]
    fn test_from_json_str() {
        let json = r#"[
            {"key": {"sector": "Retail", "activity": "grocery", "comparison_level": "regional"},
             "set": {"ratios": {"liquidity.currentRatio": 1.8},
                     "peers": [{"name": "A", "metrics": {"profitability.roe": 12.0}}]}}
        ]"#;
        let provider = StaticBenchmarkProvider::from_json_str(json).unwrap();
        assert_eq!(provider.len(), 1);
        let set = provider
            .lookup(&BenchmarkKey::new("retail", "grocery", ComparisonLevel::Regional))
            .unwrap();
        assert_eq!(set.peer_values("profitability.roe"), vec![12.0]);
        assert!(StaticBenchmarkProvider::from_json_str("{oops").is_err());
    }

    struct CountingProvider {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl BenchmarkProvider for CountingProvider {
        async fn fetch(&self, _key: &BenchmarkKey) -> Result<Option<BenchmarkSet>, AnalysisError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Some(sample_set(2.0)))
        }
    }

    #[tokio::test]
    async fn test_cached_provider_fetches_once_within_ttl() {
        let calls = Arc::new(AtomicUsize::new(0));
        let cached = CachedBenchmarkProvider::new(CountingProvider { calls: calls.clone() }, 300);
        let key = BenchmarkKey::new("retail", "grocery", ComparisonLevel::Local);

        for _ in 0..3 {
            let set = cached.fetch(&key).await.unwrap().unwrap();
            assert_eq!(set.ratio("liquidity.currentRatio"), Some(2.0));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        cached.invalidate(&key);
        cached.fetch(&key).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
