use async_trait::async_trait;

use crate::{AnalysisError, BenchmarkKey, BenchmarkSet};

/// Source of industry reference data. Consumed read-only, fetched once per run.
///
/// A missing classification is `Ok(None)`, never an error: the engine degrades
/// to "no benchmark available" for the affected results.
#[async_trait]
pub trait BenchmarkProvider: Send + Sync {
    async fn fetch(&self, key: &BenchmarkKey) -> Result<Option<BenchmarkSet>, AnalysisError>;
}
