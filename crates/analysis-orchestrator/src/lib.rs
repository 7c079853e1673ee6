//! Runs the analysis catalog against one company.
//!
//! A run normalizes the company context, fetches its benchmark set once,
//! fans the tier's calculators out over tokio's blocking pool and folds the
//! finished results into an executive summary.

use std::sync::Arc;
use std::time::Instant;

use analysis_catalog::Catalog;
use analysis_core::{
    normalize_context, AnalysisError, AnalysisOptions, BenchmarkKey, BenchmarkProvider,
    BenchmarkSet, CompanyContext,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub mod config;
pub mod dispatcher;
pub mod registry;
pub mod report;
pub mod summary;

pub use config::EngineConfig;
pub use dispatcher::{Job, Outcome, RunData};
pub use registry::{Calculator, CalculatorRegistry};
pub use report::{AnalysisReport, CompanyInfo};
pub use summary::{build_summary, ExecutiveSummary, StatusCounts, SummaryRow, Swot};

pub struct AnalysisOrchestrator {
    catalog: Arc<Catalog>,
    registry: Arc<CalculatorRegistry>,
    benchmarks: Arc<dyn BenchmarkProvider>,
    config: EngineConfig,
}

impl AnalysisOrchestrator {
    /// Standard catalog and calculators
    pub fn new(
        benchmarks: Arc<dyn BenchmarkProvider>,
        config: EngineConfig,
    ) -> Result<Self, AnalysisError> {
        Self::with_registry(
            Catalog::standard()?,
            CalculatorRegistry::standard(),
            benchmarks,
            config,
        )
    }

    /// Fails with `UnknownAnalysis` unless catalog and registry match one to one.
    pub fn with_registry(
        catalog: Catalog,
        registry: CalculatorRegistry,
        benchmarks: Arc<dyn BenchmarkProvider>,
        config: EngineConfig,
    ) -> Result<Self, AnalysisError> {
        registry.validate(&catalog)?;
        info!(
            "Analysis engine ready: {} analyses, simulation timeout {} ms",
            catalog.len(),
            config.simulation_timeout.as_millis()
        );
        Ok(Self {
            catalog: Arc::new(catalog),
            registry: Arc::new(registry),
            benchmarks,
            config,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Per-run options seeded from the engine configuration
    pub fn default_options(&self) -> AnalysisOptions {
        self.config.default_options()
    }

    async fn fetch_benchmarks(&self, key: &BenchmarkKey) -> Option<BenchmarkSet> {
        match self.benchmarks.fetch(key).await {
            Ok(Some(set)) => {
                debug!(
                    "Benchmarks for {}: {} ratios, {} peers",
                    key,
                    set.ratios.len(),
                    set.peers.len()
                );
                Some(set)
            }
            Ok(None) => {
                warn!("No benchmark set for {}; results will be unrated", key);
                None
            }
            Err(e) => {
                warn!("Benchmark fetch failed for {}: {}; results will be unrated", key, e);
                None
            }
        }
    }

    /// Run every analysis the context's tier selects.
    ///
    /// Returns one result per selected catalog entry, in catalog order, or
    /// `AnalysisError::Cancelled` if the token fires before all tasks settle.
    pub async fn run(
        &self,
        context: CompanyContext,
        options: AnalysisOptions,
        cancel: CancellationToken,
    ) -> Result<AnalysisReport, AnalysisError> {
        let started = Instant::now();
        let (context, validation) = normalize_context(context)?;
        for issue in &validation {
            warn!("Data quality issue for {}: {:?}", context.company_name, issue);
        }

        let tier = context.analysis_type;
        let language = context.language;
        let definitions = self.catalog.for_tier(tier);
        info!(
            "Starting {} analysis of {} ({} fiscal years, {} analyses)",
            tier.as_str(),
            context.company_name,
            context.statements.len(),
            definitions.len()
        );

        if cancel.is_cancelled() {
            return Err(AnalysisError::Cancelled);
        }
        let key = BenchmarkKey::for_company(&context);
        let benchmarks = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(AnalysisError::Cancelled),
            set = self.fetch_benchmarks(&key) => set,
        };

        let mut jobs = Vec::with_capacity(definitions.len());
        for definition in definitions {
            let calculator = self
                .registry
                .get(definition.id)
                .copied()
                .ok_or_else(|| AnalysisError::UnknownAnalysis(definition.id.to_string()))?;
            let index = self
                .catalog
                .position(definition.id)
                .ok_or_else(|| AnalysisError::UnknownAnalysis(definition.id.to_string()))?;
            jobs.push(Job {
                index,
                definition: definition.clone(),
                calculator,
            });
        }

        let company = CompanyInfo::from_context(&context);
        let data = Arc::new(RunData {
            statements: context.statements,
            benchmarks: benchmarks.clone(),
            options,
        });
        let analyses = dispatcher::dispatch(
            jobs,
            data,
            self.config.simulation_timeout,
            language,
            &cancel,
        )
        .await?;

        let executive_summary = build_summary(&analyses, language);
        let counts = &executive_summary.status_counts;
        info!(
            "Finished {} analysis of {} in {} ms: {} computed, {} degraded, {} unavailable",
            tier.as_str(),
            company.name,
            started.elapsed().as_millis(),
            counts.computed,
            counts.degraded,
            counts.unavailable
        );

        Ok(AnalysisReport {
            company,
            generated_at: chrono::Utc::now(),
            language,
            tier,
            analyses,
            benchmarks,
            validation,
            executive_summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use analysis_core::fixtures::growing_statements;
    use analysis_core::{
        AnalysisDefinition, AnalysisDetails, AnalysisTier, CalculationInput, Category,
        ComparisonLevel, Computation, Language, LocalizedText, ResultIssue, ResultStatus,
        StaticBenchmarkProvider, Unit,
    };
    use async_trait::async_trait;

    fn context(tier: AnalysisTier) -> CompanyContext {
        CompanyContext {
            company_name: "Sample Trading Co".to_string(),
            statements: growing_statements(),
            sector: "Retail".to_string(),
            activity: "Grocery".to_string(),
            legal_entity: "llc".to_string(),
            comparison_level: ComparisonLevel::Local,
            years_count: 4,
            analysis_type: tier,
            language: Language::En,
        }
    }

    fn options() -> AnalysisOptions {
        AnalysisOptions {
            simulation_iterations: 500,
            ..Default::default()
        }
    }

    fn no_benchmarks() -> Arc<dyn BenchmarkProvider> {
        Arc::new(StaticBenchmarkProvider::new())
    }

    #[tokio::test]
    async fn test_comprehensive_run_covers_catalog_in_order() {
        let engine = AnalysisOrchestrator::new(no_benchmarks(), EngineConfig::default()).unwrap();
        let report = engine
            .run(context(AnalysisTier::Comprehensive), options(), CancellationToken::new())
            .await
            .unwrap();

        let expected: Vec<&str> = engine.catalog().all().iter().map(|d| d.id).collect();
        let actual: Vec<&str> = report.analyses.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(actual, expected);

        let summary = &report.executive_summary;
        assert_eq!(summary.favorable.len() + summary.unfavorable.len(), report.analyses.len());
        assert!(report.analyses.iter().all(|r| !matches!(
            r.issue,
            Some(ResultIssue::CalculatorFailed) | Some(ResultIssue::TimedOut)
        )));
    }

    #[tokio::test]
    async fn test_tier_selection_is_cumulative() {
        let engine = AnalysisOrchestrator::new(no_benchmarks(), EngineConfig::default()).unwrap();
        for (tier, count) in [
            (AnalysisTier::Basic, 87),
            (AnalysisTier::Intermediate, 137),
            (AnalysisTier::Advanced, 162),
        ] {
            let report = engine
                .run(context(tier), options(), CancellationToken::new())
                .await
                .unwrap();
            assert_eq!(report.analyses.len(), count);
            assert_eq!(report.executive_summary.results_table.len(), count);
        }
    }

    #[tokio::test]
    async fn test_industry_benchmark_is_applied() {
        let mut set = BenchmarkSet::default();
        set.ratios.insert("liquidity.currentRatio".to_string(), 1.5);
        let provider = StaticBenchmarkProvider::new().with_set(
            BenchmarkKey::new("retail", "grocery", ComparisonLevel::Local),
            set,
        );
        let engine = AnalysisOrchestrator::new(Arc::new(provider), EngineConfig::default()).unwrap();
        let report = engine
            .run(context(AnalysisTier::Basic), options(), CancellationToken::new())
            .await
            .unwrap();

        let current = report.get("basic.ratios.current_ratio").unwrap();
        assert_eq!(current.value, Some(2.0));
        assert_eq!(current.benchmark, Some(1.5));
        assert_eq!(current.status, ResultStatus::Computed);
        assert!(report.benchmarks.is_some());
    }

    struct CountingProvider {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl BenchmarkProvider for CountingProvider {
        async fn fetch(&self, _key: &BenchmarkKey) -> Result<Option<BenchmarkSet>, AnalysisError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(AnalysisError::BenchmarkUnavailable("service down".to_string()))
        }
    }

    #[tokio::test]
    async fn test_benchmarks_fetched_once_and_failure_degrades() {
        let provider = Arc::new(CountingProvider {
            calls: AtomicUsize::new(0),
        });
        let engine = AnalysisOrchestrator::new(provider.clone(), EngineConfig::default()).unwrap();
        let report = engine
            .run(context(AnalysisTier::Basic), options(), CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
        assert!(report.benchmarks.is_none());
        let current = report.get("basic.ratios.current_ratio").unwrap();
        assert_eq!(current.status, ResultStatus::Degraded);
        assert_eq!(current.issue, Some(ResultIssue::BenchmarkUnavailable));
    }

    fn modeling_definition(id: &'static str) -> AnalysisDefinition {
        AnalysisDefinition::new(
            id,
            Category::Modeling,
            LocalizedText::new("Test model", "نموذج تجريبي"),
            LocalizedText::new("Test model", "نموذج تجريبي"),
            Unit::Currency,
        )
    }

    fn slow(_: &CalculationInput<'_>) -> Result<Computation, AnalysisError> {
        std::thread::sleep(Duration::from_millis(300));
        Ok(Computation::new(1.0, AnalysisDetails::Simulation(Default::default())))
    }

    fn quick(_: &CalculationInput<'_>) -> Result<Computation, AnalysisError> {
        Ok(Computation::new(1.0, AnalysisDetails::Simulation(Default::default())).with_benchmark(Some(1.0)))
    }

    fn exploding(_: &CalculationInput<'_>) -> Result<Computation, AnalysisError> {
        panic!("calculator bug")
    }

    fn small_engine(timeout_ms: u64) -> AnalysisOrchestrator {
        let catalog = Catalog::new(vec![
            modeling_definition("advanced.modeling.slow"),
            modeling_definition("advanced.modeling.quick"),
            modeling_definition("advanced.modeling.exploding"),
        ])
        .unwrap();
        let registry = CalculatorRegistry::new([
            registry::time_boxed("advanced.modeling.slow", slow),
            registry::time_boxed("advanced.modeling.quick", quick),
            registry::time_boxed("advanced.modeling.exploding", exploding),
        ]);
        let config = EngineConfig {
            simulation_timeout: Duration::from_millis(timeout_ms),
            ..Default::default()
        };
        AnalysisOrchestrator::with_registry(catalog, registry, no_benchmarks(), config).unwrap()
    }

    #[tokio::test]
    async fn test_timeout_and_panic_are_isolated() {
        let engine = small_engine(50);
        let report = engine
            .run(context(AnalysisTier::Advanced), options(), CancellationToken::new())
            .await
            .unwrap();

        let ids: Vec<&str> = report.analyses.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["advanced.modeling.slow", "advanced.modeling.quick", "advanced.modeling.exploding"]
        );
        assert_eq!(report.analyses[0].status, ResultStatus::Degraded);
        assert_eq!(report.analyses[0].issue, Some(ResultIssue::TimedOut));
        assert_eq!(report.analyses[0].value, None);
        assert_eq!(report.analyses[1].status, ResultStatus::Computed);
        assert_eq!(report.analyses[2].issue, Some(ResultIssue::CalculatorFailed));
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let engine = small_engine(5_000);
        let cancel = CancellationToken::new();
        cancel.cancel();
        let result = engine.run(context(AnalysisTier::Advanced), options(), cancel).await;
        assert!(matches!(result, Err(AnalysisError::Cancelled)));
    }

    #[tokio::test]
    async fn test_cancelled_while_running() {
        let engine = small_engine(5_000);
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(30)).await;
            trigger.cancel();
        });
        let result = engine.run(context(AnalysisTier::Advanced), options(), cancel).await;
        assert!(matches!(result, Err(AnalysisError::Cancelled)));
    }

    #[test]
    fn test_mismatched_registry_is_fatal_at_startup() {
        let catalog = Catalog::new(vec![modeling_definition("advanced.modeling.slow")]).unwrap();
        let result = AnalysisOrchestrator::with_registry(
            catalog,
            CalculatorRegistry::default(),
            no_benchmarks(),
            EngineConfig::default(),
        );
        assert!(matches!(result, Err(AnalysisError::UnknownAnalysis(_))));
    }
}
