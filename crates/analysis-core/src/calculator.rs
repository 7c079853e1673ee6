use serde::Serialize;

use crate::{
    AnalysisDefinition, AnalysisDetails, AnalysisError, AnalysisOptions, BenchmarkSet, ChartHint,
    FinancialStatement, RiskZone, YearValue,
};

/// Read-only view handed to every calculator
#[derive(Debug, Clone, Copy)]
pub struct CalculationInput<'a> {
    /// Sorted by fiscal year, oldest first, never empty
    pub statements: &'a [FinancialStatement],
    pub benchmarks: Option<&'a BenchmarkSet>,
    pub options: &'a AnalysisOptions,
    pub definition: &'a AnalysisDefinition,
}

impl<'a> CalculationInput<'a> {
    pub fn latest(&self) -> Result<&'a FinancialStatement, AnalysisError> {
        self.statements
            .last()
            .ok_or_else(|| AnalysisError::input("no financial statements supplied"))
    }

    pub fn previous(&self) -> Option<&'a FinancialStatement> {
        let n = self.statements.len();
        if n >= 2 {
            self.statements.get(n - 2)
        } else {
            None
        }
    }

    /// Fail with insufficient data unless at least `n` fiscal years exist.
    pub fn require_years(&self, n: usize) -> Result<(), AnalysisError> {
        if self.statements.len() < n {
            return Err(AnalysisError::input(format!(
                "requires at least {} fiscal years, {} supplied",
                n,
                self.statements.len()
            )));
        }
        Ok(())
    }

    /// One metric per fiscal year, oldest first
    pub fn series<F>(&self, f: F) -> Vec<YearValue>
    where
        F: Fn(&FinancialStatement) -> f64,
    {
        self.statements
            .iter()
            .map(|s| YearValue::new(s.fiscal_year, f(s)))
            .collect()
    }

    pub fn values<F>(&self, f: F) -> Vec<f64>
    where
        F: Fn(&FinancialStatement) -> f64,
    {
        self.statements.iter().map(f).collect()
    }

    /// Industry reference value for the definition's benchmark key
    pub fn reference_value(&self) -> Option<f64> {
        let key = self.definition.benchmark_key?;
        self.benchmarks?.ratio(key)
    }
}

/// Numeric fact extracted by a calculator. Rendered into localized
/// interpretation text, never free-form.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Observation {
    Growth { percent: f64 },
    Stable,
    IndexLevel { index: f64, base_year: i32 },
    ShareOfTotal { percent: f64 },
    CompoundGrowth { percent: f64, years: usize },
    NegativeValue,
    BelowOne,
    PeerPosition { percentile: f64, peers: usize },
    BenchmarkGap { gap: f64 },
    PeerZScore { z: f64 },
    NpvDecision { accept: bool },
    IrrVersusHurdle { irr: f64, hurdle: f64 },
    MultipleIrr,
    PaybackWithin { years: f64, horizon: usize },
    NoPayback { horizon: usize },
    TerminalValueShare { percent: f64 },
    PriceGap { percent: f64 },
    ValueCreated { amount: f64 },
    ValueDestroyed { amount: f64 },
    ScenarioRange { low: f64, high: f64 },
    LossProbability { percent: f64 },
    ValueAtRisk { amount: f64, confidence: f64 },
    OptimumFound { objective: f64 },
    Infeasible,
    Unbounded,
    Equilibrium { pure: bool },
    TrendFit { slope: f64, r_squared: f64 },
    Forecast { year: i32, value: f64 },
    Volatility { cv: f64 },
    Correlation { r: f64 },
    RatingBand { band: String, default_probability: f64 },
    DistressZone { zone: RiskZone },
    Anomaly { severity: f64 },
    NoAnomaly,
    ManipulationScore { score: f64, likely: bool },
    BenfordConformity { mad: f64, conforming: bool },
    BalanceGap { percent: f64 },
    ConservativeLeverage,
    HighLeverage,
}

/// What a calculator returns: the primary value plus its sub-metrics
#[derive(Debug, Clone, PartialEq)]
pub struct Computation {
    pub value: f64,
    pub details: AnalysisDetails,
    pub observations: Vec<Observation>,
    /// Calculator-derived benchmark, used when the definition has no
    /// industry key (e.g. hurdle rate for IRR, zero for NPV)
    pub benchmark: Option<f64>,
    pub chart_hint: Option<ChartHint>,
}

impl Computation {
    pub fn new(value: f64, details: AnalysisDetails) -> Self {
        Self {
            value,
            details,
            observations: Vec::new(),
            benchmark: None,
            chart_hint: None,
        }
    }

    pub fn observe(mut self, observation: Observation) -> Self {
        self.observations.push(observation);
        self
    }

    pub fn observe_all(mut self, observations: impl IntoIterator<Item = Observation>) -> Self {
        self.observations.extend(observations);
        self
    }

    pub fn with_benchmark(mut self, benchmark: Option<f64>) -> Self {
        self.benchmark = benchmark;
        self
    }

    pub fn chart(mut self, hint: ChartHint) -> Self {
        self.chart_hint = Some(hint);
        self
    }
}

/// Shared calculator contract
pub type CalculatorFn = fn(&CalculationInput<'_>) -> Result<Computation, AnalysisError>;
