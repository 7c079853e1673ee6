use serde::Serialize;

use crate::{Category, Rating, Unit};

/// Value of a metric in a given fiscal year
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YearValue {
    pub year: i32,
    pub value: f64,
}

impl YearValue {
    pub fn new(year: i32, value: f64) -> Self {
        Self { year, value }
    }
}

/// Named sub-metric
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedValue {
    pub name: String,
    pub value: f64,
}

impl NamedValue {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PercentilePoint {
    pub percentile: f64,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioOutcome {
    pub name: String,
    pub probability: f64,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IrrStatus {
    /// Conventional cash flows, single root found
    Unique,
    /// More than one sign change: several or no real roots may exist
    MultipleOrNone,
    /// No root inside the search range
    NotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizationStatus {
    #[default]
    Optimal,
    Infeasible,
    Unbounded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskZone {
    Safe,
    Grey,
    Distress,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StructuralDetails {
    pub series: Vec<YearValue>,
    pub base_year: Option<i32>,
    pub periods: Option<usize>,
    pub components: Vec<NamedValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RatioDetails {
    pub numerator: f64,
    pub denominator: f64,
    pub history: Vec<YearValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CashFlowDetails {
    pub components: Vec<NamedValue>,
    pub history: Vec<YearValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ComparativeDetails {
    pub metric: String,
    pub company_value: f64,
    pub peer_count: usize,
    pub percentile_rank: Option<f64>,
    pub peer_mean: Option<f64>,
    pub peer_median: Option<f64>,
    pub peer_std_dev: Option<f64>,
    pub z_score: Option<f64>,
    pub gap: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValuationDetails {
    pub discount_rate: Option<f64>,
    pub npv: Option<f64>,
    pub irr: Option<f64>,
    pub irr_status: Option<IrrStatus>,
    pub payback_period: Option<f64>,
    pub discounted_payback_period: Option<f64>,
    pub profitability_index: Option<f64>,
    pub terminal_value: Option<f64>,
    pub enterprise_value: Option<f64>,
    pub equity_value: Option<f64>,
    pub present_values: Vec<f64>,
    pub components: Vec<NamedValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SimulationDetails {
    pub iterations: Option<usize>,
    pub seed: Option<u64>,
    pub mean: Option<f64>,
    pub std_dev: Option<f64>,
    pub percentiles: Vec<PercentilePoint>,
    pub value_at_risk: Option<f64>,
    pub conditional_value_at_risk: Option<f64>,
    pub probability_of_loss: Option<f64>,
    pub scenarios: Vec<ScenarioOutcome>,
    pub sensitivities: Vec<NamedValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OptimizationDetails {
    pub status: OptimizationStatus,
    pub objective_value: Option<f64>,
    pub solution: Vec<f64>,
    pub shadow_prices: Vec<f64>,
    pub equilibrium: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatisticalDetails {
    pub observations: usize,
    pub mean: Option<f64>,
    pub std_dev: Option<f64>,
    pub slope: Option<f64>,
    pub intercept: Option<f64>,
    pub r_squared: Option<f64>,
    pub correlation: Option<f64>,
    pub forecast: Vec<YearValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RiskDetails {
    pub score: Option<f64>,
    pub band: Option<String>,
    pub zone: Option<RiskZone>,
    pub default_probability: Option<f64>,
    pub components: Vec<NamedValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DetectionDetails {
    pub current_error: Option<f64>,
    pub mean_error: Option<f64>,
    pub std_error: Option<f64>,
    pub threshold: Option<f64>,
    pub anomalous: bool,
    pub severity: Option<f64>,
    pub components: Vec<NamedValue>,
}

/// Closed set of per-category result shapes
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalysisDetails {
    Structural(StructuralDetails),
    Ratio(RatioDetails),
    CashFlow(CashFlowDetails),
    Comparative(ComparativeDetails),
    Valuation(ValuationDetails),
    Simulation(SimulationDetails),
    Optimization(OptimizationDetails),
    Statistical(StatisticalDetails),
    Risk(RiskDetails),
    Detection(DetectionDetails),
}

/// Rendering hint for chart collaborators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartHint {
    Bar,
    Line,
    Pie,
    Gauge,
    Histogram,
    Table,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultStatus {
    /// Value and benchmark evaluation both available
    Computed,
    /// Value available (or best effort) but evaluation incomplete
    Degraded,
    /// No meaningful value could be computed
    Unavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultIssue {
    InsufficientData,
    NotComputable,
    BenchmarkUnavailable,
    TimedOut,
    CalculatorFailed,
}

/// One analysis outcome. Created once per run, never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub id: String,
    pub category: Category,
    pub name: String,
    pub value: Option<f64>,
    pub unit: Unit,
    pub benchmark: Option<f64>,
    pub rating: Rating,
    pub evaluation: String,
    pub status: ResultStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue: Option<ResultIssue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interpretation: Option<String>,
    pub recommendations: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<AnalysisDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart_hint: Option<ChartHint>,
}
