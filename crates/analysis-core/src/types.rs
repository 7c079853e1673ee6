use serde::{Deserialize, Serialize};

/// Balance sheet for one fiscal year
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BalanceSheet {
    // Current assets
    pub cash: f64,
    pub short_term_investments: f64,
    pub accounts_receivable: f64,
    pub inventory: f64,
    pub prepaid_expenses: f64,
    pub other_current_assets: f64,
    pub total_current_assets: f64,

    // Non-current assets
    pub property_plant_equipment: f64,
    pub intangible_assets: f64,
    pub long_term_investments: f64,
    pub other_non_current_assets: f64,
    pub total_non_current_assets: f64,
    pub total_assets: f64,

    // Current liabilities
    pub accounts_payable: f64,
    pub short_term_debt: f64,
    pub accrued_liabilities: f64,
    pub other_current_liabilities: f64,
    pub total_current_liabilities: f64,

    // Non-current liabilities
    pub long_term_debt: f64,
    pub other_non_current_liabilities: f64,
    pub total_non_current_liabilities: f64,
    pub total_liabilities: f64,

    // Equity
    pub share_capital: f64,
    pub retained_earnings: f64,
    pub other_equity: f64,
    pub total_equity: f64,
}

impl BalanceSheet {
    /// Interest-bearing debt (short + long term)
    pub fn total_debt(&self) -> f64 {
        self.short_term_debt + self.long_term_debt
    }

    pub fn working_capital(&self) -> f64 {
        self.total_current_assets - self.total_current_liabilities
    }

    /// Cash, marketable securities and receivables
    pub fn quick_assets(&self) -> f64 {
        self.cash + self.short_term_investments + self.accounts_receivable
    }

    /// Equity plus interest-bearing debt
    pub fn invested_capital(&self) -> f64 {
        self.total_equity + self.total_debt()
    }

    /// Total assets less current liabilities
    pub fn capital_employed(&self) -> f64 {
        self.total_assets - self.total_current_liabilities
    }

    pub fn net_debt(&self) -> f64 {
        self.total_debt() - self.cash - self.short_term_investments
    }
}

/// Income statement (revenue to net income waterfall)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IncomeStatement {
    pub revenue: f64,
    pub cost_of_goods_sold: f64,
    pub gross_profit: f64,
    pub operating_expenses: f64,
    pub depreciation_amortization: f64,
    /// EBIT
    pub operating_income: f64,
    pub interest_expense: f64,
    pub other_income: f64,
    pub income_before_tax: f64,
    pub income_tax: f64,
    pub net_income: f64,
}

impl IncomeStatement {
    pub fn ebitda(&self) -> f64 {
        self.operating_income + self.depreciation_amortization
    }
}

/// Cash flow statement totals. Outflows are negative.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CashFlowStatement {
    pub operating_cash_flow: f64,
    pub investing_cash_flow: f64,
    pub financing_cash_flow: f64,
    /// Signed negative (cash out)
    pub capital_expenditures: f64,
    /// Signed negative (cash out)
    pub dividends_paid: f64,
    pub net_change_in_cash: f64,
}

impl CashFlowStatement {
    /// Operating cash flow plus (negative) capital expenditures
    pub fn free_cash_flow(&self) -> f64 {
        self.operating_cash_flow + self.capital_expenditures
    }
}

/// Optional market data for listed companies
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketData {
    pub share_price: f64,
    pub shares_outstanding: f64,
    pub dividends_per_share: f64,
}

impl MarketData {
    pub fn market_cap(&self) -> f64 {
        self.share_price * self.shares_outstanding
    }
}

/// One fiscal year's normalized statements. Produced once by the ingestion
/// step and never mutated afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FinancialStatement {
    pub fiscal_year: i32,
    #[serde(default)]
    pub balance_sheet: BalanceSheet,
    #[serde(default)]
    pub income_statement: IncomeStatement,
    #[serde(default)]
    pub cash_flow: CashFlowStatement,
    #[serde(default)]
    pub market: Option<MarketData>,
}

impl FinancialStatement {
    /// Equity at market value when listed, book value otherwise
    pub fn equity_value(&self) -> f64 {
        match &self.market {
            Some(m) if m.market_cap() > 0.0 => m.market_cap(),
            _ => self.balance_sheet.total_equity,
        }
    }

    /// Net operating profit after tax at the given rate
    pub fn nopat(&self, tax_rate: f64) -> f64 {
        self.income_statement.operating_income * (1.0 - tax_rate)
    }

    /// Weighted average cost of capital from this year's capital structure.
    /// Falls back to the cost of equity when there is no capital at all.
    pub fn wacc(&self, options: &AnalysisOptions) -> f64 {
        let equity = self.equity_value().max(0.0);
        let debt = self.balance_sheet.total_debt().max(0.0);
        let total = equity + debt;
        if total <= 0.0 {
            return options.cost_of_equity();
        }
        equity / total * options.cost_of_equity()
            + debt / total * options.cost_of_debt * (1.0 - options.tax_rate)
    }
}

/// Benchmark comparison scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonLevel {
    #[default]
    Local,
    Regional,
    International,
}

impl std::fmt::Display for ComparisonLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComparisonLevel::Local => write!(f, "local"),
            ComparisonLevel::Regional => write!(f, "regional"),
            ComparisonLevel::International => write!(f, "international"),
        }
    }
}

/// Requested analysis depth. Tiers are cumulative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisTier {
    #[default]
    Basic,
    Intermediate,
    Advanced,
    Comprehensive,
}

impl AnalysisTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisTier::Basic => "basic",
            AnalysisTier::Intermediate => "intermediate",
            AnalysisTier::Advanced => "advanced",
            AnalysisTier::Comprehensive => "comprehensive",
        }
    }

    /// Whether an analysis belonging to `other` runs when `self` is requested
    pub fn includes(&self, other: AnalysisTier) -> bool {
        other <= *self
    }
}

/// Output language for every user-visible string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    Ar,
    #[default]
    En,
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ar" | "arabic" => Ok(Language::Ar),
            "en" | "english" => Ok(Language::En),
            other => Err(format!("unsupported language '{}'", other)),
        }
    }
}

/// Company under analysis plus its classification and run request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyContext {
    pub company_name: String,
    pub statements: Vec<FinancialStatement>,
    #[serde(default)]
    pub sector: String,
    #[serde(default)]
    pub activity: String,
    #[serde(default)]
    pub legal_entity: String,
    #[serde(default)]
    pub comparison_level: ComparisonLevel,
    #[serde(default)]
    pub years_count: usize,
    #[serde(default)]
    pub analysis_type: AnalysisTier,
    #[serde(default)]
    pub language: Language,
}

/// Explicit investment project for capital budgeting analyses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestmentProject {
    pub initial_investment: f64,
    pub cash_flows: Vec<f64>,
    #[serde(default)]
    pub reinvestment_rate: Option<f64>,
}

/// Named scenario with its probability and assumption set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub probability: f64,
    pub revenue_growth: f64,
    pub fcf_margin: f64,
    pub discount_rate: f64,
}

/// Declared input distribution for Monte Carlo sampling
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputDistribution {
    Normal { mean: f64, std_dev: f64 },
    Uniform { min: f64, max: f64 },
    Triangular { min: f64, mode: f64, max: f64 },
    Fixed { value: f64 },
}

impl InputDistribution {
    pub fn expected(&self) -> f64 {
        match *self {
            InputDistribution::Normal { mean, .. } => mean,
            InputDistribution::Uniform { min, max } => (min + max) / 2.0,
            InputDistribution::Triangular { min, mode, max } => (min + mode + max) / 3.0,
            InputDistribution::Fixed { value } => value,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationInputs {
    pub revenue_growth: InputDistribution,
    pub fcf_margin: InputDistribution,
    pub discount_rate: InputDistribution,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintKind {
    LessOrEqual,
    GreaterOrEqual,
    Equal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearConstraint {
    pub coefficients: Vec<f64>,
    pub kind: ConstraintKind,
    pub rhs: f64,
}

/// `optimize objective·x` subject to linear constraints and `x >= 0`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearProgram {
    pub objective: Vec<f64>,
    #[serde(default = "default_true")]
    pub maximize: bool,
    pub constraints: Vec<LinearConstraint>,
}

fn default_true() -> bool {
    true
}

/// A soft goal `coefficients·x ≈ target` with penalty weights on each side
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub coefficients: Vec<f64>,
    pub target: f64,
    #[serde(default = "one")]
    pub under_weight: f64,
    #[serde(default)]
    pub over_weight: f64,
}

fn one() -> f64 {
    1.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalProgram {
    pub variables: usize,
    pub goals: Vec<Goal>,
    #[serde(default)]
    pub hard_constraints: Vec<LinearConstraint>,
}

/// Two-player, two-strategy payoff matrix. `row[i][j]` is the company's
/// payoff when it plays i and the rival plays j.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayoffMatrix {
    pub row: [[f64; 2]; 2],
    pub column: [[f64; 2]; 2],
}

/// Inputs for pricing an expansion option with Black-Scholes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealOptionInputs {
    pub underlying_value: f64,
    pub exercise_cost: f64,
    pub years: f64,
    pub volatility: f64,
}

/// Per-run numeric assumptions. Absent fields fall back to defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisOptions {
    pub discount_rate: f64,
    pub terminal_growth_rate: f64,
    pub projection_years: usize,
    pub tax_rate: f64,
    pub risk_free_rate: f64,
    pub market_risk_premium: f64,
    pub beta: f64,
    pub cost_of_debt: f64,
    pub days_in_year: f64,
    pub confidence_level: f64,
    pub simulation_iterations: usize,
    pub random_seed: u64,
    pub investment_project: Option<InvestmentProject>,
    pub scenarios: Option<Vec<Scenario>>,
    pub simulation: Option<SimulationInputs>,
    pub linear_program: Option<LinearProgram>,
    pub goal_program: Option<GoalProgram>,
    pub game: Option<PayoffMatrix>,
    pub real_option: Option<RealOptionInputs>,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            discount_rate: 0.10,
            terminal_growth_rate: 0.03,
            projection_years: 5,
            tax_rate: 0.20,
            risk_free_rate: 0.04,
            market_risk_premium: 0.06,
            beta: 1.0,
            cost_of_debt: 0.07,
            days_in_year: 365.0,
            confidence_level: 0.95,
            simulation_iterations: 10_000,
            random_seed: 42,
            investment_project: None,
            scenarios: None,
            simulation: None,
            linear_program: None,
            goal_program: None,
            game: None,
            real_option: None,
        }
    }
}

impl AnalysisOptions {
    /// CAPM cost of equity
    pub fn cost_of_equity(&self) -> f64 {
        self.risk_free_rate + self.beta * self.market_risk_premium
    }
}
