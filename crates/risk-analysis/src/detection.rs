//! Anomaly, manipulation and consistency checks.

use analysis_core::numeric::{round2, round_to, safe_div};
use analysis_core::stats::{mean, std_dev};
use analysis_core::{
    AnalysisDetails, AnalysisError, BalanceSheet, CalculationInput, ChartHint, Computation,
    DetectionDetails, FinancialStatement, IncomeStatement, NamedValue, Observation,
};
use tracing::debug;

/// Errors beyond mean + 2σ are anomalous
pub const ANOMALY_SIGMAS: f64 = 2.0;
pub const MAX_SEVERITY: f64 = 10.0;
/// Floor on the historical error spread, in percentage points. Series whose
/// past errors barely vary would otherwise flag any small wobble.
pub const MIN_ERROR_SPREAD: f64 = 1.0;
/// Earlier prediction errors needed before the latest one is judged
pub const MIN_HISTORICAL_ERRORS: usize = 2;
/// Beneish threshold above which manipulation is likely
pub const BENEISH_THRESHOLD: f64 = -1.78;
/// Nigrini's close-conformity limit for first-digit MAD
pub const BENFORD_CONFORMITY_MAD: f64 = 0.015;
pub const BENFORD_MIN_VALUES: usize = 20;
/// Largest acceptable assets vs liabilities + equity gap, in percent
pub const BALANCE_TOLERANCE: f64 = 0.5;
const TOLERANCE: f64 = 1e-9;

type CalcResult = Result<Computation, AnalysisError>;

/// Relative error (%) of a linear extrapolation from the two prior years
fn prediction_error(two_back: f64, one_back: f64, actual: f64) -> f64 {
    let predicted = 2.0 * one_back - two_back;
    let scale = if predicted != 0.0 { predicted.abs() } else { actual.abs() };
    safe_div((actual - predicted).abs(), scale) * 100.0
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnomalyCheck {
    pub current_error: f64,
    pub mean_error: f64,
    pub std_error: f64,
    pub threshold: f64,
    pub anomalous: bool,
    pub severity: f64,
}

/// Compare the latest prediction error with the errors of earlier years.
/// Needs five values: two to predict from and two earlier errors.
pub fn check_series(values: &[f64]) -> Result<AnomalyCheck, AnalysisError> {
    if values.len() < MIN_HISTORICAL_ERRORS + 3 {
        return Err(AnalysisError::input("anomaly detection needs at least five fiscal years"));
    }
    let errors: Vec<f64> = values
        .windows(3)
        .map(|w| prediction_error(w[0], w[1], w[2]))
        .collect();
    let (current, history) = match errors.split_last() {
        Some((current, history)) => (*current, history),
        None => return Err(AnalysisError::input("no prediction errors to compare")),
    };

    let mean_error = mean(history);
    let std_error = std_dev(history);
    let spread = std_error.max(MIN_ERROR_SPREAD);
    let threshold = mean_error + ANOMALY_SIGMAS * spread;
    let severity = ((current - mean_error) / spread).min(MAX_SEVERITY);

    Ok(AnomalyCheck {
        current_error: current,
        mean_error,
        std_error,
        threshold,
        anomalous: current - threshold > TOLERANCE,
        severity,
    })
}

fn anomaly<F>(input: &CalculationInput<'_>, f: F) -> CalcResult
where
    F: Fn(&FinancialStatement) -> f64,
{
    let check = check_series(&input.values(f))?;
    if check.anomalous {
        debug!(
            analysis = input.definition.id,
            severity = check.severity,
            "prediction error beyond threshold"
        );
    }
    let observation = if check.anomalous {
        Observation::Anomaly { severity: round2(check.severity) }
    } else {
        Observation::NoAnomaly
    };
    let details = DetectionDetails {
        current_error: Some(round2(check.current_error)),
        mean_error: Some(round2(check.mean_error)),
        std_error: Some(round2(check.std_error)),
        threshold: Some(round2(check.threshold)),
        anomalous: check.anomalous,
        severity: Some(round2(check.severity)),
        components: Vec::new(),
    };
    Ok(Computation::new(round2(check.severity), AnalysisDetails::Detection(details))
        .observe(observation)
        .with_benchmark(Some(ANOMALY_SIGMAS))
        .chart(ChartHint::Line))
}

pub fn anomaly_revenue(input: &CalculationInput<'_>) -> CalcResult {
    anomaly(input, |s| s.income_statement.revenue)
}

pub fn anomaly_net_income(input: &CalculationInput<'_>) -> CalcResult {
    anomaly(input, |s| s.income_statement.net_income)
}

pub fn anomaly_receivables(input: &CalculationInput<'_>) -> CalcResult {
    anomaly(input, |s| s.balance_sheet.accounts_receivable)
}

pub fn anomaly_inventory(input: &CalculationInput<'_>) -> CalcResult {
    anomaly(input, |s| s.balance_sheet.inventory)
}

pub fn anomaly_operating_cash_flow(input: &CalculationInput<'_>) -> CalcResult {
    anomaly(input, |s| s.cash_flow.operating_cash_flow)
}

/// current / previous, neutral (1) when the previous value is zero
fn index(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        1.0
    } else {
        current / previous
    }
}

/// Eight-variable Beneish M-score over the latest two years
pub fn beneish_components(
    current: &FinancialStatement,
    previous: &FinancialStatement,
) -> Vec<NamedValue> {
    let (bs1, is1, cf1) = (&current.balance_sheet, &current.income_statement, &current.cash_flow);
    let (bs0, is0) = (&previous.balance_sheet, &previous.income_statement);

    let gross_margin = |is: &IncomeStatement| safe_div(is.revenue - is.cost_of_goods_sold, is.revenue);
    let soft_assets = |bs: &BalanceSheet| {
        1.0 - safe_div(bs.total_current_assets + bs.property_plant_equipment, bs.total_assets)
    };
    let depreciation_rate = |is: &IncomeStatement, bs: &BalanceSheet| {
        safe_div(is.depreciation_amortization, is.depreciation_amortization + bs.property_plant_equipment)
    };
    let leverage = |bs: &BalanceSheet| {
        safe_div(bs.total_current_liabilities + bs.long_term_debt, bs.total_assets)
    };

    vec![
        NamedValue::new(
            "dsri",
            index(
                safe_div(bs1.accounts_receivable, is1.revenue),
                safe_div(bs0.accounts_receivable, is0.revenue),
            ),
        ),
        NamedValue::new("gmi", index(gross_margin(is0), gross_margin(is1))),
        NamedValue::new("aqi", index(soft_assets(bs1), soft_assets(bs0))),
        NamedValue::new("sgi", index(is1.revenue, is0.revenue)),
        NamedValue::new("depi", index(depreciation_rate(is0, bs0), depreciation_rate(is1, bs1))),
        NamedValue::new(
            "sgai",
            index(
                safe_div(is1.operating_expenses, is1.revenue),
                safe_div(is0.operating_expenses, is0.revenue),
            ),
        ),
        NamedValue::new("lvgi", index(leverage(bs1), leverage(bs0))),
        NamedValue::new(
            "tata",
            safe_div(is1.net_income - cf1.operating_cash_flow, bs1.total_assets),
        ),
    ]
}

/// dsri, gmi, aqi, sgi, depi, sgai, lvgi, tata
const BENEISH_WEIGHTS: [f64; 8] = [0.920, 0.528, 0.404, 0.892, 0.115, -0.172, -0.327, 4.679];

pub fn beneish_m_score(input: &CalculationInput<'_>) -> CalcResult {
    input.require_years(2)?;
    let current = input.latest()?;
    let previous = input
        .previous()
        .ok_or_else(|| AnalysisError::input("Beneish M-score needs two fiscal years"))?;
    if current.income_statement.revenue <= 0.0 || previous.income_statement.revenue <= 0.0 {
        return Err(AnalysisError::input("Beneish M-score needs revenue in both years"));
    }

    let components = beneish_components(current, previous);
    let score = components
        .iter()
        .zip(BENEISH_WEIGHTS)
        .map(|(c, w)| w * c.value)
        .sum::<f64>()
        - 4.84;
    let score = round2(score);
    let likely = score > BENEISH_THRESHOLD;

    let details = DetectionDetails {
        anomalous: likely,
        threshold: Some(BENEISH_THRESHOLD),
        components: components
            .into_iter()
            .map(|c| NamedValue::new(c.name, round_to(c.value, 4)))
            .collect(),
        ..Default::default()
    };
    Ok(Computation::new(score, AnalysisDetails::Detection(details))
        .observe(Observation::ManipulationScore { score, likely })
        .with_benchmark(Some(BENEISH_THRESHOLD))
        .chart(ChartHint::Gauge))
}

/// (Net income − operating cash flow) / total assets, in percent
pub fn accruals_ratio(input: &CalculationInput<'_>) -> CalcResult {
    let latest = input.latest()?;
    let ta = latest.balance_sheet.total_assets;
    if ta <= 0.0 {
        return Err(AnalysisError::input("accruals ratio needs total assets"));
    }
    let accruals = latest.income_statement.net_income - latest.cash_flow.operating_cash_flow;
    let value = round2(accruals / ta * 100.0);

    let details = DetectionDetails {
        anomalous: value > 0.0,
        components: vec![
            NamedValue::new("accruals", accruals),
            NamedValue::new("total_assets", ta),
        ],
        ..Default::default()
    };
    Ok(Computation::new(value, AnalysisDetails::Detection(details))
        .with_benchmark(Some(0.0))
        .chart(ChartHint::Bar))
}

/// Every reported line item of one year
fn line_items(s: &FinancialStatement) -> Vec<f64> {
    let bs = &s.balance_sheet;
    let is = &s.income_statement;
    let cf = &s.cash_flow;
    let mut items = vec![
        bs.cash,
        bs.short_term_investments,
        bs.accounts_receivable,
        bs.inventory,
        bs.prepaid_expenses,
        bs.other_current_assets,
        bs.total_current_assets,
        bs.property_plant_equipment,
        bs.intangible_assets,
        bs.long_term_investments,
        bs.other_non_current_assets,
        bs.total_non_current_assets,
        bs.total_assets,
        bs.accounts_payable,
        bs.short_term_debt,
        bs.accrued_liabilities,
        bs.other_current_liabilities,
        bs.total_current_liabilities,
        bs.long_term_debt,
        bs.other_non_current_liabilities,
        bs.total_non_current_liabilities,
        bs.total_liabilities,
        bs.share_capital,
        bs.retained_earnings,
        bs.other_equity,
        bs.total_equity,
        is.revenue,
        is.cost_of_goods_sold,
        is.gross_profit,
        is.operating_expenses,
        is.depreciation_amortization,
        is.operating_income,
        is.interest_expense,
        is.other_income,
        is.income_before_tax,
        is.income_tax,
        is.net_income,
        cf.operating_cash_flow,
        cf.investing_cash_flow,
        cf.financing_cash_flow,
        cf.capital_expenditures,
        cf.dividends_paid,
        cf.net_change_in_cash,
    ];
    if let Some(m) = &s.market {
        items.extend([m.share_price, m.shares_outstanding, m.dividends_per_share]);
    }
    items
}

fn first_digit(value: f64) -> Option<usize> {
    let mut x = value.abs();
    if x == 0.0 || !x.is_finite() {
        return None;
    }
    while x >= 10.0 {
        x /= 10.0;
    }
    while x < 1.0 {
        x *= 10.0;
    }
    Some((x.floor() as usize).clamp(1, 9))
}

/// Mean absolute deviation of first-digit frequencies from log10(1 + 1/d)
pub fn benford_mad(values: &[f64]) -> Option<f64> {
    let mut counts = [0usize; 9];
    for d in values.iter().filter_map(|v| first_digit(*v)) {
        counts[d - 1] += 1;
    }
    let total: usize = counts.iter().sum();
    if total == 0 {
        return None;
    }
    let mad = counts
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            let expected = (1.0 + 1.0 / (i + 1) as f64).log10();
            (c as f64 / total as f64 - expected).abs()
        })
        .sum::<f64>()
        / 9.0;
    Some(mad)
}

pub fn benford_first_digit(input: &CalculationInput<'_>) -> CalcResult {
    let values: Vec<f64> = input
        .statements
        .iter()
        .flat_map(line_items)
        .filter(|v| first_digit(*v).is_some())
        .collect();
    if values.len() < BENFORD_MIN_VALUES {
        return Err(AnalysisError::input(format!(
            "Benford test needs at least {} non-zero line items, {} found",
            BENFORD_MIN_VALUES,
            values.len()
        )));
    }
    let mad = benford_mad(&values)
        .ok_or_else(|| AnalysisError::input("no line items with a leading digit"))?;
    let mad = round_to(mad, 4);
    let conforming = mad <= BENFORD_CONFORMITY_MAD;

    let details = DetectionDetails {
        anomalous: !conforming,
        threshold: Some(BENFORD_CONFORMITY_MAD),
        components: vec![NamedValue::new("line_items", values.len() as f64)],
        ..Default::default()
    };
    Ok(Computation::new(mad, AnalysisDetails::Detection(details))
        .observe(Observation::BenfordConformity { mad, conforming })
        .with_benchmark(Some(BENFORD_CONFORMITY_MAD))
        .chart(ChartHint::Bar))
}

/// Largest |assets − (liabilities + equity)| / assets across all years, in percent
pub fn balance_sheet_consistency(input: &CalculationInput<'_>) -> CalcResult {
    let mut gaps = Vec::with_capacity(input.statements.len());
    for s in input.statements {
        let bs = &s.balance_sheet;
        if bs.total_assets <= 0.0 {
            return Err(AnalysisError::input(format!(
                "fiscal year {} has no total assets",
                s.fiscal_year
            )));
        }
        let gap = (bs.total_assets - bs.total_liabilities - bs.total_equity).abs() / bs.total_assets * 100.0;
        gaps.push(NamedValue::new(s.fiscal_year.to_string(), round2(gap)));
    }
    let worst = gaps.iter().map(|g| g.value).fold(0.0, f64::max);

    let details = DetectionDetails {
        anomalous: worst > BALANCE_TOLERANCE,
        threshold: Some(BALANCE_TOLERANCE),
        components: gaps,
        ..Default::default()
    };
    Ok(Computation::new(worst, AnalysisDetails::Detection(details))
        .observe(Observation::BalanceGap { percent: worst })
        .with_benchmark(Some(BALANCE_TOLERANCE))
        .chart(ChartHint::Bar))
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::fixtures::{flat_statements, growing_statements, scaled_statement, Fixture};
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_steady_growth_is_not_anomalous() {
        let statements = (0..5)
            .map(|i| scaled_statement(2019 + i, 1.1f64.powi(i)))
            .collect();
        let fx = Fixture::new(statements);
        let result = anomaly_revenue(&fx.input()).unwrap();
        assert_abs_diff_eq!(result.value, 0.0);
        assert_eq!(result.observations, vec![Observation::NoAnomaly]);
    }

    #[test]
    fn test_uneven_growth_is_not_anomalous() {
        // errors 2.22%, 3.20%, then 0.86% against a 4.71% threshold
        let check = check_series(&[820_000.0, 905_000.0, 968_000.0, 1_064_000.0, 1_150_000.0]).unwrap();
        assert!(!check.anomalous);
        assert!(check.severity < 0.0);
        assert_relative_eq!(check.threshold, check.mean_error + ANOMALY_SIGMAS * MIN_ERROR_SPREAD);
    }

    #[test]
    fn test_single_earlier_error_is_not_enough() {
        let revenues = [820_000.0, 905_000.0, 968_000.0, 1_064_000.0];
        assert!(matches!(check_series(&revenues), Err(AnalysisError::InputData(_))));
        let fx = Fixture::new(growing_statements());
        assert!(matches!(anomaly_revenue(&fx.input()), Err(AnalysisError::InputData(_))));
    }

    #[test]
    fn test_spike_is_flagged() {
        let check = check_series(&[100.0, 110.0, 121.0, 130.0, 140.0, 300.0]).unwrap();
        assert!(check.anomalous);
        assert!(check.severity > ANOMALY_SIGMAS);
        assert!(check.current_error > check.threshold);
    }

    #[test]
    fn test_anomaly_needs_history() {
        let fx = Fixture::new(flat_statements());
        assert!(matches!(anomaly_inventory(&fx.input()), Err(AnalysisError::InputData(_))));
    }

    #[test]
    fn test_beneish_on_identical_years() {
        let fx = Fixture::new(flat_statements());
        let result = beneish_m_score(&fx.input()).unwrap();
        // −4.84 + 2.36 + 4.679 × (144,000 − 250,000) / 1,300,000
        assert_relative_eq!(result.value, -2.86);
        assert_eq!(
            result.observations,
            vec![Observation::ManipulationScore { score: -2.86, likely: false }]
        );
    }

    #[test]
    fn test_accruals_ratio() {
        let fx = Fixture::new(vec![scaled_statement(2023, 1.0)]);
        assert_relative_eq!(accruals_ratio(&fx.input()).unwrap().value, -8.15);
    }

    #[test]
    fn test_benford_all_ones() {
        let values = vec![1.0; 30];
        // (|1 − 0.30103| + Σ p(2..9)) / 9
        assert_relative_eq!(benford_mad(&values).unwrap(), 2.0 * (1.0 - 2f64.log10()) / 9.0, epsilon = 1e-12);
        assert_eq!(first_digit(0.0456), Some(4));
        assert_eq!(first_digit(-9_870.0), Some(9));
    }

    #[test]
    fn test_benford_needs_enough_values() {
        let fx = Fixture::new(vec![FinancialStatement {
            fiscal_year: 2023,
            ..Default::default()
        }]);
        assert!(matches!(benford_first_digit(&fx.input()), Err(AnalysisError::InputData(_))));
        let sample = Fixture::new(vec![scaled_statement(2023, 1.0)]);
        assert!(benford_first_digit(&sample.input()).is_ok());
    }

    #[test]
    fn test_balance_gap() {
        let mut broken = scaled_statement(2023, 1.0);
        broken.balance_sheet.total_equity = 690_000.0;
        let fx = Fixture::new(vec![scaled_statement(2022, 1.0), broken]);
        let result = balance_sheet_consistency(&fx.input()).unwrap();
        // 10,000 / 1,300,000
        assert_relative_eq!(result.value, 0.77);
    }
}
