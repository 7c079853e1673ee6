//! Shared building blocks for single-statement ratio calculators.

use analysis_core::numeric::{pct_change, percentage, ratio, require_nonzero, whole_days};
use analysis_core::{
    AnalysisDetails, AnalysisError, CalculationInput, ChartHint, Computation, FinancialStatement,
    MarketData, Observation, RatioDetails,
};

/// How a numerator/denominator pair becomes the reported value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scale {
    /// Plain ratio, 2 dp
    Times,
    /// Ratio × 100, 2 dp
    Percent,
    /// Ratio × days in year, whole days
    Days,
}

impl Scale {
    pub fn apply(self, numerator: f64, denominator: f64, days_in_year: f64) -> f64 {
        match self {
            Scale::Times => ratio(numerator, denominator),
            Scale::Percent => percentage(numerator, denominator),
            Scale::Days => whole_days(numerator, denominator, days_in_year),
        }
    }
}

/// Evaluate a ratio on the latest year, with the full history in details.
///
/// A zero denominator in the latest year is insufficient data; earlier years
/// fall back to the guarded 0.
pub fn ratio_of<N, D>(
    input: &CalculationInput<'_>,
    numerator: N,
    denominator: D,
    scale: Scale,
) -> Result<Computation, AnalysisError>
where
    N: Fn(&FinancialStatement) -> f64,
    D: Fn(&FinancialStatement) -> f64,
{
    let latest = input.latest()?;
    let num = numerator(latest);
    let den = denominator(latest);
    require_nonzero(den, &format!("denominator of {}", input.definition.name.en))?;

    let days_in_year = input.options.days_in_year;
    let value = scale.apply(num, den, days_in_year);
    let history = input.series(|s| scale.apply(numerator(s), denominator(s), days_in_year));

    let mut observations = Vec::new();
    if let Some(prev) = history.iter().rev().nth(1) {
        if prev.value != 0.0 {
            let percent = pct_change(prev.value, value);
            observations.push(if percent == 0.0 {
                Observation::Stable
            } else {
                Observation::Growth { percent }
            });
        }
    }
    if value < 0.0 {
        observations.push(Observation::NegativeValue);
    }

    let chart = if history.len() > 1 { ChartHint::Line } else { ChartHint::Gauge };
    Ok(Computation::new(
        value,
        AnalysisDetails::Ratio(RatioDetails {
            numerator: num,
            denominator: den,
            history,
        }),
    )
    .observe_all(observations)
    .chart(chart))
}

/// Latest-year market data; market ratios are undefined for unlisted companies.
pub fn market_data<'a>(input: &CalculationInput<'a>) -> Result<&'a MarketData, AnalysisError> {
    let latest = input.latest()?;
    match &latest.market {
        Some(m) if m.share_price > 0.0 && m.shares_outstanding > 0.0 => Ok(m),
        _ => Err(AnalysisError::input("market data (share price and shares outstanding) not supplied")),
    }
}

pub fn share_price(s: &FinancialStatement) -> f64 {
    s.market.as_ref().map(|m| m.share_price).unwrap_or(0.0)
}

pub fn shares_outstanding(s: &FinancialStatement) -> f64 {
    s.market.as_ref().map(|m| m.shares_outstanding).unwrap_or(0.0)
}

pub fn market_cap(s: &FinancialStatement) -> f64 {
    s.market.as_ref().map(|m| m.market_cap()).unwrap_or(0.0)
}

/// Year-over-year percentage change of a metric between the two latest years
pub fn latest_growth<F>(input: &CalculationInput<'_>, f: F) -> Result<f64, AnalysisError>
where
    F: Fn(&FinancialStatement) -> f64,
{
    input.require_years(2)?;
    let latest = input.latest()?;
    let previous = input
        .previous()
        .ok_or_else(|| AnalysisError::input("previous fiscal year missing"))?;
    let base = f(previous);
    require_nonzero(base, "previous year value")?;
    Ok(pct_change(base, f(latest)))
}

/// Days in inventory, rounded to 2 dp for cycle arithmetic
pub fn inventory_days(s: &FinancialStatement, days_in_year: f64) -> f64 {
    analysis_core::numeric::days(
        s.balance_sheet.inventory,
        s.income_statement.cost_of_goods_sold,
        days_in_year,
    )
}

pub fn receivable_days(s: &FinancialStatement, days_in_year: f64) -> f64 {
    analysis_core::numeric::days(
        s.balance_sheet.accounts_receivable,
        s.income_statement.revenue,
        days_in_year,
    )
}

pub fn payable_days(s: &FinancialStatement, days_in_year: f64) -> f64 {
    analysis_core::numeric::days(
        s.balance_sheet.accounts_payable,
        s.income_statement.cost_of_goods_sold,
        days_in_year,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::fixtures::{flat_statements, growing_statements, Fixture};

    #[test]
    fn test_scale_apply() {
        assert_eq!(Scale::Times.apply(500_000.0, 250_000.0, 365.0), 2.0);
        assert_eq!(Scale::Percent.apply(400_000.0, 1_000_000.0, 365.0), 40.0);
        assert_eq!(Scale::Days.apply(100.0, 1000.0, 365.0), 37.0);
        assert_eq!(Scale::Times.apply(1.0, 0.0, 365.0), 0.0);
    }

    #[test]
    fn test_unchanged_ratio_is_stable() {
        let fx = Fixture::new(flat_statements());
        let result = ratio_of(
            &fx.input(),
            |s| s.balance_sheet.total_current_assets,
            |s| s.balance_sheet.total_current_liabilities,
            Scale::Times,
        )
        .unwrap();
        assert_eq!(result.observations, vec![Observation::Stable]);
    }

    #[test]
    fn test_changed_ratio_reports_growth() {
        let fx = Fixture::new(growing_statements());
        let result = ratio_of(&fx.input(), |s| s.income_statement.revenue, |_| 1_000.0, Scale::Times).unwrap();
        assert_eq!(result.observations, vec![Observation::Growth { percent: 10.0 }]);
    }
}
