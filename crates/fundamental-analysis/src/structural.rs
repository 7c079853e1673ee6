//! Vertical (common-size), horizontal (year-over-year), trend index and CAGR
//! analyses.

use analysis_core::numeric::{pct_change, percentage, round2};
use analysis_core::{
    AnalysisDetails, AnalysisError, CalculationInput, ChartHint, Computation, FinancialStatement,
    NamedValue, Observation, StructuralDetails, YearValue,
};

/// Item as a percentage of its statement total; 0 when the total is 0.
pub fn vertical(item: f64, total: f64) -> f64 {
    percentage(item, total)
}

/// Percentage change for each consecutive pair, labelled with the later year.
pub fn horizontal(series: &[YearValue]) -> Vec<YearValue> {
    series
        .windows(2)
        .map(|w| YearValue::new(w[1].year, pct_change(w[0].value, w[1].value)))
        .collect()
}

/// Each value relative to the first (base = 100). A zero base yields 100
/// for every year.
pub fn trend_index(series: &[YearValue]) -> Vec<YearValue> {
    let base = match series.first() {
        Some(first) => first.value,
        None => return Vec::new(),
    };
    series
        .iter()
        .map(|p| {
            let index = if base == 0.0 {
                100.0
            } else {
                round2(p.value / base * 100.0)
            };
            YearValue::new(p.year, index)
        })
        .collect()
}

/// Compound growth rate as a fraction. Undefined when `first` is not
/// positive or there are no periods.
pub fn cagr(first: f64, last: f64, periods: usize) -> Option<f64> {
    if first <= 0.0 || periods == 0 || last < 0.0 {
        return None;
    }
    let rate = (last / first).powf(1.0 / periods as f64) - 1.0;
    rate.is_finite().then_some(rate)
}

fn vertical_of<I, T>(input: &CalculationInput<'_>, item: I, total: T) -> Result<Computation, AnalysisError>
where
    I: Fn(&FinancialStatement) -> f64,
    T: Fn(&FinancialStatement) -> f64,
{
    let latest = input.latest()?;
    let value = vertical(item(latest), total(latest));
    let series = input.series(|s| vertical(item(s), total(s)));

    let details = StructuralDetails {
        series,
        base_year: None,
        periods: None,
        components: vec![
            NamedValue::new("item", item(latest)),
            NamedValue::new("total", total(latest)),
        ],
    };
    Ok(Computation::new(value, AnalysisDetails::Structural(details))
        .observe(Observation::ShareOfTotal { percent: value })
        .chart(ChartHint::Pie))
}

fn horizontal_of<F>(input: &CalculationInput<'_>, f: F) -> Result<Computation, AnalysisError>
where
    F: Fn(&FinancialStatement) -> f64,
{
    input.require_years(2)?;
    let deltas = horizontal(&input.series(f));
    let value = deltas.last().map(|d| d.value).unwrap_or(0.0);

    let observation = if deltas.iter().all(|d| d.value == 0.0) {
        Observation::Stable
    } else {
        Observation::Growth { percent: value }
    };

    let details = StructuralDetails {
        periods: Some(deltas.len()),
        series: deltas,
        ..Default::default()
    };
    Ok(Computation::new(value, AnalysisDetails::Structural(details))
        .observe(observation)
        .chart(ChartHint::Bar))
}

fn trend_of<F>(input: &CalculationInput<'_>, f: F) -> Result<Computation, AnalysisError>
where
    F: Fn(&FinancialStatement) -> f64,
{
    let series = input.series(f);
    let base_year = series
        .first()
        .map(|p| p.year)
        .ok_or_else(|| AnalysisError::input("no financial statements supplied"))?;
    let index = trend_index(&series);
    let value = index.last().map(|p| p.value).unwrap_or(100.0);

    let details = StructuralDetails {
        series: index,
        base_year: Some(base_year),
        periods: Some(series.len().saturating_sub(1)),
        components: Vec::new(),
    };
    // The base year itself is the natural reference level.
    Ok(Computation::new(value, AnalysisDetails::Structural(details))
        .observe(Observation::IndexLevel { index: value, base_year })
        .with_benchmark(Some(100.0))
        .chart(ChartHint::Line))
}

fn cagr_of<F>(input: &CalculationInput<'_>, f: F) -> Result<Computation, AnalysisError>
where
    F: Fn(&FinancialStatement) -> f64,
{
    input.require_years(2)?;
    let series = input.series(f);
    let (first, last) = match (series.first(), series.last()) {
        (Some(a), Some(b)) => (a, b),
        _ => return Err(AnalysisError::input("no financial statements supplied")),
    };
    let periods = series.len() - 1;
    let rate = cagr(first.value, last.value, periods).ok_or_else(|| {
        AnalysisError::input("CAGR is undefined when the starting value is not positive")
    })?;
    let value = round2(rate * 100.0);

    let details = StructuralDetails {
        base_year: Some(first.year),
        periods: Some(periods),
        components: vec![
            NamedValue::new("first", first.value),
            NamedValue::new("last", last.value),
        ],
        series,
    };
    Ok(Computation::new(value, AnalysisDetails::Structural(details))
        .observe(Observation::CompoundGrowth { percent: value, years: periods })
        .chart(ChartHint::Line))
}

fn liabilities_and_equity(s: &FinancialStatement) -> f64 {
    s.balance_sheet.total_liabilities + s.balance_sheet.total_equity
}

pub fn vertical_current_assets(input: &CalculationInput<'_>) -> Result<Computation, AnalysisError> {
    vertical_of(input, |s| s.balance_sheet.total_current_assets, |s| s.balance_sheet.total_assets)
}

pub fn vertical_non_current_assets(input: &CalculationInput<'_>) -> Result<Computation, AnalysisError> {
    vertical_of(input, |s| s.balance_sheet.total_non_current_assets, |s| s.balance_sheet.total_assets)
}

pub fn vertical_current_liabilities(input: &CalculationInput<'_>) -> Result<Computation, AnalysisError> {
    vertical_of(input, |s| s.balance_sheet.total_current_liabilities, liabilities_and_equity)
}

pub fn vertical_total_liabilities(input: &CalculationInput<'_>) -> Result<Computation, AnalysisError> {
    vertical_of(input, |s| s.balance_sheet.total_liabilities, liabilities_and_equity)
}

pub fn vertical_equity(input: &CalculationInput<'_>) -> Result<Computation, AnalysisError> {
    vertical_of(input, |s| s.balance_sheet.total_equity, liabilities_and_equity)
}

pub fn vertical_cost_of_sales(input: &CalculationInput<'_>) -> Result<Computation, AnalysisError> {
    vertical_of(input, |s| s.income_statement.cost_of_goods_sold, |s| s.income_statement.revenue)
}

pub fn vertical_operating_expenses(input: &CalculationInput<'_>) -> Result<Computation, AnalysisError> {
    vertical_of(input, |s| s.income_statement.operating_expenses, |s| s.income_statement.revenue)
}

pub fn vertical_net_income(input: &CalculationInput<'_>) -> Result<Computation, AnalysisError> {
    vertical_of(input, |s| s.income_statement.net_income, |s| s.income_statement.revenue)
}

pub fn horizontal_revenue(input: &CalculationInput<'_>) -> Result<Computation, AnalysisError> {
    horizontal_of(input, |s| s.income_statement.revenue)
}

pub fn horizontal_net_income(input: &CalculationInput<'_>) -> Result<Computation, AnalysisError> {
    horizontal_of(input, |s| s.income_statement.net_income)
}

pub fn horizontal_total_assets(input: &CalculationInput<'_>) -> Result<Computation, AnalysisError> {
    horizontal_of(input, |s| s.balance_sheet.total_assets)
}

pub fn horizontal_total_equity(input: &CalculationInput<'_>) -> Result<Computation, AnalysisError> {
    horizontal_of(input, |s| s.balance_sheet.total_equity)
}

pub fn trend_revenue(input: &CalculationInput<'_>) -> Result<Computation, AnalysisError> {
    trend_of(input, |s| s.income_statement.revenue)
}

pub fn trend_net_income(input: &CalculationInput<'_>) -> Result<Computation, AnalysisError> {
    trend_of(input, |s| s.income_statement.net_income)
}

pub fn trend_total_assets(input: &CalculationInput<'_>) -> Result<Computation, AnalysisError> {
    trend_of(input, |s| s.balance_sheet.total_assets)
}

pub fn cagr_revenue(input: &CalculationInput<'_>) -> Result<Computation, AnalysisError> {
    cagr_of(input, |s| s.income_statement.revenue)
}

pub fn cagr_total_assets(input: &CalculationInput<'_>) -> Result<Computation, AnalysisError> {
    cagr_of(input, |s| s.balance_sheet.total_assets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::fixtures::{flat_statements, growing_statements, scaled_statement, Fixture};
    use approx::assert_relative_eq;

    #[test]
    fn test_vertical() {
        assert_eq!(vertical(50.0, 200.0), 25.0);
        assert_eq!(vertical(50.0, 0.0), 0.0);
    }

    #[test]
    fn test_trend_index_zero_base_is_100() {
        let series = vec![YearValue::new(2021, 0.0), YearValue::new(2022, 50.0)];
        let index = trend_index(&series);
        assert!(index.iter().all(|p| p.value == 100.0));
    }

    #[test]
    fn test_cagr_round_trip() {
        let (first, last, n) = (1_000.0, 1_610.51, 5);
        let rate = cagr(first, last, n).unwrap();
        assert_relative_eq!(first * (1.0 + rate).powi(n as i32), last, max_relative = 1e-9);
        assert_relative_eq!(rate, 0.10, epsilon = 1e-6);
        assert!(cagr(0.0, 100.0, 3).is_none());
        assert!(cagr(-5.0, 100.0, 3).is_none());
    }

    #[test]
    fn test_flat_growth_is_zero_and_index_100() {
        let fx = Fixture::new(flat_statements());
        let result = horizontal_revenue(&fx.input()).unwrap();
        assert_eq!(result.value, 0.0);
        match &result.details {
            AnalysisDetails::Structural(d) => {
                assert_eq!(d.series.len(), 2);
                assert!(d.series.iter().all(|p| p.value == 0.0));
            }
            other => panic!("unexpected details {:?}", other),
        }
        assert_eq!(result.observations, vec![Observation::Stable]);

        let trend = trend_total_assets(&fx.input()).unwrap();
        assert_eq!(trend.value, 100.0);
        match &trend.details {
            AnalysisDetails::Structural(d) => assert!(d.series.iter().all(|p| p.value == 100.0)),
            other => panic!("unexpected details {:?}", other),
        }
    }

    #[test]
    fn test_growing_company() {
        let fx = Fixture::new(growing_statements());
        assert_relative_eq!(horizontal_revenue(&fx.input()).unwrap().value, 10.0);
        assert_relative_eq!(cagr_revenue(&fx.input()).unwrap().value, 10.0);
        assert_relative_eq!(trend_revenue(&fx.input()).unwrap().value, 133.1);
        assert_relative_eq!(vertical_current_assets(&fx.input()).unwrap().value, 38.46);
    }

    #[test]
    fn test_single_year_is_insufficient_for_growth() {
        let fx = Fixture::new(vec![scaled_statement(2023, 1.0)]);
        assert!(matches!(horizontal_revenue(&fx.input()), Err(AnalysisError::InputData(_))));
        assert!(matches!(cagr_revenue(&fx.input()), Err(AnalysisError::InputData(_))));
        assert_eq!(trend_revenue(&fx.input()).unwrap().value, 100.0);
    }
}
