//! Trend fitting, forecasting and dispersion over the company's own history.

use analysis_core::numeric::{pct_change, require_nonzero, round2, round_to, safe_div};
use analysis_core::stats::{coefficient_of_variation, correlation, linear_fit, mean, std_dev, LinearFit};
use analysis_core::{
    AnalysisDetails, AnalysisError, CalculationInput, ChartHint, Computation, FinancialStatement,
    Observation, StatisticalDetails, YearValue,
};

/// Smoothing constant for the exponential forecast
pub const SMOOTHING_ALPHA: f64 = 0.5;
/// Fewest fiscal years a trend or dispersion measure is computed from
const MIN_TREND_YEARS: usize = 3;
const SECTOR_GROWTH_SERIES: &str = "growth.revenue";

type CalcResult = Result<Computation, AnalysisError>;

fn revenue(s: &FinancialStatement) -> f64 {
    s.income_statement.revenue
}

fn net_income(s: &FinancialStatement) -> f64 {
    s.income_statement.net_income
}

fn fit_series<F>(input: &CalculationInput<'_>, f: F) -> Result<(Vec<YearValue>, LinearFit), AnalysisError>
where
    F: Fn(&FinancialStatement) -> f64,
{
    input.require_years(MIN_TREND_YEARS)?;
    let series = input.series(f);
    let values: Vec<f64> = series.iter().map(|p| p.value).collect();
    let fit = linear_fit(&values).ok_or_else(|| AnalysisError::input("not enough points for a trend"))?;
    Ok((series, fit))
}

fn trend_details(series: &[YearValue], fit: &LinearFit) -> StatisticalDetails {
    let values: Vec<f64> = series.iter().map(|p| p.value).collect();
    StatisticalDetails {
        observations: series.len(),
        mean: Some(round2(mean(&values))),
        slope: Some(round2(fit.slope)),
        intercept: Some(round2(fit.intercept)),
        r_squared: Some(round_to(fit.r_squared, 4)),
        ..Default::default()
    }
}

fn trend_fit(fit: &LinearFit) -> Observation {
    Observation::TrendFit {
        slope: round2(fit.slope),
        r_squared: round_to(fit.r_squared, 4),
    }
}

/// Least-squares revenue change per year
pub fn revenue_trend_slope(input: &CalculationInput<'_>) -> CalcResult {
    let (series, fit) = fit_series(input, revenue)?;
    Ok(Computation::new(round2(fit.slope), AnalysisDetails::Statistical(trend_details(&series, &fit)))
        .observe(trend_fit(&fit))
        .with_benchmark(Some(0.0))
        .chart(ChartHint::Line))
}

pub fn revenue_trend_r_squared(input: &CalculationInput<'_>) -> CalcResult {
    let (series, fit) = fit_series(input, revenue)?;
    Ok(Computation::new(
        round_to(fit.r_squared, 4),
        AnalysisDetails::Statistical(trend_details(&series, &fit)),
    )
    .observe(trend_fit(&fit))
    .chart(ChartHint::Line))
}

/// Extend the fitted line one year past the latest statement
fn linear_forecast<F>(input: &CalculationInput<'_>, f: F) -> CalcResult
where
    F: Fn(&FinancialStatement) -> f64,
{
    let (series, fit) = fit_series(input, f)?;
    let latest = series[series.len() - 1];
    let year = latest.year + 1;
    let value = round2(fit.predict(series.len() as f64));

    let mut details = trend_details(&series, &fit);
    details.forecast = vec![YearValue::new(year, value)];
    Ok(Computation::new(value, AnalysisDetails::Statistical(details))
        .observe(trend_fit(&fit))
        .observe(Observation::Forecast { year, value })
        .with_benchmark(Some(latest.value))
        .chart(ChartHint::Line))
}

pub fn revenue_linear_forecast(input: &CalculationInput<'_>) -> CalcResult {
    linear_forecast(input, revenue)
}

pub fn net_income_linear_forecast(input: &CalculationInput<'_>) -> CalcResult {
    linear_forecast(input, net_income)
}

/// Simple exponential smoothing seeded with the first year
pub fn exponential_smoothing(values: &[f64], alpha: f64) -> f64 {
    let mut iter = values.iter();
    let first = match iter.next() {
        Some(v) => *v,
        None => return 0.0,
    };
    iter.fold(first, |level, v| alpha * v + (1.0 - alpha) * level)
}

pub fn exponential_smoothing_revenue(input: &CalculationInput<'_>) -> CalcResult {
    input.require_years(2)?;
    let series = input.series(revenue);
    let values: Vec<f64> = series.iter().map(|p| p.value).collect();
    let latest = series[series.len() - 1];
    let year = latest.year + 1;
    let value = round2(exponential_smoothing(&values, SMOOTHING_ALPHA));

    let details = StatisticalDetails {
        observations: values.len(),
        mean: Some(round2(mean(&values))),
        forecast: vec![YearValue::new(year, value)],
        ..Default::default()
    };
    Ok(Computation::new(value, AnalysisDetails::Statistical(details))
        .observe(Observation::Forecast { year, value })
        .with_benchmark(Some(latest.value))
        .chart(ChartHint::Line))
}

fn dispersion(values: &[f64], value: f64, cv: f64) -> Computation {
    let details = StatisticalDetails {
        observations: values.len(),
        mean: Some(round2(mean(values))),
        std_dev: Some(round2(std_dev(values))),
        ..Default::default()
    };
    Computation::new(value, AnalysisDetails::Statistical(details))
        .observe(Observation::Volatility { cv: round2(cv) })
        .chart(ChartHint::Line)
}

/// Standard deviation of year-over-year revenue growth, in percentage points
pub fn revenue_growth_volatility(input: &CalculationInput<'_>) -> CalcResult {
    input.require_years(MIN_TREND_YEARS)?;
    let revenues = input.values(revenue);
    let growth: Vec<f64> = revenues
        .windows(2)
        .filter(|w| w[0] != 0.0)
        .map(|w| (w[1] - w[0]) / w[0].abs() * 100.0)
        .collect();
    if growth.len() < 2 {
        return Err(AnalysisError::input("revenue growth volatility needs two measurable growth rates"));
    }
    Ok(dispersion(&growth, round2(std_dev(&growth)), coefficient_of_variation(&growth)))
}

/// Coefficient of variation of net income
pub fn earnings_volatility(input: &CalculationInput<'_>) -> CalcResult {
    input.require_years(MIN_TREND_YEARS)?;
    let incomes = input.values(net_income);
    require_nonzero(mean(&incomes), "average net income")?;
    let cv = coefficient_of_variation(&incomes);
    Ok(dispersion(&incomes, round_to(cv, 4), cv))
}

/// Standard deviation of net margin, in percentage points
pub fn margin_stability(input: &CalculationInput<'_>) -> CalcResult {
    input.require_years(MIN_TREND_YEARS)?;
    let margins: Vec<f64> = input
        .statements
        .iter()
        .filter(|s| s.income_statement.revenue != 0.0)
        .map(|s| safe_div(s.income_statement.net_income, s.income_statement.revenue) * 100.0)
        .collect();
    if margins.len() < MIN_TREND_YEARS {
        return Err(AnalysisError::input("margin stability needs three years with revenue"));
    }
    Ok(dispersion(&margins, round2(std_dev(&margins)), coefficient_of_variation(&margins)))
}

pub fn revenue_income_correlation(input: &CalculationInput<'_>) -> CalcResult {
    input.require_years(MIN_TREND_YEARS)?;
    let revenues = input.values(revenue);
    let incomes = input.values(net_income);
    let r = round_to(correlation(&revenues, &incomes), 4);

    let details = StatisticalDetails {
        observations: revenues.len(),
        correlation: Some(r),
        ..Default::default()
    };
    Ok(Computation::new(r, AnalysisDetails::Statistical(details))
        .observe(Observation::Correlation { r })
        .chart(ChartHint::Line))
}

/// (value − mean) / sample σ of `history`; 0 when the history does not vary
fn history_z(value: f64, history: &[f64]) -> f64 {
    let sd = std_dev(history);
    if sd < f64::EPSILON {
        return 0.0;
    }
    (value - mean(history)) / sd
}

fn z_computation(z: f64, history: &[f64]) -> Computation {
    let details = StatisticalDetails {
        observations: history.len(),
        mean: Some(round2(mean(history))),
        std_dev: Some(round2(std_dev(history))),
        ..Default::default()
    };
    Computation::new(round2(z), AnalysisDetails::Statistical(details))
        .with_benchmark(Some(0.0))
        .chart(ChartHint::Gauge)
}

/// Latest ROE against the ROE of every prior year
pub fn roe_history_zscore(input: &CalculationInput<'_>) -> CalcResult {
    input.require_years(MIN_TREND_YEARS)?;
    let roe: Vec<f64> = input
        .statements
        .iter()
        .filter(|s| s.balance_sheet.total_equity != 0.0)
        .map(|s| s.income_statement.net_income / s.balance_sheet.total_equity * 100.0)
        .collect();
    let (latest, prior) = match roe.split_last() {
        Some((latest, prior)) if prior.len() >= 2 => (*latest, prior),
        _ => return Err(AnalysisError::input("ROE history needs three years with equity")),
    };
    Ok(z_computation(history_z(latest, prior), prior))
}

/// Latest revenue growth against the sector's historical growth series
pub fn sector_history_zscore(input: &CalculationInput<'_>) -> CalcResult {
    input.require_years(2)?;
    let history = input
        .benchmarks
        .and_then(|b| b.history(SECTOR_GROWTH_SERIES))
        .filter(|h| h.len() >= 2)
        .ok_or_else(|| {
            AnalysisError::BenchmarkUnavailable(format!(
                "no sector history for '{}'",
                SECTOR_GROWTH_SERIES
            ))
        })?;
    let latest = input.latest()?;
    let previous = input
        .previous()
        .ok_or_else(|| AnalysisError::input("revenue growth needs two years"))?;
    require_nonzero(previous.income_statement.revenue, "prior-year revenue")?;
    let growth = pct_change(previous.income_statement.revenue, latest.income_statement.revenue);
    Ok(z_computation(history_z(growth, history), history))
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::fixtures::{flat_statements, growing_statements, scaled_statement, Fixture};
    use analysis_core::BenchmarkSet;
    use approx::assert_relative_eq;
    use std::collections::BTreeMap;

    fn linear_revenue() -> Fixture {
        // Revenue 1.0M, 1.2M, 1.4M, 1.6M
        let statements = (0..4)
            .map(|i| {
                let mut s = scaled_statement(2020 + i, 1.0);
                s.income_statement.revenue = 1_000_000.0 + 200_000.0 * i as f64;
                s
            })
            .collect();
        Fixture::new(statements)
    }

    #[test]
    fn test_trend_on_exact_line() {
        let fx = linear_revenue();
        assert_relative_eq!(revenue_trend_slope(&fx.input()).unwrap().value, 200_000.0, epsilon = 1e-6);
        assert_relative_eq!(revenue_trend_r_squared(&fx.input()).unwrap().value, 1.0);
        let forecast = revenue_linear_forecast(&fx.input()).unwrap();
        assert_relative_eq!(forecast.value, 1_800_000.0, epsilon = 1e-6);
        assert_eq!(forecast.benchmark, Some(1_600_000.0));
        assert!(forecast.observations.contains(&Observation::Forecast { year: 2024, value: 1_800_000.0 }));
    }

    #[test]
    fn test_trend_needs_three_years() {
        let fx = Fixture::new(vec![scaled_statement(2022, 1.0), scaled_statement(2023, 1.0)]);
        assert!(matches!(revenue_trend_slope(&fx.input()), Err(AnalysisError::InputData(_))));
    }

    #[test]
    fn test_exponential_smoothing() {
        assert_relative_eq!(exponential_smoothing(&[100.0, 200.0, 300.0], 0.5), 225.0);
        let fx = linear_revenue();
        // 1.0 → 1.1 → 1.25 → 1.425 (millions)
        assert_relative_eq!(exponential_smoothing_revenue(&fx.input()).unwrap().value, 1_425_000.0);
    }

    #[test]
    fn test_flat_history_has_no_dispersion() {
        let fx = Fixture::new(flat_statements());
        assert_relative_eq!(revenue_growth_volatility(&fx.input()).unwrap().value, 0.0);
        assert_relative_eq!(earnings_volatility(&fx.input()).unwrap().value, 0.0);
        assert_relative_eq!(margin_stability(&fx.input()).unwrap().value, 0.0);
        assert_relative_eq!(roe_history_zscore(&fx.input()).unwrap().value, 0.0);
    }

    #[test]
    fn test_growing_company_correlation() {
        let fx = Fixture::new(growing_statements());
        let r = revenue_income_correlation(&fx.input()).unwrap().value;
        assert!(r > 0.99);
    }

    #[test]
    fn test_sector_history_zscore() {
        let mut history = BTreeMap::new();
        history.insert(SECTOR_GROWTH_SERIES.to_string(), vec![4.0, 6.0, 8.0]);
        let benchmarks = BenchmarkSet {
            historical_index: history,
            ..Default::default()
        };
        // 10% growth against mean 6, σ 2
        let fx = Fixture::new(growing_statements()).with_benchmarks(benchmarks);
        assert_relative_eq!(sector_history_zscore(&fx.input()).unwrap().value, 2.0);

        let bare = Fixture::new(growing_statements());
        assert!(matches!(
            sector_history_zscore(&bare.input()),
            Err(AnalysisError::BenchmarkUnavailable(_))
        ));
    }
}
