//! Earnings and cash flow at risk from the company's own history.

use analysis_core::numeric::round2;
use analysis_core::stats::{mean, percentile_value, std_dev};
use analysis_core::{
    AnalysisDetails, AnalysisError, CalculationInput, ChartHint, Computation, FinancialStatement,
    NamedValue, RiskDetails,
};

/// Year-over-year % changes, skipping years that follow a zero base
fn yearly_changes<F>(input: &CalculationInput<'_>, f: F) -> Vec<f64>
where
    F: Fn(&FinancialStatement) -> f64,
{
    input
        .values(f)
        .windows(2)
        .filter(|w| w[0] != 0.0)
        .map(|w| (w[1] - w[0]) / w[0].abs() * 100.0)
        .collect()
}

/// Adverse tail (1 − confidence) percentile of the historical changes
fn at_risk<F>(input: &CalculationInput<'_>, what: &str, f: F) -> Result<Computation, AnalysisError>
where
    F: Fn(&FinancialStatement) -> f64,
{
    input.require_years(3)?;
    let changes = yearly_changes(input, f);
    if changes.len() < 2 {
        return Err(AnalysisError::input(format!("{} at risk needs two measurable yearly changes", what)));
    }
    let tail = (1.0 - input.options.confidence_level).clamp(0.0, 1.0) * 100.0;
    let value = round2(percentile_value(&changes, tail));

    let details = RiskDetails {
        score: Some(value),
        components: vec![
            NamedValue::new("mean_change", round2(mean(&changes))),
            NamedValue::new("std_dev_change", round2(std_dev(&changes))),
            NamedValue::new("tail_percentile", tail),
        ],
        ..Default::default()
    };
    Ok(Computation::new(value, AnalysisDetails::Risk(details)).chart(ChartHint::Histogram))
}

pub fn earnings_at_risk(input: &CalculationInput<'_>) -> Result<Computation, AnalysisError> {
    at_risk(input, "earnings", |s| s.income_statement.net_income)
}

pub fn cash_flow_at_risk(input: &CalculationInput<'_>) -> Result<Computation, AnalysisError> {
    at_risk(input, "cash flow", |s| s.cash_flow.operating_cash_flow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::fixtures::{flat_statements, scaled_statement, Fixture};
    use approx::assert_relative_eq;

    #[test]
    fn test_flat_history_has_no_downside() {
        let fx = Fixture::new(flat_statements());
        assert_relative_eq!(earnings_at_risk(&fx.input()).unwrap().value, 0.0);
        assert_relative_eq!(cash_flow_at_risk(&fx.input()).unwrap().value, 0.0);
    }

    #[test]
    fn test_adverse_tail_of_changes() {
        // OCF 100 → 120 → 90 → 99: changes +20%, −25%, +10%
        let statements = [100.0, 120.0, 90.0, 99.0]
            .iter()
            .enumerate()
            .map(|(i, ocf)| {
                let mut s = scaled_statement(2020 + i as i32, 1.0);
                s.cash_flow.operating_cash_flow = *ocf;
                s
            })
            .collect();
        let fx = Fixture::new(statements);
        // 5th percentile of [−25, 10, 20]: −25 + 0.1 × 35
        assert_relative_eq!(cash_flow_at_risk(&fx.input()).unwrap().value, -21.5);
    }

    #[test]
    fn test_needs_three_years() {
        let fx = Fixture::new(vec![scaled_statement(2022, 1.0), scaled_statement(2023, 1.0)]);
        assert!(matches!(earnings_at_risk(&fx.input()), Err(AnalysisError::InputData(_))));
    }
}
