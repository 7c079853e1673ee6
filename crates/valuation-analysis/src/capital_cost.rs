use analysis_core::numeric::round2;
use analysis_core::{
    AnalysisDetails, AnalysisError, CalculationInput, ChartHint, Computation, NamedValue,
    ValuationDetails,
};

type CalcResult = Result<Computation, AnalysisError>;

/// Weighted average cost of capital, market-value equity weights when listed
pub fn wacc(input: &CalculationInput<'_>) -> CalcResult {
    let latest = input.latest()?;
    let options = input.options;
    let equity = latest.equity_value().max(0.0);
    let debt = latest.balance_sheet.total_debt().max(0.0);
    let rate = latest.wacc(options);

    let details = ValuationDetails {
        discount_rate: Some(rate),
        components: vec![
            NamedValue::new("equity_value", equity),
            NamedValue::new("debt", debt),
            NamedValue::new("cost_of_equity", round2(options.cost_of_equity() * 100.0)),
            NamedValue::new("after_tax_cost_of_debt", round2(options.cost_of_debt * (1.0 - options.tax_rate) * 100.0)),
        ],
        ..Default::default()
    };
    Ok(Computation::new(round2(rate * 100.0), AnalysisDetails::Valuation(details)).chart(ChartHint::Pie))
}

/// Rf + β × market risk premium
pub fn capm_cost_of_equity(input: &CalculationInput<'_>) -> CalcResult {
    let options = input.options;
    let details = ValuationDetails {
        components: vec![
            NamedValue::new("risk_free_rate", options.risk_free_rate),
            NamedValue::new("beta", options.beta),
            NamedValue::new("market_risk_premium", options.market_risk_premium),
        ],
        ..Default::default()
    };
    Ok(Computation::new(round2(options.cost_of_equity() * 100.0), AnalysisDetails::Valuation(details))
        .chart(ChartHint::Bar))
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::fixtures::{scaled_statement, Fixture};
    use approx::assert_relative_eq;

    #[test]
    fn test_cost_of_capital() {
        let fx = Fixture::new(vec![scaled_statement(2023, 1.0)]);
        // 4% + 1.0 × 6%
        assert_relative_eq!(capm_cost_of_equity(&fx.input()).unwrap().value, 10.0);
        // 1,000,000 at 10% and 350,000 at 5.6%
        assert_relative_eq!(wacc(&fx.input()).unwrap().value, 8.86);
    }
}
