//! Economic and market value added, and the dividend discount model.

use analysis_core::numeric::round2;
use analysis_core::{
    AnalysisDetails, AnalysisError, CalculationInput, ChartHint, Computation, NamedValue,
    Observation, ValuationDetails,
};

type CalcResult = Result<Computation, AnalysisError>;

fn value_observation(amount: f64) -> Observation {
    if amount >= 0.0 {
        Observation::ValueCreated { amount }
    } else {
        Observation::ValueDestroyed { amount: -amount }
    }
}

/// NOPAT − WACC × invested capital
pub fn eva(input: &CalculationInput<'_>) -> CalcResult {
    let latest = input.latest()?;
    let invested = latest.balance_sheet.invested_capital();
    let nopat = latest.nopat(input.options.tax_rate);
    let rate = latest.wacc(input.options);
    let value = round2(nopat - rate * invested);

    let details = ValuationDetails {
        discount_rate: Some(rate),
        components: vec![
            NamedValue::new("nopat", round2(nopat)),
            NamedValue::new("invested_capital", invested),
            NamedValue::new("capital_charge", round2(rate * invested)),
        ],
        ..Default::default()
    };
    Ok(Computation::new(value, AnalysisDetails::Valuation(details))
        .observe(value_observation(value))
        .with_benchmark(Some(0.0))
        .chart(ChartHint::Bar))
}

/// Market capitalisation − book equity
pub fn mva(input: &CalculationInput<'_>) -> CalcResult {
    let latest = input.latest()?;
    let market_cap = latest
        .market
        .as_ref()
        .map(|m| m.market_cap())
        .filter(|cap| *cap > 0.0)
        .ok_or_else(|| AnalysisError::input("market value added needs market data"))?;
    let book = latest.balance_sheet.total_equity;
    let value = round2(market_cap - book);

    let details = ValuationDetails {
        equity_value: Some(market_cap),
        components: vec![
            NamedValue::new("market_capitalization", market_cap),
            NamedValue::new("book_equity", book),
        ],
        ..Default::default()
    };
    Ok(Computation::new(value, AnalysisDetails::Valuation(details))
        .observe(value_observation(value))
        .with_benchmark(Some(0.0))
        .chart(ChartHint::Bar))
}

/// Dividend growth: per-share CAGR when two or more years paid a dividend,
/// otherwise the terminal growth assumption.
fn dividend_growth(input: &CalculationInput<'_>) -> f64 {
    let dividends: Vec<f64> = input
        .statements
        .iter()
        .filter_map(|s| s.market.as_ref())
        .map(|m| m.dividends_per_share)
        .collect();
    match (dividends.first(), dividends.last()) {
        (Some(&first), Some(&last)) if dividends.len() >= 2 && first > 0.0 && last > 0.0 => {
            (last / first).powf(1.0 / (dividends.len() - 1) as f64) - 1.0
        }
        _ => input.options.terminal_growth_rate,
    }
}

/// Gordon growth: D₀(1 + g) / (kₑ − g)
pub fn ddm_value(input: &CalculationInput<'_>) -> CalcResult {
    let latest = input.latest()?;
    let market = latest
        .market
        .as_ref()
        .filter(|m| m.dividends_per_share > 0.0)
        .ok_or_else(|| AnalysisError::input("dividend discount model needs a dividend per share"))?;
    let cost_of_equity = input.options.cost_of_equity();
    let growth = dividend_growth(input);
    if growth >= cost_of_equity {
        return Err(AnalysisError::calculation("dividend growth ≥ cost of equity"));
    }
    let next_dividend = market.dividends_per_share * (1.0 + growth);
    let value = round2(next_dividend / (cost_of_equity - growth));

    let details = ValuationDetails {
        discount_rate: Some(cost_of_equity),
        components: vec![
            NamedValue::new("dividend_per_share", market.dividends_per_share),
            NamedValue::new("dividend_growth", growth),
            NamedValue::new("next_dividend", round2(next_dividend)),
        ],
        ..Default::default()
    };
    let mut computation = Computation::new(value, AnalysisDetails::Valuation(details)).chart(ChartHint::Bar);
    if market.share_price > 0.0 {
        computation = computation
            .observe(Observation::PriceGap {
                percent: round2((value - market.share_price) / market.share_price * 100.0),
            })
            .with_benchmark(Some(market.share_price));
    }
    Ok(computation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::fixtures::{scaled_statement, Fixture};
    use approx::assert_relative_eq;

    #[test]
    fn test_eva_and_mva() {
        let fx = Fixture::new(vec![scaled_statement(2023, 1.0)]);
        // 160,000 − 8.859% × 1,050,000
        assert_relative_eq!(eva(&fx.input()).unwrap().value, 66_977.78, epsilon = 0.01);
        assert_relative_eq!(mva(&fx.input()).unwrap().value, 300_000.0);
    }

    #[test]
    fn test_ddm_single_year_uses_terminal_growth() {
        let fx = Fixture::new(vec![scaled_statement(2023, 1.0)]);
        let result = ddm_value(&fx.input()).unwrap();
        // 1.00 × 1.03 / (10% − 3%)
        assert_relative_eq!(result.value, 14.71);
        assert_eq!(result.benchmark, Some(20.0));
    }

    #[test]
    fn test_ddm_rejects_growth_above_cost_of_equity() {
        let fx = Fixture::new(vec![scaled_statement(2022, 1.0), scaled_statement(2023, 1.5)]);
        assert!(matches!(ddm_value(&fx.input()), Err(AnalysisError::Calculation(_))));
    }
}
