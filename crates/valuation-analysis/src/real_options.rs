//! Expansion option priced as a European call with Black-Scholes.

use analysis_core::numeric::round2;
use analysis_core::stats::std_dev;
use analysis_core::{
    AnalysisDetails, AnalysisError, CalculationInput, ChartHint, Computation, NamedValue,
    RealOptionInputs, ValuationDetails,
};
use statrs::distribution::{ContinuousCDF, Normal};

use crate::projection::{growth_history, ProjectionBase};
use crate::tvm::present_values;

/// Volatility used when the revenue history is too short to measure one
pub const DEFAULT_VOLATILITY: f64 = 0.25;

/// European call value: S·N(d₁) − K·e^(−rT)·N(d₂)
pub fn black_scholes_call(
    underlying: f64,
    strike: f64,
    years: f64,
    volatility: f64,
    risk_free_rate: f64,
) -> Result<f64, AnalysisError> {
    if underlying <= 0.0 || strike <= 0.0 || years <= 0.0 || volatility <= 0.0 {
        return Err(AnalysisError::input(
            "option pricing needs positive underlying value, exercise cost, term and volatility",
        ));
    }
    let normal = Normal::new(0.0, 1.0).map_err(|e| AnalysisError::calculation(e.to_string()))?;
    let vol_sqrt_t = volatility * years.sqrt();
    let d1 = ((underlying / strike).ln() + (risk_free_rate + volatility * volatility / 2.0) * years) / vol_sqrt_t;
    let d2 = d1 - vol_sqrt_t;
    Ok(underlying * normal.cdf(d1) - strike * (-risk_free_rate * years).exp() * normal.cdf(d2))
}

/// Supplied option inputs, or an option to replicate the current business:
/// underlying = PV of the projected free cash flows at WACC, exercise cost =
/// today's invested capital, term = projection horizon, volatility = σ of
/// yearly revenue growth.
pub fn option_inputs(input: &CalculationInput<'_>) -> Result<RealOptionInputs, AnalysisError> {
    if let Some(inputs) = &input.options.real_option {
        return Ok(inputs.clone());
    }
    let latest = input.latest()?;
    let years = input.options.projection_years.max(1);
    let flows = ProjectionBase::from_input(input)?.project(years);
    let underlying = present_values(latest.wacc(input.options), &flows).iter().sum::<f64>();

    let growth = growth_history(input);
    let measured = std_dev(&growth);
    let volatility = if growth.len() >= 2 && measured > 0.0 { measured } else { DEFAULT_VOLATILITY };

    Ok(RealOptionInputs {
        underlying_value: underlying,
        exercise_cost: latest.balance_sheet.invested_capital(),
        years: years as f64,
        volatility,
    })
}

pub fn real_option_expansion(input: &CalculationInput<'_>) -> Result<Computation, AnalysisError> {
    let inputs = option_inputs(input)?;
    let rate = input.options.risk_free_rate;
    let value = black_scholes_call(
        inputs.underlying_value,
        inputs.exercise_cost,
        inputs.years,
        inputs.volatility,
        rate,
    )?;

    let details = ValuationDetails {
        discount_rate: Some(rate),
        components: vec![
            NamedValue::new("underlying_value", round2(inputs.underlying_value)),
            NamedValue::new("exercise_cost", round2(inputs.exercise_cost)),
            NamedValue::new("years", inputs.years),
            NamedValue::new("volatility", inputs.volatility),
        ],
        ..Default::default()
    };
    Ok(Computation::new(round2(value), AnalysisDetails::Valuation(details))
        .with_benchmark(Some(0.0))
        .chart(ChartHint::Bar))
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::fixtures::{flat_statements, Fixture};
    use approx::assert_relative_eq;

    #[test]
    fn test_black_scholes_reference_value() {
        let call = black_scholes_call(100.0, 100.0, 1.0, 0.2, 0.05).unwrap();
        assert_relative_eq!(call, 10.4506, epsilon = 1e-3);
        assert!(black_scholes_call(100.0, 100.0, 0.0, 0.2, 0.05).is_err());
    }

    #[test]
    fn test_deep_in_the_money_approaches_intrinsic() {
        let call = black_scholes_call(1_000.0, 10.0, 1.0, 0.2, 0.0).unwrap();
        assert_relative_eq!(call, 990.0, epsilon = 1e-6);
    }

    #[test]
    fn test_default_inputs_from_flat_history() {
        let fx = Fixture::new(flat_statements());
        let inputs = option_inputs(&fx.input()).unwrap();
        assert_eq!(inputs.volatility, DEFAULT_VOLATILITY);
        assert_eq!(inputs.years, 5.0);
        assert!(real_option_expansion(&fx.input()).unwrap().value >= 0.0);
    }
}
