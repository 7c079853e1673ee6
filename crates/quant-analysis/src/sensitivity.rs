//! One-driver sensitivities, the tornado swing and a combined stress test.

use analysis_core::numeric::round2;
use analysis_core::{
    AnalysisDetails, AnalysisError, CalculationInput, ChartHint, Computation, NamedValue,
    Observation, SimulationDetails,
};

use crate::model::{Drivers, ValueModel};

/// One percentage point
const POINT: f64 = 0.01;
/// A one-point move that shifts value by more than this share is treated as
/// highly sensitive.
const SENSITIVITY_BENCHMARK: f64 = 10.0;

fn pct_move(base: f64, shocked: f64) -> f64 {
    if base == 0.0 {
        return 0.0;
    }
    (shocked - base) / base.abs() * 100.0
}

fn simulation(value: f64, sensitivities: Vec<NamedValue>) -> Computation {
    let details = SimulationDetails {
        sensitivities,
        ..Default::default()
    };
    Computation::new(value, AnalysisDetails::Simulation(details)).chart(ChartHint::Bar)
}

/// % change in enterprise value for a one-point rise in the discount rate,
/// reported as a magnitude
pub fn sensitivity_discount_rate(input: &CalculationInput<'_>) -> Result<Computation, AnalysisError> {
    let model = ValueModel::from_input(input)?;
    let base = model.base_drivers();
    let ev = model.enterprise_value(base)?;
    let shocked = model.enterprise_value(Drivers {
        discount_rate: base.discount_rate + POINT,
        ..base
    })?;
    let change = pct_move(ev, shocked);

    Ok(simulation(
        round2(change.abs()),
        vec![
            NamedValue::new("enterprise_value", round2(ev)),
            NamedValue::new("shocked_enterprise_value", round2(shocked)),
            NamedValue::new("change_percent", round2(change)),
        ],
    )
    .with_benchmark(Some(SENSITIVITY_BENCHMARK)))
}

/// % change in enterprise value for a one-point fall in revenue growth
pub fn sensitivity_growth_rate(input: &CalculationInput<'_>) -> Result<Computation, AnalysisError> {
    let model = ValueModel::from_input(input)?;
    let base = model.base_drivers();
    let ev = model.enterprise_value(base)?;
    let shocked = model.enterprise_value(Drivers {
        revenue_growth: base.revenue_growth - POINT,
        ..base
    })?;
    let change = pct_move(ev, shocked);

    Ok(simulation(
        round2(change.abs()),
        vec![
            NamedValue::new("enterprise_value", round2(ev)),
            NamedValue::new("shocked_enterprise_value", round2(shocked)),
            NamedValue::new("change_percent", round2(change)),
        ],
    )
    .with_benchmark(Some(SENSITIVITY_BENCHMARK)))
}

/// Enterprise value swing (high − low) for each driver shocked on its own,
/// largest first
pub fn tornado(model: &ValueModel) -> Result<Vec<NamedValue>, AnalysisError> {
    let base = model.base_drivers();
    let shocks = [
        (
            "revenue_growth",
            Drivers { revenue_growth: base.revenue_growth - 2.0 * POINT, ..base },
            Drivers { revenue_growth: base.revenue_growth + 2.0 * POINT, ..base },
        ),
        (
            "fcf_margin",
            Drivers { fcf_margin: base.fcf_margin * 0.9, ..base },
            Drivers { fcf_margin: base.fcf_margin * 1.1, ..base },
        ),
        (
            "discount_rate",
            Drivers { discount_rate: base.discount_rate + POINT, ..base },
            Drivers { discount_rate: base.discount_rate - POINT, ..base },
        ),
    ];

    let mut swings = shocks
        .iter()
        .map(|(name, low, high)| {
            let swing = (model.enterprise_value(*high)? - model.enterprise_value(*low)?).abs();
            Ok(NamedValue::new(*name, round2(swing)))
        })
        .collect::<Result<Vec<_>, AnalysisError>>()?;
    swings.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(std::cmp::Ordering::Equal));
    Ok(swings)
}

/// Largest single-driver swing. Rated against half of the base enterprise value.
pub fn tornado_range(input: &CalculationInput<'_>) -> Result<Computation, AnalysisError> {
    let model = ValueModel::from_input(input)?;
    let ev = model.enterprise_value(model.base_drivers())?;
    let swings = tornado(&model)?;
    let widest = swings.first().map(|s| s.value).unwrap_or(0.0);
    Ok(simulation(widest, swings).with_benchmark(Some(round2(ev.abs() / 2.0))))
}

/// Value created with growth 5 points lower, margin 20% thinner and the
/// discount rate 2 points higher, all at once
pub fn stress_test_npv(input: &CalculationInput<'_>) -> Result<Computation, AnalysisError> {
    let model = ValueModel::from_input(input)?;
    let base = model.base_drivers();
    let stressed = Drivers {
        revenue_growth: base.revenue_growth - 5.0 * POINT,
        fcf_margin: base.fcf_margin * 0.8,
        discount_rate: base.discount_rate + 2.0 * POINT,
    };
    let base_value = model.value_created(base)?;
    let value = round2(model.value_created(stressed)?);

    let observation = if value >= 0.0 {
        Observation::ValueCreated { amount: value }
    } else {
        Observation::ValueDestroyed { amount: -value }
    };
    Ok(simulation(
        value,
        vec![
            NamedValue::new("base_value", round2(base_value)),
            NamedValue::new("stressed_value", value),
            NamedValue::new("revenue_growth", stressed.revenue_growth),
            NamedValue::new("fcf_margin", stressed.fcf_margin),
            NamedValue::new("discount_rate", stressed.discount_rate),
        ],
    )
    .observe(observation)
    .with_benchmark(Some(0.0)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::fixtures::{scaled_statement, Fixture};

    fn fixture() -> Fixture {
        Fixture::new(vec![scaled_statement(2023, 1.0)])
    }

    #[test]
    fn test_sensitivities_are_positive_magnitudes() {
        let fx = fixture();
        let rate = sensitivity_discount_rate(&fx.input()).unwrap();
        let growth = sensitivity_growth_rate(&fx.input()).unwrap();
        assert!(rate.value > 0.0);
        assert!(growth.value > 0.0);
        // Terminal value dominates, so the discount rate matters more
        assert!(rate.value > growth.value);
    }

    #[test]
    fn test_tornado_sorted_descending() {
        let fx = fixture();
        let model = ValueModel::from_input(&fx.input()).unwrap();
        let swings = tornado(&model).unwrap();
        assert_eq!(swings.len(), 3);
        assert!(swings.windows(2).all(|w| w[0].value >= w[1].value));
        assert_eq!(tornado_range(&fx.input()).unwrap().value, swings[0].value);
    }

    #[test]
    fn test_stress_lowers_value() {
        let fx = fixture();
        let model = ValueModel::from_input(&fx.input()).unwrap();
        let base = model.value_created(model.base_drivers()).unwrap();
        assert!(stress_test_npv(&fx.input()).unwrap().value < base);
    }
}
