//! Probability-weighted scenario analysis.

use analysis_core::numeric::round2;
use analysis_core::{
    AnalysisDetails, AnalysisError, CalculationInput, ChartHint, Computation, Observation,
    Scenario, ScenarioOutcome, SimulationDetails,
};

use crate::model::{Drivers, ValueModel};

pub const PROBABILITY_TOLERANCE: f64 = 1e-6;

/// Supplied scenarios, or optimistic / realistic / pessimistic around the
/// historical drivers (growth ±5 points, margin ±20%, discount rate ∓1 point)
/// weighted 25 / 50 / 25.
pub fn scenarios_for(input: &CalculationInput<'_>, model: &ValueModel) -> Vec<Scenario> {
    if let Some(scenarios) = &input.options.scenarios {
        return scenarios.clone();
    }
    let base = model.base_drivers();
    let scenario = |name: &str, probability: f64, growth_shift: f64, margin_factor: f64, rate_shift: f64| Scenario {
        name: name.to_string(),
        probability,
        revenue_growth: base.revenue_growth + growth_shift,
        fcf_margin: base.fcf_margin * margin_factor,
        discount_rate: base.discount_rate + rate_shift,
    };
    vec![
        scenario("optimistic", 0.25, 0.05, 1.2, -0.01),
        scenario("realistic", 0.50, 0.0, 1.0, 0.0),
        scenario("pessimistic", 0.25, -0.05, 0.8, 0.01),
    ]
}

pub fn validate_probabilities(scenarios: &[Scenario]) -> Result<(), AnalysisError> {
    if scenarios.is_empty() {
        return Err(AnalysisError::input("no scenarios supplied"));
    }
    if let Some(bad) = scenarios
        .iter()
        .find(|s| !(0.0..=1.0).contains(&s.probability))
    {
        return Err(AnalysisError::input(format!(
            "scenario '{}' has probability {} outside [0, 1]",
            bad.name, bad.probability
        )));
    }
    let total: f64 = scenarios.iter().map(|s| s.probability).sum();
    if (total - 1.0).abs() > PROBABILITY_TOLERANCE {
        return Err(AnalysisError::input(format!(
            "scenario probabilities sum to {}, expected 1",
            total
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioAnalysis {
    pub outcomes: Vec<ScenarioOutcome>,
    pub expected_value: f64,
    pub dispersion: f64,
}

pub fn analyse(model: &ValueModel, scenarios: &[Scenario]) -> Result<ScenarioAnalysis, AnalysisError> {
    validate_probabilities(scenarios)?;
    let outcomes = scenarios
        .iter()
        .map(|s| {
            let value = model.value_created(Drivers {
                revenue_growth: s.revenue_growth,
                fcf_margin: s.fcf_margin,
                discount_rate: s.discount_rate,
            })?;
            Ok(ScenarioOutcome {
                name: s.name.clone(),
                probability: s.probability,
                value,
            })
        })
        .collect::<Result<Vec<_>, AnalysisError>>()?;

    let expected_value: f64 = outcomes.iter().map(|o| o.probability * o.value).sum();
    let variance: f64 = outcomes
        .iter()
        .map(|o| o.probability * (o.value - expected_value).powi(2))
        .sum();

    Ok(ScenarioAnalysis {
        outcomes,
        expected_value,
        dispersion: variance.sqrt(),
    })
}

fn scenario_computation(value: f64, analysis: &ScenarioAnalysis) -> Computation {
    let low = analysis.outcomes.iter().map(|o| o.value).fold(f64::INFINITY, f64::min);
    let high = analysis.outcomes.iter().map(|o| o.value).fold(f64::NEG_INFINITY, f64::max);
    let details = SimulationDetails {
        mean: Some(round2(analysis.expected_value)),
        std_dev: Some(round2(analysis.dispersion)),
        scenarios: analysis
            .outcomes
            .iter()
            .map(|o| ScenarioOutcome {
                value: round2(o.value),
                ..o.clone()
            })
            .collect(),
        ..Default::default()
    };
    Computation::new(value, AnalysisDetails::Simulation(details))
        .observe(Observation::ScenarioRange {
            low: round2(low),
            high: round2(high),
        })
        .chart(ChartHint::Bar)
}

fn run(input: &CalculationInput<'_>) -> Result<ScenarioAnalysis, AnalysisError> {
    let model = ValueModel::from_input(input)?;
    analyse(&model, &scenarios_for(input, &model))
}

pub fn scenario_expected_value(input: &CalculationInput<'_>) -> Result<Computation, AnalysisError> {
    let analysis = run(input)?;
    let value = round2(analysis.expected_value);
    let observation = if value >= 0.0 {
        Observation::ValueCreated { amount: value }
    } else {
        Observation::ValueDestroyed { amount: -value }
    };
    Ok(scenario_computation(value, &analysis)
        .observe(observation)
        .with_benchmark(Some(0.0)))
}

/// Probability-weighted standard deviation, rated against the size of the
/// expected value itself.
pub fn scenario_dispersion(input: &CalculationInput<'_>) -> Result<Computation, AnalysisError> {
    let analysis = run(input)?;
    Ok(scenario_computation(round2(analysis.dispersion), &analysis)
        .with_benchmark(Some(round2(analysis.expected_value.abs()))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::fixtures::{scaled_statement, Fixture};
    use analysis_core::AnalysisOptions;
    use approx::assert_relative_eq;

    fn explicit(probabilities: [f64; 2]) -> AnalysisOptions {
        AnalysisOptions {
            scenarios: Some(vec![
                Scenario {
                    name: "up".to_string(),
                    probability: probabilities[0],
                    revenue_growth: 0.05,
                    fcf_margin: 0.15,
                    discount_rate: 0.09,
                },
                Scenario {
                    name: "down".to_string(),
                    probability: probabilities[1],
                    revenue_growth: -0.05,
                    fcf_margin: 0.10,
                    discount_rate: 0.11,
                },
            ]),
            ..Default::default()
        }
    }

    #[test]
    fn test_probabilities_must_sum_to_one() {
        let fx = Fixture::new(vec![scaled_statement(2023, 1.0)]).with_options(explicit([0.5, 0.6]));
        assert!(matches!(
            scenario_expected_value(&fx.input()),
            Err(AnalysisError::InputData(_))
        ));
    }

    #[test]
    fn test_expected_value_is_probability_weighted() {
        let fx = Fixture::new(vec![scaled_statement(2023, 1.0)]).with_options(explicit([0.5, 0.5]));
        let model = ValueModel::from_input(&fx.input()).unwrap();
        let analysis = analyse(&model, &scenarios_for(&fx.input(), &model)).unwrap();
        let up = analysis.outcomes[0].value;
        let down = analysis.outcomes[1].value;
        assert_relative_eq!(analysis.expected_value, (up + down) / 2.0, max_relative = 1e-12);
        assert_relative_eq!(analysis.dispersion, (up - down).abs() / 2.0, max_relative = 1e-9);

        let result = scenario_dispersion(&fx.input()).unwrap();
        assert_relative_eq!(result.value, round2(analysis.dispersion));
    }

    #[test]
    fn test_default_scenarios_are_ordered() {
        let fx = Fixture::new(vec![scaled_statement(2023, 1.0)]);
        let result = scenario_expected_value(&fx.input()).unwrap();
        match result.details {
            AnalysisDetails::Simulation(d) => {
                assert_eq!(d.scenarios.len(), 3);
                assert!(d.scenarios[0].value > d.scenarios[1].value);
                assert!(d.scenarios[1].value > d.scenarios[2].value);
            }
            other => panic!("unexpected details {:?}", other),
        }
    }
}
