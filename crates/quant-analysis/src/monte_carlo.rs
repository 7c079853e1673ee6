//! Seeded Monte Carlo simulation of value created.
//!
//! Iterations are split into fixed blocks of [`BLOCK_SIZE`]. Each block owns a
//! `ChaCha8Rng` seeded from the run seed with the block index as its stream,
//! so the blocks can run on any rayon worker and still produce the same
//! samples in the same order.

use analysis_core::numeric::round2;
use analysis_core::stats::{mean, percentile_of_sorted, sorted, std_dev};
use analysis_core::{
    AnalysisDetails, AnalysisError, CalculationInput, ChartHint, Computation, InputDistribution,
    NamedValue, Observation, PercentilePoint, SimulationDetails, SimulationInputs,
};
use rand::distributions::Distribution;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use statrs::distribution::{Normal, Triangular, Uniform};
use tracing::debug;
use valuation_analysis::projection::{growth_history, margin_history};

use crate::model::{Drivers, ValueModel};

pub const BLOCK_SIZE: usize = 1_000;
pub const REPORTED_PERCENTILES: [f64; 5] = [5.0, 25.0, 50.0, 75.0, 95.0];
/// Growth volatility assumed when the history cannot supply one
pub const DEFAULT_GROWTH_STD_DEV: f64 = 0.05;
/// Half-width of the default discount rate band around WACC
pub const DISCOUNT_RATE_BAND: f64 = 0.01;
/// Spreads narrower than this are treated as no measured variation
const MIN_SPREAD: f64 = 1e-9;
/// Loss probability (%) above which the run is flagged
pub const LOSS_PROBABILITY_LIMIT: f64 = 30.0;

/// A validated, ready-to-draw input distribution
#[derive(Debug, Clone, Copy)]
enum Sampler {
    Normal(Normal),
    Uniform(Uniform),
    Triangular(Triangular),
    Fixed(f64),
}

impl Sampler {
    fn new(distribution: InputDistribution, name: &str) -> Result<Self, AnalysisError> {
        let invalid = |e: String| AnalysisError::input(format!("invalid {} distribution: {}", name, e));
        match distribution {
            InputDistribution::Fixed { value } => Ok(Sampler::Fixed(value)),
            InputDistribution::Normal { mean, std_dev } if std_dev == 0.0 => Ok(Sampler::Fixed(mean)),
            InputDistribution::Normal { mean, std_dev } => {
                Normal::new(mean, std_dev).map(Sampler::Normal).map_err(|e| invalid(e.to_string()))
            }
            InputDistribution::Uniform { min, max } if min == max => Ok(Sampler::Fixed(min)),
            InputDistribution::Uniform { min, max } => {
                Uniform::new(min, max).map(Sampler::Uniform).map_err(|e| invalid(e.to_string()))
            }
            InputDistribution::Triangular { min, mode, max } if min == max && mode == min => {
                Ok(Sampler::Fixed(min))
            }
            InputDistribution::Triangular { min, mode, max } => {
                Triangular::new(min, max, mode).map(Sampler::Triangular).map_err(|e| invalid(e.to_string()))
            }
        }
    }

    fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self {
            Sampler::Normal(d) => d.sample(rng),
            Sampler::Uniform(d) => d.sample(rng),
            Sampler::Triangular(d) => d.sample(rng),
            Sampler::Fixed(v) => *v,
        }
    }
}

/// Supplied distributions, or defaults around the historical drivers:
/// growth ~ Normal(base growth, σ of yearly growth), margin ~ Triangular over
/// the historical margin range, discount rate ~ Uniform(WACC ± 1 point).
pub fn simulation_inputs(input: &CalculationInput<'_>, model: &ValueModel) -> SimulationInputs {
    if let Some(inputs) = &input.options.simulation {
        return inputs.clone();
    }
    let base = model.base_drivers();

    let growth = growth_history(input);
    let measured = std_dev(&growth);
    let growth_sd = if growth.len() >= 2 && measured > MIN_SPREAD { measured } else { DEFAULT_GROWTH_STD_DEV };

    let margins = margin_history(input);
    let lowest = margins.iter().copied().fold(f64::INFINITY, f64::min);
    let highest = margins.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let fcf_margin = if margins.len() >= 2 && highest - lowest > MIN_SPREAD {
        InputDistribution::Triangular { min: lowest, mode: base.fcf_margin, max: highest }
    } else {
        let spread = (base.fcf_margin.abs() * 0.2).max(0.01);
        InputDistribution::Triangular {
            min: base.fcf_margin - spread,
            mode: base.fcf_margin,
            max: base.fcf_margin + spread,
        }
    };

    SimulationInputs {
        revenue_growth: InputDistribution::Normal { mean: base.revenue_growth, std_dev: growth_sd },
        fcf_margin,
        discount_rate: InputDistribution::Uniform {
            min: base.discount_rate - DISCOUNT_RATE_BAND,
            max: base.discount_rate + DISCOUNT_RATE_BAND,
        },
    }
}

/// Aggregated outcome of one simulation run
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationRun {
    pub iterations: usize,
    /// Draws kept; a draw whose discount rate does not exceed terminal growth is discarded
    pub accepted: usize,
    pub seed: u64,
    pub confidence: f64,
    pub mean: f64,
    pub std_dev: f64,
    pub percentiles: Vec<PercentilePoint>,
    pub value_at_risk: f64,
    pub conditional_value_at_risk: f64,
    /// Percent of kept draws with negative value created
    pub loss_probability: f64,
    pub median_revenue: f64,
}

impl SimulationRun {
    pub fn details(&self) -> SimulationDetails {
        SimulationDetails {
            iterations: Some(self.iterations),
            seed: Some(self.seed),
            mean: Some(round2(self.mean)),
            std_dev: Some(round2(self.std_dev)),
            percentiles: self
                .percentiles
                .iter()
                .map(|p| PercentilePoint { percentile: p.percentile, value: round2(p.value) })
                .collect(),
            value_at_risk: Some(round2(self.value_at_risk)),
            conditional_value_at_risk: Some(round2(self.conditional_value_at_risk)),
            probability_of_loss: Some(round2(self.loss_probability)),
            sensitivities: vec![NamedValue::new("accepted_draws", self.accepted as f64)],
            ..Default::default()
        }
    }
}

fn draw_block(
    model: &ValueModel,
    samplers: &[Sampler; 3],
    seed: u64,
    block: usize,
    draws: usize,
) -> Vec<(f64, f64)> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(block as u64);

    (0..draws)
        .filter_map(|_| {
            let drivers = Drivers {
                revenue_growth: samplers[0].draw(&mut rng),
                fcf_margin: samplers[1].draw(&mut rng),
                discount_rate: samplers[2].draw(&mut rng),
            };
            if drivers.discount_rate <= model.terminal_growth {
                return None;
            }
            let value = model.value_created(drivers).ok()?;
            value
                .is_finite()
                .then(|| (value, model.terminal_revenue(drivers.revenue_growth)))
        })
        .collect()
}

pub fn simulate(
    model: &ValueModel,
    inputs: &SimulationInputs,
    iterations: usize,
    seed: u64,
    confidence: f64,
) -> Result<SimulationRun, AnalysisError> {
    if iterations == 0 {
        return Err(AnalysisError::input("simulation needs at least one iteration"));
    }
    if !(0.0 < confidence && confidence < 1.0) {
        return Err(AnalysisError::input(format!("confidence level {} outside (0, 1)", confidence)));
    }
    let samplers = [
        Sampler::new(inputs.revenue_growth, "revenue growth")?,
        Sampler::new(inputs.fcf_margin, "free cash flow margin")?,
        Sampler::new(inputs.discount_rate, "discount rate")?,
    ];

    let blocks = iterations.div_ceil(BLOCK_SIZE);
    let outcomes: Vec<(f64, f64)> = (0..blocks)
        .into_par_iter()
        .map(|block| {
            let draws = BLOCK_SIZE.min(iterations - block * BLOCK_SIZE);
            draw_block(model, &samplers, seed, block, draws)
        })
        .flatten()
        .collect();

    if outcomes.is_empty() {
        return Err(AnalysisError::calculation(
            "every simulated discount rate fell at or below terminal growth",
        ));
    }

    let values: Vec<f64> = outcomes.iter().map(|(v, _)| *v).collect();
    let revenues: Vec<f64> = outcomes.iter().map(|(_, r)| *r).collect();
    let ordered = sorted(&values);
    let average = mean(&values);

    let cutoff = percentile_of_sorted(&ordered, (1.0 - confidence) * 100.0);
    let tail: Vec<f64> = ordered.iter().copied().take_while(|v| *v <= cutoff).collect();
    let tail_mean = if tail.is_empty() { cutoff } else { mean(&tail) };
    let losses = values.iter().filter(|v| **v < 0.0).count();

    let run = SimulationRun {
        iterations,
        accepted: values.len(),
        seed,
        confidence,
        mean: average,
        std_dev: std_dev(&values),
        percentiles: REPORTED_PERCENTILES
            .iter()
            .map(|&p| PercentilePoint { percentile: p, value: percentile_of_sorted(&ordered, p) })
            .collect(),
        value_at_risk: average - cutoff,
        conditional_value_at_risk: average - tail_mean,
        loss_probability: losses as f64 / values.len() as f64 * 100.0,
        median_revenue: percentile_of_sorted(&sorted(&revenues), 50.0),
    };
    debug!(
        iterations,
        accepted = run.accepted,
        seed,
        mean = run.mean,
        "Monte Carlo run complete"
    );
    Ok(run)
}

fn run(input: &CalculationInput<'_>) -> Result<SimulationRun, AnalysisError> {
    let model = ValueModel::from_input(input)?;
    let inputs = simulation_inputs(input, &model);
    simulate(
        &model,
        &inputs,
        input.options.simulation_iterations,
        input.options.random_seed,
        input.options.confidence_level,
    )
}

fn histogram(value: f64, run: &SimulationRun) -> Computation {
    Computation::new(value, AnalysisDetails::Simulation(run.details())).chart(ChartHint::Histogram)
}

pub fn monte_carlo_npv_mean(input: &CalculationInput<'_>) -> Result<Computation, AnalysisError> {
    let run = run(input)?;
    let value = round2(run.mean);
    let observation = if value >= 0.0 {
        Observation::ValueCreated { amount: value }
    } else {
        Observation::ValueDestroyed { amount: -value }
    };
    Ok(histogram(value, &run).observe(observation).with_benchmark(Some(0.0)))
}

/// Rated against the size of the mean: a shortfall larger than the mean
/// itself wipes out the expected value.
pub fn monte_carlo_npv_var(input: &CalculationInput<'_>) -> Result<Computation, AnalysisError> {
    let run = run(input)?;
    let value = round2(run.value_at_risk);
    Ok(histogram(value, &run)
        .observe(Observation::ValueAtRisk {
            amount: value,
            confidence: run.confidence * 100.0,
        })
        .with_benchmark(Some(round2(run.mean.abs()))))
}

pub fn monte_carlo_npv_cvar(input: &CalculationInput<'_>) -> Result<Computation, AnalysisError> {
    let run = run(input)?;
    let value = round2(run.conditional_value_at_risk);
    Ok(histogram(value, &run)
        .observe(Observation::ValueAtRisk {
            amount: value,
            confidence: run.confidence * 100.0,
        })
        .with_benchmark(Some(round2(run.mean.abs()))))
}

pub fn monte_carlo_loss_probability(input: &CalculationInput<'_>) -> Result<Computation, AnalysisError> {
    let run = run(input)?;
    let value = round2(run.loss_probability);
    Ok(histogram(value, &run)
        .observe(Observation::LossProbability { percent: value })
        .with_benchmark(Some(LOSS_PROBABILITY_LIMIT)))
}

/// Median simulated revenue in the final projected year, against the latest actual
pub fn monte_carlo_revenue(input: &CalculationInput<'_>) -> Result<Computation, AnalysisError> {
    let latest = input.latest()?;
    let run = run(input)?;
    Ok(histogram(round2(run.median_revenue), &run)
        .with_benchmark(Some(latest.income_statement.revenue)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::fixtures::{growing_statements, scaled_statement, Fixture};
    use analysis_core::AnalysisOptions;
    use approx::assert_relative_eq;

    fn options(iterations: usize, seed: u64) -> AnalysisOptions {
        AnalysisOptions {
            simulation_iterations: iterations,
            random_seed: seed,
            ..Default::default()
        }
    }

    #[test]
    fn test_same_seed_same_result() {
        let a = Fixture::new(growing_statements()).with_options(options(2_500, 7));
        let b = Fixture::new(growing_statements()).with_options(options(2_500, 7));
        assert_eq!(run(&a.input()).unwrap(), run(&b.input()).unwrap());
    }

    #[test]
    fn test_different_seed_differs() {
        let a = Fixture::new(growing_statements()).with_options(options(2_000, 1));
        let b = Fixture::new(growing_statements()).with_options(options(2_000, 2));
        assert_ne!(run(&a.input()).unwrap().mean, run(&b.input()).unwrap().mean);
    }

    #[test]
    fn test_fixed_inputs_collapse_to_deterministic_value() {
        let fx = Fixture::new(vec![scaled_statement(2023, 1.0)]);
        let model = ValueModel::from_input(&fx.input()).unwrap();
        let base = model.base_drivers();
        let inputs = SimulationInputs {
            revenue_growth: InputDistribution::Fixed { value: base.revenue_growth },
            fcf_margin: InputDistribution::Normal { mean: base.fcf_margin, std_dev: 0.0 },
            discount_rate: InputDistribution::Uniform { min: base.discount_rate, max: base.discount_rate },
        };
        let result = simulate(&model, &inputs, 100, 42, 0.95).unwrap();
        let expected = model.value_created(base).unwrap();
        assert_relative_eq!(result.mean, expected, max_relative = 1e-12);
        assert_relative_eq!(result.value_at_risk, 0.0, epsilon = 1e-6);
        assert_eq!(result.accepted, 100);
    }

    #[test]
    fn test_risk_measures_are_ordered() {
        let fx = Fixture::new(growing_statements()).with_options(options(5_000, 42));
        let result = run(&fx.input()).unwrap();
        assert!(result.value_at_risk > 0.0);
        assert!(result.conditional_value_at_risk >= result.value_at_risk);
        assert!((0.0..=100.0).contains(&result.loss_probability));
        let p = &result.percentiles;
        assert!(p.windows(2).all(|w| w[0].value <= w[1].value));
    }

    #[test]
    fn test_rates_below_terminal_growth_are_discarded() {
        let fx = Fixture::new(vec![scaled_statement(2023, 1.0)]);
        let model = ValueModel::from_input(&fx.input()).unwrap();
        let inputs = SimulationInputs {
            revenue_growth: InputDistribution::Fixed { value: 0.0 },
            fcf_margin: InputDistribution::Fixed { value: 0.13 },
            discount_rate: InputDistribution::Fixed { value: 0.02 },
        };
        assert!(matches!(
            simulate(&model, &inputs, 50, 42, 0.95),
            Err(AnalysisError::Calculation(_))
        ));
    }

    #[test]
    fn test_invalid_distribution_is_input_error() {
        let fx = Fixture::new(vec![scaled_statement(2023, 1.0)]);
        let model = ValueModel::from_input(&fx.input()).unwrap();
        let inputs = SimulationInputs {
            revenue_growth: InputDistribution::Normal { mean: 0.0, std_dev: -1.0 },
            fcf_margin: InputDistribution::Fixed { value: 0.13 },
            discount_rate: InputDistribution::Fixed { value: 0.10 },
        };
        assert!(matches!(
            simulate(&model, &inputs, 50, 42, 0.95),
            Err(AnalysisError::InputData(_))
        ));
    }

    #[test]
    fn test_simulated_revenue_grows_with_history() {
        let fx = Fixture::new(growing_statements()).with_options(options(2_000, 42));
        let result = monte_carlo_revenue(&fx.input()).unwrap();
        assert!(result.value > result.benchmark.unwrap());
    }
}
