//! Time value of money: NPV, IRR, MIRR, payback periods, profitability index,
//! accounting rate of return and equivalent annual annuity.

use analysis_core::numeric::{round2, round_to};
use analysis_core::{
    AnalysisDetails, AnalysisError, CalculationInput, ChartHint, Computation, InvestmentProject,
    IrrStatus, NamedValue, Observation, ValuationDetails,
};

use crate::projection::investment_project;

type CalcResult = Result<Computation, AnalysisError>;

pub const IRR_LOWER_BOUND: f64 = -0.99;
pub const IRR_UPPER_BOUND: f64 = 10.0;
const IRR_SCAN_STEPS: usize = 2_000;
const IRR_TOLERANCE: f64 = 1e-12;

/// Present value of each flow, the first one discounted one period.
pub fn present_values(rate: f64, cash_flows: &[f64]) -> Vec<f64> {
    cash_flows
        .iter()
        .enumerate()
        .map(|(i, cf)| cf / (1.0 + rate).powi(i as i32 + 1))
        .collect()
}

/// Σ CFₜ / (1 + r)ᵗ − initial investment
pub fn npv(rate: f64, initial_investment: f64, cash_flows: &[f64]) -> f64 {
    present_values(rate, cash_flows).iter().sum::<f64>() - initial_investment
}

/// NPV of a full stream whose first element sits at t = 0
fn stream_npv(rate: f64, stream: &[f64]) -> f64 {
    stream
        .iter()
        .enumerate()
        .map(|(t, cf)| cf / (1.0 + rate).powi(t as i32))
        .sum()
}

fn stream_npv_derivative(rate: f64, stream: &[f64]) -> f64 {
    stream
        .iter()
        .enumerate()
        .skip(1)
        .map(|(t, cf)| -(t as f64) * cf / (1.0 + rate).powi(t as i32 + 1))
        .sum()
}

/// Number of sign changes in a stream, zeros ignored
pub fn sign_changes(stream: &[f64]) -> usize {
    let signs: Vec<bool> = stream.iter().filter(|cf| **cf != 0.0).map(|cf| *cf > 0.0).collect();
    signs.windows(2).filter(|w| w[0] != w[1]).count()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IrrSolution {
    pub rate: Option<f64>,
    pub status: IrrStatus,
}

/// Internal rate of return of a project.
///
/// The lowest root in [−99%, 1000%] is bracketed by a grid scan, narrowed by
/// bisection and polished with Newton steps that must stay inside the
/// bracket. More than one sign change in the stream marks the result as
/// `MultipleOrNone` even when a root was found.
pub fn irr(initial_investment: f64, cash_flows: &[f64]) -> IrrSolution {
    let mut stream = Vec::with_capacity(cash_flows.len() + 1);
    stream.push(-initial_investment);
    stream.extend_from_slice(cash_flows);

    let changes = sign_changes(&stream);
    let status = if changes > 1 { IrrStatus::MultipleOrNone } else { IrrStatus::Unique };
    if changes == 0 {
        return IrrSolution {
            rate: None,
            status: IrrStatus::NotFound,
        };
    }

    let Some((lo, hi)) = bracket_root(&stream) else {
        return IrrSolution {
            rate: None,
            status: if changes > 1 { IrrStatus::MultipleOrNone } else { IrrStatus::NotFound },
        };
    };

    let (mut a, mut b) = (lo, hi);
    let mut f_a = stream_npv(a, &stream);
    for _ in 0..200 {
        if b - a < IRR_TOLERANCE {
            break;
        }
        let mid = (a + b) / 2.0;
        let f_mid = stream_npv(mid, &stream);
        if f_mid == 0.0 {
            a = mid;
            b = mid;
            break;
        }
        if f_a * f_mid < 0.0 {
            b = mid;
        } else {
            a = mid;
            f_a = f_mid;
        }
    }

    let mut rate = (a + b) / 2.0;
    for _ in 0..20 {
        let slope = stream_npv_derivative(rate, &stream);
        if slope == 0.0 || !slope.is_finite() {
            break;
        }
        let next = rate - stream_npv(rate, &stream) / slope;
        if !next.is_finite() || next < lo || next > hi {
            break;
        }
        let converged = (next - rate).abs() < IRR_TOLERANCE;
        rate = next;
        if converged {
            break;
        }
    }

    IrrSolution {
        rate: Some(rate),
        status,
    }
}

fn bracket_root(stream: &[f64]) -> Option<(f64, f64)> {
    let step = (IRR_UPPER_BOUND - IRR_LOWER_BOUND) / IRR_SCAN_STEPS as f64;
    let mut lo = IRR_LOWER_BOUND;
    let mut f_lo = stream_npv(lo, stream);
    for i in 1..=IRR_SCAN_STEPS {
        let hi = IRR_LOWER_BOUND + step * i as f64;
        let f_hi = stream_npv(hi, stream);
        if f_lo == 0.0 {
            return Some((lo, lo));
        }
        if f_lo.is_finite() && f_hi.is_finite() && f_lo * f_hi <= 0.0 {
            return Some((lo, hi));
        }
        lo = hi;
        f_lo = f_hi;
    }
    None
}

/// Modified IRR: outflows discounted at the finance rate, inflows compounded
/// to the horizon at the reinvestment rate.
pub fn mirr(initial_investment: f64, cash_flows: &[f64], finance_rate: f64, reinvest_rate: f64) -> Option<f64> {
    let n = cash_flows.len();
    if n == 0 {
        return None;
    }
    let mut pv_out = initial_investment.max(0.0);
    let mut fv_in = 0.0;
    for (i, cf) in cash_flows.iter().enumerate() {
        let t = i as i32 + 1;
        if *cf < 0.0 {
            pv_out += -cf / (1.0 + finance_rate).powi(t);
        } else {
            fv_in += cf * (1.0 + reinvest_rate).powi(n as i32 - t);
        }
    }
    if pv_out <= 0.0 || fv_in <= 0.0 {
        return None;
    }
    let rate = (fv_in / pv_out).powf(1.0 / n as f64) - 1.0;
    rate.is_finite().then_some(rate)
}

/// Years until cumulative flows recover the investment, interpolated within
/// the crossing year.
pub fn payback_period(initial_investment: f64, cash_flows: &[f64]) -> Option<f64> {
    if initial_investment <= 0.0 {
        return Some(0.0);
    }
    let mut cumulative = 0.0;
    for (i, cf) in cash_flows.iter().enumerate() {
        if *cf > 0.0 && cumulative + cf >= initial_investment {
            return Some(i as f64 + (initial_investment - cumulative) / cf);
        }
        cumulative += cf;
    }
    None
}

pub fn discounted_payback_period(rate: f64, initial_investment: f64, cash_flows: &[f64]) -> Option<f64> {
    payback_period(initial_investment, &present_values(rate, cash_flows))
}

pub fn profitability_index(rate: f64, initial_investment: f64, cash_flows: &[f64]) -> Option<f64> {
    if initial_investment <= 0.0 {
        return None;
    }
    Some(present_values(rate, cash_flows).iter().sum::<f64>() / initial_investment)
}

/// NPV spread into a level annual amount over the project life
pub fn equivalent_annual_annuity(rate: f64, npv: f64, years: usize) -> Option<f64> {
    if years == 0 {
        return None;
    }
    if rate == 0.0 {
        return Some(npv / years as f64);
    }
    let annuity_factor = (1.0 - (1.0 + rate).powi(-(years as i32))) / rate;
    (annuity_factor != 0.0).then(|| npv / annuity_factor)
}

/// Average annual profit (cash flow less straight-line recovery of the
/// investment) over the initial investment
pub fn accounting_rate_of_return(initial_investment: f64, cash_flows: &[f64]) -> Option<f64> {
    if initial_investment <= 0.0 || cash_flows.is_empty() {
        return None;
    }
    let n = cash_flows.len() as f64;
    let average_cash_flow = cash_flows.iter().sum::<f64>() / n;
    let depreciation = initial_investment / n;
    Some((average_cash_flow - depreciation) / initial_investment)
}

fn project_components(project: &InvestmentProject) -> Vec<NamedValue> {
    let mut components = vec![NamedValue::new("initial_investment", project.initial_investment)];
    components.extend(
        project
            .cash_flows
            .iter()
            .enumerate()
            .map(|(i, cf)| NamedValue::new(format!("year_{}", i + 1), round2(*cf))),
    );
    components
}

fn valuation(
    value: f64,
    input: &CalculationInput<'_>,
    project: &InvestmentProject,
    fill: impl FnOnce(&mut ValuationDetails),
) -> Computation {
    let rate = input.options.discount_rate;
    let mut details = ValuationDetails {
        discount_rate: Some(rate),
        present_values: present_values(rate, &project.cash_flows)
            .into_iter()
            .map(round2)
            .collect(),
        components: project_components(project),
        ..Default::default()
    };
    fill(&mut details);
    Computation::new(value, AnalysisDetails::Valuation(details)).chart(ChartHint::Bar)
}

pub fn net_present_value(input: &CalculationInput<'_>) -> CalcResult {
    let project = investment_project(input)?;
    let rate = input.options.discount_rate;
    let value = round2(npv(rate, project.initial_investment, &project.cash_flows));

    Ok(valuation(value, input, &project, |d| d.npv = Some(value))
        .observe(Observation::NpvDecision { accept: value > 0.0 })
        .with_benchmark(Some(0.0)))
}

pub fn internal_rate_of_return(input: &CalculationInput<'_>) -> CalcResult {
    let project = investment_project(input)?;
    let hurdle = input.options.discount_rate;
    let solution = irr(project.initial_investment, &project.cash_flows);
    let rate = solution.rate.ok_or_else(|| {
        AnalysisError::calculation("no internal rate of return between -99% and 1000%")
    })?;
    let value = round2(rate * 100.0);

    let mut computation = valuation(value, input, &project, |d| {
        d.irr = Some(round_to(rate, 6));
        d.irr_status = Some(solution.status);
    })
    .observe(Observation::IrrVersusHurdle { irr: rate, hurdle });
    if solution.status == IrrStatus::MultipleOrNone {
        computation = computation.observe(Observation::MultipleIrr);
    }
    Ok(computation.with_benchmark(Some(round2(hurdle * 100.0))))
}

pub fn modified_internal_rate_of_return(input: &CalculationInput<'_>) -> CalcResult {
    let project = investment_project(input)?;
    let rate = input.options.discount_rate;
    let reinvest = project.reinvestment_rate.unwrap_or(rate);
    let mirr = mirr(project.initial_investment, &project.cash_flows, rate, reinvest)
        .ok_or_else(|| AnalysisError::calculation("MIRR needs both an outflow and an inflow"))?;
    let value = round2(mirr * 100.0);

    Ok(valuation(value, input, &project, |d| {
        d.components.push(NamedValue::new("reinvestment_rate", reinvest));
    })
    .observe(Observation::IrrVersusHurdle { irr: mirr, hurdle: rate })
    .with_benchmark(Some(round2(rate * 100.0))))
}

fn payback_result(
    input: &CalculationInput<'_>,
    project: &InvestmentProject,
    period: Option<f64>,
    discounted: bool,
) -> CalcResult {
    let horizon = project.cash_flows.len();
    // Never recovered: no value, but the horizon stays in the result.
    let Some(period) = period else {
        return Ok(valuation(f64::NAN, input, project, |_| {})
            .observe(Observation::NoPayback { horizon })
            .with_benchmark(Some(horizon as f64))
            .chart(ChartHint::Line));
    };
    let value = round2(period);

    Ok(valuation(value, input, project, |d| {
        if discounted {
            d.discounted_payback_period = Some(value);
        } else {
            d.payback_period = Some(value);
        }
    })
    .observe(Observation::PaybackWithin { years: value, horizon })
    // Recovery has to happen within the project life.
    .with_benchmark(Some(horizon as f64))
    .chart(ChartHint::Line))
}

pub fn payback(input: &CalculationInput<'_>) -> CalcResult {
    let project = investment_project(input)?;
    let period = payback_period(project.initial_investment, &project.cash_flows);
    payback_result(input, &project, period, false)
}

pub fn discounted_payback(input: &CalculationInput<'_>) -> CalcResult {
    let project = investment_project(input)?;
    let period = discounted_payback_period(
        input.options.discount_rate,
        project.initial_investment,
        &project.cash_flows,
    );
    payback_result(input, &project, period, true)
}

pub fn profitability_index_of(input: &CalculationInput<'_>) -> CalcResult {
    let project = investment_project(input)?;
    let rate = input.options.discount_rate;
    let pi = profitability_index(rate, project.initial_investment, &project.cash_flows)
        .ok_or_else(|| AnalysisError::input("initial investment must be positive"))?;
    let value = round2(pi);

    Ok(valuation(value, input, &project, |d| d.profitability_index = Some(value))
        .observe(Observation::NpvDecision { accept: pi > 1.0 })
        .with_benchmark(Some(1.0)))
}

pub fn accounting_return(input: &CalculationInput<'_>) -> CalcResult {
    let project = investment_project(input)?;
    let arr = accounting_rate_of_return(project.initial_investment, &project.cash_flows)
        .ok_or_else(|| AnalysisError::input("initial investment must be positive"))?;
    let rate = input.options.discount_rate;

    Ok(valuation(round2(arr * 100.0), input, &project, |_| {})
        .with_benchmark(Some(round2(rate * 100.0))))
}

pub fn equivalent_annual(input: &CalculationInput<'_>) -> CalcResult {
    let project = investment_project(input)?;
    let rate = input.options.discount_rate;
    let npv = npv(rate, project.initial_investment, &project.cash_flows);
    let eaa = equivalent_annual_annuity(rate, npv, project.cash_flows.len())
        .ok_or_else(|| AnalysisError::calculation("annuity factor is zero"))?;

    Ok(valuation(round2(eaa), input, &project, |d| d.npv = Some(round2(npv)))
        .with_benchmark(Some(0.0)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::fixtures::{scaled_statement, Fixture};
    use analysis_core::AnalysisOptions;
    use approx::assert_relative_eq;

    const FLOWS: [f64; 5] = [300.0; 5];

    fn project_fixture() -> Fixture {
        let options = AnalysisOptions {
            investment_project: Some(InvestmentProject {
                initial_investment: 1_000.0,
                cash_flows: FLOWS.to_vec(),
                reinvestment_rate: None,
            }),
            ..Default::default()
        };
        Fixture::new(vec![scaled_statement(2023, 1.0)]).with_options(options)
    }

    #[test]
    fn test_npv_scenario() {
        assert_relative_eq!(npv(0.10, 1_000.0, &FLOWS), 137.236, epsilon = 1e-3);
        let result = net_present_value(&project_fixture().input()).unwrap();
        assert_relative_eq!(result.value, 137.24);
        assert_eq!(result.observations, vec![Observation::NpvDecision { accept: true }]);
    }

    #[test]
    fn test_irr_zeroes_npv() {
        let solution = irr(1_000.0, &FLOWS);
        assert_eq!(solution.status, IrrStatus::Unique);
        let rate = solution.rate.unwrap();
        assert_relative_eq!(rate, 0.1524, epsilon = 1e-4);
        assert!(npv(rate, 1_000.0, &FLOWS).abs() < 1e-6);

        let result = internal_rate_of_return(&project_fixture().input()).unwrap();
        assert_relative_eq!(result.value, 15.24);
        assert_eq!(result.benchmark, Some(10.0));
    }

    #[test]
    fn test_irr_flags_non_conventional_flows() {
        // -100, +230, -132 has roots at 10% and 20%
        let solution = irr(100.0, &[230.0, -132.0]);
        assert_eq!(solution.status, IrrStatus::MultipleOrNone);
        let rate = solution.rate.unwrap();
        assert!(stream_npv(rate, &[-100.0, 230.0, -132.0]).abs() < 1e-6);

        let none = irr(100.0, &[-10.0, -10.0]);
        assert_eq!(none.status, IrrStatus::NotFound);
        assert!(none.rate.is_none());
    }

    #[test]
    fn test_payback_interpolates() {
        assert_relative_eq!(payback_period(1_000.0, &FLOWS).unwrap(), 3.0 + 100.0 / 300.0);
        assert_relative_eq!(discounted_payback_period(0.10, 1_000.0, &FLOWS).unwrap(), 4.263, epsilon = 1e-3);
        assert!(payback_period(2_000.0, &FLOWS).is_none());
        assert!(matches!(
            payback(&project_fixture().input()).map(|c| c.value),
            Ok(v) if (v - 3.33).abs() < 1e-9
        ));
    }

    #[test]
    fn test_unrecovered_investment_keeps_horizon() {
        let options = AnalysisOptions {
            investment_project: Some(InvestmentProject {
                initial_investment: 2_000.0,
                cash_flows: FLOWS.to_vec(),
                reinvestment_rate: None,
            }),
            ..Default::default()
        };
        let fx = Fixture::new(vec![scaled_statement(2023, 1.0)]).with_options(options);
        for result in [payback(&fx.input()).unwrap(), discounted_payback(&fx.input()).unwrap()] {
            assert!(result.value.is_nan());
            assert_eq!(result.observations, vec![Observation::NoPayback { horizon: FLOWS.len() }]);
            assert_eq!(result.benchmark, Some(FLOWS.len() as f64));
        }
    }

    #[test]
    fn test_other_project_measures() {
        assert_relative_eq!(mirr(1_000.0, &FLOWS, 0.10, 0.10).unwrap(), 0.1287, epsilon = 1e-4);
        assert_relative_eq!(profitability_index(0.10, 1_000.0, &FLOWS).unwrap(), 1.137, epsilon = 1e-3);
        assert_relative_eq!(accounting_rate_of_return(1_000.0, &FLOWS).unwrap(), 0.10, epsilon = 1e-12);
        let eaa = equivalent_annual_annuity(0.10, npv(0.10, 1_000.0, &FLOWS), 5).unwrap();
        assert_relative_eq!(eaa, 36.20, epsilon = 1e-2);
        assert_eq!(equivalent_annual_annuity(0.0, 50.0, 5), Some(10.0));
    }

    #[test]
    fn test_sign_changes_ignore_zeros() {
        assert_eq!(sign_changes(&[-1.0, 0.0, 2.0, 0.0, 3.0]), 1);
        assert_eq!(sign_changes(&[-1.0, 2.0, -3.0]), 2);
    }
}
