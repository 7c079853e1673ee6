//! Discounted cash flow valuation of the company.

use analysis_core::numeric::{require_nonzero, round2};
use analysis_core::{
    AnalysisDetails, AnalysisError, CalculationInput, ChartHint, Computation, FinancialStatement,
    NamedValue, Observation, ValuationDetails,
};

use crate::projection::ProjectionBase;
use crate::tvm::present_values;

type CalcResult = Result<Computation, AnalysisError>;

#[derive(Debug, Clone, PartialEq)]
pub struct DcfValuation {
    pub discount_rate: f64,
    pub terminal_growth: f64,
    pub cash_flows: Vec<f64>,
    pub present_values: Vec<f64>,
    pub terminal_value: f64,
    pub terminal_present_value: f64,
    pub enterprise_value: f64,
}

impl DcfValuation {
    /// EV − interest-bearing debt + cash
    pub fn equity_value(&self, latest: &FinancialStatement) -> f64 {
        let bs = &latest.balance_sheet;
        self.enterprise_value - bs.total_debt() + bs.cash + bs.short_term_investments
    }

    pub fn terminal_share(&self) -> f64 {
        if self.enterprise_value == 0.0 {
            return 0.0;
        }
        self.terminal_present_value / self.enterprise_value * 100.0
    }
}

/// Gordon-growth terminal value on the last projected flow, discounted with
/// the explicit flows. The discount rate must exceed the terminal growth.
pub fn discount_cash_flows(
    cash_flows: &[f64],
    discount_rate: f64,
    terminal_growth: f64,
) -> Result<DcfValuation, AnalysisError> {
    if discount_rate <= terminal_growth {
        return Err(AnalysisError::calculation("terminal growth ≥ discount rate"));
    }
    let last = *cash_flows
        .last()
        .ok_or_else(|| AnalysisError::input("no projected cash flows"))?;

    let pvs = present_values(discount_rate, cash_flows);
    let terminal_value = last * (1.0 + terminal_growth) / (discount_rate - terminal_growth);
    let terminal_present_value = terminal_value / (1.0 + discount_rate).powi(cash_flows.len() as i32);
    let enterprise_value = pvs.iter().sum::<f64>() + terminal_present_value;

    Ok(DcfValuation {
        discount_rate,
        terminal_growth,
        cash_flows: cash_flows.to_vec(),
        present_values: pvs,
        terminal_value,
        terminal_present_value,
        enterprise_value,
    })
}

/// The company's DCF at its WACC over the configured projection horizon
pub fn company_valuation(input: &CalculationInput<'_>) -> Result<DcfValuation, AnalysisError> {
    let latest = input.latest()?;
    let base = ProjectionBase::from_input(input)?;
    let flows = base.project(input.options.projection_years.max(1));
    discount_cash_flows(&flows, latest.wacc(input.options), input.options.terminal_growth_rate)
}

fn dcf_details(dcf: &DcfValuation, latest: &FinancialStatement) -> ValuationDetails {
    ValuationDetails {
        discount_rate: Some(dcf.discount_rate),
        terminal_value: Some(round2(dcf.terminal_value)),
        enterprise_value: Some(round2(dcf.enterprise_value)),
        equity_value: Some(round2(dcf.equity_value(latest))),
        present_values: dcf.present_values.iter().map(|v| round2(*v)).collect(),
        components: vec![
            NamedValue::new("terminal_growth", dcf.terminal_growth),
            NamedValue::new("terminal_present_value", round2(dcf.terminal_present_value)),
            NamedValue::new("total_debt", latest.balance_sheet.total_debt()),
            NamedValue::new("cash", latest.balance_sheet.cash + latest.balance_sheet.short_term_investments),
        ],
        ..Default::default()
    }
}

fn dcf_computation(value: f64, dcf: &DcfValuation, latest: &FinancialStatement) -> Computation {
    Computation::new(value, AnalysisDetails::Valuation(dcf_details(dcf, latest)))
        .observe(Observation::TerminalValueShare {
            percent: round2(dcf.terminal_share()),
        })
        .chart(ChartHint::Bar)
}

fn per_share(input: &CalculationInput<'_>, dcf: &DcfValuation) -> Result<(f64, f64), AnalysisError> {
    let latest = input.latest()?;
    let market = latest
        .market
        .as_ref()
        .filter(|m| m.shares_outstanding > 0.0 && m.share_price > 0.0)
        .ok_or_else(|| AnalysisError::input("per-share value needs share price and shares outstanding"))?;
    Ok((dcf.equity_value(latest) / market.shares_outstanding, market.share_price))
}

pub fn dcf_enterprise_value(input: &CalculationInput<'_>) -> CalcResult {
    let latest = input.latest()?;
    let dcf = company_valuation(input)?;
    // The business should be worth more than the capital tied up in it.
    let invested = latest.balance_sheet.invested_capital();
    Ok(dcf_computation(round2(dcf.enterprise_value), &dcf, latest).with_benchmark(Some(invested)))
}

pub fn dcf_equity_value(input: &CalculationInput<'_>) -> CalcResult {
    let latest = input.latest()?;
    let dcf = company_valuation(input)?;
    let value = round2(dcf.equity_value(latest));
    let mut computation = dcf_computation(value, &dcf, latest).with_benchmark(Some(latest.equity_value()));
    if value < 0.0 {
        computation = computation.observe(Observation::NegativeValue);
    }
    Ok(computation)
}

pub fn terminal_value(input: &CalculationInput<'_>) -> CalcResult {
    let latest = input.latest()?;
    let dcf = company_valuation(input)?;
    Ok(dcf_computation(round2(dcf.terminal_value), &dcf, latest).with_benchmark(Some(0.0)))
}

pub fn intrinsic_value_per_share(input: &CalculationInput<'_>) -> CalcResult {
    let latest = input.latest()?;
    let dcf = company_valuation(input)?;
    let (intrinsic, price) = per_share(input, &dcf)?;
    let gap = (intrinsic - price) / price * 100.0;

    Ok(dcf_computation(round2(intrinsic), &dcf, latest)
        .observe(Observation::PriceGap { percent: round2(gap) })
        .with_benchmark(Some(price)))
}

/// Intrinsic value over the market price, in percent
pub fn upside_potential(input: &CalculationInput<'_>) -> CalcResult {
    let latest = input.latest()?;
    let dcf = company_valuation(input)?;
    let (intrinsic, price) = per_share(input, &dcf)?;
    let upside = round2((intrinsic - price) / price * 100.0);

    Ok(dcf_computation(upside, &dcf, latest)
        .observe(Observation::PriceGap { percent: upside })
        .with_benchmark(Some(0.0)))
}

pub fn implied_ev_to_ebitda(input: &CalculationInput<'_>) -> CalcResult {
    let latest = input.latest()?;
    let ebitda = require_nonzero(latest.income_statement.ebitda(), "EBITDA")?;
    let dcf = company_valuation(input)?;
    Ok(dcf_computation(round2(dcf.enterprise_value / ebitda), &dcf, latest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::fixtures::{scaled_statement, Fixture};
    use analysis_core::AnalysisOptions;
    use approx::assert_relative_eq;

    #[test]
    fn test_discount_cash_flows() {
        let dcf = discount_cash_flows(&[100.0, 100.0], 0.10, 0.0).unwrap();
        // TV = 100 / 0.10 = 1,000 discounted two years
        assert_relative_eq!(dcf.terminal_value, 1_000.0, epsilon = 1e-9);
        assert_relative_eq!(dcf.enterprise_value, 90.909 + 82.645 + 826.446, epsilon = 1e-2);
    }

    #[test]
    fn test_terminal_growth_must_stay_below_rate() {
        let err = discount_cash_flows(&[100.0], 0.03, 0.03).unwrap_err();
        assert_eq!(err, AnalysisError::calculation("terminal growth ≥ discount rate"));

        let options = AnalysisOptions {
            terminal_growth_rate: 0.5,
            ..Default::default()
        };
        let fx = Fixture::new(vec![scaled_statement(2023, 1.0)]).with_options(options);
        assert!(matches!(dcf_enterprise_value(&fx.input()), Err(AnalysisError::Calculation(_))));
    }

    #[test]
    fn test_equity_bridge_and_per_share() {
        let fx = Fixture::new(vec![scaled_statement(2023, 1.0)]);
        let ev = dcf_enterprise_value(&fx.input()).unwrap().value;
        let equity = dcf_equity_value(&fx.input()).unwrap().value;
        // Debt 350,000 less cash 100,000
        assert_relative_eq!(ev - equity, 250_000.0, epsilon = 0.02);

        let per_share = intrinsic_value_per_share(&fx.input()).unwrap();
        assert_relative_eq!(per_share.value, round2(equity / 50_000.0), epsilon = 0.01);
        assert_eq!(per_share.benchmark, Some(20.0));
    }

    #[test]
    fn test_unlisted_company_has_no_per_share_value() {
        let mut s = scaled_statement(2023, 1.0);
        s.market = None;
        let fx = Fixture::new(vec![s]);
        assert!(matches!(upside_potential(&fx.input()), Err(AnalysisError::InputData(_))));
        assert!(dcf_equity_value(&fx.input()).is_ok());
    }
}
