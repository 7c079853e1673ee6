//! Cash flow analyses. Capital expenditures and dividends are signed negative
//! in the statements, so they enter ratios as absolute values.

use analysis_core::numeric::{pct_change, require_nonzero, round2};
use analysis_core::{
    AnalysisDetails, AnalysisError, CalculationInput, CashFlowDetails, ChartHint, Computation,
    FinancialStatement, NamedValue, Observation,
};

use crate::metric::{inventory_days, latest_growth, payable_days, ratio_of, receivable_days, Scale};
use crate::structural::cagr;

type CalcResult = Result<Computation, AnalysisError>;

fn amount_of<F>(input: &CalculationInput<'_>, f: F, components: Vec<NamedValue>) -> CalcResult
where
    F: Fn(&FinancialStatement) -> f64,
{
    let latest = input.latest()?;
    let value = round2(f(latest));
    let history = input.series(|s| round2(f(s)));

    let mut observations = Vec::new();
    if let Some(prev) = history.iter().rev().nth(1) {
        if prev.value != 0.0 {
            observations.push(Observation::Growth {
                percent: pct_change(prev.value, value),
            });
        }
    }
    if value < 0.0 {
        observations.push(Observation::NegativeValue);
    }

    Ok(Computation::new(
        value,
        AnalysisDetails::CashFlow(CashFlowDetails { components, history }),
    )
    .observe_all(observations)
    .with_benchmark(Some(0.0))
    .chart(ChartHint::Bar))
}

fn fcf(s: &FinancialStatement) -> f64 {
    s.cash_flow.free_cash_flow()
}

pub fn free_cash_flow(input: &CalculationInput<'_>) -> CalcResult {
    let latest = input.latest()?;
    amount_of(
        input,
        fcf,
        vec![
            NamedValue::new("operating_cash_flow", latest.cash_flow.operating_cash_flow),
            NamedValue::new("capital_expenditures", latest.cash_flow.capital_expenditures),
        ],
    )
}

pub fn fcf_margin(input: &CalculationInput<'_>) -> CalcResult {
    ratio_of(input, fcf, |s| s.income_statement.revenue, Scale::Percent)
}

pub fn ocf_margin(input: &CalculationInput<'_>) -> CalcResult {
    ratio_of(
        input,
        |s| s.cash_flow.operating_cash_flow,
        |s| s.income_statement.revenue,
        Scale::Percent,
    )
}

pub fn ocf_to_net_income(input: &CalculationInput<'_>) -> CalcResult {
    ratio_of(
        input,
        |s| s.cash_flow.operating_cash_flow,
        |s| s.income_statement.net_income,
        Scale::Times,
    )
}

pub fn cash_return_on_assets(input: &CalculationInput<'_>) -> CalcResult {
    ratio_of(
        input,
        |s| s.cash_flow.operating_cash_flow,
        |s| s.balance_sheet.total_assets,
        Scale::Percent,
    )
}

pub fn cash_return_on_equity(input: &CalculationInput<'_>) -> CalcResult {
    ratio_of(
        input,
        |s| s.cash_flow.operating_cash_flow,
        |s| s.balance_sheet.total_equity,
        Scale::Percent,
    )
}

pub fn ocf_to_total_debt(input: &CalculationInput<'_>) -> CalcResult {
    ratio_of(
        input,
        |s| s.cash_flow.operating_cash_flow,
        |s| s.balance_sheet.total_debt(),
        Scale::Times,
    )
}

pub fn capex_coverage(input: &CalculationInput<'_>) -> CalcResult {
    ratio_of(
        input,
        |s| s.cash_flow.operating_cash_flow,
        |s| s.cash_flow.capital_expenditures.abs(),
        Scale::Times,
    )
}

pub fn dividend_coverage(input: &CalculationInput<'_>) -> CalcResult {
    ratio_of(input, fcf, |s| s.cash_flow.dividends_paid.abs(), Scale::Times)
}

pub fn cash_flow_adequacy(input: &CalculationInput<'_>) -> CalcResult {
    ratio_of(
        input,
        |s| s.cash_flow.operating_cash_flow,
        |s| {
            s.cash_flow.capital_expenditures.abs()
                + s.cash_flow.dividends_paid.abs()
                + s.balance_sheet.short_term_debt
        },
        Scale::Times,
    )
    .map(|c| {
        if c.value < 1.0 {
            c.observe(Observation::BelowOne)
        } else {
            c
        }
    })
}

pub fn capex_to_revenue(input: &CalculationInput<'_>) -> CalcResult {
    ratio_of(
        input,
        |s| s.cash_flow.capital_expenditures.abs(),
        |s| s.income_statement.revenue,
        Scale::Percent,
    )
}

pub fn capex_to_depreciation(input: &CalculationInput<'_>) -> CalcResult {
    ratio_of(
        input,
        |s| s.cash_flow.capital_expenditures.abs(),
        |s| s.income_statement.depreciation_amortization,
        Scale::Times,
    )
}

/// DIO + DSO − DPO, each leg kept to 2 dp
pub fn cash_conversion_cycle(input: &CalculationInput<'_>) -> CalcResult {
    let latest = input.latest()?;
    require_nonzero(latest.income_statement.cost_of_goods_sold, "cost of goods sold")?;
    require_nonzero(latest.income_statement.revenue, "revenue")?;

    let days_in_year = input.options.days_in_year;
    let cycle = |s: &FinancialStatement| {
        round2(
            inventory_days(s, days_in_year) + receivable_days(s, days_in_year)
                - payable_days(s, days_in_year),
        )
    };

    let dio = inventory_days(latest, days_in_year);
    let dso = receivable_days(latest, days_in_year);
    let dpo = payable_days(latest, days_in_year);

    Ok(Computation::new(
        cycle(latest),
        AnalysisDetails::CashFlow(CashFlowDetails {
            components: vec![
                NamedValue::new("days_inventory_outstanding", dio),
                NamedValue::new("days_sales_outstanding", dso),
                NamedValue::new("days_payables_outstanding", dpo),
            ],
            history: input.series(cycle),
        }),
    )
    .chart(ChartHint::Bar))
}

pub fn net_cash_flow(input: &CalculationInput<'_>) -> CalcResult {
    let latest = input.latest()?;
    let cf = &latest.cash_flow;
    amount_of(
        input,
        |s| {
            s.cash_flow.operating_cash_flow
                + s.cash_flow.investing_cash_flow
                + s.cash_flow.financing_cash_flow
        },
        vec![
            NamedValue::new("operating", cf.operating_cash_flow),
            NamedValue::new("investing", cf.investing_cash_flow),
            NamedValue::new("financing", cf.financing_cash_flow),
        ],
    )
}

/// Free cash flow plus the year's net borrowing (change in interest-bearing
/// debt). The earliest year has no prior balance, so its net borrowing is 0.
pub fn fcf_to_equity(input: &CalculationInput<'_>) -> CalcResult {
    let latest = input.latest()?;
    let net_borrowing = input
        .previous()
        .map(|p| latest.balance_sheet.total_debt() - p.balance_sheet.total_debt())
        .unwrap_or(0.0);

    let fcfe: Vec<f64> = input
        .statements
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let borrowing = if i == 0 {
                0.0
            } else {
                s.balance_sheet.total_debt() - input.statements[i - 1].balance_sheet.total_debt()
            };
            fcf(s) + borrowing
        })
        .collect();
    let history = input
        .statements
        .iter()
        .zip(&fcfe)
        .map(|(s, v)| analysis_core::YearValue::new(s.fiscal_year, round2(*v)))
        .collect();

    let value = round2(fcf(latest) + net_borrowing);
    let mut computation = Computation::new(
        value,
        AnalysisDetails::CashFlow(CashFlowDetails {
            components: vec![
                NamedValue::new("free_cash_flow", fcf(latest)),
                NamedValue::new("net_borrowing", net_borrowing),
            ],
            history,
        }),
    )
    .with_benchmark(Some(0.0))
    .chart(ChartHint::Bar);
    if value < 0.0 {
        computation = computation.observe(Observation::NegativeValue);
    }
    Ok(computation)
}

pub fn ocf_growth(input: &CalculationInput<'_>) -> CalcResult {
    let growth = latest_growth(input, |s| s.cash_flow.operating_cash_flow)?;
    let history = input.series(|s| s.cash_flow.operating_cash_flow);
    Ok(Computation::new(
        growth,
        AnalysisDetails::CashFlow(CashFlowDetails {
            components: Vec::new(),
            history,
        }),
    )
    .observe(Observation::Growth { percent: growth })
    .chart(ChartHint::Line))
}

pub fn fcf_cagr(input: &CalculationInput<'_>) -> CalcResult {
    input.require_years(2)?;
    let history = input.series(fcf);
    let first = history.first().map(|p| p.value).unwrap_or(0.0);
    let last = history.last().map(|p| p.value).unwrap_or(0.0);
    let periods = history.len() - 1;
    let rate = cagr(first, last, periods).ok_or_else(|| {
        AnalysisError::input("free cash flow CAGR needs positive first and last values")
    })?;
    let value = round2(rate * 100.0);

    Ok(Computation::new(
        value,
        AnalysisDetails::CashFlow(CashFlowDetails {
            components: vec![NamedValue::new("first", first), NamedValue::new("last", last)],
            history,
        }),
    )
    .observe(Observation::CompoundGrowth { percent: value, years: periods })
    .chart(ChartHint::Line))
}

pub fn reinvestment_ratio(input: &CalculationInput<'_>) -> CalcResult {
    ratio_of(
        input,
        |s| s.cash_flow.capital_expenditures.abs(),
        |s| s.cash_flow.operating_cash_flow,
        Scale::Percent,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::fixtures::{growing_statements, scaled_statement, Fixture};
    use approx::assert_relative_eq;

    #[test]
    fn test_cash_conversion_cycle_scenario() {
        let mut s = FinancialStatement {
            fiscal_year: 2023,
            ..Default::default()
        };
        s.balance_sheet.inventory = 100.0;
        s.balance_sheet.accounts_receivable = 80.0;
        s.balance_sheet.accounts_payable = 120.0;
        s.income_statement.cost_of_goods_sold = 1000.0;
        s.income_statement.revenue = 1000.0;

        let fx = Fixture::new(vec![s]);
        let result = cash_conversion_cycle(&fx.input()).unwrap();
        assert_relative_eq!(result.value, 21.9, epsilon = 1e-9);
        match result.details {
            AnalysisDetails::CashFlow(d) => {
                assert_relative_eq!(d.components[0].value, 36.5);
                assert_relative_eq!(d.components[1].value, 29.2);
                assert_relative_eq!(d.components[2].value, 43.8);
            }
            other => panic!("unexpected details {:?}", other),
        }
    }

    #[test]
    fn test_free_cash_flow_sign_convention() {
        let fx = Fixture::new(vec![scaled_statement(2023, 1.0)]);
        // 250,000 + (−120,000)
        assert_eq!(free_cash_flow(&fx.input()).unwrap().value, 130_000.0);
        assert_eq!(capex_coverage(&fx.input()).unwrap().value, 2.08);
        assert_eq!(dividend_coverage(&fx.input()).unwrap().value, 2.6);
    }

    #[test]
    fn test_growth_metrics_on_growing_company() {
        let fx = Fixture::new(growing_statements());
        assert_relative_eq!(ocf_growth(&fx.input()).unwrap().value, 10.0);
        assert_relative_eq!(fcf_cagr(&fx.input()).unwrap().value, 10.0);

        // Debt grows with the business, so FCFE exceeds FCF
        let fcfe = fcf_to_equity(&fx.input()).unwrap().value;
        let fcf_latest = free_cash_flow(&fx.input()).unwrap().value;
        assert!(fcfe > fcf_latest);
    }

    #[test]
    fn test_negative_first_fcf_has_no_cagr() {
        let mut first = scaled_statement(2022, 1.0);
        first.cash_flow.capital_expenditures = -400_000.0;
        let fx = Fixture::new(vec![first, scaled_statement(2023, 1.0)]);
        assert!(matches!(fcf_cagr(&fx.input()), Err(AnalysisError::InputData(_))));
    }
}
