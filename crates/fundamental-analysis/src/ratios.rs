//! Liquidity, activity, leverage, profitability and market ratios.

use analysis_core::numeric::{require_nonzero, round2, whole_days};
use analysis_core::{
    AnalysisDetails, AnalysisError, CalculationInput, ChartHint, Computation, FinancialStatement,
    Observation, RatioDetails,
};

use crate::metric::{market_cap, market_data, ratio_of, share_price, shares_outstanding, Scale};

type CalcResult = Result<Computation, AnalysisError>;

fn below_one(computation: Computation) -> Computation {
    if computation.value < 1.0 {
        computation.observe(Observation::BelowOne)
    } else {
        computation
    }
}

// Liquidity

pub fn current_ratio(input: &CalculationInput<'_>) -> CalcResult {
    ratio_of(
        input,
        |s| s.balance_sheet.total_current_assets,
        |s| s.balance_sheet.total_current_liabilities,
        Scale::Times,
    )
    .map(below_one)
}

pub fn quick_ratio(input: &CalculationInput<'_>) -> CalcResult {
    ratio_of(
        input,
        |s| s.balance_sheet.quick_assets(),
        |s| s.balance_sheet.total_current_liabilities,
        Scale::Times,
    )
}

pub fn cash_ratio(input: &CalculationInput<'_>) -> CalcResult {
    ratio_of(
        input,
        |s| s.balance_sheet.cash + s.balance_sheet.short_term_investments,
        |s| s.balance_sheet.total_current_liabilities,
        Scale::Times,
    )
}

pub fn operating_cash_flow_ratio(input: &CalculationInput<'_>) -> CalcResult {
    ratio_of(
        input,
        |s| s.cash_flow.operating_cash_flow,
        |s| s.balance_sheet.total_current_liabilities,
        Scale::Times,
    )
}

pub fn working_capital(input: &CalculationInput<'_>) -> CalcResult {
    let latest = input.latest()?;
    let bs = &latest.balance_sheet;
    let value = round2(bs.working_capital());
    let history = input.series(|s| round2(s.balance_sheet.working_capital()));

    let mut computation = Computation::new(
        value,
        AnalysisDetails::Ratio(RatioDetails {
            numerator: bs.total_current_assets,
            denominator: bs.total_current_liabilities,
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

pub fn working_capital_to_assets(input: &CalculationInput<'_>) -> CalcResult {
    ratio_of(
        input,
        |s| s.balance_sheet.working_capital(),
        |s| s.balance_sheet.total_assets,
        Scale::Percent,
    )
}

/// Daily cash operating expenses: COGS plus operating expenses, excluding
/// non-cash depreciation
fn cash_operating_expenses(s: &FinancialStatement) -> f64 {
    s.income_statement.cost_of_goods_sold + s.income_statement.operating_expenses
        - s.income_statement.depreciation_amortization
}

pub fn defensive_interval_days(input: &CalculationInput<'_>) -> CalcResult {
    ratio_of(
        input,
        |s| s.balance_sheet.quick_assets(),
        cash_operating_expenses,
        Scale::Days,
    )
}

pub fn net_working_capital_ratio(input: &CalculationInput<'_>) -> CalcResult {
    ratio_of(
        input,
        |s| s.balance_sheet.working_capital(),
        |s| s.balance_sheet.total_current_liabilities,
        Scale::Times,
    )
}

// Activity

pub fn inventory_turnover(input: &CalculationInput<'_>) -> CalcResult {
    ratio_of(
        input,
        |s| s.income_statement.cost_of_goods_sold,
        |s| s.balance_sheet.inventory,
        Scale::Times,
    )
}

pub fn days_inventory(input: &CalculationInput<'_>) -> CalcResult {
    ratio_of(
        input,
        |s| s.balance_sheet.inventory,
        |s| s.income_statement.cost_of_goods_sold,
        Scale::Days,
    )
}

pub fn receivables_turnover(input: &CalculationInput<'_>) -> CalcResult {
    ratio_of(
        input,
        |s| s.income_statement.revenue,
        |s| s.balance_sheet.accounts_receivable,
        Scale::Times,
    )
}

pub fn days_sales_outstanding(input: &CalculationInput<'_>) -> CalcResult {
    ratio_of(
        input,
        |s| s.balance_sheet.accounts_receivable,
        |s| s.income_statement.revenue,
        Scale::Days,
    )
}

pub fn payables_turnover(input: &CalculationInput<'_>) -> CalcResult {
    ratio_of(
        input,
        |s| s.income_statement.cost_of_goods_sold,
        |s| s.balance_sheet.accounts_payable,
        Scale::Times,
    )
}

pub fn days_payables_outstanding(input: &CalculationInput<'_>) -> CalcResult {
    ratio_of(
        input,
        |s| s.balance_sheet.accounts_payable,
        |s| s.income_statement.cost_of_goods_sold,
        Scale::Days,
    )
}

pub fn asset_turnover(input: &CalculationInput<'_>) -> CalcResult {
    ratio_of(
        input,
        |s| s.income_statement.revenue,
        |s| s.balance_sheet.total_assets,
        Scale::Times,
    )
}

pub fn fixed_asset_turnover(input: &CalculationInput<'_>) -> CalcResult {
    ratio_of(
        input,
        |s| s.income_statement.revenue,
        |s| s.balance_sheet.property_plant_equipment,
        Scale::Times,
    )
}

pub fn current_asset_turnover(input: &CalculationInput<'_>) -> CalcResult {
    ratio_of(
        input,
        |s| s.income_statement.revenue,
        |s| s.balance_sheet.total_current_assets,
        Scale::Times,
    )
}

pub fn working_capital_turnover(input: &CalculationInput<'_>) -> CalcResult {
    ratio_of(
        input,
        |s| s.income_statement.revenue,
        |s| s.balance_sheet.working_capital(),
        Scale::Times,
    )
}

pub fn equity_turnover(input: &CalculationInput<'_>) -> CalcResult {
    ratio_of(
        input,
        |s| s.income_statement.revenue,
        |s| s.balance_sheet.total_equity,
        Scale::Times,
    )
}

pub fn operating_cycle(input: &CalculationInput<'_>) -> CalcResult {
    let latest = input.latest()?;
    let days_in_year = input.options.days_in_year;
    require_nonzero(latest.income_statement.cost_of_goods_sold, "cost of goods sold")?;
    require_nonzero(latest.income_statement.revenue, "revenue")?;

    let cycle = |s: &FinancialStatement| {
        whole_days(s.balance_sheet.inventory, s.income_statement.cost_of_goods_sold, days_in_year)
            + whole_days(s.balance_sheet.accounts_receivable, s.income_statement.revenue, days_in_year)
    };
    let inventory_days =
        whole_days(latest.balance_sheet.inventory, latest.income_statement.cost_of_goods_sold, days_in_year);
    let receivable_days =
        whole_days(latest.balance_sheet.accounts_receivable, latest.income_statement.revenue, days_in_year);

    Ok(Computation::new(
        cycle(latest),
        AnalysisDetails::Ratio(RatioDetails {
            numerator: inventory_days,
            denominator: receivable_days,
            history: input.series(cycle),
        }),
    )
    .chart(ChartHint::Bar))
}

// Leverage

pub fn debt_ratio(input: &CalculationInput<'_>) -> CalcResult {
    ratio_of(
        input,
        |s| s.balance_sheet.total_liabilities,
        |s| s.balance_sheet.total_assets,
        Scale::Percent,
    )
}

pub fn debt_to_equity(input: &CalculationInput<'_>) -> CalcResult {
    ratio_of(
        input,
        |s| s.balance_sheet.total_liabilities,
        |s| s.balance_sheet.total_equity,
        Scale::Times,
    )
    .map(|c| {
        let observation = if c.value > 2.0 {
            Observation::HighLeverage
        } else if c.value >= 0.0 && c.value < 0.5 {
            Observation::ConservativeLeverage
        } else {
            return c;
        };
        c.observe(observation)
    })
}

pub fn equity_ratio(input: &CalculationInput<'_>) -> CalcResult {
    ratio_of(
        input,
        |s| s.balance_sheet.total_equity,
        |s| s.balance_sheet.total_assets,
        Scale::Percent,
    )
}

pub fn equity_multiplier(input: &CalculationInput<'_>) -> CalcResult {
    ratio_of(
        input,
        |s| s.balance_sheet.total_assets,
        |s| s.balance_sheet.total_equity,
        Scale::Times,
    )
}

pub fn long_term_debt_to_capital(input: &CalculationInput<'_>) -> CalcResult {
    ratio_of(
        input,
        |s| s.balance_sheet.long_term_debt,
        |s| s.balance_sheet.long_term_debt + s.balance_sheet.total_equity,
        Scale::Percent,
    )
}

pub fn interest_coverage(input: &CalculationInput<'_>) -> CalcResult {
    ratio_of(
        input,
        |s| s.income_statement.operating_income,
        |s| s.income_statement.interest_expense,
        Scale::Times,
    )
    .map(below_one)
}

pub fn debt_service_coverage(input: &CalculationInput<'_>) -> CalcResult {
    ratio_of(
        input,
        |s| s.income_statement.ebitda(),
        |s| s.income_statement.interest_expense + s.balance_sheet.short_term_debt,
        Scale::Times,
    )
    .map(below_one)
}

pub fn cash_coverage(input: &CalculationInput<'_>) -> CalcResult {
    ratio_of(
        input,
        |s| s.income_statement.ebitda(),
        |s| s.income_statement.interest_expense,
        Scale::Times,
    )
    .map(below_one)
}

pub fn fixed_assets_to_equity(input: &CalculationInput<'_>) -> CalcResult {
    ratio_of(
        input,
        |s| s.balance_sheet.property_plant_equipment,
        |s| s.balance_sheet.total_equity,
        Scale::Times,
    )
}

pub fn current_liabilities_to_total_liabilities(input: &CalculationInput<'_>) -> CalcResult {
    ratio_of(
        input,
        |s| s.balance_sheet.total_current_liabilities,
        |s| s.balance_sheet.total_liabilities,
        Scale::Percent,
    )
}

pub fn net_debt_to_ebitda(input: &CalculationInput<'_>) -> CalcResult {
    ratio_of(
        input,
        |s| s.balance_sheet.net_debt(),
        |s| s.income_statement.ebitda(),
        Scale::Times,
    )
}

// Profitability

pub fn gross_profit_margin(input: &CalculationInput<'_>) -> CalcResult {
    ratio_of(
        input,
        |s| s.income_statement.gross_profit,
        |s| s.income_statement.revenue,
        Scale::Percent,
    )
}

pub fn operating_margin(input: &CalculationInput<'_>) -> CalcResult {
    ratio_of(
        input,
        |s| s.income_statement.operating_income,
        |s| s.income_statement.revenue,
        Scale::Percent,
    )
}

pub fn net_profit_margin(input: &CalculationInput<'_>) -> CalcResult {
    ratio_of(
        input,
        |s| s.income_statement.net_income,
        |s| s.income_statement.revenue,
        Scale::Percent,
    )
}

pub fn ebitda_margin(input: &CalculationInput<'_>) -> CalcResult {
    ratio_of(
        input,
        |s| s.income_statement.ebitda(),
        |s| s.income_statement.revenue,
        Scale::Percent,
    )
}

pub fn return_on_assets(input: &CalculationInput<'_>) -> CalcResult {
    ratio_of(
        input,
        |s| s.income_statement.net_income,
        |s| s.balance_sheet.total_assets,
        Scale::Percent,
    )
}

pub fn return_on_equity(input: &CalculationInput<'_>) -> CalcResult {
    ratio_of(
        input,
        |s| s.income_statement.net_income,
        |s| s.balance_sheet.total_equity,
        Scale::Percent,
    )
}

pub fn return_on_capital_employed(input: &CalculationInput<'_>) -> CalcResult {
    ratio_of(
        input,
        |s| s.income_statement.operating_income,
        |s| s.balance_sheet.capital_employed(),
        Scale::Percent,
    )
}

pub fn return_on_invested_capital(input: &CalculationInput<'_>) -> CalcResult {
    let tax_rate = input.options.tax_rate;
    ratio_of(
        input,
        |s| s.nopat(tax_rate),
        |s| s.balance_sheet.invested_capital(),
        Scale::Percent,
    )
}

pub fn pretax_margin(input: &CalculationInput<'_>) -> CalcResult {
    ratio_of(
        input,
        |s| s.income_statement.income_before_tax,
        |s| s.income_statement.revenue,
        Scale::Percent,
    )
}

pub fn effective_tax_rate(input: &CalculationInput<'_>) -> CalcResult {
    ratio_of(
        input,
        |s| s.income_statement.income_tax,
        |s| s.income_statement.income_before_tax,
        Scale::Percent,
    )
}

pub fn operating_expense_ratio(input: &CalculationInput<'_>) -> CalcResult {
    ratio_of(
        input,
        |s| s.income_statement.operating_expenses,
        |s| s.income_statement.revenue,
        Scale::Percent,
    )
}

pub fn basic_earnings_power(input: &CalculationInput<'_>) -> CalcResult {
    ratio_of(
        input,
        |s| s.income_statement.operating_income,
        |s| s.balance_sheet.total_assets,
        Scale::Percent,
    )
}

// Market

pub fn earnings_per_share(input: &CalculationInput<'_>) -> CalcResult {
    market_data(input)?;
    ratio_of(input, |s| s.income_statement.net_income, shares_outstanding, Scale::Times)
}

fn eps(s: &FinancialStatement) -> f64 {
    let shares = shares_outstanding(s);
    if shares > 0.0 {
        s.income_statement.net_income / shares
    } else {
        0.0
    }
}

pub fn price_to_earnings(input: &CalculationInput<'_>) -> CalcResult {
    market_data(input)?;
    ratio_of(input, share_price, eps, Scale::Times)
}

pub fn price_to_book(input: &CalculationInput<'_>) -> CalcResult {
    market_data(input)?;
    ratio_of(input, market_cap, |s| s.balance_sheet.total_equity, Scale::Times)
}

pub fn price_to_sales(input: &CalculationInput<'_>) -> CalcResult {
    market_data(input)?;
    ratio_of(input, market_cap, |s| s.income_statement.revenue, Scale::Times)
}

pub fn dividend_yield(input: &CalculationInput<'_>) -> CalcResult {
    market_data(input)?;
    ratio_of(
        input,
        |s| s.market.as_ref().map(|m| m.dividends_per_share).unwrap_or(0.0),
        share_price,
        Scale::Percent,
    )
}

pub fn dividend_payout(input: &CalculationInput<'_>) -> CalcResult {
    ratio_of(
        input,
        |s| s.cash_flow.dividends_paid.abs(),
        |s| s.income_statement.net_income,
        Scale::Percent,
    )
}

pub fn book_value_per_share(input: &CalculationInput<'_>) -> CalcResult {
    market_data(input)?;
    ratio_of(input, |s| s.balance_sheet.total_equity, shares_outstanding, Scale::Times)
}

pub fn earnings_yield(input: &CalculationInput<'_>) -> CalcResult {
    market_data(input)?;
    ratio_of(input, eps, share_price, Scale::Percent)
}

pub fn ev_to_ebitda(input: &CalculationInput<'_>) -> CalcResult {
    market_data(input)?;
    ratio_of(
        input,
        |s| market_cap(s) + s.balance_sheet.net_debt(),
        |s| s.income_statement.ebitda(),
        Scale::Times,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::fixtures::{scaled_statement, Fixture};
    use analysis_core::FinancialStatement;

    fn scenario_statement() -> FinancialStatement {
        let mut s = FinancialStatement {
            fiscal_year: 2023,
            ..Default::default()
        };
        s.balance_sheet.total_current_assets = 500_000.0;
        s.balance_sheet.total_current_liabilities = 250_000.0;
        s.income_statement.gross_profit = 400_000.0;
        s.income_statement.revenue = 1_000_000.0;
        s
    }

    #[test]
    fn test_current_ratio_and_gross_margin_scenario() {
        let fx = Fixture::new(vec![scenario_statement()]);
        assert_eq!(current_ratio(&fx.input()).unwrap().value, 2.00);
        assert_eq!(gross_profit_margin(&fx.input()).unwrap().value, 40.00);
    }

    #[test]
    fn test_zero_denominator_is_insufficient_data() {
        let fx = Fixture::new(vec![FinancialStatement {
            fiscal_year: 2023,
            ..Default::default()
        }]);
        assert!(matches!(current_ratio(&fx.input()), Err(AnalysisError::InputData(_))));
        assert!(matches!(days_inventory(&fx.input()), Err(AnalysisError::InputData(_))));
    }

    #[test]
    fn test_days_metrics_round_to_whole_days() {
        let fx = Fixture::new(vec![scaled_statement(2023, 1.0)]);
        // 100,000 / 600,000 × 365 = 60.83
        assert_eq!(days_inventory(&fx.input()).unwrap().value, 61.0);
        // 80,000 / 1,000,000 × 365 = 29.2
        assert_eq!(days_sales_outstanding(&fx.input()).unwrap().value, 29.0);
        assert_eq!(operating_cycle(&fx.input()).unwrap().value, 90.0);
    }

    #[test]
    fn test_leverage_observations() {
        let fx = Fixture::new(vec![scaled_statement(2023, 1.0)]);
        let de = debt_to_equity(&fx.input()).unwrap();
        assert_eq!(de.value, 0.86);
        assert!(de.observations.is_empty());

        let mut risky = scaled_statement(2023, 1.0);
        risky.balance_sheet.total_equity = 200_000.0;
        let fx = Fixture::new(vec![risky]);
        let de = debt_to_equity(&fx.input()).unwrap();
        assert_eq!(de.value, 3.0);
        assert!(de.observations.contains(&Observation::HighLeverage));
    }

    #[test]
    fn test_market_ratios_require_market_data() {
        let mut s = scaled_statement(2023, 1.0);
        let fx = Fixture::new(vec![s.clone()]);
        // EPS = 144,000 / 50,000
        assert_eq!(earnings_per_share(&fx.input()).unwrap().value, 2.88);
        assert_eq!(price_to_earnings(&fx.input()).unwrap().value, 6.94);

        s.market = None;
        let fx = Fixture::new(vec![s]);
        assert!(matches!(price_to_book(&fx.input()), Err(AnalysisError::InputData(_))));
    }

    #[test]
    fn test_history_tracks_every_year() {
        let fx = Fixture::new(vec![scaled_statement(2022, 1.0), scaled_statement(2023, 1.0)]);
        let result = return_on_equity(&fx.input()).unwrap();
        match result.details {
            AnalysisDetails::Ratio(d) => {
                assert_eq!(d.history.len(), 2);
                assert_eq!(d.history[0].year, 2022);
            }
            other => panic!("unexpected details {:?}", other),
        }
        assert!(result.observations.contains(&Observation::Stable));
    }
}
