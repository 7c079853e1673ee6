//! Performance decomposition: DuPont, growth capacity, leverage degrees,
//! break-even and value-creation spreads.

use analysis_core::numeric::{pct_change, require_nonzero, round2, safe_div};
use analysis_core::{
    AnalysisDetails, AnalysisError, CalculationInput, ChartHint, Computation, FinancialStatement,
    NamedValue, Observation, RiskDetails, StructuralDetails,
};

use crate::metric::{latest_growth, ratio_of, Scale};

type CalcResult = Result<Computation, AnalysisError>;

fn decomposition(value: f64, history: Vec<analysis_core::YearValue>, components: Vec<NamedValue>) -> Computation {
    let chart = if history.len() > 1 { ChartHint::Line } else { ChartHint::Bar };
    let details = StructuralDetails {
        series: history,
        base_year: None,
        periods: None,
        components,
    };
    let computation = Computation::new(value, AnalysisDetails::Structural(details)).chart(chart);
    if value < 0.0 {
        computation.observe(Observation::NegativeValue)
    } else {
        computation
    }
}

/// Share of net income kept in the business
fn retention(s: &FinancialStatement) -> f64 {
    1.0 - safe_div(s.cash_flow.dividends_paid.abs(), s.income_statement.net_income)
}

fn three_step(s: &FinancialStatement) -> [f64; 3] {
    let is = &s.income_statement;
    let bs = &s.balance_sheet;
    [
        safe_div(is.net_income, is.revenue),
        safe_div(is.revenue, bs.total_assets),
        safe_div(bs.total_assets, bs.total_equity),
    ]
}

fn five_step(s: &FinancialStatement) -> [f64; 5] {
    let is = &s.income_statement;
    let bs = &s.balance_sheet;
    [
        safe_div(is.net_income, is.income_before_tax),
        safe_div(is.income_before_tax, is.operating_income),
        safe_div(is.operating_income, is.revenue),
        safe_div(is.revenue, bs.total_assets),
        safe_div(bs.total_assets, bs.total_equity),
    ]
}

pub fn dupont_three_step(input: &CalculationInput<'_>) -> CalcResult {
    let latest = input.latest()?;
    require_nonzero(latest.income_statement.revenue, "revenue")?;
    require_nonzero(latest.balance_sheet.total_assets, "total assets")?;
    require_nonzero(latest.balance_sheet.total_equity, "equity")?;

    let roe = |s: &FinancialStatement| round2(three_step(s).iter().product::<f64>() * 100.0);
    let [margin, turnover, multiplier] = three_step(latest);
    Ok(decomposition(
        roe(latest),
        input.series(roe),
        vec![
            NamedValue::new("net_margin", round2(margin * 100.0)),
            NamedValue::new("asset_turnover", round2(turnover)),
            NamedValue::new("equity_multiplier", round2(multiplier)),
        ],
    ))
}

pub fn dupont_five_step(input: &CalculationInput<'_>) -> CalcResult {
    let latest = input.latest()?;
    let is = &latest.income_statement;
    require_nonzero(is.revenue, "revenue")?;
    require_nonzero(is.income_before_tax, "income before tax")?;
    require_nonzero(is.operating_income, "operating income")?;
    require_nonzero(latest.balance_sheet.total_assets, "total assets")?;
    require_nonzero(latest.balance_sheet.total_equity, "equity")?;

    let roe = |s: &FinancialStatement| round2(five_step(s).iter().product::<f64>() * 100.0);
    let [tax, interest, operating, turnover, multiplier] = five_step(latest);
    Ok(decomposition(
        roe(latest),
        input.series(roe),
        vec![
            NamedValue::new("tax_burden", round2(tax)),
            NamedValue::new("interest_burden", round2(interest)),
            NamedValue::new("operating_margin", round2(operating * 100.0)),
            NamedValue::new("asset_turnover", round2(turnover)),
            NamedValue::new("equity_multiplier", round2(multiplier)),
        ],
    ))
}

pub fn tax_burden(input: &CalculationInput<'_>) -> CalcResult {
    ratio_of(
        input,
        |s| s.income_statement.net_income,
        |s| s.income_statement.income_before_tax,
        Scale::Times,
    )
}

pub fn interest_burden(input: &CalculationInput<'_>) -> CalcResult {
    ratio_of(
        input,
        |s| s.income_statement.income_before_tax,
        |s| s.income_statement.operating_income,
        Scale::Times,
    )
}

/// ROE × retention ratio
pub fn sustainable_growth(input: &CalculationInput<'_>) -> CalcResult {
    let latest = input.latest()?;
    require_nonzero(latest.income_statement.net_income, "net income")?;
    require_nonzero(latest.balance_sheet.total_equity, "equity")?;

    let rate = |s: &FinancialStatement| {
        round2(safe_div(s.income_statement.net_income, s.balance_sheet.total_equity) * retention(s) * 100.0)
    };
    Ok(decomposition(
        rate(latest),
        input.series(rate),
        vec![
            NamedValue::new(
                "roe",
                round2(safe_div(latest.income_statement.net_income, latest.balance_sheet.total_equity) * 100.0),
            ),
            NamedValue::new("retention_ratio", round2(retention(latest))),
        ],
    ))
}

/// ROA·b / (1 − ROA·b)
pub fn internal_growth(input: &CalculationInput<'_>) -> CalcResult {
    let latest = input.latest()?;
    require_nonzero(latest.income_statement.net_income, "net income")?;
    require_nonzero(latest.balance_sheet.total_assets, "total assets")?;

    let rate = |s: &FinancialStatement| {
        let retained_return = safe_div(s.income_statement.net_income, s.balance_sheet.total_assets) * retention(s);
        round2(safe_div(retained_return, 1.0 - retained_return) * 100.0)
    };
    Ok(decomposition(
        rate(latest),
        input.series(rate),
        vec![
            NamedValue::new(
                "roa",
                round2(safe_div(latest.income_statement.net_income, latest.balance_sheet.total_assets) * 100.0),
            ),
            NamedValue::new("retention_ratio", round2(retention(latest))),
        ],
    ))
}

fn operating_leverage(input: &CalculationInput<'_>) -> Result<(f64, f64, f64), AnalysisError> {
    let revenue_growth = latest_growth(input, |s| s.income_statement.revenue)?;
    let ebit_growth = latest_growth(input, |s| s.income_statement.operating_income)?;
    if revenue_growth == 0.0 {
        return Err(AnalysisError::input("revenue did not change, operating leverage is undefined"));
    }
    Ok((ebit_growth / revenue_growth, ebit_growth, revenue_growth))
}

fn financial_leverage(s: &FinancialStatement) -> Result<f64, AnalysisError> {
    let ebit = s.income_statement.operating_income;
    let cushion = ebit - s.income_statement.interest_expense;
    require_nonzero(cushion, "operating income after interest")?;
    Ok(ebit / cushion)
}

/// %ΔEBIT / %ΔRevenue between the two latest years
pub fn degree_operating_leverage(input: &CalculationInput<'_>) -> CalcResult {
    let (dol, ebit_growth, revenue_growth) = operating_leverage(input)?;
    Ok(decomposition(
        round2(dol),
        Vec::new(),
        vec![
            NamedValue::new("operating_income_growth", ebit_growth),
            NamedValue::new("revenue_growth", revenue_growth),
        ],
    ))
}

/// EBIT / (EBIT − interest)
pub fn degree_financial_leverage(input: &CalculationInput<'_>) -> CalcResult {
    let latest = input.latest()?;
    let dfl = financial_leverage(latest)?;
    let history = input
        .statements
        .iter()
        .map(|s| {
            analysis_core::YearValue::new(s.fiscal_year, financial_leverage(s).map(round2).unwrap_or(0.0))
        })
        .collect();
    Ok(decomposition(
        round2(dfl),
        history,
        vec![
            NamedValue::new("operating_income", latest.income_statement.operating_income),
            NamedValue::new("interest_expense", latest.income_statement.interest_expense),
        ],
    ))
}

pub fn degree_combined_leverage(input: &CalculationInput<'_>) -> CalcResult {
    let (dol, _, _) = operating_leverage(input)?;
    let dfl = financial_leverage(input.latest()?)?;
    Ok(decomposition(
        round2(dol * dfl),
        Vec::new(),
        vec![
            NamedValue::new("operating_leverage", round2(dol)),
            NamedValue::new("financial_leverage", round2(dfl)),
        ],
    ))
}

/// Operating expenses are the fixed-cost base and the gross margin the
/// contribution margin.
fn break_even(s: &FinancialStatement) -> Result<f64, AnalysisError> {
    let is = &s.income_statement;
    require_nonzero(is.revenue, "revenue")?;
    let contribution = is.gross_profit / is.revenue;
    if contribution <= 0.0 {
        return Err(AnalysisError::input("break-even needs a positive gross margin"));
    }
    Ok(is.operating_expenses / contribution)
}

pub fn break_even_revenue(input: &CalculationInput<'_>) -> CalcResult {
    let latest = input.latest()?;
    let revenue = latest.income_statement.revenue;
    let value = round2(break_even(latest)?);
    Ok(decomposition(
        value,
        Vec::new(),
        vec![
            NamedValue::new("fixed_costs", latest.income_statement.operating_expenses),
            NamedValue::new(
                "contribution_margin_ratio",
                round2(safe_div(latest.income_statement.gross_profit, revenue) * 100.0),
            ),
            NamedValue::new("revenue", revenue),
        ],
    )
    // Current revenue is the level break-even has to stay below.
    .with_benchmark(Some(revenue)))
}

pub fn margin_of_safety(input: &CalculationInput<'_>) -> CalcResult {
    let latest = input.latest()?;
    let revenue = latest.income_statement.revenue;
    let be = break_even(latest)?;
    let value = round2((revenue - be) / revenue * 100.0);
    Ok(decomposition(
        value,
        Vec::new(),
        vec![
            NamedValue::new("revenue", revenue),
            NamedValue::new("break_even_revenue", round2(be)),
        ],
    ))
}

/// Return on invested capital minus WACC, in percentage points
pub fn roic_wacc_spread(input: &CalculationInput<'_>) -> CalcResult {
    let latest = input.latest()?;
    let invested = require_nonzero(latest.balance_sheet.invested_capital(), "invested capital")?;
    let roic = latest.nopat(input.options.tax_rate) / invested * 100.0;
    let wacc = latest.wacc(input.options) * 100.0;
    let spread = round2(roic - wacc);

    let observation = if spread >= 0.0 {
        Observation::ValueCreated {
            amount: round2(spread / 100.0 * invested),
        }
    } else {
        Observation::ValueDestroyed {
            amount: round2(-spread / 100.0 * invested),
        }
    };
    Ok(decomposition(
        spread,
        Vec::new(),
        vec![
            NamedValue::new("roic", round2(roic)),
            NamedValue::new("wacc", round2(wacc)),
        ],
    )
    .observe(observation)
    .with_benchmark(Some(0.0)))
}

pub fn profit_growth_gap(input: &CalculationInput<'_>) -> CalcResult {
    let income_growth = latest_growth(input, |s| s.income_statement.net_income)?;
    let revenue_growth = latest_growth(input, |s| s.income_statement.revenue)?;
    Ok(decomposition(
        round2(income_growth - revenue_growth),
        Vec::new(),
        vec![
            NamedValue::new("net_income_growth", income_growth),
            NamedValue::new("revenue_growth", revenue_growth),
        ],
    )
    .with_benchmark(Some(0.0)))
}

/// Revenue growth per point of asset growth; 1 means sales keep pace with the
/// asset base.
pub fn asset_growth_efficiency(input: &CalculationInput<'_>) -> CalcResult {
    let revenue_growth = latest_growth(input, |s| s.income_statement.revenue)?;
    let asset_growth = latest_growth(input, |s| s.balance_sheet.total_assets)?;
    if asset_growth == 0.0 {
        return Err(AnalysisError::input("total assets did not change"));
    }
    let latest = input.latest()?;
    let previous = input.previous();
    let computation = decomposition(
        round2(revenue_growth / asset_growth),
        Vec::new(),
        vec![
            NamedValue::new("revenue_growth", revenue_growth),
            NamedValue::new("asset_growth", asset_growth),
        ],
    )
    .with_benchmark(Some(1.0));
    match previous {
        Some(p) => Ok(computation.observe(Observation::Growth {
            percent: pct_change(p.balance_sheet.total_assets, latest.balance_sheet.total_assets),
        })),
        None => Ok(computation),
    }
}

const PILLAR_WEIGHT: f64 = 25.0;
const TARGET_ROE: f64 = 0.15;
const TARGET_ASSET_TURNOVER: f64 = 1.0;
const TARGET_CURRENT_RATIO: f64 = 1.5;
const TARGET_DEBT_TO_EQUITY: f64 = 1.0;

fn pillar(achieved: f64, target: f64) -> f64 {
    (safe_div(achieved, target)).clamp(0.0, 1.0) * PILLAR_WEIGHT
}

/// Four equally weighted pillars (profitability, efficiency, liquidity,
/// solvency), each scored against a target and capped at 25.
pub fn performance_scorecard(input: &CalculationInput<'_>) -> CalcResult {
    let latest = input.latest()?;
    let bs = &latest.balance_sheet;
    let is = &latest.income_statement;
    require_nonzero(bs.total_equity, "equity")?;
    require_nonzero(bs.total_assets, "total assets")?;

    let profitability = pillar(is.net_income / bs.total_equity, TARGET_ROE);
    let efficiency = pillar(is.revenue / bs.total_assets, TARGET_ASSET_TURNOVER);
    let liquidity = pillar(
        safe_div(bs.total_current_assets, bs.total_current_liabilities),
        TARGET_CURRENT_RATIO,
    );
    let debt_to_equity = bs.total_liabilities / bs.total_equity;
    let solvency = if bs.total_equity < 0.0 {
        0.0
    } else if debt_to_equity <= TARGET_DEBT_TO_EQUITY {
        PILLAR_WEIGHT
    } else {
        pillar(TARGET_DEBT_TO_EQUITY, debt_to_equity)
    };
    let score = round2(profitability + efficiency + liquidity + solvency);

    let details = RiskDetails {
        score: Some(score),
        components: vec![
            NamedValue::new("profitability", round2(profitability)),
            NamedValue::new("efficiency", round2(efficiency)),
            NamedValue::new("liquidity", round2(liquidity)),
            NamedValue::new("solvency", round2(solvency)),
        ],
        ..Default::default()
    };
    Ok(Computation::new(score, AnalysisDetails::Risk(details)).chart(ChartHint::Gauge))
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::fixtures::{growing_statements, scaled_statement, Fixture};
    use approx::assert_relative_eq;

    fn single() -> Fixture {
        Fixture::new(vec![scaled_statement(2023, 1.0)])
    }

    #[test]
    fn test_dupont_variants_agree_with_roe() {
        let fx = single();
        // 144,000 / 700,000
        assert_relative_eq!(dupont_three_step(&fx.input()).unwrap().value, 20.57);
        assert_relative_eq!(dupont_five_step(&fx.input()).unwrap().value, 20.57);
        assert_relative_eq!(tax_burden(&fx.input()).unwrap().value, 0.8);
        assert_relative_eq!(interest_burden(&fx.input()).unwrap().value, 0.9);
    }

    #[test]
    fn test_growth_capacity() {
        let fx = single();
        assert_relative_eq!(sustainable_growth(&fx.input()).unwrap().value, 13.43);
        assert_relative_eq!(internal_growth(&fx.input()).unwrap().value, 7.79);
    }

    #[test]
    fn test_leverage_degrees() {
        let fx = Fixture::new(growing_statements());
        // EBIT and revenue both grow 10%
        assert_relative_eq!(degree_operating_leverage(&fx.input()).unwrap().value, 1.0);

        let fx = single();
        assert_relative_eq!(degree_financial_leverage(&fx.input()).unwrap().value, 1.11);
        assert!(matches!(
            degree_combined_leverage(&fx.input()),
            Err(AnalysisError::InputData(_))
        ));
    }

    #[test]
    fn test_break_even_and_margin_of_safety() {
        let fx = single();
        let be = break_even_revenue(&fx.input()).unwrap();
        assert_relative_eq!(be.value, 500_000.0);
        assert_eq!(be.benchmark, Some(1_000_000.0));
        assert_relative_eq!(margin_of_safety(&fx.input()).unwrap().value, 50.0);
    }

    #[test]
    fn test_roic_wacc_spread() {
        // ROIC 160,000 / 1,050,000 = 15.24%; WACC 8.86%
        let result = roic_wacc_spread(&single().input()).unwrap();
        assert_relative_eq!(result.value, 6.38);
        assert!(matches!(result.observations[0], Observation::ValueCreated { .. }));
    }

    #[test]
    fn test_scorecard_pillars() {
        // Only asset turnover (0.77 vs 1.0) misses its target
        assert_relative_eq!(performance_scorecard(&single().input()).unwrap().value, 94.23);
    }

    #[test]
    fn test_asset_growth_efficiency_in_step() {
        let fx = Fixture::new(growing_statements());
        assert_relative_eq!(asset_growth_efficiency(&fx.input()).unwrap().value, 1.0);
        // Fixed interest lets net income outgrow revenue: 177,600 → 196,960 is
        // 10.90% vs 10%
        assert_relative_eq!(profit_growth_gap(&fx.input()).unwrap().value, 0.9);
    }
}
