//! Credit scoring, rating bands and the liquidity / solvency risk indices.

use analysis_core::numeric::{round2, safe_div};
use analysis_core::{
    AnalysisDetails, AnalysisError, CalculationInput, ChartHint, Computation, FinancialStatement,
    NamedValue, Observation, RiskDetails,
};
use serde::{Deserialize, Serialize};

/// Lowest investment-grade score (BBB)
pub const INVESTMENT_GRADE_SCORE: f64 = 60.0;
/// Default probability (%) of the lowest investment-grade band
pub const INVESTMENT_GRADE_PD: f64 = 0.18;
/// Neutral level of the 0-100 risk indices
pub const NEUTRAL_RISK_INDEX: f64 = 50.0;

/// Ordinal rating band, best first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CreditBand {
    AAA,
    AA,
    A,
    BBB,
    BB,
    B,
    CCC,
    C,
}

impl CreditBand {
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 90.0 => CreditBand::AAA,
            s if s >= 80.0 => CreditBand::AA,
            s if s >= 70.0 => CreditBand::A,
            s if s >= 60.0 => CreditBand::BBB,
            s if s >= 50.0 => CreditBand::BB,
            s if s >= 40.0 => CreditBand::B,
            s if s >= 30.0 => CreditBand::CCC,
            _ => CreditBand::C,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CreditBand::AAA => "AAA",
            CreditBand::AA => "AA",
            CreditBand::A => "A",
            CreditBand::BBB => "BBB",
            CreditBand::BB => "BB",
            CreditBand::B => "B",
            CreditBand::CCC => "CCC",
            CreditBand::C => "C",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        [
            CreditBand::AAA,
            CreditBand::AA,
            CreditBand::A,
            CreditBand::BBB,
            CreditBand::BB,
            CreditBand::B,
            CreditBand::CCC,
            CreditBand::C,
        ]
        .into_iter()
        .find(|band| band.as_str() == label)
    }

    /// One-year default probability in percent
    pub fn default_probability(&self) -> f64 {
        match self {
            CreditBand::AAA => 0.01,
            CreditBand::AA => 0.02,
            CreditBand::A => 0.06,
            CreditBand::BBB => 0.18,
            CreditBand::BB => 0.72,
            CreditBand::B => 3.6,
            CreditBand::CCC => 26.9,
            CreditBand::C => 50.0,
        }
    }

    /// Below investment grade
    pub fn is_speculative(&self) -> bool {
        *self > CreditBand::BBB
    }
}

/// Linear 0-100 score between a worst and a best value (either order)
fn normalize(value: f64, worst: f64, best: f64) -> f64 {
    if worst == best {
        return 0.0;
    }
    ((value - worst) / (best - worst) * 100.0).clamp(0.0, 100.0)
}

fn interest_coverage_score(s: &FinancialStatement) -> f64 {
    let is = &s.income_statement;
    if is.interest_expense <= 0.0 {
        return if is.operating_income > 0.0 { 100.0 } else { 0.0 };
    }
    normalize(is.operating_income / is.interest_expense, 1.0, 8.0)
}

fn debt_ratio_score(s: &FinancialStatement) -> f64 {
    normalize(
        safe_div(s.balance_sheet.total_liabilities, s.balance_sheet.total_assets),
        0.8,
        0.2,
    )
}

/// Equal-weighted normalized liquidity, leverage, coverage and profitability
#[derive(Debug, Clone, PartialEq)]
pub struct CreditScore {
    pub score: f64,
    pub band: CreditBand,
    pub components: Vec<NamedValue>,
}

pub fn credit_score(input: &CalculationInput<'_>) -> Result<CreditScore, AnalysisError> {
    let latest = input.latest()?;
    let bs = &latest.balance_sheet;
    if bs.total_assets <= 0.0 || bs.total_current_liabilities <= 0.0 {
        return Err(AnalysisError::input("credit scoring needs total assets and current liabilities"));
    }

    let weighted = [
        (
            "liquidity",
            0.25,
            normalize(bs.total_current_assets / bs.total_current_liabilities, 0.5, 2.0),
        ),
        ("leverage", 0.25, debt_ratio_score(latest)),
        ("coverage", 0.25, interest_coverage_score(latest)),
        (
            "profitability",
            0.25,
            normalize(latest.income_statement.net_income / bs.total_assets * 100.0, 0.0, 10.0),
        ),
    ];
    let score: f64 = weighted.iter().map(|(_, w, s)| w * s).sum();

    Ok(CreditScore {
        score,
        band: CreditBand::from_score(score),
        components: weighted
            .iter()
            .map(|(name, _, s)| NamedValue::new(*name, round2(*s)))
            .collect(),
    })
}

fn rating_details(credit: &CreditScore) -> RiskDetails {
    RiskDetails {
        score: Some(round2(credit.score)),
        band: Some(credit.band.as_str().to_string()),
        default_probability: Some(credit.band.default_probability()),
        components: credit.components.clone(),
        ..Default::default()
    }
}

fn band_observation(band: CreditBand) -> Observation {
    Observation::RatingBand {
        band: band.as_str().to_string(),
        default_probability: band.default_probability(),
    }
}

pub fn credit_rating_score(input: &CalculationInput<'_>) -> Result<Computation, AnalysisError> {
    let credit = credit_score(input)?;
    Ok(Computation::new(round2(credit.score), AnalysisDetails::Risk(rating_details(&credit)))
        .observe(band_observation(credit.band))
        .with_benchmark(input.reference_value().or(Some(INVESTMENT_GRADE_SCORE)))
        .chart(ChartHint::Gauge))
}

pub fn default_probability(input: &CalculationInput<'_>) -> Result<Computation, AnalysisError> {
    let credit = credit_score(input)?;
    Ok(Computation::new(
        credit.band.default_probability(),
        AnalysisDetails::Risk(rating_details(&credit)),
    )
    .observe(band_observation(credit.band))
    .with_benchmark(Some(INVESTMENT_GRADE_PD))
    .chart(ChartHint::Gauge))
}

fn risk_index(components: Vec<NamedValue>) -> Computation {
    let strength = components.iter().map(|c| c.value).sum::<f64>() / components.len().max(1) as f64;
    let index = round2(100.0 - strength);
    let details = RiskDetails {
        score: Some(index),
        components,
        ..Default::default()
    };
    Computation::new(index, AnalysisDetails::Risk(details))
        .with_benchmark(Some(NEUTRAL_RISK_INDEX))
        .chart(ChartHint::Gauge)
}

/// 100 − mean strength of the current, quick and cash ratios
pub fn liquidity_risk_index(input: &CalculationInput<'_>) -> Result<Computation, AnalysisError> {
    let bs = &input.latest()?.balance_sheet;
    if bs.total_current_liabilities <= 0.0 {
        return Err(AnalysisError::input("liquidity risk needs current liabilities"));
    }
    let cl = bs.total_current_liabilities;
    Ok(risk_index(vec![
        NamedValue::new("current_ratio", round2(normalize(bs.total_current_assets / cl, 0.5, 2.0))),
        NamedValue::new("quick_ratio", round2(normalize(bs.quick_assets() / cl, 0.3, 1.5))),
        NamedValue::new(
            "cash_ratio",
            round2(normalize((bs.cash + bs.short_term_investments) / cl, 0.0, 0.5)),
        ),
    ]))
}

/// 100 − mean strength of the debt ratio, interest coverage and net debt / EBITDA
pub fn solvency_risk_index(input: &CalculationInput<'_>) -> Result<Computation, AnalysisError> {
    let latest = input.latest()?;
    if latest.balance_sheet.total_assets <= 0.0 {
        return Err(AnalysisError::input("solvency risk needs total assets"));
    }
    let net_debt = latest.balance_sheet.net_debt();
    let ebitda = latest.income_statement.ebitda();
    let net_debt_score = if net_debt <= 0.0 {
        100.0
    } else if ebitda <= 0.0 {
        0.0
    } else {
        normalize(net_debt / ebitda, 5.0, 0.0)
    };
    Ok(risk_index(vec![
        NamedValue::new("debt_ratio", round2(debt_ratio_score(latest))),
        NamedValue::new("interest_coverage", round2(interest_coverage_score(latest))),
        NamedValue::new("net_debt_to_ebitda", round2(net_debt_score)),
    ]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::fixtures::{scaled_statement, Fixture};
    use approx::assert_relative_eq;

    #[test]
    fn test_band_boundaries() {
        assert_eq!(CreditBand::from_score(90.0), CreditBand::AAA);
        assert_eq!(CreditBand::from_score(89.99), CreditBand::AA);
        assert_eq!(CreditBand::from_score(60.0), CreditBand::BBB);
        assert_eq!(CreditBand::from_score(0.0), CreditBand::C);
        assert!(!CreditBand::BBB.is_speculative());
        assert!(CreditBand::BB.is_speculative());
        assert_eq!(CreditBand::from_label("CCC"), Some(CreditBand::CCC));
        assert_eq!(CreditBand::from_label("D"), None);
    }

    #[test]
    fn test_credit_score_on_sample() {
        // liquidity 100, leverage 56.41, coverage 100, profitability 100
        let fx = Fixture::new(vec![scaled_statement(2023, 1.0)]);
        let result = credit_rating_score(&fx.input()).unwrap();
        assert_relative_eq!(result.value, 89.10);
        assert_eq!(
            result.observations,
            vec![Observation::RatingBand { band: "AA".to_string(), default_probability: 0.02 }]
        );
        assert_eq!(default_probability(&fx.input()).unwrap().value, 0.02);
    }

    #[test]
    fn test_weak_balance_sheet_is_speculative() {
        let mut s = scaled_statement(2023, 1.0);
        s.balance_sheet.total_current_assets = 200_000.0;
        s.balance_sheet.total_liabilities = 1_100_000.0;
        s.income_statement.net_income = -10_000.0;
        s.income_statement.operating_income = 15_000.0;
        let fx = Fixture::new(vec![s]);
        let credit = credit_score(&fx.input()).unwrap();
        assert!(credit.band.is_speculative());
    }

    #[test]
    fn test_risk_indices_on_sample() {
        let fx = Fixture::new(vec![scaled_statement(2023, 1.0)]);
        // strengths 100, 35, 80
        assert_relative_eq!(liquidity_risk_index(&fx.input()).unwrap().value, 28.33);
        // strengths 56.41, 100, 80
        assert_relative_eq!(solvency_risk_index(&fx.input()).unwrap().value, 21.2);
    }
}
