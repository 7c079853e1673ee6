//! Bankruptcy prediction models: Altman Z and Z'', Springate S, Zmijewski.

use analysis_core::numeric::{round2, safe_div};
use analysis_core::{
    AnalysisDetails, AnalysisError, CalculationInput, ChartHint, Computation, FinancialStatement,
    NamedValue, Observation, RiskDetails, RiskZone,
};

pub const ALTMAN_SAFE: f64 = 2.99;
pub const ALTMAN_DISTRESS: f64 = 1.81;
pub const ALTMAN_DOUBLE_PRIME_SAFE: f64 = 2.60;
pub const ALTMAN_DOUBLE_PRIME_DISTRESS: f64 = 1.10;
pub const SPRINGATE_DISTRESS: f64 = 0.862;
/// Zmijewski probability (%) above which the company is classed as distressed
pub const ZMIJEWSKI_DISTRESS: f64 = 50.0;

/// Working capital, retained earnings and EBIT scaled by total assets
struct AltmanRatios {
    x1: f64,
    x2: f64,
    x3: f64,
}

fn total_assets(s: &FinancialStatement) -> Result<f64, AnalysisError> {
    let ta = s.balance_sheet.total_assets;
    if ta <= 0.0 {
        return Err(AnalysisError::input("distress models need positive total assets"));
    }
    Ok(ta)
}

fn altman_ratios(s: &FinancialStatement) -> Result<AltmanRatios, AnalysisError> {
    let ta = total_assets(s)?;
    Ok(AltmanRatios {
        x1: s.balance_sheet.working_capital() / ta,
        x2: s.balance_sheet.retained_earnings / ta,
        x3: s.income_statement.operating_income / ta,
    })
}

fn zone(score: f64, safe: f64, distress: f64) -> RiskZone {
    if score > safe {
        RiskZone::Safe
    } else if score >= distress {
        RiskZone::Grey
    } else {
        RiskZone::Distress
    }
}

fn distress_computation(
    score: f64,
    zone: RiskZone,
    components: Vec<NamedValue>,
    benchmark: f64,
) -> Computation {
    let details = RiskDetails {
        score: Some(score),
        zone: Some(zone),
        components,
        ..Default::default()
    };
    Computation::new(score, AnalysisDetails::Risk(details))
        .observe(Observation::DistressZone { zone })
        .with_benchmark(Some(benchmark))
        .chart(ChartHint::Gauge)
}

/// 1.2 X1 + 1.4 X2 + 3.3 X3 + 0.6 X4 + 1.0 X5, with X4 on market equity
/// when listed and book equity otherwise
pub fn altman_z_score(input: &CalculationInput<'_>) -> Result<Computation, AnalysisError> {
    let latest = input.latest()?;
    let r = altman_ratios(latest)?;
    let ta = total_assets(latest)?;
    let liabilities = latest.balance_sheet.total_liabilities;
    if liabilities <= 0.0 {
        return Err(AnalysisError::input("Altman Z needs total liabilities"));
    }
    let x4 = latest.equity_value() / liabilities;
    let x5 = latest.income_statement.revenue / ta;
    let z = round2(1.2 * r.x1 + 1.4 * r.x2 + 3.3 * r.x3 + 0.6 * x4 + x5);

    Ok(distress_computation(
        z,
        zone(z, ALTMAN_SAFE, ALTMAN_DISTRESS),
        vec![
            NamedValue::new("x1", round2(r.x1)),
            NamedValue::new("x2", round2(r.x2)),
            NamedValue::new("x3", round2(r.x3)),
            NamedValue::new("x4", round2(x4)),
            NamedValue::new("x5", round2(x5)),
        ],
        ALTMAN_SAFE,
    ))
}

/// Non-manufacturing variant: 6.56 X1 + 3.26 X2 + 6.72 X3 + 1.05 X4 (book equity)
pub fn altman_z_double_prime(input: &CalculationInput<'_>) -> Result<Computation, AnalysisError> {
    let latest = input.latest()?;
    let r = altman_ratios(latest)?;
    let liabilities = latest.balance_sheet.total_liabilities;
    if liabilities <= 0.0 {
        return Err(AnalysisError::input("Altman Z'' needs total liabilities"));
    }
    let x4 = latest.balance_sheet.total_equity / liabilities;
    let z = round2(6.56 * r.x1 + 3.26 * r.x2 + 6.72 * r.x3 + 1.05 * x4);

    Ok(distress_computation(
        z,
        zone(z, ALTMAN_DOUBLE_PRIME_SAFE, ALTMAN_DOUBLE_PRIME_DISTRESS),
        vec![
            NamedValue::new("x1", round2(r.x1)),
            NamedValue::new("x2", round2(r.x2)),
            NamedValue::new("x3", round2(r.x3)),
            NamedValue::new("x4", round2(x4)),
        ],
        ALTMAN_DOUBLE_PRIME_SAFE,
    ))
}

/// 1.03 A + 3.07 B + 0.66 C + 0.4 D, distressed below 0.862
pub fn springate_s_score(input: &CalculationInput<'_>) -> Result<Computation, AnalysisError> {
    let latest = input.latest()?;
    let ta = total_assets(latest)?;
    let bs = &latest.balance_sheet;
    let is = &latest.income_statement;

    let a = bs.working_capital() / ta;
    let b = is.operating_income / ta;
    let c = safe_div(is.income_before_tax, bs.total_current_liabilities);
    let d = is.revenue / ta;
    let s = round2(1.03 * a + 3.07 * b + 0.66 * c + 0.4 * d);
    let zone = if s < SPRINGATE_DISTRESS { RiskZone::Distress } else { RiskZone::Safe };

    Ok(distress_computation(
        s,
        zone,
        vec![
            NamedValue::new("a", round2(a)),
            NamedValue::new("b", round2(b)),
            NamedValue::new("c", round2(c)),
            NamedValue::new("d", round2(d)),
        ],
        SPRINGATE_DISTRESS,
    ))
}

/// Logistic distress probability (%) from
/// X = −4.336 − 4.513 NI/TA + 5.679 TL/TA + 0.004 CA/CL
pub fn zmijewski_score(input: &CalculationInput<'_>) -> Result<Computation, AnalysisError> {
    let latest = input.latest()?;
    let ta = total_assets(latest)?;
    let bs = &latest.balance_sheet;

    let roa = latest.income_statement.net_income / ta;
    let leverage = bs.total_liabilities / ta;
    let liquidity = safe_div(bs.total_current_assets, bs.total_current_liabilities);
    let x = -4.336 - 4.513 * roa + 5.679 * leverage + 0.004 * liquidity;
    let probability = round2(100.0 / (1.0 + (-x).exp()));
    let zone = if probability > ZMIJEWSKI_DISTRESS { RiskZone::Distress } else { RiskZone::Safe };

    let details = RiskDetails {
        score: Some(round2(x)),
        zone: Some(zone),
        default_probability: Some(probability),
        components: vec![
            NamedValue::new("net_income_to_assets", round2(roa)),
            NamedValue::new("liabilities_to_assets", round2(leverage)),
            NamedValue::new("current_ratio", round2(liquidity)),
        ],
        ..Default::default()
    };
    Ok(Computation::new(probability, AnalysisDetails::Risk(details))
        .observe(Observation::DistressZone { zone })
        .with_benchmark(Some(ZMIJEWSKI_DISTRESS))
        .chart(ChartHint::Gauge))
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::fixtures::{scaled_statement, Fixture};
    use approx::assert_relative_eq;

    fn sample() -> Fixture {
        Fixture::new(vec![scaled_statement(2023, 1.0)])
    }

    #[test]
    fn test_altman_z_grey_zone() {
        let result = altman_z_score(&sample().input()).unwrap();
        assert_relative_eq!(result.value, 2.94);
        assert_eq!(result.observations, vec![Observation::DistressZone { zone: RiskZone::Grey }]);
    }

    #[test]
    fn test_altman_double_prime_safe() {
        let result = altman_z_double_prime(&sample().input()).unwrap();
        assert_relative_eq!(result.value, 4.52);
        assert_eq!(result.observations, vec![Observation::DistressZone { zone: RiskZone::Safe }]);
    }

    #[test]
    fn test_springate() {
        let result = springate_s_score(&sample().input()).unwrap();
        assert_relative_eq!(result.value, 1.45);
    }

    #[test]
    fn test_zmijewski_probability() {
        let result = zmijewski_score(&sample().input()).unwrap();
        assert_relative_eq!(result.value, 9.91);
    }

    #[test]
    fn test_zero_assets_rejected() {
        let mut s = scaled_statement(2023, 1.0);
        s.balance_sheet.total_assets = 0.0;
        let fx = Fixture::new(vec![s]);
        assert!(matches!(altman_z_score(&fx.input()), Err(AnalysisError::InputData(_))));
    }
}
