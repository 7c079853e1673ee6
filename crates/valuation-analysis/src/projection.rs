//! Revenue-driven free cash flow projection shared by the DCF, the default
//! investment project and the modeling calculators.

use analysis_core::numeric::{require_positive, safe_div};
use analysis_core::stats::mean;
use analysis_core::{AnalysisError, CalculationInput, InvestmentProject};

/// Historical growth is clamped to this band before it is projected forward.
pub const MAX_PROJECTED_GROWTH: f64 = 0.20;

/// Starting point of a projection: latest revenue plus the historical
/// growth rate and free cash flow margin, all as fractions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionBase {
    pub revenue: f64,
    pub revenue_growth: f64,
    pub fcf_margin: f64,
}

impl ProjectionBase {
    pub fn from_input(input: &CalculationInput<'_>) -> Result<Self, AnalysisError> {
        let latest = input.latest()?;
        let revenue = require_positive(latest.income_statement.revenue, "revenue")?;

        let margins = margin_history(input);
        if margins.is_empty() {
            return Err(AnalysisError::input("no year with positive revenue to derive a cash flow margin"));
        }

        Ok(Self {
            revenue,
            revenue_growth: historical_growth(input),
            fcf_margin: mean(&margins),
        })
    }

    pub fn project(&self, years: usize) -> Vec<f64> {
        project_fcf(self.revenue, self.revenue_growth, self.fcf_margin, years)
    }
}

/// Free cash flow for years 1..=n at constant growth and margin
pub fn project_fcf(revenue: f64, growth: f64, margin: f64, years: usize) -> Vec<f64> {
    (1..=years)
        .map(|t| revenue * (1.0 + growth).powi(t as i32) * margin)
        .collect()
}

/// Revenue CAGR over the supplied years, clamped to ±20%. A single year or a
/// non-positive starting revenue projects flat.
pub fn historical_growth(input: &CalculationInput<'_>) -> f64 {
    let revenues = input.values(|s| s.income_statement.revenue);
    let (first, last) = match (revenues.first(), revenues.last()) {
        (Some(&first), Some(&last)) if revenues.len() >= 2 && first > 0.0 && last > 0.0 => (first, last),
        _ => return 0.0,
    };
    let periods = (revenues.len() - 1) as f64;
    let rate = (last / first).powf(1.0 / periods) - 1.0;
    if rate.is_finite() {
        rate.clamp(-MAX_PROJECTED_GROWTH, MAX_PROJECTED_GROWTH)
    } else {
        0.0
    }
}

/// Year-over-year revenue growth rates as fractions
pub fn growth_history(input: &CalculationInput<'_>) -> Vec<f64> {
    input
        .values(|s| s.income_statement.revenue)
        .windows(2)
        .filter(|w| w[0] > 0.0)
        .map(|w| w[1] / w[0] - 1.0)
        .collect()
}

/// Free cash flow margin of every year with positive revenue
pub fn margin_history(input: &CalculationInput<'_>) -> Vec<f64> {
    input
        .statements
        .iter()
        .filter(|s| s.income_statement.revenue > 0.0)
        .map(|s| safe_div(s.cash_flow.free_cash_flow(), s.income_statement.revenue))
        .collect()
}

/// The supplied project, or invested capital against the projected free cash
/// flows of the next `projection_years` years.
pub fn investment_project(input: &CalculationInput<'_>) -> Result<InvestmentProject, AnalysisError> {
    if let Some(project) = &input.options.investment_project {
        if project.initial_investment <= 0.0 || !project.initial_investment.is_finite() {
            return Err(AnalysisError::input("initial investment must be positive"));
        }
        if project.cash_flows.is_empty() {
            return Err(AnalysisError::input("investment project has no cash flows"));
        }
        if project.cash_flows.iter().any(|cf| !cf.is_finite()) {
            return Err(AnalysisError::input("investment project cash flows must be finite"));
        }
        return Ok(project.clone());
    }

    let latest = input.latest()?;
    let initial = require_positive(latest.balance_sheet.invested_capital(), "invested capital")?;
    let years = input.options.projection_years.max(1);
    Ok(InvestmentProject {
        initial_investment: initial,
        cash_flows: ProjectionBase::from_input(input)?.project(years),
        reinvestment_rate: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::fixtures::{growing_statements, scaled_statement, Fixture};
    use analysis_core::AnalysisOptions;
    use approx::assert_relative_eq;

    #[test]
    fn test_base_from_growing_company() {
        let fx = Fixture::new(growing_statements());
        let base = ProjectionBase::from_input(&fx.input()).unwrap();
        assert_relative_eq!(base.revenue, 1_331_000.0, max_relative = 1e-9);
        assert_relative_eq!(base.revenue_growth, 0.10, epsilon = 1e-9);
        assert_relative_eq!(base.fcf_margin, 0.13, epsilon = 1e-9);

        let flows = base.project(2);
        assert_relative_eq!(flows[0], 1_331_000.0 * 1.1 * 0.13, max_relative = 1e-9);
        assert_eq!(flows.len(), 2);
    }

    #[test]
    fn test_growth_is_clamped() {
        let fx = Fixture::new(vec![scaled_statement(2022, 1.0), scaled_statement(2023, 2.0)]);
        assert_relative_eq!(historical_growth(&fx.input()), MAX_PROJECTED_GROWTH);
        assert_eq!(growth_history(&fx.input()).len(), 1);
    }

    #[test]
    fn test_default_project_uses_invested_capital() {
        let fx = Fixture::new(vec![scaled_statement(2023, 1.0)]);
        let project = investment_project(&fx.input()).unwrap();
        assert_relative_eq!(project.initial_investment, 1_050_000.0);
        assert_eq!(project.cash_flows.len(), 5);
        // Single year projects flat at a 13% margin
        assert!(project.cash_flows.iter().all(|cf| (cf - 130_000.0).abs() < 1e-6));
    }

    #[test]
    fn test_explicit_project_is_validated() {
        let options = AnalysisOptions {
            investment_project: Some(InvestmentProject {
                initial_investment: 0.0,
                cash_flows: vec![100.0],
                reinvestment_rate: None,
            }),
            ..Default::default()
        };
        let fx = Fixture::new(vec![scaled_statement(2023, 1.0)]).with_options(options);
        assert!(matches!(investment_project(&fx.input()), Err(AnalysisError::InputData(_))));
    }
}
