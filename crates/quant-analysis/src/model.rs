//! The deterministic valuation every modeling calculator perturbs: projected
//! free cash flow discounted at WACC, less the capital already invested.

use analysis_core::numeric::require_positive;
use analysis_core::{AnalysisError, CalculationInput};
use valuation_analysis::dcf::discount_cash_flows;
use valuation_analysis::projection::{project_fcf, ProjectionBase};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drivers {
    pub revenue_growth: f64,
    pub fcf_margin: f64,
    pub discount_rate: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValueModel {
    pub base: ProjectionBase,
    pub invested_capital: f64,
    pub discount_rate: f64,
    pub terminal_growth: f64,
    pub years: usize,
}

impl ValueModel {
    pub fn from_input(input: &CalculationInput<'_>) -> Result<Self, AnalysisError> {
        let latest = input.latest()?;
        Ok(Self {
            base: ProjectionBase::from_input(input)?,
            invested_capital: require_positive(latest.balance_sheet.invested_capital(), "invested capital")?,
            discount_rate: latest.wacc(input.options),
            terminal_growth: input.options.terminal_growth_rate,
            years: input.options.projection_years.max(1),
        })
    }

    pub fn base_drivers(&self) -> Drivers {
        Drivers {
            revenue_growth: self.base.revenue_growth,
            fcf_margin: self.base.fcf_margin,
            discount_rate: self.discount_rate,
        }
    }

    pub fn enterprise_value(&self, drivers: Drivers) -> Result<f64, AnalysisError> {
        let flows = project_fcf(self.base.revenue, drivers.revenue_growth, drivers.fcf_margin, self.years);
        Ok(discount_cash_flows(&flows, drivers.discount_rate, self.terminal_growth)?.enterprise_value)
    }

    /// Enterprise value in excess of invested capital
    pub fn value_created(&self, drivers: Drivers) -> Result<f64, AnalysisError> {
        Ok(self.enterprise_value(drivers)? - self.invested_capital)
    }

    /// Revenue in the final projected year
    pub fn terminal_revenue(&self, revenue_growth: f64) -> f64 {
        self.base.revenue * (1.0 + revenue_growth).powi(self.years as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::fixtures::{scaled_statement, Fixture};
    use approx::assert_relative_eq;

    #[test]
    fn test_value_created_moves_with_drivers() {
        let fx = Fixture::new(vec![scaled_statement(2023, 1.0)]);
        let model = ValueModel::from_input(&fx.input()).unwrap();
        let base = model.base_drivers();
        assert_relative_eq!(base.fcf_margin, 0.13, epsilon = 1e-12);

        let value = model.value_created(base).unwrap();
        let richer = model
            .value_created(Drivers {
                fcf_margin: 0.15,
                ..base
            })
            .unwrap();
        let dearer = model
            .value_created(Drivers {
                discount_rate: base.discount_rate + 0.01,
                ..base
            })
            .unwrap();
        assert!(richer > value);
        assert!(dearer < value);
        assert_relative_eq!(model.terminal_revenue(0.0), 1_000_000.0);
    }
}
