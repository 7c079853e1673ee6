//! Explicit catalog id → calculator table.
//!
//! Every catalog entry must be bound here and every binding must name a
//! catalog entry. [`CalculatorRegistry::validate`] enforces both at startup.

use std::collections::HashMap;

use analysis_catalog::Catalog;
use analysis_core::{AnalysisError, CalculatorFn, ExecutionBudget};
use fundamental_analysis::{cash_flow, comparative, performance, ratios, structural};
use quant_analysis::{game, monte_carlo, optimization, scenarios, sensitivity, statistical};
use risk_analysis::{at_risk, credit, detection, distress};
use valuation_analysis::{capital_cost, dcf, real_options, tvm, value_added};

/// A bound calculator and the budget it runs under
#[derive(Clone, Copy)]
pub struct Calculator {
    pub func: CalculatorFn,
    pub budget: ExecutionBudget,
}

impl std::fmt::Debug for Calculator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Calculator").field("budget", &self.budget).finish()
    }
}

pub fn instant(id: &'static str, func: CalculatorFn) -> (&'static str, Calculator) {
    (
        id,
        Calculator {
            func,
            budget: ExecutionBudget::Instant,
        },
    )
}

pub fn time_boxed(id: &'static str, func: CalculatorFn) -> (&'static str, Calculator) {
    (
        id,
        Calculator {
            func,
            budget: ExecutionBudget::TimeBoxed,
        },
    )
}

#[derive(Debug, Clone, Default)]
pub struct CalculatorRegistry {
    calculators: HashMap<&'static str, Calculator>,
}

impl CalculatorRegistry {
    pub fn new(bindings: impl IntoIterator<Item = (&'static str, Calculator)>) -> Self {
        Self {
            calculators: bindings.into_iter().collect(),
        }
    }

    /// Bindings for the standard catalog
    pub fn standard() -> Self {
        Self::new(standard_bindings())
    }

    pub fn get(&self, id: &str) -> Option<&Calculator> {
        self.calculators.get(id)
    }

    pub fn len(&self) -> usize {
        self.calculators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calculators.is_empty()
    }

    /// Check the registry against a catalog: no unbound definitions, no
    /// orphan bindings, and matching execution budgets.
    pub fn validate(&self, catalog: &Catalog) -> Result<(), AnalysisError> {
        let mut unbound: Vec<&str> = catalog
            .all()
            .iter()
            .map(|d| d.id)
            .filter(|id| !self.calculators.contains_key(id))
            .collect();
        let mut orphans: Vec<&str> = self
            .calculators
            .keys()
            .copied()
            .filter(|id| catalog.get_by_id(id).is_none())
            .collect();

        if !unbound.is_empty() || !orphans.is_empty() {
            unbound.sort_unstable();
            orphans.sort_unstable();
            return Err(AnalysisError::UnknownAnalysis(format!(
                "unbound definitions: [{}]; bindings without a definition: [{}]",
                unbound.join(", "),
                orphans.join(", ")
            )));
        }

        for definition in catalog.all() {
            if let Some(calculator) = self.calculators.get(definition.id) {
                if calculator.budget != definition.budget {
                    return Err(AnalysisError::Configuration(format!(
                        "analysis '{}' is declared {:?} but bound as {:?}",
                        definition.id, definition.budget, calculator.budget
                    )));
                }
            }
        }
        Ok(())
    }
}

fn standard_bindings() -> Vec<(&'static str, Calculator)> {
    vec![
        // structural
        instant("basic.structural.vertical_current_assets", structural::vertical_current_assets),
        instant("basic.structural.vertical_non_current_assets", structural::vertical_non_current_assets),
        instant("basic.structural.vertical_current_liabilities", structural::vertical_current_liabilities),
        instant("basic.structural.vertical_total_liabilities", structural::vertical_total_liabilities),
        instant("basic.structural.vertical_equity", structural::vertical_equity),
        instant("basic.structural.vertical_cost_of_sales", structural::vertical_cost_of_sales),
        instant("basic.structural.vertical_operating_expenses", structural::vertical_operating_expenses),
        instant("basic.structural.vertical_net_income", structural::vertical_net_income),
        instant("basic.structural.horizontal_revenue", structural::horizontal_revenue),
        instant("basic.structural.horizontal_net_income", structural::horizontal_net_income),
        instant("basic.structural.horizontal_total_assets", structural::horizontal_total_assets),
        instant("basic.structural.horizontal_total_equity", structural::horizontal_total_equity),
        instant("basic.structural.trend_revenue", structural::trend_revenue),
        instant("basic.structural.trend_net_income", structural::trend_net_income),
        instant("basic.structural.trend_total_assets", structural::trend_total_assets),
        instant("basic.structural.cagr_revenue", structural::cagr_revenue),
        instant("basic.structural.cagr_total_assets", structural::cagr_total_assets),
        // ratios
        instant("basic.ratios.current_ratio", ratios::current_ratio),
        instant("basic.ratios.quick_ratio", ratios::quick_ratio),
        instant("basic.ratios.cash_ratio", ratios::cash_ratio),
        instant("basic.ratios.operating_cash_flow_ratio", ratios::operating_cash_flow_ratio),
        instant("basic.ratios.working_capital", ratios::working_capital),
        instant("basic.ratios.working_capital_to_assets", ratios::working_capital_to_assets),
        instant("basic.ratios.defensive_interval_days", ratios::defensive_interval_days),
        instant("basic.ratios.net_working_capital_ratio", ratios::net_working_capital_ratio),
        instant("basic.ratios.inventory_turnover", ratios::inventory_turnover),
        instant("basic.ratios.days_inventory", ratios::days_inventory),
        instant("basic.ratios.receivables_turnover", ratios::receivables_turnover),
        instant("basic.ratios.days_sales_outstanding", ratios::days_sales_outstanding),
        instant("basic.ratios.payables_turnover", ratios::payables_turnover),
        instant("basic.ratios.days_payables_outstanding", ratios::days_payables_outstanding),
        instant("basic.ratios.asset_turnover", ratios::asset_turnover),
        instant("basic.ratios.fixed_asset_turnover", ratios::fixed_asset_turnover),
        instant("basic.ratios.current_asset_turnover", ratios::current_asset_turnover),
        instant("basic.ratios.working_capital_turnover", ratios::working_capital_turnover),
        instant("basic.ratios.equity_turnover", ratios::equity_turnover),
        instant("basic.ratios.operating_cycle", ratios::operating_cycle),
        instant("basic.ratios.debt_ratio", ratios::debt_ratio),
        instant("basic.ratios.debt_to_equity", ratios::debt_to_equity),
        instant("basic.ratios.equity_ratio", ratios::equity_ratio),
        instant("basic.ratios.equity_multiplier", ratios::equity_multiplier),
        instant("basic.ratios.long_term_debt_to_capital", ratios::long_term_debt_to_capital),
        instant("basic.ratios.interest_coverage", ratios::interest_coverage),
        instant("basic.ratios.debt_service_coverage", ratios::debt_service_coverage),
        instant("basic.ratios.cash_coverage", ratios::cash_coverage),
        instant("basic.ratios.fixed_assets_to_equity", ratios::fixed_assets_to_equity),
        instant("basic.ratios.current_liabilities_to_total_liabilities", ratios::current_liabilities_to_total_liabilities),
        instant("basic.ratios.net_debt_to_ebitda", ratios::net_debt_to_ebitda),
        instant("basic.ratios.gross_profit_margin", ratios::gross_profit_margin),
        instant("basic.ratios.operating_margin", ratios::operating_margin),
        instant("basic.ratios.net_profit_margin", ratios::net_profit_margin),
        instant("basic.ratios.ebitda_margin", ratios::ebitda_margin),
        instant("basic.ratios.return_on_assets", ratios::return_on_assets),
        instant("basic.ratios.return_on_equity", ratios::return_on_equity),
        instant("basic.ratios.return_on_capital_employed", ratios::return_on_capital_employed),
        instant("basic.ratios.return_on_invested_capital", ratios::return_on_invested_capital),
        instant("basic.ratios.pretax_margin", ratios::pretax_margin),
        instant("basic.ratios.effective_tax_rate", ratios::effective_tax_rate),
        instant("basic.ratios.operating_expense_ratio", ratios::operating_expense_ratio),
        instant("basic.ratios.basic_earnings_power", ratios::basic_earnings_power),
        instant("basic.ratios.earnings_per_share", ratios::earnings_per_share),
        instant("basic.ratios.price_to_earnings", ratios::price_to_earnings),
        instant("basic.ratios.price_to_book", ratios::price_to_book),
        instant("basic.ratios.price_to_sales", ratios::price_to_sales),
        instant("basic.ratios.dividend_yield", ratios::dividend_yield),
        instant("basic.ratios.dividend_payout", ratios::dividend_payout),
        instant("basic.ratios.book_value_per_share", ratios::book_value_per_share),
        instant("basic.ratios.earnings_yield", ratios::earnings_yield),
        instant("basic.ratios.ev_to_ebitda", ratios::ev_to_ebitda),
        // flow
        instant("basic.flow.free_cash_flow", cash_flow::free_cash_flow),
        instant("basic.flow.fcf_margin", cash_flow::fcf_margin),
        instant("basic.flow.ocf_margin", cash_flow::ocf_margin),
        instant("basic.flow.ocf_to_net_income", cash_flow::ocf_to_net_income),
        instant("basic.flow.cash_return_on_assets", cash_flow::cash_return_on_assets),
        instant("basic.flow.cash_return_on_equity", cash_flow::cash_return_on_equity),
        instant("basic.flow.ocf_to_total_debt", cash_flow::ocf_to_total_debt),
        instant("basic.flow.capex_coverage", cash_flow::capex_coverage),
        instant("basic.flow.dividend_coverage", cash_flow::dividend_coverage),
        instant("basic.flow.cash_flow_adequacy", cash_flow::cash_flow_adequacy),
        instant("basic.flow.capex_to_revenue", cash_flow::capex_to_revenue),
        instant("basic.flow.capex_to_depreciation", cash_flow::capex_to_depreciation),
        instant("basic.flow.cash_conversion_cycle", cash_flow::cash_conversion_cycle),
        instant("basic.flow.net_cash_flow", cash_flow::net_cash_flow),
        instant("basic.flow.fcf_to_equity", cash_flow::fcf_to_equity),
        instant("basic.flow.ocf_growth", cash_flow::ocf_growth),
        instant("basic.flow.fcf_cagr", cash_flow::fcf_cagr),
        instant("basic.flow.reinvestment_ratio", cash_flow::reinvestment_ratio),
        // comparison
        instant("intermediate.comparison.percentile_current_ratio", comparative::percentile_current_ratio),
        instant("intermediate.comparison.percentile_roe", comparative::percentile_roe),
        instant("intermediate.comparison.percentile_net_margin", comparative::percentile_net_margin),
        instant("intermediate.comparison.percentile_debt_to_equity", comparative::percentile_debt_to_equity),
        instant("intermediate.comparison.percentile_asset_turnover", comparative::percentile_asset_turnover),
        instant("intermediate.comparison.percentile_revenue_growth", comparative::percentile_revenue_growth),
        instant("intermediate.comparison.gap_current_ratio", comparative::gap_current_ratio),
        instant("intermediate.comparison.gap_roe", comparative::gap_roe),
        instant("intermediate.comparison.gap_net_margin", comparative::gap_net_margin),
        instant("intermediate.comparison.gap_debt_to_equity", comparative::gap_debt_to_equity),
        instant("intermediate.comparison.zscore_roe", comparative::zscore_roe),
        instant("intermediate.comparison.zscore_net_margin", comparative::zscore_net_margin),
        instant("intermediate.comparison.zscore_debt_to_equity", comparative::zscore_debt_to_equity),
        instant("intermediate.comparison.sector_growth_relative", comparative::sector_growth_relative),
        instant("intermediate.comparison.composite_peer_score", comparative::composite_peer_score),
        // valuation
        instant("intermediate.valuation.npv", tvm::net_present_value),
        instant("intermediate.valuation.irr", tvm::internal_rate_of_return),
        instant("intermediate.valuation.mirr", tvm::modified_internal_rate_of_return),
        instant("intermediate.valuation.payback_period", tvm::payback),
        instant("intermediate.valuation.discounted_payback_period", tvm::discounted_payback),
        instant("intermediate.valuation.profitability_index", tvm::profitability_index_of),
        instant("intermediate.valuation.accounting_rate_of_return", tvm::accounting_return),
        instant("intermediate.valuation.equivalent_annual_annuity", tvm::equivalent_annual),
        instant("intermediate.valuation.wacc", capital_cost::wacc),
        instant("intermediate.valuation.capm_cost_of_equity", capital_cost::capm_cost_of_equity),
        instant("intermediate.valuation.dcf_enterprise_value", dcf::dcf_enterprise_value),
        instant("intermediate.valuation.dcf_equity_value", dcf::dcf_equity_value),
        instant("intermediate.valuation.terminal_value", dcf::terminal_value),
        instant("intermediate.valuation.intrinsic_value_per_share", dcf::intrinsic_value_per_share),
        instant("intermediate.valuation.upside_potential", dcf::upside_potential),
        instant("intermediate.valuation.ddm_value", value_added::ddm_value),
        instant("intermediate.valuation.eva", value_added::eva),
        instant("intermediate.valuation.mva", value_added::mva),
        instant("intermediate.valuation.implied_ev_to_ebitda", dcf::implied_ev_to_ebitda),
        instant("intermediate.valuation.real_option_expansion", real_options::real_option_expansion),
        // performance
        instant("intermediate.performance.dupont_three_step", performance::dupont_three_step),
        instant("intermediate.performance.dupont_five_step", performance::dupont_five_step),
        instant("intermediate.performance.tax_burden", performance::tax_burden),
        instant("intermediate.performance.interest_burden", performance::interest_burden),
        instant("intermediate.performance.sustainable_growth", performance::sustainable_growth),
        instant("intermediate.performance.internal_growth", performance::internal_growth),
        instant("intermediate.performance.degree_operating_leverage", performance::degree_operating_leverage),
        instant("intermediate.performance.degree_financial_leverage", performance::degree_financial_leverage),
        instant("intermediate.performance.degree_combined_leverage", performance::degree_combined_leverage),
        instant("intermediate.performance.break_even_revenue", performance::break_even_revenue),
        instant("intermediate.performance.margin_of_safety", performance::margin_of_safety),
        instant("intermediate.performance.roic_wacc_spread", performance::roic_wacc_spread),
        instant("intermediate.performance.profit_growth_gap", performance::profit_growth_gap),
        instant("intermediate.performance.asset_growth_efficiency", performance::asset_growth_efficiency),
        instant("intermediate.performance.performance_scorecard", performance::performance_scorecard),
        // modeling
        time_boxed("advanced.modeling.scenario_expected_value", scenarios::scenario_expected_value),
        time_boxed("advanced.modeling.scenario_dispersion", scenarios::scenario_dispersion),
        time_boxed("advanced.modeling.sensitivity_discount_rate", sensitivity::sensitivity_discount_rate),
        time_boxed("advanced.modeling.sensitivity_growth_rate", sensitivity::sensitivity_growth_rate),
        time_boxed("advanced.modeling.tornado_range", sensitivity::tornado_range),
        time_boxed("advanced.modeling.stress_test_npv", sensitivity::stress_test_npv),
        time_boxed("advanced.modeling.monte_carlo_npv_mean", monte_carlo::monte_carlo_npv_mean),
        time_boxed("advanced.modeling.monte_carlo_npv_var", monte_carlo::monte_carlo_npv_var),
        time_boxed("advanced.modeling.monte_carlo_npv_cvar", monte_carlo::monte_carlo_npv_cvar),
        time_boxed("advanced.modeling.monte_carlo_loss_probability", monte_carlo::monte_carlo_loss_probability),
        time_boxed("advanced.modeling.monte_carlo_revenue", monte_carlo::monte_carlo_revenue),
        time_boxed("advanced.modeling.linear_programming", optimization::linear_programming),
        time_boxed("advanced.modeling.goal_programming", optimization::goal_programming),
        time_boxed("advanced.modeling.game_theory_equilibrium", game::game_theory_equilibrium),
        // statistical
        instant("advanced.statistical.revenue_trend_slope", statistical::revenue_trend_slope),
        instant("advanced.statistical.revenue_trend_r_squared", statistical::revenue_trend_r_squared),
        instant("advanced.statistical.revenue_linear_forecast", statistical::revenue_linear_forecast),
        instant("advanced.statistical.net_income_linear_forecast", statistical::net_income_linear_forecast),
        instant("advanced.statistical.exponential_smoothing_revenue", statistical::exponential_smoothing_revenue),
        instant("advanced.statistical.revenue_growth_volatility", statistical::revenue_growth_volatility),
        instant("advanced.statistical.earnings_volatility", statistical::earnings_volatility),
        instant("advanced.statistical.margin_stability", statistical::margin_stability),
        instant("advanced.statistical.revenue_income_correlation", statistical::revenue_income_correlation),
        instant("advanced.statistical.roe_history_zscore", statistical::roe_history_zscore),
        instant("advanced.statistical.sector_history_zscore", statistical::sector_history_zscore),
        // risk
        instant("comprehensive.risk.credit_rating_score", credit::credit_rating_score),
        instant("comprehensive.risk.default_probability", credit::default_probability),
        instant("comprehensive.risk.altman_z_score", distress::altman_z_score),
        instant("comprehensive.risk.altman_z_double_prime", distress::altman_z_double_prime),
        instant("comprehensive.risk.springate_s_score", distress::springate_s_score),
        instant("comprehensive.risk.zmijewski_score", distress::zmijewski_score),
        instant("comprehensive.risk.liquidity_risk_index", credit::liquidity_risk_index),
        instant("comprehensive.risk.solvency_risk_index", credit::solvency_risk_index),
        instant("comprehensive.risk.earnings_at_risk", at_risk::earnings_at_risk),
        instant("comprehensive.risk.cash_flow_at_risk", at_risk::cash_flow_at_risk),
        // detection
        instant("comprehensive.detection.anomaly_revenue", detection::anomaly_revenue),
        instant("comprehensive.detection.anomaly_net_income", detection::anomaly_net_income),
        instant("comprehensive.detection.anomaly_receivables", detection::anomaly_receivables),
        instant("comprehensive.detection.anomaly_inventory", detection::anomaly_inventory),
        instant("comprehensive.detection.anomaly_operating_cash_flow", detection::anomaly_operating_cash_flow),
        instant("comprehensive.detection.beneish_m_score", detection::beneish_m_score),
        instant("comprehensive.detection.accruals_ratio", detection::accruals_ratio),
        instant("comprehensive.detection.benford_first_digit", detection::benford_first_digit),
        instant("comprehensive.detection.balance_sheet_consistency", detection::balance_sheet_consistency),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_catalog::STANDARD_SIZE;
    use analysis_core::{AnalysisDetails, CalculationInput, Computation};

    fn constant(_: &CalculationInput<'_>) -> Result<Computation, AnalysisError> {
        Ok(Computation::new(1.0, AnalysisDetails::Ratio(Default::default())))
    }

    #[test]
    fn test_standard_registry_binds_every_catalog_entry() {
        let catalog = Catalog::standard().unwrap();
        let registry = CalculatorRegistry::standard();
        assert_eq!(registry.len(), STANDARD_SIZE);
        registry.validate(&catalog).unwrap();
    }

    #[test]
    fn test_unbound_definition_is_fatal() {
        let catalog = Catalog::standard().unwrap();
        let mut bindings = standard_bindings();
        bindings.retain(|(id, _)| *id != "basic.ratios.current_ratio");
        let err = CalculatorRegistry::new(bindings).validate(&catalog).unwrap_err();
        match err {
            AnalysisError::UnknownAnalysis(msg) => assert!(msg.contains("basic.ratios.current_ratio")),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_orphan_binding_is_fatal() {
        let catalog = Catalog::standard().unwrap();
        let mut bindings = standard_bindings();
        bindings.push(instant("basic.ratios.made_up", constant));
        assert!(matches!(
            CalculatorRegistry::new(bindings).validate(&catalog),
            Err(AnalysisError::UnknownAnalysis(_))
        ));
    }

    #[test]
    fn test_budget_mismatch_is_rejected() {
        let catalog = Catalog::standard().unwrap();
        let mut bindings = standard_bindings();
        for binding in bindings.iter_mut() {
            if binding.0 == "advanced.modeling.monte_carlo_npv_mean" {
                binding.1.budget = ExecutionBudget::Instant;
            }
        }
        assert!(matches!(
            CalculatorRegistry::new(bindings).validate(&catalog),
            Err(AnalysisError::Configuration(_))
        ));
    }
}
