//! Sample statements for unit tests.

use crate::{
    AnalysisDefinition, AnalysisOptions, BalanceSheet, BenchmarkSet, CalculationInput,
    CashFlowStatement, Category, FinancialStatement, IncomeStatement, LocalizedText, MarketData,
    Unit,
};

/// A balanced statement whose every line scales with `g`.
///
/// At `g = 1.0`: revenue 1,000,000, COGS 600,000, operating income 200,000,
/// net income 144,000, total assets 1,300,000, equity 700,000.
pub fn scaled_statement(fiscal_year: i32, g: f64) -> FinancialStatement {
    let operating_income = 200_000.0 * g;
    let interest = 20_000.0;
    let income_before_tax = operating_income - interest;
    let income_tax = income_before_tax * 0.2;

    FinancialStatement {
        fiscal_year,
        balance_sheet: BalanceSheet {
            cash: 100_000.0 * g,
            short_term_investments: 0.0,
            accounts_receivable: 80_000.0 * g,
            inventory: 100_000.0 * g,
            prepaid_expenses: 0.0,
            other_current_assets: 220_000.0 * g,
            total_current_assets: 500_000.0 * g,
            property_plant_equipment: 700_000.0 * g,
            intangible_assets: 100_000.0 * g,
            long_term_investments: 0.0,
            other_non_current_assets: 0.0,
            total_non_current_assets: 800_000.0 * g,
            total_assets: 1_300_000.0 * g,
            accounts_payable: 120_000.0 * g,
            short_term_debt: 50_000.0 * g,
            accrued_liabilities: 80_000.0 * g,
            other_current_liabilities: 0.0,
            total_current_liabilities: 250_000.0 * g,
            long_term_debt: 300_000.0 * g,
            other_non_current_liabilities: 50_000.0 * g,
            total_non_current_liabilities: 350_000.0 * g,
            total_liabilities: 600_000.0 * g,
            share_capital: 300_000.0,
            retained_earnings: 700_000.0 * g - 300_000.0,
            other_equity: 0.0,
            total_equity: 700_000.0 * g,
        },
        income_statement: IncomeStatement {
            revenue: 1_000_000.0 * g,
            cost_of_goods_sold: 600_000.0 * g,
            gross_profit: 400_000.0 * g,
            operating_expenses: 200_000.0 * g,
            depreciation_amortization: 50_000.0 * g,
            operating_income,
            interest_expense: interest,
            other_income: 0.0,
            income_before_tax,
            income_tax,
            net_income: income_before_tax - income_tax,
        },
        cash_flow: CashFlowStatement {
            operating_cash_flow: 250_000.0 * g,
            investing_cash_flow: -120_000.0 * g,
            financing_cash_flow: -80_000.0 * g,
            capital_expenditures: -120_000.0 * g,
            dividends_paid: -50_000.0 * g,
            net_change_in_cash: 50_000.0 * g,
        },
        market: Some(MarketData {
            share_price: 20.0,
            shares_outstanding: 50_000.0,
            dividends_per_share: 1.0 * g,
        }),
    }
}

/// Four years (2020-2023) growing 10% a year
pub fn growing_statements() -> Vec<FinancialStatement> {
    (0..4)
        .map(|i| scaled_statement(2020 + i, 1.1f64.powi(i)))
        .collect()
}

/// Three identical years
pub fn flat_statements() -> Vec<FinancialStatement> {
    (0..3).map(|i| scaled_statement(2021 + i, 1.0)).collect()
}

/// A throwaway definition for calling a calculator directly
pub fn definition(id: &'static str, category: Category, unit: Unit) -> AnalysisDefinition {
    AnalysisDefinition::new(
        id,
        category,
        LocalizedText::new("Test metric", "مؤشر تجريبي"),
        LocalizedText::new("Test metric", "مؤشر تجريبي"),
        unit,
    )
}

/// Owns everything a [`CalculationInput`] borrows
pub struct Fixture {
    pub statements: Vec<FinancialStatement>,
    pub benchmarks: Option<BenchmarkSet>,
    pub options: AnalysisOptions,
    pub definition: AnalysisDefinition,
}

impl Fixture {
    pub fn new(statements: Vec<FinancialStatement>) -> Self {
        Self {
            statements,
            benchmarks: None,
            options: AnalysisOptions::default(),
            definition: definition("basic.ratios.test", Category::Ratios, Unit::Times),
        }
    }

    pub fn with_definition(mut self, definition: AnalysisDefinition) -> Self {
        self.definition = definition;
        self
    }

    pub fn with_benchmarks(mut self, benchmarks: BenchmarkSet) -> Self {
        self.benchmarks = Some(benchmarks);
        self
    }

    pub fn with_options(mut self, options: AnalysisOptions) -> Self {
        self.options = options;
        self
    }

    pub fn input(&self) -> CalculationInput<'_> {
        CalculationInput {
            statements: &self.statements,
            benchmarks: self.benchmarks.as_ref(),
            options: &self.options,
            definition: &self.definition,
        }
    }
}
