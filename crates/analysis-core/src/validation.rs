use std::collections::HashSet;

use serde::Serialize;

use crate::{AnalysisError, CompanyContext, FinancialStatement};

/// Relative tolerance for the accounting identity
pub const BALANCE_TOLERANCE: f64 = 0.005;

/// Non-fatal data quality finding, surfaced in the report
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationIssue {
    /// Assets differ from liabilities plus equity beyond tolerance
    BalanceMismatch {
        fiscal_year: i32,
        total_assets: f64,
        liabilities_and_equity: f64,
        relative_gap: f64,
    },
    NegativeTotal { fiscal_year: i32, field: String, value: f64 },
    YearsCountMismatch { declared: usize, supplied: usize },
}

/// Check one statement's internal consistency.
pub fn validate_statement(statement: &FinancialStatement) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let bs = &statement.balance_sheet;
    let rhs = bs.total_liabilities + bs.total_equity;

    let scale = bs.total_assets.abs().max(rhs.abs());
    if scale > 0.0 {
        let gap = (bs.total_assets - rhs).abs() / scale;
        if gap > BALANCE_TOLERANCE {
            issues.push(ValidationIssue::BalanceMismatch {
                fiscal_year: statement.fiscal_year,
                total_assets: bs.total_assets,
                liabilities_and_equity: rhs,
                relative_gap: gap,
            });
        }
    }

    for (field, value) in [
        ("total_assets", bs.total_assets),
        ("total_liabilities", bs.total_liabilities),
        ("revenue", statement.income_statement.revenue),
    ] {
        if value < 0.0 {
            issues.push(ValidationIssue::NegativeTotal {
                fiscal_year: statement.fiscal_year,
                field: field.to_string(),
                value,
            });
        }
    }

    issues
}

/// Sort statements by fiscal year and validate the context.
///
/// Empty input and duplicate years are fatal; everything else is reported as
/// a warning and the run proceeds.
pub fn normalize_context(
    mut context: CompanyContext,
) -> Result<(CompanyContext, Vec<ValidationIssue>), AnalysisError> {
    if context.statements.is_empty() {
        return Err(AnalysisError::input("no financial statements supplied"));
    }

    let mut seen = HashSet::new();
    for statement in &context.statements {
        if !seen.insert(statement.fiscal_year) {
            return Err(AnalysisError::input(format!(
                "duplicate fiscal year {}",
                statement.fiscal_year
            )));
        }
    }

    context.statements.sort_by_key(|s| s.fiscal_year);

    let mut issues: Vec<ValidationIssue> = context
        .statements
        .iter()
        .flat_map(validate_statement)
        .collect();

    if context.years_count != 0 && context.years_count != context.statements.len() {
        issues.push(ValidationIssue::YearsCountMismatch {
            declared: context.years_count,
            supplied: context.statements.len(),
        });
    }

    Ok((context, issues))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AnalysisTier, ComparisonLevel, Language};

    fn statement(year: i32, assets: f64, liabilities: f64, equity: f64) -> FinancialStatement {
        let mut s = FinancialStatement {
            fiscal_year: year,
            ..Default::default()
        };
        s.balance_sheet.total_assets = assets;
        s.balance_sheet.total_liabilities = liabilities;
        s.balance_sheet.total_equity = equity;
        s
    }

    fn context(statements: Vec<FinancialStatement>) -> CompanyContext {
        CompanyContext {
            company_name: "Test Co".to_string(),
            statements,
            sector: "retail".to_string(),
            activity: "grocery".to_string(),
            legal_entity: "llc".to_string(),
            comparison_level: ComparisonLevel::Local,
            years_count: 0,
            analysis_type: AnalysisTier::Basic,
            language: Language::En,
        }
    }

    #[test]
    fn test_balanced_statement_has_no_issues() {
        assert!(validate_statement(&statement(2023, 1000.0, 600.0, 400.0)).is_empty());
        // within 0.5%
        assert!(validate_statement(&statement(2023, 1000.0, 600.0, 403.0)).is_empty());
    }

    #[test]
    fn test_balance_mismatch_is_reported() {
        let issues = validate_statement(&statement(2023, 1000.0, 600.0, 300.0));
        assert_eq!(issues.len(), 1);
        assert!(matches!(issues[0], ValidationIssue::BalanceMismatch { fiscal_year: 2023, .. }));
    }

    #[test]
    fn test_normalize_sorts_by_year() {
        let ctx = context(vec![
            statement(2023, 10.0, 5.0, 5.0),
            statement(2021, 10.0, 5.0, 5.0),
            statement(2022, 10.0, 5.0, 5.0),
        ]);
        let (ctx, issues) = normalize_context(ctx).unwrap();
        let years: Vec<i32> = ctx.statements.iter().map(|s| s.fiscal_year).collect();
        assert_eq!(years, vec![2021, 2022, 2023]);
        assert!(issues.is_empty());
    }

    #[test]
    fn test_duplicate_and_empty_are_fatal() {
        let dup = context(vec![statement(2022, 1.0, 0.5, 0.5), statement(2022, 1.0, 0.5, 0.5)]);
        assert!(matches!(normalize_context(dup), Err(AnalysisError::InputData(_))));
        assert!(normalize_context(context(vec![])).is_err());
    }

    #[test]
    fn test_years_count_mismatch_warns() {
        let mut ctx = context(vec![statement(2022, 1.0, 0.5, 0.5)]);
        ctx.years_count = 3;
        let (_, issues) = normalize_context(ctx).unwrap();
        assert_eq!(
            issues,
            vec![ValidationIssue::YearsCountMismatch { declared: 3, supplied: 1 }]
        );
    }
}
