//! Capital allocation as a linear programme, and financial targets as a goal
//! programme solved through the same simplex.

use analysis_core::numeric::{round2, round_to, safe_div};
use analysis_core::{
    AnalysisDetails, AnalysisError, CalculationInput, ChartHint, Computation, ConstraintKind, Goal,
    GoalProgram, LinearConstraint, LinearProgram, Observation, OptimizationDetails,
    OptimizationStatus,
};

use crate::simplex::{solve, LpSolution};

/// Reinvestment may exceed this year's capital expenditure by at most 50%
const REINVESTMENT_CAP: f64 = 1.5;
/// Default goal: reinvest 10% more than this year's capital expenditure
const REINVESTMENT_TARGET: f64 = 1.1;
/// Default goal: repay a tenth of interest-bearing debt
const REPAYMENT_TARGET: f64 = 0.10;

/// Cash on hand plus this year's positive free cash flow
fn allocation_budget(input: &CalculationInput<'_>) -> Result<f64, AnalysisError> {
    let latest = input.latest()?;
    let budget = latest.balance_sheet.cash + latest.cash_flow.free_cash_flow().max(0.0);
    if budget <= 0.0 {
        return Err(AnalysisError::input("no cash or free cash flow to allocate"));
    }
    Ok(budget)
}

fn le(coefficients: Vec<f64>, rhs: f64) -> LinearConstraint {
    LinearConstraint {
        coefficients,
        kind: ConstraintKind::LessOrEqual,
        rhs,
    }
}

/// Supplied programme, or split the budget between reinvestment (earning
/// ROIC, capped at 1.5× capex) and debt repayment (saving the after-tax
/// cost of debt, capped at outstanding debt).
pub fn capital_allocation_program(input: &CalculationInput<'_>) -> Result<LinearProgram, AnalysisError> {
    if let Some(program) = &input.options.linear_program {
        return Ok(program.clone());
    }
    let latest = input.latest()?;
    let options = input.options;
    let invested = latest.balance_sheet.invested_capital();
    let roic = safe_div(latest.nopat(options.tax_rate), invested);
    let after_tax_debt = options.cost_of_debt * (1.0 - options.tax_rate);
    let budget = allocation_budget(input)?;

    Ok(LinearProgram {
        objective: vec![roic, after_tax_debt],
        maximize: true,
        constraints: vec![
            le(vec![1.0, 1.0], budget),
            le(vec![1.0, 0.0], REINVESTMENT_CAP * latest.cash_flow.capital_expenditures.abs()),
            le(vec![0.0, 1.0], latest.balance_sheet.total_debt().max(0.0)),
        ],
    })
}

/// Supplied goals, or reinvest 1.1× capex and repay 10% of debt out of the
/// allocation budget.
pub fn financial_goals(input: &CalculationInput<'_>) -> Result<GoalProgram, AnalysisError> {
    if let Some(program) = &input.options.goal_program {
        return Ok(program.clone());
    }
    let latest = input.latest()?;
    Ok(GoalProgram {
        variables: 2,
        goals: vec![
            Goal {
                coefficients: vec![1.0, 0.0],
                target: REINVESTMENT_TARGET * latest.cash_flow.capital_expenditures.abs(),
                under_weight: 1.0,
                over_weight: 0.0,
            },
            Goal {
                coefficients: vec![0.0, 1.0],
                target: REPAYMENT_TARGET * latest.balance_sheet.total_debt().max(0.0),
                under_weight: 1.0,
                over_weight: 0.0,
            },
        ],
        hard_constraints: vec![le(vec![1.0, 1.0], allocation_budget(input)?)],
    })
}

/// Each goal becomes `coefficients·x + d⁻ − d⁺ = target`; the programme
/// minimizes the weighted deviations.
pub fn goal_to_linear(program: &GoalProgram) -> Result<LinearProgram, AnalysisError> {
    let n = program.variables;
    if n == 0 || program.goals.is_empty() {
        return Err(AnalysisError::input("goal programme needs variables and at least one goal"));
    }
    if let Some(goal) = program.goals.iter().find(|g| g.coefficients.len() != n) {
        return Err(AnalysisError::input(format!(
            "goal with target {} has {} coefficients, expected {}",
            goal.target,
            goal.coefficients.len(),
            n
        )));
    }
    if program.goals.iter().any(|g| g.under_weight < 0.0 || g.over_weight < 0.0) {
        return Err(AnalysisError::input("goal weights must be non-negative"));
    }

    let width = n + 2 * program.goals.len();
    let mut objective = vec![0.0; width];
    let mut constraints = Vec::with_capacity(program.goals.len() + program.hard_constraints.len());

    for (k, goal) in program.goals.iter().enumerate() {
        let under = n + 2 * k;
        let over = under + 1;
        objective[under] = goal.under_weight;
        objective[over] = goal.over_weight;

        let mut coefficients = goal.coefficients.clone();
        coefficients.resize(width, 0.0);
        coefficients[under] = 1.0;
        coefficients[over] = -1.0;
        constraints.push(LinearConstraint {
            coefficients,
            kind: ConstraintKind::Equal,
            rhs: goal.target,
        });
    }
    for hard in &program.hard_constraints {
        if hard.coefficients.len() != n {
            return Err(AnalysisError::input("hard constraint width does not match the goal variables"));
        }
        let mut coefficients = hard.coefficients.clone();
        coefficients.resize(width, 0.0);
        constraints.push(LinearConstraint {
            coefficients,
            kind: hard.kind,
            rhs: hard.rhs,
        });
    }

    Ok(LinearProgram {
        objective,
        maximize: false,
        constraints,
    })
}

/// Optimal results carry the rounded objective; infeasible and unbounded
/// programmes carry no number and are reported through their status.
fn optimization_computation(lp: &LpSolution, variables: usize) -> Computation {
    let details = OptimizationDetails {
        status: lp.status,
        objective_value: lp.objective_value.map(round2),
        solution: lp.solution.iter().take(variables).map(|x| round2(*x)).collect(),
        shadow_prices: lp.shadow_prices.iter().map(|p| round_to(*p, 4)).collect(),
        equilibrium: None,
    };
    let details = AnalysisDetails::Optimization(details);
    match (lp.status, lp.objective_value) {
        (OptimizationStatus::Optimal, Some(objective)) => {
            let objective = round2(objective);
            Computation::new(objective, details)
                .observe(Observation::OptimumFound { objective })
                .with_benchmark(Some(0.0))
                .chart(ChartHint::Table)
        }
        (OptimizationStatus::Unbounded, _) => {
            Computation::new(f64::NAN, details).observe(Observation::Unbounded)
        }
        _ => Computation::new(f64::NAN, details).observe(Observation::Infeasible),
    }
}

pub fn linear_programming(input: &CalculationInput<'_>) -> Result<Computation, AnalysisError> {
    let program = capital_allocation_program(input)?;
    let lp = solve(&program)?;
    Ok(optimization_computation(&lp, program.objective.len()))
}

/// Weighted deviation from the goals at the optimum; 0 means every goal is met.
pub fn goal_programming(input: &CalculationInput<'_>) -> Result<Computation, AnalysisError> {
    let goals = financial_goals(input)?;
    let lp = solve(&goal_to_linear(&goals)?)?;
    Ok(optimization_computation(&lp, goals.variables))
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::fixtures::{scaled_statement, Fixture};
    use analysis_core::AnalysisOptions;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_capital_allocation() {
        let fx = Fixture::new(vec![scaled_statement(2023, 1.0)]);
        let result = linear_programming(&fx.input()).unwrap();
        // 180,000 reinvested at 15.24% plus 50,000 repaid at 5.6%
        assert_relative_eq!(result.value, 30_228.57, epsilon = 0.01);
        match result.details {
            AnalysisDetails::Optimization(d) => {
                assert_eq!(d.status, OptimizationStatus::Optimal);
                assert_relative_eq!(d.solution[0], 180_000.0, epsilon = 1e-6);
                assert_relative_eq!(d.solution[1], 50_000.0, epsilon = 1e-6);
                assert_relative_eq!(d.shadow_prices[0], 0.056, epsilon = 1e-4);
                assert_relative_eq!(d.shadow_prices[1], 0.0964, epsilon = 1e-4);
                assert_relative_eq!(d.shadow_prices[2], 0.0, epsilon = 1e-9);
            }
            other => panic!("unexpected details {:?}", other),
        }
    }

    #[test]
    fn test_infeasible_program_has_no_value() {
        let options = AnalysisOptions {
            linear_program: Some(LinearProgram {
                objective: vec![1.0],
                maximize: true,
                constraints: vec![
                    le(vec![1.0], 1.0),
                    LinearConstraint {
                        coefficients: vec![1.0],
                        kind: ConstraintKind::GreaterOrEqual,
                        rhs: 5.0,
                    },
                ],
            }),
            ..Default::default()
        };
        let fx = Fixture::new(vec![scaled_statement(2023, 1.0)]).with_options(options);
        let result = linear_programming(&fx.input()).unwrap();
        assert!(result.value.is_nan());
        assert_eq!(result.observations, vec![Observation::Infeasible]);
    }

    #[test]
    fn test_default_goals_are_met() {
        let fx = Fixture::new(vec![scaled_statement(2023, 1.0)]);
        let result = goal_programming(&fx.input()).unwrap();
        assert_relative_eq!(result.value, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_competing_goals_leave_weighted_shortfall() {
        let program = GoalProgram {
            variables: 2,
            goals: vec![
                Goal { coefficients: vec![1.0, 0.0], target: 80.0, under_weight: 2.0, over_weight: 0.0 },
                Goal { coefficients: vec![0.0, 1.0], target: 50.0, under_weight: 1.0, over_weight: 0.0 },
            ],
            hard_constraints: vec![le(vec![1.0, 1.0], 100.0)],
        };
        let lp = solve(&goal_to_linear(&program).unwrap()).unwrap();
        // The heavier goal is met in full, the other falls 30 short
        assert_relative_eq!(lp.objective_value.unwrap(), 30.0, epsilon = 1e-9);
        assert_relative_eq!(lp.solution[0], 80.0, epsilon = 1e-9);
        assert_relative_eq!(lp.solution[1], 20.0, epsilon = 1e-9);
    }
}
