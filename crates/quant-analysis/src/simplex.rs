//! Dense two-phase simplex over an `nalgebra` tableau.
//!
//! Bland's rule picks both the entering and the leaving column, so degenerate
//! programmes terminate. Shadow prices are read off the final objective row
//! and reported as d(objective)/d(rhs) of each constraint as supplied.

use analysis_core::{AnalysisError, ConstraintKind, LinearProgram, OptimizationStatus};
use nalgebra::DMatrix;

const EPS: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq)]
pub struct LpSolution {
    pub status: OptimizationStatus,
    pub objective_value: Option<f64>,
    pub solution: Vec<f64>,
    pub shadow_prices: Vec<f64>,
}

impl LpSolution {
    fn without_optimum(status: OptimizationStatus) -> Self {
        Self {
            status,
            objective_value: None,
            solution: Vec::new(),
            shadow_prices: Vec::new(),
        }
    }
}

fn validate(program: &LinearProgram) -> Result<(), AnalysisError> {
    let n = program.objective.len();
    if n == 0 {
        return Err(AnalysisError::input("linear programme has no decision variables"));
    }
    if program.objective.iter().any(|c| !c.is_finite()) {
        return Err(AnalysisError::input("objective coefficients must be finite"));
    }
    for (i, constraint) in program.constraints.iter().enumerate() {
        if constraint.coefficients.len() != n {
            return Err(AnalysisError::input(format!(
                "constraint {} has {} coefficients, expected {}",
                i,
                constraint.coefficients.len(),
                n
            )));
        }
        if !constraint.rhs.is_finite() || constraint.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(AnalysisError::input(format!("constraint {} is not finite", i)));
        }
    }
    Ok(())
}

enum Outcome {
    Optimal,
    Unbounded,
}

struct Tableau {
    t: DMatrix<f64>,
    basis: Vec<usize>,
    rows: usize,
    rhs: usize,
}

impl Tableau {
    fn objective_row(&self) -> usize {
        self.rows
    }

    fn pivot(&mut self, row: usize, col: usize) {
        let p = self.t[(row, col)];
        {
            let mut pivot_row = self.t.row_mut(row);
            pivot_row /= p;
        }
        let pivot_row = self.t.row(row).clone_owned();
        for i in 0..self.t.nrows() {
            if i == row {
                continue;
            }
            let factor = self.t[(i, col)];
            if factor != 0.0 {
                let mut target = self.t.row_mut(i);
                target -= &pivot_row * factor;
            }
        }
        self.basis[row] = col;
    }

    /// Rewrite the objective row so every basic column has a zero reduced cost
    fn price_out(&mut self) {
        let z = self.objective_row();
        for row in 0..self.rows {
            let factor = self.t[(z, self.basis[row])];
            if factor != 0.0 {
                let source = self.t.row(row).clone_owned();
                let mut target = self.t.row_mut(z);
                target -= &source * factor;
            }
        }
    }

    /// Maximize the objective row over the first `allowed` columns
    fn run(&mut self, allowed: usize) -> Result<Outcome, AnalysisError> {
        let z = self.objective_row();
        let limit = 50 * (self.rows + self.rhs + 1);
        for _ in 0..limit {
            let entering = match (0..allowed).find(|&j| self.t[(z, j)] < -EPS) {
                Some(j) => j,
                None => return Ok(Outcome::Optimal),
            };

            let mut leaving: Option<(usize, f64)> = None;
            for i in 0..self.rows {
                let a = self.t[(i, entering)];
                if a <= EPS {
                    continue;
                }
                let ratio = self.t[(i, self.rhs)] / a;
                leaving = match leaving {
                    None => Some((i, ratio)),
                    Some((best, best_ratio)) => {
                        if ratio < best_ratio - EPS
                            || ((ratio - best_ratio).abs() <= EPS && self.basis[i] < self.basis[best])
                        {
                            Some((i, ratio))
                        } else {
                            Some((best, best_ratio))
                        }
                    }
                };
            }
            match leaving {
                Some((row, _)) => self.pivot(row, entering),
                None => return Ok(Outcome::Unbounded),
            }
        }
        Err(AnalysisError::calculation("simplex did not converge"))
    }
}

/// Solve `max/min objective·x` subject to the constraints and `x ≥ 0`.
pub fn solve(program: &LinearProgram) -> Result<LpSolution, AnalysisError> {
    validate(program)?;
    let n = program.objective.len();
    let m = program.constraints.len();

    // Normalize every row to a non-negative right-hand side
    let rows: Vec<(Vec<f64>, ConstraintKind, f64, bool)> = program
        .constraints
        .iter()
        .map(|c| {
            if c.rhs < 0.0 {
                let kind = match c.kind {
                    ConstraintKind::LessOrEqual => ConstraintKind::GreaterOrEqual,
                    ConstraintKind::GreaterOrEqual => ConstraintKind::LessOrEqual,
                    ConstraintKind::Equal => ConstraintKind::Equal,
                };
                (c.coefficients.iter().map(|a| -a).collect(), kind, -c.rhs, true)
            } else {
                (c.coefficients.clone(), c.kind, c.rhs, false)
            }
        })
        .collect();

    let slack_count = rows.iter().filter(|r| r.1 != ConstraintKind::Equal).count();
    let artificial_count = rows.iter().filter(|r| r.1 != ConstraintKind::LessOrEqual).count();
    let artificial_start = n + slack_count;
    let columns = artificial_start + artificial_count;

    let mut t = DMatrix::<f64>::zeros(m + 1, columns + 1);
    let mut basis = vec![0; m];
    // Column holding each row's slack, surplus or artificial, for the duals
    let mut dual_column = vec![0; m];
    let mut next_slack = n;
    let mut next_artificial = artificial_start;

    for (i, (coefficients, kind, rhs, _)) in rows.iter().enumerate() {
        for (j, a) in coefficients.iter().enumerate() {
            t[(i, j)] = *a;
        }
        t[(i, columns)] = *rhs;
        match kind {
            ConstraintKind::LessOrEqual => {
                t[(i, next_slack)] = 1.0;
                basis[i] = next_slack;
                dual_column[i] = next_slack;
                next_slack += 1;
            }
            ConstraintKind::GreaterOrEqual => {
                t[(i, next_slack)] = -1.0;
                t[(i, next_artificial)] = 1.0;
                basis[i] = next_artificial;
                dual_column[i] = next_slack;
                next_slack += 1;
                next_artificial += 1;
            }
            ConstraintKind::Equal => {
                t[(i, next_artificial)] = 1.0;
                basis[i] = next_artificial;
                dual_column[i] = next_artificial;
                next_artificial += 1;
            }
        }
    }

    let mut tableau = Tableau {
        t,
        basis,
        rows: m,
        rhs: columns,
    };

    // Phase 1: maximize −Σ artificials
    if artificial_count > 0 {
        for j in artificial_start..columns {
            tableau.t[(m, j)] = 1.0;
        }
        tableau.price_out();
        tableau.run(columns)?;
        if tableau.t[(m, columns)] < -1e-7 {
            return Ok(LpSolution::without_optimum(OptimizationStatus::Infeasible));
        }
        // Drive zero-valued artificials out of the basis where possible
        for row in 0..m {
            if tableau.basis[row] >= artificial_start {
                if let Some(col) = (0..artificial_start).find(|&j| tableau.t[(row, j)].abs() > EPS) {
                    tableau.pivot(row, col);
                }
            }
        }
    }

    // Phase 2: the real objective, always maximized internally
    let sense = if program.maximize { 1.0 } else { -1.0 };
    for j in 0..=columns {
        tableau.t[(m, j)] = 0.0;
    }
    for (j, c) in program.objective.iter().enumerate() {
        tableau.t[(m, j)] = -sense * c;
    }
    tableau.price_out();
    if let Outcome::Unbounded = tableau.run(artificial_start)? {
        return Ok(LpSolution::without_optimum(OptimizationStatus::Unbounded));
    }

    let mut solution = vec![0.0; n];
    for (row, &col) in tableau.basis.iter().enumerate() {
        if col < n {
            solution[col] = tableau.t[(row, columns)];
        }
    }
    let objective_value: f64 = program
        .objective
        .iter()
        .zip(&solution)
        .map(|(c, x)| c * x)
        .sum();

    let shadow_prices = rows
        .iter()
        .enumerate()
        .map(|(i, (_, kind, _, flipped))| {
            let reduced = tableau.t[(m, dual_column[i])];
            let dual = match kind {
                ConstraintKind::GreaterOrEqual => -reduced,
                _ => reduced,
            };
            let dual = if *flipped { -dual } else { dual };
            let price = sense * dual;
            if price.abs() < EPS {
                0.0
            } else {
                price
            }
        })
        .collect();

    Ok(LpSolution {
        status: OptimizationStatus::Optimal,
        objective_value: Some(objective_value),
        solution,
        shadow_prices,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::LinearConstraint;
    use approx::assert_relative_eq;

    fn le(coefficients: &[f64], rhs: f64) -> LinearConstraint {
        LinearConstraint {
            coefficients: coefficients.to_vec(),
            kind: ConstraintKind::LessOrEqual,
            rhs,
        }
    }

    #[test]
    fn test_textbook_maximization_with_shadow_prices() {
        let program = LinearProgram {
            objective: vec![3.0, 5.0],
            maximize: true,
            constraints: vec![le(&[1.0, 0.0], 4.0), le(&[0.0, 2.0], 12.0), le(&[3.0, 2.0], 18.0)],
        };
        let lp = solve(&program).unwrap();
        assert_eq!(lp.status, OptimizationStatus::Optimal);
        assert_relative_eq!(lp.objective_value.unwrap(), 36.0, epsilon = 1e-9);
        assert_relative_eq!(lp.solution[0], 2.0, epsilon = 1e-9);
        assert_relative_eq!(lp.solution[1], 6.0, epsilon = 1e-9);
        assert_relative_eq!(lp.shadow_prices[0], 0.0, epsilon = 1e-9);
        assert_relative_eq!(lp.shadow_prices[1], 1.5, epsilon = 1e-9);
        assert_relative_eq!(lp.shadow_prices[2], 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_minimization_with_mixed_constraints() {
        let program = LinearProgram {
            objective: vec![2.0, 3.0],
            maximize: false,
            constraints: vec![
                LinearConstraint {
                    coefficients: vec![1.0, 1.0],
                    kind: ConstraintKind::GreaterOrEqual,
                    rhs: 10.0,
                },
                LinearConstraint {
                    coefficients: vec![1.0, 0.0],
                    kind: ConstraintKind::Equal,
                    rhs: 4.0,
                },
            ],
        };
        let lp = solve(&program).unwrap();
        assert_eq!(lp.status, OptimizationStatus::Optimal);
        assert_relative_eq!(lp.solution[0], 4.0, epsilon = 1e-9);
        assert_relative_eq!(lp.solution[1], 6.0, epsilon = 1e-9);
        assert_relative_eq!(lp.objective_value.unwrap(), 26.0, epsilon = 1e-9);
        assert_relative_eq!(lp.shadow_prices[0], 3.0, epsilon = 1e-9);
        assert_relative_eq!(lp.shadow_prices[1], -1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_negative_rhs_is_normalized() {
        // −x ≥ −4 is x ≤ 4
        let program = LinearProgram {
            objective: vec![1.0],
            maximize: true,
            constraints: vec![LinearConstraint {
                coefficients: vec![-1.0],
                kind: ConstraintKind::GreaterOrEqual,
                rhs: -4.0,
            }],
        };
        let lp = solve(&program).unwrap();
        assert_relative_eq!(lp.solution[0], 4.0, epsilon = 1e-9);
        // Raising the rhs of −x ≥ b tightens x ≤ −b
        assert_relative_eq!(lp.shadow_prices[0], -1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_infeasible() {
        let program = LinearProgram {
            objective: vec![1.0],
            maximize: true,
            constraints: vec![
                le(&[1.0], 1.0),
                LinearConstraint {
                    coefficients: vec![1.0],
                    kind: ConstraintKind::GreaterOrEqual,
                    rhs: 2.0,
                },
            ],
        };
        assert_eq!(solve(&program).unwrap().status, OptimizationStatus::Infeasible);
    }

    #[test]
    fn test_unbounded() {
        let program = LinearProgram {
            objective: vec![1.0, 1.0],
            maximize: true,
            constraints: vec![le(&[1.0, -1.0], 1.0)],
        };
        let lp = solve(&program).unwrap();
        assert_eq!(lp.status, OptimizationStatus::Unbounded);
        assert!(lp.objective_value.is_none());
    }

    #[test]
    fn test_mismatched_coefficients_rejected() {
        let program = LinearProgram {
            objective: vec![1.0, 1.0],
            maximize: true,
            constraints: vec![le(&[1.0], 1.0)],
        };
        assert!(matches!(solve(&program), Err(AnalysisError::InputData(_))));
    }
}
