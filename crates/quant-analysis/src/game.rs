//! Two-player, two-strategy pricing game.

use analysis_core::numeric::{round2, round_to};
use analysis_core::{
    AnalysisDetails, AnalysisError, CalculationInput, ChartHint, Computation, Observation,
    OptimizationDetails, PayoffMatrix,
};

/// Margin given up by a price cut, in margin points
const PRICE_CUT: f64 = 0.05;
/// Share of volume won from (or lost to) the rival by undercutting
const SHARE_SHIFT: f64 = 0.15;

#[derive(Debug, Clone, PartialEq)]
pub struct Equilibrium {
    /// Probability the company plays its first strategy
    pub row_strategy: f64,
    /// Probability the rival plays its first strategy
    pub column_strategy: f64,
    pub row_payoff: f64,
    pub column_payoff: f64,
    /// `(i, j)` for a pure equilibrium
    pub pure: Option<(usize, usize)>,
}

impl Equilibrium {
    pub fn label(&self) -> String {
        match self.pure {
            Some((i, j)) => format!("pure ({}, {})", i, j),
            None => "mixed".to_string(),
        }
    }
}

/// Supplied matrix, or hold price (0) vs cut price (1) on current revenue R
/// and operating margin m. Holding against holding earns R·m each; a lone
/// cutter earns R·1.15·(m − 0.05) while the holder keeps R·0.85·m; a price
/// war earns R·(m − 0.05) each.
pub fn pricing_game(input: &CalculationInput<'_>) -> Result<PayoffMatrix, AnalysisError> {
    if let Some(game) = &input.options.game {
        return Ok(game.clone());
    }
    let income = &input.latest()?.income_statement;
    if income.revenue <= 0.0 {
        return Err(AnalysisError::input("pricing game needs positive revenue"));
    }
    let r = income.revenue;
    let m = income.operating_income / r;

    let hold = r * m;
    let undercut = r * (1.0 + SHARE_SHIFT) * (m - PRICE_CUT);
    let undercut_victim = r * (1.0 - SHARE_SHIFT) * m;
    let war = r * (m - PRICE_CUT);

    Ok(PayoffMatrix {
        row: [[hold, undercut_victim], [undercut, war]],
        column: [[hold, undercut], [undercut_victim, war]],
    })
}

/// Pure Nash equilibria first (the one best for the company if several),
/// otherwise the mixed equilibrium from the indifference conditions.
pub fn solve_game(game: &PayoffMatrix) -> Result<Equilibrium, AnalysisError> {
    let r = &game.row;
    let c = &game.column;
    if r.iter().chain(c.iter()).flatten().any(|v| !v.is_finite()) {
        return Err(AnalysisError::input("payoffs must be finite"));
    }

    let mut best: Option<(usize, usize)> = None;
    for i in 0..2 {
        for j in 0..2 {
            let row_best = r[i][j] >= r[1 - i][j];
            let column_best = c[i][j] >= c[i][1 - j];
            if row_best && column_best && best.map_or(true, |(bi, bj)| r[i][j] > r[bi][bj]) {
                best = Some((i, j));
            }
        }
    }
    if let Some((i, j)) = best {
        let indicator = |k: usize| if k == 0 { 1.0 } else { 0.0 };
        return Ok(Equilibrium {
            row_strategy: indicator(i),
            column_strategy: indicator(j),
            row_payoff: r[i][j],
            column_payoff: c[i][j],
            pure: Some((i, j)),
        });
    }

    // Rival mixes q to make the company indifferent; company mixes p likewise
    let q_den = r[0][0] - r[0][1] - r[1][0] + r[1][1];
    let p_den = c[0][0] - c[1][0] - c[0][1] + c[1][1];
    if q_den == 0.0 || p_den == 0.0 {
        return Err(AnalysisError::calculation("degenerate game has no mixed equilibrium"));
    }
    let q = (r[1][1] - r[0][1]) / q_den;
    let p = (c[1][1] - c[1][0]) / p_den;

    Ok(Equilibrium {
        row_strategy: p,
        column_strategy: q,
        row_payoff: q * r[0][0] + (1.0 - q) * r[0][1],
        column_payoff: p * c[0][0] + (1.0 - p) * c[1][0],
        pure: None,
    })
}

/// Company payoff at equilibrium, rated against both players holding price
pub fn game_theory_equilibrium(input: &CalculationInput<'_>) -> Result<Computation, AnalysisError> {
    let game = pricing_game(input)?;
    let eq = solve_game(&game)?;
    let value = round2(eq.row_payoff);

    let details = OptimizationDetails {
        objective_value: Some(value),
        solution: vec![round_to(eq.row_strategy, 4), round_to(eq.column_strategy, 4)],
        equilibrium: Some(eq.label()),
        ..Default::default()
    };
    Ok(Computation::new(value, AnalysisDetails::Optimization(details))
        .observe(Observation::Equilibrium { pure: eq.pure.is_some() })
        .with_benchmark(Some(round2(game.row[0][0])))
        .chart(ChartHint::Table))
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::fixtures::{scaled_statement, Fixture};
    use approx::assert_relative_eq;

    #[test]
    fn test_prisoners_dilemma_pure_equilibrium() {
        let game = PayoffMatrix {
            row: [[3.0, 0.0], [5.0, 1.0]],
            column: [[3.0, 5.0], [0.0, 1.0]],
        };
        let eq = solve_game(&game).unwrap();
        assert_eq!(eq.pure, Some((1, 1)));
        assert_eq!(eq.label(), "pure (1, 1)");
        assert_relative_eq!(eq.row_payoff, 1.0);
    }

    #[test]
    fn test_matching_pennies_mixed() {
        let game = PayoffMatrix {
            row: [[1.0, -1.0], [-1.0, 1.0]],
            column: [[-1.0, 1.0], [1.0, -1.0]],
        };
        let eq = solve_game(&game).unwrap();
        assert!(eq.pure.is_none());
        assert_relative_eq!(eq.row_strategy, 0.5);
        assert_relative_eq!(eq.column_strategy, 0.5);
        assert_relative_eq!(eq.row_payoff, 0.0);
    }

    #[test]
    fn test_default_pricing_game() {
        // m = 20%: holding earns 200,000, undercutting 172,500, so holding is stable
        let fx = Fixture::new(vec![scaled_statement(2023, 1.0)]);
        let result = game_theory_equilibrium(&fx.input()).unwrap();
        assert_relative_eq!(result.value, 200_000.0);
        assert_eq!(result.observations, vec![Observation::Equilibrium { pure: true }]);
        assert_eq!(result.benchmark, Some(200_000.0));
    }
}
