//! Benchmark evaluation.
//!
//! A value is compared to its benchmark in the metric's declared preferred
//! direction and mapped to an ordinal rating.

use serde::{Deserialize, Serialize};

use crate::{Direction, Language, LocalizedText};

/// Qualitative benchmark rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    Excellent,
    Good,
    Average,
    Weak,
    Poor,
    Unrated,
}

impl Rating {
    /// Favorable ratings feed strengths; all others (including unrated)
    /// count as unfavorable in the executive summary.
    pub fn is_favorable(&self) -> bool {
        matches!(self, Rating::Excellent | Rating::Good | Rating::Average)
    }

    pub fn label(&self) -> LocalizedText {
        match self {
            Rating::Excellent => LocalizedText::new("Excellent", "ممتاز"),
            Rating::Good => LocalizedText::new("Good", "جيد"),
            Rating::Average => LocalizedText::new("Average", "مقبول"),
            Rating::Weak => LocalizedText::new("Weak", "ضعيف"),
            Rating::Poor => LocalizedText::new("Poor", "سيئ"),
            Rating::Unrated => LocalizedText::new("Not rated", "غير مقيم"),
        }
    }

    pub fn localized(&self, language: Language) -> &'static str {
        self.label().get(language)
    }
}

/// Relative deviation of `value` from `benchmark`. Falls back to the absolute
/// difference when the benchmark is 0.
fn relative_deviation(value: f64, benchmark: f64) -> f64 {
    if benchmark == 0.0 {
        value - benchmark
    } else {
        (value - benchmark) / benchmark.abs()
    }
}

/// Rate `value` against `benchmark` in the given preferred direction.
///
/// Higher-is-better: value ≥ benchmark is at least `Good`.
/// Lower-is-better: value ≤ benchmark is at least `Good`.
/// Closer-is-better: rated on the absolute relative distance.
pub fn evaluate(value: f64, benchmark: Option<f64>, direction: Direction) -> Rating {
    let benchmark = match benchmark {
        Some(b) if b.is_finite() => b,
        _ => return Rating::Unrated,
    };
    if !value.is_finite() {
        return Rating::Unrated;
    }

    match direction {
        Direction::HigherIsBetter | Direction::LowerIsBetter => {
            let mut deviation = relative_deviation(value, benchmark);
            if direction == Direction::LowerIsBetter {
                deviation = -deviation;
            }
            if deviation >= 0.20 {
                Rating::Excellent
            } else if deviation >= 0.0 {
                Rating::Good
            } else if deviation >= -0.10 {
                Rating::Average
            } else if deviation >= -0.30 {
                Rating::Weak
            } else {
                Rating::Poor
            }
        }
        Direction::CloserIsBetter => {
            let distance = relative_deviation(value, benchmark).abs();
            if distance <= 0.05 {
                Rating::Excellent
            } else if distance <= 0.10 {
                Rating::Good
            } else if distance <= 0.25 {
                Rating::Average
            } else if distance <= 0.50 {
                Rating::Weak
            } else {
                Rating::Poor
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_higher_is_better() {
        assert_eq!(evaluate(1.5, Some(1.5), Direction::HigherIsBetter), Rating::Good);
        assert_eq!(evaluate(2.0, Some(1.5), Direction::HigherIsBetter), Rating::Excellent);
        assert_eq!(evaluate(1.4, Some(1.5), Direction::HigherIsBetter), Rating::Average);
        assert_eq!(evaluate(1.2, Some(1.5), Direction::HigherIsBetter), Rating::Weak);
        assert_eq!(evaluate(0.5, Some(1.5), Direction::HigherIsBetter), Rating::Poor);
    }

    #[test]
    fn test_lower_is_better_inverts() {
        // Debt-to-equity of 2.0 against an industry 1.0 is bad, not good
        assert_eq!(evaluate(2.0, Some(1.0), Direction::LowerIsBetter), Rating::Poor);
        assert_eq!(evaluate(0.7, Some(1.0), Direction::LowerIsBetter), Rating::Excellent);
        assert_eq!(evaluate(1.0, Some(1.0), Direction::LowerIsBetter), Rating::Good);
    }

    #[test]
    fn test_closer_is_better() {
        assert_eq!(evaluate(51.0, Some(50.0), Direction::CloserIsBetter), Rating::Excellent);
        assert_eq!(evaluate(40.0, Some(50.0), Direction::CloserIsBetter), Rating::Average);
        assert_eq!(evaluate(90.0, Some(50.0), Direction::CloserIsBetter), Rating::Poor);
    }

    #[test]
    fn test_zero_benchmark_uses_absolute_difference() {
        assert_eq!(evaluate(137.2, Some(0.0), Direction::HigherIsBetter), Rating::Excellent);
        assert_eq!(evaluate(-0.05, Some(0.0), Direction::HigherIsBetter), Rating::Average);
        assert_eq!(evaluate(-50.0, Some(0.0), Direction::HigherIsBetter), Rating::Poor);
    }

    #[test]
    fn test_missing_benchmark_is_unrated() {
        assert_eq!(evaluate(1.0, None, Direction::HigherIsBetter), Rating::Unrated);
        assert!(!Rating::Unrated.is_favorable());
        assert!(Rating::Average.is_favorable());
    }
}
