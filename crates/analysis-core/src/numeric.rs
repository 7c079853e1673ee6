//! Guarded arithmetic and rounding helpers shared by every calculator.
//!
//! Division never surfaces NaN or Infinity: a zero denominator yields 0.

use crate::AnalysisError;

/// Round to `dp` decimal places, half away from zero.
pub fn round_to(value: f64, dp: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(dp as i32);
    (value * factor).round() / factor
}

pub fn round2(value: f64) -> f64 {
    round_to(value, 2)
}

/// Plain division, 0 when the denominator is 0.
pub fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 || !denominator.is_finite() {
        return 0.0;
    }
    let out = numerator / denominator;
    if out.is_finite() {
        out
    } else {
        0.0
    }
}

/// `numerator / denominator` rounded to 2 dp; 0 when the denominator is 0.
pub fn ratio(numerator: f64, denominator: f64) -> f64 {
    round2(safe_div(numerator, denominator))
}

/// `part / whole × 100` rounded to 2 dp; 0 when the whole is 0.
pub fn percentage(part: f64, whole: f64) -> f64 {
    round2(safe_div(part, whole) * 100.0)
}

/// `balance / flow × days`, rounded to 2 dp.
pub fn days(balance: f64, flow: f64, days_in_year: f64) -> f64 {
    round2(safe_div(balance, flow) * days_in_year)
}

/// Same as [`days`] but rounded to the nearest whole day.
pub fn whole_days(balance: f64, flow: f64, days_in_year: f64) -> f64 {
    (safe_div(balance, flow) * days_in_year).round()
}

/// Percentage change from `previous` to `current`; 0 when `previous` is 0.
pub fn pct_change(previous: f64, current: f64) -> f64 {
    if previous == 0.0 {
        return 0.0;
    }
    round2((current - previous) / previous * 100.0)
}

/// Reject NaN/Infinity before a value leaves a calculator.
pub fn ensure_finite(value: f64, what: &str) -> Result<f64, AnalysisError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(AnalysisError::calculation(format!("{} is not a finite number", what)))
    }
}

/// Require a strictly positive input, otherwise report insufficient data.
pub fn require_positive(value: f64, what: &str) -> Result<f64, AnalysisError> {
    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(AnalysisError::input(format!("{} must be positive", what)))
    }
}

/// Require a non-zero denominator, otherwise report insufficient data.
pub fn require_nonzero(value: f64, what: &str) -> Result<f64, AnalysisError> {
    if value != 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(AnalysisError::input(format!("{} is zero or missing", what)))
    }
}

/// Format a number with thousands separators and 2 decimals.
pub fn format_amount(value: f64) -> String {
    let rounded = round2(value);
    let negative = rounded < 0.0;
    let text = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if negative {
        format!("-{}.{}", grouped, frac_part)
    } else {
        format!("{}.{}", grouped, frac_part)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_zero_denominator() {
        for x in [-1.0e9, -3.5, 0.0, 1.0, 42.0, 7.0e12] {
            assert_eq!(ratio(x, 0.0), 0.0);
            assert!(ratio(x, 0.0).is_finite());
        }
    }

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(50.0, 200.0), 25.00);
        assert_eq!(percentage(123.0, 0.0), 0.0);
        assert_eq!(percentage(1.0, 3.0), 33.33);
    }

    #[test]
    fn test_days_rounding() {
        assert_eq!(days(100.0, 1000.0, 365.0), 36.5);
        assert_eq!(whole_days(100.0, 1000.0, 365.0), 37.0);
        assert_eq!(whole_days(5.0, 0.0, 365.0), 0.0);
    }

    #[test]
    fn test_pct_change() {
        assert_eq!(pct_change(100.0, 110.0), 10.0);
        assert_eq!(pct_change(0.0, 110.0), 0.0);
        assert_eq!(pct_change(200.0, 150.0), -25.0);
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(1234567.891), "1,234,567.89");
        assert_eq!(format_amount(-999.5), "-999.50");
        assert_eq!(format_amount(0.0), "0.00");
    }

    #[test]
    fn test_ensure_finite() {
        assert!(ensure_finite(f64::NAN, "x").is_err());
        assert!(ensure_finite(f64::INFINITY, "x").is_err());
        assert_eq!(ensure_finite(1.5, "x").unwrap(), 1.5);
    }
}
