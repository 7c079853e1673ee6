//! Descriptive statistics used by the comparative, statistical, simulation and
//! detection calculators.
//!
//! All functions accept any slice and degrade to 0 on empty or degenerate input
//! instead of producing NaN.

/// Compute the mean of a data slice.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// Compute sample standard deviation (n - 1).
pub fn std_dev(data: &[f64]) -> f64 {
    if data.len() < 2 {
        return 0.0;
    }
    let m = mean(data);
    let variance = data.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (data.len() - 1) as f64;
    variance.sqrt()
}

/// Population standard deviation (n). Used for peer samples, which are the
/// whole reference population.
pub fn population_std_dev(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let m = mean(data);
    let variance = data.iter().map(|x| (x - m).powi(2)).sum::<f64>() / data.len() as f64;
    variance.sqrt()
}

/// Coefficient of variation (σ / |mean|), 0 when the mean is 0.
pub fn coefficient_of_variation(data: &[f64]) -> f64 {
    let m = mean(data);
    if m.abs() < f64::EPSILON {
        return 0.0;
    }
    std_dev(data) / m.abs()
}

pub fn median(data: &[f64]) -> f64 {
    percentile_value(data, 50.0)
}

/// Sort ascending with NaN-safe ordering.
pub fn sorted(data: &[f64]) -> Vec<f64> {
    let mut out: Vec<f64> = data.to_vec();
    out.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    out
}

/// Compute a specific percentile value from data (0-100 scale), using linear
/// interpolation between closest ranks.
pub fn percentile_value(data: &[f64], pct: f64) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let sorted = sorted(data);
    percentile_of_sorted(&sorted, pct)
}

/// Same as [`percentile_value`] for data that is already sorted ascending.
pub fn percentile_of_sorted(sorted: &[f64], pct: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let rank = (pct.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    let weight = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * weight
}

/// Percentile rank of `value` within `peers` (0-100): the position the
/// value would take in the sorted peer array divided by the peer count.
/// Peers equal to the value count as below it.
pub fn percentile_rank(value: f64, peers: &[f64]) -> f64 {
    if peers.is_empty() {
        return 0.0;
    }
    let position = peers.iter().filter(|&&x| x <= value).count();
    position as f64 / peers.len() as f64 * 100.0
}

/// Compute the z-score of `value` relative to `data`.
/// Returns 0.0 if data has insufficient variance.
pub fn z_score_of(value: f64, data: &[f64]) -> f64 {
    let sd = population_std_dev(data);
    if sd < f64::EPSILON {
        return 0.0;
    }
    (value - mean(data)) / sd
}

/// Pearson correlation coefficient. 0 for fewer than two pairs or no variance.
pub fn correlation(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return 0.0;
    }
    let xs = &xs[..n];
    let ys = &ys[..n];
    let mx = mean(xs);
    let my = mean(ys);

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for i in 0..n {
        let dx = xs[i] - mx;
        let dy = ys[i] - my;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return 0.0;
    }
    cov / (var_x.sqrt() * var_y.sqrt())
}

/// Ordinary least squares fit of `ys` against 0..n.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
}

impl LinearFit {
    /// Predicted value at position `x` (0-based period index)
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

pub fn linear_fit(ys: &[f64]) -> Option<LinearFit> {
    let n = ys.len();
    if n < 2 {
        return None;
    }
    let xs: Vec<f64> = (0..n).map(|i| i as f64).collect();
    let mx = mean(&xs);
    let my = mean(ys);

    let sxx: f64 = xs.iter().map(|x| (x - mx).powi(2)).sum();
    let sxy: f64 = xs.iter().zip(ys).map(|(x, y)| (x - mx) * (y - my)).sum();
    if sxx == 0.0 {
        return None;
    }
    let slope = sxy / sxx;
    let intercept = my - slope * mx;

    let ss_tot: f64 = ys.iter().map(|y| (y - my).powi(2)).sum();
    let ss_res: f64 = xs
        .iter()
        .zip(ys)
        .map(|(x, y)| (y - (intercept + slope * x)).powi(2))
        .sum();
    let r_squared = if ss_tot == 0.0 { 1.0 } else { 1.0 - ss_res / ss_tot };

    Some(LinearFit {
        slope,
        intercept,
        r_squared,
    })
}

/// Determine if a value is an outlier relative to data (|z| > threshold).
pub fn is_outlier(value: f64, data: &[f64], z_threshold: f64) -> bool {
    z_score_of(value, data).abs() > z_threshold
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_percentile_rank() {
        let peers = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        assert_relative_eq!(percentile_rank(3.0, &peers), 60.0);
        assert_relative_eq!(percentile_rank(5.0, &peers), 100.0);
        assert_relative_eq!(percentile_rank(0.5, &peers), 0.0);
        assert_eq!(percentile_rank(3.0, &[]), 0.0);
    }

    #[test]
    fn test_z_score() {
        let data = vec![10.0, 20.0, 30.0, 40.0, 50.0];
        let z = z_score_of(30.0, &data);
        assert!(z.abs() < 0.01); // mean value should have z ≈ 0
        assert_eq!(z_score_of(5.0, &[3.0, 3.0, 3.0]), 0.0);
    }

    #[test]
    fn test_percentile_value_interpolates() {
        let data = vec![4.0, 1.0, 3.0, 2.0];
        assert_relative_eq!(percentile_value(&data, 50.0), 2.5);
        assert_relative_eq!(percentile_value(&data, 0.0), 1.0);
        assert_relative_eq!(percentile_value(&data, 100.0), 4.0);
    }

    #[test]
    fn test_linear_fit_exact_line() {
        let fit = linear_fit(&[2.0, 4.0, 6.0, 8.0]).unwrap();
        assert_relative_eq!(fit.slope, 2.0, epsilon = 1e-12);
        assert_relative_eq!(fit.intercept, 2.0, epsilon = 1e-12);
        assert_relative_eq!(fit.r_squared, 1.0, epsilon = 1e-12);
        assert_relative_eq!(fit.predict(4.0), 10.0, epsilon = 1e-12);
        assert!(linear_fit(&[1.0]).is_none());
    }

    #[test]
    fn test_correlation() {
        assert_relative_eq!(correlation(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]), 1.0, epsilon = 1e-12);
        assert_relative_eq!(correlation(&[1.0, 2.0, 3.0], &[6.0, 4.0, 2.0]), -1.0, epsilon = 1e-12);
        assert_eq!(correlation(&[1.0, 1.0], &[2.0, 3.0]), 0.0);
    }
}
