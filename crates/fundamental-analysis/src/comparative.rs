//! Peer and industry comparisons: percentile rank, gap to the industry
//! average and z-score over the peer sample.

use analysis_core::numeric::{percentage, ratio, require_nonzero, round2};
use analysis_core::stats::{mean, median, percentile_rank, population_std_dev, z_score_of};
use analysis_core::{
    AnalysisDetails, AnalysisError, BenchmarkSet, CalculationInput, ChartHint, ComparativeDetails,
    Computation, Observation,
};

use crate::metric::latest_growth;

type CalcResult = Result<Computation, AnalysisError>;

pub const CURRENT_RATIO: &str = "liquidity.currentRatio";
pub const ROE: &str = "profitability.roe";
pub const NET_MARGIN: &str = "profitability.netMargin";
pub const DEBT_TO_EQUITY: &str = "leverage.debtToEquity";
pub const ASSET_TURNOVER: &str = "activity.assetTurnover";
pub const REVENUE_GROWTH: &str = "growth.revenue";

/// Metrics feeding the composite score, with whether lower is better
const COMPOSITE_METRICS: [(&str, bool); 6] = [
    (CURRENT_RATIO, false),
    (ROE, false),
    (NET_MARGIN, false),
    (DEBT_TO_EQUITY, true),
    (ASSET_TURNOVER, false),
    (REVENUE_GROWTH, false),
];

/// The company's own value for a benchmark metric key, on the same scale
/// peers report it.
pub fn company_metric(input: &CalculationInput<'_>, key: &str) -> Result<f64, AnalysisError> {
    let latest = input.latest()?;
    let bs = &latest.balance_sheet;
    let is = &latest.income_statement;
    match key {
        CURRENT_RATIO => {
            require_nonzero(bs.total_current_liabilities, "current liabilities")?;
            Ok(ratio(bs.total_current_assets, bs.total_current_liabilities))
        }
        ROE => {
            require_nonzero(bs.total_equity, "equity")?;
            Ok(percentage(is.net_income, bs.total_equity))
        }
        NET_MARGIN => {
            require_nonzero(is.revenue, "revenue")?;
            Ok(percentage(is.net_income, is.revenue))
        }
        DEBT_TO_EQUITY => {
            require_nonzero(bs.total_equity, "equity")?;
            Ok(ratio(bs.total_liabilities, bs.total_equity))
        }
        ASSET_TURNOVER => {
            require_nonzero(bs.total_assets, "total assets")?;
            Ok(ratio(is.revenue, bs.total_assets))
        }
        REVENUE_GROWTH => latest_growth(input, |s| s.income_statement.revenue),
        other => Err(AnalysisError::calculation(format!(
            "no company metric is defined for '{}'",
            other
        ))),
    }
}

fn benchmarks<'a>(input: &CalculationInput<'a>) -> Result<&'a BenchmarkSet, AnalysisError> {
    input
        .benchmarks
        .ok_or_else(|| AnalysisError::BenchmarkUnavailable("no benchmark set for this classification".to_string()))
}

fn peers_for(input: &CalculationInput<'_>, key: &str, min: usize) -> Result<Vec<f64>, AnalysisError> {
    let peers = benchmarks(input)?.peer_values(key);
    if peers.len() < min {
        return Err(AnalysisError::BenchmarkUnavailable(format!(
            "{} peer values for '{}', at least {} required",
            peers.len(),
            key,
            min
        )));
    }
    Ok(peers)
}

fn peer_details(key: &str, value: f64, peers: &[f64]) -> ComparativeDetails {
    ComparativeDetails {
        metric: key.to_string(),
        company_value: value,
        peer_count: peers.len(),
        percentile_rank: Some(round2(percentile_rank(value, peers))),
        peer_mean: Some(round2(mean(peers))),
        peer_median: Some(round2(median(peers))),
        peer_std_dev: Some(round2(population_std_dev(peers))),
        z_score: Some(round2(z_score_of(value, peers))),
        gap: None,
    }
}

fn peer_percentile(input: &CalculationInput<'_>, key: &str) -> CalcResult {
    let value = company_metric(input, key)?;
    let peers = peers_for(input, key, 1)?;
    let rank = round2(percentile_rank(value, &peers));

    Ok(Computation::new(rank, AnalysisDetails::Comparative(peer_details(key, value, &peers)))
        .observe(Observation::PeerPosition {
            percentile: rank,
            peers: peers.len(),
        })
        // The peer median sits at the 50th percentile.
        .with_benchmark(Some(50.0))
        .chart(ChartHint::Bar))
}

fn industry_gap(input: &CalculationInput<'_>, key: &str) -> CalcResult {
    let value = company_metric(input, key)?;
    let industry = benchmarks(input)?.ratio(key).ok_or_else(|| {
        AnalysisError::BenchmarkUnavailable(format!("no industry average for '{}'", key))
    })?;
    let gap = round2(value - industry);

    let details = ComparativeDetails {
        metric: key.to_string(),
        company_value: value,
        gap: Some(gap),
        ..Default::default()
    };
    Ok(Computation::new(gap, AnalysisDetails::Comparative(details))
        .observe(Observation::BenchmarkGap { gap })
        .with_benchmark(Some(0.0))
        .chart(ChartHint::Bar))
}

fn peer_z_score(input: &CalculationInput<'_>, key: &str) -> CalcResult {
    let value = company_metric(input, key)?;
    let peers = peers_for(input, key, 2)?;
    let z = round2(z_score_of(value, &peers));

    Ok(Computation::new(z, AnalysisDetails::Comparative(peer_details(key, value, &peers)))
        .observe(Observation::PeerZScore { z })
        .with_benchmark(Some(0.0))
        .chart(ChartHint::Histogram))
}

pub fn percentile_current_ratio(input: &CalculationInput<'_>) -> CalcResult {
    peer_percentile(input, CURRENT_RATIO)
}

pub fn percentile_roe(input: &CalculationInput<'_>) -> CalcResult {
    peer_percentile(input, ROE)
}

pub fn percentile_net_margin(input: &CalculationInput<'_>) -> CalcResult {
    peer_percentile(input, NET_MARGIN)
}

pub fn percentile_debt_to_equity(input: &CalculationInput<'_>) -> CalcResult {
    peer_percentile(input, DEBT_TO_EQUITY)
}

pub fn percentile_asset_turnover(input: &CalculationInput<'_>) -> CalcResult {
    peer_percentile(input, ASSET_TURNOVER)
}

pub fn percentile_revenue_growth(input: &CalculationInput<'_>) -> CalcResult {
    peer_percentile(input, REVENUE_GROWTH)
}

pub fn gap_current_ratio(input: &CalculationInput<'_>) -> CalcResult {
    industry_gap(input, CURRENT_RATIO)
}

pub fn gap_roe(input: &CalculationInput<'_>) -> CalcResult {
    industry_gap(input, ROE)
}

pub fn gap_net_margin(input: &CalculationInput<'_>) -> CalcResult {
    industry_gap(input, NET_MARGIN)
}

pub fn gap_debt_to_equity(input: &CalculationInput<'_>) -> CalcResult {
    industry_gap(input, DEBT_TO_EQUITY)
}

pub fn zscore_roe(input: &CalculationInput<'_>) -> CalcResult {
    peer_z_score(input, ROE)
}

pub fn zscore_net_margin(input: &CalculationInput<'_>) -> CalcResult {
    peer_z_score(input, NET_MARGIN)
}

pub fn zscore_debt_to_equity(input: &CalculationInput<'_>) -> CalcResult {
    peer_z_score(input, DEBT_TO_EQUITY)
}

/// Company revenue growth minus the sector's latest historical growth
pub fn sector_growth_relative(input: &CalculationInput<'_>) -> CalcResult {
    let growth = company_metric(input, REVENUE_GROWTH)?;
    let set = benchmarks(input)?;
    let sector = set
        .history(REVENUE_GROWTH)
        .and_then(|h| h.last().copied())
        .or_else(|| set.ratio(REVENUE_GROWTH))
        .ok_or_else(|| AnalysisError::BenchmarkUnavailable("no sector growth history".to_string()))?;
    let gap = round2(growth - sector);

    let details = ComparativeDetails {
        metric: REVENUE_GROWTH.to_string(),
        company_value: growth,
        peer_mean: Some(sector),
        gap: Some(gap),
        ..Default::default()
    };
    Ok(Computation::new(gap, AnalysisDetails::Comparative(details))
        .observe(Observation::BenchmarkGap { gap })
        .with_benchmark(Some(0.0))
        .chart(ChartHint::Bar))
}

/// Mean direction-adjusted percentile across the metrics the peers report
pub fn composite_peer_score(input: &CalculationInput<'_>) -> CalcResult {
    let set = benchmarks(input)?;
    let mut scores = Vec::new();
    for (key, lower_is_better) in COMPOSITE_METRICS {
        let peers = set.peer_values(key);
        if peers.is_empty() {
            continue;
        }
        // A metric the company cannot report is left out of the composite.
        let Ok(value) = company_metric(input, key) else {
            continue;
        };
        let rank = percentile_rank(value, &peers);
        scores.push(if lower_is_better { 100.0 - rank } else { rank });
    }
    if scores.is_empty() {
        return Err(AnalysisError::BenchmarkUnavailable(
            "no peer metrics available for the composite score".to_string(),
        ));
    }
    let score = round2(mean(&scores));

    let details = ComparativeDetails {
        metric: "composite".to_string(),
        company_value: score,
        peer_count: set.peers.len(),
        ..Default::default()
    };
    Ok(Computation::new(score, AnalysisDetails::Comparative(details))
        .with_benchmark(Some(50.0))
        .chart(ChartHint::Gauge))
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::fixtures::{growing_statements, scaled_statement, Fixture};
    use analysis_core::PeerCompany;
    use approx::assert_relative_eq;

    fn peer_set() -> BenchmarkSet {
        let mut set = BenchmarkSet::default();
        for (i, cr) in [1.0, 1.5, 2.0, 2.5, 3.0].iter().enumerate() {
            let mut peer = PeerCompany {
                name: format!("Peer {}", i),
                ..Default::default()
            };
            peer.metrics.insert(CURRENT_RATIO.to_string(), *cr);
            peer.metrics.insert(DEBT_TO_EQUITY.to_string(), 0.5 + i as f64 * 0.25);
            set.peers.push(peer);
        }
        set.ratios.insert(CURRENT_RATIO.to_string(), 1.5);
        set.historical_index.insert(REVENUE_GROWTH.to_string(), vec![4.0, 6.0]);
        set
    }

    #[test]
    fn test_percentile_rank_of_current_ratio() {
        // Company current ratio is 2.0: three of five peers are at or below it
        let fx = Fixture::new(vec![scaled_statement(2023, 1.0)]).with_benchmarks(peer_set());
        let result = percentile_current_ratio(&fx.input()).unwrap();
        assert_relative_eq!(result.value, 60.0);
        assert_eq!(result.benchmark, Some(50.0));
    }

    #[test]
    fn test_gap_and_zscore() {
        let fx = Fixture::new(vec![scaled_statement(2023, 1.0)]).with_benchmarks(peer_set());
        assert_relative_eq!(gap_current_ratio(&fx.input()).unwrap().value, 0.5);
        // Peer mean is 2.0, so the company sits exactly on it
        assert_relative_eq!(peer_z_score(&fx.input(), CURRENT_RATIO).unwrap().value, 0.0);
    }

    #[test]
    fn test_missing_benchmarks_are_reported() {
        let fx = Fixture::new(vec![scaled_statement(2023, 1.0)]);
        assert!(matches!(
            percentile_roe(&fx.input()),
            Err(AnalysisError::BenchmarkUnavailable(_))
        ));
        let fx = Fixture::new(vec![scaled_statement(2023, 1.0)]).with_benchmarks(peer_set());
        assert!(matches!(gap_roe(&fx.input()), Err(AnalysisError::BenchmarkUnavailable(_))));
    }

    #[test]
    fn test_sector_growth_relative_uses_latest_history() {
        let fx = Fixture::new(growing_statements()).with_benchmarks(peer_set());
        assert_relative_eq!(sector_growth_relative(&fx.input()).unwrap().value, 4.0);
    }

    #[test]
    fn test_composite_inverts_lower_is_better() {
        let fx = Fixture::new(vec![scaled_statement(2023, 1.0)]).with_benchmarks(peer_set());
        // current ratio rank 60; D/E 0.86 vs [0.5, 0.75, 1.0, 1.25, 1.5] ranks 40 → 60
        assert_relative_eq!(composite_peer_score(&fx.input()).unwrap().value, 60.0);
    }
}
