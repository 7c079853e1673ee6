use std::str::FromStr;
use std::time::Duration;

use analysis_core::{AnalysisError, AnalysisOptions, Language};

pub const SIMULATION_TIMEOUT_ENV: &str = "ANALYSIS_SIMULATION_TIMEOUT_MS";
pub const MONTE_CARLO_ITERATIONS_ENV: &str = "ANALYSIS_MONTE_CARLO_ITERATIONS";
pub const RANDOM_SEED_ENV: &str = "ANALYSIS_RANDOM_SEED";
pub const BENCHMARK_CACHE_TTL_ENV: &str = "ANALYSIS_BENCHMARK_CACHE_TTL_SECS";
pub const DEFAULT_LANGUAGE_ENV: &str = "ANALYSIS_DEFAULT_LANGUAGE";

/// Engine-wide settings, read once at startup
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Budget for each time-boxed (modeling) analysis
    pub simulation_timeout: Duration,
    pub monte_carlo_iterations: usize,
    pub random_seed: u64,
    pub benchmark_cache_ttl_secs: i64,
    pub default_language: Language,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            simulation_timeout: Duration::from_millis(5_000),
            monte_carlo_iterations: 10_000,
            random_seed: 42,
            benchmark_cache_ttl_secs: 300,
            default_language: Language::En,
        }
    }
}

fn parse<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T, AnalysisError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw.trim().parse::<T>().map_err(|e| {
            AnalysisError::Configuration(format!("invalid {} '{}': {}", key, raw, e))
        }),
        _ => Ok(default),
    }
}

impl EngineConfig {
    /// Read the engine settings from the process environment. Unset
    /// variables keep their defaults; unparsable ones are an error.
    pub fn from_env() -> Result<Self, AnalysisError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AnalysisError> {
        let defaults = Self::default();
        let timeout_ms: u64 = parse(
            &lookup,
            SIMULATION_TIMEOUT_ENV,
            defaults.simulation_timeout.as_millis() as u64,
        )?;
        let iterations: usize = parse(&lookup, MONTE_CARLO_ITERATIONS_ENV, defaults.monte_carlo_iterations)?;
        if timeout_ms == 0 {
            return Err(AnalysisError::Configuration(format!("{} must be positive", SIMULATION_TIMEOUT_ENV)));
        }
        if iterations == 0 {
            return Err(AnalysisError::Configuration(format!(
                "{} must be positive",
                MONTE_CARLO_ITERATIONS_ENV
            )));
        }
        let ttl: i64 = parse(&lookup, BENCHMARK_CACHE_TTL_ENV, defaults.benchmark_cache_ttl_secs)?;
        if ttl < 0 {
            return Err(AnalysisError::Configuration(format!("{} cannot be negative", BENCHMARK_CACHE_TTL_ENV)));
        }

        Ok(Self {
            simulation_timeout: Duration::from_millis(timeout_ms),
            monte_carlo_iterations: iterations,
            random_seed: parse(&lookup, RANDOM_SEED_ENV, defaults.random_seed)?,
            benchmark_cache_ttl_secs: ttl,
            default_language: parse(&lookup, DEFAULT_LANGUAGE_ENV, defaults.default_language)?,
        })
    }

    /// Run options carrying this configuration's simulation settings
    pub fn default_options(&self) -> AnalysisOptions {
        AnalysisOptions {
            simulation_iterations: self.monte_carlo_iterations,
            random_seed: self.random_seed,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = EngineConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.default_options().simulation_iterations, 10_000);
    }

    #[test]
    fn test_overrides() {
        let config = EngineConfig::from_lookup(lookup(&[
            (SIMULATION_TIMEOUT_ENV, "250"),
            (MONTE_CARLO_ITERATIONS_ENV, "2000"),
            (RANDOM_SEED_ENV, "7"),
            (DEFAULT_LANGUAGE_ENV, "ar"),
        ]))
        .unwrap();
        assert_eq!(config.simulation_timeout, Duration::from_millis(250));
        assert_eq!(config.monte_carlo_iterations, 2000);
        assert_eq!(config.default_options().random_seed, 7);
        assert_eq!(config.default_language, Language::Ar);
    }

    #[test]
    fn test_invalid_values_are_configuration_errors() {
        for vars in [
            [(MONTE_CARLO_ITERATIONS_ENV, "many")],
            [(MONTE_CARLO_ITERATIONS_ENV, "0")],
            [(DEFAULT_LANGUAGE_ENV, "fr")],
            [(BENCHMARK_CACHE_TTL_ENV, "-5")],
        ] {
            assert!(matches!(
                EngineConfig::from_lookup(lookup(&vars)),
                Err(AnalysisError::Configuration(_))
            ));
        }
    }
}
