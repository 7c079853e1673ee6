use std::path::{Path, PathBuf};

use analysis_core::{AnalysisOptions, CompanyContext, StaticBenchmarkProvider};
use analysis_orchestrator::EngineConfig;
use anyhow::{Context, Result};
use serde_json::Value;

pub const CONTEXT_PATH_ENV: &str = "ANALYSIS_CONTEXT_PATH";
pub const BENCHMARKS_PATH_ENV: &str = "ANALYSIS_BENCHMARKS_PATH";
pub const OPTIONS_PATH_ENV: &str = "ANALYSIS_OPTIONS_PATH";

/// Input files: positional arguments first, then the environment
#[derive(Debug, Clone, PartialEq)]
pub struct InputPaths {
    pub context: PathBuf,
    pub benchmarks: Option<PathBuf>,
    pub options: Option<PathBuf>,
}

impl InputPaths {
    pub fn resolve(args: &[String], env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let pick = |position: usize, key: &str| {
            args.get(position)
                .cloned()
                .or_else(|| env(key))
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from)
        };
        let context = pick(0, CONTEXT_PATH_ENV).with_context(|| {
            format!(
                "usage: report-runner <context.json> [benchmarks.json] [options.json] (or set {})",
                CONTEXT_PATH_ENV
            )
        })?;
        Ok(Self {
            context,
            benchmarks: pick(1, BENCHMARKS_PATH_ENV),
            options: pick(2, OPTIONS_PATH_ENV),
        })
    }
}

fn read_json(path: &Path) -> Result<Value> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid JSON in {}", path.display()))
}

/// Fill keys the document leaves out
fn with_defaults(mut value: Value, defaults: &[(&str, Value)]) -> Value {
    if let Value::Object(map) = &mut value {
        for (key, default) in defaults {
            map.entry(key.to_string()).or_insert_with(|| default.clone());
        }
    }
    value
}

pub fn parse_context(value: Value, config: &EngineConfig) -> Result<CompanyContext> {
    let language = serde_json::to_value(config.default_language)?;
    let value = with_defaults(value, &[("language", language)]);
    serde_json::from_value(value).context("Company context does not match the expected shape")
}

pub fn parse_options(value: Option<Value>, config: &EngineConfig) -> Result<AnalysisOptions> {
    let Some(value) = value else {
        return Ok(config.default_options());
    };
    let value = with_defaults(
        value,
        &[
            ("simulation_iterations", Value::from(config.monte_carlo_iterations)),
            ("random_seed", Value::from(config.random_seed)),
        ],
    );
    serde_json::from_value(value).context("Analysis options do not match the expected shape")
}

pub fn load_context(path: &Path, config: &EngineConfig) -> Result<CompanyContext> {
    parse_context(read_json(path)?, config)
}

pub fn load_options(path: Option<&Path>, config: &EngineConfig) -> Result<AnalysisOptions> {
    let value = path.map(read_json).transpose()?;
    parse_options(value, config)
}

pub fn load_benchmarks(path: Option<&Path>) -> Result<StaticBenchmarkProvider> {
    let Some(path) = path else {
        return Ok(StaticBenchmarkProvider::new());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    StaticBenchmarkProvider::from_json_str(&raw)
        .with_context(|| format!("Invalid benchmark file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::Language;
    use serde_json::json;

    #[test]
    fn test_paths_prefer_arguments() {
        let args = vec!["ctx.json".to_string()];
        let paths = InputPaths::resolve(&args, |key| match key {
            CONTEXT_PATH_ENV => Some("env-ctx.json".to_string()),
            BENCHMARKS_PATH_ENV => Some("bench.json".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(paths.context, PathBuf::from("ctx.json"));
        assert_eq!(paths.benchmarks, Some(PathBuf::from("bench.json")));
        assert_eq!(paths.options, None);
        assert!(InputPaths::resolve(&[], |_| None).is_err());
    }

    #[test]
    fn test_context_language_defaults_from_config() {
        let config = EngineConfig {
            default_language: Language::Ar,
            ..Default::default()
        };
        let doc = json!({
            "company_name": "Sample Co",
            "statements": [{ "fiscal_year": 2023 }],
        });
        assert_eq!(parse_context(doc.clone(), &config).unwrap().language, Language::Ar);

        let mut explicit = doc;
        explicit["language"] = json!("en");
        assert_eq!(parse_context(explicit, &config).unwrap().language, Language::En);
    }

    #[test]
    fn test_options_take_simulation_settings_from_config() {
        let config = EngineConfig {
            monte_carlo_iterations: 2_000,
            random_seed: 9,
            ..Default::default()
        };
        let options = parse_options(Some(json!({ "discount_rate": 0.12 })), &config).unwrap();
        assert_eq!(options.simulation_iterations, 2_000);
        assert_eq!(options.random_seed, 9);
        assert_eq!(options.discount_rate, 0.12);
        assert_eq!(parse_options(None, &config).unwrap().random_seed, 9);
    }
}
