use std::sync::Arc;

use analysis_core::CachedBenchmarkProvider;
use analysis_orchestrator::{AnalysisOrchestrator, EngineConfig};
use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;

mod input;

use input::InputPaths;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load .env, init tracing
    dotenvy::dotenv().ok();

    let json_logging = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if json_logging {
        tracing_subscriber::fmt()
            .json()
            .with_writer(std::io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .init();
    }

    // Panic hook: log panic info before crashing
    std::panic::set_hook(Box::new(|info| {
        eprintln!("PANIC: {info}");
        tracing::error!("PANIC: {info}");
    }));

    // 2. Configuration and inputs
    let config = EngineConfig::from_env().context("Invalid engine configuration")?;
    let args: Vec<String> = std::env::args().skip(1).collect();
    let paths = InputPaths::resolve(&args, |key| std::env::var(key).ok())?;
    tracing::info!("Reading company context from {}", paths.context.display());

    let context = input::load_context(&paths.context, &config)?;
    let options = input::load_options(paths.options.as_deref(), &config)?;
    let benchmarks = input::load_benchmarks(paths.benchmarks.as_deref())?;
    tracing::info!("Loaded {} benchmark sets", benchmarks.len());

    // 3. Engine
    let provider = CachedBenchmarkProvider::new(benchmarks, config.benchmark_cache_ttl_secs);
    let engine = AnalysisOrchestrator::new(Arc::new(provider), config)
        .context("Analysis catalog and calculator registry do not match")?;

    // Ctrl-C cancels the run
    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, cancelling analysis run");
            on_signal.cancel();
        }
    });

    // 4. Run and print
    let report = engine.run(context, options, cancel).await?;
    println!("{}", report.to_json_pretty()?);
    Ok(())
}
