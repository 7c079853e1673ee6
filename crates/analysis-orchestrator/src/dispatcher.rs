//! Parallel execution of the selected calculators and conversion of each
//! outcome into an [`AnalysisResult`].

use std::sync::Arc;
use std::time::Duration;

use analysis_core::i18n::{interpretation, issue_text, recommendation, render_observation};
use analysis_core::{
    evaluate, AnalysisDefinition, AnalysisError, AnalysisOptions, AnalysisResult, BenchmarkSet,
    CalculationInput, Computation, ExecutionBudget, FinancialStatement, Language, Rating,
    ResultIssue, ResultStatus,
};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::registry::Calculator;

/// Read-only data shared by every calculator task of one run
#[derive(Debug)]
pub struct RunData {
    pub statements: Vec<FinancialStatement>,
    pub benchmarks: Option<BenchmarkSet>,
    pub options: AnalysisOptions,
}

impl RunData {
    fn reference_value(&self, definition: &AnalysisDefinition) -> Option<f64> {
        let key = definition.benchmark_key?;
        self.benchmarks.as_ref()?.ratio(key)
    }
}

/// How one calculator task ended
#[derive(Debug)]
pub enum Outcome {
    Finished(Result<Computation, AnalysisError>),
    Panicked(String),
    TimedOut(Duration),
}

/// One unit of work: a definition, its calculator and its catalog position
#[derive(Debug, Clone)]
pub struct Job {
    pub index: usize,
    pub definition: AnalysisDefinition,
    pub calculator: Calculator,
}

fn panic_message(err: tokio::task::JoinError) -> String {
    if !err.is_panic() {
        return err.to_string();
    }
    let payload = err.into_panic();
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "calculator panicked".to_string()
    }
}

async fn execute(job: &Job, data: Arc<RunData>, timeout: Duration) -> Outcome {
    let definition = job.definition.clone();
    let func = job.calculator.func;
    let handle = tokio::task::spawn_blocking(move || {
        let input = CalculationInput {
            statements: &data.statements,
            benchmarks: data.benchmarks.as_ref(),
            options: &data.options,
            definition: &definition,
        };
        func(&input)
    });

    let joined = match job.calculator.budget {
        ExecutionBudget::Instant => handle.await,
        // The blocking thread is not interrupted; its result is discarded.
        ExecutionBudget::TimeBoxed => match tokio::time::timeout(timeout, handle).await {
            Ok(joined) => joined,
            Err(_) => return Outcome::TimedOut(timeout),
        },
    };

    match joined {
        Ok(result) => Outcome::Finished(result),
        Err(err) => Outcome::Panicked(panic_message(err)),
    }
}

/// Run every job and return one result per job in catalog order.
///
/// The token is checked before each spawn and while collecting; on
/// cancellation outstanding tasks are aborted and no results are returned.
pub async fn dispatch(
    jobs: Vec<Job>,
    data: Arc<RunData>,
    timeout: Duration,
    language: Language,
    cancel: &CancellationToken,
) -> Result<Vec<AnalysisResult>, AnalysisError> {
    let mut tasks = JoinSet::new();
    for (slot, job) in jobs.iter().enumerate() {
        if cancel.is_cancelled() {
            tasks.abort_all();
            return Err(AnalysisError::Cancelled);
        }
        let job = job.clone();
        let data = Arc::clone(&data);
        tasks.spawn(async move {
            let outcome = execute(&job, data, timeout).await;
            (slot, outcome)
        });
    }

    let mut outcomes: Vec<Option<Outcome>> = jobs.iter().map(|_| None).collect();
    loop {
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            next = tasks.join_next() => Some(next),
        };
        match next {
            None => {
                tasks.abort_all();
                return Err(AnalysisError::Cancelled);
            }
            Some(Some(Ok((slot, outcome)))) => outcomes[slot] = Some(outcome),
            Some(Some(Err(err))) => warn!("Calculator task failed to join: {}", err),
            Some(None) => break,
        }
    }

    let mut results: Vec<(usize, AnalysisResult)> = jobs
        .iter()
        .zip(outcomes)
        .map(|(job, outcome)| {
            let outcome =
                outcome.unwrap_or_else(|| Outcome::Panicked("task did not complete".to_string()));
            let reference = data.reference_value(&job.definition);
            (job.index, to_result(&job.definition, outcome, reference, language))
        })
        .collect();
    results.sort_by_key(|(index, _)| *index);
    Ok(results.into_iter().map(|(_, result)| result).collect())
}

fn unavailable(
    definition: &AnalysisDefinition,
    value: Option<f64>,
    benchmark: Option<f64>,
    status: ResultStatus,
    issue: ResultIssue,
    detail: &str,
    language: Language,
) -> AnalysisResult {
    AnalysisResult {
        id: definition.id.to_string(),
        category: definition.category,
        name: definition.name.get(language).to_string(),
        value,
        unit: definition.unit,
        benchmark,
        rating: Rating::Unrated,
        evaluation: Rating::Unrated.localized(language).to_string(),
        status,
        issue: Some(issue),
        interpretation: Some(issue_text(issue, detail, language)),
        recommendations: Vec::new(),
        details: None,
        chart_hint: None,
    }
}

/// Map a calculator outcome to its result.
///
/// The calculator's own benchmark takes precedence over the industry
/// reference value for the definition's benchmark key.
pub fn to_result(
    definition: &AnalysisDefinition,
    outcome: Outcome,
    reference: Option<f64>,
    language: Language,
) -> AnalysisResult {
    let computation = match outcome {
        Outcome::Finished(Ok(computation)) => computation,
        Outcome::Finished(Err(AnalysisError::InputData(msg))) => {
            debug!(analysis = definition.id, "Insufficient data: {}", msg);
            return unavailable(
                definition,
                Some(0.0),
                reference,
                ResultStatus::Unavailable,
                ResultIssue::InsufficientData,
                &msg,
                language,
            );
        }
        Outcome::Finished(Err(AnalysisError::Calculation(msg))) => {
            debug!(analysis = definition.id, "Not computable: {}", msg);
            return unavailable(
                definition,
                None,
                reference,
                ResultStatus::Unavailable,
                ResultIssue::NotComputable,
                &msg,
                language,
            );
        }
        Outcome::Finished(Err(AnalysisError::BenchmarkUnavailable(msg))) => {
            debug!(analysis = definition.id, "No reference data: {}", msg);
            return unavailable(
                definition,
                None,
                reference,
                ResultStatus::Degraded,
                ResultIssue::BenchmarkUnavailable,
                &msg,
                language,
            );
        }
        Outcome::Finished(Err(err)) => {
            warn!(analysis = definition.id, "Calculator failed: {}", err);
            return unavailable(
                definition,
                None,
                reference,
                ResultStatus::Unavailable,
                ResultIssue::CalculatorFailed,
                &err.to_string(),
                language,
            );
        }
        Outcome::Panicked(msg) => {
            warn!(analysis = definition.id, "Calculator panicked: {}", msg);
            return unavailable(
                definition,
                None,
                reference,
                ResultStatus::Unavailable,
                ResultIssue::CalculatorFailed,
                &msg,
                language,
            );
        }
        Outcome::TimedOut(budget) => {
            warn!(
                analysis = definition.id,
                "Calculator exceeded its {} ms budget",
                budget.as_millis()
            );
            return unavailable(
                definition,
                None,
                reference,
                ResultStatus::Degraded,
                ResultIssue::TimedOut,
                "",
                language,
            );
        }
    };

    let benchmark = computation.benchmark.or(reference);

    // Solver states such as infeasible or unbounded carry no value but keep
    // their details and observations.
    if !computation.value.is_finite() {
        debug!(analysis = definition.id, "Non-finite value");
        let mut text = vec![issue_text(ResultIssue::NotComputable, "no finite value", language)];
        text.extend(
            computation
                .observations
                .iter()
                .map(|o| render_observation(o, language)),
        );
        return AnalysisResult {
            interpretation: Some(text.join(" ")),
            details: Some(computation.details),
            chart_hint: computation.chart_hint,
            ..unavailable(
                definition,
                None,
                benchmark,
                ResultStatus::Unavailable,
                ResultIssue::NotComputable,
                "",
                language,
            )
        };
    }

    let value = computation.value;
    let rating = evaluate(value, benchmark, definition.direction);
    let (status, issue) = match benchmark {
        Some(_) => (ResultStatus::Computed, None),
        None => (ResultStatus::Degraded, Some(ResultIssue::BenchmarkUnavailable)),
    };
    debug!(analysis = definition.id, value, ?rating, "Computed");

    AnalysisResult {
        id: definition.id.to_string(),
        category: definition.category,
        name: definition.name.get(language).to_string(),
        value: Some(value),
        unit: definition.unit,
        benchmark,
        rating,
        evaluation: rating.localized(language).to_string(),
        status,
        issue,
        interpretation: Some(interpretation(
            definition,
            value,
            benchmark,
            rating,
            &computation.observations,
            language,
        )),
        recommendations: recommendation(definition, rating, language)
            .into_iter()
            .collect(),
        details: Some(computation.details),
        chart_hint: computation.chart_hint,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::fixtures::definition;
    use analysis_core::{AnalysisDetails, Category, Observation, OptimizationDetails, Unit};

    fn ratio_definition() -> AnalysisDefinition {
        definition("basic.ratios.test", Category::Ratios, Unit::Times)
    }

    fn computed(value: f64) -> Outcome {
        Outcome::Finished(Ok(Computation::new(value, AnalysisDetails::Ratio(Default::default()))))
    }

    #[test]
    fn test_computed_with_reference() {
        let result = to_result(&ratio_definition(), computed(2.0), Some(1.5), Language::En);
        assert_eq!(result.status, ResultStatus::Computed);
        assert_eq!(result.value, Some(2.0));
        assert_eq!(result.rating, Rating::Excellent);
        assert_eq!(result.evaluation, "Excellent");
        assert!(result.issue.is_none());
    }

    #[test]
    fn test_calculator_benchmark_takes_precedence() {
        let outcome = Outcome::Finished(Ok(Computation::new(
            2.0,
            AnalysisDetails::Ratio(Default::default()),
        )
        .with_benchmark(Some(4.0))));
        let result = to_result(&ratio_definition(), outcome, Some(1.5), Language::En);
        assert_eq!(result.benchmark, Some(4.0));
        assert_eq!(result.rating, Rating::Poor);
    }

    #[test]
    fn test_missing_benchmark_degrades_but_keeps_value() {
        let result = to_result(&ratio_definition(), computed(2.0), None, Language::En);
        assert_eq!(result.status, ResultStatus::Degraded);
        assert_eq!(result.issue, Some(ResultIssue::BenchmarkUnavailable));
        assert_eq!(result.value, Some(2.0));
        assert_eq!(result.rating, Rating::Unrated);
    }

    #[test]
    fn test_error_mapping() {
        let def = ratio_definition();
        let input = to_result(
            &def,
            Outcome::Finished(Err(AnalysisError::input("no revenue"))),
            None,
            Language::En,
        );
        assert_eq!(input.status, ResultStatus::Unavailable);
        assert_eq!(input.issue, Some(ResultIssue::InsufficientData));
        assert_eq!(input.value, Some(0.0));

        let calc = to_result(
            &def,
            Outcome::Finished(Err(AnalysisError::calculation("diverged"))),
            None,
            Language::En,
        );
        assert_eq!(calc.issue, Some(ResultIssue::NotComputable));
        assert_eq!(calc.value, None);

        let panicked = to_result(&def, Outcome::Panicked("boom".to_string()), None, Language::En);
        assert_eq!(panicked.issue, Some(ResultIssue::CalculatorFailed));

        let timed_out = to_result(&def, Outcome::TimedOut(Duration::from_millis(10)), None, Language::Ar);
        assert_eq!(timed_out.status, ResultStatus::Degraded);
        assert_eq!(timed_out.issue, Some(ResultIssue::TimedOut));
        assert_eq!(timed_out.evaluation, "غير مقيم");
    }

    #[test]
    fn test_non_finite_value_keeps_details() {
        let outcome = Outcome::Finished(Ok(Computation::new(
            f64::NAN,
            AnalysisDetails::Optimization(OptimizationDetails::default()),
        )
        .observe(Observation::Infeasible)));
        let result = to_result(&ratio_definition(), outcome, None, Language::En);
        assert_eq!(result.status, ResultStatus::Unavailable);
        assert_eq!(result.issue, Some(ResultIssue::NotComputable));
        assert_eq!(result.value, None);
        assert!(matches!(result.details, Some(AnalysisDetails::Optimization(_))));
        assert!(result
            .interpretation
            .unwrap()
            .contains("no feasible solution"));
    }
}
