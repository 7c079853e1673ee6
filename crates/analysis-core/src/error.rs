use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// A required statement field is missing, zero where the metric is undefined,
    /// or there are not enough fiscal years for the analysis.
    #[error("Insufficient input data: {0}")]
    InputData(String),

    /// No reference data exists for the company's classification.
    #[error("Benchmark unavailable: {0}")]
    BenchmarkUnavailable(String),

    /// The calculator produced a non-finite or otherwise invalid result.
    #[error("Calculation error: {0}")]
    Calculation(String),

    /// A catalog id has no bound calculator, or a calculator has no catalog entry.
    #[error("Unknown analysis: {0}")]
    UnknownAnalysis(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Analysis run cancelled")]
    Cancelled,
}

impl AnalysisError {
    pub fn input(msg: impl Into<String>) -> Self {
        AnalysisError::InputData(msg.into())
    }

    pub fn calculation(msg: impl Into<String>) -> Self {
        AnalysisError::Calculation(msg.into())
    }
}
