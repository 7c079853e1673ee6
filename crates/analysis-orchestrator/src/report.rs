use analysis_core::{
    AnalysisResult, AnalysisTier, BenchmarkSet, CompanyContext, ComparisonLevel, Language,
    ValidationIssue,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::summary::ExecutiveSummary;

/// Company identification carried into the report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyInfo {
    pub name: String,
    pub sector: String,
    pub activity: String,
    pub legal_entity: String,
    pub comparison_level: ComparisonLevel,
    pub fiscal_years: Vec<i32>,
}

impl CompanyInfo {
    pub fn from_context(context: &CompanyContext) -> Self {
        Self {
            name: context.company_name.clone(),
            sector: context.sector.clone(),
            activity: context.activity.clone(),
            legal_entity: context.legal_entity.clone(),
            comparison_level: context.comparison_level,
            fiscal_years: context.statements.iter().map(|s| s.fiscal_year).collect(),
        }
    }
}

/// The run's only output, handed as-is to rendering collaborators
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub company: CompanyInfo,
    pub generated_at: DateTime<Utc>,
    pub language: Language,
    pub tier: AnalysisTier,
    pub analyses: Vec<AnalysisResult>,
    pub benchmarks: Option<BenchmarkSet>,
    pub validation: Vec<ValidationIssue>,
    pub executive_summary: ExecutiveSummary,
}

impl AnalysisReport {
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn get(&self, id: &str) -> Option<&AnalysisResult> {
        self.analyses.iter().find(|r| r.id == id)
    }
}
