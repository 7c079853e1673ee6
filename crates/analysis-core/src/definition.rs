use serde::Serialize;

use crate::{AnalysisTier, Language};

/// Analysis family. Each category belongs to exactly one tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Structural,
    Ratios,
    Flow,
    Comparison,
    Valuation,
    Performance,
    Modeling,
    Statistical,
    Risk,
    Detection,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::Structural,
        Category::Ratios,
        Category::Flow,
        Category::Comparison,
        Category::Valuation,
        Category::Performance,
        Category::Modeling,
        Category::Statistical,
        Category::Risk,
        Category::Detection,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Structural => "structural",
            Category::Ratios => "ratios",
            Category::Flow => "flow",
            Category::Comparison => "comparison",
            Category::Valuation => "valuation",
            Category::Performance => "performance",
            Category::Modeling => "modeling",
            Category::Statistical => "statistical",
            Category::Risk => "risk",
            Category::Detection => "detection",
        }
    }

    pub fn tier(&self) -> AnalysisTier {
        match self {
            Category::Structural | Category::Ratios | Category::Flow => AnalysisTier::Basic,
            Category::Comparison | Category::Valuation | Category::Performance => {
                AnalysisTier::Intermediate
            }
            Category::Modeling | Category::Statistical => AnalysisTier::Advanced,
            Category::Risk | Category::Detection => AnalysisTier::Comprehensive,
        }
    }

    pub fn label(&self) -> LocalizedText {
        match self {
            Category::Structural => LocalizedText::new("Structural Analysis", "التحليل الهيكلي"),
            Category::Ratios => LocalizedText::new("Financial Ratios", "النسب المالية"),
            Category::Flow => LocalizedText::new("Cash Flow Analysis", "تحليل التدفقات النقدية"),
            Category::Comparison => LocalizedText::new("Comparative Analysis", "التحليل المقارن"),
            Category::Valuation => LocalizedText::new("Valuation & Investment", "التقييم والاستثمار"),
            Category::Performance => LocalizedText::new("Performance Analysis", "تحليل الأداء"),
            Category::Modeling => LocalizedText::new("Modeling & Simulation", "النمذجة والمحاكاة"),
            Category::Statistical => LocalizedText::new("Statistical Analysis", "التحليل الإحصائي"),
            Category::Risk => LocalizedText::new("Risk Analysis", "تحليل المخاطر"),
            Category::Detection => LocalizedText::new("Detection & Forensics", "الكشف والتدقيق"),
        }
    }
}

/// Preferred direction of a metric when compared to its benchmark
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    HigherIsBetter,
    LowerIsBetter,
    CloserIsBetter,
}

/// Unit of the primary value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    Percent,
    Times,
    Days,
    Currency,
    Score,
    Years,
    Ratio,
    Probability,
}

impl Unit {
    pub fn label(&self) -> LocalizedText {
        match self {
            Unit::Percent => LocalizedText::new("%", "%"),
            Unit::Times => LocalizedText::new("times", "مرة"),
            Unit::Days => LocalizedText::new("days", "يوم"),
            Unit::Currency => LocalizedText::new("currency units", "وحدة نقدية"),
            Unit::Score => LocalizedText::new("points", "نقطة"),
            Unit::Years => LocalizedText::new("years", "سنة"),
            Unit::Ratio => LocalizedText::new("ratio", "نسبة"),
            Unit::Probability => LocalizedText::new("% probability", "% احتمال"),
        }
    }
}

/// Execution budget. Time-boxed analyses run under the engine's
/// simulation timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionBudget {
    #[default]
    Instant,
    TimeBoxed,
}

/// A bilingual static string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct LocalizedText {
    pub en: &'static str,
    pub ar: &'static str,
}

impl LocalizedText {
    pub const fn new(en: &'static str, ar: &'static str) -> Self {
        Self { en, ar }
    }

    pub fn get(&self, language: Language) -> &'static str {
        match language {
            Language::En => self.en,
            Language::Ar => self.ar,
        }
    }
}

/// One entry of the analysis catalog. Pure data: the calculator is bound
/// separately by id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisDefinition {
    pub id: &'static str,
    pub category: Category,
    pub tier: AnalysisTier,
    pub name: LocalizedText,
    pub description: LocalizedText,
    pub measure_label: LocalizedText,
    pub unit: Unit,
    pub direction: Direction,
    pub benchmark_key: Option<&'static str>,
    pub budget: ExecutionBudget,
}

impl AnalysisDefinition {
    pub fn new(
        id: &'static str,
        category: Category,
        name: LocalizedText,
        description: LocalizedText,
        unit: Unit,
    ) -> Self {
        let budget = match category {
            Category::Modeling => ExecutionBudget::TimeBoxed,
            _ => ExecutionBudget::Instant,
        };
        Self {
            id,
            category,
            tier: category.tier(),
            name,
            description,
            measure_label: unit.label(),
            unit,
            direction: Direction::HigherIsBetter,
            benchmark_key: None,
            budget,
        }
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn lower_is_better(self) -> Self {
        self.direction(Direction::LowerIsBetter)
    }

    pub fn closer_is_better(self) -> Self {
        self.direction(Direction::CloserIsBetter)
    }

    pub fn benchmark(mut self, key: &'static str) -> Self {
        self.benchmark_key = Some(key);
        self
    }

    pub fn time_boxed(mut self) -> Self {
        self.budget = ExecutionBudget::TimeBoxed;
        self
    }

    /// Expected id prefix for this definition's tier and category
    pub fn expected_prefix(&self) -> String {
        format!("{}.{}.", self.tier.as_str(), self.category.as_str())
    }
}
