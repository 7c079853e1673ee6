//! Executive summary: a pure function of the finished result set.

use analysis_core::i18n::format_value;
use analysis_core::numeric::round2;
use analysis_core::{
    AnalysisDetails, AnalysisResult, Category, Language, LocalizedText, Rating, ResultStatus,
};
use risk_analysis::credit::CreditBand;
use serde::Serialize;

/// Upper bound for the rating-driven strengths and weaknesses
pub const MAX_RANKED_ITEMS: usize = 5;

pub const CURRENT_RATIO: &str = "basic.ratios.current_ratio";
pub const DEBT_TO_EQUITY: &str = "basic.ratios.debt_to_equity";
pub const INTEREST_COVERAGE: &str = "basic.ratios.interest_coverage";
pub const NET_PROFIT_MARGIN: &str = "basic.ratios.net_profit_margin";
pub const RETURN_ON_EQUITY: &str = "basic.ratios.return_on_equity";
pub const REVENUE_CAGR: &str = "basic.structural.cagr_revenue";
pub const FREE_CASH_FLOW: &str = "basic.flow.free_cash_flow";
pub const PROJECT_NPV: &str = "intermediate.valuation.npv";
pub const UPSIDE_POTENTIAL: &str = "intermediate.valuation.upside_potential";
pub const LOSS_PROBABILITY: &str = "advanced.modeling.monte_carlo_loss_probability";
pub const ALTMAN_Z: &str = "comprehensive.risk.altman_z_score";
pub const CREDIT_RATING: &str = "comprehensive.risk.credit_rating_score";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    /// 1-based position in the report
    pub index: usize,
    pub id: String,
    pub name: String,
    pub value: Option<f64>,
    pub benchmark: Option<f64>,
    pub evaluation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub computed: usize,
    pub degraded: usize,
    pub unavailable: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Swot {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub opportunities: Vec<String>,
    pub threats: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutiveSummary {
    pub results_table: Vec<SummaryRow>,
    pub favorable: Vec<String>,
    pub unfavorable: Vec<String>,
    pub status_counts: StatusCounts,
    /// Share of favorable results, in percent
    pub overall_score: f64,
    pub swot: Swot,
    pub risks: Vec<String>,
    pub forecasts: Vec<String>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Strength,
    Weakness,
    Opportunity,
    Threat,
    Risk,
    Recommendation,
}

/// Threshold rule on one analysis value
struct Rule {
    id: &'static str,
    fires: fn(f64) -> bool,
    section: Section,
    text: LocalizedText,
}

const RULES: &[Rule] = &[
    Rule {
        id: CURRENT_RATIO,
        fires: |v| v < 1.0,
        section: Section::Weakness,
        text: LocalizedText::new(
            "Current liabilities exceed current assets.",
            "الخصوم المتداولة تتجاوز الأصول المتداولة.",
        ),
    },
    Rule {
        id: CURRENT_RATIO,
        fires: |v| v < 1.0,
        section: Section::Risk,
        text: LocalizedText::new(
            "Liquidity risk: short-term obligations may not be met from current assets.",
            "مخاطر السيولة: قد لا تكفي الأصول المتداولة للوفاء بالالتزامات قصيرة الأجل.",
        ),
    },
    Rule {
        id: CURRENT_RATIO,
        fires: |v| v < 1.0,
        section: Section::Recommendation,
        text: LocalizedText::new(
            "Strengthen working capital by collecting receivables faster or refinancing short-term debt.",
            "تعزيز رأس المال العامل بتسريع تحصيل الذمم المدينة أو إعادة تمويل الديون قصيرة الأجل.",
        ),
    },
    Rule {
        id: CURRENT_RATIO,
        fires: |v| v >= 2.0,
        section: Section::Strength,
        text: LocalizedText::new("Strong short-term liquidity.", "سيولة قصيرة الأجل قوية."),
    },
    Rule {
        id: DEBT_TO_EQUITY,
        fires: |v| v > 2.0,
        section: Section::Threat,
        text: LocalizedText::new(
            "High financial leverage: debt is more than twice equity.",
            "رافعة مالية مرتفعة: الديون تتجاوز ضعف حقوق الملكية.",
        ),
    },
    Rule {
        id: DEBT_TO_EQUITY,
        fires: |v| v > 2.0,
        section: Section::Recommendation,
        text: LocalizedText::new(
            "Reduce reliance on debt financing.",
            "تقليل الاعتماد على التمويل بالدين.",
        ),
    },
    Rule {
        id: DEBT_TO_EQUITY,
        fires: |v| (0.0..=0.5).contains(&v),
        section: Section::Strength,
        text: LocalizedText::new("Conservative capital structure.", "هيكل رأس مال متحفظ."),
    },
    Rule {
        id: INTEREST_COVERAGE,
        fires: |v| v < 1.5,
        section: Section::Risk,
        text: LocalizedText::new(
            "Operating profit barely covers interest expense.",
            "الربح التشغيلي بالكاد يغطي مصروفات الفوائد.",
        ),
    },
    Rule {
        id: NET_PROFIT_MARGIN,
        fires: |v| v < 0.0,
        section: Section::Weakness,
        text: LocalizedText::new("The company is loss-making.", "الشركة تحقق خسائر."),
    },
    Rule {
        id: NET_PROFIT_MARGIN,
        fires: |v| v < 0.0,
        section: Section::Recommendation,
        text: LocalizedText::new(
            "Review the cost structure and pricing to restore profitability.",
            "مراجعة هيكل التكاليف والتسعير لاستعادة الربحية.",
        ),
    },
    Rule {
        id: RETURN_ON_EQUITY,
        fires: |v| v >= 15.0,
        section: Section::Strength,
        text: LocalizedText::new("High return on equity.", "عائد مرتفع على حقوق الملكية."),
    },
    Rule {
        id: REVENUE_CAGR,
        fires: |v| v > 10.0,
        section: Section::Opportunity,
        text: LocalizedText::new(
            "Strong revenue growth momentum can be built on.",
            "زخم قوي في نمو الإيرادات يمكن البناء عليه.",
        ),
    },
    Rule {
        id: REVENUE_CAGR,
        fires: |v| v < 0.0,
        section: Section::Threat,
        text: LocalizedText::new("Revenue is contracting.", "الإيرادات في تراجع."),
    },
    Rule {
        id: FREE_CASH_FLOW,
        fires: |v| v < 0.0,
        section: Section::Risk,
        text: LocalizedText::new(
            "Negative free cash flow requires external financing.",
            "التدفق النقدي الحر السالب يتطلب تمويلا خارجيا.",
        ),
    },
    Rule {
        id: PROJECT_NPV,
        fires: |v| v > 0.0,
        section: Section::Opportunity,
        text: LocalizedText::new(
            "The investment project creates value (positive NPV).",
            "المشروع الاستثماري يضيف قيمة (صافي قيمة حالية موجب).",
        ),
    },
    Rule {
        id: PROJECT_NPV,
        fires: |v| v < 0.0,
        section: Section::Recommendation,
        text: LocalizedText::new(
            "Reconsider the investment project: it does not recover its cost of capital.",
            "إعادة النظر في المشروع الاستثماري: لا يغطي تكلفة رأس المال.",
        ),
    },
    Rule {
        id: UPSIDE_POTENTIAL,
        fires: |v| v > 20.0,
        section: Section::Opportunity,
        text: LocalizedText::new(
            "Intrinsic value is well above the market price.",
            "القيمة الجوهرية أعلى بكثير من سعر السوق.",
        ),
    },
    Rule {
        id: LOSS_PROBABILITY,
        fires: |v| v > 30.0,
        section: Section::Risk,
        text: LocalizedText::new(
            "Simulation shows a high probability of destroying value.",
            "تظهر المحاكاة احتمالا مرتفعا لفقدان القيمة.",
        ),
    },
    Rule {
        id: ALTMAN_Z,
        fires: |v| v < 1.81,
        section: Section::Threat,
        text: LocalizedText::new(
            "Altman Z-score is in the distress zone.",
            "مؤشر ألتمان في منطقة التعثر.",
        ),
    },
    Rule {
        id: ALTMAN_Z,
        fires: |v| v < 1.81,
        section: Section::Risk,
        text: LocalizedText::new(
            "Elevated bankruptcy risk according to the Altman model.",
            "مخاطر إفلاس مرتفعة وفق نموذج ألتمان.",
        ),
    },
];

fn push_unique(list: &mut Vec<String>, item: String) {
    if !list.contains(&item) {
        list.push(item);
    }
}

/// Value of a result that produced a usable number
fn usable_value(result: &AnalysisResult) -> Option<f64> {
    if result.status == ResultStatus::Unavailable {
        return None;
    }
    result.value.filter(|v| v.is_finite())
}

fn ranked_line(result: &AnalysisResult) -> String {
    format!("{}: {}", result.name, result.evaluation)
}

fn speculative_band(results: &[AnalysisResult]) -> Option<CreditBand> {
    let result = results.iter().find(|r| r.id == CREDIT_RATING)?;
    match &result.details {
        Some(AnalysisDetails::Risk(details)) => details
            .band
            .as_deref()
            .and_then(CreditBand::from_label)
            .filter(|band| band.is_speculative()),
        _ => None,
    }
}

fn detection_flags(results: &[AnalysisResult]) -> impl Iterator<Item = &AnalysisResult> {
    results.iter().filter(|r| {
        r.category == Category::Detection
            && matches!(&r.details, Some(AnalysisDetails::Detection(d)) if d.anomalous)
    })
}

/// Build the executive summary. `results` must be in catalog order.
pub fn build_summary(results: &[AnalysisResult], language: Language) -> ExecutiveSummary {
    let results_table = results
        .iter()
        .enumerate()
        .map(|(i, r)| SummaryRow {
            index: i + 1,
            id: r.id.clone(),
            name: r.name.clone(),
            value: r.value,
            benchmark: r.benchmark,
            evaluation: r.evaluation.clone(),
        })
        .collect();

    let (favorable, unfavorable): (Vec<&AnalysisResult>, Vec<&AnalysisResult>) =
        results.iter().partition(|r| r.rating.is_favorable());

    let mut status_counts = StatusCounts::default();
    for r in results {
        match r.status {
            ResultStatus::Computed => status_counts.computed += 1,
            ResultStatus::Degraded => status_counts.degraded += 1,
            ResultStatus::Unavailable => status_counts.unavailable += 1,
        }
    }
    // Unrated results had nothing to be judged against
    let rated = results.iter().filter(|r| r.rating != Rating::Unrated).count();
    let overall_score = if rated == 0 {
        0.0
    } else {
        round2(favorable.len() as f64 / rated as f64 * 100.0)
    };

    let mut swot = Swot::default();
    let mut risks = Vec::new();
    let mut recommendations = Vec::new();

    for rule in RULES {
        let fired = results
            .iter()
            .find(|r| r.id == rule.id)
            .and_then(usable_value)
            .is_some_and(|v| (rule.fires)(v));
        if !fired {
            continue;
        }
        let text = rule.text.get(language).to_string();
        let target = match rule.section {
            Section::Strength => &mut swot.strengths,
            Section::Weakness => &mut swot.weaknesses,
            Section::Opportunity => &mut swot.opportunities,
            Section::Threat => &mut swot.threats,
            Section::Risk => &mut risks,
            Section::Recommendation => &mut recommendations,
        };
        push_unique(target, text);
    }

    if let Some(band) = speculative_band(results) {
        let (threat, risk) = match language {
            Language::En => (
                format!("Speculative credit rating ({}).", band.as_str()),
                format!(
                    "Credit risk: rated {} with an estimated default probability of {:.2}%.",
                    band.as_str(),
                    band.default_probability()
                ),
            ),
            Language::Ar => (
                format!("تصنيف ائتماني مضاربي ({}).", band.as_str()),
                format!(
                    "مخاطر ائتمانية: التصنيف {} مع احتمال تعثر تقديري {:.2}%.",
                    band.as_str(),
                    band.default_probability()
                ),
            ),
        };
        push_unique(&mut swot.threats, threat);
        push_unique(&mut risks, risk);
    }

    for flagged in detection_flags(results) {
        let text = match language {
            Language::En => format!("Forensic flag raised by {}.", flagged.name),
            Language::Ar => format!("مؤشر تدقيق جنائي أثاره {}.", flagged.name),
        };
        push_unique(&mut risks, text);
    }

    // Remaining strengths and weaknesses come from the extreme ratings
    for r in results.iter().filter(|r| r.rating == Rating::Excellent) {
        if swot.strengths.len() >= MAX_RANKED_ITEMS {
            break;
        }
        push_unique(&mut swot.strengths, ranked_line(r));
    }
    for r in results.iter().filter(|r| r.rating == Rating::Poor) {
        if swot.weaknesses.len() >= MAX_RANKED_ITEMS {
            break;
        }
        push_unique(&mut swot.weaknesses, ranked_line(r));
    }

    let forecasts = results
        .iter()
        .filter(|r| r.status != ResultStatus::Unavailable)
        .filter_map(|r| match &r.details {
            Some(AnalysisDetails::Statistical(details)) => details
                .forecast
                .last()
                .map(|f| format!("{} ({}): {}", r.name, f.year, format_value(f.value, r.unit, language))),
            _ => None,
        })
        .collect();

    for r in results.iter().filter(|r| r.rating == Rating::Poor) {
        for text in &r.recommendations {
            push_unique(&mut recommendations, text.clone());
        }
    }

    ExecutiveSummary {
        results_table,
        favorable: favorable.iter().map(|r| r.id.clone()).collect(),
        unfavorable: unfavorable.iter().map(|r| r.id.clone()).collect(),
        status_counts,
        overall_score,
        swot,
        risks,
        forecasts,
        recommendations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::{DetectionDetails, RiskDetails, Unit};

    fn result(id: &str, category: Category, value: Option<f64>, rating: Rating) -> AnalysisResult {
        AnalysisResult {
            id: id.to_string(),
            category,
            name: id.rsplit('.').next().unwrap_or(id).to_string(),
            value,
            unit: Unit::Times,
            benchmark: Some(1.0),
            rating,
            evaluation: rating.localized(Language::En).to_string(),
            status: if value.is_some() {
                ResultStatus::Computed
            } else {
                ResultStatus::Unavailable
            },
            issue: None,
            interpretation: None,
            recommendations: Vec::new(),
            details: None,
            chart_hint: None,
        }
    }

    #[test]
    fn test_partition_covers_every_result() {
        let results = vec![
            result(CURRENT_RATIO, Category::Ratios, Some(2.5), Rating::Excellent),
            result(DEBT_TO_EQUITY, Category::Ratios, Some(0.8), Rating::Average),
            result(NET_PROFIT_MARGIN, Category::Ratios, Some(3.0), Rating::Weak),
            result(REVENUE_CAGR, Category::Structural, None, Rating::Unrated),
        ];
        let summary = build_summary(&results, Language::En);
        assert_eq!(summary.favorable.len() + summary.unfavorable.len(), results.len());
        assert_eq!(summary.favorable, vec![CURRENT_RATIO.to_string(), DEBT_TO_EQUITY.to_string()]);
        assert_eq!(summary.overall_score, 66.67);
        assert_eq!(summary.results_table[3].index, 4);
        assert_eq!(
            summary.status_counts,
            StatusCounts { computed: 3, degraded: 0, unavailable: 1 }
        );
    }

    #[test]
    fn test_unrated_results_leave_score_unchanged() {
        let rated = vec![
            result(CURRENT_RATIO, Category::Ratios, Some(2.5), Rating::Good),
            result(DEBT_TO_EQUITY, Category::Ratios, Some(2.5), Rating::Poor),
        ];
        let mut with_unrated = rated.clone();
        for id in [REVENUE_CAGR, FREE_CASH_FLOW, INTEREST_COVERAGE] {
            with_unrated.push(result(id, Category::Flow, Some(14.0), Rating::Unrated));
        }
        assert_eq!(build_summary(&rated, Language::En).overall_score, 50.0);
        let summary = build_summary(&with_unrated, Language::En);
        assert_eq!(summary.overall_score, 50.0);
        assert_eq!(summary.unfavorable.len(), 4);

        let unrated = vec![result(REVENUE_CAGR, Category::Structural, None, Rating::Unrated)];
        assert_eq!(build_summary(&unrated, Language::En).overall_score, 0.0);
    }

    #[test]
    fn test_threshold_rules() {
        let results = vec![
            result(CURRENT_RATIO, Category::Ratios, Some(0.8), Rating::Poor),
            result(DEBT_TO_EQUITY, Category::Ratios, Some(2.5), Rating::Poor),
            result(REVENUE_CAGR, Category::Structural, Some(12.0), Rating::Excellent),
            result(ALTMAN_Z, Category::Risk, Some(1.2), Rating::Poor),
        ];
        let summary = build_summary(&results, Language::En);
        assert!(summary
            .swot
            .weaknesses
            .contains(&"Current liabilities exceed current assets.".to_string()));
        assert!(summary.swot.threats.iter().any(|t| t.contains("leverage")));
        assert!(summary.swot.opportunities.iter().any(|t| t.contains("revenue growth")));
        assert!(summary.risks.iter().any(|t| t.contains("Altman")));
        assert!(summary.recommendations.iter().any(|t| t.contains("debt financing")));
    }

    #[test]
    fn test_speculative_rating_and_detection_flags() {
        let mut credit = result(CREDIT_RATING, Category::Risk, Some(45.0), Rating::Poor);
        credit.details = Some(AnalysisDetails::Risk(RiskDetails {
            band: Some("B".to_string()),
            ..Default::default()
        }));
        let mut beneish = result(
            "comprehensive.detection.beneish_m_score",
            Category::Detection,
            Some(-1.2),
            Rating::Poor,
        );
        beneish.details = Some(AnalysisDetails::Detection(DetectionDetails {
            anomalous: true,
            ..Default::default()
        }));
        let summary = build_summary(&[credit, beneish], Language::En);
        assert!(summary.swot.threats.contains(&"Speculative credit rating (B).".to_string()));
        assert!(summary.risks.iter().any(|r| r.contains("beneish_m_score")));
    }

    #[test]
    fn test_output_is_deduplicated_and_localized() {
        let results = vec![
            result(CURRENT_RATIO, Category::Ratios, Some(0.5), Rating::Poor),
            result(CURRENT_RATIO, Category::Ratios, Some(0.5), Rating::Poor),
        ];
        let en = build_summary(&results, Language::En);
        assert_eq!(en.risks.len(), 1);
        let ar = build_summary(&results, Language::Ar);
        assert_eq!(ar.swot.weaknesses[0], "الخصوم المتداولة تتجاوز الأصول المتداولة.");
    }
}
