//! Bilingual presentation of computed values.
//!
//! Numbers are computed once, language-independently; only the text built
//! here branches on [`Language`].

use crate::numeric::format_amount;
use crate::{
    AnalysisDefinition, Direction, Language, Observation, Rating, ResultIssue, RiskZone, Unit,
};

/// Format a value in its unit for display.
pub fn format_value(value: f64, unit: Unit, language: Language) -> String {
    match unit {
        Unit::Percent => format!("{:.2}%", value),
        Unit::Probability => format!("{:.2}%", value),
        Unit::Currency => format_amount(value),
        Unit::Days => format!("{:.0} {}", value, unit.label().get(language)),
        Unit::Years => format!("{:.2} {}", value, unit.label().get(language)),
        Unit::Times => format!("{:.2} {}", value, unit.label().get(language)),
        Unit::Score | Unit::Ratio => format!("{:.2}", value),
    }
}

fn zone_label(zone: RiskZone, language: Language) -> &'static str {
    match (zone, language) {
        (RiskZone::Safe, Language::En) => "safe zone",
        (RiskZone::Grey, Language::En) => "grey zone",
        (RiskZone::Distress, Language::En) => "distress zone",
        (RiskZone::Safe, Language::Ar) => "المنطقة الآمنة",
        (RiskZone::Grey, Language::Ar) => "المنطقة الرمادية",
        (RiskZone::Distress, Language::Ar) => "منطقة التعثر",
    }
}

/// One sentence per observation
pub fn render_observation(observation: &Observation, language: Language) -> String {
    use Observation::*;
    match language {
        Language::En => match observation {
            Growth { percent } if *percent >= 0.0 => {
                format!("Increased {:.2}% over the previous year.", percent)
            }
            Growth { percent } => format!("Decreased {:.2}% from the previous year.", percent.abs()),
            Stable => "No change across the periods analysed.".to_string(),
            IndexLevel { index, base_year } => {
                format!("Index stands at {:.2} relative to base year {} (=100).", index, base_year)
            }
            ShareOfTotal { percent } => format!("Represents {:.2}% of the statement total.", percent),
            CompoundGrowth { percent, years } => {
                format!("Compound annual growth of {:.2}% over {} years.", percent, years)
            }
            NegativeValue => "The value is negative.".to_string(),
            BelowOne => "Coverage is below one, obligations exceed the resources available.".to_string(),
            PeerPosition { percentile, peers } => {
                format!("Ranks at the {:.0}th percentile of {} peers.", percentile, peers)
            }
            BenchmarkGap { gap } if *gap >= 0.0 => format!("Exceeds the benchmark by {:.2}.", gap),
            BenchmarkGap { gap } => format!("Falls short of the benchmark by {:.2}.", gap.abs()),
            PeerZScore { z } => format!("Sits {:.2} standard deviations from the peer mean.", z),
            NpvDecision { accept: true } => "Positive net present value: accept the investment.".to_string(),
            NpvDecision { accept: false } => "Negative net present value: reject the investment.".to_string(),
            IrrVersusHurdle { irr, hurdle } if irr >= hurdle => format!(
                "Return of {:.2}% clears the {:.2}% hurdle rate.",
                irr * 100.0,
                hurdle * 100.0
            ),
            IrrVersusHurdle { irr, hurdle } => format!(
                "Return of {:.2}% is below the {:.2}% hurdle rate.",
                irr * 100.0,
                hurdle * 100.0
            ),
            MultipleIrr => "Cash flows change sign more than once: multiple or no real IRR.".to_string(),
            PaybackWithin { years, horizon } => {
                format!("Investment is recovered in {:.2} years of a {}-year horizon.", years, horizon)
            }
            NoPayback { horizon } => format!("Investment is not recovered within {} years.", horizon),
            TerminalValueShare { percent } => {
                format!("Terminal value accounts for {:.2}% of enterprise value.", percent)
            }
            PriceGap { percent } if *percent >= 0.0 => {
                format!("Intrinsic value is {:.2}% above the market price.", percent)
            }
            PriceGap { percent } => {
                format!("Intrinsic value is {:.2}% below the market price.", percent.abs())
            }
            ValueCreated { amount } => {
                format!("Creates {} of value above the cost of capital.", format_amount(*amount))
            }
            ValueDestroyed { amount } => {
                format!("Destroys {} of value relative to the cost of capital.", format_amount(amount.abs()))
            }
            ScenarioRange { low, high } => format!(
                "Outcomes range from {} to {}.",
                format_amount(*low),
                format_amount(*high)
            ),
            LossProbability { percent } => format!("Probability of a loss is {:.2}%.", percent),
            ValueAtRisk { amount, confidence } => format!(
                "Value at risk at {:.0}% confidence is {}.",
                confidence * 100.0,
                format_amount(*amount)
            ),
            OptimumFound { objective } => {
                format!("Optimal objective value is {}.", format_amount(*objective))
            }
            Infeasible => "The constraints admit no feasible solution.".to_string(),
            Unbounded => "The objective is unbounded under the given constraints.".to_string(),
            Equilibrium { pure: true } => "A pure-strategy equilibrium exists.".to_string(),
            Equilibrium { pure: false } => "Only a mixed-strategy equilibrium exists.".to_string(),
            TrendFit { slope, r_squared } => format!(
                "Linear trend of {} per year (R² = {:.2}).",
                format_amount(*slope),
                r_squared
            ),
            Forecast { year, value } => format!("Forecast for {}: {}.", year, format_amount(*value)),
            Volatility { cv } => format!("Coefficient of variation is {:.2}.", cv),
            Correlation { r } => format!("Correlation coefficient is {:.2}.", r),
            RatingBand { band, default_probability } => format!(
                "Rated {} with an estimated default probability of {:.2}%.",
                band, default_probability
            ),
            DistressZone { zone } => format!("Falls in the {}.", zone_label(*zone, language)),
            Anomaly { severity } => format!(
                "Current period is anomalous (severity {:.2} standard deviations).",
                severity
            ),
            NoAnomaly => "Current period is consistent with historical prediction errors.".to_string(),
            ManipulationScore { score, likely: true } => {
                format!("Score of {:.2} indicates likely earnings manipulation.", score)
            }
            ManipulationScore { score, likely: false } => {
                format!("Score of {:.2} does not indicate earnings manipulation.", score)
            }
            BenfordConformity { mad, conforming: true } => {
                format!("First digits conform to Benford's law (MAD {:.4}).", mad)
            }
            BenfordConformity { mad, conforming: false } => {
                format!("First digits deviate from Benford's law (MAD {:.4}).", mad)
            }
            BalanceGap { percent } => {
                format!("Assets differ from liabilities plus equity by {:.2}%.", percent)
            }
            ConservativeLeverage => "Leverage is conservative.".to_string(),
            HighLeverage => "Leverage is high.".to_string(),
        },
        Language::Ar => match observation {
            Growth { percent } if *percent >= 0.0 => {
                format!("ارتفع بنسبة {:.2}% مقارنة بالسنة السابقة.", percent)
            }
            Growth { percent } => format!("انخفض بنسبة {:.2}% مقارنة بالسنة السابقة.", percent.abs()),
            Stable => "لا يوجد تغير خلال الفترات المحللة.".to_string(),
            IndexLevel { index, base_year } => {
                format!("الرقم القياسي {:.2} مقارنة بسنة الأساس {} (=100).", index, base_year)
            }
            ShareOfTotal { percent } => format!("يمثل {:.2}% من إجمالي القائمة.", percent),
            CompoundGrowth { percent, years } => {
                format!("معدل نمو سنوي مركب {:.2}% خلال {} سنوات.", percent, years)
            }
            NegativeValue => "القيمة سالبة.".to_string(),
            BelowOne => "التغطية أقل من واحد، الالتزامات تتجاوز الموارد المتاحة.".to_string(),
            PeerPosition { percentile, peers } => {
                format!("يقع عند المئين {:.0} بين {} شركة مماثلة.", percentile, peers)
            }
            BenchmarkGap { gap } if *gap >= 0.0 => format!("يتجاوز المعيار بمقدار {:.2}.", gap),
            BenchmarkGap { gap } => format!("يقل عن المعيار بمقدار {:.2}.", gap.abs()),
            PeerZScore { z } => format!("يبعد {:.2} انحراف معياري عن متوسط الشركات المماثلة.", z),
            NpvDecision { accept: true } => "صافي القيمة الحالية موجب: يقبل الاستثمار.".to_string(),
            NpvDecision { accept: false } => "صافي القيمة الحالية سالب: يرفض الاستثمار.".to_string(),
            IrrVersusHurdle { irr, hurdle } if irr >= hurdle => format!(
                "العائد {:.2}% يتجاوز معدل العائد المطلوب {:.2}%.",
                irr * 100.0,
                hurdle * 100.0
            ),
            IrrVersusHurdle { irr, hurdle } => format!(
                "العائد {:.2}% أقل من معدل العائد المطلوب {:.2}%.",
                irr * 100.0,
                hurdle * 100.0
            ),
            MultipleIrr => "تتغير إشارة التدفقات أكثر من مرة: قد يوجد أكثر من معدل عائد داخلي أو لا يوجد.".to_string(),
            PaybackWithin { years, horizon } => {
                format!("يسترد الاستثمار خلال {:.2} سنة من أفق {} سنوات.", years, horizon)
            }
            NoPayback { horizon } => format!("لا يسترد الاستثمار خلال {} سنوات.", horizon),
            TerminalValueShare { percent } => {
                format!("تمثل القيمة النهائية {:.2}% من قيمة المنشأة.", percent)
            }
            PriceGap { percent } if *percent >= 0.0 => {
                format!("القيمة الجوهرية أعلى من سعر السوق بنسبة {:.2}%.", percent)
            }
            PriceGap { percent } => {
                format!("القيمة الجوهرية أقل من سعر السوق بنسبة {:.2}%.", percent.abs())
            }
            ValueCreated { amount } => {
                format!("يحقق قيمة مضافة قدرها {} فوق تكلفة رأس المال.", format_amount(*amount))
            }
            ValueDestroyed { amount } => {
                format!("يفقد قيمة قدرها {} مقارنة بتكلفة رأس المال.", format_amount(amount.abs()))
            }
            ScenarioRange { low, high } => format!(
                "تتراوح النتائج بين {} و {}.",
                format_amount(*low),
                format_amount(*high)
            ),
            LossProbability { percent } => format!("احتمال الخسارة {:.2}%.", percent),
            ValueAtRisk { amount, confidence } => format!(
                "القيمة المعرضة للخطر عند مستوى ثقة {:.0}% هي {}.",
                confidence * 100.0,
                format_amount(*amount)
            ),
            OptimumFound { objective } => {
                format!("القيمة المثلى لدالة الهدف {}.", format_amount(*objective))
            }
            Infeasible => "لا يوجد حل ممكن ضمن القيود المحددة.".to_string(),
            Unbounded => "دالة الهدف غير محدودة ضمن القيود المحددة.".to_string(),
            Equilibrium { pure: true } => "يوجد توازن باستراتيجيات بحتة.".to_string(),
            Equilibrium { pure: false } => "يوجد توازن باستراتيجيات مختلطة فقط.".to_string(),
            TrendFit { slope, r_squared } => format!(
                "اتجاه خطي قدره {} سنويا (معامل التحديد {:.2}).",
                format_amount(*slope),
                r_squared
            ),
            Forecast { year, value } => format!("التنبؤ لسنة {}: {}.", year, format_amount(*value)),
            Volatility { cv } => format!("معامل الاختلاف {:.2}.", cv),
            Correlation { r } => format!("معامل الارتباط {:.2}.", r),
            RatingBand { band, default_probability } => format!(
                "التصنيف {} مع احتمال تعثر تقديري {:.2}%.",
                band, default_probability
            ),
            DistressZone { zone } => format!("يقع في {}.", zone_label(*zone, language)),
            Anomaly { severity } => format!(
                "الفترة الحالية شاذة (شدة {:.2} انحراف معياري).",
                severity
            ),
            NoAnomaly => "الفترة الحالية متسقة مع أخطاء التنبؤ التاريخية.".to_string(),
            ManipulationScore { score, likely: true } => {
                format!("الدرجة {:.2} تشير إلى احتمال التلاعب في الأرباح.", score)
            }
            ManipulationScore { score, likely: false } => {
                format!("الدرجة {:.2} لا تشير إلى تلاعب في الأرباح.", score)
            }
            BenfordConformity { mad, conforming: true } => {
                format!("الأرقام الأولى تتوافق مع قانون بنفورد (متوسط الانحراف {:.4}).", mad)
            }
            BenfordConformity { mad, conforming: false } => {
                format!("الأرقام الأولى تنحرف عن قانون بنفورد (متوسط الانحراف {:.4}).", mad)
            }
            BalanceGap { percent } => {
                format!("الفرق بين الأصول والخصوم مع حقوق الملكية {:.2}%.", percent)
            }
            ConservativeLeverage => "الرافعة المالية متحفظة.".to_string(),
            HighLeverage => "الرافعة المالية مرتفعة.".to_string(),
        },
    }
}

/// Headline sentence plus one sentence per observation.
pub fn interpretation(
    definition: &AnalysisDefinition,
    value: f64,
    benchmark: Option<f64>,
    rating: Rating,
    observations: &[Observation],
    language: Language,
) -> String {
    let name = definition.name.get(language);
    let shown = format_value(value, definition.unit, language);
    let headline = match (benchmark, language) {
        (Some(b), Language::En) => format!(
            "{} is {} against a benchmark of {} ({}).",
            name,
            shown,
            format_value(b, definition.unit, language),
            rating.localized(language)
        ),
        (None, Language::En) => format!("{} is {}.", name, shown),
        (Some(b), Language::Ar) => format!(
            "{} تبلغ {} مقابل معيار {} ({}).",
            name,
            shown,
            format_value(b, definition.unit, language),
            rating.localized(language)
        ),
        (None, Language::Ar) => format!("{} تبلغ {}.", name, shown),
    };

    let mut parts = vec![headline];
    parts.extend(observations.iter().map(|o| render_observation(o, language)));
    parts.join(" ")
}

/// Text explaining why no value is available.
pub fn issue_text(issue: ResultIssue, detail: &str, language: Language) -> String {
    match (issue, language) {
        (ResultIssue::InsufficientData, Language::En) => format!("Insufficient data: {}.", detail),
        (ResultIssue::NotComputable, Language::En) => format!("Not computable: {}.", detail),
        (ResultIssue::BenchmarkUnavailable, Language::En) => {
            "No benchmark is available for this classification.".to_string()
        }
        (ResultIssue::TimedOut, Language::En) => {
            "The analysis exceeded its time budget; no result was produced.".to_string()
        }
        (ResultIssue::CalculatorFailed, Language::En) => format!("The calculation failed: {}.", detail),
        (ResultIssue::InsufficientData, Language::Ar) => format!("بيانات غير كافية: {}.", detail),
        (ResultIssue::NotComputable, Language::Ar) => format!("تعذر الحساب: {}.", detail),
        (ResultIssue::BenchmarkUnavailable, Language::Ar) => {
            "لا يتوفر معيار مقارنة لهذا التصنيف.".to_string()
        }
        (ResultIssue::TimedOut, Language::Ar) => {
            "تجاوز التحليل الوقت المخصص له ولم تصدر نتيجة.".to_string()
        }
        (ResultIssue::CalculatorFailed, Language::Ar) => format!("فشل الحساب: {}.", detail),
    }
}

/// Rating-driven recommendation for a single result. Favorable results get
/// none; unfavorable ones get a direction-aware action.
pub fn recommendation(
    definition: &AnalysisDefinition,
    rating: Rating,
    language: Language,
) -> Option<String> {
    if rating.is_favorable() || rating == Rating::Unrated {
        return None;
    }
    let name = definition.name.get(language);
    let text = match (definition.direction, language) {
        (Direction::HigherIsBetter, Language::En) => {
            format!("Work to raise {} towards the sector benchmark.", name)
        }
        (Direction::LowerIsBetter, Language::En) => {
            format!("Work to bring {} down towards the sector benchmark.", name)
        }
        (Direction::CloserIsBetter, Language::En) => {
            format!("Bring {} closer to the sector norm.", name)
        }
        (Direction::HigherIsBetter, Language::Ar) => {
            format!("العمل على رفع {} نحو معيار القطاع.", name)
        }
        (Direction::LowerIsBetter, Language::Ar) => {
            format!("العمل على خفض {} نحو معيار القطاع.", name)
        }
        (Direction::CloserIsBetter, Language::Ar) => {
            format!("تقريب {} من المستوى المعتاد في القطاع.", name)
        }
    };
    Some(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AnalysisDefinition, Category, LocalizedText};

    fn current_ratio_definition() -> AnalysisDefinition {
        AnalysisDefinition::new(
            "basic.ratios.current_ratio",
            Category::Ratios,
            LocalizedText::new("Current Ratio", "نسبة التداول"),
            LocalizedText::new("Current assets / current liabilities", "الأصول المتداولة / الخصوم المتداولة"),
            Unit::Times,
        )
    }

    #[test]
    fn test_interpretation_is_deterministic_and_bilingual() {
        let def = current_ratio_definition();
        let obs = vec![Observation::Growth { percent: 12.5 }];
        let en = interpretation(&def, 2.0, Some(1.5), Rating::Excellent, &obs, Language::En);
        let en_again = interpretation(&def, 2.0, Some(1.5), Rating::Excellent, &obs, Language::En);
        let ar = interpretation(&def, 2.0, Some(1.5), Rating::Excellent, &obs, Language::Ar);

        assert_eq!(en, en_again);
        assert!(en.starts_with("Current Ratio is 2.00 times"));
        assert!(en.contains("Increased 12.50%"));
        assert!(ar.contains("نسبة التداول"));
        assert!(ar.contains("12.50%"));
    }

    #[test]
    fn test_recommendation_respects_direction() {
        let def = current_ratio_definition();
        assert!(recommendation(&def, Rating::Good, Language::En).is_none());
        let rec = recommendation(&def, Rating::Poor, Language::En).unwrap();
        assert!(rec.contains("raise"));

        let lower = current_ratio_definition().lower_is_better();
        let rec = recommendation(&lower, Rating::Weak, Language::En).unwrap();
        assert!(rec.contains("down"));
    }

    #[test]
    fn test_format_value_by_unit() {
        assert_eq!(format_value(40.0, Unit::Percent, Language::En), "40.00%");
        assert_eq!(format_value(21.9, Unit::Days, Language::En), "22 days");
        assert_eq!(format_value(1500.0, Unit::Currency, Language::En), "1,500.00");
    }
}
