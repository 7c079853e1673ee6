use analysis_core::{AnalysisDefinition, Category, Unit};

use crate::def;

#[rustfmt::skip]
pub(crate) fn risk() -> Vec<AnalysisDefinition> {
    let c = Category::Risk;
    vec![
        def("comprehensive.risk.credit_rating_score", c,
            ("Credit Rating Score", "درجة التصنيف الائتماني"),
            ("Weighted score of normalised liquidity, leverage, coverage and profitability ratios", "درجة مرجحة لنسب السيولة والرافعة والتغطية والربحية المعيارية"),
            Unit::Score)
            .benchmark("risk.creditScore"),
        def("comprehensive.risk.default_probability", c,
            ("Probability of Default", "احتمال التعثر"),
            ("One-year default probability implied by the rating band", "احتمال التعثر لسنة واحدة حسب فئة التصنيف"),
            Unit::Probability)
            .lower_is_better(),
        def("comprehensive.risk.altman_z_score", c,
            ("Altman Z-Score", "نموذج ألتمان للتنبؤ بالتعثر"),
            ("1.2 X1 + 1.4 X2 + 3.3 X3 + 0.6 X4 + 1.0 X5", "1.2 X1 + 1.4 X2 + 3.3 X3 + 0.6 X4 + 1.0 X5"),
            Unit::Score),
        def("comprehensive.risk.altman_z_double_prime", c,
            ("Altman Z'' Score", "نموذج ألتمان المعدل للشركات غير الصناعية"),
            ("6.56 X1 + 3.26 X2 + 6.72 X3 + 1.05 X4", "6.56 X1 + 3.26 X2 + 6.72 X3 + 1.05 X4"),
            Unit::Score),
        def("comprehensive.risk.springate_s_score", c,
            ("Springate S-Score", "نموذج سبرينجيت"),
            ("1.03 A + 3.07 B + 0.66 C + 0.4 D", "1.03 A + 3.07 B + 0.66 C + 0.4 D"),
            Unit::Score),
        def("comprehensive.risk.zmijewski_score", c,
            ("Zmijewski Distress Probability", "احتمال التعثر بنموذج زميجوسكي"),
            ("Logistic probability from profitability, leverage and liquidity", "احتمال لوجستي من الربحية والرافعة والسيولة"),
            Unit::Probability)
            .lower_is_better(),
        def("comprehensive.risk.liquidity_risk_index", c,
            ("Liquidity Risk Index", "مؤشر مخاطر السيولة"),
            ("0-100 index from current, quick and cash ratios", "مؤشر من 0 إلى 100 من نسب التداول والسيولة السريعة والنقدية"),
            Unit::Score)
            .lower_is_better(),
        def("comprehensive.risk.solvency_risk_index", c,
            ("Solvency Risk Index", "مؤشر مخاطر الملاءة"),
            ("0-100 index from debt ratio, interest coverage and net debt to EBITDA", "مؤشر من 0 إلى 100 من نسبة المديونية وتغطية الفوائد وصافي الدين"),
            Unit::Score)
            .lower_is_better(),
        def("comprehensive.risk.earnings_at_risk", c,
            ("Earnings at Risk", "الأرباح المعرضة للخطر"),
            ("Adverse percentile of historical annual net income changes", "المئين السلبي للتغيرات السنوية التاريخية في صافي الربح"),
            Unit::Percent)
            .benchmark("risk.earningsAtRisk"),
        def("comprehensive.risk.cash_flow_at_risk", c,
            ("Cash Flow at Risk", "التدفق النقدي المعرض للخطر"),
            ("Adverse percentile of historical annual operating cash flow changes", "المئين السلبي للتغيرات السنوية التاريخية في التدفق النقدي التشغيلي"),
            Unit::Percent)
            .benchmark("risk.cashFlowAtRisk"),
    ]
}

#[rustfmt::skip]
pub(crate) fn detection() -> Vec<AnalysisDefinition> {
    let c = Category::Detection;
    vec![
        def("comprehensive.detection.anomaly_revenue", c,
            ("Revenue Anomaly", "الشذوذ في الإيرادات"),
            ("Current revenue prediction error against historical error distribution", "خطأ التنبؤ بالإيرادات الحالية مقارنة بتوزيع الأخطاء التاريخية"),
            Unit::Score)
            .lower_is_better(),
        def("comprehensive.detection.anomaly_net_income", c,
            ("Net Income Anomaly", "الشذوذ في صافي الربح"),
            ("Current net income prediction error against historical error distribution", "خطأ التنبؤ بصافي الربح الحالي مقارنة بتوزيع الأخطاء التاريخية"),
            Unit::Score)
            .lower_is_better(),
        def("comprehensive.detection.anomaly_receivables", c,
            ("Receivables Anomaly", "الشذوذ في الذمم المدينة"),
            ("Current receivables prediction error against historical error distribution", "خطأ التنبؤ بالذمم المدينة الحالية مقارنة بتوزيع الأخطاء التاريخية"),
            Unit::Score)
            .lower_is_better(),
        def("comprehensive.detection.anomaly_inventory", c,
            ("Inventory Anomaly", "الشذوذ في المخزون"),
            ("Current inventory prediction error against historical error distribution", "خطأ التنبؤ بالمخزون الحالي مقارنة بتوزيع الأخطاء التاريخية"),
            Unit::Score)
            .lower_is_better(),
        def("comprehensive.detection.anomaly_operating_cash_flow", c,
            ("Operating Cash Flow Anomaly", "الشذوذ في التدفق النقدي التشغيلي"),
            ("Current operating cash flow prediction error against historical error distribution", "خطأ التنبؤ بالتدفق النقدي التشغيلي الحالي مقارنة بتوزيع الأخطاء التاريخية"),
            Unit::Score)
            .lower_is_better(),
        def("comprehensive.detection.beneish_m_score", c,
            ("Beneish M-Score", "نموذج بينيش لكشف التلاعب"),
            ("Eight-variable earnings manipulation score", "مؤشر التلاعب في الأرباح بثمانية متغيرات"),
            Unit::Score)
            .lower_is_better(),
        def("comprehensive.detection.accruals_ratio", c,
            ("Accruals Ratio", "نسبة المستحقات"),
            ("(Net income - operating cash flow) / total assets", "(صافي الربح - التدفق النقدي التشغيلي) / إجمالي الأصول"),
            Unit::Percent)
            .lower_is_better(),
        def("comprehensive.detection.benford_first_digit", c,
            ("Benford First-Digit Test", "اختبار بنفورد للرقم الأول"),
            ("Mean absolute deviation of first-digit frequencies from Benford's law", "متوسط الانحراف المطلق لتكرارات الرقم الأول عن قانون بنفورد"),
            Unit::Ratio)
            .lower_is_better(),
        def("comprehensive.detection.balance_sheet_consistency", c,
            ("Balance Sheet Consistency", "اتساق الميزانية العمومية"),
            ("Largest relative gap between assets and liabilities plus equity", "أكبر فرق نسبي بين الأصول والخصوم مع حقوق الملكية"),
            Unit::Percent)
            .lower_is_better(),
    ]
}
