use analysis_core::{AnalysisDefinition, Category, Unit};

use crate::def;

#[rustfmt::skip]
pub(crate) fn comparison() -> Vec<AnalysisDefinition> {
    let c = Category::Comparison;
    vec![
        def("intermediate.comparison.percentile_current_ratio", c,
            ("Current Ratio Peer Percentile", "ترتيب نسبة التداول بين الشركات المماثلة"),
            ("Percentile rank of the current ratio within the peer sample", "الترتيب المئيني لنسبة التداول ضمن عينة الشركات المماثلة"),
            Unit::Percent)
            .benchmark("liquidity.currentRatio"),
        def("intermediate.comparison.percentile_roe", c,
            ("Return on Equity Peer Percentile", "ترتيب العائد على حقوق الملكية بين الشركات المماثلة"),
            ("Percentile rank of return on equity within the peer sample", "الترتيب المئيني للعائد على حقوق الملكية ضمن عينة الشركات المماثلة"),
            Unit::Percent)
            .benchmark("profitability.roe"),
        def("intermediate.comparison.percentile_net_margin", c,
            ("Net Margin Peer Percentile", "ترتيب هامش صافي الربح بين الشركات المماثلة"),
            ("Percentile rank of net profit margin within the peer sample", "الترتيب المئيني لهامش صافي الربح ضمن عينة الشركات المماثلة"),
            Unit::Percent)
            .benchmark("profitability.netMargin"),
        def("intermediate.comparison.percentile_debt_to_equity", c,
            ("Debt to Equity Peer Percentile", "ترتيب نسبة الديون إلى حقوق الملكية بين الشركات المماثلة"),
            ("Percentile rank of debt to equity within the peer sample", "الترتيب المئيني لنسبة الديون إلى حقوق الملكية ضمن عينة الشركات المماثلة"),
            Unit::Percent)
            .benchmark("leverage.debtToEquity")
            .lower_is_better(),
        def("intermediate.comparison.percentile_asset_turnover", c,
            ("Asset Turnover Peer Percentile", "ترتيب معدل دوران الأصول بين الشركات المماثلة"),
            ("Percentile rank of total asset turnover within the peer sample", "الترتيب المئيني لمعدل دوران الأصول ضمن عينة الشركات المماثلة"),
            Unit::Percent)
            .benchmark("activity.assetTurnover"),
        def("intermediate.comparison.percentile_revenue_growth", c,
            ("Revenue Growth Peer Percentile", "ترتيب نمو الإيرادات بين الشركات المماثلة"),
            ("Percentile rank of revenue growth within the peer sample", "الترتيب المئيني لنمو الإيرادات ضمن عينة الشركات المماثلة"),
            Unit::Percent)
            .benchmark("growth.revenue"),
        def("intermediate.comparison.gap_current_ratio", c,
            ("Current Ratio Gap to Industry", "فجوة نسبة التداول عن متوسط الصناعة"),
            ("Company current ratio - industry average", "نسبة تداول الشركة - متوسط الصناعة"),
            Unit::Times)
            .benchmark("liquidity.currentRatio"),
        def("intermediate.comparison.gap_roe", c,
            ("Return on Equity Gap to Industry", "فجوة العائد على حقوق الملكية عن متوسط الصناعة"),
            ("Company return on equity - industry average", "العائد على حقوق ملكية الشركة - متوسط الصناعة"),
            Unit::Percent)
            .benchmark("profitability.roe"),
        def("intermediate.comparison.gap_net_margin", c,
            ("Net Margin Gap to Industry", "فجوة هامش صافي الربح عن متوسط الصناعة"),
            ("Company net profit margin - industry average", "هامش صافي ربح الشركة - متوسط الصناعة"),
            Unit::Percent)
            .benchmark("profitability.netMargin"),
        def("intermediate.comparison.gap_debt_to_equity", c,
            ("Debt to Equity Gap to Industry", "فجوة نسبة الديون إلى حقوق الملكية عن متوسط الصناعة"),
            ("Company debt to equity - industry average", "نسبة ديون الشركة إلى حقوق الملكية - متوسط الصناعة"),
            Unit::Times)
            .benchmark("leverage.debtToEquity")
            .lower_is_better(),
        def("intermediate.comparison.zscore_roe", c,
            ("Return on Equity Peer Z-Score", "الدرجة المعيارية للعائد على حقوق الملكية"),
            ("Standard deviations of return on equity from the peer mean", "عدد الانحرافات المعيارية للعائد على حقوق الملكية عن متوسط الشركات المماثلة"),
            Unit::Score)
            .benchmark("profitability.roe"),
        def("intermediate.comparison.zscore_net_margin", c,
            ("Net Margin Peer Z-Score", "الدرجة المعيارية لهامش صافي الربح"),
            ("Standard deviations of net margin from the peer mean", "عدد الانحرافات المعيارية لهامش صافي الربح عن متوسط الشركات المماثلة"),
            Unit::Score)
            .benchmark("profitability.netMargin"),
        def("intermediate.comparison.zscore_debt_to_equity", c,
            ("Debt to Equity Peer Z-Score", "الدرجة المعيارية لنسبة الديون إلى حقوق الملكية"),
            ("Standard deviations of debt to equity from the peer mean", "عدد الانحرافات المعيارية لنسبة الديون إلى حقوق الملكية عن متوسط الشركات المماثلة"),
            Unit::Score)
            .benchmark("leverage.debtToEquity")
            .lower_is_better(),
        def("intermediate.comparison.sector_growth_relative", c,
            ("Revenue Growth Relative to Sector", "نمو الإيرادات مقارنة بالقطاع"),
            ("Latest revenue growth - latest sector historical growth", "آخر نمو للإيرادات - آخر نمو تاريخي للقطاع"),
            Unit::Percent)
            .benchmark("growth.revenue"),
        def("intermediate.comparison.composite_peer_score", c,
            ("Composite Peer Score", "الدرجة المركبة للمقارنة مع الشركات المماثلة"),
            ("Average direction-adjusted percentile across key peer metrics", "متوسط الترتيب المئيني المعدل حسب الاتجاه عبر المؤشرات الرئيسية"),
            Unit::Score),
    ]
}

#[rustfmt::skip]
pub(crate) fn valuation() -> Vec<AnalysisDefinition> {
    let c = Category::Valuation;
    vec![
        def("intermediate.valuation.npv", c,
            ("Net Present Value", "صافي القيمة الحالية"),
            ("Sum of discounted cash flows less the initial investment", "مجموع التدفقات النقدية المخصومة مطروحا منها الاستثمار المبدئي"),
            Unit::Currency),
        def("intermediate.valuation.irr", c,
            ("Internal Rate of Return", "معدل العائد الداخلي"),
            ("Discount rate at which the net present value is zero", "معدل الخصم الذي يجعل صافي القيمة الحالية صفرا"),
            Unit::Percent),
        def("intermediate.valuation.mirr", c,
            ("Modified Internal Rate of Return", "معدل العائد الداخلي المعدل"),
            ("Return assuming reinvestment of inflows at the reinvestment rate", "العائد بافتراض إعادة استثمار التدفقات الداخلة بمعدل إعادة الاستثمار"),
            Unit::Percent),
        def("intermediate.valuation.payback_period", c,
            ("Payback Period", "فترة الاسترداد"),
            ("Years until cumulative cash flow recovers the investment", "عدد السنوات حتى يسترد التدفق النقدي التراكمي الاستثمار"),
            Unit::Years)
            .lower_is_better(),
        def("intermediate.valuation.discounted_payback_period", c,
            ("Discounted Payback Period", "فترة الاسترداد المخصومة"),
            ("Years until cumulative discounted cash flow recovers the investment", "عدد السنوات حتى يسترد التدفق النقدي المخصوم التراكمي الاستثمار"),
            Unit::Years)
            .lower_is_better(),
        def("intermediate.valuation.profitability_index", c,
            ("Profitability Index", "مؤشر الربحية"),
            ("Present value of inflows / initial investment", "القيمة الحالية للتدفقات الداخلة / الاستثمار المبدئي"),
            Unit::Times),
        def("intermediate.valuation.accounting_rate_of_return", c,
            ("Accounting Rate of Return", "معدل العائد المحاسبي"),
            ("Average annual net income / average invested capital", "متوسط صافي الربح السنوي / متوسط رأس المال المستثمر"),
            Unit::Percent),
        def("intermediate.valuation.equivalent_annual_annuity", c,
            ("Equivalent Annual Annuity", "الدفعة السنوية المكافئة"),
            ("Net present value spread as a level annuity over the project life", "صافي القيمة الحالية موزعا كدفعة سنوية ثابتة على عمر المشروع"),
            Unit::Currency),
        def("intermediate.valuation.wacc", c,
            ("Weighted Average Cost of Capital", "المتوسط المرجح لتكلفة رأس المال"),
            ("Cost of equity and after-tax cost of debt weighted by capital structure", "تكلفة حقوق الملكية وتكلفة الدين بعد الضريبة مرجحة بهيكل رأس المال"),
            Unit::Percent)
            .benchmark("valuation.wacc")
            .lower_is_better(),
        def("intermediate.valuation.capm_cost_of_equity", c,
            ("Cost of Equity (CAPM)", "تكلفة حقوق الملكية (نموذج تسعير الأصول الرأسمالية)"),
            ("Risk-free rate + beta x market risk premium", "المعدل الخالي من المخاطر + بيتا x علاوة مخاطر السوق"),
            Unit::Percent)
            .benchmark("valuation.costOfEquity")
            .lower_is_better(),
        def("intermediate.valuation.dcf_enterprise_value", c,
            ("DCF Enterprise Value", "قيمة المنشأة بطريقة التدفقات المخصومة"),
            ("Present value of projected free cash flows plus terminal value", "القيمة الحالية للتدفقات الحرة المتوقعة مضافا إليها القيمة النهائية"),
            Unit::Currency),
        def("intermediate.valuation.dcf_equity_value", c,
            ("DCF Equity Value", "قيمة حقوق الملكية بطريقة التدفقات المخصومة"),
            ("Enterprise value - debt + cash", "قيمة المنشأة - الديون + النقدية"),
            Unit::Currency),
        def("intermediate.valuation.terminal_value", c,
            ("Terminal Value", "القيمة النهائية"),
            ("Last projected free cash flow x (1 + g) / (WACC - g)", "آخر تدفق حر متوقع x (1 + g) / (تكلفة رأس المال - g)"),
            Unit::Currency),
        def("intermediate.valuation.intrinsic_value_per_share", c,
            ("Intrinsic Value per Share", "القيمة الجوهرية للسهم"),
            ("DCF equity value / shares outstanding", "قيمة حقوق الملكية بالتدفقات المخصومة / عدد الأسهم القائمة"),
            Unit::Currency),
        def("intermediate.valuation.upside_potential", c,
            ("Upside Potential", "إمكانية الارتفاع"),
            ("Intrinsic value per share / share price - 1", "القيمة الجوهرية للسهم / سعر السهم - 1"),
            Unit::Percent),
        def("intermediate.valuation.ddm_value", c,
            ("Dividend Discount Model Value", "القيمة بنموذج خصم التوزيعات"),
            ("Next dividend per share / (cost of equity - g)", "توزيعات السهم القادمة / (تكلفة حقوق الملكية - g)"),
            Unit::Currency),
        def("intermediate.valuation.eva", c,
            ("Economic Value Added", "القيمة الاقتصادية المضافة"),
            ("NOPAT - WACC x invested capital", "صافي الربح التشغيلي بعد الضريبة - تكلفة رأس المال x رأس المال المستثمر"),
            Unit::Currency),
        def("intermediate.valuation.mva", c,
            ("Market Value Added", "القيمة السوقية المضافة"),
            ("Market value of capital - invested capital", "القيمة السوقية لرأس المال - رأس المال المستثمر"),
            Unit::Currency),
        def("intermediate.valuation.implied_ev_to_ebitda", c,
            ("Implied EV to EBITDA", "مضاعف قيمة المنشأة الضمني إلى الربح قبل الفوائد والضرائب والإهلاك"),
            ("DCF enterprise value / EBITDA", "قيمة المنشأة بالتدفقات المخصومة / الربح قبل الفوائد والضرائب والإهلاك"),
            Unit::Times)
            .benchmark("valuation.evToEbitda")
            .closer_is_better(),
        def("intermediate.valuation.real_option_expansion", c,
            ("Expansion Option Value", "قيمة خيار التوسع"),
            ("Black-Scholes value of the option to expand", "قيمة خيار التوسع بنموذج بلاك شولز"),
            Unit::Currency),
    ]
}

#[rustfmt::skip]
pub(crate) fn performance() -> Vec<AnalysisDefinition> {
    let c = Category::Performance;
    vec![
        def("intermediate.performance.dupont_three_step", c,
            ("DuPont Analysis (3-step)", "تحليل ديبونت الثلاثي"),
            ("Net margin x asset turnover x equity multiplier", "هامش صافي الربح x دوران الأصول x مضاعف حقوق الملكية"),
            Unit::Percent)
            .benchmark("profitability.roe"),
        def("intermediate.performance.dupont_five_step", c,
            ("DuPont Analysis (5-step)", "تحليل ديبونت الخماسي"),
            ("Tax burden x interest burden x operating margin x asset turnover x equity multiplier", "العبء الضريبي x عبء الفوائد x الهامش التشغيلي x دوران الأصول x مضاعف حقوق الملكية"),
            Unit::Percent)
            .benchmark("profitability.roe"),
        def("intermediate.performance.tax_burden", c,
            ("Tax Burden", "العبء الضريبي"),
            ("Net income / income before tax", "صافي الربح / الربح قبل الضريبة"),
            Unit::Ratio)
            .benchmark("performance.taxBurden"),
        def("intermediate.performance.interest_burden", c,
            ("Interest Burden", "عبء الفوائد"),
            ("Income before tax / operating income", "الربح قبل الضريبة / الربح التشغيلي"),
            Unit::Ratio)
            .benchmark("performance.interestBurden"),
        def("intermediate.performance.sustainable_growth", c,
            ("Sustainable Growth Rate", "معدل النمو المستدام"),
            ("Return on equity x retention ratio", "العائد على حقوق الملكية x نسبة الاحتجاز"),
            Unit::Percent)
            .benchmark("performance.sustainableGrowth"),
        def("intermediate.performance.internal_growth", c,
            ("Internal Growth Rate", "معدل النمو الداخلي"),
            ("ROA x b / (1 - ROA x b)", "العائد على الأصول x b / (1 - العائد على الأصول x b)"),
            Unit::Percent)
            .benchmark("performance.internalGrowth"),
        def("intermediate.performance.degree_operating_leverage", c,
            ("Degree of Operating Leverage", "درجة الرافعة التشغيلية"),
            ("% change in operating income / % change in revenue", "نسبة التغير في الربح التشغيلي / نسبة التغير في الإيرادات"),
            Unit::Times)
            .benchmark("performance.operatingLeverage")
            .lower_is_better(),
        def("intermediate.performance.degree_financial_leverage", c,
            ("Degree of Financial Leverage", "درجة الرافعة المالية"),
            ("Operating income / income before tax", "الربح التشغيلي / الربح قبل الضريبة"),
            Unit::Times)
            .benchmark("performance.financialLeverage")
            .lower_is_better(),
        def("intermediate.performance.degree_combined_leverage", c,
            ("Degree of Combined Leverage", "درجة الرافعة المركبة"),
            ("Operating leverage x financial leverage", "الرافعة التشغيلية x الرافعة المالية"),
            Unit::Times)
            .benchmark("performance.combinedLeverage")
            .lower_is_better(),
        def("intermediate.performance.break_even_revenue", c,
            ("Break-even Revenue", "إيرادات التعادل"),
            ("Fixed costs / contribution margin ratio", "التكاليف الثابتة / نسبة هامش المساهمة"),
            Unit::Currency)
            .lower_is_better(),
        def("intermediate.performance.margin_of_safety", c,
            ("Margin of Safety", "هامش الأمان"),
            ("(Revenue - break-even revenue) / revenue", "(الإيرادات - إيرادات التعادل) / الإيرادات"),
            Unit::Percent)
            .benchmark("performance.marginOfSafety"),
        def("intermediate.performance.roic_wacc_spread", c,
            ("ROIC - WACC Spread", "الفرق بين العائد على رأس المال المستثمر وتكلفته"),
            ("Return on invested capital - weighted average cost of capital", "العائد على رأس المال المستثمر - المتوسط المرجح لتكلفة رأس المال"),
            Unit::Percent),
        def("intermediate.performance.profit_growth_gap", c,
            ("Profit vs Revenue Growth Gap", "الفجوة بين نمو الأرباح ونمو الإيرادات"),
            ("Net income growth - revenue growth", "نمو صافي الربح - نمو الإيرادات"),
            Unit::Percent),
        def("intermediate.performance.asset_growth_efficiency", c,
            ("Asset Growth Efficiency", "كفاءة نمو الأصول"),
            ("Revenue growth / total asset growth", "نمو الإيرادات / نمو إجمالي الأصول"),
            Unit::Times),
        def("intermediate.performance.performance_scorecard", c,
            ("Performance Scorecard", "بطاقة الأداء المتوازن"),
            ("Composite 0-100 score across profitability, efficiency, liquidity and solvency", "درجة مركبة من 0 إلى 100 للربحية والكفاءة والسيولة والملاءة"),
            Unit::Score)
            .benchmark("performance.scorecard"),
    ]
}
