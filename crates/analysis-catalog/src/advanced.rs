use analysis_core::{AnalysisDefinition, Category, Unit};

use crate::def;

#[rustfmt::skip]
pub(crate) fn modeling() -> Vec<AnalysisDefinition> {
    let c = Category::Modeling;
    vec![
        def("advanced.modeling.scenario_expected_value", c,
            ("Scenario Expected Value", "القيمة المتوقعة للسيناريوهات"),
            ("Probability-weighted value created across scenarios", "القيمة المضافة المرجحة بالاحتمالات عبر السيناريوهات"),
            Unit::Currency),
        def("advanced.modeling.scenario_dispersion", c,
            ("Scenario Dispersion", "تشتت السيناريوهات"),
            ("Probability-weighted standard deviation of scenario values", "الانحراف المعياري المرجح بالاحتمالات لقيم السيناريوهات"),
            Unit::Currency)
            .lower_is_better(),
        def("advanced.modeling.sensitivity_discount_rate", c,
            ("Discount Rate Sensitivity", "الحساسية لمعدل الخصم"),
            ("% change in enterprise value for a one point rise in the discount rate", "نسبة التغير في قيمة المنشأة عند ارتفاع معدل الخصم نقطة واحدة"),
            Unit::Percent)
            .lower_is_better(),
        def("advanced.modeling.sensitivity_growth_rate", c,
            ("Growth Rate Sensitivity", "الحساسية لمعدل النمو"),
            ("% change in enterprise value for a one point fall in revenue growth", "نسبة التغير في قيمة المنشأة عند انخفاض نمو الإيرادات نقطة واحدة"),
            Unit::Percent)
            .lower_is_better(),
        def("advanced.modeling.tornado_range", c,
            ("Tornado Range", "مدى مخطط الإعصار"),
            ("Largest swing in enterprise value across single-driver shocks", "أكبر تأرجح في قيمة المنشأة عند صدمة كل محرك على حدة"),
            Unit::Currency)
            .lower_is_better(),
        def("advanced.modeling.stress_test_npv", c,
            ("Stress Test Value", "قيمة اختبار الضغط"),
            ("Value created under a combined adverse shock", "القيمة المضافة في ظل صدمة سلبية مجمعة"),
            Unit::Currency),
        def("advanced.modeling.monte_carlo_npv_mean", c,
            ("Monte Carlo Mean Value", "متوسط القيمة بمحاكاة مونت كارلو"),
            ("Mean simulated value created", "متوسط القيمة المضافة المحاكاة"),
            Unit::Currency),
        def("advanced.modeling.monte_carlo_npv_var", c,
            ("Monte Carlo Value at Risk", "القيمة المعرضة للخطر بمحاكاة مونت كارلو"),
            ("Shortfall from the mean at the configured confidence level", "الانخفاض عن المتوسط عند مستوى الثقة المحدد"),
            Unit::Currency)
            .lower_is_better(),
        def("advanced.modeling.monte_carlo_npv_cvar", c,
            ("Monte Carlo Conditional Value at Risk", "القيمة المشروطة المعرضة للخطر بمحاكاة مونت كارلو"),
            ("Average shortfall from the mean beyond the value at risk", "متوسط الانخفاض عن المتوسط فيما يتجاوز القيمة المعرضة للخطر"),
            Unit::Currency)
            .lower_is_better(),
        def("advanced.modeling.monte_carlo_loss_probability", c,
            ("Probability of Value Loss", "احتمال خسارة القيمة"),
            ("Share of simulations with negative value created", "نسبة المحاكاة ذات القيمة المضافة السالبة"),
            Unit::Probability)
            .lower_is_better(),
        def("advanced.modeling.monte_carlo_revenue", c,
            ("Simulated Terminal-Year Revenue", "الإيرادات المحاكاة لسنة نهاية التوقع"),
            ("Median simulated revenue at the end of the projection", "وسيط الإيرادات المحاكاة في نهاية فترة التوقع"),
            Unit::Currency),
        def("advanced.modeling.linear_programming", c,
            ("Capital Allocation Optimum", "التخصيص الأمثل لرأس المال"),
            ("Linear programme optimum with shadow prices", "الحل الأمثل للبرمجة الخطية مع أسعار الظل"),
            Unit::Currency),
        def("advanced.modeling.goal_programming", c,
            ("Goal Programming Deviation", "انحراف البرمجة بالأهداف"),
            ("Weighted deviation from financial targets at the optimum", "الانحراف المرجح عن الأهداف المالية عند الحل الأمثل"),
            Unit::Score)
            .lower_is_better(),
        def("advanced.modeling.game_theory_equilibrium", c,
            ("Pricing Game Equilibrium Payoff", "عائد التوازن في لعبة التسعير"),
            ("Company payoff at the Nash equilibrium of a two-player pricing game", "عائد الشركة عند توازن ناش في لعبة تسعير بين منافسين"),
            Unit::Currency),
    ]
}

#[rustfmt::skip]
pub(crate) fn statistical() -> Vec<AnalysisDefinition> {
    let c = Category::Statistical;
    vec![
        def("advanced.statistical.revenue_trend_slope", c,
            ("Revenue Trend Slope", "ميل اتجاه الإيرادات"),
            ("Least-squares annual change in revenue", "التغير السنوي في الإيرادات بطريقة المربعات الصغرى"),
            Unit::Currency),
        def("advanced.statistical.revenue_trend_r_squared", c,
            ("Revenue Trend Fit (R²)", "جودة توفيق اتجاه الإيرادات"),
            ("Coefficient of determination of the revenue trend", "معامل التحديد لاتجاه الإيرادات"),
            Unit::Ratio)
            .benchmark("statistics.trendFit"),
        def("advanced.statistical.revenue_linear_forecast", c,
            ("Revenue Linear Forecast", "التنبؤ الخطي بالإيرادات"),
            ("Next-year revenue from the least-squares trend", "إيرادات السنة القادمة من اتجاه المربعات الصغرى"),
            Unit::Currency),
        def("advanced.statistical.net_income_linear_forecast", c,
            ("Net Income Linear Forecast", "التنبؤ الخطي بصافي الربح"),
            ("Next-year net income from the least-squares trend", "صافي ربح السنة القادمة من اتجاه المربعات الصغرى"),
            Unit::Currency),
        def("advanced.statistical.exponential_smoothing_revenue", c,
            ("Revenue Exponential Smoothing Forecast", "التنبؤ بالإيرادات بالتمهيد الأسي"),
            ("Next-year revenue by simple exponential smoothing", "إيرادات السنة القادمة بالتمهيد الأسي البسيط"),
            Unit::Currency),
        def("advanced.statistical.revenue_growth_volatility", c,
            ("Revenue Growth Volatility", "تذبذب نمو الإيرادات"),
            ("Standard deviation of annual revenue growth", "الانحراف المعياري لنمو الإيرادات السنوي"),
            Unit::Percent)
            .benchmark("statistics.revenueVolatility")
            .lower_is_better(),
        def("advanced.statistical.earnings_volatility", c,
            ("Earnings Volatility", "تذبذب الأرباح"),
            ("Coefficient of variation of net income", "معامل الاختلاف لصافي الربح"),
            Unit::Ratio)
            .benchmark("statistics.earningsVolatility")
            .lower_is_better(),
        def("advanced.statistical.margin_stability", c,
            ("Net Margin Stability", "استقرار هامش صافي الربح"),
            ("Standard deviation of net margin in percentage points", "الانحراف المعياري لهامش صافي الربح بالنقاط المئوية"),
            Unit::Percent)
            .benchmark("statistics.marginStability")
            .lower_is_better(),
        def("advanced.statistical.revenue_income_correlation", c,
            ("Revenue-Income Correlation", "الارتباط بين الإيرادات وصافي الربح"),
            ("Pearson correlation between revenue and net income", "معامل ارتباط بيرسون بين الإيرادات وصافي الربح"),
            Unit::Ratio)
            .benchmark("statistics.revenueIncomeCorrelation"),
        def("advanced.statistical.roe_history_zscore", c,
            ("ROE Z-Score vs Own History", "الدرجة المعيارية للعائد على حقوق الملكية مقارنة بتاريخ الشركة"),
            ("Latest return on equity relative to prior years", "آخر عائد على حقوق الملكية مقارنة بالسنوات السابقة"),
            Unit::Score),
        def("advanced.statistical.sector_history_zscore", c,
            ("Revenue Growth Z-Score vs Sector History", "الدرجة المعيارية لنمو الإيرادات مقارنة بتاريخ القطاع"),
            ("Latest revenue growth relative to the sector's historical growth", "آخر نمو للإيرادات مقارنة بالنمو التاريخي للقطاع"),
            Unit::Score),
    ]
}
