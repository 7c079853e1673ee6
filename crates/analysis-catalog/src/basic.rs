use analysis_core::{AnalysisDefinition, Category, Direction, Unit};

use crate::def;

#[rustfmt::skip]
pub(crate) fn structural() -> Vec<AnalysisDefinition> {
    let c = Category::Structural;
    vec![
        def("basic.structural.vertical_current_assets", c,
            ("Current Assets to Total Assets", "نسبة الأصول المتداولة إلى إجمالي الأصول"),
            ("Current assets as a share of total assets", "الأصول المتداولة كنسبة من إجمالي الأصول"),
            Unit::Percent)
            .benchmark("structure.currentAssetsShare")
            .closer_is_better(),
        def("basic.structural.vertical_non_current_assets", c,
            ("Non-current Assets to Total Assets", "نسبة الأصول غير المتداولة إلى إجمالي الأصول"),
            ("Non-current assets as a share of total assets", "الأصول غير المتداولة كنسبة من إجمالي الأصول"),
            Unit::Percent)
            .benchmark("structure.nonCurrentAssetsShare")
            .closer_is_better(),
        def("basic.structural.vertical_current_liabilities", c,
            ("Current Liabilities to Total Assets", "نسبة الخصوم المتداولة إلى إجمالي الأصول"),
            ("Current liabilities as a share of total liabilities and equity", "الخصوم المتداولة كنسبة من إجمالي الخصوم وحقوق الملكية"),
            Unit::Percent)
            .benchmark("structure.currentLiabilitiesShare")
            .lower_is_better(),
        def("basic.structural.vertical_total_liabilities", c,
            ("Total Liabilities to Total Assets", "نسبة إجمالي الخصوم إلى إجمالي الأصول"),
            ("Total liabilities as a share of total liabilities and equity", "إجمالي الخصوم كنسبة من إجمالي الخصوم وحقوق الملكية"),
            Unit::Percent)
            .benchmark("structure.liabilitiesShare")
            .lower_is_better(),
        def("basic.structural.vertical_equity", c,
            ("Equity to Total Assets", "نسبة حقوق الملكية إلى إجمالي الأصول"),
            ("Shareholders' equity as a share of total liabilities and equity", "حقوق الملكية كنسبة من إجمالي الخصوم وحقوق الملكية"),
            Unit::Percent)
            .benchmark("structure.equityShare"),
        def("basic.structural.vertical_cost_of_sales", c,
            ("Cost of Sales to Revenue", "نسبة تكلفة المبيعات إلى الإيرادات"),
            ("Cost of goods sold as a share of revenue", "تكلفة البضاعة المباعة كنسبة من الإيرادات"),
            Unit::Percent)
            .benchmark("structure.costOfSalesShare")
            .lower_is_better(),
        def("basic.structural.vertical_operating_expenses", c,
            ("Operating Expenses to Revenue", "نسبة المصروفات التشغيلية إلى الإيرادات"),
            ("Operating expenses as a share of revenue", "المصروفات التشغيلية كنسبة من الإيرادات"),
            Unit::Percent)
            .benchmark("structure.operatingExpenseShare")
            .lower_is_better(),
        def("basic.structural.vertical_net_income", c,
            ("Net Income to Revenue", "نسبة صافي الربح إلى الإيرادات"),
            ("Net income as a share of revenue", "صافي الربح كنسبة من الإيرادات"),
            Unit::Percent)
            .benchmark("profitability.netMargin"),
        def("basic.structural.horizontal_revenue", c,
            ("Revenue Year-over-Year Change", "التغير السنوي في الإيرادات"),
            ("Percentage change in revenue between consecutive years", "نسبة التغير في الإيرادات بين السنوات المتتالية"),
            Unit::Percent)
            .benchmark("growth.revenue"),
        def("basic.structural.horizontal_net_income", c,
            ("Net Income Year-over-Year Change", "التغير السنوي في صافي الربح"),
            ("Percentage change in net income between consecutive years", "نسبة التغير في صافي الربح بين السنوات المتتالية"),
            Unit::Percent)
            .benchmark("growth.netIncome"),
        def("basic.structural.horizontal_total_assets", c,
            ("Total Assets Year-over-Year Change", "التغير السنوي في إجمالي الأصول"),
            ("Percentage change in total assets between consecutive years", "نسبة التغير في إجمالي الأصول بين السنوات المتتالية"),
            Unit::Percent)
            .benchmark("growth.totalAssets"),
        def("basic.structural.horizontal_total_equity", c,
            ("Equity Year-over-Year Change", "التغير السنوي في حقوق الملكية"),
            ("Percentage change in shareholders' equity between consecutive years", "نسبة التغير في حقوق الملكية بين السنوات المتتالية"),
            Unit::Percent)
            .benchmark("growth.equity"),
        def("basic.structural.trend_revenue", c,
            ("Revenue Trend Index", "الرقم القياسي لاتجاه الإيرادات"),
            ("Revenue indexed to the first year (base = 100)", "الإيرادات منسوبة إلى سنة الأساس (الأساس = 100)"),
            Unit::Score),
        def("basic.structural.trend_net_income", c,
            ("Net Income Trend Index", "الرقم القياسي لاتجاه صافي الربح"),
            ("Net income indexed to the first year (base = 100)", "صافي الربح منسوبا إلى سنة الأساس (الأساس = 100)"),
            Unit::Score),
        def("basic.structural.trend_total_assets", c,
            ("Total Assets Trend Index", "الرقم القياسي لاتجاه إجمالي الأصول"),
            ("Total assets indexed to the first year (base = 100)", "إجمالي الأصول منسوبا إلى سنة الأساس (الأساس = 100)"),
            Unit::Score),
        def("basic.structural.cagr_revenue", c,
            ("Revenue CAGR", "معدل النمو السنوي المركب للإيرادات"),
            ("Compound annual growth rate of revenue over the analysed period", "معدل النمو السنوي المركب للإيرادات خلال فترة التحليل"),
            Unit::Percent)
            .benchmark("growth.revenueCagr"),
        def("basic.structural.cagr_total_assets", c,
            ("Total Assets CAGR", "معدل النمو السنوي المركب لإجمالي الأصول"),
            ("Compound annual growth rate of total assets over the analysed period", "معدل النمو السنوي المركب لإجمالي الأصول خلال فترة التحليل"),
            Unit::Percent)
            .benchmark("growth.assetsCagr"),
    ]
}

#[rustfmt::skip]
pub(crate) fn ratios() -> Vec<AnalysisDefinition> {
    let c = Category::Ratios;
    vec![
        // Liquidity
        def("basic.ratios.current_ratio", c,
            ("Current Ratio", "نسبة التداول"),
            ("Current assets / current liabilities", "الأصول المتداولة / الخصوم المتداولة"),
            Unit::Times)
            .benchmark("liquidity.currentRatio"),
        def("basic.ratios.quick_ratio", c,
            ("Quick Ratio", "نسبة السيولة السريعة"),
            ("(Cash + short-term investments + receivables) / current liabilities", "(النقدية + الاستثمارات قصيرة الأجل + الذمم المدينة) / الخصوم المتداولة"),
            Unit::Times)
            .benchmark("liquidity.quickRatio"),
        def("basic.ratios.cash_ratio", c,
            ("Cash Ratio", "نسبة النقدية"),
            ("(Cash + short-term investments) / current liabilities", "(النقدية + الاستثمارات قصيرة الأجل) / الخصوم المتداولة"),
            Unit::Times)
            .benchmark("liquidity.cashRatio"),
        def("basic.ratios.operating_cash_flow_ratio", c,
            ("Operating Cash Flow Ratio", "نسبة التدفق النقدي التشغيلي"),
            ("Operating cash flow / current liabilities", "التدفق النقدي التشغيلي / الخصوم المتداولة"),
            Unit::Times)
            .benchmark("liquidity.operatingCashFlowRatio"),
        def("basic.ratios.working_capital", c,
            ("Working Capital", "رأس المال العامل"),
            ("Current assets - current liabilities", "الأصول المتداولة - الخصوم المتداولة"),
            Unit::Currency),
        def("basic.ratios.working_capital_to_assets", c,
            ("Working Capital to Total Assets", "رأس المال العامل إلى إجمالي الأصول"),
            ("Working capital / total assets", "رأس المال العامل / إجمالي الأصول"),
            Unit::Percent)
            .benchmark("liquidity.workingCapitalToAssets"),
        def("basic.ratios.defensive_interval_days", c,
            ("Defensive Interval", "فترة الحماية الدفاعية"),
            ("Quick assets / daily cash operating expenses", "الأصول السريعة / المصروفات النقدية التشغيلية اليومية"),
            Unit::Days)
            .benchmark("liquidity.defensiveInterval"),
        def("basic.ratios.net_working_capital_ratio", c,
            ("Net Working Capital Ratio", "نسبة صافي رأس المال العامل"),
            ("Working capital / current liabilities", "رأس المال العامل / الخصوم المتداولة"),
            Unit::Times)
            .benchmark("liquidity.netWorkingCapitalRatio"),
        // Activity
        def("basic.ratios.inventory_turnover", c,
            ("Inventory Turnover", "معدل دوران المخزون"),
            ("Cost of goods sold / inventory", "تكلفة البضاعة المباعة / المخزون"),
            Unit::Times)
            .benchmark("activity.inventoryTurnover"),
        def("basic.ratios.days_inventory", c,
            ("Days Inventory Outstanding", "متوسط فترة الاحتفاظ بالمخزون"),
            ("Inventory / cost of goods sold x days in year", "المخزون / تكلفة البضاعة المباعة x أيام السنة"),
            Unit::Days)
            .benchmark("activity.daysInventory")
            .lower_is_better(),
        def("basic.ratios.receivables_turnover", c,
            ("Receivables Turnover", "معدل دوران الذمم المدينة"),
            ("Revenue / accounts receivable", "الإيرادات / الذمم المدينة"),
            Unit::Times)
            .benchmark("activity.receivablesTurnover"),
        def("basic.ratios.days_sales_outstanding", c,
            ("Days Sales Outstanding", "متوسط فترة التحصيل"),
            ("Accounts receivable / revenue x days in year", "الذمم المدينة / الإيرادات x أيام السنة"),
            Unit::Days)
            .benchmark("activity.daysSalesOutstanding")
            .lower_is_better(),
        def("basic.ratios.payables_turnover", c,
            ("Payables Turnover", "معدل دوران الذمم الدائنة"),
            ("Cost of goods sold / accounts payable", "تكلفة البضاعة المباعة / الذمم الدائنة"),
            Unit::Times)
            .benchmark("activity.payablesTurnover")
            .closer_is_better(),
        def("basic.ratios.days_payables_outstanding", c,
            ("Days Payables Outstanding", "متوسط فترة السداد"),
            ("Accounts payable / cost of goods sold x days in year", "الذمم الدائنة / تكلفة البضاعة المباعة x أيام السنة"),
            Unit::Days)
            .benchmark("activity.daysPayablesOutstanding")
            .closer_is_better(),
        def("basic.ratios.asset_turnover", c,
            ("Total Asset Turnover", "معدل دوران إجمالي الأصول"),
            ("Revenue / total assets", "الإيرادات / إجمالي الأصول"),
            Unit::Times)
            .benchmark("activity.assetTurnover"),
        def("basic.ratios.fixed_asset_turnover", c,
            ("Fixed Asset Turnover", "معدل دوران الأصول الثابتة"),
            ("Revenue / property, plant and equipment", "الإيرادات / الممتلكات والآلات والمعدات"),
            Unit::Times)
            .benchmark("activity.fixedAssetTurnover"),
        def("basic.ratios.current_asset_turnover", c,
            ("Current Asset Turnover", "معدل دوران الأصول المتداولة"),
            ("Revenue / current assets", "الإيرادات / الأصول المتداولة"),
            Unit::Times)
            .benchmark("activity.currentAssetTurnover"),
        def("basic.ratios.working_capital_turnover", c,
            ("Working Capital Turnover", "معدل دوران رأس المال العامل"),
            ("Revenue / working capital", "الإيرادات / رأس المال العامل"),
            Unit::Times)
            .benchmark("activity.workingCapitalTurnover"),
        def("basic.ratios.equity_turnover", c,
            ("Equity Turnover", "معدل دوران حقوق الملكية"),
            ("Revenue / shareholders' equity", "الإيرادات / حقوق الملكية"),
            Unit::Times)
            .benchmark("activity.equityTurnover"),
        def("basic.ratios.operating_cycle", c,
            ("Operating Cycle", "الدورة التشغيلية"),
            ("Days inventory outstanding + days sales outstanding", "فترة الاحتفاظ بالمخزون + فترة التحصيل"),
            Unit::Days)
            .benchmark("activity.operatingCycle")
            .lower_is_better(),
        // Leverage
        def("basic.ratios.debt_ratio", c,
            ("Debt Ratio", "نسبة المديونية"),
            ("Total liabilities / total assets", "إجمالي الخصوم / إجمالي الأصول"),
            Unit::Percent)
            .benchmark("leverage.debtRatio")
            .lower_is_better(),
        def("basic.ratios.debt_to_equity", c,
            ("Debt to Equity", "نسبة الديون إلى حقوق الملكية"),
            ("Total liabilities / shareholders' equity", "إجمالي الخصوم / حقوق الملكية"),
            Unit::Times)
            .benchmark("leverage.debtToEquity")
            .lower_is_better(),
        def("basic.ratios.equity_ratio", c,
            ("Equity Ratio", "نسبة الملكية"),
            ("Shareholders' equity / total assets", "حقوق الملكية / إجمالي الأصول"),
            Unit::Percent)
            .benchmark("leverage.equityRatio"),
        def("basic.ratios.equity_multiplier", c,
            ("Equity Multiplier", "مضاعف حقوق الملكية"),
            ("Total assets / shareholders' equity", "إجمالي الأصول / حقوق الملكية"),
            Unit::Times)
            .benchmark("leverage.equityMultiplier")
            .lower_is_better(),
        def("basic.ratios.long_term_debt_to_capital", c,
            ("Long-term Debt to Capital", "الديون طويلة الأجل إلى رأس المال"),
            ("Long-term debt / (long-term debt + equity)", "الديون طويلة الأجل / (الديون طويلة الأجل + حقوق الملكية)"),
            Unit::Percent)
            .benchmark("leverage.longTermDebtToCapital")
            .lower_is_better(),
        def("basic.ratios.interest_coverage", c,
            ("Interest Coverage", "معدل تغطية الفوائد"),
            ("Operating income / interest expense", "الربح التشغيلي / مصروف الفوائد"),
            Unit::Times)
            .benchmark("leverage.interestCoverage"),
        def("basic.ratios.debt_service_coverage", c,
            ("Debt Service Coverage", "معدل تغطية خدمة الدين"),
            ("EBITDA / (interest expense + short-term debt)", "الربح قبل الفوائد والضرائب والإهلاك / (مصروف الفوائد + الديون قصيرة الأجل)"),
            Unit::Times)
            .benchmark("leverage.debtServiceCoverage"),
        def("basic.ratios.cash_coverage", c,
            ("Cash Coverage", "معدل التغطية النقدية"),
            ("(Operating income + depreciation) / interest expense", "(الربح التشغيلي + الإهلاك) / مصروف الفوائد"),
            Unit::Times)
            .benchmark("leverage.cashCoverage"),
        def("basic.ratios.fixed_assets_to_equity", c,
            ("Fixed Assets to Equity", "الأصول الثابتة إلى حقوق الملكية"),
            ("Property, plant and equipment / shareholders' equity", "الممتلكات والآلات والمعدات / حقوق الملكية"),
            Unit::Times)
            .benchmark("leverage.fixedAssetsToEquity")
            .lower_is_better(),
        def("basic.ratios.current_liabilities_to_total_liabilities", c,
            ("Current to Total Liabilities", "الخصوم المتداولة إلى إجمالي الخصوم"),
            ("Current liabilities / total liabilities", "الخصوم المتداولة / إجمالي الخصوم"),
            Unit::Percent)
            .benchmark("leverage.currentLiabilitiesShare")
            .lower_is_better(),
        def("basic.ratios.net_debt_to_ebitda", c,
            ("Net Debt to EBITDA", "صافي الدين إلى الربح قبل الفوائد والضرائب والإهلاك"),
            ("(Interest-bearing debt - cash) / EBITDA", "(الديون بفوائد - النقدية) / الربح قبل الفوائد والضرائب والإهلاك"),
            Unit::Times)
            .benchmark("leverage.netDebtToEbitda")
            .lower_is_better(),
        // Profitability
        def("basic.ratios.gross_profit_margin", c,
            ("Gross Profit Margin", "هامش الربح الإجمالي"),
            ("Gross profit / revenue", "الربح الإجمالي / الإيرادات"),
            Unit::Percent)
            .benchmark("profitability.grossMargin"),
        def("basic.ratios.operating_margin", c,
            ("Operating Margin", "هامش الربح التشغيلي"),
            ("Operating income / revenue", "الربح التشغيلي / الإيرادات"),
            Unit::Percent)
            .benchmark("profitability.operatingMargin"),
        def("basic.ratios.net_profit_margin", c,
            ("Net Profit Margin", "هامش صافي الربح"),
            ("Net income / revenue", "صافي الربح / الإيرادات"),
            Unit::Percent)
            .benchmark("profitability.netMargin"),
        def("basic.ratios.ebitda_margin", c,
            ("EBITDA Margin", "هامش الربح قبل الفوائد والضرائب والإهلاك"),
            ("EBITDA / revenue", "الربح قبل الفوائد والضرائب والإهلاك / الإيرادات"),
            Unit::Percent)
            .benchmark("profitability.ebitdaMargin"),
        def("basic.ratios.return_on_assets", c,
            ("Return on Assets", "العائد على الأصول"),
            ("Net income / total assets", "صافي الربح / إجمالي الأصول"),
            Unit::Percent)
            .benchmark("profitability.roa"),
        def("basic.ratios.return_on_equity", c,
            ("Return on Equity", "العائد على حقوق الملكية"),
            ("Net income / shareholders' equity", "صافي الربح / حقوق الملكية"),
            Unit::Percent)
            .benchmark("profitability.roe"),
        def("basic.ratios.return_on_capital_employed", c,
            ("Return on Capital Employed", "العائد على رأس المال المستخدم"),
            ("Operating income / (total assets - current liabilities)", "الربح التشغيلي / (إجمالي الأصول - الخصوم المتداولة)"),
            Unit::Percent)
            .benchmark("profitability.roce"),
        def("basic.ratios.return_on_invested_capital", c,
            ("Return on Invested Capital", "العائد على رأس المال المستثمر"),
            ("Operating income x (1 - tax rate) / (equity + interest-bearing debt)", "الربح التشغيلي x (1 - معدل الضريبة) / (حقوق الملكية + الديون بفوائد)"),
            Unit::Percent)
            .benchmark("profitability.roic"),
        def("basic.ratios.pretax_margin", c,
            ("Pre-tax Margin", "هامش الربح قبل الضريبة"),
            ("Income before tax / revenue", "الربح قبل الضريبة / الإيرادات"),
            Unit::Percent)
            .benchmark("profitability.pretaxMargin"),
        def("basic.ratios.effective_tax_rate", c,
            ("Effective Tax Rate", "معدل الضريبة الفعلي"),
            ("Income tax / income before tax", "ضريبة الدخل / الربح قبل الضريبة"),
            Unit::Percent)
            .benchmark("profitability.effectiveTaxRate")
            .closer_is_better(),
        def("basic.ratios.operating_expense_ratio", c,
            ("Operating Expense Ratio", "نسبة المصروفات التشغيلية"),
            ("Operating expenses / revenue", "المصروفات التشغيلية / الإيرادات"),
            Unit::Percent)
            .benchmark("profitability.operatingExpenseRatio")
            .lower_is_better(),
        def("basic.ratios.basic_earnings_power", c,
            ("Basic Earnings Power", "القوة الإيرادية الأساسية"),
            ("Operating income / total assets", "الربح التشغيلي / إجمالي الأصول"),
            Unit::Percent)
            .benchmark("profitability.basicEarningsPower"),
        // Market
        def("basic.ratios.earnings_per_share", c,
            ("Earnings per Share", "ربحية السهم"),
            ("Net income / shares outstanding", "صافي الربح / عدد الأسهم القائمة"),
            Unit::Currency)
            .benchmark("market.eps"),
        def("basic.ratios.price_to_earnings", c,
            ("Price to Earnings", "مضاعف الربحية"),
            ("Share price / earnings per share", "سعر السهم / ربحية السهم"),
            Unit::Times)
            .benchmark("market.priceToEarnings")
            .closer_is_better(),
        def("basic.ratios.price_to_book", c,
            ("Price to Book", "مضاعف القيمة الدفترية"),
            ("Share price / book value per share", "سعر السهم / القيمة الدفترية للسهم"),
            Unit::Times)
            .benchmark("market.priceToBook")
            .closer_is_better(),
        def("basic.ratios.price_to_sales", c,
            ("Price to Sales", "مضاعف المبيعات"),
            ("Market capitalisation / revenue", "القيمة السوقية / الإيرادات"),
            Unit::Times)
            .benchmark("market.priceToSales")
            .closer_is_better(),
        def("basic.ratios.dividend_yield", c,
            ("Dividend Yield", "عائد التوزيعات"),
            ("Dividends per share / share price", "التوزيعات للسهم / سعر السهم"),
            Unit::Percent)
            .benchmark("market.dividendYield"),
        def("basic.ratios.dividend_payout", c,
            ("Dividend Payout Ratio", "نسبة توزيع الأرباح"),
            ("Dividends paid / net income", "التوزيعات المدفوعة / صافي الربح"),
            Unit::Percent)
            .benchmark("market.dividendPayout")
            .closer_is_better(),
        def("basic.ratios.book_value_per_share", c,
            ("Book Value per Share", "القيمة الدفترية للسهم"),
            ("Shareholders' equity / shares outstanding", "حقوق الملكية / عدد الأسهم القائمة"),
            Unit::Currency)
            .benchmark("market.bookValuePerShare"),
        def("basic.ratios.earnings_yield", c,
            ("Earnings Yield", "عائد الأرباح"),
            ("Earnings per share / share price", "ربحية السهم / سعر السهم"),
            Unit::Percent)
            .benchmark("market.earningsYield"),
        def("basic.ratios.ev_to_ebitda", c,
            ("EV to EBITDA", "قيمة المنشأة إلى الربح قبل الفوائد والضرائب والإهلاك"),
            ("(Market capitalisation + net debt) / EBITDA", "(القيمة السوقية + صافي الدين) / الربح قبل الفوائد والضرائب والإهلاك"),
            Unit::Times)
            .benchmark("valuation.evToEbitda")
            .lower_is_better(),
    ]
}

#[rustfmt::skip]
pub(crate) fn flow() -> Vec<AnalysisDefinition> {
    let c = Category::Flow;
    vec![
        def("basic.flow.free_cash_flow", c,
            ("Free Cash Flow", "التدفق النقدي الحر"),
            ("Operating cash flow + capital expenditures (negative)", "التدفق النقدي التشغيلي + النفقات الرأسمالية (سالبة)"),
            Unit::Currency),
        def("basic.flow.fcf_margin", c,
            ("Free Cash Flow Margin", "هامش التدفق النقدي الحر"),
            ("Free cash flow / revenue", "التدفق النقدي الحر / الإيرادات"),
            Unit::Percent)
            .benchmark("cashflow.fcfMargin"),
        def("basic.flow.ocf_margin", c,
            ("Operating Cash Flow Margin", "هامش التدفق النقدي التشغيلي"),
            ("Operating cash flow / revenue", "التدفق النقدي التشغيلي / الإيرادات"),
            Unit::Percent)
            .benchmark("cashflow.ocfMargin"),
        def("basic.flow.ocf_to_net_income", c,
            ("Quality of Earnings", "جودة الأرباح"),
            ("Operating cash flow / net income", "التدفق النقدي التشغيلي / صافي الربح"),
            Unit::Times)
            .benchmark("cashflow.qualityOfEarnings"),
        def("basic.flow.cash_return_on_assets", c,
            ("Cash Return on Assets", "العائد النقدي على الأصول"),
            ("Operating cash flow / total assets", "التدفق النقدي التشغيلي / إجمالي الأصول"),
            Unit::Percent)
            .benchmark("cashflow.cashReturnOnAssets"),
        def("basic.flow.cash_return_on_equity", c,
            ("Cash Return on Equity", "العائد النقدي على حقوق الملكية"),
            ("Operating cash flow / shareholders' equity", "التدفق النقدي التشغيلي / حقوق الملكية"),
            Unit::Percent)
            .benchmark("cashflow.cashReturnOnEquity"),
        def("basic.flow.ocf_to_total_debt", c,
            ("Cash Flow to Debt", "التدفق النقدي إلى الديون"),
            ("Operating cash flow / interest-bearing debt", "التدفق النقدي التشغيلي / الديون بفوائد"),
            Unit::Times)
            .benchmark("cashflow.ocfToDebt"),
        def("basic.flow.capex_coverage", c,
            ("Capital Expenditure Coverage", "تغطية النفقات الرأسمالية"),
            ("Operating cash flow / capital expenditures", "التدفق النقدي التشغيلي / النفقات الرأسمالية"),
            Unit::Times)
            .benchmark("cashflow.capexCoverage"),
        def("basic.flow.dividend_coverage", c,
            ("Dividend Cash Coverage", "التغطية النقدية للتوزيعات"),
            ("Free cash flow / dividends paid", "التدفق النقدي الحر / التوزيعات المدفوعة"),
            Unit::Times)
            .benchmark("cashflow.dividendCoverage"),
        def("basic.flow.cash_flow_adequacy", c,
            ("Cash Flow Adequacy", "كفاية التدفق النقدي"),
            ("Operating cash flow / (capex + dividends + short-term debt)", "التدفق النقدي التشغيلي / (النفقات الرأسمالية + التوزيعات + الديون قصيرة الأجل)"),
            Unit::Times)
            .benchmark("cashflow.adequacy"),
        def("basic.flow.capex_to_revenue", c,
            ("Capital Intensity", "كثافة الإنفاق الرأسمالي"),
            ("Capital expenditures / revenue", "النفقات الرأسمالية / الإيرادات"),
            Unit::Percent)
            .benchmark("cashflow.capexToRevenue")
            .closer_is_better(),
        def("basic.flow.capex_to_depreciation", c,
            ("Capex to Depreciation", "النفقات الرأسمالية إلى الإهلاك"),
            ("Capital expenditures / depreciation and amortisation", "النفقات الرأسمالية / الإهلاك والاستهلاك"),
            Unit::Times)
            .benchmark("cashflow.capexToDepreciation")
            .closer_is_better(),
        def("basic.flow.cash_conversion_cycle", c,
            ("Cash Conversion Cycle", "دورة التحويل النقدي"),
            ("Days inventory + days receivables - days payables", "فترة المخزون + فترة التحصيل - فترة السداد"),
            Unit::Days)
            .benchmark("cashflow.cashConversionCycle")
            .lower_is_better(),
        def("basic.flow.net_cash_flow", c,
            ("Net Cash Flow", "صافي التدفق النقدي"),
            ("Operating + investing + financing cash flow", "التدفق التشغيلي + الاستثماري + التمويلي"),
            Unit::Currency),
        def("basic.flow.fcf_to_equity", c,
            ("Free Cash Flow to Equity", "التدفق النقدي الحر لحملة الأسهم"),
            ("Free cash flow + net borrowing", "التدفق النقدي الحر + صافي الاقتراض"),
            Unit::Currency),
        def("basic.flow.ocf_growth", c,
            ("Operating Cash Flow Growth", "نمو التدفق النقدي التشغيلي"),
            ("Year-over-year change in operating cash flow", "التغير السنوي في التدفق النقدي التشغيلي"),
            Unit::Percent)
            .benchmark("cashflow.ocfGrowth"),
        def("basic.flow.fcf_cagr", c,
            ("Free Cash Flow CAGR", "معدل النمو المركب للتدفق النقدي الحر"),
            ("Compound annual growth rate of free cash flow", "معدل النمو السنوي المركب للتدفق النقدي الحر"),
            Unit::Percent)
            .benchmark("cashflow.fcfCagr"),
        def("basic.flow.reinvestment_ratio", c,
            ("Reinvestment Ratio", "نسبة إعادة الاستثمار"),
            ("Capital expenditures / operating cash flow", "النفقات الرأسمالية / التدفق النقدي التشغيلي"),
            Unit::Percent)
            .benchmark("cashflow.reinvestmentRatio")
            .direction(Direction::CloserIsBetter),
    ]
}
