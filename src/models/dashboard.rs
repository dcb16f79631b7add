//! 看板展示模型
//!
//! 所有数值均已格式化为展示字符串，缺失值统一显示为 "N/A"

use serde::{Deserialize, Serialize};

use super::stock::{NewsItem, PricePoint};
use crate::error::FetchError;

/// 看板分区
///
/// 单个分区失败不影响其他分区
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Section<T> {
    /// 数据可用
    Available { data: T },
    /// 数据不可用
    Unavailable {
        /// 错误类别：not_found / data_unavailable / transport_failure
        kind: String,
        /// 原因
        reason: String,
    },
}

impl<T> Section<T> {
    pub fn available(data: T) -> Self {
        Section::Available { data }
    }

    pub fn unavailable(error: &FetchError) -> Self {
        Section::Unavailable {
            kind: error.kind().to_string(),
            reason: error.to_string(),
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Section::Available { .. })
    }

    /// 可用时返回数据引用
    #[cfg(test)]
    pub fn data(&self) -> Option<&T> {
        match self {
            Section::Available { data } => Some(data),
            Section::Unavailable { .. } => None,
        }
    }
}

/// 公司概况
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyOverview {
    /// 公司名称（无简称时使用代码）
    pub name: String,
    /// 总部：城市, 国家
    pub headquarters: String,
    /// 简短描述（前两句）
    pub description: String,
    /// 当前价格（含货币）
    pub price: String,
    /// 行业
    pub sector: String,
    /// 市值（含货币）
    pub market_cap: String,
    /// 市盈率
    pub pe_ratio: String,
}

/// 基本面指标
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundamentalsView {
    pub enterprise_to_ebitda: String,
    pub profit_margins: String,
    pub return_on_equity: String,
    pub return_on_assets: String,
    pub beta: String,
    pub debt_to_equity: String,
    pub current_ratio: String,
    pub price_to_book: String,
}

/// 区间表现与走势图数据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceView {
    /// 近 1 月
    pub one_month: String,
    /// 近 3 月
    pub three_months: String,
    /// 近 6 月
    pub six_months: String,
    /// 近 1 年
    pub one_year: String,
    /// 收盘价序列
    pub series: Vec<PricePoint>,
}

/// 单次分红展示
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DividendRow {
    pub date: String,
    pub amount: String,
}

/// 分红信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DividendsView {
    /// 年度每股分红（来自行情快照）
    pub dividend_rate: String,
    /// 除息日
    pub ex_dividend_date: String,
    /// 最近分红记录，最新在前
    pub history: Vec<DividendRow>,
}

/// 年度利润表展示
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeRow {
    pub year: i32,
    pub total_revenue: String,
    pub net_income: String,
}

/// 完整看板
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    /// 原始查询
    pub query: String,
    /// 解析出的代码
    pub ticker: String,
    pub overview: Section<CompanyOverview>,
    pub fundamentals: Section<FundamentalsView>,
    pub performance: Section<PerformanceView>,
    pub dividends: Section<DividendsView>,
    pub income_statement: Section<Vec<IncomeRow>>,
    pub news: Section<Vec<NewsItem>>,
}

/// 宏观指标展示
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroIndicator {
    pub label: String,
    /// 行情代码，固定值指标为 None
    pub symbol: Option<String>,
    pub value: String,
}

/// 宏观侧栏
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroSnapshot {
    /// 利率与国债收益率
    pub rates: Vec<MacroIndicator>,
    /// 汇率
    pub fx: Vec<MacroIndicator>,
}
