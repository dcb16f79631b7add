//! 股票数据模型
//!
//! 数据源字段在获取边界一次性映射为这些强类型记录，
//! 缺失字段保持为 None，不以 0 或空字符串代替

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 公司行情与基本面快照
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// 股票代码
    pub ticker: String,
    /// 当前价格
    pub current_price: Option<f64>,
    /// 计价货币
    pub currency: Option<String>,
    /// 市值
    pub market_cap: Option<f64>,
    /// 行业
    pub sector: Option<String>,
    /// 总部城市
    pub city: Option<String>,
    /// 总部国家
    pub country: Option<String>,
    /// 简称
    pub short_name: Option<String>,
    /// 业务描述
    pub long_business_summary: Option<String>,
    /// 市盈率（TTM）
    pub trailing_pe: Option<f64>,
    /// EV/EBITDA
    pub enterprise_to_ebitda: Option<f64>,
    /// 净利率（小数）
    pub profit_margins: Option<f64>,
    /// ROE（小数）
    pub return_on_equity: Option<f64>,
    /// ROA（小数）
    pub return_on_assets: Option<f64>,
    /// Beta
    pub beta: Option<f64>,
    /// 负债权益比
    pub debt_to_equity: Option<f64>,
    /// 流动比率
    pub current_ratio: Option<f64>,
    /// 年度每股分红
    pub dividend_rate: Option<f64>,
    /// 市净率
    pub price_to_book: Option<f64>,
    /// 除息日
    pub ex_dividend_date: Option<NaiveDate>,
}

/// 单日收盘价
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// 收盘价序列，按日期升序
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    /// 股票代码
    pub ticker: String,
    /// 数据点
    pub points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(ticker: &str, points: Vec<PricePoint>) -> Self {
        Self {
            ticker: ticker.to_string(),
            points,
        }
    }

    /// 空序列表示数据源没有该代码的历史数据
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// 收盘价列表
    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }
}

/// 分红记录
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DividendRecord {
    /// 派息日期
    pub date: NaiveDate,
    /// 每股金额
    pub amount: f64,
}

/// 年度利润表
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IncomeStatementRow {
    /// 财年
    pub year: i32,
    /// 营业收入
    pub total_revenue: Option<f64>,
    /// 净利润
    pub net_income: Option<f64>,
}

/// 资讯条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    /// 标题
    pub title: Option<String>,
    /// 原文链接
    pub link: Option<String>,
    /// 摘要（描述中第一个标签之前的文本）
    pub summary: String,
    /// 发布时间
    pub published_at: String,
}

/// 股票查询参数
#[derive(Debug, Deserialize)]
pub struct StockQuery {
    /// 公司名称或代码
    pub q: Option<String>,
}

impl StockQuery {
    /// 去除首尾空白后的查询文本，空文本视为缺失
    pub fn text(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}
