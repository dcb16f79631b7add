//! 区间涨跌幅计算
//!
//! 以交易日为单位回看，不按自然日换算

use crate::models::PriceSeries;

/// 约 1 个月
pub const ONE_MONTH_SESSIONS: usize = 21;
/// 约 3 个月
pub const THREE_MONTHS_SESSIONS: usize = 63;
/// 约 6 个月
pub const SIX_MONTHS_SESSIONS: usize = 126;
/// 约 1 年
pub const ONE_YEAR_SESSIONS: usize = 252;

/// 最新收盘价相对 `sessions_back` 个交易日前收盘价的涨跌幅（百分比）
///
/// 序列长度不超过 `sessions_back` 时返回 None
pub fn trend(series: &PriceSeries, sessions_back: usize) -> Option<f64> {
    percent_change(&series.closes(), sessions_back)
}

/// 基于收盘价列表计算涨跌幅
pub fn percent_change(closes: &[f64], sessions_back: usize) -> Option<f64> {
    if closes.len() <= sessions_back {
        return None;
    }

    let latest = closes[closes.len() - 1];
    let base = closes[closes.len() - 1 - sessions_back];

    // 基准价为 0 时百分比无意义
    if base == 0.0 || !base.is_finite() || !latest.is_finite() {
        return None;
    }

    Some((latest - base) / base * 100.0)
}

/// 看板使用的四个标准区间
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendSet {
    pub one_month: Option<f64>,
    pub three_months: Option<f64>,
    pub six_months: Option<f64>,
    pub one_year: Option<f64>,
}

impl TrendSet {
    pub fn from_series(series: &PriceSeries) -> Self {
        Self {
            one_month: trend(series, ONE_MONTH_SESSIONS),
            three_months: trend(series, THREE_MONTHS_SESSIONS),
            six_months: trend(series, SIX_MONTHS_SESSIONS),
            one_year: trend(series, ONE_YEAR_SESSIONS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PricePoint;
    use chrono::NaiveDate;

    fn series_of(closes: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let points = closes
            .iter()
            .enumerate()
            .map(|(i, close)| PricePoint {
                date: start + chrono::Duration::days(i as i64),
                close: *close,
            })
            .collect();
        PriceSeries::new("TEST", points)
    }

    /// 测试按交易日回看
    #[test]
    fn test_trend_one_session() {
        let series = series_of(&[100.0, 102.0, 95.0, 110.0]);
        let result = trend(&series, 1).unwrap();
        let expected = (110.0 - 95.0) / 95.0 * 100.0;
        println!("  trend(1) = {} (期望: {})", result, expected);
        assert!((result - expected).abs() < 1e-12);
        assert!((result - 15.789473684).abs() < 1e-6);
    }

    /// 测试下跌为负值
    #[test]
    fn test_trend_negative() {
        let series = series_of(&[100.0, 102.0, 95.0, 110.0]);
        let result = trend(&series, 2).unwrap();
        assert!((result - (110.0 - 102.0) / 102.0 * 100.0).abs() < 1e-12);

        let falling = series_of(&[120.0, 90.0]);
        assert!((trend(&falling, 1).unwrap() + 25.0).abs() < 1e-12);
    }

    /// 测试历史不足
    #[test]
    fn test_trend_insufficient_history() {
        let series = series_of(&[100.0, 102.0]);
        assert_eq!(trend(&series, 5), None);
        assert_eq!(trend(&series, 2), None);
        assert!(trend(&series, 1).is_some());
        assert_eq!(trend(&series_of(&[]), 0), None);
    }

    /// 测试 0 回看与 0 基准价
    #[test]
    fn test_trend_edge_cases() {
        assert_eq!(trend(&series_of(&[50.0]), 0), Some(0.0));
        assert_eq!(trend(&series_of(&[0.0, 10.0]), 1), None);
    }

    /// 测试标准区间
    #[test]
    fn test_trend_set() {
        let closes: Vec<f64> = (0..130).map(|i| 100.0 + i as f64).collect();
        let set = TrendSet::from_series(&series_of(&closes));
        assert!(set.one_month.is_some());
        assert!(set.three_months.is_some());
        assert!(set.six_months.is_some());
        assert_eq!(set.one_year, None);

        let latest = 229.0;
        let base = closes[closes.len() - 1 - 21];
        assert!((set.one_month.unwrap() - (latest - base) / base * 100.0).abs() < 1e-12);
    }
}
