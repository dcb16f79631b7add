//! 指标格式化
//!
//! 纯函数，将原始数值转换为展示字符串。缺失或非数值统一返回 "N/A"，
//! 避免把缺失数据显示成 0

use chrono::NaiveDate;

/// 缺失值占位符
pub const NOT_AVAILABLE: &str = "N/A";

const TRILLION: f64 = 1_000_000_000_000.0;
const BILLION: f64 = 1_000_000_000.0;
const MILLION: f64 = 1_000_000.0;

/// 大数缩写：T / B / M，其余按千分位输出整数
///
/// 按绝对值选择单位，保留符号（亏损显示为 "-2.50 B"）。
/// 0 与缺失同样返回 "N/A"
pub fn format_scaled(value: Option<f64>) -> String {
    let n = match value {
        Some(n) if n.is_finite() && n != 0.0 => n,
        _ => return NOT_AVAILABLE.to_string(),
    };

    let magnitude = n.abs();
    if magnitude >= TRILLION {
        format!("{:.2} T", n / TRILLION)
    } else if magnitude >= BILLION {
        format!("{:.2} B", n / BILLION)
    } else if magnitude >= MILLION {
        format!("{:.2} M", n / MILLION)
    } else {
        group_thousands(n.round() as i64)
    }
}

/// 定点格式化并追加单位
pub fn format_number(value: Option<f64>, decimals: usize, unit: &str) -> String {
    match value {
        Some(n) if n.is_finite() => format!("{:.*} {}", decimals, n, unit).trim().to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// 带符号的百分比，如 "+3.40 %"
pub fn format_signed_percent(value: Option<f64>) -> String {
    match value {
        Some(n) if n.is_finite() => format!("{:+.2} %", n),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// 小数比率转百分比，如 0.1234 -> "12.34 %"
pub fn format_ratio_percent(value: Option<f64>) -> String {
    format_number(value.map(|v| v * 100.0), 2, "%")
}

/// 日期格式化为 YYYY-MM-DD
pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// 文本字段，缺失或空白时返回 "N/A"
pub fn text_or_na(value: Option<&str>) -> String {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(NOT_AVAILABLE)
        .to_string()
}

/// 截取描述的前两句
pub fn shorten_description(summary: Option<&str>) -> String {
    let full = match summary.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => s,
        None => return NOT_AVAILABLE.to_string(),
    };

    let sentences: Vec<&str> = full.split(". ").collect();
    if sentences.len() > 1 {
        format!("{}.", sentences[..2].join(". "))
    } else {
        full.to_string()
    }
}

/// 整数千分位分隔
fn group_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if n < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}
