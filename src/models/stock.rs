//! 股票数据模型
//!
//! 定义行情快照、历史收盘价以及对外输出的数据结构

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 股票行情记录
///
/// `/api/stocks` 返回的单条数据，价格和涨跌幅均保留两位小数
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct QuoteRecord {
    /// 股票代码
    pub symbol: String,
    /// 显示名称（取不到时使用股票代码）
    pub name: String,
    /// 当前价格，0 表示无数据
    pub price: f64,
    /// 涨跌幅（百分比）
    pub change: f64,
}

impl QuoteRecord {
    /// 降级记录：上游无可用数据时返回的占位值
    pub fn degraded(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            name: symbol.to_string(),
            price: 0.0,
            change: 0.0,
        }
    }
}

/// 单只股票的行情获取结果
#[derive(Debug, Clone, PartialEq)]
pub enum QuoteOutcome {
    /// 成功解析出价格
    Resolved(QuoteRecord),
    /// 获取或解析失败，附带失败原因
    Degraded { record: QuoteRecord, reason: String },
}

impl QuoteOutcome {
    pub fn record(&self) -> &QuoteRecord {
        match self {
            QuoteOutcome::Resolved(record) => record,
            QuoteOutcome::Degraded { record, .. } => record,
        }
    }

    pub fn into_record(self) -> QuoteRecord {
        match self {
            QuoteOutcome::Resolved(record) => record,
            QuoteOutcome::Degraded { record, .. } => record,
        }
    }

    /// 降级原因，成功时为 None
    pub fn degraded_reason(&self) -> Option<&str> {
        match self {
            QuoteOutcome::Resolved(_) => None,
            QuoteOutcome::Degraded { reason, .. } => Some(reason),
        }
    }
}

/// 历史价格点
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct HistoryPoint {
    /// 日期（YYYY-MM-DD）
    pub date: String,
    /// 收盘价
    pub price: f64,
}

/// 历史数据查询参数
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    /// 时间范围（如 1mo、6mo、1y、max），原样传给上游
    #[serde(default = "default_period")]
    pub period: String,
}

fn default_period() -> String {
    "1y".to_string()
}

/// 上游返回的行情快照
///
/// 字段集合由数据源决定，这里只按键名取值
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuoteSnapshot {
    fields: Map<String, Value>,
}

impl QuoteSnapshot {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// 读取数值字段
    ///
    /// 缺失、null、非数值、非有限值以及 0 都视为无值；
    /// 数值字符串（如 "185.5"）按数值解析，不可解析的字符串视为无值
    pub fn number(&self, key: &str) -> Option<f64> {
        let value = match self.fields.get(key)? {
            Value::Number(n) => n.as_f64()?,
            Value::String(s) => s.trim().parse::<f64>().ok()?,
            _ => return None,
        };

        if value.is_finite() && value != 0.0 {
            Some(value)
        } else {
            None
        }
    }

    /// 读取非空字符串字段
    pub fn text(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

impl From<Value> for QuoteSnapshot {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(fields) => Self { fields },
            _ => Self::default(),
        }
    }
}

/// 上游返回的日线收盘价
#[derive(Debug, Clone, PartialEq)]
pub struct DailyClose {
    pub date: NaiveDate,
    pub close: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn snapshot_number_treats_falsy_values_as_missing() {
        let snapshot = QuoteSnapshot::from(json!({
            "currentPrice": 0,
            "ask": null,
            "bid": "n/a",
            "regularMarketPrice": 187.44,
            "previousClose": "185.5",
        }));

        assert_eq!(snapshot.number("currentPrice"), None);
        assert_eq!(snapshot.number("ask"), None);
        assert_eq!(snapshot.number("bid"), None);
        assert_eq!(snapshot.number("missing"), None);
        assert_eq!(snapshot.number("regularMarketPrice"), Some(187.44));
        assert_eq!(snapshot.number("previousClose"), Some(185.5));
    }

    #[test]
    fn snapshot_text_skips_blank_strings() {
        let snapshot = QuoteSnapshot::from(json!({
            "shortName": "  ",
            "longName": "Apple Inc.",
            "currency": 1,
        }));

        assert_eq!(snapshot.text("shortName"), None);
        assert_eq!(snapshot.text("longName"), Some("Apple Inc."));
        assert_eq!(snapshot.text("currency"), None);
    }

    #[test]
    fn non_object_payload_becomes_empty_snapshot() {
        let snapshot = QuoteSnapshot::from(json!([1, 2, 3]));
        assert_eq!(snapshot, QuoteSnapshot::default());
    }

    #[test]
    fn history_query_defaults_to_one_year() {
        let query: HistoryQuery = serde_json::from_value(json!({})).unwrap();
        assert_eq!(query.period, "1y");
    }

    #[test]
    fn degraded_outcome_keeps_sentinel_record() {
        let outcome = QuoteOutcome::Degraded {
            record: QuoteRecord::degraded("TSLA"),
            reason: "timeout".to_string(),
        };

        assert_eq!(outcome.degraded_reason(), Some("timeout"));
        assert_eq!(
            outcome.into_record(),
            QuoteRecord {
                symbol: "TSLA".to_string(),
                name: "TSLA".to_string(),
                price: 0.0,
                change: 0.0,
            }
        );
    }
}
