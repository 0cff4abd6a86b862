//! 行情聚合与历史数据服务
//!
//! - 自选股行情：逐只获取快照并归一化，单只失败只会降级该只股票
//! - 历史数据：日线收盘价整理为图表可直接使用的点序列

use futures::future::join_all;

use crate::error::{Result, StockError};
use crate::models::{HistoryPoint, QuoteOutcome, QuoteRecord, QuoteSnapshot};
use crate::services::stock::MarketDataProvider;

/// 当前价格字段，按优先级排列
const PRICE_FIELDS: [&str; 4] = ["currentPrice", "regularMarketPrice", "ask", "bid"];
/// 昨收字段
const PREVIOUS_CLOSE_FIELD: &str = "previousClose";
/// 名称字段，按优先级排列
const NAME_FIELDS: [&str; 2] = ["shortName", "longName"];

/// 保留两位小数，恰好落在半分时取偶数（四舍六入五成双）
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// 涨跌幅（百分比），昨收缺失或为 0 时返回 0
pub fn percent_change(current: f64, previous: Option<f64>) -> f64 {
    match previous {
        Some(prev) if prev != 0.0 => (current - prev) / prev * 100.0,
        _ => 0.0,
    }
}

/// 从行情快照中解析出行情记录
pub fn resolve_quote(symbol: &str, snapshot: &QuoteSnapshot) -> Result<QuoteRecord> {
    let current = PRICE_FIELDS
        .iter()
        .find_map(|field| snapshot.number(field))
        .ok_or_else(|| StockError::NoPrice(symbol.to_string()))?;

    let previous = snapshot.number(PREVIOUS_CLOSE_FIELD).unwrap_or(current);
    let change = percent_change(current, Some(previous));

    let name = NAME_FIELDS
        .iter()
        .find_map(|field| snapshot.text(field))
        .unwrap_or(symbol);

    Ok(QuoteRecord {
        symbol: symbol.to_string(),
        name: name.to_string(),
        price: round2(current),
        change: round2(change),
    })
}

/// 获取单只股票行情，任何错误都转为降级记录
pub async fn fetch_quote(provider: &dyn MarketDataProvider, symbol: &str) -> QuoteOutcome {
    let result = match provider.fetch_quote(symbol).await {
        Ok(snapshot) => resolve_quote(symbol, &snapshot),
        Err(e) => Err(StockError::from(e)),
    };

    match result {
        Ok(record) => {
            log::info!(
                "获取 {} 行情成功: 价格 {:.2}, 涨跌幅 {:.2}%",
                symbol,
                record.price,
                record.change
            );
            QuoteOutcome::Resolved(record)
        }
        Err(e) => {
            log::warn!("获取 {} 行情失败: {}", symbol, e);
            QuoteOutcome::Degraded {
                record: QuoteRecord::degraded(symbol),
                reason: e.to_string(),
            }
        }
    }
}

/// 获取自选股行情
///
/// 各只股票并发获取，返回顺序与自选股列表一致，长度始终相同
pub async fn get_quotes(
    provider: &dyn MarketDataProvider,
    watchlist: &[String],
) -> Vec<QuoteOutcome> {
    join_all(watchlist.iter().map(|symbol| fetch_quote(provider, symbol))).await
}

/// 获取单只股票的日线历史数据
pub async fn get_history(
    provider: &dyn MarketDataProvider,
    symbol: &str,
    period: &str,
) -> Result<Vec<HistoryPoint>> {
    let closes = provider.fetch_history(symbol, period).await?;

    if closes.is_empty() {
        return Err(StockError::NoData);
    }

    Ok(closes
        .into_iter()
        .map(|c| HistoryPoint {
            date: c.date.format("%Y-%m-%d").to_string(),
            price: round2(c.close),
        })
        .collect())
}
