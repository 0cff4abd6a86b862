//! 行情数据源抽象
//!
//! 业务逻辑只依赖这两个操作，便于替换数据源或在测试中使用假数据

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{DailyClose, QuoteSnapshot};

#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// 获取单只股票的行情快照
    async fn fetch_quote(&self, symbol: &str) -> Result<QuoteSnapshot>;

    /// 获取日线收盘价序列，按时间先后排列
    ///
    /// period 为上游定义的时间范围标识，不做本地校验
    async fn fetch_history(&self, symbol: &str, period: &str) -> Result<Vec<DailyClose>>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use anyhow::anyhow;
    use serde_json::Value;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// 内存数据源，未登记的代码一律返回错误
    #[derive(Default)]
    pub struct StaticProvider {
        quotes: HashMap<String, Value>,
        histories: HashMap<String, Vec<DailyClose>>,
        requested_periods: Mutex<Vec<String>>,
    }

    impl StaticProvider {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_quote(mut self, symbol: &str, snapshot: Value) -> Self {
            self.quotes.insert(symbol.to_string(), snapshot);
            self
        }

        pub fn with_history(mut self, symbol: &str, closes: Vec<DailyClose>) -> Self {
            self.histories.insert(symbol.to_string(), closes);
            self
        }

        pub fn requested_periods(&self) -> Vec<String> {
            self.requested_periods.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MarketDataProvider for StaticProvider {
        async fn fetch_quote(&self, symbol: &str) -> Result<QuoteSnapshot> {
            self.quotes
                .get(symbol)
                .cloned()
                .map(QuoteSnapshot::from)
                .ok_or_else(|| anyhow!("Quote not found for ticker symbol: {}", symbol))
        }

        async fn fetch_history(&self, symbol: &str, period: &str) -> Result<Vec<DailyClose>> {
            self.requested_periods.lock().unwrap().push(period.to_string());
            self.histories
                .get(symbol)
                .cloned()
                .ok_or_else(|| anyhow!("{}: possibly delisted; no price data found", symbol))
        }
    }
}
