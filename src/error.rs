//! 错误类型定义

use thiserror::Error;

pub type Result<T> = std::result::Result<T, StockError>;

#[derive(Debug, Error)]
pub enum StockError {
    /// 快照中没有任何可用的价格字段
    #[error("No price data for {0}")]
    NoPrice(String),
    /// 上游返回了空的历史数据
    #[error("No data available")]
    NoData,
    /// 网络、上游拒绝或解析失败
    #[error(transparent)]
    Upstream(#[from] anyhow::Error),
}

impl StockError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StockError::NoData)
    }
}
