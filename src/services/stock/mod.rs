//! 股票数据源模块
//!
//! 定义数据源接口，并提供 Yahoo Finance 实现

pub mod provider;
pub mod yahoo;

pub use provider::MarketDataProvider;
pub use yahoo::YahooProvider;
