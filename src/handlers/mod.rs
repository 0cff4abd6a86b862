pub mod stock;
pub mod health;

use std::sync::Arc;

use actix_web::web;

use crate::services::stock::MarketDataProvider;

/// 请求处理器共享的状态
pub struct AppState {
    /// 行情数据源
    pub provider: Arc<dyn MarketDataProvider>,
    /// 自选股列表
    pub watchlist: Vec<String>,
}

impl AppState {
    pub fn new(provider: Arc<dyn MarketDataProvider>, watchlist: Vec<String>) -> Self {
        Self {
            provider,
            watchlist,
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .configure(health::config)
            .configure(stock::config)
    );
}
