//! 股票接口处理器
//!
//! - GET /api/stocks - 获取自选股行情
//! - GET /api/stock/{symbol}/history?period=1y - 获取日线历史数据

use actix_web::{web, HttpResponse, Result};

use super::AppState;
use crate::models::{ErrorBody, HistoryQuery, QuoteRecord};
use crate::services::stock_service;

/// 获取自选股行情
///
/// 单只股票失败时返回降级记录，接口本身不会失败
pub async fn list_stocks(state: web::Data<AppState>) -> Result<HttpResponse> {
    let outcomes = stock_service::get_quotes(state.provider.as_ref(), &state.watchlist).await;

    let degraded: Vec<String> = outcomes
        .iter()
        .filter_map(|o| {
            o.degraded_reason()
                .map(|reason| format!("{}({})", o.record().symbol, reason))
        })
        .collect();
    if !degraded.is_empty() {
        log::warn!(
            "自选股行情 {}/{} 只降级: {}",
            degraded.len(),
            outcomes.len(),
            degraded.join(", ")
        );
    }

    let records: Vec<QuoteRecord> = outcomes.into_iter().map(|o| o.into_record()).collect();
    Ok(HttpResponse::Ok().json(records))
}

/// 获取单只股票的历史价格
///
/// # 参数
/// - symbol: 股票代码（如 AAPL）
/// - period: 时间范围，默认 1y
pub async fn get_stock_history(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<HistoryQuery>,
) -> Result<HttpResponse> {
    let symbol = path.into_inner();

    match stock_service::get_history(state.provider.as_ref(), &symbol, &query.period).await {
        Ok(points) => Ok(HttpResponse::Ok().json(points)),
        Err(e) if e.is_not_found() => {
            log::info!("{} 在 {} 范围内没有历史数据", symbol, query.period);
            Ok(HttpResponse::NotFound().json(ErrorBody::new(e.to_string())))
        }
        Err(e) => {
            log::error!("获取 {} 历史数据失败: {}", symbol, e);
            Ok(HttpResponse::InternalServerError().json(ErrorBody::new(e.to_string())))
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/stocks", web::get().to(list_stocks))
        .route("/stock/{symbol}/history", web::get().to(get_stock_history));
}
