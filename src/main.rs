//! 股票行情后端服务
//!
//! 为前端图表提供自选股行情和历史价格的 JSON API
//! 数据来源：Yahoo Finance

mod config;     // 配置加载
mod error;      // 错误类型
mod handlers;   // HTTP 请求处理器
mod middleware; // 中间件
mod models;     // 数据模型定义
mod services;   // 业务逻辑服务

use std::io;
use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;

use crate::config::AppConfig;
use crate::handlers::AppState;
use crate::middleware::OpenCors;
use crate::services::stock::YahooProvider;

/// 应用程序入口
///
/// 启动 HTTP 服务器，默认监听 127.0.0.1:5000
#[actix_web::main]
async fn main() -> io::Result<()> {
    // 初始化日志系统，默认日志级别为 info
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = AppConfig::load();

    let provider = YahooProvider::new(&config.upstream).map_err(|e| {
        log::error!("初始化行情数据源失败: {}", e);
        io::Error::new(io::ErrorKind::Other, e.to_string())
    })?;
    let state = web::Data::new(AppState::new(
        Arc::new(provider),
        config.watchlist.symbols.clone(),
    ));

    let bind_addr = config.bind_addr();
    log::info!("启动股票行情服务: {}", bind_addr);
    log::info!("自选股: {}", config.watchlist.symbols.join(", "));

    // 创建并启动 HTTP 服务器
    let mut server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())  // 添加请求日志中间件
            .wrap(OpenCors::new())  // 允许任意来源跨域访问
            .configure(handlers::config)  // 配置路由
    });

    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server.bind(bind_addr)?.run().await
}
