//! Yahoo Finance 行情接口实现
//!
//! 对接 v8 chart 接口: {base}/v8/finance/chart/<symbol>
//! - 行情快照取 `chart.result[0].meta`
//! - 历史数据取 `timestamp` 与 `indicators.quote[0].close` 配对

use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Map, Value};
use url::Url;

use super::provider::MarketDataProvider;
use crate::config::UpstreamConfig;
use crate::models::{DailyClose, QuoteSnapshot};

/// 快照请求使用的时间范围
const SNAPSHOT_RANGE: &str = "1d";
/// 昨收字段
const PREVIOUS_CLOSE: &str = "previousClose";
/// 图表区间的前收盘价，部分响应只带这个字段
const CHART_PREVIOUS_CLOSE: &str = "chartPreviousClose";
/// 日线
const DAILY_INTERVAL: &str = "1d";

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    meta: Map<String, Value>,
    #[serde(default)]
    timestamp: Vec<i64>,
    #[serde(default)]
    indicators: Indicators,
}

#[derive(Debug, Default, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteIndicator>,
}

#[derive(Debug, Default, Deserialize)]
struct QuoteIndicator {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

/// Yahoo Finance 数据源
pub struct YahooProvider {
    client: Client,
    base_url: Url,
}

impl YahooProvider {
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .user_agent(config.user_agent.as_str())
            .gzip(true)
            .build()?;
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| anyhow!("无效的上游地址 {}: {}", config.base_url, e))?;

        Ok(Self { client, base_url })
    }

    /// 拼接 chart 接口地址，股票代码作为单独的路径段编码
    fn chart_url(&self, symbol: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("上游地址不能作为基础路径: {}", self.base_url))?
            .pop_if_empty()
            .extend(&["v8", "finance", "chart", symbol]);
        Ok(url)
    }

    async fn fetch_chart(&self, symbol: &str, range: &str) -> Result<ChartResult> {
        let url = self.chart_url(symbol)?;
        log::debug!("请求 Yahoo 行情: {} range={}", url, range);

        let response = self
            .client
            .get(url)
            .query(&[("range", range), ("interval", DAILY_INTERVAL)])
            .send()
            .await?;

        // 无效代码时上游返回 404，但响应体里仍带有错误描述
        let status = response.status();
        let text = response.text().await?;

        match serde_json::from_str::<ChartEnvelope>(&text) {
            Ok(envelope) => first_result(envelope),
            Err(e) if status.is_success() => Err(anyhow!("解析行情数据失败: {}", e)),
            Err(_) => Err(anyhow!("获取 {} 行情失败: {}", symbol, status)),
        }
    }
}

#[async_trait]
impl MarketDataProvider for YahooProvider {
    async fn fetch_quote(&self, symbol: &str) -> Result<QuoteSnapshot> {
        let chart = self.fetch_chart(symbol, SNAPSHOT_RANGE).await?;
        Ok(snapshot_from_meta(chart.meta))
    }

    async fn fetch_history(&self, symbol: &str, period: &str) -> Result<Vec<DailyClose>> {
        let chart = self.fetch_chart(symbol, period).await?;
        Ok(daily_closes(&chart))
    }
}

/// meta 转为行情快照，缺少昨收时用图表前收盘价补上
fn snapshot_from_meta(mut meta: Map<String, Value>) -> QuoteSnapshot {
    let missing = meta.get(PREVIOUS_CLOSE).map_or(true, Value::is_null);
    if missing {
        if let Some(prev) = meta.get(CHART_PREVIOUS_CLOSE).cloned() {
            meta.insert(PREVIOUS_CLOSE.to_string(), prev);
        }
    }
    QuoteSnapshot::new(meta)
}

/// 取出 chart 响应中的第一条结果，上游错误转为错误描述
fn first_result(envelope: ChartEnvelope) -> Result<ChartResult> {
    if let Some(error) = envelope.chart.error {
        return Err(anyhow!(
            "{}",
            error
                .description
                .or(error.code)
                .unwrap_or_else(|| "unknown upstream error".to_string())
        ));
    }

    envelope
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| anyhow!("行情数据为空"))
}

/// 交易所时区，无法识别时使用 UTC
fn exchange_timezone(meta: &Map<String, Value>) -> Tz {
    meta.get("exchangeTimezoneName")
        .and_then(Value::as_str)
        .and_then(|name| name.parse::<Tz>().ok())
        .unwrap_or(Tz::UTC)
}

fn trading_date(timestamp: i64, tz: Tz) -> Option<NaiveDate> {
    DateTime::from_timestamp(timestamp, 0).map(|dt| dt.with_timezone(&tz).date_naive())
}

/// 时间戳与收盘价配对，跳过没有收盘价的交易日
fn daily_closes(chart: &ChartResult) -> Vec<DailyClose> {
    let tz = exchange_timezone(&chart.meta);
    let closes = chart
        .indicators
        .quote
        .first()
        .map(|q| q.close.as_slice())
        .unwrap_or_default();

    chart
        .timestamp
        .iter()
        .zip(closes)
        .filter_map(|(ts, close)| {
            let close = (*close).filter(|c| c.is_finite())?;
            let date = trading_date(*ts, tz)?;
            Some(DailyClose { date, close })
        })
        .collect()
}
