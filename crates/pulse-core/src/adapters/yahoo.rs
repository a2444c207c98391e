use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;
use time::Weekday;

use crate::data_source::{HistoryProvider, HistoryRequest, ProviderId, SourceError};
use crate::http_client::{HttpClient, HttpRequest, NoopHttpClient};
use crate::{CalendarDate, ObservationSeries, PriceObservation, Symbol};

/// Yahoo Finance daily-history provider.
///
/// With a real HTTP client it queries the v8 chart endpoint; with a mock
/// client it synthesizes a deterministic weekday series seeded by symbol and
/// date, so tests and demos run offline with stable values.
#[derive(Clone)]
pub struct YahooHistoryProvider {
    http_client: Arc<dyn HttpClient>,
    use_real_api: bool,
}

impl Default for YahooHistoryProvider {
    fn default() -> Self {
        Self {
            http_client: Arc::new(NoopHttpClient),
            use_real_api: false,
        }
    }
}

impl YahooHistoryProvider {
    pub fn with_http_client(http_client: Arc<dyn HttpClient>) -> Self {
        let use_real_api = !http_client.is_mock();
        Self {
            http_client,
            use_real_api,
        }
    }
}

impl HistoryProvider for YahooHistoryProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Yahoo
    }

    fn daily_history<'a>(
        &'a self,
        req: HistoryRequest,
    ) -> Pin<Box<dyn Future<Output = Result<ObservationSeries, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            if self.use_real_api {
                self.fetch_real_history(&req).await
            } else {
                Ok(synthesize_history(&req))
            }
        })
    }
}

impl YahooHistoryProvider {
    async fn fetch_real_history(
        &self,
        req: &HistoryRequest,
    ) -> Result<ObservationSeries, SourceError> {
        // period2 is exclusive upstream, so push it one day past the
        // requested inclusive end.
        let period1 = unix_midnight(req.start);
        let period2 = unix_midnight(req.end.plus_days(1));

        let endpoint = format!(
            "https://query1.finance.yahoo.com/v8/finance/chart/{}?period1={}&period2={}&interval=1d",
            urlencoding::encode(req.symbol.as_str()),
            period1,
            period2,
        );

        let request = HttpRequest::get(endpoint)
            .with_header("referer", "https://finance.yahoo.com/")
            .with_timeout_ms(10_000);

        let response = self.http_client.execute(request).await.map_err(|e| {
            let message = format!("yahoo transport error: {}", e.message());
            if e.retryable() {
                SourceError::unavailable(message)
            } else {
                SourceError::internal(message)
            }
        })?;

        match response.status {
            404 => return Err(SourceError::not_found(&req.symbol)),
            429 => return Err(SourceError::rate_limited("yahoo rate limit exceeded")),
            status if !response.is_success() => {
                return Err(SourceError::unavailable(format!(
                    "yahoo returned status {status}"
                )));
            }
            _ => {}
        }

        parse_chart_response(&req.symbol, &response.body)
    }
}

fn parse_chart_response(symbol: &Symbol, body: &str) -> Result<ObservationSeries, SourceError> {
    let chart_response: YahooChartResponse = serde_json::from_str(body)
        .map_err(|e| SourceError::internal(format!("failed to parse yahoo chart: {e}")))?;

    if let Some(error) = &chart_response.chart.error {
        if !error.is_null() {
            return Err(SourceError::unavailable(format!(
                "yahoo chart API error: {error}"
            )));
        }
    }

    let result = chart_response
        .chart
        .result
        .as_deref()
        .and_then(<[YahooChartResult]>::first)
        .ok_or_else(|| SourceError::not_found(symbol))?;

    let timestamps = result
        .timestamp
        .as_deref()
        .ok_or_else(|| SourceError::not_found(symbol))?;
    let quote = result
        .indicators
        .quote
        .first()
        .ok_or_else(|| SourceError::internal("no quote indicators in chart response"))?;

    let mut observations = Vec::with_capacity(timestamps.len());
    for (index, &ts) in timestamps.iter().enumerate() {
        let date = time::OffsetDateTime::from_unix_timestamp(ts)
            .map_err(|e| SourceError::internal(format!("invalid chart timestamp: {e}")))?
            .date();

        observations.push(PriceObservation::new(
            CalendarDate::from_date(date),
            price_at(&quote.open, index),
            price_at(&quote.high, index),
            price_at(&quote.low, index),
            price_at(&quote.close, index),
        ));
    }

    Ok(ObservationSeries::new(symbol.clone(), observations))
}

fn price_at(column: &[Option<f64>], index: usize) -> Option<f64> {
    column.get(index).copied().flatten()
}

fn unix_midnight(date: CalendarDate) -> i64 {
    date.into_inner().midnight().assume_utc().unix_timestamp()
}

/// Deterministic offline series: one observation per weekday in the range,
/// prices seeded so the same symbol and date always produce the same values.
fn synthesize_history(req: &HistoryRequest) -> ObservationSeries {
    let seed = symbol_seed(&req.symbol);
    let mut observations = Vec::new();

    let mut day = req.start;
    while day <= req.end {
        let weekday = day.into_inner().weekday();
        if weekday != Weekday::Saturday && weekday != Weekday::Sunday {
            let day_seed = seed.wrapping_add(day.into_inner().to_julian_day() as u64);
            let close = 80.0 + (day_seed % 4000) as f64 / 10.0;
            observations.push(PriceObservation::new(
                day,
                Some(close - 0.40),
                Some(close + 1.10),
                Some(close - 1.30),
                Some(close),
            ));
        }
        day = day.plus_days(1);
    }

    ObservationSeries::new(req.symbol.clone(), observations)
}

fn symbol_seed(symbol: &Symbol) -> u64 {
    symbol.as_str().bytes().fold(0_u64, |acc, byte| {
        acc.wrapping_mul(33).wrapping_add(byte as u64)
    })
}

// Yahoo Finance chart response structures.
#[derive(Debug, Clone, Deserialize)]
struct YahooChartResponse {
    chart: YahooChartData,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartData {
    #[serde(default)]
    result: Option<Vec<YahooChartResult>>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartResult {
    timestamp: Option<Vec<i64>>,
    indicators: YahooChartIndicators,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartIndicators {
    quote: Vec<YahooChartQuote>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartQuote {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
}
