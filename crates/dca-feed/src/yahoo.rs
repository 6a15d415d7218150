use crate::client_ext::ClientExt;
use crate::de;
use crate::error::FeedError;
use crate::provider::{Interval, PriceProvider, SymbolMatch};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use dca_core::PricePoint;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, error, trace, warn};
use url::Url;

///////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Prices from Yahoo Finance, per ticker
//
///////////////////////////////////////////////////////////////////////////////////////////////////////

const VENDOR: &str = "yahoo";

pub struct YahooFinance {
    client: Client,
    base: Url,
    search_limit: usize,
}

impl YahooFinance {
    pub fn new(client: Client, base: Url, search_limit: usize) -> Self {
        Self {
            client,
            base,
            search_limit,
        }
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, FeedError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| FeedError::Config(format!("{} cannot be a base url", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn chart_url(
        &self,
        symbol: &str,
        start: Option<NaiveDate>,
        interval: Interval,
    ) -> Result<Url, FeedError> {
        let tckr = symbol.trim().to_uppercase();
        let mut url = self.endpoint(&["v8", "finance", "chart", tckr.as_str()])?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("interval", chart_interval(interval))
                .append_pair("events", "div|split");
            match start {
                Some(start) => {
                    let period1 = start
                        .and_hms_opt(0, 0, 0)
                        .map(|dt| dt.and_utc().timestamp())
                        .unwrap_or_default();
                    query
                        .append_pair("period1", &period1.to_string())
                        .append_pair("period2", &Utc::now().timestamp().to_string());
                }
                None => {
                    query.append_pair("range", "max");
                }
            }
        }
        Ok(url)
    }

    fn search_url(&self, query: &str) -> Result<Url, FeedError> {
        let mut url = self.endpoint(&["v1", "finance", "search"])?;
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("quotesCount", &self.search_limit.to_string())
            .append_pair("newsCount", "0");
        Ok(url)
    }
}

fn chart_interval(interval: Interval) -> &'static str {
    match interval {
        Interval::Daily => "1d",
        Interval::Weekly => "1wk",
        Interval::Monthly => "1mo",
    }
}

#[async_trait]
impl PriceProvider for YahooFinance {
    fn name(&self) -> &'static str {
        VENDOR
    }

    async fn history(
        &self,
        symbol: &str,
        start: Option<NaiveDate>,
        interval: Interval,
    ) -> Result<Vec<PricePoint>, FeedError> {
        let time = std::time::Instant::now();
        let url = self.chart_url(symbol, start, interval)?;

        trace!("Fetching {interval} price data for [{symbol}] from Yahoo Finance");
        let (status, body) = self.client.get_raw(url).await?;
        let prices = parse_chart(symbol, status, &body)?;

        debug!(
            "[{symbol}] {} prices fetched from Yahoo Finance. Elapsed time: {} ms",
            prices.len(),
            time.elapsed().as_millis()
        );
        Ok(prices)
    }

    async fn search(&self, query: &str) -> Result<Vec<SymbolMatch>, FeedError> {
        let url = self.search_url(query)?;
        let (status, body) = self.client.get_raw(url).await?;
        parse_search(status, &body)
    }
}

// -------------------------------------------------------------------------------------------------

/// Decode a `v8/finance/chart` payload into closing prices, dated in the
/// exchange's local time. Bars without a close (Yahoo sends `null` for halted
/// days) are dropped.
pub fn parse_chart(
    symbol: &str,
    status: StatusCode,
    body: &[u8],
) -> Result<Vec<PricePoint>, FeedError> {
    let de = match serde_json::from_slice::<PriceHistory>(body) {
        Ok(data) => data,
        Err(e) if status.is_success() => {
            error!("[{symbol}] deserialization error: {e}");
            return Err(e.into());
        }
        Err(_) => return Err(status_error(status)),
    };

    if let Some(err) = de.chart.error {
        if err.code == "Not Found" {
            return Err(FeedError::NoData {
                symbol: symbol.to_string(),
            });
        }
        error!("[{symbol}] Yahoo Finance error {}: {}", err.code, err.description);
        return Err(FeedError::Vendor {
            vendor: VENDOR,
            code: err.code,
            message: err.description,
        });
    }

    // an empty history is not an error here; the engine reports it
    let base = match de.chart.result.and_then(|result| result.into_iter().next()) {
        Some(base) => base,
        None => {
            debug!("[{symbol}] contained no \"chart.result\" object");
            return Ok(Vec::new());
        }
    };

    let closes = base
        .indicators
        .quote
        .into_iter()
        .next()
        .map(|quote| quote.close)
        .unwrap_or_default();

    if base.timestamp.len() != closes.len() {
        warn!(
            "[{symbol}] {} timestamps but {} closes; unmatched bars dropped",
            base.timestamp.len(),
            closes.len()
        );
    }

    // bars are stamped at midnight exchange time
    let gmtoffset = base.meta.map(|meta| meta.gmtoffset).unwrap_or_default();

    trace!("Transforming price data for [{symbol}]");
    let prices = base
        .timestamp
        .into_iter()
        .zip(closes)
        .filter_map(|(timestamp, close)| {
            let date = de::local_date(timestamp, gmtoffset)?;
            close.map(|price| PricePoint::new(date, price))
        })
        .collect();

    Ok(prices)
}

pub fn parse_search(status: StatusCode, body: &[u8]) -> Result<Vec<SymbolMatch>, FeedError> {
    let de = match serde_json::from_slice::<SearchResponse>(body) {
        Ok(data) => data,
        Err(e) if status.is_success() => return Err(e.into()),
        Err(_) => return Err(status_error(status)),
    };

    let matches = de
        .quotes
        .into_iter()
        .filter_map(|quote| {
            let symbol = quote.symbol?;
            Some(SymbolMatch {
                name: quote
                    .longname
                    .or(quote.shortname)
                    .unwrap_or_else(|| symbol.clone()),
                exchange: quote.exch_disp.or(quote.exchange),
                kind: quote.quote_type,
                symbol,
            })
        })
        .collect();
    Ok(matches)
}

fn status_error(status: StatusCode) -> FeedError {
    FeedError::Vendor {
        vendor: VENDOR,
        code: status.as_u16().to_string(),
        message: status
            .canonical_reason()
            .unwrap_or("unexpected status")
            .to_string(),
    }
}

///////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Deserialization
//
///////////////////////////////////////////////////////////////////////////////////////////////////////

// Input: Yahoo Finance chart
#[derive(Deserialize, Debug)]
pub struct PriceHistory {
    pub chart: PriceResponse,
}

#[derive(Deserialize, Debug)]
pub struct PriceResponse {
    pub result: Option<Vec<PriceCategories>>,
    pub error: Option<ChartError>,
}

#[derive(Deserialize, Debug)]
pub struct ChartError {
    pub code: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Deserialize, Debug)]
pub struct PriceCategories {
    pub meta: Option<ChartMeta>,
    #[serde(default)]
    pub timestamp: Vec<i64>,
    pub indicators: Indicators,
}

#[derive(Deserialize, Debug)]
pub struct ChartMeta {
    /// Seconds east of UTC for the listing's exchange.
    #[serde(default)]
    pub gmtoffset: i64,
}

#[derive(Deserialize, Debug)]
pub struct Indicators {
    #[serde(default)]
    pub quote: Vec<Quote>,
}

#[derive(Deserialize, Debug)]
pub struct Quote {
    #[serde(default)]
    pub close: Vec<Option<f64>>,
}

// Input: Yahoo Finance search
#[derive(Deserialize, Debug)]
pub struct SearchResponse {
    #[serde(default)]
    pub quotes: Vec<SearchQuote>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuote {
    pub symbol: Option<String>,
    pub shortname: Option<String>,
    pub longname: Option<String>,
    pub exchange: Option<String>,
    pub exch_disp: Option<String>,
    pub quote_type: Option<String>,
}
