use crate::client_ext::ClientExt;
use crate::de;
use crate::error::FeedError;
use crate::provider::{Interval, PriceProvider, SymbolMatch};
use async_trait::async_trait;
use chrono::NaiveDate;
use dca_core::PricePoint;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, error, trace, warn};
use url::Url;

///////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Prices from the TwelveData REST API
//
///////////////////////////////////////////////////////////////////////////////////////////////////////

const VENDOR: &str = "twelvedata";

// the largest page TwelveData hands out in one request
const OUTPUT_SIZE: u32 = 5000;

pub struct TwelveData {
    client: Client,
    base: Url,
    api_key: String,
    search_limit: usize,
}

impl TwelveData {
    pub fn new(
        client: Client,
        base: Url,
        api_key: Option<String>,
        search_limit: usize,
    ) -> Result<Self, FeedError> {
        let api_key = api_key.ok_or(FeedError::MissingCredentials("TWELVEDATA_KEY"))?;
        Ok(Self {
            client,
            base,
            api_key,
            search_limit,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, FeedError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| FeedError::Config(format!("{} cannot be a base url", self.base)))?
            .pop_if_empty()
            .push(path);
        Ok(url)
    }

    fn time_series_url(
        &self,
        symbol: &str,
        start: Option<NaiveDate>,
        interval: Interval,
    ) -> Result<Url, FeedError> {
        let mut url = self.endpoint("time_series")?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("symbol", &symbol.trim().to_uppercase())
                .append_pair("interval", series_interval(interval))
                .append_pair("outputsize", &OUTPUT_SIZE.to_string())
                .append_pair("order", "asc")
                .append_pair("format", "JSON");
            if let Some(start) = start {
                query.append_pair("start_date", &start.format("%Y-%m-%d").to_string());
            }
            query.append_pair("apikey", &self.api_key);
        }
        Ok(url)
    }

    fn search_url(&self, query: &str) -> Result<Url, FeedError> {
        let mut url = self.endpoint("symbol_search")?;
        url.query_pairs_mut()
            .append_pair("symbol", query)
            .append_pair("outputsize", &self.search_limit.to_string())
            .append_pair("apikey", &self.api_key);
        Ok(url)
    }
}

fn series_interval(interval: Interval) -> &'static str {
    match interval {
        Interval::Daily => "1day",
        Interval::Weekly => "1week",
        Interval::Monthly => "1month",
    }
}

#[async_trait]
impl PriceProvider for TwelveData {
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
        let url = self.time_series_url(symbol, start, interval)?;

        trace!("Fetching {interval} price data for [{symbol}] from TwelveData");
        let (status, body) = self.client.get_raw(url).await?;
        let prices = parse_time_series(symbol, status, &body)?;

        debug!(
            "[{symbol}] {} prices fetched from TwelveData. Elapsed time: {} ms",
            prices.len(),
            time.elapsed().as_millis()
        );
        Ok(prices)
    }

    async fn search(&self, query: &str) -> Result<Vec<SymbolMatch>, FeedError> {
        let url = self.search_url(query)?;
        let (status, body) = self.client.get_raw(url).await?;
        let mut matches = parse_symbol_search(status, &body)?;
        matches.truncate(self.search_limit);
        Ok(matches)
    }
}

// -------------------------------------------------------------------------------------------------

/// Decode a `time_series` payload. TwelveData reports errors in-band with a
/// `"status": "error"` body, often with a 200 status.
pub fn parse_time_series(
    symbol: &str,
    status: StatusCode,
    body: &[u8],
) -> Result<Vec<PricePoint>, FeedError> {
    let de = match serde_json::from_slice::<TimeSeries>(body) {
        Ok(data) => data,
        Err(e) if status.is_success() => {
            error!("[{symbol}] deserialization error: {e}");
            return Err(e.into());
        }
        Err(_) => return Err(status_error(status)),
    };

    if de.status.as_deref() == Some("error") {
        let code = de
            .code
            .map(|code| code.to_string())
            .unwrap_or_else(|| status.as_u16().to_string());
        let message = de
            .message
            .unwrap_or_else(|| "error returned by TwelveData".to_string());
        error!("[{symbol}] TwelveData error {code}: {message}");
        return Err(FeedError::Vendor {
            vendor: VENDOR,
            code,
            message,
        });
    }

    // an empty history is not an error here; the engine reports it
    let values = de.values.unwrap_or_default();
    if values.is_empty() {
        debug!("[{symbol}] TwelveData returned no values");
        return Ok(Vec::new());
    }

    let total = values.len();
    let prices: Vec<PricePoint> = values
        .into_iter()
        .filter_map(|bar| bar.close.map(|close| PricePoint::new(bar.datetime, close)))
        .collect();
    if prices.len() < total {
        warn!(
            "[{symbol}] dropped {} bars without a numeric close",
            total - prices.len()
        );
    }

    Ok(prices)
}

pub fn parse_symbol_search(
    status: StatusCode,
    body: &[u8],
) -> Result<Vec<SymbolMatch>, FeedError> {
    let de = match serde_json::from_slice::<SymbolSearch>(body) {
        Ok(data) => data,
        Err(e) if status.is_success() => return Err(e.into()),
        Err(_) => return Err(status_error(status)),
    };

    if de.status.as_deref() == Some("error") {
        return Err(FeedError::Vendor {
            vendor: VENDOR,
            code: de
                .code
                .map(|code| code.to_string())
                .unwrap_or_else(|| status.as_u16().to_string()),
            message: de.message.unwrap_or_default(),
        });
    }

    Ok(de
        .data
        .into_iter()
        .map(|row| SymbolMatch {
            symbol: row.symbol,
            name: row.instrument_name,
            exchange: row.exchange,
            kind: row.instrument_type,
        })
        .collect())
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

#[derive(Deserialize, Debug)]
pub struct TimeSeries {
    pub status: Option<String>,
    pub code: Option<i64>,
    pub message: Option<String>,
    pub values: Option<Vec<Bar>>,
}

#[derive(Deserialize, Debug)]
pub struct Bar {
    #[serde(deserialize_with = "de::date_prefix")]
    pub datetime: NaiveDate,
    #[serde(default, deserialize_with = "de::lenient_f64")]
    pub close: Option<f64>,
}

#[derive(Deserialize, Debug)]
pub struct SymbolSearch {
    #[serde(default)]
    pub data: Vec<SymbolRow>,
    pub status: Option<String>,
    pub code: Option<i64>,
    pub message: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct SymbolRow {
    pub symbol: String,
    pub instrument_name: String,
    pub exchange: Option<String>,
    pub instrument_type: Option<String>,
}
