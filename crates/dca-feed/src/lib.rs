pub mod client_ext;
pub mod config;
pub mod de;
pub mod error;
pub mod provider;
pub mod twelve_data;
pub mod yahoo;

pub use crate::config::{FeedConfig, ProviderKind};
pub use crate::error::FeedError;
pub use crate::provider::{Interval, PriceProvider, SymbolMatch};
pub use crate::twelve_data::TwelveData;
pub use crate::yahoo::YahooFinance;

use chrono::NaiveDate;
use dca_core::PriceSeries;
use std::sync::Arc;
use tracing::debug;

/// Construct the provider selected by `config`.
pub fn build_provider(config: &FeedConfig) -> Result<Arc<dyn PriceProvider>, FeedError> {
    let client = client_ext::http_client(config)?;
    let provider: Arc<dyn PriceProvider> = match config.provider {
        ProviderKind::Yahoo => Arc::new(YahooFinance::new(
            client,
            config.yahoo_url.clone(),
            config.search_limit,
        )),
        ProviderKind::TwelveData => Arc::new(TwelveData::new(
            client,
            config.twelve_data_url.clone(),
            config.twelve_data_key.clone(),
            config.search_limit,
        )?),
    };
    debug!("Using {} as price provider", provider.name());
    Ok(provider)
}

/// Fetch the closing prices of `symbol` as an ascending series that starts no
/// earlier than `start`. A vendor that answers with no rows yields an empty
/// series, which the engine then reports as having nothing to simulate.
pub async fn fetch_series(
    provider: &dyn PriceProvider,
    symbol: &str,
    start: Option<NaiveDate>,
    interval: Interval,
) -> Result<PriceSeries, FeedError> {
    let symbol = symbol.trim();
    if symbol.is_empty() {
        return Err(FeedError::InvalidSymbol(symbol.to_string()));
    }

    let points = provider.history(symbol, start, interval).await?;
    let series = PriceSeries::new(symbol, points);

    // vendors round the start down to the enclosing bar, e.g. the first of the month
    Ok(match start {
        Some(start) => series.since(start),
        None => series,
    })
}
