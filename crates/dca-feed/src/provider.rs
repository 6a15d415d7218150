use crate::error::FeedError;
use async_trait::async_trait;
use chrono::NaiveDate;
use dca_core::PricePoint;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How often a purchase happens, i.e. the bar size requested from the vendor.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum Interval {
    Daily,
    Weekly,
    #[default]
    Monthly,
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        };
        f.write_str(name)
    }
}

impl FromStr for Interval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" | "day" | "1d" => Ok(Self::Daily),
            "weekly" | "week" | "1wk" => Ok(Self::Weekly),
            "monthly" | "month" | "1mo" => Ok(Self::Monthly),
            other => Err(format!(
                "unknown interval {other:?}; expected daily, weekly or monthly"
            )),
        }
    }
}

/// A candidate for symbol autocomplete.
///
/// ```json
/// {
///     "symbol": "AAPL",
///     "name": "Apple Inc.",
///     "exchange": "NASDAQ",
///     "kind": "EQUITY"
/// }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SymbolMatch {
    pub symbol: String,
    pub name: String,
    pub exchange: Option<String>,
    pub kind: Option<String>,
}

/// A market-data vendor able to supply closing prices.
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Short vendor name, used in logs and errors.
    fn name(&self) -> &'static str;

    /// Closing prices of `symbol` from `start` (or the earliest available
    /// date) up to today, one per `interval`. The order is whatever the vendor
    /// returns; [`fetch_series`] sorts it.
    ///
    /// [`fetch_series`]: crate::fetch_series
    async fn history(
        &self,
        symbol: &str,
        start: Option<NaiveDate>,
        interval: Interval,
    ) -> Result<Vec<PricePoint>, FeedError>;

    async fn search(&self, query: &str) -> Result<Vec<SymbolMatch>, FeedError>;
}
