//! `fetch_series` and `build_provider` against an in-memory provider; no
//! network access is needed.

use async_trait::async_trait;
use chrono::NaiveDate;
use dca_core::{simulate, DcaError, PricePoint};
use dca_feed::{
    build_provider, fetch_series, FeedConfig, FeedError, Interval, PriceProvider, ProviderKind,
    SymbolMatch,
};
use std::sync::Mutex;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Answers every request with the same rows and remembers what was asked.
struct StubProvider {
    rows: Vec<PricePoint>,
    calls: Mutex<Vec<(String, Option<NaiveDate>, Interval)>>,
}

impl StubProvider {
    fn new(rows: Vec<PricePoint>) -> Self {
        Self {
            rows,
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl PriceProvider for StubProvider {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn history(
        &self,
        symbol: &str,
        start: Option<NaiveDate>,
        interval: Interval,
    ) -> Result<Vec<PricePoint>, FeedError> {
        self.calls
            .lock()
            .unwrap()
            .push((symbol.to_string(), start, interval));
        Ok(self.rows.clone())
    }

    async fn search(&self, query: &str) -> Result<Vec<SymbolMatch>, FeedError> {
        Ok(vec![SymbolMatch {
            symbol: query.to_uppercase(),
            name: "Stub".to_string(),
            exchange: None,
            kind: None,
        }])
    }
}

#[tokio::test]
async fn series_is_sorted_and_filtered_from_start() {
    let provider = StubProvider::new(vec![
        PricePoint::new(date(2020, 3, 1), 30.0),
        PricePoint::new(date(2020, 1, 1), 10.0),
        PricePoint::new(date(2020, 2, 1), 20.0),
    ]);

    let series = fetch_series(&provider, " spy ", Some(date(2020, 1, 15)), Interval::Monthly)
        .await
        .unwrap();

    assert_eq!(series.symbol, "SPY");
    assert_eq!(
        series.points,
        vec![
            PricePoint::new(date(2020, 2, 1), 20.0),
            PricePoint::new(date(2020, 3, 1), 30.0),
        ]
    );

    let calls = provider.calls.lock().unwrap();
    assert_eq!(
        calls.as_slice(),
        &[("spy".to_string(), Some(date(2020, 1, 15)), Interval::Monthly)]
    );
}

#[tokio::test]
async fn without_start_everything_is_kept() {
    let provider = StubProvider::new(vec![
        PricePoint::new(date(2001, 1, 1), 1.0),
        PricePoint::new(date(2024, 1, 1), 2.0),
    ]);

    let series = fetch_series(&provider, "VT", None, Interval::Daily)
        .await
        .unwrap();
    assert_eq!(series.len(), 2);
}

#[tokio::test]
async fn blank_symbol_is_rejected_before_any_request() {
    let provider = StubProvider::new(vec![]);

    let err = fetch_series(&provider, "   ", None, Interval::Monthly)
        .await
        .unwrap_err();

    assert!(matches!(err, FeedError::InvalidSymbol(_)));
    assert!(provider.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn history_before_start_leaves_nothing_to_simulate() {
    let provider = StubProvider::new(vec![PricePoint::new(date(2010, 1, 1), 5.0)]);

    let series = fetch_series(&provider, "OLD", Some(date(2020, 1, 1)), Interval::Monthly)
        .await
        .unwrap();
    assert!(series.is_empty());

    let err = simulate(&series, 100.0).unwrap_err();
    assert!(matches!(err, DcaError::EmptySeries { symbol } if symbol == "OLD"));
}

#[tokio::test]
async fn vendor_without_history_is_reported_by_the_engine() {
    let provider = StubProvider::new(vec![]);

    let series = fetch_series(&provider, "NEW", None, Interval::Monthly)
        .await
        .unwrap();
    assert!(series.is_empty());
    assert!(matches!(
        simulate(&series, 100.0),
        Err(DcaError::EmptySeries { .. })
    ));
}

#[test]
fn build_provider_selects_the_vendor() {
    let yahoo = build_provider(&FeedConfig::default()).unwrap();
    assert_eq!(yahoo.name(), "yahoo");

    let config = FeedConfig {
        provider: ProviderKind::TwelveData,
        twelve_data_key: Some("key".to_string()),
        ..FeedConfig::default()
    };
    assert_eq!(build_provider(&config).unwrap().name(), "twelvedata");
}

#[test]
fn twelve_data_without_key_fails_at_construction() {
    let config = FeedConfig {
        provider: ProviderKind::TwelveData,
        ..FeedConfig::default()
    };

    let err = build_provider(&config).err().unwrap();
    assert!(matches!(err, FeedError::MissingCredentials(_)));
}
