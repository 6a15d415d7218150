use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

///////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Input: prices
//
///////////////////////////////////////////////////////////////////////////////////////////////////////

/// One closing price observation.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, price: f64) -> Self {
        Self { date, price }
    }

    /// Finite and strictly positive; anything else is placeholder data.
    pub fn is_usable(&self) -> bool {
        self.price.is_finite() && self.price > 0.0
    }
}

/// Closing prices of a single symbol, ascending by date.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PriceSeries {
    pub symbol: String,
    pub points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Upper-cases the symbol and sorts the points ascending by date. The sort
    /// is stable, so points sharing a date keep their order.
    pub fn new(symbol: impl AsRef<str>, mut points: Vec<PricePoint>) -> Self {
        points.sort_by_key(|point| point.date);
        Self {
            symbol: symbol.as_ref().trim().to_uppercase(),
            points,
        }
    }

    /// Drop every point dated before `start`.
    pub fn since(mut self, start: NaiveDate) -> Self {
        self.points.retain(|point| point.date >= start);
        self
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

///////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Output: simulation
//
///////////////////////////////////////////////////////////////////////////////////////////////////////

/// A single purchase in the timeline, with the running totals after it.
///
/// ```json
/// {
///     "date": "2020-02-01",
///     "price": 200.0,
///     "cumulative_shares": 1.5,
///     "cumulative_invested": 200.0,
///     "portfolio_value": 300.0,
///     "cumulative_gain": 100.0,
///     "cumulative_gain_pct": 50.0
/// }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SimulationStep {
    pub date: NaiveDate,
    pub price: f64,
    pub cumulative_shares: f64,
    pub cumulative_invested: f64,
    pub portfolio_value: f64,
    pub cumulative_gain: f64,
    pub cumulative_gain_pct: f64,
}

/// Summary of a whole simulation plus every step, oldest first.
///
/// `total_invested` is always `periodic_amount * period_count`, and
/// `current_value` is the portfolio value of the last step.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SimulationResult {
    pub symbol: String,
    pub periodic_amount: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub period_count: usize,
    pub total_invested: f64,
    pub total_shares: f64,
    /// Average price paid per share.
    pub average_cost: f64,
    pub current_value: f64,
    pub total_gain: f64,
    pub total_gain_pct: f64,
    pub steps: Vec<SimulationStep>,
}
