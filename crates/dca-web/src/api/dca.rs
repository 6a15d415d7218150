use super::AppState;
use crate::error::ApiError;
use actix_web::{get, web, HttpResponse};
use chrono::NaiveDate;
use dca_core::{simulate as run_simulation, validate_amount, SimulationResult};
use dca_feed::{fetch_series, Interval};
use serde::Deserialize;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Query string of `/dca`. Older front-ends send `ticker` and `montant`, so
/// both spellings are accepted.
#[derive(Deserialize, Debug)]
pub struct DcaQuery {
    #[serde(alias = "ticker")]
    pub symbol: String,
    #[serde(alias = "montant", default = "default_amount")]
    pub amount: f64,
    pub start: Option<String>,
    #[serde(default)]
    pub interval: Interval,
}

fn default_amount() -> f64 {
    100.0
}

fn parse_start(start: Option<&str>) -> Result<Option<NaiveDate>, ApiError> {
    match start.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| {
                ApiError::BadRequest(format!(
                    "invalid start date {raw:?}, expected YYYY-MM-DD"
                ))
            }),
    }
}

/// Dollar-cost-average a fixed amount into a symbol
///
/// ```json
/// {
///     "symbol": "AAPL",
///     "periodic_amount": 100.0,
///     "start_date": "2020-01-01",
///     "end_date": "2020-03-01",
///     "period_count": 3,
///     "total_invested": 300.0,
///     "total_shares": 4.0393,
///     "average_cost": 74.2705,
///     "current_value": 256.78,
///     "total_gain": -43.22,
///     "total_gain_pct": -14.41,
///     "steps": [
///         {
///             "date": "2020-01-01",
///             "price": 77.3775,
///             "cumulative_shares": 1.292365,
///             "cumulative_invested": 100.0,
///             "portfolio_value": 100.0,
///             "cumulative_gain": 0.0,
///             "cumulative_gain_pct": 0.0
///         },
///         // ...
///     ]
/// }
/// ```
#[utoipa::path(
    get,
    path = "/dca",
    responses(
        (
            status = 200, description = "Cumulative investment timeline and summary",
            body = SimulationResult, content_type = "application/json"
        ),
        (status = 400, description = "Invalid amount, start date or symbol"),
        (status = 404, description = "No usable price data for the symbol over the period"),
        (status = 502, description = "The price provider failed")
    ),
    params(
        ("symbol" = String, Query, description = "Ticker symbol, e.g. AAPL or VWCE.DE (alias: ticker)"),
        ("amount" = Option<f64>, Query, description = "Amount invested every period, default 100 (alias: montant)"),
        ("start" = Option<String>, Query, description = "First date considered, YYYY-MM-DD"),
        ("interval" = Option<Interval>, Query, description = "daily, weekly or monthly (default)")
    )
)]
#[get("/dca")]
pub async fn simulate(
    query: web::Query<DcaQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let query = query.into_inner();
    log::debug!("DCA request: {query:?}");

    // reject before spending a vendor call on it
    validate_amount(query.amount)?;
    let start = parse_start(query.start.as_deref())?;

    let series = fetch_series(
        state.provider.as_ref(),
        &query.symbol,
        start,
        query.interval,
    )
    .await?;
    let result = run_simulation(&series, query.amount)?;

    log::info!(
        "[{}] {} periods simulated from {} to {}",
        result.symbol,
        result.period_count,
        result.start_date,
        result.end_date
    );
    Ok(HttpResponse::Ok().json(result))
}
