use super::AppState;
use crate::error::ApiError;
use actix_web::{get, web, HttpResponse};
use dca_feed::SymbolMatch;
use serde::Deserialize;
use serde_json::json;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Deserialize, Debug)]
pub struct SearchQuery {
    #[serde(alias = "query", default)]
    pub q: String,
}

/// Symbol autocomplete
///
/// ```json
/// [
///     {
///         "symbol": "AAPL",
///         "name": "Apple Inc.",
///         "exchange": "NASDAQ",
///         "kind": "EQUITY"
///     },
///     // ...
/// ]
/// ```
#[utoipa::path(
    get,
    path = "/search",
    responses(
        (
            status = 200, description = "Symbols matching the query, best match first",
            body = [SymbolMatch], content_type = "application/json",
            example = json!([
                {
                    "symbol": "AAPL",
                    "name": "Apple Inc.",
                    "exchange": "NASDAQ",
                    "kind": "EQUITY"
                }
            ])
        ),
        (status = 400, description = "Missing query")
    ),
    params(
        ("q" = String, Query, description = "Free text: a ticker or part of a company name")
    )
)]
#[get("/search")]
pub async fn search(
    query: web::Query<SearchQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let q = query.q.trim();
    if q.is_empty() {
        return Err(ApiError::BadRequest(
            "query parameter `q` is required".to_string(),
        ));
    }

    let matches = state.provider.search(q).await?;
    log::debug!("{} matches for {q:?}", matches.len());
    Ok(HttpResponse::Ok().json(matches))
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Liveness probe
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (
            status = 200, description = "The service is up",
            content_type = "application/json",
            example = json!({"status": "ok", "provider": "yahoo"})
        )
    )
)]
#[get("/health")]
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "provider": state.provider.name(),
    }))
}
