use crate::error::ApiError;
use actix_cors::Cors;
use actix_web::web;
use dca_feed::PriceProvider;
use std::sync::Arc;
use utoipa::OpenApi;

pub mod dca;
pub mod search;

/// Shared by every worker.
pub struct AppState {
    pub provider: Arc<dyn PriceProvider>,
}

#[derive(OpenApi)]
#[openapi(
    paths(dca::simulate, search::search, search::health),
    components(schemas(
        dca_core::SimulationResult,
        dca_core::SimulationStep,
        dca_feed::SymbolMatch,
        dca_feed::Interval
    ))
)]
pub struct ApiDoc;

/// Register the API endpoints; malformed query strings answer with the same
/// JSON error body as every other failure.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into()),
    )
    .service(dca::simulate)
    .service(search::search)
    .service(search::health);
}

/// Any origin, method and header; preflight requests are answered here.
pub fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .send_wildcard()
        .allow_any_method()
        .allow_any_header()
        .max_age(3600)
}
