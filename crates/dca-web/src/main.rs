use actix_files::{Files, NamedFile};
use actix_web::{get, middleware::Logger, web, App, HttpServer};
use anyhow::Result;
use dca_feed::{build_provider, FeedConfig};
use dotenv::dotenv;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod api;
mod config;
mod error;

use api::{ApiDoc, AppState};
use config::ServerConfig;

fn preprocess() {
    dotenv().ok();
    let env = env_logger::Env::default().default_filter_or("info,actix_web=debug");
    env_logger::Builder::from_env(env).init();
}

// serve the front-end on "/"
#[get("/")]
async fn index(config: web::Data<ServerConfig>) -> actix_web::Result<NamedFile> {
    Ok(NamedFile::open(config.static_dir.join("index.html"))?)
}

#[actix_web::main]
async fn main() -> Result<()> {
    preprocess();

    // credentials and endpoints are resolved once, here, and handed to the provider
    let feed_config = FeedConfig::from_env()?;
    let server_config = ServerConfig::from_env();
    let provider = build_provider(&feed_config)?;
    log::info!(
        "Serving DCA simulations from {} on http://{}",
        provider.name(),
        server_config.bind_addr
    );

    let state = web::Data::new(AppState { provider });
    let server_data = web::Data::new(server_config.clone());
    let openapi = ApiDoc::openapi();

    // run server
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(api::cors())
            .app_data(state.clone())
            .app_data(server_data.clone())
            // api endpoints
            .configure(api::configure)
            // front-end
            .service(index)
            .service(Files::new("/static", &server_data.static_dir))
            // api documentation
            .service(SwaggerUi::new("/swagger-ui/{_:.*}").url("/openapi.json", openapi.clone()))
    })
    .bind(&server_config.bind_addr)?
    .run()
    .await?;

    Ok(())
}
