mod model;
mod routes;
mod storage;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use model::analyzer::MedicalImageAnalyzer;
use model::config::ModelConfig;
use routes::configure_routes;
use std::env;
use storage::TransientStore;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    dotenv::dotenv().ok();

    if let Ok(current_dir) = env::current_dir() {
        log::info!("Current working directory: {}", current_dir.display());
    } else {
        log::error!("Failed to get the current working directory.");
    }

    let config = match ModelConfig::load() {
        Ok(config) => config,
        Err(e) => {
            log::warn!("Using built-in model config, could not load config file: {e}");
            ModelConfig::default()
        }
    };

    let analyzer = MedicalImageAnalyzer::new(config).map_err(|e| {
        std::io::Error::new(
            std::io::ErrorKind::Other,
            format!("Analyzer setup failed: {e}"),
        )
    })?;

    let upload_dir = env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string());
    let store = TransientStore::new(upload_dir.into())?;

    let port = env::var("PORT").unwrap_or_else(|_| "8000".to_string());
    let bind_address = format!("0.0.0.0:{}", port);

    log::info!("Starting server on {}", bind_address);

    let analyzer = web::Data::new(analyzer);
    let store = web::Data::new(store);

    HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .app_data(analyzer.clone())
            .app_data(store.clone())
            .configure(configure_routes)
    })
    .bind(&bind_address)?
    .run()
    .await
}
