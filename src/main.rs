use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware::Logger, web};
use dotenv::dotenv;
use std::net::TcpListener;
use tokio::sync::watch;

mod config;
mod error;
mod handlers;
mod listing;
mod routes;
mod services;
mod session;
mod usage;

use crate::config::AppSettings;
use crate::routes::configure_routes;
use crate::services::UsageRefresher;
use crate::usage::SnapshotStore;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    // Load application settings
    let app_settings = match AppSettings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            log::error!("Failed to load application settings: {}", e);
            log::error!("Cannot start server without valid settings");
            std::process::exit(1);
        }
    };

    // The store starts out empty; the refresher fills it.
    let store = SnapshotStore::new();

    // Background refresh loop with a clean-shutdown handle
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let refresher = UsageRefresher::new(app_settings.clone(), store.clone());
    let refresher_handle = refresher.spawn(shutdown_rx);

    let host = &app_settings.server.host;
    let port = app_settings.server.port;
    log::info!("Starting server at http://{}:{}", host, port);

    let listener = TcpListener::bind(format!("{}:{}", host, port))?;

    let server_store = store.clone();
    let server_settings = app_settings.clone();
    let result = HttpServer::new(move || {
        // Configure CORS using actix-cors
        let mut cors = Cors::default();
        if server_settings.server.cors_origins.contains(&"*".to_string()) {
            cors = cors.allow_any_origin();
        } else {
            for origin in &server_settings.server.cors_origins {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors.allow_any_method().allow_any_header();

        App::new()
            .wrap(Logger::default())
            .wrap(cors)
            .app_data(web::Data::new(server_store.clone()))
            .configure(configure_routes)
    })
    .listen(listener)?
    .run()
    .await;

    // Ask the refresher to stop and wait for any in-flight cycle.
    let _ = shutdown_tx.send(true);
    if let Err(e) = refresher_handle.await {
        log::warn!("Refresher task did not shut down cleanly: {}", e);
    }

    result
}
