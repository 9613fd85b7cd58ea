// src/main.rs
use actix_web::{web, App, HttpServer};
use env_logger::Env;
use log::{error, info};
use qwscrape::config::Config;
use qwscrape::geo::GeoDatabase;
use qwscrape::handlers;
use qwscrape::poller;
use qwscrape::storage::memory::ServerStorage;
use std::sync::Arc;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = Config::from_env();
    info!("Using {} master servers", config.master_servers.len());

    let geo = match GeoDatabase::load(&config.geo_db_path, &config.geo_db_url).await {
        Ok(geo) => geo,
        Err(e) => {
            error!("Unable to load geo database, continuing without it: {}", e);
            GeoDatabase::default()
        }
    };

    let storage = Arc::new(ServerStorage::new());
    poller::spawn(config.clone(), storage.clone())?;

    let storage = web::Data::from(storage);
    let geo = web::Data::new(geo);

    let bind = config.bind();
    info!("Starting server on {}", bind);
    HttpServer::new(move || {
        App::new()
            .app_data(storage.clone())
            .app_data(geo.clone())
            .configure(handlers::servers::configure)
    })
    .bind(&bind)?
    .run()
    .await
}
