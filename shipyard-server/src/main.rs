#![deny(missing_docs)]
//! Shipyard server executable.
//!
//! Hosts the HTTP endpoints of the ship catalog.

mod config;
mod db;
mod models;
mod openapi;
mod routes;
mod schema;

#[cfg(not(test))]
use actix_cors::Cors;
#[cfg(not(test))]
use actix_web::{App, HttpServer, http::header, web};
#[cfg(not(test))]
use dotenvy::dotenv;
#[cfg(not(test))]
use std::{io, sync::Arc};

#[cfg(not(test))]
use shipyard_core::InMemoryShipStore;

#[cfg(not(test))]
use crate::config::ServerConfig;
#[cfg(not(test))]
use crate::db::{PgShipStore, init_pool};
#[cfg(not(test))]
use crate::routes::{AppState, SharedShipStore, configure};

#[cfg(not(test))]
fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let config =
        ServerConfig::from_env().map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))?;

    let store: SharedShipStore = match &config.database_url {
        Some(database_url) => {
            let pool = init_pool(database_url).map_err(io::Error::other)?;
            log::info!("using PostgreSQL ship store");
            Arc::new(PgShipStore::new(pool))
        }
        None => {
            log::warn!("DATABASE_URL is not set; ships are kept in memory only");
            Arc::new(InMemoryShipStore::new())
        }
    };
    let state = web::Data::new(AppState::new(store));
    let allowed_origins = config.allowed_origins.clone();
    log::info!("listening on {}:{}", config.host, config.port);

    // Manually start the Actix system
    actix_web::rt::System::new().block_on(async move {
        HttpServer::new(move || {
            let mut cors = Cors::default()
                .allowed_methods(vec!["GET", "POST", "DELETE", "OPTIONS"])
                .allowed_headers(vec![header::CONTENT_TYPE])
                .max_age(3600);
            for origin in &allowed_origins {
                cors = cors.allowed_origin(origin);
            }
            App::new()
                .wrap(actix_web::middleware::Logger::default())
                .wrap(cors)
                .app_data(state.clone())
                .configure(configure)
        })
        .bind((config.host.as_str(), config.port))?
        .run()
        .await
    })
}

#[cfg(test)]
fn main() {}
