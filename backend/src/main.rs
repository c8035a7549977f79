//! # Camp Signups Backend Service
//!
//! REST API for a summer camp: campers, activities, and the signups that
//! join them.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        BACKEND SERVICE                           │
//! │                                                                  │
//! │  ┌──────────────────────────────────────────────────────────┐   │
//! │  │  REST API (Actix)                                         │   │
//! │  │  /campers  /campers/{id}  /activities  /activities/{id}   │   │
//! │  │  /signups  /health                                        │   │
//! │  └──────────────────────────────────────────────────────────┘   │
//! │                          │                                       │
//! │  ┌───────────────────────┴───────────────────────────────────┐  │
//! │  │  CampManager: validation, store calls, response views      │  │
//! │  └───────────────────────────────────────────────────────────┘  │
//! │                          │                                       │
//! │         ┌────────────────┴────────────────┐                     │
//! │  ┌──────┴──────┐                   ┌──────┴──────┐              │
//! │  │  PostgreSQL │                   │  In-memory  │              │
//! │  │  Database   │                   │  store      │              │
//! │  └─────────────┘                   └─────────────┘              │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! 1. Optionally set `DATABASE_URL` (in `.env` or the environment); without
//!    it data is kept in memory, starting from a default activity catalogue
//! 2. Start the server: `cargo run`
//! 3. `curl -X POST localhost:5555/campers -H 'Content-Type: application/json' -d '{"name":"Ann","age":12}'`

use std::sync::Arc;

use actix_web::{middleware, web, App, HttpServer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod api;
mod config;
mod db;
mod models;
mod services;
mod utils;

use config::AppConfig;
use db::{CampStore, Database, MemoryStore, DEFAULT_ACTIVITIES};
use services::CampManager;

/// Application state shared across all handlers.
///
/// Holds the store handle explicitly; there is no global connection.
pub struct AppState {
    pub manager: CampManager,
}

/// Main entry point for the backend service.
///
/// 1. Loads configuration from the environment
/// 2. Initializes logging
/// 3. Opens the store (PostgreSQL or in-memory)
/// 4. Launches the HTTP server
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env().expect("Failed to load configuration");

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_filter))
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    info!("Starting Camp Signups Backend Service");

    let store: Arc<dyn CampStore> = match &config.database_url {
        Some(url) => {
            let db = Database::connect(url, config.db_pool_size)
                .await
                .expect("Failed to connect to database");
            db.ensure_schema()
                .await
                .expect("Failed to create database schema");
            Arc::new(db)
        }
        None => {
            warn!("DATABASE_URL not set; data will be kept in memory only");
            info!(
                "Seeding in-memory store with {} activities",
                DEFAULT_ACTIVITIES.len()
            );
            Arc::new(MemoryStore::seeded())
        }
    };
    info!("Store ready: {}", store.backend_name());

    let app_state = Arc::new(AppState {
        manager: CampManager::new(store),
    });

    let server_host = config.server_host.clone();
    let server_port = config.server_port;

    info!("Starting HTTP server on {}:{}", server_host, server_port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(middleware::Logger::default())
            .configure(api::configure_routes)
    })
    .bind((server_host.as_str(), server_port))?
    .run()
    .await
}
