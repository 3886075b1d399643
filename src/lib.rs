pub mod config;
pub mod controllers;
pub mod database;
pub mod error;
pub mod forms;
pub mod middleware;
pub mod models;
pub mod services;
pub mod views;

use axum::{
    http::{header, Method},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use config::{Config, Service};
use database::Database;
use services::auth::KeyStore;

// Shared state for every handler
pub struct AppState {
    pub db: Database,
    pub config: Config,
    pub keys: Option<KeyStore>,
}

impl AppState {
    pub fn new(config: Config, db: Database) -> Arc<Self> {
        let keys = config.auth.as_ref().map(KeyStore::from_config);
        Arc::new(Self { db, config, keys })
    }
}

/// Router for the service selected in the config, with fallbacks and layers.
pub fn app(state: Arc<AppState>) -> Router {
    let router = match state.config.app.service {
        Service::Booking => controllers::booking_routes()
            .fallback(error::page_not_found)
            .method_not_allowed_fallback(error::page_method_not_allowed),
        Service::Trivia => controllers::trivia_routes()
            .fallback(error::api_not_found)
            .method_not_allowed_fallback(error::api_method_not_allowed),
        Service::Coffee => controllers::coffee_routes()
            .fallback(error::api_not_found)
            .method_not_allowed_fallback(error::api_method_not_allowed),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    router
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
