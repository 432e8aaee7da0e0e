//! Profile Form
//!
//! A profile form with client-side validation, a shared answers store, mutation hooks and a
//! mocked REST backend serving the answers.

pub mod api;
pub mod client;
pub mod config;
pub mod console;
pub mod converters;
pub mod errors;
pub mod flows;
pub mod hooks;
pub mod models;
pub mod repo;
pub mod store;
pub mod validation;

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use repo::AnswersRepository;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<AnswersRepository>,
    pub config: Arc<Config>,
}

/// Create the mocked API router.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new().route(
        "/answers",
        get(api::get_answers)
            .put(api::update_answers)
            .delete(api::reset_answers),
    );

    // Health check
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .fallback(api::not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests;
