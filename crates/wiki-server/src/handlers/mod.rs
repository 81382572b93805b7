//! HTTP handlers

pub mod health;
pub mod pages;

pub use health::health;

use crate::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Route table: the title is always a single typed path segment
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::list))
        .route("/view/:title", get(pages::view))
        .route("/edit/:title", get(pages::edit))
        .route("/save/:title", post(pages::save))
        .route("/delete/:title", get(pages::delete))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
