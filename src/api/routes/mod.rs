//! API routes module

pub mod booking;
pub mod contact;
pub mod newsletter;
pub mod status;

use std::sync::{Arc, RwLock};

use crate::api::state::AppState;
use axum::Router;

type SharedState = Arc<RwLock<AppState>>;

/// Create the combined API router
pub fn router() -> Router<SharedState> {
    Router::new()
        // Meeting booking routes
        .merge(booking::router())
        // Contact form routes
        .merge(contact::router())
        // Newsletter signup routes
        .merge(newsletter::router())
        // Connectivity probe routes
        .merge(status::router())
}
