//! The user's fridge: stored ingredients and their freshness.

mod dto;
pub mod freshness;
pub mod handlers;
pub mod repo;
pub mod repo_types;
mod services;
pub mod summary;

pub use services::held_names;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::routes())
}
