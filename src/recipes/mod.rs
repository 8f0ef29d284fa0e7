//! Saved recipes and how far the pantry is from cooking them.

mod dto;
pub mod gap;
pub mod handlers;
pub mod history;
pub mod repo;
pub mod repo_types;
mod services;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::routes())
}
