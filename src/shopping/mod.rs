//! Things to buy, filled by hand or from a recipe's missing ingredients.

mod dto;
pub mod handlers;
pub mod repo;
pub mod repo_types;

pub use dto::AddedFromRecipe;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::routes())
}
