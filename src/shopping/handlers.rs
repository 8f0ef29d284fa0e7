use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use tracing::{error, info, instrument};
use uuid::Uuid;

use super::{
    dto::{CreateShoppingItemRequest, UpdateShoppingItemRequest},
    repo,
    repo_types::ShoppingItem,
};
use crate::{auth::AuthUser, db::is_unique_violation, state::AppState};

type ApiError = (StatusCode, String);

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/shopping", get(list_items).post(add_item))
        .route("/shopping/:id", patch(update_item).delete(delete_item))
}

fn internal<E: std::fmt::Display>(e: E) -> ApiError {
    error!(error = %e, "shopping request failed");
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".into())
}

#[instrument(skip(state))]
pub async fn list_items(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<ShoppingItem>>, ApiError> {
    repo::list_by_user(&state.db, user_id)
        .await
        .map(Json)
        .map_err(internal)
}

#[instrument(skip(state, body))]
pub async fn add_item(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<CreateShoppingItemRequest>,
) -> Result<(StatusCode, Json<ShoppingItem>), ApiError> {
    let new = body.validate().map_err(|m| (StatusCode::BAD_REQUEST, m))?;
    match repo::add(&state.db, user_id, &new).await.map_err(internal)? {
        Some(item) => {
            info!(%user_id, item_id = %item.id, name = %item.name, "shopping item added");
            Ok((StatusCode::CREATED, Json(item)))
        }
        None => Err((
            StatusCode::CONFLICT,
            format!("{} is already on the shopping list", new.name),
        )),
    }
}

#[instrument(skip(state, body))]
pub async fn update_item(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateShoppingItemRequest>,
) -> Result<Json<ShoppingItem>, ApiError> {
    match repo::set_purchased(&state.db, user_id, id, body.purchased).await {
        Ok(Some(item)) => Ok(Json(item)),
        Ok(None) => Err((StatusCode::NOT_FOUND, "Shopping item not found".into())),
        Err(e) if is_unique_violation(&e) => Err((
            StatusCode::CONFLICT,
            "An open item with this name is already listed".into(),
        )),
        Err(e) => Err(internal(e)),
    }
}

#[instrument(skip(state))]
pub async fn delete_item(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if repo::delete(&state.db, user_id, id).await.map_err(internal)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((StatusCode::NOT_FOUND, "Shopping item not found".into()))
    }
}
