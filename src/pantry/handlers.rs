use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use super::{
    dto::{
        CreateIngredientRequest, ExpiringQuery, IngredientView, SummaryResponse,
        UpdateIngredientRequest,
    },
    repo, services,
    summary::{category_counts, summarize},
};
use crate::{auth::AuthUser, state::AppState};

type ApiError = (StatusCode, String);

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/ingredients", get(list_ingredients).post(create_ingredient))
        .route("/ingredients/expiring", get(list_expiring))
        .route("/ingredients/summary", get(get_summary))
        .route(
            "/ingredients/:id",
            patch(update_ingredient).delete(delete_ingredient),
        )
}

fn internal<E: std::fmt::Display>(e: E) -> ApiError {
    error!(error = %e, "pantry request failed");
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".into())
}

fn bad_request(msg: String) -> ApiError {
    (StatusCode::BAD_REQUEST, msg)
}

#[instrument(skip(state))]
pub async fn list_ingredients(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<IngredientView>>, ApiError> {
    let mut items = repo::list_by_user(&state.db, user_id).await.map_err(internal)?;
    services::sort_by_expiry(&mut items);
    Ok(Json(services::annotate(&state.classifier(), state.today(), items)))
}

#[instrument(skip(state, body))]
pub async fn create_ingredient(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<CreateIngredientRequest>,
) -> Result<(StatusCode, Json<IngredientView>), ApiError> {
    let new = body.validate().map_err(bad_request)?;
    let created = repo::create(&state.db, user_id, &new).await.map_err(internal)?;
    info!(%user_id, ingredient_id = %created.id, name = %created.name, "ingredient added");

    let mut views = services::annotate(&state.classifier(), state.today(), vec![created]);
    match views.pop() {
        Some(view) => Ok((StatusCode::CREATED, Json(view))),
        None => Err(internal("annotate returned nothing")),
    }
}

#[instrument(skip(state, body))]
pub async fn update_ingredient(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateIngredientRequest>,
) -> Result<Json<IngredientView>, ApiError> {
    let changes = body.validate().map_err(bad_request)?;
    let Some(updated) = repo::update(&state.db, user_id, id, &changes)
        .await
        .map_err(internal)?
    else {
        warn!(%user_id, %id, "update of unknown ingredient");
        return Err((StatusCode::NOT_FOUND, "Ingredient not found".into()));
    };

    let mut views = services::annotate(&state.classifier(), state.today(), vec![updated]);
    views
        .pop()
        .map(Json)
        .ok_or_else(|| internal("annotate returned nothing"))
}

#[instrument(skip(state))]
pub async fn delete_ingredient(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if repo::delete(&state.db, user_id, id).await.map_err(internal)? {
        info!(%user_id, %id, "ingredient deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((StatusCode::NOT_FOUND, "Ingredient not found".into()))
    }
}

#[instrument(skip(state))]
pub async fn list_expiring(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<ExpiringQuery>,
) -> Result<Json<Vec<IngredientView>>, ApiError> {
    let classifier = state.classifier();
    let today = state.today();
    let days = q.days.unwrap_or(classifier.soon_threshold_days);

    let items = repo::list_by_user(&state.db, user_id).await.map_err(internal)?;
    let due = services::expiring_within(today, items, days);
    Ok(Json(services::annotate(&classifier, today, due)))
}

#[instrument(skip(state))]
pub async fn get_summary(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<SummaryResponse>, ApiError> {
    let today = state.today();
    let items = repo::list_by_user(&state.db, user_id).await.map_err(internal)?;
    let counts = summarize(&state.classifier(), today, &items);

    Ok(Json(SummaryResponse {
        today,
        counts,
        waste_rate: counts.waste_rate(),
        categories: category_counts(&items),
    }))
}
