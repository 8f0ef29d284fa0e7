use std::collections::HashSet;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use super::{
    dto::{
        CookableItem, CookedRequest, CreateRecipeRequest, GapQuery, GapResponse, RecipeDetails,
        RecipeListQuery,
    },
    gap,
    history::{cooking_stats, CookingStats},
    repo,
    repo_types::{CookingEntry, Recipe},
    services,
};
use crate::{
    auth::AuthUser,
    pantry,
    shopping::{self, AddedFromRecipe},
    state::AppState,
};

type ApiError = (StatusCode, String);

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/recipes", get(list_recipes).post(create_recipe))
        .route("/recipes/random", get(random_recipe))
        .route("/recipes/cookable", get(list_cookable))
        .route("/recipes/stats", get(get_cooking_stats))
        .route("/recipes/:id", get(get_recipe).delete(delete_recipe))
        .route("/recipes/:id/gap", get(get_gap))
        .route("/recipes/:id/shopping", post(add_missing_to_shopping))
        .route("/recipes/:id/cooked", get(list_cooked).post(log_cooked))
}

fn internal<E: std::fmt::Display>(e: E) -> ApiError {
    error!(error = %e, "recipe request failed");
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".into())
}

fn not_found() -> ApiError {
    (StatusCode::NOT_FOUND, "Recipe not found".into())
}

async fn load_recipe(state: &AppState, user_id: Uuid, id: Uuid) -> Result<Recipe, ApiError> {
    repo::get(&state.db, user_id, id)
        .await
        .map_err(internal)?
        .ok_or_else(not_found)
}

async fn held_set(state: &AppState, user_id: Uuid) -> Result<HashSet<String>, ApiError> {
    let items = pantry::repo::list_by_user(&state.db, user_id)
        .await
        .map_err(internal)?;
    Ok(pantry::held_names(&items))
}

#[instrument(skip(state, body))]
pub async fn create_recipe(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<CreateRecipeRequest>,
) -> Result<(StatusCode, Json<RecipeDetails>), ApiError> {
    let new = body.validate().map_err(|m| (StatusCode::BAD_REQUEST, m))?;
    let recipe = repo::create(&state.db, user_id, &new).await.map_err(internal)?;
    info!(%user_id, recipe_id = %recipe.id, title = %recipe.title, "recipe saved");

    Ok((
        StatusCode::CREATED,
        Json(RecipeDetails {
            recipe,
            ingredients: new.requirements,
        }),
    ))
}

#[instrument(skip(state))]
pub async fn list_recipes(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<RecipeListQuery>,
) -> Result<Json<Vec<Recipe>>, ApiError> {
    let recipes = repo::list_by_user(&state.db, user_id).await.map_err(internal)?;
    Ok(Json(services::filter_recipes(recipes, &q)))
}

#[instrument(skip(state))]
pub async fn get_recipe(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<RecipeDetails>, ApiError> {
    let recipe = load_recipe(&state, user_id, id).await?;
    let ingredients = repo::requirements(&state.db, id).await.map_err(internal)?;
    Ok(Json(RecipeDetails { recipe, ingredients }))
}

#[instrument(skip(state))]
pub async fn delete_recipe(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if repo::delete(&state.db, user_id, id).await.map_err(internal)? {
        info!(%user_id, %id, "recipe deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found())
    }
}

#[instrument(skip(state))]
pub async fn random_recipe(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Recipe>, ApiError> {
    let recipes = repo::list_by_user(&state.db, user_id).await.map_err(internal)?;
    let picked = services::pick_random(&recipes, &mut rand::thread_rng()).cloned();
    picked
        .map(Json)
        .ok_or_else(|| (StatusCode::NOT_FOUND, "No recipes saved yet".into()))
}

#[instrument(skip(state))]
pub async fn get_gap(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Query(q): Query<GapQuery>,
) -> Result<Json<GapResponse>, ApiError> {
    let recipe = load_recipe(&state, user_id, id).await?;
    let requirements = repo::requirements(&state.db, id).await.map_err(internal)?;
    let held = held_set(&state, user_id).await?;

    let gap = if q.substitutes.unwrap_or(true) {
        gap::diff_with_substitutes(&requirements, &held, &recipe.title, state.advisor.as_ref()).await
    } else {
        gap::diff(&requirements, &held)
    };

    Ok(Json(GapResponse {
        recipe_id: recipe.id,
        title: recipe.title,
        cookable: gap.is_cookable(),
        gap,
    }))
}

#[instrument(skip(state))]
pub async fn list_cookable(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<CookableItem>>, ApiError> {
    let recipes = repo::list_by_user(&state.db, user_id).await.map_err(internal)?;
    let rows = repo::requirements_by_user(&state.db, user_id)
        .await
        .map_err(internal)?;
    let held = held_set(&state, user_id).await?;
    Ok(Json(services::cookable_overview(&recipes, rows, &held)))
}

#[instrument(skip(state))]
pub async fn add_missing_to_shopping(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<AddedFromRecipe>), ApiError> {
    let recipe = load_recipe(&state, user_id, id).await?;
    let requirements = repo::requirements(&state.db, id).await.map_err(internal)?;
    let held = held_set(&state, user_id).await?;

    let gap = gap::diff(&requirements, &held);
    let lines = services::shopping_lines(recipe.id, &requirements, &gap);
    let added = shopping::repo::add_many(&state.db, user_id, &lines)
        .await
        .map_err(internal)?;

    let added_keys: HashSet<String> = added.iter().map(|i| gap::normalize_name(&i.name)).collect();
    let already_listed: Vec<String> = lines
        .into_iter()
        .map(|l| l.name)
        .filter(|n| !added_keys.contains(&gap::normalize_name(n)))
        .collect();
    if !already_listed.is_empty() {
        warn!(%user_id, recipe_id = %recipe.id, skipped = already_listed.len(), "items already on shopping list");
    }
    info!(%user_id, recipe_id = %recipe.id, added = added.len(), "missing ingredients sent to shopping list");

    let status = if added.is_empty() { StatusCode::OK } else { StatusCode::CREATED };
    Ok((status, Json(AddedFromRecipe { added, already_listed })))
}

#[instrument(skip(state, body))]
pub async fn log_cooked(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<CookedRequest>,
) -> Result<(StatusCode, Json<CookingEntry>), ApiError> {
    let new = body.validate().map_err(|m| (StatusCode::BAD_REQUEST, m))?;
    let recipe = load_recipe(&state, user_id, id).await?;
    let entry = repo::add_cooking(&state.db, recipe.id, &new)
        .await
        .map_err(internal)?;
    info!(%user_id, recipe_id = %recipe.id, rating = ?entry.rating, "cooking logged");
    Ok((StatusCode::CREATED, Json(entry)))
}

#[instrument(skip(state))]
pub async fn list_cooked(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<CookingEntry>>, ApiError> {
    let recipe = load_recipe(&state, user_id, id).await?;
    repo::history_for_recipe(&state.db, recipe.id)
        .await
        .map(Json)
        .map_err(internal)
}

#[instrument(skip(state))]
pub async fn get_cooking_stats(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<CookingStats>, ApiError> {
    let entries = repo::history_by_user(&state.db, user_id)
        .await
        .map_err(internal)?;
    Ok(Json(cooking_stats(&entries, state.utc_offset())))
}
