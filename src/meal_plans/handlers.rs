use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use super::{
    dto::{CreateMealPlanRequest, MealPlanQuery},
    repo,
    repo_types::MealPlan,
    services,
};
use crate::{auth::AuthUser, recipes, state::AppState};

type ApiError = (StatusCode, String);

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/meal-plans", get(list_plans).post(create_plan))
        .route("/meal-plans/:id", delete(delete_plan))
}

fn internal<E: std::fmt::Display>(e: E) -> ApiError {
    error!(error = %e, "meal plan request failed");
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".into())
}

#[instrument(skip(state))]
pub async fn list_plans(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<MealPlanQuery>,
) -> Result<Json<Vec<MealPlan>>, ApiError> {
    let (from, to) = q
        .resolve(state.today())
        .map_err(|m| (StatusCode::BAD_REQUEST, m))?;
    let mut plans = repo::list_between(&state.db, user_id, from, to)
        .await
        .map_err(internal)?;
    services::sort_plans(&mut plans);
    Ok(Json(plans))
}

#[instrument(skip(state, body))]
pub async fn create_plan(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<CreateMealPlanRequest>,
) -> Result<(StatusCode, Json<MealPlan>), ApiError> {
    let new = body.validate();
    let owned = recipes::repo::get(&state.db, user_id, new.recipe_id)
        .await
        .map_err(internal)?;
    if owned.is_none() {
        warn!(%user_id, recipe_id = %new.recipe_id, "meal plan for unknown recipe");
        return Err((StatusCode::NOT_FOUND, "Recipe not found".into()));
    }

    let plan = repo::create(&state.db, user_id, &new).await.map_err(internal)?;
    info!(%user_id, plan_id = %plan.id, date = %plan.plan_date, meal = %plan.meal_type, "meal planned");
    Ok((StatusCode::CREATED, Json(plan)))
}

#[instrument(skip(state))]
pub async fn delete_plan(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if repo::delete(&state.db, user_id, id).await.map_err(internal)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((StatusCode::NOT_FOUND, "Meal plan not found".into()))
    }
}
