use anyhow::Context;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::repo_types::{CookingEntry, NewCookingEntry, NewRecipe, Recipe, RecipeRequirement};

const RECIPE_COLUMNS: &str = "id, user_id, title, description, instructions, \
                              cooking_time_minutes, servings, difficulty, created_at";

/// Requirement tagged with the recipe it belongs to.
#[derive(Debug, Clone, FromRow)]
pub struct RequirementRow {
    pub recipe_id: Uuid,
    #[sqlx(flatten)]
    pub requirement: RecipeRequirement,
}

/// Stores a recipe and its requirement lines in one transaction.
pub async fn create(db: &PgPool, user_id: Uuid, new: &NewRecipe) -> anyhow::Result<Recipe> {
    let mut tx = db.begin().await.context("begin tx")?;

    let recipe = sqlx::query_as::<_, Recipe>(&format!(
        r#"
        INSERT INTO recipes (user_id, title, description, instructions,
                             cooking_time_minutes, servings, difficulty)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {RECIPE_COLUMNS}
        "#
    ))
    .bind(user_id)
    .bind(&new.title)
    .bind(new.description.as_deref())
    .bind(&new.instructions)
    .bind(new.cooking_time_minutes)
    .bind(new.servings)
    .bind(new.difficulty.as_deref())
    .fetch_one(&mut *tx)
    .await
    .context("insert recipe")?;

    for (position, r) in new.requirements.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO recipe_ingredients (recipe_id, position, name, quantity, unit, is_essential)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(recipe.id)
        .bind(position as i32)
        .bind(&r.name)
        .bind(&r.quantity)
        .bind(&r.unit)
        .bind(r.is_essential)
        .execute(&mut *tx)
        .await
        .context("insert recipe ingredient")?;
    }

    tx.commit().await.context("commit tx")?;
    Ok(recipe)
}

pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<Recipe>> {
    sqlx::query_as::<_, Recipe>(&format!(
        r#"
        SELECT {RECIPE_COLUMNS}
        FROM recipes
        WHERE user_id = $1
        ORDER BY created_at DESC
        "#
    ))
    .bind(user_id)
    .fetch_all(db)
    .await
    .context("list recipes")
}

pub async fn get(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<Option<Recipe>> {
    sqlx::query_as::<_, Recipe>(&format!(
        r#"SELECT {RECIPE_COLUMNS} FROM recipes WHERE id = $1 AND user_id = $2"#
    ))
    .bind(id)
    .bind(user_id)
    .fetch_optional(db)
    .await
    .context("get recipe")
}

pub async fn requirements(db: &PgPool, recipe_id: Uuid) -> anyhow::Result<Vec<RecipeRequirement>> {
    sqlx::query_as::<_, RecipeRequirement>(
        r#"
        SELECT name, quantity, unit, is_essential
          FROM recipe_ingredients
         WHERE recipe_id = $1
         ORDER BY position ASC
        "#,
    )
    .bind(recipe_id)
    .fetch_all(db)
    .await
    .context("list recipe ingredients")
}

/// Every requirement of every recipe the user owns.
pub async fn requirements_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<RequirementRow>> {
    sqlx::query_as::<_, RequirementRow>(
        r#"
        SELECT ri.recipe_id, ri.name, ri.quantity, ri.unit, ri.is_essential
          FROM recipe_ingredients ri
          JOIN recipes r ON r.id = ri.recipe_id
         WHERE r.user_id = $1
         ORDER BY ri.recipe_id, ri.position ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await
    .context("list requirements by user")
}

pub async fn delete(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
    let res = sqlx::query(r#"DELETE FROM recipes WHERE id = $1 AND user_id = $2"#)
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await
        .context("delete recipe")?;
    Ok(res.rows_affected() > 0)
}

/// Logs a cooking of a recipe the caller has already checked ownership of.
pub async fn add_cooking(
    db: &PgPool,
    recipe_id: Uuid,
    new: &NewCookingEntry,
) -> anyhow::Result<CookingEntry> {
    sqlx::query_as::<_, CookingEntry>(
        r#"
        WITH ins AS (
            INSERT INTO cooking_history (recipe_id, rating, notes)
            VALUES ($1, $2, $3)
            RETURNING id, recipe_id, rating, notes, cooked_at
        )
        SELECT ins.id, ins.recipe_id, r.title AS recipe_title,
               ins.rating, ins.notes, ins.cooked_at
          FROM ins
          JOIN recipes r ON r.id = ins.recipe_id
        "#,
    )
    .bind(recipe_id)
    .bind(new.rating)
    .bind(new.notes.as_deref())
    .fetch_one(db)
    .await
    .context("insert cooking history")
}

pub async fn history_for_recipe(db: &PgPool, recipe_id: Uuid) -> anyhow::Result<Vec<CookingEntry>> {
    sqlx::query_as::<_, CookingEntry>(
        r#"
        SELECT h.id, h.recipe_id, r.title AS recipe_title, h.rating, h.notes, h.cooked_at
          FROM cooking_history h
          JOIN recipes r ON r.id = h.recipe_id
         WHERE h.recipe_id = $1
         ORDER BY h.cooked_at DESC
        "#,
    )
    .bind(recipe_id)
    .fetch_all(db)
    .await
    .context("list cooking history")
}

pub async fn history_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<CookingEntry>> {
    sqlx::query_as::<_, CookingEntry>(
        r#"
        SELECT h.id, h.recipe_id, r.title AS recipe_title, h.rating, h.notes, h.cooked_at
          FROM cooking_history h
          JOIN recipes r ON r.id = h.recipe_id
         WHERE r.user_id = $1
         ORDER BY h.cooked_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await
    .context("list cooking history by user")
}
