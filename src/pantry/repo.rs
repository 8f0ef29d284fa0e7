use anyhow::Context;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{Ingredient, IngredientChanges, NewIngredient};

const COLUMNS: &str = "id, user_id, name, category, quantity, unit, expiry_date, created_at";

/// All of a user's ingredients, unordered. Callers sort with
/// `services::sort_by_expiry` so the name tiebreak is byte order, not the
/// database collation.
pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<Ingredient>> {
    sqlx::query_as::<_, Ingredient>(&format!(
        r#"
        SELECT {COLUMNS}
        FROM ingredients
        WHERE user_id = $1
        "#
    ))
    .bind(user_id)
    .fetch_all(db)
    .await
    .context("list ingredients")
}

pub async fn create(db: &PgPool, user_id: Uuid, new: &NewIngredient) -> anyhow::Result<Ingredient> {
    sqlx::query_as::<_, Ingredient>(&format!(
        r#"
        INSERT INTO ingredients (user_id, name, category, quantity, unit, expiry_date)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(user_id)
    .bind(&new.name)
    .bind(&new.category)
    .bind(new.quantity)
    .bind(&new.unit)
    .bind(new.expiry_date)
    .fetch_one(db)
    .await
    .context("insert ingredient")
}

/// Applies `changes`; `None` when the ingredient does not exist or belongs to someone else.
pub async fn update(
    db: &PgPool,
    user_id: Uuid,
    id: Uuid,
    changes: &IngredientChanges,
) -> anyhow::Result<Option<Ingredient>> {
    sqlx::query_as::<_, Ingredient>(&format!(
        r#"
        UPDATE ingredients
           SET quantity    = COALESCE($3, quantity),
               unit        = COALESCE($4, unit),
               category    = COALESCE($5, category),
               expiry_date = CASE WHEN $6 THEN $7 ELSE expiry_date END
         WHERE id = $1 AND user_id = $2
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id)
    .bind(user_id)
    .bind(changes.quantity)
    .bind(changes.unit.as_deref())
    .bind(changes.category.as_deref())
    .bind(changes.expiry_date.is_some())
    .bind(changes.expiry_date.flatten())
    .fetch_optional(db)
    .await
    .context("update ingredient")
}

pub async fn delete(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
    let res = sqlx::query(r#"DELETE FROM ingredients WHERE id = $1 AND user_id = $2"#)
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await
        .context("delete ingredient")?;
    Ok(res.rows_affected() > 0)
}
