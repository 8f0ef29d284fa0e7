use anyhow::Context;
use sqlx::PgPool;
use time::Date;
use uuid::Uuid;

use super::repo_types::{MealPlan, NewMealPlan};

/// Stores a plan for a recipe the caller owns and returns it with the title.
pub async fn create(db: &PgPool, user_id: Uuid, new: &NewMealPlan) -> anyhow::Result<MealPlan> {
    sqlx::query_as::<_, MealPlan>(
        r#"
        WITH ins AS (
            INSERT INTO meal_plans (user_id, recipe_id, plan_date, meal_type, notes)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, recipe_id, plan_date, meal_type, notes, created_at
        )
        SELECT ins.id, ins.user_id, ins.recipe_id, r.title AS recipe_title,
               ins.plan_date, ins.meal_type, ins.notes, ins.created_at
          FROM ins
          JOIN recipes r ON r.id = ins.recipe_id
        "#,
    )
    .bind(user_id)
    .bind(new.recipe_id)
    .bind(new.plan_date)
    .bind(new.meal_type.as_str())
    .bind(new.notes.as_deref())
    .fetch_one(db)
    .await
    .context("insert meal plan")
}

/// Plans dated within `from..=to`.
pub async fn list_between(
    db: &PgPool,
    user_id: Uuid,
    from: Date,
    to: Date,
) -> anyhow::Result<Vec<MealPlan>> {
    sqlx::query_as::<_, MealPlan>(
        r#"
        SELECT m.id, m.user_id, m.recipe_id, r.title AS recipe_title,
               m.plan_date, m.meal_type, m.notes, m.created_at
          FROM meal_plans m
          JOIN recipes r ON r.id = m.recipe_id
         WHERE m.user_id = $1
           AND m.plan_date BETWEEN $2 AND $3
        "#,
    )
    .bind(user_id)
    .bind(from)
    .bind(to)
    .fetch_all(db)
    .await
    .context("list meal plans")
}

pub async fn delete(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
    let res = sqlx::query(r#"DELETE FROM meal_plans WHERE id = $1 AND user_id = $2"#)
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await
        .context("delete meal plan")?;
    Ok(res.rows_affected() > 0)
}
