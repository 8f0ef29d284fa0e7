use anyhow::Context;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use super::repo_types::{NewShoppingItem, ShoppingItem};
use crate::recipes::gap::normalize_name;

const COLUMNS: &str = "id, user_id, name, quantity, unit, recipe_id, purchased, created_at";

pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<ShoppingItem>> {
    sqlx::query_as::<_, ShoppingItem>(&format!(
        r#"
        SELECT {COLUMNS}
          FROM shopping_items
         WHERE user_id = $1
         ORDER BY purchased ASC, created_at ASC
        "#
    ))
    .bind(user_id)
    .fetch_all(db)
    .await
    .context("list shopping items")
}

const INSERT: &str = r#"
    INSERT INTO shopping_items (user_id, name, name_key, quantity, unit, recipe_id)
    VALUES ($1, $2, $3, $4, $5, $6)
    ON CONFLICT (user_id, name_key) WHERE NOT purchased DO NOTHING
    RETURNING id, user_id, name, quantity, unit, recipe_id, purchased, created_at
"#;

async fn insert<'e, E>(exec: E, user_id: Uuid, new: &NewShoppingItem) -> sqlx::Result<Option<ShoppingItem>>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, ShoppingItem>(INSERT)
        .bind(user_id)
        .bind(&new.name)
        .bind(normalize_name(&new.name))
        .bind(&new.quantity)
        .bind(&new.unit)
        .bind(new.recipe_id)
        .fetch_optional(exec)
        .await
}

/// Inserts unless an unpurchased item with the same normalized name exists.
/// Returns `None` when the insert was skipped.
pub async fn add(
    db: &PgPool,
    user_id: Uuid,
    new: &NewShoppingItem,
) -> anyhow::Result<Option<ShoppingItem>> {
    insert(db, user_id, new).await.context("insert shopping item")
}

/// Adds several items in one transaction, skipping duplicates.
pub async fn add_many(
    db: &PgPool,
    user_id: Uuid,
    items: &[NewShoppingItem],
) -> anyhow::Result<Vec<ShoppingItem>> {
    let mut tx = db.begin().await.context("begin tx")?;
    let mut added = Vec::with_capacity(items.len());

    for new in items {
        let row = insert(&mut *tx, user_id, new)
            .await
            .context("insert shopping item")?;
        added.extend(row);
    }

    tx.commit().await.context("commit tx")?;
    Ok(added)
}

/// Marking an item unpurchased fails with a unique violation when another
/// open item already carries the same name.
pub async fn set_purchased(
    db: &PgPool,
    user_id: Uuid,
    id: Uuid,
    purchased: bool,
) -> anyhow::Result<Option<ShoppingItem>> {
    sqlx::query_as::<_, ShoppingItem>(&format!(
        r#"
        UPDATE shopping_items
           SET purchased = $3
         WHERE id = $1 AND user_id = $2
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id)
    .bind(user_id)
    .bind(purchased)
    .fetch_optional(db)
    .await
    .context("update shopping item")
}

pub async fn delete(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
    let res = sqlx::query(r#"DELETE FROM shopping_items WHERE id = $1 AND user_id = $2"#)
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await
        .context("delete shopping item")?;
    Ok(res.rows_affected() > 0)
}
