use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Shopping list entry.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ShoppingItem {
    pub id: Uuid,
    #[serde(skip_serializing)]
    pub user_id: Uuid,
    pub name: String,
    pub quantity: String,
    pub unit: String,
    pub recipe_id: Option<Uuid>,
    pub purchased: bool,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewShoppingItem {
    pub name: String,
    pub quantity: String,
    pub unit: String,
    pub recipe_id: Option<Uuid>,
}
