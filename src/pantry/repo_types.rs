use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

/// Ingredient held in a user's fridge.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Ingredient {
    pub id: Uuid,
    #[serde(skip_serializing)]
    pub user_id: Uuid,
    pub name: String,
    pub category: String,
    pub quantity: f64, // always >= 0, enforced on write
    pub unit: String,
    pub expiry_date: Option<Date>,
    pub created_at: OffsetDateTime,
}

/// Fields accepted when a new ingredient is stored.
#[derive(Debug, Clone)]
pub struct NewIngredient {
    pub name: String,
    pub category: String,
    pub quantity: f64,
    pub unit: String,
    pub expiry_date: Option<Date>,
}

/// Partial edit; `None` leaves a column untouched, `Some(None)` clears the expiry date.
#[derive(Debug, Clone, Default)]
pub struct IngredientChanges {
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub category: Option<String>,
    pub expiry_date: Option<Option<Date>>,
}
