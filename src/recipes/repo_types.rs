use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Recipe record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Recipe {
    pub id: Uuid,
    #[serde(skip_serializing)]
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub instructions: Vec<String>,
    pub cooking_time_minutes: Option<i32>,
    pub servings: Option<i32>,
    pub difficulty: Option<String>,
    pub created_at: OffsetDateTime,
}

/// One ingredient line of a recipe. `quantity` is kept as written ("1/2", "a pinch").
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct RecipeRequirement {
    pub name: String,
    #[serde(default, deserialize_with = "quantity_text")]
    pub quantity: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default = "essential_by_default")]
    pub is_essential: bool,
}

fn essential_by_default() -> bool {
    true
}

/// Accepts `"1/2"`, `1.5`, `2` or `null` and keeps the text form.
pub(crate) fn quantity_text<'de, D>(de: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Option::<Raw>::deserialize(de)? {
        None => String::new(),
        Some(Raw::Text(s)) => s,
        Some(Raw::Int(n)) => n.to_string(),
        Some(Raw::Float(f)) => f.to_string(),
    })
}

#[derive(Debug, Clone)]
pub struct NewRecipe {
    pub title: String,
    pub description: Option<String>,
    pub instructions: Vec<String>,
    pub cooking_time_minutes: Option<i32>,
    pub servings: Option<i32>,
    pub difficulty: Option<String>,
    pub requirements: Vec<RecipeRequirement>,
}

/// One logged cooking of a recipe.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CookingEntry {
    pub id: Uuid,
    pub recipe_id: Uuid,
    pub recipe_title: String,
    pub rating: Option<i32>, // 1..=5
    pub notes: Option<String>,
    pub cooked_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewCookingEntry {
    pub rating: Option<i32>,
    pub notes: Option<String>,
}
