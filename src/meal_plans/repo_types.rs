use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

/// Slot of the day a planned recipe is cooked for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    pub fn as_str(self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }

    /// Position within a day; unknown values sort last.
    pub fn rank(stored: &str) -> u8 {
        match stored {
            "breakfast" => 0,
            "lunch" => 1,
            "dinner" => 2,
            "snack" => 3,
            _ => u8::MAX,
        }
    }
}

/// Planned meal joined with its recipe title.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MealPlan {
    pub id: Uuid,
    #[serde(skip_serializing)]
    pub user_id: Uuid,
    pub recipe_id: Uuid,
    pub recipe_title: String,
    pub plan_date: Date,
    pub meal_type: String, // one of MealType::as_str
    pub notes: Option<String>,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewMealPlan {
    pub recipe_id: Uuid,
    pub plan_date: Date,
    pub meal_type: MealType,
    pub notes: Option<String>,
}
